use std::fmt;

use super::AuthError;
use super::access_jwt::Claims;

/// Permission scopes the drinks API requires, one per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    GetDrinks,
    GetDrinksDetail,
    PostDrinks,
    PatchDrinks,
    DeleteDrinks,
}

impl Scope {
    pub const ALL: [Scope; 5] = [
        Scope::GetDrinks,
        Scope::GetDrinksDetail,
        Scope::PostDrinks,
        Scope::PatchDrinks,
        Scope::DeleteDrinks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::GetDrinks => "get:drinks",
            Scope::GetDrinksDetail => "get:drinks-detail",
            Scope::PostDrinks => "post:drinks",
            Scope::PatchDrinks => "patch:drinks",
            Scope::DeleteDrinks => "delete:drinks",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks that verified claims grant `required`.
///
/// A token without a `permissions` claim at all is malformed for this API (400),
/// which is different from a token that simply lacks the permission (403).
pub fn check_permission(claims: &Claims, required: &str) -> Result<(), AuthError> {
    if claims.permissions.is_none() {
        return Err(AuthError::PermissionsClaimMissing);
    }
    if !claims.has_permission(required) {
        return Err(AuthError::PermissionNotFound);
    }
    Ok(())
}
