pub mod access_jwt;
pub mod bearer;
pub mod error;
pub mod factory;
pub mod gate;
pub mod jwks;
pub mod scope;

pub use access_jwt::{Claims, TokenVerifier, VerifierSettings};
pub use error::AuthError;
pub use factory::build_auth_gate;
pub use gate::AuthGate;
pub use scope::Scope;
