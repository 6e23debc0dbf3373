/**
 * Responsibility
 *
 * 主な責務
 *  - endpoint ごとの「必要 scope」をタグ型として宣言する
 *
 * 置くもの
 *  - GetDrinks, PostDrinks などのタグ型と RequiredScope 実装
 *
 * 置かないもの
 *  - token 検証ロジック
 *  - extractor 実装
 *
 * 変更理由
 *  - endpoint / scope が増えた
 */
use crate::services::auth::Scope;

/// Binds a tag type to the scope an endpoint requires.
pub trait RequiredScope {
    const SCOPE: Scope;
}

macro_rules! scope_tag {
    ($($tag:ident => $scope:ident),* $(,)?) => {
        $(
            pub enum $tag {}

            impl RequiredScope for $tag {
                const SCOPE: Scope = Scope::$scope;
            }
        )*
    };
}

scope_tag! {
    GetDrinks => GetDrinks,
    GetDrinksDetail => GetDrinksDetail,
    PostDrinks => PostDrinks,
    PatchDrinks => PatchDrinks,
    DeleteDrinks => DeleteDrinks,
}
