/*
 * Responsibility
 * - drinks テーブル向けの永続化インターフェース (DrinkRepo)
 * - PgPool を使う実装 (PgDrinkRepo)
 * - recipe は JSON テキストとして保存する (形の検証は DTO 側)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct DrinkRow {
    pub id: i64,
    pub title: String,
    pub recipe: String,
}

/// Drinks storage, injected into `AppState` so handlers never touch a global pool.
#[async_trait]
pub trait DrinkRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<DrinkRow>, RepoError>;

    async fn get(&self, id: i64) -> Result<Option<DrinkRow>, RepoError>;

    async fn create(&self, title: &str, recipe: &str) -> Result<DrinkRow, RepoError>;

    // `None` leaves the column untouched.
    async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        recipe: Option<&str>,
    ) -> Result<Option<DrinkRow>, RepoError>;

    async fn delete(&self, id: i64) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgDrinkRepo {
    db: PgPool,
}

impl PgDrinkRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DrinkRepo for PgDrinkRepo {
    async fn list(&self) -> Result<Vec<DrinkRow>, RepoError> {
        let rows = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<DrinkRow>, RepoError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn create(&self, title: &str, recipe: &str) -> Result<DrinkRow, RepoError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            INSERT INTO drinks (title, recipe)
            VALUES ($1, $2)
            RETURNING id, title, recipe
            "#,
        )
        .bind(title)
        .bind(recipe)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        recipe: Option<&str>,
    ) -> Result<Option<DrinkRow>, RepoError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            UPDATE drinks
            SET
                title = COALESCE($2, title),
                recipe = COALESCE($3, recipe)
            WHERE id = $1
            RETURNING id, title, recipe
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(recipe)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
