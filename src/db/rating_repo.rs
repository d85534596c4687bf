// src/db/rating_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::rating::{Rating, RatingStats, RatingWithRater, RatingWithStore},
};

const RATING_COLUMNS: &str = "id, user_id, store_id, rating, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingLedger: Send + Sync {
    /// Insere ou substitui a nota do par (usuário, loja) numa única instrução.
    async fn submit_or_update(
        &self,
        user_id: Uuid,
        store_id: Uuid,
        rating: i32,
    ) -> Result<Rating, AppError>;

    /// Só altera uma nota já existente; `None` se o usuário nunca avaliou a loja.
    async fn update_existing(
        &self,
        user_id: Uuid,
        store_id: Uuid,
        rating: i32,
    ) -> Result<Option<Rating>, AppError>;

    async fn find_by_user_and_store(
        &self,
        user_id: Uuid,
        store_id: Uuid,
    ) -> Result<Option<Rating>, AppError>;

    async fn find_by_store(&self, store_id: Uuid) -> Result<Vec<RatingWithRater>, AppError>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RatingWithStore>, AppError>;

    async fn stats_for_store(&self, store_id: Uuid) -> Result<RatingStats, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}

#[derive(Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingLedger for RatingRepository {
    // Duas submissões concorrentes para o mesmo par deixam uma única linha (a última vence).
    async fn submit_or_update(
        &self,
        user_id: Uuid,
        store_id: Uuid,
        rating: i32,
    ) -> Result<Rating, AppError> {
        let sql = format!(
            r#"
            INSERT INTO ratings (user_id, store_id, rating)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, store_id)
            DO UPDATE SET rating = EXCLUDED.rating, updated_at = NOW()
            RETURNING {}
            "#,
            RATING_COLUMNS
        );

        let saved = sqlx::query_as::<_, Rating>(&sql)
            .bind(user_id)
            .bind(store_id)
            .bind(rating)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    match db_err.constraint() {
                        Some("ratings_store_id_fkey") => return AppError::StoreNotFound,
                        Some("ratings_user_id_fkey") => return AppError::UserNotFound,
                        _ => {}
                    }
                }
                e.into()
            })?;

        Ok(saved)
    }

    async fn update_existing(
        &self,
        user_id: Uuid,
        store_id: Uuid,
        rating: i32,
    ) -> Result<Option<Rating>, AppError> {
        let sql = format!(
            r#"
            UPDATE ratings
            SET rating = $3, updated_at = NOW()
            WHERE user_id = $1 AND store_id = $2
            RETURNING {}
            "#,
            RATING_COLUMNS
        );

        let updated = sqlx::query_as::<_, Rating>(&sql)
            .bind(user_id)
            .bind(store_id)
            .bind(rating)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn find_by_user_and_store(
        &self,
        user_id: Uuid,
        store_id: Uuid,
    ) -> Result<Option<Rating>, AppError> {
        let sql = format!(
            "SELECT {} FROM ratings WHERE user_id = $1 AND store_id = $2",
            RATING_COLUMNS
        );

        let rating = sqlx::query_as::<_, Rating>(&sql)
            .bind(user_id)
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rating)
    }

    async fn find_by_store(&self, store_id: Uuid) -> Result<Vec<RatingWithRater>, AppError> {
        let ratings = sqlx::query_as::<_, RatingWithRater>(
            r#"
            SELECT
                r.id, r.rating, r.created_at, r.updated_at,
                u.id AS user_id, u.name AS user_name, u.email AS user_email
            FROM ratings r
            JOIN users u ON u.id = r.user_id
            WHERE r.store_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RatingWithStore>, AppError> {
        let ratings = sqlx::query_as::<_, RatingWithStore>(
            r#"
            SELECT
                r.id, r.store_id, r.rating, r.created_at, r.updated_at,
                s.name AS store_name, s.email AS store_email
            FROM ratings r
            JOIN stores s ON s.id = r.store_id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings)
    }

    async fn stats_for_store(&self, store_id: Uuid) -> Result<RatingStats, AppError> {
        let stats = sqlx::query_as::<_, RatingStats>(
            r#"
            SELECT COALESCE(SUM(rating), 0)::BIGINT AS sum, COUNT(*) AS count
            FROM ratings
            WHERE store_id = $1
            "#,
        )
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ratings")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
