// src/db/store_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        sorting::{SortSpec, StoreSortField},
    },
    models::store::{NewStore, Store, StoreFilters, StoreRatingRow},
};

// LEFT JOIN para que lojas sem avaliações também apareçam (soma 0, contagem 0)
const STORE_WITH_STATS: &str = r#"
    SELECT
        s.id, s.name, s.email, s.address, s.owner_id, s.created_at,
        COALESCE(SUM(r.rating), 0)::BIGINT AS rating_sum,
        COUNT(r.id) AS rating_count
    FROM stores s
    LEFT JOIN ratings r ON r.store_id = s.id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreDirectory: Send + Sync {
    async fn create(&self, new_store: NewStore) -> Result<Store, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoreRatingRow>, AppError>;

    async fn list(
        &self,
        filters: &StoreFilters,
        sort: SortSpec<StoreSortField>,
    ) -> Result<Vec<StoreRatingRow>, AppError>;

    /// `exclude_id` ignora a própria loja (útil numa futura edição)
    async fn email_exists(&self, email: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}

#[derive(Clone)]
pub struct StoreRepository {
    pool: PgPool,
}

impl StoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreDirectory for StoreRepository {
    async fn create(&self, new_store: NewStore) -> Result<Store, AppError> {
        let store = sqlx::query_as::<_, Store>(
            r#"
            INSERT INTO stores (name, email, address, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, address, owner_id, created_at
            "#,
        )
        .bind(&new_store.name)
        .bind(&new_store.email)
        .bind(&new_store.address)
        .bind(new_store.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() && db_err.constraint() == Some("stores_email_key") {
                    return AppError::StoreEmailAlreadyExists;
                }
                // Dono apagado entre a checagem do serviço e o INSERT
                if db_err.is_foreign_key_violation() {
                    return AppError::OwnerNotFound;
                }
            }
            e.into()
        })?;

        Ok(store)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoreRatingRow>, AppError> {
        let sql = format!("{} WHERE s.id = $1 GROUP BY s.id", STORE_WITH_STATS);

        let row = sqlx::query_as::<_, StoreRatingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(
        &self,
        filters: &StoreFilters,
        sort: SortSpec<StoreSortField>,
    ) -> Result<Vec<StoreRatingRow>, AppError> {
        // Loja sem avaliação tem AVG nulo: vai sempre para o fim
        let sql = format!(
            r#"
            {}
            WHERE ($1::text IS NULL OR s.name ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR s.owner_id = $2)
            GROUP BY s.id
            ORDER BY {} {} NULLS LAST, s.id
            "#,
            STORE_WITH_STATS,
            sort.field.order_expr(),
            sort.direction.as_sql()
        );

        let rows = sqlx::query_as::<_, StoreRatingRow>(&sql)
            .bind(filters.name.as_deref())
            .bind(filters.owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM stores WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::user_repo::{tests::new_user, UserRepository, UserStore},
        models::auth::Role,
    };

    fn new_store(name: &str, email: &str, owner_id: Uuid) -> NewStore {
        NewStore {
            name: name.to_string(),
            email: email.to_string(),
            address: None,
            owner_id,
        }
    }

    #[sqlx::test]
    #[ignore]
    async fn stores_without_ratings_are_listed_with_zero_stats(pool: PgPool) {
        let owner = UserRepository::new(pool.clone())
            .create(new_user("Dono da Loja Numero Um Silva", "dono@example.com", Role::Owner))
            .await
            .unwrap();
        let repo = StoreRepository::new(pool);
        repo.create(new_store("Mercadinho Central da Vila", "loja@example.com", owner.id))
            .await
            .unwrap();

        let rows = repo.list(&StoreFilters::default(), SortSpec::default()).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rating_sum, 0);
        assert_eq!(rows[0].rating_count, 0);
    }

    #[sqlx::test]
    #[ignore]
    async fn duplicate_store_email_and_missing_owner_are_mapped(pool: PgPool) {
        let owner = UserRepository::new(pool.clone())
            .create(new_user("Dono da Loja Numero Um Silva", "dono@example.com", Role::Owner))
            .await
            .unwrap();
        let repo = StoreRepository::new(pool);
        repo.create(new_store("Mercadinho Central da Vila", "loja@example.com", owner.id))
            .await
            .unwrap();

        let duplicate = repo
            .create(new_store("Outra Loja Qualquer do Bairro", "loja@example.com", owner.id))
            .await
            .unwrap_err();
        assert!(matches!(duplicate, AppError::StoreEmailAlreadyExists));

        let orphan = repo
            .create(new_store("Loja Sem Dono Nenhum Cadastrado", "orfa@example.com", Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(orphan, AppError::OwnerNotFound));

        assert!(repo.email_exists("loja@example.com", None).await.unwrap());
    }
}
