// src/db/user_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        sorting::{SortSpec, UserSortField},
    },
    models::auth::{NewUser, User, UserFilters},
};

const USER_COLUMNS: &str = "id, name, email, password_hash, address, role, created_at";

// Tudo o que os serviços precisam da tabela `users`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// `true` se alguma linha foi atualizada
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, AppError>;

    async fn list(
        &self,
        filters: &UserFilters,
        sort: SortSpec<UserSortField>,
    ) -> Result<Vec<User>, AppError>;

    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    // Com tratamento de erro específico para e-mails duplicados.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            r#"
            INSERT INTO users (name, email, password_hash, address, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.name)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.address)
            .bind(new_user.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    // O nome padrão que o Postgres cria para "UNIQUE" na coluna email
                    if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                        return AppError::EmailAlreadyExists;
                    }
                }
                e.into()
            })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Filtros opcionais: nome/e-mail por trecho (sem diferenciar maiúsculas), papel exato.
    // A coluna do ORDER BY vem da allow-list de `UserSortField`.
    async fn list(
        &self,
        filters: &UserFilters,
        sort: SortSpec<UserSortField>,
    ) -> Result<Vec<User>, AppError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM users
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR email ILIKE '%' || $2 || '%')
              AND ($3::user_role IS NULL OR role = $3)
            ORDER BY {} {}, id
            "#,
            USER_COLUMNS,
            sort.field.column(),
            sort.direction.as_sql()
        );

        let users = sqlx::query_as::<_, User>(&sql)
            .bind(filters.name.as_deref())
            .bind(filters.email.as_deref())
            .bind(filters.role)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
