// src/config.rs

use std::{env, ops::RangeInclusive, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        RatingLedger, RatingRepository, StoreDirectory, StoreRepository, UserRepository, UserStore,
    },
    services::{
        auth::{AuthService, AuthSettings},
        dashboard_service::DashboardService,
        rating_service::RatingService,
        store_service::StoreService,
        user_service::UserService,
    },
};

// Validade do token em dias
const TOKEN_TTL_DAYS: RangeInclusive<i64> = 1..=365;

// Configuração lida do ambiente (e do `.env`, se existir)
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_addr: String,
    pub auth: AuthSettings,
}

// O segredo do JWT nunca aparece nos logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_max_connections", &self.database_max_connections)
            .field("server_addr", &self.server_addr)
            .field("token_ttl_days", &self.auth.token_ttl_days)
            .field("bcrypt_cost", &self.auth.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        Ok(Self {
            database_url,
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", 5)?,
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            auth: AuthSettings {
                jwt_secret,
                token_ttl_days: checked_token_ttl(env_or("JWT_EXPIRATION_DAYS", 7)?)?,
                bcrypt_cost: env_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            },
        })
    }

    pub async fn connect(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&self.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválida ('{}'): {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

fn checked_token_ttl(days: i64) -> anyhow::Result<i64> {
    anyhow::ensure!(
        TOKEN_TTL_DAYS.contains(&days),
        "JWT_EXPIRATION_DAYS deve estar entre {} e {} (recebido: {})",
        TOKEN_TTL_DAYS.start(),
        TOKEN_TTL_DAYS.end(),
        days
    );
    Ok(days)
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub store_service: StoreService,
    pub rating_service: RatingService,
    pub user_service: UserService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self::from_repositories(
            Arc::new(UserRepository::new(pool.clone())),
            Arc::new(StoreRepository::new(pool.clone())),
            Arc::new(RatingRepository::new(pool)),
            config.auth.clone(),
        )
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_repositories(
        user_repo: Arc<dyn UserStore>,
        store_repo: Arc<dyn StoreDirectory>,
        rating_repo: Arc<dyn RatingLedger>,
        auth: AuthSettings,
    ) -> Self {
        let auth_service = AuthService::new(user_repo.clone(), auth);
        let dashboard_service =
            DashboardService::new(user_repo.clone(), store_repo.clone(), rating_repo.clone());
        let store_service =
            StoreService::new(store_repo.clone(), user_repo.clone(), rating_repo.clone());
        let rating_service = RatingService::new(rating_repo, store_repo);
        let user_service = UserService::new(user_repo, dashboard_service.clone());

        Self {
            auth_service,
            store_service,
            rating_service,
            user_service,
            dashboard_service,
        }
    }
}
