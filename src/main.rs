//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;

use crate::config::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; sem ela, `info`
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    tracing::debug!("Configuração carregada: {:?}", config);

    let db_pool = config.connect().await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app_state = AppState::new(db_pool, &config);
    let app = routes::build_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&config.server_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
