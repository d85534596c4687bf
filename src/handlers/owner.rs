// src/handlers/owner.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::dashboard::OwnerDashboard,
};

// GET /api/owner/dashboard
#[utoipa::path(
    get,
    path = "/api/owner/dashboard",
    tag = "Owner",
    responses(
        (status = 200, description = "Lojas do dono, avaliações e média ponderada", body = OwnerDashboard),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Apenas donos de loja")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<OwnerDashboard>, AppError> {
    let dashboard = app_state.dashboard_service.owner_dashboard(identity.id).await?;
    Ok(Json(dashboard))
}
