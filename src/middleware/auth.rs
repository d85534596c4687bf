// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};

use crate::{common::error::AppError, config::AppState, models::auth::Identity};

// Resolve a identidade a partir do token e a coloca nas extensions da requisição.
// Cabeçalho ausente, mal formado, expirado ou com assinatura errada: sempre 401.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| AppError::InvalidToken)?;

    let claims = app_state.auth_service.verify_token(bearer.token())?;
    let identity = Identity::from(claims);

    tracing::debug!("🔐 Requisição autenticada: {} ({})", identity.id, identity.role);

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub Identity);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}
