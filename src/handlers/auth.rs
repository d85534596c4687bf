// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    common::{error::AppError, extract::ApiJson},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{
        AuthResponse, LoginPayload, MessageResponse, SignupPayload, UpdatePasswordPayload,
        UserCreatedResponse,
    },
    services::auth::Registration,
};

// POST /api/auth/signup
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    request_body = SignupPayload,
    responses(
        (status = 201, description = "Usuário criado com papel 'user'", body = UserCreatedResponse),
        (status = 400, description = "Dados inválidos ou e-mail já cadastrado")
    )
)]
pub async fn signup(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<SignupPayload>,
) -> Result<(StatusCode, Json<UserCreatedResponse>), AppError> {
    payload.validate()?;

    let user = app_state
        .auth_service
        .signup(Registration {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            address: payload.address,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            message: "Usuário cadastrado com sucesso.".to_string(),
            user,
        }),
    ))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "E-mail ou senha inválidos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let (token, user) = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        message: "Login realizado com sucesso.".to_string(),
        token,
        user,
    }))
}

// PATCH /api/auth/update-password
#[utoipa::path(
    patch,
    path = "/api/auth/update-password",
    tag = "Auth",
    request_body = UpdatePasswordPayload,
    responses(
        (status = 200, description = "Senha atualizada", body = MessageResponse),
        (status = 400, description = "Nova senha fora da política"),
        (status = 401, description = "Token ausente ou senha atual incorreta")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_password(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    ApiJson(payload): ApiJson<UpdatePasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    app_state
        .auth_service
        .update_password(&identity, &payload.old_password, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Senha atualizada com sucesso.".to_string(),
    }))
}
