use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Erro único da aplicação. Cada variante sabe o seu status HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validações que não vêm do `validator` (ex.: parâmetro de ordenação)
    #[error("{0}")]
    InvalidInput(String),

    #[error("E-mail já cadastrado")]
    EmailAlreadyExists,

    #[error("E-mail da loja já cadastrado")]
    StoreEmailAlreadyExists,

    #[error("Dono da loja não encontrado")]
    OwnerNotFound,

    #[error("O usuário precisa ter o papel 'owner' para ser dono de uma loja")]
    OwnerRoleInvalid,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Senha atual incorreta")]
    IncorrectPassword,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Loja não encontrada")]
    StoreNotFound,

    #[error("Avaliação não encontrada")]
    RatingNotFound,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidInput(_)
            | AppError::EmailAlreadyExists
            | AppError::StoreEmailAlreadyExists
            | AppError::OwnerNotFound
            | AppError::OwnerRoleInvalid => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::IncorrectPassword | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::StoreNotFound | AppError::RatingNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
            // Retorna a primeira mensagem como `error` e o mapa completo em `details`.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                let mut first_message = None;
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    if first_message.is_none() {
                        first_message = messages.first().cloned();
                    }
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": first_message.unwrap_or_else(|| "Um ou mais campos são inválidos.".to_string()),
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::InvalidInput(message) => message,
            AppError::EmailAlreadyExists => "Este e-mail já está em uso.".to_string(),
            AppError::StoreEmailAlreadyExists => "O e-mail da loja já está em uso.".to_string(),
            AppError::OwnerNotFound => "Usuário dono da loja não encontrado.".to_string(),
            AppError::OwnerRoleInvalid => {
                "O usuário precisa ter o papel 'owner' para ser dono de uma loja.".to_string()
            }
            AppError::InvalidCredentials => "E-mail ou senha inválidos.".to_string(),
            AppError::IncorrectPassword => "A senha atual está incorreta.".to_string(),
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".to_string(),
            AppError::Forbidden => "Você não tem permissão para acessar este recurso.".to_string(),
            AppError::UserNotFound => "Usuário não encontrado.".to_string(),
            AppError::StoreNotFound => "Loja não encontrada.".to_string(),
            AppError::RatingNotFound => "Avaliação não encontrada.".to_string(),

            // Todos os outros erros viram 500. O `tracing` loga o detalhe,
            // o cliente recebe só a mensagem genérica.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

// Rejeições dos extratores do axum: sempre 400, no mesmo formato dos demais erros
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Corpo JSON rejeitado: {}", rejection.body_text());
        AppError::InvalidInput(format!("Corpo da requisição inválido: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(format!("Parâmetro de rota inválido: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(format!("Parâmetro de consulta inválido: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn maps_each_kind_to_its_status() {
        assert_eq!(AppError::InvalidInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::EmailAlreadyExists.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::RatingNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) = body_of(AppError::DatabaseError(sqlx::Error::PoolTimedOut)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Ocorreu um erro inesperado." }));
    }

    #[tokio::test]
    async fn simple_errors_have_only_the_error_field() {
        let (_, body) = body_of(AppError::Forbidden).await;

        assert_eq!(body.as_object().unwrap().len(), 1);
        assert!(body["error"].is_string());
    }
}
