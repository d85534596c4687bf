// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_password;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")] // Banco
#[serde(rename_all = "lowercase")] // JSON
pub enum Role {
    Admin,
    User,
    Owner,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
            Role::Owner => write!(f, "owner"),
        }
    }
}

// Linha completa da tabela `users`. Só é usada internamente (login, troca de senha).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub address: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// O que sai para o cliente: nunca carrega a senha.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    #[schema(example = "Maria Aparecida da Silva Souza")]
    pub name: String,
    #[schema(example = "maria@example.com")]
    pub email: String,
    pub address: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            address: user.address,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

// Resumo devolvido no cadastro e no login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

// Dados para inserir um usuário (senha já com hash)
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub address: Option<String>,
    pub role: Role,
}

// Filtros da listagem de usuários do admin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilters {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

// --- Payloads ---

// Cadastro público. Qualquer campo `role` enviado pelo cliente é ignorado.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupPayload {
    #[validate(length(min = 20, max = 60, message = "O nome deve ter entre 20 e 60 caracteres."))]
    #[schema(example = "Maria Aparecida da Silva Souza")]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    #[schema(example = "Senha@123")]
    pub password: String,

    #[validate(length(max = 400, message = "O endereço deve ter no máximo 400 caracteres."))]
    pub address: Option<String>,
}

// Criação de usuário pelo admin (papel explícito)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(length(min = 20, max = 60, message = "O nome deve ter entre 20 e 60 caracteres."))]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,

    #[validate(length(max = 400, message = "O endereço deve ter no máximo 400 caracteres."))]
    pub address: Option<String>,

    pub role: Role,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordPayload {
    #[validate(length(min = 1, message = "A senha atual é obrigatória."))]
    pub old_password: String,

    #[validate(custom(function = "validate_password"))]
    pub new_password: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    /// `campo:direção`, campos: name, email, role, created_at
    pub sort: Option<String>,
}

// --- Respostas ---

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserCreatedResponse {
    pub message: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// Estrutura de dados ("claims") dentro do JWT.
// Os dados de identidade viajam no token e são usados sem consultar o banco.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub name: String,
    pub email: String,
    pub role: Role,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

// Identidade resolvida a partir do token, disponível nos handlers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
