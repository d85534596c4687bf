// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::{error::AppError, validation::blank_to_none},
    db::UserStore,
    models::auth::{Claims, Identity, NewUser, Role, User, UserSummary},
};

// Hash bcrypt válido usado quando o e-mail não existe, para que o tempo de
// resposta do login não revele quais e-mails estão cadastrados.
const DUMMY_HASH: &str = "$2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
}

// Dados de um novo usuário ainda com a senha em texto puro
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: Option<String>,
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserStore>,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserStore>, settings: AuthSettings) -> Self {
        Self { user_repo, settings }
    }

    // Cadastro público: o papel é sempre `user`
    pub async fn signup(&self, registration: Registration) -> Result<UserSummary, AppError> {
        self.register(registration, Role::User).await
    }

    // Criação pelo admin, com papel explícito
    pub async fn create_user(
        &self,
        registration: Registration,
        role: Role,
    ) -> Result<UserSummary, AppError> {
        self.register(registration, role).await
    }

    async fn register(&self, registration: Registration, role: Role) -> Result<UserSummary, AppError> {
        // Checagem antecipada; o UNIQUE do banco continua sendo a garantia final
        if self.user_repo.email_exists(&registration.email).await? {
            return Err(AppError::EmailAlreadyExists);
        }

        let password_hash = self.hash_password(&registration.password).await?;

        let user = self
            .user_repo
            .create(NewUser {
                name: registration.name,
                email: registration.email,
                password_hash,
                address: blank_to_none(registration.address),
                role,
            })
            .await?;

        tracing::info!("👤 Usuário {} criado com papel {}", user.id, user.role);
        Ok(UserSummary::from(&user))
    }

    // E-mail desconhecido e senha errada devolvem exatamente o mesmo erro
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, UserSummary), AppError> {
        let maybe_user = self.user_repo.find_by_email(email).await?;

        let stored_hash = maybe_user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| DUMMY_HASH.to_string());

        let is_password_valid = self.verify_password(password, stored_hash).await?;

        let user = match maybe_user {
            Some(user) if is_password_valid => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        let token = self.issue_token(&user)?;
        Ok((token, UserSummary::from(&user)))
    }

    // As claims são a identidade da requisição até o token expirar; o banco não é consultado.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = chrono::Duration::try_days(self.settings.token_ttl_days)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| anyhow::anyhow!("Validade do token fora do intervalo suportado"))?;

        let claims = Claims {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.jwt_secret.as_ref()),
        )?)
    }

    pub async fn update_password(
        &self,
        identity: &Identity,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_id(identity.id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !self.verify_password(old_password, user.password_hash).await? {
            return Err(AppError::IncorrectPassword);
        }

        let new_hash = self.hash_password(new_password).await?;
        if !self.user_repo.update_password(identity.id, &new_hash).await? {
            return Err(AppError::UserNotFound);
        }

        tracing::info!("🔑 Senha atualizada para o usuário {}", identity.id);
        Ok(())
    }

    // bcrypt é CPU-bound: roda fora das threads do runtime
    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_owned();
        let cost = self.settings.bcrypt_cost;

        let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    async fn verify_password(&self, password: &str, password_hash: String) -> Result<bool, AppError> {
        let password = password.to_owned();

        let is_valid = tokio::task::spawn_blocking(move || {
            verify(&password, &password_hash).unwrap_or(false)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?;
        Ok(is_valid)
    }
}
