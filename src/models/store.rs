// src/models/store.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::rating::RatingStats;

// Linha da tabela `stores`
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: Uuid,
    #[schema(example = "Mercadinho Central da Vila Mariana")]
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// Loja + agregados crus do LEFT JOIN com `ratings`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct StoreRatingRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub rating_sum: i64,
    pub rating_count: i64,
}

impl StoreRatingRow {
    pub fn stats(&self) -> RatingStats {
        RatingStats { sum: self.rating_sum, count: self.rating_count }
    }

    pub fn into_store(self) -> Store {
        Store {
            id: self.id,
            name: self.name,
            email: self.email,
            address: self.address,
            owner_id: self.owner_id,
            created_at: self.created_at,
        }
    }
}

// Loja com a média já calculada (o que sai na API)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreWithRating {
    #[serde(flatten)]
    pub store: Store,
    #[schema(example = 4.33)]
    pub average_rating: Decimal,
    pub rating_count: i64,
}

// Loja vista por um usuário comum: inclui a nota que ele deu (ou null)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStoreView {
    #[serde(flatten)]
    pub store: StoreWithRating,
    pub user_rating: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStore {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub owner_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreFilters {
    pub name: Option<String>,
    pub owner_id: Option<Uuid>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStorePayload {
    #[validate(length(min = 20, max = 60, message = "O nome deve ter entre 20 e 60 caracteres."))]
    #[schema(example = "Mercadinho Central da Vila Mariana")]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(max = 400, message = "O endereço deve ter no máximo 400 caracteres."))]
    pub address: Option<String>,

    #[serde(alias = "ownerId")]
    pub owner_id: Uuid,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListStoresQuery {
    pub name: Option<String>,
    /// `campo:direção`, campos: name, averageRating, created_at
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserStoresQuery {
    /// Trecho do nome da loja
    pub search: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreCreatedResponse {
    pub message: String,
    pub store: Store,
}
