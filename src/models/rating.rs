// src/models/rating.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Linha da tabela `ratings`
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_id: Uuid,
    #[schema(example = 4)]
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Avaliação de uma loja com os dados públicos de quem avaliou (sem senha)
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingWithRater {
    pub id: Uuid,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
}

// Avaliação feita por um usuário com a identificação da loja
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingWithStore {
    pub id: Uuid,
    pub store_id: Uuid,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub store_name: String,
    pub store_email: String,
}

// Soma e contagem cruas, a partir das quais a média é calculada
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct RatingStats {
    pub sum: i64,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AverageRating {
    /// Média arredondada em 2 casas; 0 quando não há avaliações
    pub average_rating: Decimal,
    pub rating_count: i64,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitRatingPayload {
    #[serde(alias = "storeId")]
    pub store_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "A nota deve estar entre 1 e 5."))]
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRatingPayload {
    #[validate(range(min = 1, max = 5, message = "A nota deve estar entre 1 e 5."))]
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub message: String,
    pub rating: Rating,
    /// Média da loja já considerando esta avaliação
    pub store_average: AverageRating,
}
