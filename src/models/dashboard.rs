// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    auth::UserProfile,
    rating::RatingWithRater,
    store::StoreWithRating,
};

// Contagens globais do painel do admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub users_count: i64,
    pub stores_count: i64,
    pub ratings_count: i64,
}

// Uma loja do dono, com as avaliações que recebeu
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerStoreSummary {
    #[serde(flatten)]
    pub store: StoreWithRating,
    pub ratings: Vec<RatingWithRater>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDashboard {
    /// Presente apenas quando o dono ainda não tem lojas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub stores: Vec<OwnerStoreSummary>,
    /// Média ponderada pelo número de avaliações de cada loja
    #[schema(example = 3.67)]
    pub total_average_rating: Decimal,
    pub total_ratings: i64,
}

// Detalhe de um usuário no painel do admin
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Lojas do usuário com as avaliações (somente quando o papel é `owner`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stores: Option<Vec<OwnerStoreSummary>>,
}
