// src/services/rating_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{RatingLedger, StoreDirectory},
    models::rating::{AverageRating, Rating, RatingWithStore},
    services::aggregation,
};

#[derive(Clone)]
pub struct RatingService {
    rating_repo: Arc<dyn RatingLedger>,
    store_repo: Arc<dyn StoreDirectory>,
}

impl RatingService {
    pub fn new(rating_repo: Arc<dyn RatingLedger>, store_repo: Arc<dyn StoreDirectory>) -> Self {
        Self { rating_repo, store_repo }
    }

    // Primeira avaliação ou reenvio: o upsert do banco decide qual dos dois acontece.
    // O `bool` indica se já havia uma nota (só muda a mensagem da resposta).
    pub async fn submit(
        &self,
        user_id: Uuid,
        store_id: Uuid,
        rating: i32,
    ) -> Result<(Rating, bool), AppError> {
        if self.store_repo.find_by_id(store_id).await?.is_none() {
            return Err(AppError::StoreNotFound);
        }

        let replaced = self
            .rating_repo
            .find_by_user_and_store(user_id, store_id)
            .await?
            .is_some();

        let saved = self.rating_repo.submit_or_update(user_id, store_id, rating).await?;
        tracing::info!("⭐ Usuário {} avaliou a loja {} com nota {}", user_id, store_id, rating);
        Ok((saved, replaced))
    }

    // Alteração explícita: exige uma avaliação anterior do mesmo usuário
    pub async fn update(&self, user_id: Uuid, store_id: Uuid, rating: i32) -> Result<Rating, AppError> {
        self.rating_repo
            .update_existing(user_id, store_id, rating)
            .await?
            .ok_or(AppError::RatingNotFound)
    }

    // Média atual da loja, recalculada a partir do ledger
    pub async fn average_for_store(&self, store_id: Uuid) -> Result<AverageRating, AppError> {
        let stats = self.rating_repo.stats_for_store(store_id).await?;
        Ok(aggregation::average_rating(stats))
    }

    pub async fn list_mine(&self, user_id: Uuid) -> Result<Vec<RatingWithStore>, AppError> {
        self.rating_repo.find_by_user(user_id).await
    }
}
