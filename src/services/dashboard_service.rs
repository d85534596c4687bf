// src/services/dashboard_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{error::AppError, sorting::SortSpec},
    db::{RatingLedger, StoreDirectory, UserStore},
    models::{
        dashboard::{AdminDashboard, OwnerDashboard, OwnerStoreSummary},
        rating::{AverageRating, RatingStats},
        store::StoreFilters,
    },
    services::aggregation,
};

#[derive(Clone)]
pub struct DashboardService {
    user_repo: Arc<dyn UserStore>,
    store_repo: Arc<dyn StoreDirectory>,
    rating_repo: Arc<dyn RatingLedger>,
}

impl DashboardService {
    pub fn new(
        user_repo: Arc<dyn UserStore>,
        store_repo: Arc<dyn StoreDirectory>,
        rating_repo: Arc<dyn RatingLedger>,
    ) -> Self {
        Self { user_repo, store_repo, rating_repo }
    }

    pub async fn admin_dashboard(&self) -> Result<AdminDashboard, AppError> {
        let (users_count, stores_count, ratings_count) = tokio::try_join!(
            self.user_repo.count(),
            self.store_repo.count(),
            self.rating_repo.count(),
        )?;

        Ok(AdminDashboard { users_count, stores_count, ratings_count })
    }

    pub async fn owner_dashboard(&self, owner_id: Uuid) -> Result<OwnerDashboard, AppError> {
        let (stores, rollup) = self.owner_stores(owner_id).await?;

        let message = stores
            .is_empty()
            .then(|| "Você ainda não possui lojas cadastradas.".to_string());

        Ok(OwnerDashboard {
            message,
            stores,
            total_average_rating: rollup.average_rating,
            total_ratings: rollup.rating_count,
        })
    }

    // Lojas do dono com as avaliações de cada uma e a média ponderada de todas
    pub async fn owner_stores(
        &self,
        owner_id: Uuid,
    ) -> Result<(Vec<OwnerStoreSummary>, AverageRating), AppError> {
        let filters = StoreFilters { owner_id: Some(owner_id), ..Default::default() };
        let rows = self.store_repo.list(&filters, SortSpec::default()).await?;

        // Dono sem lojas: nada a agregar
        if rows.is_empty() {
            return Ok((Vec::new(), aggregation::average_rating(RatingStats::default())));
        }

        let stats: Vec<RatingStats> = rows.iter().map(|row| row.stats()).collect();
        let rollup = aggregation::owner_rollup(&stats);

        let mut stores = Vec::with_capacity(rows.len());
        for row in rows {
            let ratings = self.rating_repo.find_by_store(row.id).await?;
            stores.push(OwnerStoreSummary {
                store: aggregation::store_with_rating(row),
                ratings,
            });
        }

        Ok((stores, rollup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{rating_repo::MockRatingLedger, store_repo::MockStoreDirectory, user_repo::MockUserStore},
        models::store::StoreRatingRow,
    };
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn row(owner_id: Uuid, sum: i64, count: i64) -> StoreRatingRow {
        StoreRatingRow {
            id: Uuid::new_v4(),
            name: "Mercadinho Central da Vila".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            address: None,
            owner_id,
            created_at: Utc::now(),
            rating_sum: sum,
            rating_count: count,
        }
    }

    #[tokio::test]
    async fn admin_dashboard_reports_the_three_counts() {
        let mut users = MockUserStore::new();
        users.expect_count().returning(|| Ok(4));
        let mut stores = MockStoreDirectory::new();
        stores.expect_count().returning(|| Ok(2));
        let mut ratings = MockRatingLedger::new();
        ratings.expect_count().returning(|| Ok(7));

        let service = DashboardService::new(Arc::new(users), Arc::new(stores), Arc::new(ratings));
        let dashboard = service.admin_dashboard().await.unwrap();

        assert_eq!(dashboard, AdminDashboard { users_count: 4, stores_count: 2, ratings_count: 7 });
    }

    #[tokio::test]
    async fn owner_without_stores_short_circuits() {
        let mut stores = MockStoreDirectory::new();
        stores.expect_list().returning(|_, _| Ok(vec![]));
        let mut ratings = MockRatingLedger::new();
        ratings.expect_find_by_store().never();

        let service =
            DashboardService::new(Arc::new(MockUserStore::new()), Arc::new(stores), Arc::new(ratings));
        let dashboard = service.owner_dashboard(Uuid::new_v4()).await.unwrap();

        assert!(dashboard.message.is_some());
        assert!(dashboard.stores.is_empty());
        assert_eq!(dashboard.total_average_rating, Decimal::ZERO);
        assert_eq!(dashboard.total_ratings, 0);
    }

    #[tokio::test]
    async fn owner_rollup_is_weighted_across_stores() {
        let owner_id = Uuid::new_v4();
        // Loja A: duas notas 5; loja B: uma nota 1
        let rows = vec![row(owner_id, 10, 2), row(owner_id, 1, 1)];

        let mut stores = MockStoreDirectory::new();
        stores
            .expect_list()
            .withf(move |filters, _| filters.owner_id == Some(owner_id))
            .returning(move |_, _| Ok(rows.clone()));
        let mut ratings = MockRatingLedger::new();
        ratings.expect_find_by_store().times(2).returning(|_| Ok(vec![]));

        let service =
            DashboardService::new(Arc::new(MockUserStore::new()), Arc::new(stores), Arc::new(ratings));
        let dashboard = service.owner_dashboard(owner_id).await.unwrap();

        assert!(dashboard.message.is_none());
        assert_eq!(dashboard.stores.len(), 2);
        assert_eq!(dashboard.stores[0].store.average_rating, Decimal::new(500, 2));
        assert_eq!(dashboard.stores[1].store.average_rating, Decimal::new(100, 2));
        assert_eq!(dashboard.total_average_rating, Decimal::new(367, 2));
        assert_eq!(dashboard.total_ratings, 3);
    }

    #[tokio::test]
    async fn owner_with_unrated_stores_has_zero_total() {
        let owner_id = Uuid::new_v4();
        let rows = vec![row(owner_id, 0, 0)];

        let mut stores = MockStoreDirectory::new();
        stores.expect_list().returning(move |_, _| Ok(rows.clone()));
        let mut ratings = MockRatingLedger::new();
        ratings.expect_find_by_store().returning(|_| Ok(vec![]));

        let service =
            DashboardService::new(Arc::new(MockUserStore::new()), Arc::new(stores), Arc::new(ratings));
        let dashboard = service.owner_dashboard(owner_id).await.unwrap();

        assert_eq!(dashboard.stores.len(), 1);
        assert_eq!(dashboard.total_average_rating, Decimal::ZERO);
        assert_eq!(dashboard.total_ratings, 0);
    }
}
