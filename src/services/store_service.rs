// src/services/store_service.rs

use std::{collections::HashMap, sync::Arc};

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        sorting::{SortSpec, StoreSortField},
        validation::blank_to_none,
    },
    db::{RatingLedger, StoreDirectory, UserStore},
    models::{
        auth::Role,
        store::{NewStore, Store, StoreFilters, StoreWithRating, UserStoreView},
    },
    services::aggregation,
};

#[derive(Clone)]
pub struct StoreService {
    store_repo: Arc<dyn StoreDirectory>,
    user_repo: Arc<dyn UserStore>,
    rating_repo: Arc<dyn RatingLedger>,
}

impl StoreService {
    pub fn new(
        store_repo: Arc<dyn StoreDirectory>,
        user_repo: Arc<dyn UserStore>,
        rating_repo: Arc<dyn RatingLedger>,
    ) -> Self {
        Self { store_repo, user_repo, rating_repo }
    }

    // O dono precisa existir e ter o papel `owner` no momento da criação
    pub async fn create_store(&self, mut new_store: NewStore) -> Result<Store, AppError> {
        new_store.address = blank_to_none(new_store.address);

        let owner = self
            .user_repo
            .find_by_id(new_store.owner_id)
            .await?
            .ok_or(AppError::OwnerNotFound)?;

        if owner.role != Role::Owner {
            return Err(AppError::OwnerRoleInvalid);
        }

        if self.store_repo.email_exists(&new_store.email, None).await? {
            return Err(AppError::StoreEmailAlreadyExists);
        }

        let store = self.store_repo.create(new_store).await?;
        tracing::info!("🏪 Loja {} criada para o dono {}", store.id, store.owner_id);
        Ok(store)
    }

    pub async fn list_stores(
        &self,
        filters: &StoreFilters,
        sort: SortSpec<StoreSortField>,
    ) -> Result<Vec<StoreWithRating>, AppError> {
        let rows = self.store_repo.list(filters, sort).await?;
        Ok(rows.into_iter().map(aggregation::store_with_rating).collect())
    }

    // Listagem do usuário comum: cada loja vem com a nota que ele próprio deu (ou null)
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        search: Option<String>,
        sort: SortSpec<StoreSortField>,
    ) -> Result<Vec<UserStoreView>, AppError> {
        let filters = StoreFilters { name: search, ..Default::default() };
        let stores = self.list_stores(&filters, sort).await?;

        let my_ratings: HashMap<Uuid, i32> = self
            .rating_repo
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(|r| (r.store_id, r.rating))
            .collect();

        Ok(stores
            .into_iter()
            .map(|store| {
                let user_rating = my_ratings.get(&store.store.id).copied();
                UserStoreView { store, user_rating }
            })
            .collect())
    }
}
