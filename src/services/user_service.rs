// src/services/user_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        sorting::{SortSpec, UserSortField},
    },
    db::UserStore,
    models::{
        auth::{Role, UserFilters, UserProfile},
        dashboard::UserDetail,
    },
    services::dashboard_service::DashboardService,
};

#[derive(Clone)]
pub struct UserService {
    user_repo: Arc<dyn UserStore>,
    dashboard_service: DashboardService,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserStore>, dashboard_service: DashboardService) -> Self {
        Self { user_repo, dashboard_service }
    }

    pub async fn list_users(
        &self,
        filters: &UserFilters,
        sort: SortSpec<UserSortField>,
    ) -> Result<Vec<UserProfile>, AppError> {
        let users = self.user_repo.list(filters, sort).await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    // Para donos, inclui as lojas com médias e avaliações
    pub async fn get_user_detail(&self, id: Uuid) -> Result<UserDetail, AppError> {
        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let stores = match user.role {
            Role::Owner => Some(self.dashboard_service.owner_stores(user.id).await?.0),
            Role::Admin | Role::User => None,
        };

        Ok(UserDetail { profile: UserProfile::from(user), stores })
    }
}
