// src/handlers/admin.rs

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{ApiJson, ApiPath, ApiQuery},
        sorting::{SortSpec, StoreSortField, UserSortField},
    },
    config::AppState,
    models::{
        auth::{CreateUserPayload, ListUsersQuery, UserCreatedResponse, UserFilters, UserProfile},
        dashboard::{AdminDashboard, UserDetail},
        store::{CreateStorePayload, ListStoresQuery, NewStore, StoreCreatedResponse, StoreFilters, StoreWithRating},
    },
    services::auth::Registration,
};

// GET /api/admin/dashboard
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "Admin",
    responses(
        (status = 200, description = "Totais de usuários, lojas e avaliações", body = AdminDashboard),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Apenas administradores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
) -> Result<Json<AdminDashboard>, AppError> {
    let dashboard = app_state.dashboard_service.admin_dashboard().await?;
    Ok(Json(dashboard))
}

// GET /api/admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Usuários filtrados e ordenados", body = [UserProfile]),
        (status = 400, description = "Parâmetro de ordenação inválido"),
        (status = 403, description = "Apenas administradores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    let sort = SortSpec::<UserSortField>::parse(query.sort.as_deref())?;
    let filters = UserFilters {
        name: query.name,
        email: query.email,
        role: query.role,
    };

    let users = app_state.user_service.list_users(&filters, sort).await?;
    Ok(Json(users))
}

// GET /api/admin/users/{id}
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(
        ("id" = Uuid, Path, description = "ID do usuário")
    ),
    responses(
        (status = 200, description = "Usuário (com lojas, se for dono)", body = UserDetail),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<UserDetail>, AppError> {
    let detail = app_state.user_service.get_user_detail(id).await?;
    Ok(Json(detail))
}

// POST /api/admin/users
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "Admin",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = UserCreatedResponse),
        (status = 400, description = "Dados inválidos ou e-mail já cadastrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserPayload>,
) -> Result<(StatusCode, Json<UserCreatedResponse>), AppError> {
    payload.validate()?;

    let role = payload.role;
    let user = app_state
        .auth_service
        .create_user(
            Registration {
                name: payload.name,
                email: payload.email,
                password: payload.password,
                address: payload.address,
            },
            role,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            message: "Usuário criado com sucesso.".to_string(),
            user,
        }),
    ))
}

// GET /api/admin/stores
#[utoipa::path(
    get,
    path = "/api/admin/stores",
    tag = "Admin",
    params(ListStoresQuery),
    responses(
        (status = 200, description = "Lojas com média e quantidade de avaliações", body = [StoreWithRating]),
        (status = 400, description = "Parâmetro de ordenação inválido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_stores(
    State(app_state): State<AppState>,
    ApiQuery(query): ApiQuery<ListStoresQuery>,
) -> Result<Json<Vec<StoreWithRating>>, AppError> {
    let sort = SortSpec::<StoreSortField>::parse(query.sort.as_deref())?;
    let filters = StoreFilters { name: query.name, ..Default::default() };

    let stores = app_state.store_service.list_stores(&filters, sort).await?;
    Ok(Json(stores))
}

// POST /api/admin/stores
#[utoipa::path(
    post,
    path = "/api/admin/stores",
    tag = "Admin",
    request_body = CreateStorePayload,
    responses(
        (status = 201, description = "Loja criada", body = StoreCreatedResponse),
        (status = 400, description = "Dados inválidos, dono inexistente ou sem papel 'owner'")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_store(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<CreateStorePayload>,
) -> Result<(StatusCode, Json<StoreCreatedResponse>), AppError> {
    payload.validate()?;

    let store = app_state
        .store_service
        .create_store(NewStore {
            name: payload.name,
            email: payload.email,
            address: payload.address,
            owner_id: payload.owner_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StoreCreatedResponse {
            message: "Loja criada com sucesso.".to_string(),
            store,
        }),
    ))
}
