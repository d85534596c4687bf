// src/handlers/user.rs

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{ApiJson, ApiPath, ApiQuery},
        sorting::{SortSpec, StoreSortField},
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        rating::{RatingResponse, RatingWithStore, SubmitRatingPayload, UpdateRatingPayload},
        store::{UserStoreView, UserStoresQuery},
    },
};

// GET /api/user/stores
#[utoipa::path(
    get,
    path = "/api/user/stores",
    tag = "User",
    params(UserStoresQuery),
    responses(
        (status = 200, description = "Lojas com média e a nota do próprio usuário", body = [UserStoreView]),
        (status = 400, description = "Parâmetro de ordenação inválido"),
        (status = 403, description = "Apenas usuários comuns")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_stores(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    ApiQuery(query): ApiQuery<UserStoresQuery>,
) -> Result<Json<Vec<UserStoreView>>, AppError> {
    let sort = SortSpec::<StoreSortField>::parse(query.sort.as_deref())?;
    let search = query.search.filter(|s| !s.trim().is_empty());

    let stores = app_state
        .store_service
        .list_for_user(identity.id, search, sort)
        .await?;
    Ok(Json(stores))
}

// GET /api/user/ratings
#[utoipa::path(
    get,
    path = "/api/user/ratings",
    tag = "User",
    responses(
        (status = 200, description = "Avaliações feitas pelo usuário, mais recentes primeiro", body = [RatingWithStore])
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_my_ratings(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<Vec<RatingWithStore>>, AppError> {
    let ratings = app_state.rating_service.list_mine(identity.id).await?;
    Ok(Json(ratings))
}

// POST /api/user/ratings
#[utoipa::path(
    post,
    path = "/api/user/ratings",
    tag = "User",
    request_body = SubmitRatingPayload,
    responses(
        (status = 201, description = "Avaliação registrada (ou substituída)", body = RatingResponse),
        (status = 400, description = "Nota fora de 1..5"),
        (status = 404, description = "Loja não encontrada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn submit_rating(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    ApiJson(payload): ApiJson<SubmitRatingPayload>,
) -> Result<(StatusCode, Json<RatingResponse>), AppError> {
    payload.validate()?;

    let (rating, replaced) = app_state
        .rating_service
        .submit(identity.id, payload.store_id, payload.rating)
        .await?;
    let store_average = app_state.rating_service.average_for_store(rating.store_id).await?;

    let message = if replaced {
        "Avaliação atualizada com sucesso."
    } else {
        "Avaliação enviada com sucesso."
    };

    Ok((
        StatusCode::CREATED,
        Json(RatingResponse {
            message: message.to_string(),
            rating,
            store_average,
        }),
    ))
}

// PATCH /api/user/ratings/{storeId}
#[utoipa::path(
    patch,
    path = "/api/user/ratings/{storeId}",
    tag = "User",
    params(
        ("storeId" = Uuid, Path, description = "ID da loja avaliada")
    ),
    request_body = UpdateRatingPayload,
    responses(
        (status = 200, description = "Avaliação atualizada", body = RatingResponse),
        (status = 404, description = "O usuário ainda não avaliou esta loja")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_rating(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    ApiPath(store_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateRatingPayload>,
) -> Result<Json<RatingResponse>, AppError> {
    payload.validate()?;

    let rating = app_state
        .rating_service
        .update(identity.id, store_id, payload.rating)
        .await?;
    let store_average = app_state.rating_service.average_for_store(store_id).await?;

    Ok(Json(RatingResponse {
        message: "Avaliação atualizada com sucesso.".to_string(),
        rating,
        store_average,
    }))
}
