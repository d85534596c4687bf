// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::{
        auth::auth_guard,
        rbac::{enforce_policy, Access, RouteGroup},
    },
};

// Aplica a política da tabela ao grupo: públicos passam direto, os demais
// recebem `auth_guard` (externo) seguido de `enforce_policy` (interno).
fn guarded(router: Router<AppState>, group: RouteGroup, app_state: &AppState) -> Router<AppState> {
    match group.access() {
        Access::Public => router,
        Access::Authenticated | Access::Roles(_) => router
            .route_layer(axum_middleware::from_fn_with_state(group, enforce_policy))
            .route_layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
    }
}

pub fn build_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login));

    // Troca de senha: qualquer papel autenticado
    let account_routes = Router::new()
        .route("/update-password", patch(handlers::auth::update_password));

    let admin_routes = Router::new()
        .route("/dashboard", get(handlers::admin::get_dashboard))
        .route(
            "/users",
            get(handlers::admin::list_users).post(handlers::admin::create_user),
        )
        .route("/users/{id}", get(handlers::admin::get_user))
        .route(
            "/stores",
            get(handlers::admin::list_stores).post(handlers::admin::create_store),
        );

    let owner_routes = Router::new()
        .route("/dashboard", get(handlers::owner::get_dashboard));

    let user_routes = Router::new()
        .route("/stores", get(handlers::user::list_stores))
        .route(
            "/ratings",
            get(handlers::user::list_my_ratings).post(handlers::user::submit_rating),
        )
        .route("/ratings/{storeId}", patch(handlers::user::update_rating));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest(
            "/api/auth",
            guarded(auth_routes, RouteGroup::Auth, &app_state)
                .merge(guarded(account_routes, RouteGroup::Account, &app_state)),
        )
        .nest("/api/admin", guarded(admin_routes, RouteGroup::Admin, &app_state))
        .nest("/api/owner", guarded(owner_routes, RouteGroup::Owner, &app_state))
        .nest("/api/user", guarded(user_routes, RouteGroup::User, &app_state))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        db::{rating_repo::MockRatingLedger, store_repo::MockStoreDirectory, user_repo::MockUserStore},
        models::auth::Role,
        services::auth::{
            tests::{stored_user, test_settings},
            AuthService,
        },
    };

    fn state_with(users: MockUserStore, stores: MockStoreDirectory, ratings: MockRatingLedger) -> AppState {
        AppState::from_repositories(Arc::new(users), Arc::new(stores), Arc::new(ratings), test_settings())
    }

    fn token_for(role: Role) -> String {
        let service = AuthService::new(Arc::new(MockUserStore::new()), test_settings());
        service
            .issue_token(&stored_user("alguem@example.com", "Senha@123", role))
            .unwrap()
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn counting_state() -> AppState {
        let mut users = MockUserStore::new();
        users.expect_count().returning(|| Ok(3));
        let mut stores = MockStoreDirectory::new();
        stores.expect_count().returning(|| Ok(2));
        let mut ratings = MockRatingLedger::new();
        ratings.expect_count().returning(|| Ok(5));
        state_with(users, stores, ratings)
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = build_router(state_with(MockUserStore::new(), MockStoreDirectory::new(), MockRatingLedger::new()));
        let response = app
            .oneshot(request(Method::GET, "/api/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_token_is_401() {
        let app = build_router(counting_state());
        let (status, body) = send(app, request(Method::GET, "/api/admin/dashboard", None, None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn garbage_token_is_401() {
        let app = build_router(counting_state());
        let (status, _) = send(
            app,
            request(Method::GET, "/api/admin/dashboard", Some("nao.e.um.token"), None),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn user_token_on_admin_route_is_403() {
        let app = build_router(counting_state());
        let token = token_for(Role::User);
        let (status, _) = send(app, request(Method::GET, "/api/admin/dashboard", Some(&token), None)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_token_reaches_the_admin_dashboard() {
        let app = build_router(counting_state());
        let token = token_for(Role::Admin);
        let (status, body) = send(app, request(Method::GET, "/api/admin/dashboard", Some(&token), None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "usersCount": 3, "storesCount": 2, "ratingsCount": 5 }));
    }

    #[tokio::test]
    async fn owner_token_cannot_rate_stores() {
        let app = build_router(state_with(MockUserStore::new(), MockStoreDirectory::new(), MockRatingLedger::new()));
        let token = token_for(Role::Owner);
        let (status, _) = send(
            app,
            request(
                Method::POST,
                "/api/user/ratings",
                Some(&token),
                Some(json!({ "store_id": uuid::Uuid::new_v4(), "rating": 5 })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn update_password_requires_a_token_but_not_a_specific_role() {
        let app = build_router(state_with(MockUserStore::new(), MockStoreDirectory::new(), MockRatingLedger::new()));
        let payload = json!({ "oldPassword": "Senha@123", "newPassword": "fraca" });

        let (status, _) = send(
            app.clone(),
            request(Method::PATCH, "/api/auth/update-password", None, Some(payload.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // Com token de dono passa pela política e cai na validação da nova senha
        let token = token_for(Role::Owner);
        let (status, body) = send(
            app,
            request(Method::PATCH, "/api/auth/update-password", Some(&token), Some(payload)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"]["newPassword"].is_array() || body["details"]["new_password"].is_array());
    }

    #[tokio::test]
    async fn signup_is_public_and_rejects_short_names() {
        let app = build_router(state_with(MockUserStore::new(), MockStoreDirectory::new(), MockRatingLedger::new()));
        let (status, body) = send(
            app,
            request(
                Method::POST,
                "/api/auth/signup",
                None,
                Some(json!({
                    "name": "Nome Curto",
                    "email": "curto@example.com",
                    "password": "Senha@123"
                })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"]["name"].is_array());
    }

    #[tokio::test]
    async fn unknown_sort_field_is_400() {
        let app = build_router(state_with(MockUserStore::new(), MockStoreDirectory::new(), MockRatingLedger::new()));
        let token = token_for(Role::Admin);
        let (status, body) = send(
            app,
            request(Method::GET, "/api/admin/users?sort=password_hash:asc", Some(&token), None),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("password_hash"));
    }

    fn empty_state() -> AppState {
        state_with(MockUserStore::new(), MockStoreDirectory::new(), MockRatingLedger::new())
    }

    fn assert_json_400(status: StatusCode, body: &Value) {
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string(), "esperava {{error}}, veio {}", body);
    }

    #[tokio::test]
    async fn fractional_rating_is_a_json_400() {
        let token = token_for(Role::User);
        let (status, body) = send(
            build_router(empty_state()),
            request(
                Method::POST,
                "/api/user/ratings",
                Some(&token),
                Some(json!({ "store_id": uuid::Uuid::new_v4(), "rating": 3.5 })),
            ),
        )
        .await;

        assert_json_400(status, &body);
    }

    #[tokio::test]
    async fn rating_without_store_id_is_a_json_400() {
        let token = token_for(Role::User);
        let (status, body) = send(
            build_router(empty_state()),
            request(Method::POST, "/api/user/ratings", Some(&token), Some(json!({ "rating": 3 }))),
        )
        .await;

        assert_json_400(status, &body);
    }

    #[tokio::test]
    async fn malformed_store_id_in_the_path_is_a_json_400() {
        let token = token_for(Role::User);
        let (status, body) = send(
            build_router(empty_state()),
            request(
                Method::PATCH,
                "/api/user/ratings/nao-e-uuid",
                Some(&token),
                Some(json!({ "rating": 3 })),
            ),
        )
        .await;

        assert_json_400(status, &body);
    }

    #[tokio::test]
    async fn unknown_role_filter_is_a_json_400() {
        let token = token_for(Role::Admin);
        let (status, body) = send(
            build_router(empty_state()),
            request(Method::GET, "/api/admin/users?role=superuser", Some(&token), None),
        )
        .await;

        assert_json_400(status, &body);
    }

    #[tokio::test]
    async fn creating_a_user_with_an_unknown_role_is_a_json_400() {
        let token = token_for(Role::Admin);
        let (status, body) = send(
            build_router(empty_state()),
            request(
                Method::POST,
                "/api/admin/users",
                Some(&token),
                Some(json!({
                    "name": "Maria Aparecida da Silva Souza",
                    "email": "maria@example.com",
                    "password": "Senha@123",
                    "role": "superuser"
                })),
            ),
        )
        .await;

        assert_json_400(status, &body);
    }

    #[tokio::test]
    async fn store_without_name_is_a_json_400() {
        let token = token_for(Role::Admin);
        let (status, body) = send(
            build_router(empty_state()),
            request(
                Method::POST,
                "/api/admin/stores",
                Some(&token),
                Some(json!({ "email": "loja@example.com", "owner_id": uuid::Uuid::new_v4() })),
            ),
        )
        .await;

        assert_json_400(status, &body);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let known = stored_user("maria@example.com", "Senha@123", Role::User);
        let mut users = MockUserStore::new();
        users.expect_find_by_email().returning(move |email| {
            Ok((email == "maria@example.com").then(|| known.clone()))
        });
        let app = build_router(state_with(users, MockStoreDirectory::new(), MockRatingLedger::new()));

        let unknown = send(
            app.clone(),
            request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": "ninguem@example.com", "password": "Senha@123" })),
            ),
        )
        .await;
        let wrong = send(
            app,
            request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": "maria@example.com", "password": "Errada@123" })),
            ),
        )
        .await;

        assert_eq!(unknown.0, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown, wrong);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = build_router(state_with(MockUserStore::new(), MockStoreDirectory::new(), MockRatingLedger::new()));
        let (status, body) = send(app, request(Method::GET, "/api-docs/openapi.json", None, None)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/owner/dashboard"].is_object());
    }
}
