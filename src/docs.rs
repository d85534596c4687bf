// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::update_password,

        // --- Admin ---
        handlers::admin::get_dashboard,
        handlers::admin::list_users,
        handlers::admin::get_user,
        handlers::admin::create_user,
        handlers::admin::list_stores,
        handlers::admin::create_store,

        // --- Owner ---
        handlers::owner::get_dashboard,

        // --- User ---
        handlers::user::list_stores,
        handlers::user::list_my_ratings,
        handlers::user::submit_rating,
        handlers::user::update_rating,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::UserProfile,
            models::auth::UserSummary,
            models::auth::SignupPayload,
            models::auth::CreateUserPayload,
            models::auth::LoginPayload,
            models::auth::UpdatePasswordPayload,
            models::auth::AuthResponse,
            models::auth::UserCreatedResponse,
            models::auth::MessageResponse,

            // --- Stores ---
            models::store::Store,
            models::store::StoreWithRating,
            models::store::UserStoreView,
            models::store::CreateStorePayload,
            models::store::StoreCreatedResponse,

            // --- Ratings ---
            models::rating::Rating,
            models::rating::RatingWithRater,
            models::rating::RatingWithStore,
            models::rating::AverageRating,
            models::rating::SubmitRatingPayload,
            models::rating::UpdateRatingPayload,
            models::rating::RatingResponse,

            // --- Dashboard ---
            models::dashboard::AdminDashboard,
            models::dashboard::OwnerStoreSummary,
            models::dashboard::OwnerDashboard,
            models::dashboard::UserDetail,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro, login e troca de senha"),
        (name = "Admin", description = "Gestão de usuários e lojas"),
        (name = "Owner", description = "Painel do dono de loja"),
        (name = "User", description = "Lojas e avaliações do usuário comum")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/auth/signup",
            "/api/auth/login",
            "/api/auth/update-password",
            "/api/admin/dashboard",
            "/api/admin/users",
            "/api/admin/users/{id}",
            "/api/admin/stores",
            "/api/owner/dashboard",
            "/api/user/stores",
            "/api/user/ratings",
            "/api/user/ratings/{storeId}",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "faltando {}", expected);
        }
    }
}
