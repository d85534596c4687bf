pub mod aggregation;
pub mod auth;
pub mod dashboard_service;
pub mod rating_service;
pub mod store_service;
pub mod user_service;
