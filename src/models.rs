pub mod auth;
pub mod dashboard;
pub mod rating;
pub mod store;
