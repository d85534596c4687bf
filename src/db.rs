pub mod user_repo;
pub use user_repo::{UserRepository, UserStore};
pub mod store_repo;
pub use store_repo::{StoreDirectory, StoreRepository};
pub mod rating_repo;
pub use rating_repo::{RatingLedger, RatingRepository};
