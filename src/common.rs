pub mod error;
pub mod extract;
pub mod sorting;
pub mod validation;
