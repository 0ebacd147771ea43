pub mod add;
pub mod aggregate;
pub mod dashboard;
pub mod export;
pub mod summary;
