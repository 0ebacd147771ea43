pub mod connection;
pub mod repository;
pub mod settings_repository;
pub mod storage;
