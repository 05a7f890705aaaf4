// storefront/src/services/mod.rs
pub mod file_store;
pub mod http_backend;

pub use file_store::JsonFileStore;
pub use http_backend::HttpBackend;
