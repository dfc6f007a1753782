// ==========================================
// Price Catalog - Repository layer
// ==========================================
// Data access only; parameterized SQL everywhere.
// ==========================================

pub mod catalog_repo;
pub mod catalog_repo_impl;
pub mod error;
pub mod name_cache_repo;

pub use catalog_repo::CatalogRepository;
pub use catalog_repo_impl::CatalogRepositoryImpl;
pub use error::{RepositoryError, RepositoryResult};
pub use name_cache_repo::NameCacheRepository;
