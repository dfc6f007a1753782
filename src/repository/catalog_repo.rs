// ==========================================
// Price Catalog - Catalog sink trait
// ==========================================
// The storefront database the finalized catalog is published to.
// Implementations do data access only, no pricing rules.
// ==========================================

use crate::domain::product::CatalogRow;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Replaces the whole product table with `rows` (truncate and reload).
    ///
    /// # Returns
    /// - Ok(usize): rows written
    /// - Err: nothing was changed (the transaction is rolled back)
    async fn replace_all(&self, rows: &[CatalogRow]) -> RepositoryResult<usize>;

    async fn count(&self) -> RepositoryResult<usize>;

    async fn count_manufacturers(&self) -> RepositoryResult<usize>;

    /// Rows of one manufacturer, ordered by article then insertion
    async fn list_by_manufacturer(&self, manufacturer: &str) -> RepositoryResult<Vec<CatalogRow>>;
}
