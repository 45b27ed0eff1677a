use crate::store::types::{Properties, RecordId, StoreError};
use async_trait::async_trait;

/// Common trait for record stores that persist enquiries
/// Lets the handler run against Notion in production and a fake in tests
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create exactly one record in the given database.
    /// Not idempotent: calling twice creates two records.
    async fn create_record(
        &self,
        database_id: &str,
        properties: &Properties,
    ) -> Result<RecordId, StoreError>;

    /// Get the name of the backing store
    fn store_name(&self) -> &'static str;
}
