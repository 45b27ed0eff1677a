pub mod notion;
pub mod traits;
pub mod types;

pub use notion::NotionClient;
pub use traits::RecordStore;
pub use types::{Properties, PropertyValue, RecordId, StoreError};
