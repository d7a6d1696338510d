pub mod memory;
pub mod postgrest;
pub mod query;
pub mod store;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;
pub use query::{Filter, Query, Table};
pub use store::{StoreError, TableStore};
