//! Persistence layer: async key-value storage for drafts and preferences.

pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlStore;
pub use memory::MemoryStore;
pub use traits::{KeyValueStore, decode_record, keys};
