pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod schema;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use repository::PgStore;
pub use schema::ensure_schema;
pub use store::Store;
