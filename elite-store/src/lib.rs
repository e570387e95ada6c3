pub mod app_config;
pub mod seed;
pub mod memory;
pub mod database;
pub mod pg_store;

pub use app_config::{Config, StorageBackend};
pub use seed::SeedData;
pub use memory::MemoryStore;
pub use database::DbClient;
pub use pg_store::PgStore;
