mod repository;

pub use repository::*;

/// SQL migration for the key-value table
pub const MIGRATION_001_KV_STORE: &str = include_str!("migrations/001_kv_store.sql");

/// Key holding the JSON array of transactions
pub const TRANSACTIONS_KEY: &str = "transactions";

/// Key holding the signed-in user
pub const USER_KEY: &str = "user";
