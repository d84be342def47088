pub mod database;
pub mod environment;

pub use database::{init_db, init_memory_db, DbPool};
pub use environment::Config;
