//! Persistence gateway: schema management and row-level access to SQLite.

pub mod gateway;
pub mod schema;

pub use schema::{ensure_schema, TABLES};
