//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: keyed CRUD over users and books

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{Book, DbUser, NewBook};
pub use schema::SQLITE_INIT;
pub use sqlite::{BookStorage, SqlitePool};
