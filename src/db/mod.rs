//! Database module: models and schema for the flash card table.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows plus search/insert types
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: the `CardStore` operations

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{CardFilter, CardId, FlashCard, InsertOutcome, NewCard};
pub use schema::SQLITE_INIT;
pub use sqlite::{CardStore, SqlitePool};
