//! SQLite backend for the Roster HR record store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Promotions run inside a single
//! `BEGIN IMMEDIATE` transaction.

mod encode;
mod execute;
mod schema;
mod sql;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
