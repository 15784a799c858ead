//! Core types and trait definitions for the Roster HR record service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Validation and promotion planning are pure functions here; storage
//! backends apply the resulting plans transactionally.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod employee;
pub mod error;
pub mod history;
pub mod ids;
pub mod promotion;
pub mod store;
pub mod temporal;

pub use error::{Error, ErrorKind, Result};
