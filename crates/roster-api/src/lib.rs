//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by any [`roster_core::store::HrStore`].
//! CORS, tracing, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(roster_api::api_router(store.clone()))
//! ```

pub mod departments;
pub mod employees;
pub mod error;
pub mod promotion;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use roster_core::store::HrStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: HrStore + 'static,
{
  Router::new()
    // Departments
    .route("/departments", get(departments::list::<S>))
    // Singular path used by existing frontend clients.
    .route("/department", get(departments::list::<S>))
    .route("/departments/{dept_no}", get(departments::get_one::<S>))
    // Employees
    .route("/employees/by-department", get(employees::by_department::<S>))
    .route("/employees/promote", post(promotion::promote::<S>))
    .route("/employees/{emp_no}", get(employees::get_one::<S>))
    .route("/employees/{emp_no}/history", get(employees::history::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
