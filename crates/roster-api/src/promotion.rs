//! Handler for `POST /employees/promote`.
//!
//! Body: [`PromotionRequest`]. Shape errors are reported before the store is
//! touched; eligibility and department errors come back from the store's
//! transaction, which leaves no partial writes.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use roster_core::{
  employee::Employee,
  promotion::{PromotionRequest, validate},
  store::HrStore,
};

use crate::error::ApiError;

/// `POST /employees/promote`: returns the promoted employee.
pub async fn promote<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<PromotionRequest>, JsonRejection>,
) -> Result<Json<Employee>, ApiError>
where
  S: HrStore,
{
  let Json(request) = body?;
  let promotion = validate(request).inspect_err(|e| {
    tracing::warn!(error = %e, "rejected malformed promotion");
  })?;

  let emp_no = promotion.emp_no;
  let employee = store.promote(promotion).await.map_err(|e| {
    let e = ApiError::from_store(e);
    tracing::warn!(%emp_no, error = %e, "promotion refused");
    e
  })?;

  Ok(Json(employee))
}
