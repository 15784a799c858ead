//! Handlers for `/departments` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/departments` | Ordered by `deptNo` |
//! | `GET`  | `/department` | Alias of `/departments` |
//! | `GET`  | `/departments/:dept_no` | 400 on a malformed code, 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use roster_core::{employee::Department, ids::DeptNo, store::HrStore};

use crate::error::ApiError;

/// `GET /departments`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Department>>, ApiError>
where
  S: HrStore,
{
  let departments = store
    .list_departments()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(departments))
}

/// `GET /departments/:dept_no`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(raw): Path<String>,
) -> Result<Json<Department>, ApiError>
where
  S: HrStore,
{
  let dept_no = DeptNo::parse(&raw)?;
  let department = store
    .get_department(dept_no.clone())
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("department {dept_no} not found")))?;
  Ok(Json(department))
}
