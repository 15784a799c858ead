//! Handlers for `/employees` read endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/employees/by-department` | `?deptNo=d005[&page=1]`; 20 per page |
//! | `GET`  | `/employees/:emp_no` | 400 if not a positive integer, 404 if not found |
//! | `GET`  | `/employees/:emp_no/history` | Employee plus all four history streams |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::QueryRejection},
};
use roster_core::{
  employee::{Employee, EmployeeHistory, EmployeeRecord},
  ids::{DeptNo, EmpNo, Page},
  store::HrStore,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /employees/:emp_no`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(raw): Path<String>,
) -> Result<Json<Employee>, ApiError>
where
  S: HrStore,
{
  let emp_no = EmpNo::parse(&raw)?;
  let employee = store
    .get_employee(emp_no)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("employee {emp_no} not found")))?;
  Ok(Json(employee))
}

/// `GET /employees/:emp_no/history`
pub async fn history<S>(
  State(store): State<Arc<S>>,
  Path(raw): Path<String>,
) -> Result<Json<EmployeeHistory>, ApiError>
where
  S: HrStore,
{
  let emp_no = EmpNo::parse(&raw)?;
  let history = store
    .employee_history(emp_no)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("employee {emp_no} not found")))?;
  Ok(Json(history))
}

// ─── By department ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByDepartmentParams {
  pub dept_no: Option<String>,
  /// 1-indexed; defaults to the first page.
  pub page:    Option<i64>,
}

/// `GET /employees/by-department?deptNo=<code>[&page=<n>]`
pub async fn by_department<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<ByDepartmentParams>, QueryRejection>,
) -> Result<Json<Vec<EmployeeRecord>>, ApiError>
where
  S: HrStore,
{
  let Query(params) = params?;

  let dept_no = match params.dept_no.as_deref().map(str::trim) {
    None | Some("") => {
      return Err(ApiError::BadRequest(
        "Query parameter 'deptNo' is required".to_owned(),
      ));
    }
    Some(raw) => DeptNo::parse(raw)?,
  };
  let page = params.page.map(Page::new).transpose()?.unwrap_or_default();

  let employees = store
    .employees_by_department(dept_no, page)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(employees))
}
