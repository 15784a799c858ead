//! The `HrStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-api`, `roster-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  Error, ErrorKind,
  employee::{Department, Employee, EmployeeHistory, EmployeeRecord},
  ids::{DeptNo, EmpNo, Page},
  promotion::Promotion,
};

/// Implemented by backend error types so boundary layers can recover the
/// domain failure, if any, behind a storage error.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The wrapped domain error, or `None` for a storage failure.
  fn as_domain(&self) -> Option<&Error>;

  fn kind(&self) -> ErrorKind {
    self.as_domain().map_or(ErrorKind::StorageFailure, Error::kind)
  }
}

/// Abstraction over an HR record backend.
///
/// History streams are append-only. The single write path is
/// [`HrStore::promote`], which must apply all of its writes atomically.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait HrStore: Send + Sync {
  type Error: StoreError;

  // ── Departments ───────────────────────────────────────────────────────

  /// All departments, ordered by `dept_no` ascending.
  fn list_departments(
    &self,
  ) -> impl Future<Output = Result<Vec<Department>, Self::Error>> + Send + '_;

  fn get_department(
    &self,
    dept_no: DeptNo,
  ) -> impl Future<Output = Result<Option<Department>, Self::Error>> + Send + '_;

  // ── Employees ─────────────────────────────────────────────────────────

  /// Retrieve an employee by number. Returns `None` if not found.
  fn get_employee(
    &self,
    emp_no: EmpNo,
  ) -> impl Future<Output = Result<Option<Employee>, Self::Error>> + Send + '_;

  /// One page of employees who have ever been assigned to `dept_no`,
  /// ordered by `emp_no` ascending, [`PAGE_SIZE`](crate::ids::PAGE_SIZE)
  /// rows per page.
  fn employees_by_department(
    &self,
    dept_no: DeptNo,
    page: Page,
  ) -> impl Future<Output = Result<Vec<EmployeeRecord>, Self::Error>> + Send + '_;

  /// Materialise an employee with all four history streams. Returns `None`
  /// if the employee does not exist.
  fn employee_history(
    &self,
    emp_no: EmpNo,
  ) -> impl Future<Output = Result<Option<EmployeeHistory>, Self::Error>> + Send + '_;

  // ── Promotion ─────────────────────────────────────────────────────────

  /// Apply a validated promotion as one transaction.
  ///
  /// Fails with [`Error::EmployeeNotFound`], [`Error::EmployeeInactive`],
  /// [`Error::NotAfterLatest`] or [`Error::DepartmentNotFound`] (wrapped in
  /// the backend error) without leaving any partial writes behind.
  fn promote(
    &self,
    promotion: Promotion,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;
}
