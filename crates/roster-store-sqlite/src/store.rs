//! [`SqliteStore`], the SQLite implementation of [`HrStore`].

use std::path::Path;

use roster_core::{
  employee::{Department, Employee, EmployeeHistory, EmployeeRecord},
  history::{DepartmentAssignment, ManagerAssignment, SalaryRecord, TitleRecord},
  ids::{DeptNo, EmpNo, Page},
  promotion::Promotion,
  store::HrStore,
};
use rusqlite::TransactionBehavior;

use crate::{Result, execute, schema::SCHEMA, sql};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An HR record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls
/// on one store are serialised on the connection's worker thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Seeding ─────────────────────────────────────────────────────────────
  //
  // Onboarding lives outside this service; these exist so fixtures and
  // bulk loads can populate a store. They bypass promotion rules.

  pub async fn add_department(&self, dept: Department) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(sql::insert_department(conn, &dept)))
      .await?
  }

  pub async fn add_employee(&self, employee: Employee) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(sql::insert_employee(conn, &employee)))
      .await?
  }

  pub async fn add_salary(&self, record: SalaryRecord) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(sql::insert_salary(conn, &record)))
      .await?
  }

  pub async fn add_title(&self, record: TitleRecord) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(sql::insert_title(conn, &record)))
      .await?
  }

  pub async fn add_department_assignment(
    &self,
    record: DepartmentAssignment,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(sql::insert_department_assignment(conn, &record)))
      .await?
  }

  pub async fn add_manager_assignment(
    &self,
    record: ManagerAssignment,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(sql::insert_manager_assignment(conn, &record)))
      .await?
  }
}

// ─── HrStore impl ────────────────────────────────────────────────────────────

impl HrStore for SqliteStore {
  type Error = crate::Error;

  // ── Departments ───────────────────────────────────────────────────────────

  async fn list_departments(&self) -> Result<Vec<Department>> {
    self
      .conn
      .call(|conn| Ok(sql::list_departments(conn)))
      .await?
  }

  async fn get_department(&self, dept_no: DeptNo) -> Result<Option<Department>> {
    self
      .conn
      .call(move |conn| Ok(sql::get_department(conn, &dept_no)))
      .await?
  }

  // ── Employees ─────────────────────────────────────────────────────────────

  async fn get_employee(&self, emp_no: EmpNo) -> Result<Option<Employee>> {
    self
      .conn
      .call(move |conn| Ok(sql::get_employee(conn, emp_no)))
      .await?
  }

  async fn employees_by_department(
    &self,
    dept_no: DeptNo,
    page: Page,
  ) -> Result<Vec<EmployeeRecord>> {
    let employees = self
      .conn
      .call(move |conn| Ok(sql::employees_by_department(conn, &dept_no, page)))
      .await??;
    Ok(employees.iter().map(EmployeeRecord::from).collect())
  }

  async fn employee_history(
    &self,
    emp_no: EmpNo,
  ) -> Result<Option<EmployeeHistory>> {
    self
      .conn
      .call(move |conn| Ok(sql::load_history(conn, emp_no)))
      .await?
  }

  // ── Promotion ─────────────────────────────────────────────────────────────

  async fn promote(&self, promotion: Promotion) -> Result<Employee> {
    let emp_no = promotion.emp_no;
    let from_date = promotion.from_date;

    // IMMEDIATE takes the write lock before the snapshot is read, so the
    // eligibility checks and the writes see the same state.
    let employee = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = execute::promote(&tx, &promotion);
        if outcome.is_ok() {
          tx.commit()?;
        }
        Ok(outcome)
      })
      .await??;

    tracing::info!(%emp_no, %from_date, "promotion committed");
    Ok(employee)
  }
}
