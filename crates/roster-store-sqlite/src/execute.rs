//! Applies a promotion inside an open transaction.
//!
//! The caller owns the transaction: it commits on `Ok` and drops (rolling
//! back) on `Err`, so a failure at any step discards every earlier write.

use roster_core::{
  employee::Employee,
  history::Stream,
  promotion::{Promotion, Rollover, check_eligibility, plan},
};
use rusqlite::Connection;

use crate::{Result, sql};

/// Close then open, in that order, so the stream never holds two open rows.
fn apply<R>(
  conn: &Connection,
  stream: Stream,
  rollover: &Rollover<R>,
  close: fn(&Connection, &R) -> Result<()>,
  insert: fn(&Connection, &R) -> Result<()>,
) -> Result<()> {
  for record in &rollover.close {
    close(conn, record)?;
  }
  if let Some(record) = &rollover.open {
    insert(conn, record)?;
  }
  tracing::debug!(
    stream = stream.as_str(),
    closed = rollover.close.len(),
    opened = rollover.open.is_some(),
    "rolled over stream"
  );
  Ok(())
}

/// Validate `promotion` against the stored history and apply it.
///
/// Order: salary, title, department, manager. The target department is
/// only resolved at the department step, so an unknown department aborts
/// after the salary and title writes and relies on rollback.
pub fn promote(conn: &Connection, promotion: &Promotion) -> Result<Employee> {
  let history = sql::load_history(conn, promotion.emp_no)?
    .ok_or(roster_core::Error::EmployeeNotFound(promotion.emp_no))?;

  check_eligibility(&history, promotion.from_date)?;
  let plan = plan(&history, promotion)?;

  apply(conn, Stream::Salary, &plan.salary, sql::close_salary, sql::insert_salary)?;
  apply(conn, Stream::Title, &plan.title, sql::close_title, sql::insert_title)?;

  if sql::get_department(conn, &plan.dept_no)?.is_none() {
    return Err(roster_core::Error::DepartmentNotFound(plan.dept_no).into());
  }
  apply(
    conn,
    Stream::Department,
    &plan.department,
    sql::close_department_assignment,
    sql::insert_department_assignment,
  )?;

  if let Some(manager) = &plan.manager {
    apply(
      conn,
      Stream::Manager,
      manager,
      sql::close_manager_assignment,
      sql::insert_manager_assignment,
    )?;
  }

  Ok(history.employee)
}
