//! Synchronous statements over a [`rusqlite::Connection`].
//!
//! Everything here runs inside a `tokio_rusqlite` call, either directly on
//! the connection or on an open transaction (which derefs to one).

use roster_core::{
  employee::{Department, Employee, EmployeeHistory},
  history::{DepartmentAssignment, ManagerAssignment, SalaryRecord, TitleRecord},
  ids::{DeptNo, EmpNo, PAGE_SIZE, Page},
};
use rusqlite::{Connection, OptionalExtension as _, params};

use crate::{
  Error, Result,
  encode::{
    RawAssignment, RawDepartment, RawEmployee, RawSalary, RawTitle, encode_date,
  },
};

const EMPLOYEE_COLUMNS: &str =
  "emp_no, birth_date, first_name, last_name, gender, hire_date";

/// The two tables that share the assignment shape.
#[derive(Debug, Clone, Copy)]
enum AssignmentTable {
  DeptEmp,
  DeptManager,
}

impl AssignmentTable {
  fn name(self) -> &'static str {
    match self {
      Self::DeptEmp => "dept_emp",
      Self::DeptManager => "dept_manager",
    }
  }
}

/// Fail unless an UPDATE touched exactly one row.
fn expect_one(changed: usize, what: &str) -> Result<()> {
  if changed == 1 {
    Ok(())
  } else {
    Err(Error::Corrupt(format!("expected to close one {what} row, closed {changed}")))
  }
}

// ─── Employees & departments ─────────────────────────────────────────────────

pub fn insert_employee(conn: &Connection, e: &Employee) -> Result<()> {
  conn.execute(
    "INSERT INTO employees (emp_no, birth_date, first_name, last_name, gender, hire_date)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      e.emp_no.get(),
      encode_date(e.birth_date),
      e.first_name,
      e.last_name,
      e.gender,
      encode_date(e.hire_date),
    ],
  )?;
  Ok(())
}

pub fn insert_department(conn: &Connection, d: &Department) -> Result<()> {
  conn.execute(
    "INSERT INTO departments (dept_no, dept_name) VALUES (?1, ?2)",
    params![d.dept_no.as_str(), d.dept_name],
  )?;
  Ok(())
}

pub fn get_employee(conn: &Connection, emp_no: EmpNo) -> Result<Option<Employee>> {
  let raw = conn
    .query_row(
      &format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE emp_no = ?1"),
      params![emp_no.get()],
      RawEmployee::from_row,
    )
    .optional()?;
  raw.map(RawEmployee::into_employee).transpose()
}

pub fn get_department(
  conn: &Connection,
  dept_no: &DeptNo,
) -> Result<Option<Department>> {
  let raw = conn
    .query_row(
      "SELECT dept_no, dept_name FROM departments WHERE dept_no = ?1",
      params![dept_no.as_str()],
      RawDepartment::from_row,
    )
    .optional()?;
  raw.map(RawDepartment::into_department).transpose()
}

pub fn list_departments(conn: &Connection) -> Result<Vec<Department>> {
  let mut stmt =
    conn.prepare("SELECT dept_no, dept_name FROM departments ORDER BY dept_no ASC")?;
  let raws = stmt
    .query_map([], RawDepartment::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawDepartment::into_department).collect()
}

/// Employees with any assignment (current or past) to `dept_no`.
pub fn employees_by_department(
  conn: &Connection,
  dept_no: &DeptNo,
  page: Page,
) -> Result<Vec<Employee>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {EMPLOYEE_COLUMNS}
     FROM employees e
     WHERE EXISTS (
       SELECT 1 FROM dept_emp de
       WHERE de.emp_no = e.emp_no AND de.dept_no = ?1
     )
     ORDER BY e.emp_no ASC
     LIMIT ?2 OFFSET ?3"
  ))?;
  let raws = stmt
    .query_map(
      params![dept_no.as_str(), PAGE_SIZE, page.offset() as i64],
      RawEmployee::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawEmployee::into_employee).collect()
}

// ─── History reads ───────────────────────────────────────────────────────────

fn salaries(conn: &Connection, emp_no: EmpNo) -> Result<Vec<SalaryRecord>> {
  let mut stmt = conn.prepare(
    "SELECT emp_no, salary, from_date, to_date FROM salaries
     WHERE emp_no = ?1 ORDER BY from_date ASC",
  )?;
  let raws = stmt
    .query_map(params![emp_no.get()], RawSalary::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawSalary::into_record).collect()
}

fn titles(conn: &Connection, emp_no: EmpNo) -> Result<Vec<TitleRecord>> {
  let mut stmt = conn.prepare(
    "SELECT emp_no, title, from_date, to_date FROM titles
     WHERE emp_no = ?1 ORDER BY from_date ASC",
  )?;
  let raws = stmt
    .query_map(params![emp_no.get()], RawTitle::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawTitle::into_record).collect()
}

fn assignments(
  conn: &Connection,
  table: AssignmentTable,
  emp_no: EmpNo,
) -> Result<Vec<RawAssignment>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT emp_no, dept_no, from_date, to_date FROM {}
     WHERE emp_no = ?1 ORDER BY from_date ASC",
    table.name()
  ))?;
  let raws = stmt
    .query_map(params![emp_no.get()], RawAssignment::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(raws)
}

/// Load an employee and all four streams. `None` if the employee is absent.
pub fn load_history(
  conn: &Connection,
  emp_no: EmpNo,
) -> Result<Option<EmployeeHistory>> {
  let Some(employee) = get_employee(conn, emp_no)? else {
    return Ok(None);
  };

  let departments = assignments(conn, AssignmentTable::DeptEmp, emp_no)?
    .into_iter()
    .map(RawAssignment::into_department_assignment)
    .collect::<Result<_>>()?;
  let managed = assignments(conn, AssignmentTable::DeptManager, emp_no)?
    .into_iter()
    .map(RawAssignment::into_manager_assignment)
    .collect::<Result<_>>()?;

  Ok(Some(EmployeeHistory {
    employee,
    salaries: salaries(conn, emp_no)?,
    titles: titles(conn, emp_no)?,
    departments,
    managed,
  }))
}

// ─── History writes ──────────────────────────────────────────────────────────

pub fn insert_salary(conn: &Connection, r: &SalaryRecord) -> Result<()> {
  conn.execute(
    "INSERT INTO salaries (emp_no, salary, from_date, to_date) VALUES (?1, ?2, ?3, ?4)",
    params![r.emp_no.get(), r.salary, encode_date(r.from_date), encode_date(r.to_date)],
  )?;
  Ok(())
}

/// Persist the (new) `to_date` of an existing salary row.
pub fn close_salary(conn: &Connection, r: &SalaryRecord) -> Result<()> {
  let changed = conn.execute(
    "UPDATE salaries SET to_date = ?3 WHERE emp_no = ?1 AND from_date = ?2",
    params![r.emp_no.get(), encode_date(r.from_date), encode_date(r.to_date)],
  )?;
  expect_one(changed, "salary")
}

pub fn insert_title(conn: &Connection, r: &TitleRecord) -> Result<()> {
  conn.execute(
    "INSERT INTO titles (emp_no, title, from_date, to_date) VALUES (?1, ?2, ?3, ?4)",
    params![r.emp_no.get(), r.title, encode_date(r.from_date), encode_date(r.to_date)],
  )?;
  Ok(())
}

pub fn close_title(conn: &Connection, r: &TitleRecord) -> Result<()> {
  let changed = conn.execute(
    "UPDATE titles SET to_date = ?4 WHERE emp_no = ?1 AND title = ?2 AND from_date = ?3",
    params![r.emp_no.get(), r.title, encode_date(r.from_date), encode_date(r.to_date)],
  )?;
  expect_one(changed, "title")
}

fn insert_assignment(
  conn: &Connection,
  table: AssignmentTable,
  fields: (EmpNo, &DeptNo, chrono::NaiveDate, chrono::NaiveDate),
) -> Result<()> {
  let (emp_no, dept_no, from_date, to_date) = fields;
  conn.execute(
    &format!(
      "INSERT INTO {} (emp_no, dept_no, from_date, to_date) VALUES (?1, ?2, ?3, ?4)",
      table.name()
    ),
    params![emp_no.get(), dept_no.as_str(), encode_date(from_date), encode_date(to_date)],
  )?;
  Ok(())
}

fn close_assignment(
  conn: &Connection,
  table: AssignmentTable,
  fields: (EmpNo, &DeptNo, chrono::NaiveDate, chrono::NaiveDate),
) -> Result<()> {
  let (emp_no, dept_no, from_date, to_date) = fields;
  let changed = conn.execute(
    &format!(
      "UPDATE {} SET to_date = ?4 WHERE emp_no = ?1 AND dept_no = ?2 AND from_date = ?3",
      table.name()
    ),
    params![emp_no.get(), dept_no.as_str(), encode_date(from_date), encode_date(to_date)],
  )?;
  expect_one(changed, table.name())
}

pub fn insert_department_assignment(
  conn: &Connection,
  r: &DepartmentAssignment,
) -> Result<()> {
  insert_assignment(
    conn,
    AssignmentTable::DeptEmp,
    (r.emp_no, &r.dept_no, r.from_date, r.to_date),
  )
}

pub fn close_department_assignment(
  conn: &Connection,
  r: &DepartmentAssignment,
) -> Result<()> {
  close_assignment(
    conn,
    AssignmentTable::DeptEmp,
    (r.emp_no, &r.dept_no, r.from_date, r.to_date),
  )
}

pub fn insert_manager_assignment(
  conn: &Connection,
  r: &ManagerAssignment,
) -> Result<()> {
  insert_assignment(
    conn,
    AssignmentTable::DeptManager,
    (r.emp_no, &r.dept_no, r.from_date, r.to_date),
  )
}

pub fn close_manager_assignment(
  conn: &Connection,
  r: &ManagerAssignment,
) -> Result<()> {
  close_assignment(
    conn,
    AssignmentTable::DeptManager,
    (r.emp_no, &r.dept_no, r.from_date, r.to_date),
  )
}
