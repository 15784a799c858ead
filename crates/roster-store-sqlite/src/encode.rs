//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text so that lexical and chronological
//! order agree. Employee numbers and salaries are stored as integers.

use chrono::NaiveDate;
use roster_core::{
  employee::{Department, Employee},
  history::{DepartmentAssignment, ManagerAssignment, SalaryRecord, TitleRecord},
  ids::{DeptNo, EmpNo},
};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Identifiers ─────────────────────────────────────────────────────────────

pub fn decode_emp_no(raw: i64) -> Result<EmpNo> {
  EmpNo::new(raw).map_err(|_| Error::Corrupt(format!("employee number {raw}")))
}

pub fn decode_dept_no(s: &str) -> Result<DeptNo> {
  DeptNo::parse(s).map_err(|_| Error::Corrupt(format!("department code {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `employees` row.
pub struct RawEmployee {
  pub emp_no:     i64,
  pub birth_date: String,
  pub first_name: String,
  pub last_name:  String,
  pub gender:     String,
  pub hire_date:  String,
}

impl RawEmployee {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      emp_no:     row.get(0)?,
      birth_date: row.get(1)?,
      first_name: row.get(2)?,
      last_name:  row.get(3)?,
      gender:     row.get(4)?,
      hire_date:  row.get(5)?,
    })
  }

  pub fn into_employee(self) -> Result<Employee> {
    Ok(Employee {
      emp_no:     decode_emp_no(self.emp_no)?,
      birth_date: decode_date(&self.birth_date)?,
      first_name: self.first_name,
      last_name:  self.last_name,
      gender:     self.gender,
      hire_date:  decode_date(&self.hire_date)?,
    })
  }
}

/// Raw values read directly from a `departments` row.
pub struct RawDepartment {
  pub dept_no:   String,
  pub dept_name: String,
}

impl RawDepartment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { dept_no: row.get(0)?, dept_name: row.get(1)? })
  }

  pub fn into_department(self) -> Result<Department> {
    Ok(Department {
      dept_no:   decode_dept_no(&self.dept_no)?,
      dept_name: self.dept_name,
    })
  }
}

pub struct RawSalary {
  pub emp_no:    i64,
  pub salary:    i64,
  pub from_date: String,
  pub to_date:   String,
}

impl RawSalary {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      emp_no:    row.get(0)?,
      salary:    row.get(1)?,
      from_date: row.get(2)?,
      to_date:   row.get(3)?,
    })
  }

  pub fn into_record(self) -> Result<SalaryRecord> {
    Ok(SalaryRecord {
      emp_no:    decode_emp_no(self.emp_no)?,
      salary:    u32::try_from(self.salary)
        .map_err(|_| Error::Corrupt(format!("salary {}", self.salary)))?,
      from_date: decode_date(&self.from_date)?,
      to_date:   decode_date(&self.to_date)?,
    })
  }
}

pub struct RawTitle {
  pub emp_no:    i64,
  pub title:     String,
  pub from_date: String,
  pub to_date:   String,
}

impl RawTitle {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      emp_no:    row.get(0)?,
      title:     row.get(1)?,
      from_date: row.get(2)?,
      to_date:   row.get(3)?,
    })
  }

  pub fn into_record(self) -> Result<TitleRecord> {
    Ok(TitleRecord {
      emp_no:    decode_emp_no(self.emp_no)?,
      title:     self.title,
      from_date: decode_date(&self.from_date)?,
      to_date:   decode_date(&self.to_date)?,
    })
  }
}

/// Raw values from either assignment table (`dept_emp`, `dept_manager`);
/// both share one shape.
pub struct RawAssignment {
  pub emp_no:    i64,
  pub dept_no:   String,
  pub from_date: String,
  pub to_date:   String,
}

impl RawAssignment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      emp_no:    row.get(0)?,
      dept_no:   row.get(1)?,
      from_date: row.get(2)?,
      to_date:   row.get(3)?,
    })
  }

  fn decode(self) -> Result<(EmpNo, DeptNo, NaiveDate, NaiveDate)> {
    Ok((
      decode_emp_no(self.emp_no)?,
      decode_dept_no(&self.dept_no)?,
      decode_date(&self.from_date)?,
      decode_date(&self.to_date)?,
    ))
  }

  pub fn into_department_assignment(self) -> Result<DepartmentAssignment> {
    let (emp_no, dept_no, from_date, to_date) = self.decode()?;
    Ok(DepartmentAssignment { emp_no, dept_no, from_date, to_date })
  }

  pub fn into_manager_assignment(self) -> Result<ManagerAssignment> {
    let (emp_no, dept_no, from_date, to_date) = self.decode()?;
    Ok(ManagerAssignment { emp_no, dept_no, from_date, to_date })
  }
}
