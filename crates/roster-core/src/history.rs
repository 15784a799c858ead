//! The four per-employee history streams.
//!
//! Rows are append-only. The only mutation ever applied to a stored row is
//! closing it, i.e. replacing its [`SENTINEL`](crate::temporal::SENTINEL)
//! end date with a real one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  ids::{DeptNo, EmpNo},
  temporal::Interval,
};

/// Identifies one of the four history streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
  Salary,
  Title,
  Department,
  Manager,
}

impl Stream {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Salary => "salary",
      Self::Title => "title",
      Self::Department => "department",
      Self::Manager => "manager",
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// One salary period. Keyed by `(emp_no, from_date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecord {
  pub emp_no:    EmpNo,
  pub from_date: NaiveDate,
  pub salary:    u32,
  pub to_date:   NaiveDate,
}

/// One job-title period. Keyed by `(emp_no, title, from_date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleRecord {
  pub emp_no:    EmpNo,
  pub title:     String,
  pub from_date: NaiveDate,
  pub to_date:   NaiveDate,
}

/// Membership of a department over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentAssignment {
  pub emp_no:    EmpNo,
  pub dept_no:   DeptNo,
  pub from_date: NaiveDate,
  pub to_date:   NaiveDate,
}

/// Management of a department over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerAssignment {
  pub emp_no:    EmpNo,
  pub dept_no:   DeptNo,
  pub from_date: NaiveDate,
  pub to_date:   NaiveDate,
}

macro_rules! impl_interval {
  ($($ty:ty),+ $(,)?) => {$(
    impl Interval for $ty {
      fn from_date(&self) -> NaiveDate { self.from_date }

      fn to_date(&self) -> NaiveDate { self.to_date }

      fn with_to_date(self, to_date: NaiveDate) -> Self {
        Self { to_date, ..self }
      }
    }
  )+};
}

impl_interval!(
  SalaryRecord,
  TitleRecord,
  DepartmentAssignment,
  ManagerAssignment,
);
