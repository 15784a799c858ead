//! Error types for `roster-core`.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::ids::{DeptNo, EmpNo};

/// Coarse classification of a failure, used by boundary layers to pick a
/// transport-level status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  MalformedInput,
  NotFound,
  BusinessRuleViolation,
  StorageFailure,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Malformed(String),

  #[error("employee not found: {0}")]
  EmployeeNotFound(EmpNo),

  #[error("department not found: {0}")]
  DepartmentNotFound(DeptNo),

  #[error("cannot promote employee {0}: employee has already left the company")]
  EmployeeInactive(EmpNo),

  #[error("fromDate must be after latest existing date: {latest}")]
  NotAfterLatest {
    requested: NaiveDate,
    latest:    NaiveDate,
  },

  /// Closing a record on `to_date` would end it before it started.
  #[error("closing record starting {from_date} on {to_date} gives an empty interval")]
  InvalidInterval {
    from_date: NaiveDate,
    to_date:   NaiveDate,
  },
}

impl Error {
  pub fn malformed(message: impl Into<String>) -> Self {
    Self::Malformed(message.into())
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Malformed(_) => ErrorKind::MalformedInput,
      Self::EmployeeNotFound(_) | Self::DepartmentNotFound(_) => {
        ErrorKind::NotFound
      }
      Self::EmployeeInactive(_)
      | Self::NotAfterLatest { .. }
      | Self::InvalidInterval { .. } => ErrorKind::BusinessRuleViolation,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
