//! Employees, departments and the read models assembled from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  history::{DepartmentAssignment, ManagerAssignment, SalaryRecord, TitleRecord},
  ids::{DeptNo, EmpNo},
};

/// The identity record of an employee. Created by onboarding, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
  pub emp_no:     EmpNo,
  pub birth_date: NaiveDate,
  pub first_name: String,
  pub last_name:  String,
  pub gender:     String,
  pub hire_date:  NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
  pub dept_no:   DeptNo,
  pub dept_name: String,
}

/// Row returned by the employees-by-department listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
  pub emp_no:     EmpNo,
  pub first_name: String,
  pub last_name:  String,
  pub hire_date:  NaiveDate,
}

impl From<&Employee> for EmployeeRecord {
  fn from(e: &Employee) -> Self {
    Self {
      emp_no:     e.emp_no,
      first_name: e.first_name.clone(),
      last_name:  e.last_name.clone(),
      hire_date:  e.hire_date,
    }
  }
}

/// An employee together with every stream, each ordered by `from_date`.
///
/// Computed on read; relationships are resolved by key, so no record holds
/// a pointer back to its employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeHistory {
  pub employee:    Employee,
  pub salaries:    Vec<SalaryRecord>,
  pub titles:      Vec<TitleRecord>,
  pub departments: Vec<DepartmentAssignment>,
  pub managed:     Vec<ManagerAssignment>,
}
