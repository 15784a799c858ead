//! The promotion workflow: request validation, eligibility, and planning.
//!
//! Everything here is pure. A backend reads an [`EmployeeHistory`] snapshot
//! inside its transaction, runs [`check_eligibility`] and [`plan`] over it,
//! and applies the resulting [`PromotionPlan`] stream by stream.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
  Error, Result,
  employee::EmployeeHistory,
  history::{DepartmentAssignment, ManagerAssignment, SalaryRecord, TitleRecord},
  ids::{DeptNo, EmpNo},
  temporal::{Interval, SENTINEL, close_before, latest_from, open_records},
};

// ─── Request ─────────────────────────────────────────────────────────────────

/// A promotion request as received at the boundary. Nothing here has been
/// checked yet; see [`validate`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRequest {
  pub emp_no:     Option<i64>,
  pub new_title:  Option<String>,
  /// `YYYY-MM-DD`.
  pub from_date:  Option<String>,
  pub new_salary: Option<i64>,
  pub dept_no:    Option<String>,
  #[serde(default)]
  pub manager:    bool,
}

/// A promotion whose shape has been validated and normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
  pub emp_no:       EmpNo,
  pub title:        String,
  pub from_date:    NaiveDate,
  pub salary:       u32,
  pub dept_no:      DeptNo,
  pub make_manager: bool,
}

/// Check the request shape. The first failing field wins, in the order
/// empNo, newTitle, fromDate, newSalary, deptNo. Touches no storage.
pub fn validate(req: PromotionRequest) -> Result<Promotion> {
  let emp_no = req
    .emp_no
    .ok_or_else(|| Error::malformed("empNo must be a positive integer"))
    .and_then(EmpNo::new)?;

  let title = req
    .new_title
    .as_deref()
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .ok_or_else(|| Error::malformed("Title cannot be blank"))?
    .to_owned();

  // `%m` and `%d` accept single digits, so the width is checked first.
  let from_date = req
    .from_date
    .as_deref()
    .map(str::trim)
    .filter(|s| s.len() == 10)
    .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    .ok_or_else(|| Error::malformed("fromDate is required (yyyy-MM-dd)"))?;
  if from_date >= SENTINEL {
    return Err(Error::malformed(format!("fromDate must be before {SENTINEL}")));
  }

  let salary = req
    .new_salary
    .and_then(|s| u32::try_from(s).ok())
    .filter(|s| *s > 0)
    .ok_or_else(|| Error::malformed("salary must be greater than 0"))?;

  let dept_no = req
    .dept_no
    .as_deref()
    .ok_or_else(|| Error::malformed("deptNo is required"))
    .and_then(DeptNo::parse)?;

  Ok(Promotion {
    emp_no,
    title,
    from_date,
    salary,
    dept_no,
    make_manager: req.manager,
  })
}

// ─── Eligibility ─────────────────────────────────────────────────────────────

/// Business-date checks against the employee's current history.
///
/// The employee must still hold an open salary, title and department
/// record, and `from_date` must fall strictly after every `from_date` in
/// those three streams, closed records included.
pub fn check_eligibility(
  history: &EmployeeHistory,
  from_date: NaiveDate,
) -> Result<()> {
  let emp_no = history.employee.emp_no;

  let active = history.salaries.iter().any(Interval::is_open)
    && history.titles.iter().any(Interval::is_open)
    && history.departments.iter().any(Interval::is_open);
  if !active {
    return Err(Error::EmployeeInactive(emp_no));
  }

  let latest = [
    latest_from(&history.salaries),
    latest_from(&history.titles),
    latest_from(&history.departments),
  ]
  .into_iter()
  .flatten()
  .max();

  if let Some(latest) = latest
    && from_date <= latest
  {
    return Err(Error::NotAfterLatest { requested: from_date, latest });
  }

  Ok(())
}

// ─── Plan ────────────────────────────────────────────────────────────────────

/// The writes for one stream: records to close (already carrying their new
/// end date) followed by at most one record to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollover<R> {
  pub close: Vec<R>,
  pub open:  Option<R>,
}

impl<R> Rollover<R> {
  pub fn is_noop(&self) -> bool { self.close.is_empty() && self.open.is_none() }

  pub fn write_count(&self) -> usize {
    self.close.len() + usize::from(self.open.is_some())
  }
}

/// Every write a promotion performs, grouped by stream in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionPlan {
  pub emp_no:     EmpNo,
  pub dept_no:    DeptNo,
  pub salary:     Rollover<SalaryRecord>,
  pub title:      Rollover<TitleRecord>,
  pub department: Rollover<DepartmentAssignment>,
  /// `None` unless the promotion makes the employee a manager.
  pub manager:    Option<Rollover<ManagerAssignment>>,
}

impl PromotionPlan {
  pub fn write_count(&self) -> usize {
    self.salary.write_count()
      + self.title.write_count()
      + self.department.write_count()
      + self.manager.as_ref().map_or(0, Rollover::write_count)
  }
}

/// Close every open record and open `next`.
fn roll_all<R: Interval + Clone>(
  records: &[R],
  next: R,
  from_date: NaiveDate,
) -> Result<Rollover<R>> {
  let close = open_records(records)
    .into_iter()
    .map(|r| close_before(r, from_date))
    .collect::<Result<Vec<_>>>()?;
  Ok(Rollover { close, open: Some(next) })
}

/// Compute the writes for `promotion` over `history`.
///
/// - Salary and title always roll over; every open record is closed,
///   so drift (more than one open record) is repaired.
/// - The department stream is only touched when the department changes.
///   An open row for the target department is kept and any other open
///   rows are closed.
/// - With `make_manager`, any open manager record is closed and a new one
///   opened for the target department, even when that department is
///   unchanged. `from_date` must come after every earlier manager record,
///   closed ones included.
///
/// Closing uses `from_date - 1 day` and fails with
/// [`Error::InvalidInterval`] rather than produce `to_date < from_date`.
pub fn plan(
  history: &EmployeeHistory,
  promotion: &Promotion,
) -> Result<PromotionPlan> {
  let emp_no = history.employee.emp_no;
  let from_date = promotion.from_date;

  let salary = roll_all(
    &history.salaries,
    SalaryRecord {
      emp_no,
      from_date,
      salary: promotion.salary,
      to_date: SENTINEL,
    },
    from_date,
  )?;

  let title = roll_all(
    &history.titles,
    TitleRecord {
      emp_no,
      title: promotion.title.clone(),
      from_date,
      to_date: SENTINEL,
    },
    from_date,
  )?;

  let current_depts = open_records(&history.departments);
  let department = match current_depts
    .iter()
    .position(|a| a.dept_no == promotion.dept_no)
  {
    Some(keep) => Rollover {
      close: current_depts
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i != keep)
        .map(|(_, a)| close_before(a, from_date))
        .collect::<Result<Vec<_>>>()?,
      open:  None,
    },
    None => roll_all(
      &history.departments,
      DepartmentAssignment {
        emp_no,
        dept_no: promotion.dept_no.clone(),
        from_date,
        to_date: SENTINEL,
      },
      from_date,
    )?,
  };

  let manager = if promotion.make_manager {
    if let Some(latest) = latest_from(&history.managed)
      && from_date <= latest
    {
      return Err(Error::NotAfterLatest { requested: from_date, latest });
    }
    Some(roll_all(
      &history.managed,
      ManagerAssignment {
        emp_no,
        dept_no: promotion.dept_no.clone(),
        from_date,
        to_date: SENTINEL,
      },
      from_date,
    )?)
  } else {
    None
  };

  Ok(PromotionPlan {
    emp_no,
    dept_no: promotion.dept_no.clone(),
    salary,
    title,
    department,
    manager,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{ErrorKind, employee::Employee};

  fn d(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

  fn emp() -> EmpNo { EmpNo::new(10012).unwrap() }

  fn dept(s: &str) -> DeptNo { DeptNo::parse(s).unwrap() }

  fn request() -> PromotionRequest {
    PromotionRequest {
      emp_no:     Some(10012),
      new_title:  Some("Manager 1".into()),
      from_date:  Some("2015-11-18".into()),
      new_salary: Some(10000),
      dept_no:    Some("d008".into()),
      manager:    true,
    }
  }

  /// Employee 10012: salary 9000, "Engineer", d005, all from 2015-01-01.
  fn history() -> EmployeeHistory {
    let from = d("2015-01-01");
    EmployeeHistory {
      employee:    Employee {
        emp_no:     emp(),
        birth_date: d("1960-10-04"),
        first_name: "Bojan".into(),
        last_name:  "Montemayor".into(),
        gender:     "F".into(),
        hire_date:  d("1992-12-18"),
      },
      salaries:    vec![SalaryRecord {
        emp_no:    emp(),
        from_date: from,
        salary:    9000,
        to_date:   SENTINEL,
      }],
      titles:      vec![TitleRecord {
        emp_no:    emp(),
        title:     "Engineer".into(),
        from_date: from,
        to_date:   SENTINEL,
      }],
      departments: vec![DepartmentAssignment {
        emp_no:    emp(),
        dept_no:   dept("d005"),
        from_date: from,
        to_date:   SENTINEL,
      }],
      managed:     vec![],
    }
  }

  // ── validate ──────────────────────────────────────────────────────────

  #[test]
  fn validate_normalises() {
    let mut req = request();
    req.new_title = Some("  Senior Engineer ".into());
    req.dept_no = Some(" D008".into());

    let p = validate(req).unwrap();
    assert_eq!(p.title, "Senior Engineer");
    assert_eq!(p.dept_no.as_str(), "d008");
    assert_eq!(p.from_date, d("2015-11-18"));
    assert!(p.make_manager);
  }

  fn assert_rejected(mutate: impl FnOnce(&mut PromotionRequest), field: &str) {
    let mut req = request();
    mutate(&mut req);
    let err = validate(req).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    assert!(err.to_string().contains(field), "{err} should mention {field}");
  }

  #[test]
  fn validate_rejects_each_field() {
    assert_rejected(|r| r.emp_no = Some(0), "empNo");
    assert_rejected(|r| r.emp_no = None, "empNo");
    assert_rejected(|r| r.new_title = Some("   ".into()), "Title");
    assert_rejected(|r| r.from_date = None, "fromDate");
    assert_rejected(|r| r.from_date = Some("2015-13-01".into()), "fromDate");
    assert_rejected(|r| r.from_date = Some("18/11/2015".into()), "fromDate");
    assert_rejected(|r| r.from_date = Some("2015-1-5".into()), "fromDate");
    assert_rejected(|r| r.from_date = Some("9999-01-01".into()), "fromDate");
    assert_rejected(|r| r.from_date = Some("9999-06-01".into()), "fromDate");
    assert_rejected(|r| r.new_salary = Some(0), "salary");
    assert_rejected(|r| r.new_salary = Some(-10), "salary");
    assert_rejected(|r| r.dept_no = Some("D1".into()), "deptNo");
    assert_rejected(|r| r.dept_no = None, "deptNo");
  }

  #[test]
  fn validate_reports_first_failure() {
    let req = PromotionRequest {
      emp_no: Some(-1),
      dept_no: Some("bad".into()),
      ..Default::default()
    };
    let err = validate(req).unwrap_err();
    assert!(err.to_string().contains("empNo"));
  }

  #[test]
  fn request_deserialises_from_camel_case() {
    let req: PromotionRequest = serde_json::from_str(
      r#"{"empNo":10012,"newTitle":"Manager 1","fromDate":"2015-11-18",
          "newSalary":10000,"deptNo":"d008","manager":true}"#,
    )
    .unwrap();
    assert_eq!(validate(req).unwrap().salary, 10000);

    let req: PromotionRequest = serde_json::from_str(r#"{"empNo":1}"#).unwrap();
    assert!(!req.manager);
  }

  // ── eligibility ───────────────────────────────────────────────────────

  #[test]
  fn eligible_when_after_latest() {
    assert!(check_eligibility(&history(), d("2015-01-02")).is_ok());
  }

  #[test]
  fn rejects_date_not_after_latest() {
    for date in ["2015-01-01", "2014-06-30"] {
      let err = check_eligibility(&history(), d(date)).unwrap_err();
      assert_eq!(err.kind(), ErrorKind::BusinessRuleViolation);
      assert!(matches!(err, Error::NotAfterLatest { latest, .. } if latest == d("2015-01-01")));
    }
  }

  #[test]
  fn latest_counts_closed_records() {
    let mut h = history();
    h.titles.push(TitleRecord {
      emp_no:    emp(),
      title:     "Intern".into(),
      from_date: d("2016-01-01"),
      to_date:   d("2016-02-01"),
    });
    let err = check_eligibility(&h, d("2015-06-01")).unwrap_err();
    assert!(matches!(err, Error::NotAfterLatest { latest, .. } if latest == d("2016-01-01")));
  }

  #[test]
  fn rejects_departed_employee() {
    let mut h = history();
    h.departments[0].to_date = d("2015-06-30");
    let err = check_eligibility(&h, d("2016-01-01")).unwrap_err();
    assert!(matches!(err, Error::EmployeeInactive(_)));
    assert!(err.to_string().contains("left the company"));
  }

  // ── plan ──────────────────────────────────────────────────────────────

  #[test]
  fn plan_department_change_with_manager() {
    let p = validate(request()).unwrap();
    let plan = plan(&history(), &p).unwrap();

    let closed = d("2015-11-17");
    assert_eq!(plan.salary.close[0].to_date, closed);
    assert_eq!(plan.title.close[0].to_date, closed);
    assert_eq!(plan.department.close[0].to_date, closed);
    assert_eq!(plan.department.close[0].dept_no, dept("d005"));

    let opened = plan.department.open.as_ref().unwrap();
    assert_eq!(opened.dept_no, dept("d008"));
    assert_eq!(opened.from_date, d("2015-11-18"));
    assert!(opened.is_open());

    let mgr = plan.manager.as_ref().unwrap();
    assert!(mgr.close.is_empty());
    assert_eq!(mgr.open.as_ref().unwrap().dept_no, dept("d008"));
    assert_eq!(plan.write_count(), 7);
  }

  #[test]
  fn plan_same_department_leaves_assignment_alone() {
    let mut req = request();
    req.dept_no = Some("d005".into());
    req.manager = false;
    let p = validate(req).unwrap();
    let plan = plan(&history(), &p).unwrap();

    assert!(plan.department.is_noop());
    assert!(plan.manager.is_none());
    assert_eq!(plan.salary.write_count(), 2);
    assert_eq!(plan.title.write_count(), 2);
  }

  #[test]
  fn plan_repairs_drifted_title_stream() {
    let mut h = history();
    h.titles.push(TitleRecord {
      emp_no:    emp(),
      title:     "Staff".into(),
      from_date: d("2015-03-01"),
      to_date:   SENTINEL,
    });
    let plan = plan(&h, &validate(request()).unwrap()).unwrap();
    assert_eq!(plan.title.close.len(), 2);
    assert!(plan.title.close.iter().all(|t| !t.is_open()));
  }

  #[test]
  fn plan_same_department_manager_reopens() {
    let mut h = history();
    h.managed.push(ManagerAssignment {
      emp_no:    emp(),
      dept_no:   dept("d005"),
      from_date: d("2015-01-01"),
      to_date:   SENTINEL,
    });
    let mut req = request();
    req.dept_no = Some("d005".into());
    let plan = plan(&h, &validate(req).unwrap()).unwrap();

    let mgr = plan.manager.unwrap();
    assert_eq!(mgr.close.len(), 1);
    assert_eq!(mgr.close[0].to_date, d("2015-11-17"));
    assert_eq!(mgr.open.unwrap().from_date, d("2015-11-18"));
  }

  #[test]
  fn plan_refuses_manager_date_before_open_record() {
    let mut h = history();
    h.managed.push(ManagerAssignment {
      emp_no:    emp(),
      dept_no:   dept("d002"),
      from_date: d("2016-01-01"),
      to_date:   SENTINEL,
    });
    let err = plan(&h, &validate(request()).unwrap()).unwrap_err();
    assert!(matches!(err, Error::NotAfterLatest { latest, .. } if latest == d("2016-01-01")));
    assert_eq!(err.kind(), ErrorKind::BusinessRuleViolation);
  }

  #[test]
  fn plan_refuses_manager_date_before_closed_record() {
    let mut h = history();
    h.managed.push(ManagerAssignment {
      emp_no:    emp(),
      dept_no:   dept("d002"),
      from_date: d("2015-03-01"),
      to_date:   d("2015-06-30"),
    });
    let mut req = request();
    req.from_date = Some("2015-02-01".into());
    let err = plan(&h, &validate(req).unwrap()).unwrap_err();
    assert!(matches!(err, Error::NotAfterLatest { latest, .. } if latest == d("2015-03-01")));

    // Without the manager flag the manager stream is not consulted.
    let mut req = request();
    req.from_date = Some("2015-02-01".into());
    req.manager = false;
    assert!(plan(&h, &validate(req).unwrap()).unwrap().manager.is_none());
  }
}
