use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use roster_core::{
  ErrorKind,
  employee::{Department, Employee},
  history::{DepartmentAssignment, SalaryRecord, TitleRecord},
  ids::{DeptNo, EmpNo},
  temporal::SENTINEL,
};
use roster_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiError, api_router};

fn d(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

/// d005, d008 and d001, plus employee 10012 active in d005 since 2015-01-01.
async fn make_router() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  for (no, name) in [("d008", "Research"), ("d005", "Development"), ("d001", "Marketing")] {
    store
      .add_department(Department {
        dept_no:   DeptNo::parse(no).unwrap(),
        dept_name: name.to_string(),
      })
      .await
      .unwrap();
  }

  let emp_no = EmpNo::new(10012).unwrap();
  let from = d("2015-01-01");
  store
    .add_employee(Employee {
      emp_no,
      birth_date: d("1960-10-04"),
      first_name: "Patricio".into(),
      last_name:  "Bridgland".into(),
      gender:     "M".into(),
      hire_date:  d("1992-12-18"),
    })
    .await
    .unwrap();
  store
    .add_salary(SalaryRecord { emp_no, from_date: from, salary: 9000, to_date: SENTINEL })
    .await
    .unwrap();
  store
    .add_title(TitleRecord {
      emp_no,
      title: "Engineer".into(),
      from_date: from,
      to_date: SENTINEL,
    })
    .await
    .unwrap();
  store
    .add_department_assignment(DepartmentAssignment {
      emp_no,
      dept_no: DeptNo::parse("d005").unwrap(),
      from_date: from,
      to_date: SENTINEL,
    })
    .await
    .unwrap();

  api_router(Arc::new(store))
}

async fn send(
  router: &Router,
  method: &str,
  uri: &str,
  body: Option<&str>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if body.is_some() {
    builder = builder.header(header::CONTENT_TYPE, "application/json");
  }
  let req = builder
    .body(Body::from(body.unwrap_or_default().to_string()))
    .unwrap();

  let resp = router.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, value)
}

fn scenario_a() -> String {
  json!({
    "empNo": 10012,
    "newTitle": "Manager 1",
    "fromDate": "2015-11-18",
    "newSalary": 10000,
    "deptNo": "d008",
    "manager": true,
  })
  .to_string()
}

// ── Departments ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn departments_are_listed_in_code_order() {
  let router = make_router().await;
  let (status, body) = send(&router, "GET", "/departments", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!([
      { "deptNo": "d001", "deptName": "Marketing" },
      { "deptNo": "d005", "deptName": "Development" },
      { "deptNo": "d008", "deptName": "Research" },
    ])
  );
}

#[tokio::test]
async fn singular_department_path_lists_the_same() {
  let router = make_router().await;
  let (_, plural) = send(&router, "GET", "/departments", None).await;
  let (status, singular) = send(&router, "GET", "/department", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(singular, plural);
}

#[tokio::test]
async fn department_lookup_distinguishes_bad_code_from_missing() {
  let router = make_router().await;
  let (status, body) = send(&router, "GET", "/departments/D008", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["deptName"], "Research");

  let (status, _) = send(&router, "GET", "/departments/d099", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, body) = send(&router, "GET", "/departments/research", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["kind"], "malformed_input");
}

// ── Employees ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_employee_by_number() {
  let router = make_router().await;
  let (status, body) = send(&router, "GET", "/employees/10012", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["empNo"], 10012);
  assert_eq!(body["firstName"], "Patricio");
  assert_eq!(body["hireDate"], "1992-12-18");
}

#[tokio::test]
async fn get_employee_malformed_vs_missing() {
  let router = make_router().await;
  for uri in ["/employees/abc", "/employees/0", "/employees/-5"] {
    let (status, body) = send(&router, "GET", uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    assert_eq!(body["kind"], "malformed_input");
  }

  let (status, body) = send(&router, "GET", "/employees/99999", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn by_department_validates_params() {
  let router = make_router().await;
  for uri in [
    "/employees/by-department",
    "/employees/by-department?deptNo=",
    "/employees/by-department?deptNo=d5",
    "/employees/by-department?deptNo=d005&page=0",
    "/employees/by-department?deptNo=d005&page=-2",
    "/employees/by-department?deptNo=d005&page=two",
  ] {
    let (status, _) = send(&router, "GET", uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
  }
}

#[tokio::test]
async fn by_department_lists_employees() {
  let router = make_router().await;
  let (status, body) =
    send(&router, "GET", "/employees/by-department?deptNo=D005", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!([{
      "empNo": 10012,
      "firstName": "Patricio",
      "lastName": "Bridgland",
      "hireDate": "1992-12-18",
    }])
  );

  let (status, body) =
    send(&router, "GET", "/employees/by-department?deptNo=d005&page=2", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([]));
}

// ── Promotion ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn promote_then_replay_conflicts() {
  let router = make_router().await;

  let (status, body) =
    send(&router, "POST", "/employees/promote", Some(&scenario_a())).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["empNo"], 10012);

  let (status, body) =
    send(&router, "POST", "/employees/promote", Some(&scenario_a())).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["kind"], "business_rule_violation");
  assert!(body["error"].as_str().unwrap().contains("2015-11-18"));

  let (status, body) = send(&router, "GET", "/employees/10012/history", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["salaries"].as_array().unwrap().len(), 2);
  assert_eq!(body["salaries"][0]["toDate"], "2015-11-17");
  assert_eq!(body["salaries"][1]["toDate"], "9999-01-01");
  assert_eq!(body["departments"][1]["deptNo"], "d008");
  assert_eq!(body["managed"][0]["deptNo"], "d008");
}

#[tokio::test]
async fn promote_rejects_malformed_requests() {
  let router = make_router().await;
  let cases = [
    json!({ "empNo": 10012, "newTitle": "M", "fromDate": "2015-11-18",
            "newSalary": 10000, "deptNo": "D1", "manager": false }),
    json!({ "empNo": 10012, "newTitle": " ", "fromDate": "2015-11-18",
            "newSalary": 10000, "deptNo": "d008" }),
    json!({ "empNo": 10012, "newTitle": "M", "fromDate": "not-a-date",
            "newSalary": 10000, "deptNo": "d008" }),
    json!({ "empNo": 10012, "newTitle": "M", "fromDate": "2015-11-18",
            "newSalary": 0, "deptNo": "d008" }),
    json!({ "empNo": "ten", "newTitle": "M", "fromDate": "2015-11-18",
            "newSalary": 10000, "deptNo": "d008" }),
    json!({ "empNo": 10012, "newTitle": "M", "fromDate": "9999-06-01",
            "newSalary": 10000, "deptNo": "d008" }),
    json!({ "empNo": 10012, "newTitle": "M", "fromDate": "2015-1-5",
            "newSalary": 10000, "deptNo": "d008" }),
  ];
  for case in cases {
    let (status, body) =
      send(&router, "POST", "/employees/promote", Some(&case.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{case}");
    assert_eq!(body["kind"], "malformed_input");
  }

  let (status, _) = send(&router, "POST", "/employees/promote", Some("{not json")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  // Nothing was written.
  let (_, body) = send(&router, "GET", "/employees/10012/history", None).await;
  assert_eq!(body["salaries"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn promote_unknown_employee_or_department_is_not_found() {
  let router = make_router().await;
  let unknown_emp = json!({ "empNo": 77777, "newTitle": "M", "fromDate": "2015-11-18",
                            "newSalary": 10000, "deptNo": "d008" });
  let (status, _) =
    send(&router, "POST", "/employees/promote", Some(&unknown_emp.to_string())).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let unknown_dept = json!({ "empNo": 10012, "newTitle": "M", "fromDate": "2015-11-18",
                             "newSalary": 10000, "deptNo": "d099", "manager": true });
  let (status, _) =
    send(&router, "POST", "/employees/promote", Some(&unknown_dept.to_string())).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (_, body) = send(&router, "GET", "/employees/10012/history", None).await;
  assert_eq!(body["salaries"].as_array().unwrap().len(), 1);
  assert_eq!(body["titles"][0]["toDate"], "9999-01-01");
}

// ── Error mapping ────────────────────────────────────────────────────────────

fn domain_errors() -> Vec<roster_core::Error> {
  let emp_no = EmpNo::new(10012).unwrap();
  vec![
    roster_core::Error::malformed("bad"),
    roster_core::Error::EmployeeNotFound(emp_no),
    roster_core::Error::DepartmentNotFound(DeptNo::parse("d099").unwrap()),
    roster_core::Error::EmployeeInactive(emp_no),
    roster_core::Error::NotAfterLatest {
      requested: d("2015-01-01"),
      latest:    d("2015-01-01"),
    },
    roster_core::Error::InvalidInterval {
      from_date: d("2016-01-01"),
      to_date:   d("2015-12-31"),
    },
  ]
}

#[test]
fn domain_errors_keep_their_kind_on_both_paths() {
  let direct = domain_errors().into_iter().map(ApiError::from);
  let via_store = domain_errors()
    .into_iter()
    .map(|e| ApiError::from_store(roster_store_sqlite::Error::from(e)));

  for ((core, direct), via_store) in domain_errors().iter().zip(direct).zip(via_store) {
    assert_eq!(direct.kind(), core.kind(), "{core}");
    assert_eq!(via_store.kind(), core.kind(), "{core}");
  }
}

#[test]
fn storage_failure_is_not_reported_as_conflict() {
  let err = ApiError::from_store(roster_store_sqlite::Error::Corrupt("row".into()));
  assert_eq!(err.kind(), ErrorKind::StorageFailure);
  assert!(matches!(err, ApiError::Store(_)));
}
