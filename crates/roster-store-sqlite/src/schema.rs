//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS employees (
    emp_no      INTEGER PRIMARY KEY CHECK (emp_no > 0),
    birth_date  TEXT NOT NULL,     -- YYYY-MM-DD
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    gender      TEXT NOT NULL,
    hire_date   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS departments (
    dept_no     TEXT PRIMARY KEY,  -- lowercase 'dNNN'
    dept_name   TEXT NOT NULL UNIQUE
);

-- History streams. Rows are append-only; the only UPDATE ever issued sets
-- to_date on the previously current row. '9999-01-01' marks the open row.
CREATE TABLE IF NOT EXISTS salaries (
    emp_no      INTEGER NOT NULL REFERENCES employees(emp_no),
    salary      INTEGER NOT NULL CHECK (salary > 0),
    from_date   TEXT NOT NULL,
    to_date     TEXT NOT NULL,
    PRIMARY KEY (emp_no, from_date),
    CHECK (to_date >= from_date)
);

CREATE TABLE IF NOT EXISTS titles (
    emp_no      INTEGER NOT NULL REFERENCES employees(emp_no),
    title       TEXT NOT NULL,
    from_date   TEXT NOT NULL,
    to_date     TEXT NOT NULL,
    PRIMARY KEY (emp_no, title, from_date),
    CHECK (to_date >= from_date)
);

CREATE TABLE IF NOT EXISTS dept_emp (
    emp_no      INTEGER NOT NULL REFERENCES employees(emp_no),
    dept_no     TEXT NOT NULL REFERENCES departments(dept_no),
    from_date   TEXT NOT NULL,
    to_date     TEXT NOT NULL,
    PRIMARY KEY (emp_no, dept_no, from_date),
    CHECK (to_date >= from_date)
);

CREATE TABLE IF NOT EXISTS dept_manager (
    emp_no      INTEGER NOT NULL REFERENCES employees(emp_no),
    dept_no     TEXT NOT NULL REFERENCES departments(dept_no),
    from_date   TEXT NOT NULL,
    to_date     TEXT NOT NULL,
    PRIMARY KEY (emp_no, dept_no, from_date),
    CHECK (to_date >= from_date)
);

-- At most one open row per employee per stream.
CREATE UNIQUE INDEX IF NOT EXISTS salaries_open_idx
    ON salaries(emp_no) WHERE to_date = '9999-01-01';
CREATE UNIQUE INDEX IF NOT EXISTS titles_open_idx
    ON titles(emp_no) WHERE to_date = '9999-01-01';
CREATE UNIQUE INDEX IF NOT EXISTS dept_emp_open_idx
    ON dept_emp(emp_no) WHERE to_date = '9999-01-01';
CREATE UNIQUE INDEX IF NOT EXISTS dept_manager_open_idx
    ON dept_manager(emp_no) WHERE to_date = '9999-01-01';

CREATE INDEX IF NOT EXISTS dept_emp_dept_idx ON dept_emp(dept_no, emp_no);

PRAGMA user_version = 1;
";
