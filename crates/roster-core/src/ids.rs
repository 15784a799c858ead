//! Strongly-typed identifiers shared by every layer.
//!
//! Each constructor performs the boundary validation for its type, so a
//! value of one of these types is always well-formed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── EmpNo ───────────────────────────────────────────────────────────────────

/// An employee number. Always positive.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct EmpNo(u32);

impl EmpNo {
  pub fn new(raw: i64) -> Result<Self> {
    u32::try_from(raw)
      .ok()
      .filter(|n| *n > 0)
      .map(Self)
      .ok_or_else(|| Error::malformed("empNo must be a positive integer"))
  }

  /// Parse a path segment. Only plain ASCII digits are accepted; signs,
  /// whitespace and leading `+` are rejected.
  pub fn parse(s: &str) -> Result<Self> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
      return Err(Error::malformed(
        "Employee number must be a positive integer.",
      ));
    }
    s.parse::<i64>()
      .map_err(|_| Error::malformed("Employee number must be a positive integer."))
      .and_then(Self::new)
  }

  pub fn get(self) -> u32 { self.0 }
}

impl fmt::Display for EmpNo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── DeptNo ──────────────────────────────────────────────────────────────────

/// A department code: `d` followed by exactly three digits, always stored
/// lowercase.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct DeptNo(String);

impl DeptNo {
  /// Trim, check the `dNNN` pattern case-insensitively, and lowercase.
  pub fn parse(s: &str) -> Result<Self> {
    let s = s.trim();
    let bytes = s.as_bytes();
    let well_formed = bytes.len() == 4
      && bytes[0].eq_ignore_ascii_case(&b'd')
      && bytes[1..].iter().all(u8::is_ascii_digit);

    if !well_formed {
      return Err(Error::malformed(
        "deptNo must match pattern dXXX (e.g., d001, D005)",
      ));
    }
    Ok(Self(s.to_ascii_lowercase()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for DeptNo {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { Self::parse(&s) }
}

impl From<DeptNo> for String {
  fn from(d: DeptNo) -> Self { d.0 }
}

impl fmt::Display for DeptNo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// Fixed number of rows per page in paginated listings.
pub const PAGE_SIZE: u32 = 20;

/// A 1-indexed page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(u32);

impl Page {
  pub const FIRST: Page = Page(1);

  pub fn new(raw: i64) -> Result<Self> {
    u32::try_from(raw)
      .ok()
      .filter(|n| *n > 0)
      .map(Self)
      .ok_or_else(|| Error::malformed("invalid page number"))
  }

  pub fn number(self) -> u32 { self.0 }

  /// Row offset of the first entry on this page.
  pub fn offset(self) -> u64 {
    u64::from(self.0 - 1) * u64::from(PAGE_SIZE)
  }
}

impl Default for Page {
  fn default() -> Self { Self::FIRST }
}
