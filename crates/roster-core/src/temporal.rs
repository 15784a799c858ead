//! Validity intervals and the helpers that query them.
//!
//! Every history row is valid over `[from_date, to_date]`, both ends
//! inclusive. A row still in effect carries [`SENTINEL`] as its end date.

use chrono::NaiveDate;

use crate::{Error, Result};

/// End date of a record with no known end: 9999-01-01.
pub const SENTINEL: NaiveDate = match NaiveDate::from_ymd_opt(9999, 1, 1) {
  Some(d) => d,
  None => panic!("9999-01-01 is a valid date"),
};

/// A record with a validity interval.
pub trait Interval: Sized {
  fn from_date(&self) -> NaiveDate;

  fn to_date(&self) -> NaiveDate;

  /// Return the record with its end date replaced.
  fn with_to_date(self, to_date: NaiveDate) -> Self;

  /// Whether this is the current (open-ended) record of its stream.
  fn is_open(&self) -> bool { self.to_date() == SENTINEL }
}

/// The most recent `from_date` among `records`, open or closed.
pub fn latest_from<'a, R, I>(records: I) -> Option<NaiveDate>
where
  R: Interval + 'a,
  I: IntoIterator<Item = &'a R>,
{
  records.into_iter().map(Interval::from_date).max()
}

/// Clone out the open records of a stream.
pub fn open_records<R: Interval + Clone>(records: &[R]) -> Vec<R> {
  records.iter().filter(|r| r.is_open()).cloned().collect()
}

/// Close `record` so that it ends the day before `next_from`.
///
/// Fails if that would end the record before it started.
pub fn close_before<R: Interval>(record: R, next_from: NaiveDate) -> Result<R> {
  let from_date = record.from_date();
  match next_from.pred_opt() {
    Some(to_date) if to_date >= from_date => Ok(record.with_to_date(to_date)),
    to_date => Err(Error::InvalidInterval {
      from_date,
      to_date: to_date.unwrap_or(NaiveDate::MIN),
    }),
  }
}
