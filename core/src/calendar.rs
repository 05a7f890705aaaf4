// checkout/src/calendar.rs

//! Which delivery dates a picker may offer.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRejection {
  Past,
  Weekend,
  BeyondHorizon,
}

impl std::fmt::Display for DateRejection {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      DateRejection::Past => "it is in the past",
      DateRejection::Weekend => "we do not deliver on weekends",
      DateRejection::BeyondHorizon => "it is more than one month ahead",
    })
  }
}

/// The last bookable date: one calendar month after `today`.
pub fn horizon(today: NaiveDate) -> NaiveDate {
  today.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX)
}

pub fn check_selectable(date: NaiveDate, now: NaiveDateTime) -> Result<(), DateRejection> {
  let today = now.date();
  if date < today {
    return Err(DateRejection::Past);
  }
  if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
    return Err(DateRejection::Weekend);
  }
  if date > horizon(today) {
    return Err(DateRejection::BeyondHorizon);
  }
  Ok(())
}

pub fn is_selectable(date: NaiveDate, now: NaiveDateTime) -> bool {
  check_selectable(date, now).is_ok()
}

/// Every selectable date from today through the horizon, in order.
pub fn selectable_dates(now: NaiveDateTime) -> Vec<NaiveDate> {
  let today = now.date();
  today
    .iter_days()
    .take_while(|d| *d <= horizon(today))
    .filter(|d| is_selectable(*d, now))
    .collect()
}
