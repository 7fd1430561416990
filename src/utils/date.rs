use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Days, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse a mandatory `YYYY-MM-DD` argument.
pub fn require_date(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

pub fn days_before(date: NaiveDate, n: u32) -> AppResult<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(n)))
        .ok_or_else(|| AppError::InvalidDate(format!("{} - {} days", date, n)))
}

pub fn days_after(date: NaiveDate, n: u32) -> AppResult<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(n)))
        .ok_or_else(|| AppError::InvalidDate(format!("{} + {} days", date, n)))
}

/// First and last day of a `YYYY-MM` month.
pub fn month_bounds(ym: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", ym.trim()), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(ym.to_string()))?;
    Ok((first, last_day_of_month(first)))
}

pub fn current_month_bounds(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = reference.with_day(1).unwrap_or(reference);
    (first, last_day_of_month(first))
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let mut d = first;
    while let Some(next) = d.succ_opt() {
        if next.month() != first.month() {
            break;
        }
        d = next;
    }
    d
}

/// Every date from `start` to `end`, both included.
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}
