//! Calendar arithmetic behind availability checks and booking creation.
//!
//! Stays are half-open intervals `[check_in, check_out)`: the check-out day is
//! free for the next guest, so back-to-back bookings never conflict.

use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::error::{AppError, AppResult};

/// Years whose `YYYY-MM-DD` text form sorts in calendar order.
const STORABLE_YEARS: RangeInclusive<i32> = 1..=9999;

/// Accepts `YYYY-MM-DD` or an RFC 3339 / ISO timestamp; time-of-day is dropped.
pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    let raw = raw.trim();
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|ts| ts.date())
        });

    match parsed {
        Some(date) if STORABLE_YEARS.contains(&date.year()) => Ok(date),
        _ => Err(AppError::InvalidInput(format!("invalid date format: {:?}", raw))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl Stay {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> AppResult<Self> {
        if check_out <= check_in {
            return Err(AppError::InvalidInput(
                "check-out must be after check-in".to_string(),
            ));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn parse(check_in: &str, check_out: &str) -> AppResult<Self> {
        Self::new(parse_date(check_in)?, parse_date(check_out)?)
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Always at least one, since construction rejects empty stays.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn total_price(&self, price_per_night: f64) -> f64 {
        self.nights() as f64 * price_per_night
    }

    pub fn starts_before(&self, today: NaiveDate) -> bool {
        self.check_in < today
    }

    /// True when an existing booking `[existing_in, existing_out)` collides with this stay.
    pub fn overlaps(&self, existing_in: NaiveDate, existing_out: NaiveDate) -> bool {
        let starts_inside = existing_in <= self.check_in && existing_out > self.check_in;
        let ends_inside = existing_in < self.check_out && existing_out >= self.check_out;
        let contains = existing_in >= self.check_in && existing_out <= self.check_out;
        starts_inside || ends_inside || contains
    }
}
