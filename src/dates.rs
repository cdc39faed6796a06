use std::iter::FusedIterator;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{DayDirsError, Result};

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Parse a `YYYY-MM-DD` date. Parts are split on `-` and need not be zero-padded,
/// so `2025-9-8` is accepted while `2025/09/08` is rejected as a single part.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let parts: Vec<&str> = input.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(DayDirsError::date_parse(
            input,
            format!("expected 3 parts separated by `-`, found {}", parts.len()),
        ));
    };

    let year: i32 = parse_part(input, "year", year)?;
    let month: u32 = parse_part(input, "month", month)?;
    let day: u32 = parse_part(input, "day", day)?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DayDirsError::date_parse(
            input,
            format!("year {year} outside {MIN_YEAR}..={MAX_YEAR}"),
        ));
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DayDirsError::date_parse(input, "not a valid calendar date"))
}

fn parse_part<T: FromStr>(input: &str, label: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| DayDirsError::date_parse(input, format!("{label} `{raw}` is not a number")))
}

/// Inclusive, ordered pair of calendar dates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DayDirsError::RangeOrder { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, both ends included.
    pub fn day_count(&self) -> usize {
        self.days().len()
    }

    /// A fresh sequence starting at `start`; the range can be walked any number of times.
    pub fn days(&self) -> DaySequence {
        days_between(self.start, self.end)
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = DaySequence;

    fn into_iter(self) -> DaySequence {
        self.days()
    }
}

impl IntoIterator for &DateRange {
    type Item = NaiveDate;
    type IntoIter = DaySequence;

    fn into_iter(self) -> DaySequence {
        self.days()
    }
}

/// Consecutive days from `start` through `end`. Empty when `start > end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> DaySequence {
    DaySequence {
        next: Some(start),
        end,
    }
}

#[derive(Clone, Debug)]
pub struct DaySequence {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DaySequence {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|day| *day <= self.end)?;
        // `succ_opt` is None at NaiveDate::MAX, which ends the sequence.
        self.next = if current == self.end {
            None
        } else {
            current.succ_opt()
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(day) if day <= self.end => {
                self.end.signed_duration_since(day).num_days() as usize + 1
            }
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DaySequence {}

impl FusedIterator for DaySequence {}
