// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Shared helpers for date/time formatting.

use chrono::{Months, NaiveDate, Utc};

/// Brazilian short date, `dd/mm/yyyy`.
pub fn format_br_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Milliseconds since the Unix epoch, used for synthetic ids.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Add calendar months, clamping to the last day of a shorter month.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}
