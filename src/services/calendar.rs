// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Transport calendar for the current semester.

use chrono::NaiveDate;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// How a date is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum EventKind {
    Success,
    Warning,
    Danger,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ImportantDate {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    pub title: &'static str,
    pub kind: EventKind,
}

const SCHEDULE: [(i32, u32, u32, &str, EventKind); 6] = [
    (2025, 2, 1, "Início do semestre", EventKind::Success),
    (2025, 2, 15, "Manutenção da frota", EventKind::Warning),
    (2025, 3, 10, "Feriado - Sem transporte", EventKind::Danger),
    (2025, 4, 5, "Renovação de carteirinhas", EventKind::Info),
    (2025, 5, 1, "Alteração de rotas", EventKind::Warning),
    (2025, 6, 30, "Fim do semestre", EventKind::Danger),
];

/// All important dates, in calendar order.
pub fn important_dates() -> Vec<ImportantDate> {
    SCHEDULE
        .iter()
        .filter_map(|&(y, m, d, title, kind)| {
            NaiveDate::from_ymd_opt(y, m, d).map(|date| ImportantDate { date, title, kind })
        })
        .collect()
}

/// Events falling on `date`.
pub fn events_on(date: NaiveDate) -> Vec<ImportantDate> {
    important_dates()
        .into_iter()
        .filter(|e| e.date == date)
        .collect()
}
