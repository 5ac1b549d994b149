//! Day/week range computation and appointment filtering for display and
//! export. Pure functions: the viewed day is always an explicit parameter,
//! never module state.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AgendaError;
use crate::models::Appointment;

/// Results returned to the search box at most.
pub const SEARCH_RESULT_LIMIT: usize = 12;

/// Queries shorter than this return nothing, to avoid noise on
/// single-character input.
const MIN_QUERY_CHARS: usize = 2;

/// Monday-to-Sunday span containing a given day, ISO dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    pub start: String,
    pub end: String,
}

fn parse_date(iso: &str) -> Result<NaiveDate, AgendaError> {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d").map_err(|_| AgendaError::InvalidDate(iso.into()))
}

/// Appointments on a single calendar day, in collection order.
pub fn day_view<'a>(appointments: &'a [Appointment], date: &str) -> Vec<&'a Appointment> {
    appointments.iter().filter(|a| a.date == date).collect()
}

/// The Monday-to-Sunday week containing `date`. Holds across week
/// boundaries and month/year rollovers.
pub fn week_range(date: &str) -> Result<WeekRange, AgendaError> {
    let day = parse_date(date)?;
    let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
    let sunday = monday + Duration::days(6);
    Ok(WeekRange {
        start: monday.to_string(),
        end: sunday.to_string(),
    })
}

/// Appointments within the week containing `date`, in collection order.
pub fn week_view<'a>(
    appointments: &'a [Appointment],
    date: &str,
) -> Result<Vec<&'a Appointment>, AgendaError> {
    let range = week_range(date)?;
    Ok(appointments
        .iter()
        .filter(|a| a.date.as_str() >= range.start.as_str() && a.date.as_str() <= range.end.as_str())
        .collect())
}

/// Calendar-correct day arithmetic on an ISO date.
pub fn shift_day(date: &str, delta_days: i64) -> Result<String, AgendaError> {
    Ok((parse_date(date)? + Duration::days(delta_days)).to_string())
}

/// Case-insensitive substring match on patient name, capped at `limit`,
/// stable in collection order. Queries under two characters return nothing.
pub fn search<'a>(
    appointments: &'a [Appointment],
    query: &str,
    limit: usize,
) -> Vec<&'a Appointment> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }
    appointments
        .iter()
        .filter(|a| a.patient.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}

/// `DD/MM/YYYY`, as printed on documents and agenda headers.
pub fn format_display_date(iso: &str) -> String {
    if iso.is_empty() {
        return String::new();
    }
    let mut parts = iso.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(y), Some(m), Some(d)) => format!("{d}/{m}/{y}"),
        _ => iso.to_string(),
    }
}
