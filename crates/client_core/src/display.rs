use chrono::{DateTime, NaiveDate};
use shared::domain::VisitStatus;

/// Calendar date of an ISO date (`YYYY-MM-DD`) or an RFC 3339 timestamp, taken
/// as written without timezone conversion.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|ts| ts.date_naive())
        })
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

/// Renders an ISO date or timestamp as `M/D/YYYY`. Input that is neither is
/// returned unchanged.
pub fn format_short_date(raw: &str) -> String {
    match parse_calendar_date(raw) {
        Some(date) => date.format("%-m/%-d/%Y").to_string(),
        None => raw.trim().to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Green,
    Blue,
}

impl StatusBadge {
    pub fn for_status(status: VisitStatus) -> Self {
        match status {
            VisitStatus::Consult => StatusBadge::Green,
            _ => StatusBadge::Blue,
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            StatusBadge::Green => [46, 160, 67],
            StatusBadge::Blue => [56, 119, 214],
        }
    }
}
