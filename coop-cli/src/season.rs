//! Season Window
//!
//! Restricts a run to contracts that started inside a time window.

use crate::error::{CliError, CliResult};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use coop_core::ContractSpec;
use serde::Serialize;

/// Half-open window `[start, end)`; either bound may be open
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeasonWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl SeasonWindow {
    /// Build from optional command-line bounds
    pub fn from_args(start: Option<&str>, end: Option<&str>) -> CliResult<Self> {
        let window = Self {
            start: start.map(parse_instant).transpose()?,
            end: end.map(parse_instant).transpose()?,
        };
        if let (Some(start), Some(end)) = (window.start, window.end) {
            if start >= end {
                return Err(CliError::invalid_arg(format!(
                    "season start {} is not before season end {}",
                    start, end
                )));
            }
        }
        Ok(window)
    }

    /// Whether any bound is set
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Whether an instant falls inside the window
    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| instant >= start) && self.end.map_or(true, |end| instant < end)
    }

    /// Whether a contract belongs to the window
    ///
    /// Unbounded windows accept everything. Bounded windows reject contracts
    /// without a usable start time.
    pub fn contains(&self, contract: &ContractSpec) -> bool {
        if !self.is_bounded() {
            return true;
        }
        contract
            .effective_start_time()
            .and_then(epoch_seconds)
            .map_or(false, |started| self.contains_instant(started))
    }
}

/// Parse RFC 3339 or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_instant(value: &str) -> CliResult<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .ok_or_else(|| {
            CliError::invalid_arg(format!(
                "'{}' is neither an RFC 3339 timestamp nor a YYYY-MM-DD date",
                value
            ))
        })
}

fn epoch_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    Utc.timestamp_opt(seconds.floor() as i64, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coop_core::SeasonInfo;

    fn contract(season_start: Option<f64>, start: Option<f64>) -> ContractSpec {
        ContractSpec {
            id: "c1".to_string(),
            name: None,
            season: season_start.map(|t| SeasonInfo {
                id: Some("winter".to_string()),
                start_time: Some(t),
            }),
            start_time: start,
            max_coop_size: None,
            grade_specs: Vec::new(),
        }
    }

    #[test]
    fn test_parse_instant() {
        let date = parse_instant("2025-01-06").unwrap();
        assert_eq!(date.timestamp(), 1_736_121_600);

        let rfc = parse_instant("2025-01-06T12:00:00+02:00").unwrap();
        assert_eq!(rfc.timestamp(), 1_736_121_600 + 10 * 3600);

        assert!(matches!(
            parse_instant("next tuesday"),
            Err(CliError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_window_bounds_are_half_open() {
        let window = SeasonWindow::from_args(Some("2025-01-06"), Some("2025-04-07")).unwrap();
        let start = parse_instant("2025-01-06").unwrap();
        let end = parse_instant("2025-04-07").unwrap();

        assert!(window.contains_instant(start));
        assert!(!window.contains_instant(end));
        assert!(!window.contains_instant(start - chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_inverted_window_rejected() {
        assert!(SeasonWindow::from_args(Some("2025-04-07"), Some("2025-01-06")).is_err());
    }

    #[test]
    fn test_contract_membership() {
        let window = SeasonWindow::from_args(Some("2025-01-06"), None).unwrap();
        let inside = 1_736_121_600.0 + 60.0;
        let before = 1_736_121_600.0 - 60.0;

        assert!(window.contains(&contract(Some(inside), None)));
        assert!(window.contains(&contract(None, Some(inside))));
        // Season start wins over the contract's own start
        assert!(!window.contains(&contract(Some(before), Some(inside))));
        assert!(!window.contains(&contract(None, None)));
    }

    #[test]
    fn test_unbounded_window_accepts_all() {
        let window = SeasonWindow::default();
        assert!(!window.is_bounded());
        assert!(window.contains(&contract(None, None)));
    }
}
