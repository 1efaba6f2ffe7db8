//! # CF Time Axes
//!
//! Decodes `"<unit> since <reference>"` time coordinates into the labels used
//! as raster stack keys.

use crate::error::{RasterError, RasterResult};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(TimeUnit::Seconds),
            "min" | "mins" | "minute" | "minutes" => Some(TimeUnit::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(TimeUnit::Hours),
            "d" | "day" | "days" => Some(TimeUnit::Days),
            _ => None,
        }
    }

    pub fn seconds(&self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3600.0,
            TimeUnit::Days => 86400.0,
        }
    }
}

/// A parsed CF time reference.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    unit: TimeUnit,
    reference: NaiveDateTime,
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

impl TimeAxis {
    /// Parses units such as `"days since 2000-01-01"` or
    /// `"hours since 1970-01-01 00:00:00 UTC"`.
    ///
    /// ```rust
    /// use nc2raster::time::TimeAxis;
    ///
    /// let axis = TimeAxis::parse("days since 2000-01-01")?;
    /// assert_eq!(axis.label(366.0), "2001-01-01");
    /// # Ok::<(), nc2raster::RasterError>(())
    /// ```
    pub fn parse(units: &str) -> RasterResult<Self> {
        let normalized = units.trim().to_ascii_uppercase();
        let (unit_part, reference_part) = normalized
            .split_once(" SINCE ")
            .ok_or_else(|| RasterError::InvalidTimeUnits(units.to_string()))?;

        let unit = TimeUnit::parse(&unit_part.trim().to_ascii_lowercase())
            .ok_or_else(|| RasterError::InvalidTimeUnits(units.to_string()))?;

        let reference_str = reference_part
            .trim()
            .trim_end_matches("UTC")
            .trim_end_matches('Z')
            .trim();

        let reference = DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(reference_str, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(reference_str, "%Y-%m-%d")
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            })
            .ok_or_else(|| RasterError::InvalidTimeUnits(units.to_string()))?;

        Ok(TimeAxis { unit, reference })
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn reference(&self) -> NaiveDateTime {
        self.reference
    }

    /// Calendar instant of a time coordinate, rounded to the millisecond.
    pub fn datetime(&self, value: f64) -> Option<NaiveDateTime> {
        let millis = value * self.unit.seconds() * 1000.0;
        if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
            return None;
        }
        let offset = Duration::try_milliseconds(millis.round() as i64)?;
        self.reference.checked_add_signed(offset)
    }

    /// `YYYY-MM-DD` for midnight instants, `YYYY-MM-DDTHH:MM:SS` otherwise.
    pub fn label(&self, value: f64) -> String {
        match self.datetime(value) {
            Some(dt) if dt.time() == NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            None => format!("{}", value),
        }
    }
}

/// Stack keys for a time axis: decoded dates when `units` parse, the raw
/// coordinate values otherwise.
pub fn layer_labels(values: &[f64], units: Option<&str>) -> Vec<String> {
    match units.map(TimeAxis::parse) {
        Some(Ok(axis)) => values.iter().map(|v| axis.label(*v)).collect(),
        _ => values.iter().map(|v| format!("{}", v)).collect(),
    }
}
