use chrono::{DateTime, Duration, Utc};
use std::convert::TryFrom;

use crate::error::HealthRecordError;

/// Half-open window `[start, end)` of instants an aggregation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: chrono::DateTime<Utc>,
    end: chrono::DateTime<Utc>,
}

impl TryFrom<(DateTime<Utc>, DateTime<Utc>)> for TimeRange {
    type Error = HealthRecordError;

    fn try_from((start, end): (DateTime<Utc>, DateTime<Utc>)) -> Result<Self, Self::Error> {
        TimeRange::between(start, end)
    }
}

impl TimeRange {
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, HealthRecordError> {
        if start >= end {
            return Err(HealthRecordError::invalid_argument(
                "time_range",
                format!("start {} is not before end {}", start, end),
            ));
        }
        Ok(TimeRange { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start <= time && time < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}
