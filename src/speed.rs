use std::convert::TryFrom;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, FixedOffset, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::HealthRecordError;
use crate::metadata::Metadata;
use crate::metric::{AggregateMetric, AggregationType};
use crate::record::{InstantaneousRecord, Record};

pub const MIN_SPEED_METERS_PER_SECOND: f64 = 0.0;
pub const MAX_SPEED_METERS_PER_SECOND: f64 = 1_000_000.0;

const SPEED_NAME: &str = "Speed";
const SPEED_FIELD_NAME: &str = "speed";

/// Average speed across the matched records.
pub static SPEED_AVG: Lazy<AggregateMetric<f64>> = Lazy::new(|| {
    AggregateMetric::double_metric(SPEED_NAME, AggregationType::Average, SPEED_FIELD_NAME)
});

/// Minimum speed across the matched records.
pub static SPEED_MIN: Lazy<AggregateMetric<f64>> = Lazy::new(|| {
    AggregateMetric::double_metric(SPEED_NAME, AggregationType::Minimum, SPEED_FIELD_NAME)
});

/// Maximum speed across the matched records.
pub static SPEED_MAX: Lazy<AggregateMetric<f64>> = Lazy::new(|| {
    AggregateMetric::double_metric(SPEED_NAME, AggregationType::Maximum, SPEED_FIELD_NAME)
});

/// The user's speed at a single instant. The value is the scalar magnitude,
/// so it is never negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SpeedFields", into = "SpeedFields")]
pub struct Speed {
    speed_meters_per_second: f64,
    time: DateTime<Utc>,
    zone_offset: Option<FixedOffset>,
    metadata: Metadata,
}

impl Speed {
    pub fn new(
        speed_meters_per_second: f64,
        time: DateTime<Utc>,
        zone_offset: Option<FixedOffset>,
    ) -> Result<Self, HealthRecordError> {
        Self::with_metadata(speed_meters_per_second, time, zone_offset, Metadata::empty())
    }

    pub fn with_metadata(
        speed_meters_per_second: f64,
        time: DateTime<Utc>,
        zone_offset: Option<FixedOffset>,
        metadata: Metadata,
    ) -> Result<Self, HealthRecordError> {
        Ok(Speed {
            speed_meters_per_second: Self::validate_speed(speed_meters_per_second)?,
            time,
            zone_offset,
            metadata,
        })
    }

    /// Speed in meters per second, within [0, 1000000].
    pub fn speed_meters_per_second(&self) -> f64 {
        self.speed_meters_per_second
    }

    pub fn avg_metric() -> &'static AggregateMetric<f64> {
        &SPEED_AVG
    }

    pub fn min_metric() -> &'static AggregateMetric<f64> {
        &SPEED_MIN
    }

    pub fn max_metric() -> &'static AggregateMetric<f64> {
        &SPEED_MAX
    }

    fn validate_speed(value: f64) -> Result<f64, HealthRecordError> {
        // NaN fails the range check.
        if !(MIN_SPEED_METERS_PER_SECOND..=MAX_SPEED_METERS_PER_SECOND).contains(&value) {
            warn!(value, "rejecting speed outside the valid range");
            return Err(HealthRecordError::invalid_argument(
                "speed_meters_per_second",
                format!(
                    "{} is outside [{}, {}]",
                    value, MIN_SPEED_METERS_PER_SECOND, MAX_SPEED_METERS_PER_SECOND
                ),
            ));
        }
        // -0.0 + 0.0 == +0.0, keeps hash consistent with ==.
        Ok(value + 0.0)
    }
}

impl Record for Speed {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl InstantaneousRecord for Speed {
    fn time(&self) -> DateTime<Utc> {
        self.time
    }

    fn zone_offset(&self) -> Option<FixedOffset> {
        self.zone_offset
    }
}

impl PartialEq for Speed {
    fn eq(&self, other: &Self) -> bool {
        self.speed_meters_per_second == other.speed_meters_per_second
            && self.time == other.time
            && self.zone_offset == other.zone_offset
            && self.metadata == other.metadata
    }
}

impl Eq for Speed {}

impl Hash for Speed {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.speed_meters_per_second.to_bits().hash(state);
        self.time.hash(state);
        self.zone_offset.hash(state);
        self.metadata.hash(state);
    }
}

/// Serialized form. The offset travels as seconds east of UTC.
#[derive(Serialize, Deserialize)]
struct SpeedFields {
    speed_meters_per_second: f64,
    time: DateTime<Utc>,
    #[serde(default)]
    zone_offset_seconds: Option<i32>,
    #[serde(default)]
    metadata: Metadata,
}

impl TryFrom<SpeedFields> for Speed {
    type Error = HealthRecordError;

    fn try_from(fields: SpeedFields) -> Result<Self, Self::Error> {
        let zone_offset = match fields.zone_offset_seconds {
            Some(seconds) => Some(FixedOffset::east_opt(seconds).ok_or_else(|| {
                HealthRecordError::invalid_argument(
                    "zone_offset",
                    format!("{} seconds is not a valid offset", seconds),
                )
            })?),
            None => None,
        };
        Speed::with_metadata(
            fields.speed_meters_per_second,
            fields.time,
            zone_offset,
            fields.metadata,
        )
    }
}

impl From<Speed> for SpeedFields {
    fn from(speed: Speed) -> Self {
        SpeedFields {
            speed_meters_per_second: speed.speed_meters_per_second,
            time: speed.time,
            zone_offset_seconds: speed.zone_offset.map(|offset| offset.local_minus_utc()),
            metadata: speed.metadata,
        }
    }
}
