//! Instantaneous speed records and the metric identifiers used to request
//! average, minimum and maximum speed from an aggregation engine.

pub mod client;
pub mod error;
pub mod metadata;
pub mod metric;
pub mod record;
pub mod speed;
pub mod time_range;

pub use client::{Aggregate, AggregateRequest};
pub use error::HealthRecordError;
pub use metadata::{DataOrigin, Device, DeviceType, Metadata};
pub use metric::{AggregateMetric, AggregationResult, AggregationType, MetricValue};
pub use record::{InstantaneousRecord, Record};
pub use speed::{
    Speed, MAX_SPEED_METERS_PER_SECOND, MIN_SPEED_METERS_PER_SECOND, SPEED_AVG, SPEED_MAX,
    SPEED_MIN,
};
pub use time_range::TimeRange;
