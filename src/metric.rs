//! Aggregate metric descriptors and the typed results an aggregation engine
//! returns for them.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::HealthRecordError;
use crate::metadata::DataOrigin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationType {
    Total,
    Average,
    Minimum,
    Maximum,
    Count,
}

impl AggregationType {
    /// Suffix used when building a metric key.
    pub fn as_str(&self) -> &'static str {
        match *self {
            AggregationType::Total => "total",
            AggregationType::Average => "avg",
            AggregationType::Minimum => "min",
            AggregationType::Maximum => "max",
            AggregationType::Count => "count",
        }
    }
}

/// Key identifying one statistic over one field of one record type. `T` is
/// the type of the value the engine reports under it.
pub struct AggregateMetric<T> {
    data_type_name: &'static str,
    aggregation_type: AggregationType,
    field_name: Option<&'static str>,
    metric_key: String,
    value_type: PhantomData<fn() -> T>,
}

impl<T> AggregateMetric<T> {
    fn new(
        data_type_name: &'static str,
        aggregation_type: AggregationType,
        field_name: Option<&'static str>,
    ) -> Self {
        let metric_key = match field_name {
            Some(field) => format!("{}_{}_{}", data_type_name, field, aggregation_type.as_str()),
            None => format!("{}_{}", data_type_name, aggregation_type.as_str()),
        };
        AggregateMetric {
            data_type_name,
            aggregation_type,
            field_name,
            metric_key,
            value_type: PhantomData,
        }
    }

    pub fn data_type_name(&self) -> &'static str {
        self.data_type_name
    }

    pub fn aggregation_type(&self) -> AggregationType {
        self.aggregation_type
    }

    pub fn field_name(&self) -> Option<&'static str> {
        self.field_name
    }

    pub fn metric_key(&self) -> &str {
        &self.metric_key
    }

    /// Whether `other` names the same statistic over the same field,
    /// regardless of the value type each reports.
    pub fn describes_same<U>(&self, other: &AggregateMetric<U>) -> bool {
        self.data_type_name == other.data_type_name
            && self.aggregation_type == other.aggregation_type
            && self.field_name == other.field_name
    }
}

impl AggregateMetric<f64> {
    pub fn double_metric(
        data_type_name: &'static str,
        aggregation_type: AggregationType,
        field_name: &'static str,
    ) -> Self {
        AggregateMetric::new(data_type_name, aggregation_type, Some(field_name))
    }
}

impl AggregateMetric<i64> {
    pub fn long_metric(
        data_type_name: &'static str,
        aggregation_type: AggregationType,
        field_name: Option<&'static str>,
    ) -> Self {
        AggregateMetric::new(data_type_name, aggregation_type, field_name)
    }

    /// Number of records of `data_type_name` matching a request.
    pub fn count_metric(data_type_name: &'static str) -> Self {
        AggregateMetric::new(data_type_name, AggregationType::Count, None)
    }
}

impl<T> Clone for AggregateMetric<T> {
    fn clone(&self) -> Self {
        AggregateMetric {
            data_type_name: self.data_type_name,
            aggregation_type: self.aggregation_type,
            field_name: self.field_name,
            metric_key: self.metric_key.clone(),
            value_type: PhantomData,
        }
    }
}

impl<T> PartialEq for AggregateMetric<T> {
    fn eq(&self, other: &Self) -> bool {
        self.describes_same(other)
    }
}

impl<T> Eq for AggregateMetric<T> {}

impl<T> Hash for AggregateMetric<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data_type_name.hash(state);
        self.aggregation_type.hash(state);
        self.field_name.hash(state);
    }
}

impl<T> fmt::Debug for AggregateMetric<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AggregateMetric")
            .field("data_type_name", &self.data_type_name)
            .field("aggregation_type", &self.aggregation_type)
            .field("field_name", &self.field_name)
            .field("metric_key", &self.metric_key)
            .finish()
    }
}

/// Values an [`AggregationResult`] can hold.
pub trait MetricValue: Copy + sealed::Sealed {
    fn read(result: &AggregationResult, metric_key: &str) -> Option<Self>;

    fn write(
        result: &mut AggregationResult,
        metric_key: &str,
        value: Self,
    ) -> Result<(), HealthRecordError>;
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for f64 {}
    impl Sealed for i64 {}
}

impl MetricValue for f64 {
    fn read(result: &AggregationResult, metric_key: &str) -> Option<Self> {
        result.double_values.get(metric_key).copied()
    }

    fn write(
        result: &mut AggregationResult,
        metric_key: &str,
        value: Self,
    ) -> Result<(), HealthRecordError> {
        if result.long_values.contains_key(metric_key) {
            debug!(metric_key, "metric already holds an integer value");
            return Err(HealthRecordError::MetricValueType {
                metric_key: metric_key.to_string(),
            });
        }
        result.double_values.insert(metric_key.to_string(), value);
        Ok(())
    }
}

impl MetricValue for i64 {
    fn read(result: &AggregationResult, metric_key: &str) -> Option<Self> {
        result.long_values.get(metric_key).copied()
    }

    fn write(
        result: &mut AggregationResult,
        metric_key: &str,
        value: Self,
    ) -> Result<(), HealthRecordError> {
        if result.double_values.contains_key(metric_key) {
            debug!(metric_key, "metric already holds a floating point value");
            return Err(HealthRecordError::MetricValueType {
                metric_key: metric_key.to_string(),
            });
        }
        result.long_values.insert(metric_key.to_string(), value);
        Ok(())
    }
}

/// Statistics produced by an aggregation engine, looked up by metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    long_values: HashMap<String, i64>,
    double_values: HashMap<String, f64>,
    data_origins: HashSet<DataOrigin>,
}

impl AggregationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when the engine had no data for `metric`.
    pub fn get<T: MetricValue>(&self, metric: &AggregateMetric<T>) -> Option<T> {
        T::read(self, metric.metric_key())
    }

    pub fn contains<T: MetricValue>(&self, metric: &AggregateMetric<T>) -> bool {
        self.get(metric).is_some()
    }

    pub fn set<T: MetricValue>(
        &mut self,
        metric: &AggregateMetric<T>,
        value: T,
    ) -> Result<(), HealthRecordError> {
        T::write(self, metric.metric_key(), value)
    }

    pub fn add_data_origin(&mut self, origin: DataOrigin) {
        self.data_origins.insert(origin);
    }

    /// Apps whose records contributed to the result.
    pub fn data_origins(&self) -> &HashSet<DataOrigin> {
        &self.data_origins
    }
}
