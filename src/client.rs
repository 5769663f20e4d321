use async_trait::async_trait;

use crate::error::HealthRecordError;
use crate::metric::{AggregateMetric, AggregationResult};
use crate::time_range::TimeRange;

/// Metrics to compute over the records that fall in `time_range`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRequest {
    pub double_metrics: Vec<AggregateMetric<f64>>,
    pub long_metrics: Vec<AggregateMetric<i64>>,
    pub time_range: TimeRange,
}

impl AggregateRequest {
    pub fn new(time_range: TimeRange) -> Self {
        AggregateRequest {
            double_metrics: Vec::new(),
            long_metrics: Vec::new(),
            time_range,
        }
    }

    pub fn with_metric(mut self, metric: &AggregateMetric<f64>) -> Self {
        if !self.double_metrics.contains(metric) {
            self.double_metrics.push(metric.clone());
        }
        self
    }

    pub fn with_count(mut self, metric: &AggregateMetric<i64>) -> Self {
        if !self.long_metrics.contains(metric) {
            self.long_metrics.push(metric.clone());
        }
        self
    }

    pub fn metric_keys(&self) -> Vec<&str> {
        self.double_metrics
            .iter()
            .map(|metric| metric.metric_key())
            .chain(self.long_metrics.iter().map(|metric| metric.metric_key()))
            .collect()
    }

    pub fn requests<T>(&self, metric: &AggregateMetric<T>) -> bool {
        self.double_metrics
            .iter()
            .any(|requested| requested.describes_same(metric))
            || self
                .long_metrics
                .iter()
                .any(|requested| requested.describes_same(metric))
    }
}

/// Implemented by engines that reduce stored records into an [`AggregationResult`].
#[async_trait]
pub trait Aggregate {
    async fn aggregate(
        &self,
        request: &AggregateRequest,
    ) -> Result<AggregationResult, HealthRecordError>;
}

#[cfg(test)]
mod tests {
    use crate::client::{Aggregate, AggregateRequest};
    use crate::error::HealthRecordError;
    use crate::metadata::{DataOrigin, Metadata};
    use crate::metric::{AggregateMetric, AggregationResult, AggregationType};
    use crate::record::{InstantaneousRecord, Record};
    use crate::speed::{Speed, SPEED_AVG, SPEED_MAX, SPEED_MIN};
    use crate::time_range::TimeRange;
    use async_trait::async_trait;
    use bigdecimal::BigDecimal;
    use chrono::{DateTime, Duration, Utc};
    use std::convert::TryFrom;
    use std::ops::{Add, Div};
    use std::str::FromStr;

    struct InMemoryEngine {
        records: Vec<Speed>,
    }

    #[async_trait]
    impl Aggregate for InMemoryEngine {
        async fn aggregate(
            &self,
            request: &AggregateRequest,
        ) -> Result<AggregationResult, HealthRecordError> {
            let matched: Vec<&Speed> = self
                .records
                .iter()
                .filter(|record| request.time_range.contains(record.time()))
                .collect();
            let mut result = AggregationResult::new();
            let count = AggregateMetric::count_metric("Speed");
            if request.requests(&count) {
                result.set(&count, matched.len() as i64)?;
            }
            if matched.is_empty() {
                return Ok(result);
            }

            let mut total = BigDecimal::from(0);
            let mut minimum = f64::MAX;
            let mut maximum = 0.0f64;
            for record in &matched {
                let value = record.speed_meters_per_second();
                total = total.add(BigDecimal::from_str(&value.to_string()).unwrap());
                minimum = minimum.min(value);
                maximum = maximum.max(value);
                result.add_data_origin(record.metadata().data_origin.clone());
            }
            let length = u32::try_from(matched.len()).unwrap();
            let average = total
                .div(BigDecimal::from(length))
                .to_string()
                .parse::<f64>()
                .unwrap();

            if request.requests(&*SPEED_AVG) {
                result.set(&*SPEED_AVG, average)?;
            }
            if request.requests(&*SPEED_MIN) {
                result.set(&*SPEED_MIN, minimum)?;
            }
            if request.requests(&*SPEED_MAX) {
                result.set(&*SPEED_MAX, maximum)?;
            }
            Ok(result)
        }
    }

    fn start() -> DateTime<Utc> {
        DateTime::<Utc>::from_str("2022-03-14T07:00:00Z").unwrap()
    }

    fn engine() -> InMemoryEngine {
        let origin = Metadata {
            data_origin: DataOrigin::new("com.example.run"),
            ..Metadata::empty()
        };
        InMemoryEngine {
            records: vec![
                Speed::with_metadata(2.5, start(), None, origin.clone()).unwrap(),
                Speed::with_metadata(4.5, start() + Duration::minutes(10), None, origin).unwrap(),
                Speed::new(3.5, start() + Duration::minutes(20), None).unwrap(),
                Speed::new(9.0, start() + Duration::hours(2), None).unwrap(),
            ],
        }
    }

    #[test]
    fn test_request_deduplicates_metrics() {
        let range = TimeRange::between(start(), start() + Duration::hours(1)).unwrap();
        let request = AggregateRequest::new(range)
            .with_metric(&SPEED_AVG)
            .with_metric(Speed::avg_metric())
            .with_metric(&SPEED_MAX);

        assert_eq!(request.metric_keys(), vec!["Speed_speed_avg", "Speed_speed_max"]);
        assert!(request.requests(&*SPEED_MAX));
        assert!(!request.requests(&*SPEED_MIN));

        let same_key = AggregateMetric::long_metric("Speed_speed", AggregationType::Average, None);
        assert_eq!(same_key.metric_key(), SPEED_AVG.metric_key());
        assert!(!request.requests(&same_key));
    }

    #[tokio::test]
    async fn test_aggregate_speed_metrics() {
        let range = TimeRange::between(start(), start() + Duration::hours(1)).unwrap();
        let count = AggregateMetric::count_metric("Speed");
        let request = AggregateRequest::new(range)
            .with_metric(&SPEED_AVG)
            .with_metric(&SPEED_MIN)
            .with_metric(&SPEED_MAX)
            .with_count(&count);

        let result = engine().aggregate(&request).await.unwrap();

        assert_eq!(result.get(Speed::avg_metric()), Some(3.5));
        assert_eq!(result.get(Speed::min_metric()), Some(2.5));
        assert_eq!(result.get(Speed::max_metric()), Some(4.5));
        assert_eq!(result.get(&count), Some(3));
        assert_eq!(result.data_origins().len(), 2);
    }

    #[tokio::test]
    async fn test_aggregate_only_requested_metrics() {
        let range = TimeRange::between(start(), start() + Duration::hours(1)).unwrap();
        let request = AggregateRequest::new(range).with_metric(&SPEED_MAX);

        let result = engine().aggregate(&request).await.unwrap();

        assert_eq!(result.get(&*SPEED_MAX), Some(4.5));
        assert!(!result.contains(&*SPEED_AVG));
        assert!(!result.contains(&*SPEED_MIN));
    }

    #[tokio::test]
    async fn test_aggregate_when_no_records_match() {
        let range = TimeRange::between(
            start() - Duration::hours(2),
            start() - Duration::hours(1),
        )
        .unwrap();
        let request = AggregateRequest::new(range).with_metric(&SPEED_AVG);

        let result = engine().aggregate(&request).await.unwrap();

        assert_eq!(result.get(&*SPEED_AVG), None);
        assert!(result.data_origins().is_empty());
    }
}
