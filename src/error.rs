use std::error::Error;

use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum HealthRecordError {
    InvalidArgument {
        field: &'static str,
        message: String,
    },
    MetricValueType {
        metric_key: String,
    },
}

impl HealthRecordError {
    pub(crate) fn invalid_argument(field: &'static str, message: impl Into<String>) -> Self {
        HealthRecordError::InvalidArgument {
            field,
            message: message.into(),
        }
    }
}

impl Display for HealthRecordError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            HealthRecordError::InvalidArgument {
                field,
                ref message,
            } => write!(f, "Invalid argument `{}`: {}", field, message),
            HealthRecordError::MetricValueType { ref metric_key } => {
                write!(f, "Metric {} holds a value of another type", metric_key)
            }
        }
    }
}

impl Error for HealthRecordError {}

#[cfg(test)]
mod tests {
    use crate::error::HealthRecordError;

    #[test]
    fn test_display_names_field() {
        let error = HealthRecordError::invalid_argument("speed", "-1 is below 0");
        assert_eq!(
            error.to_string(),
            "Invalid argument `speed`: -1 is below 0"
        );
    }

    #[test]
    fn test_display_metric_value_type() {
        let error = HealthRecordError::MetricValueType {
            metric_key: "Speed_speed_avg".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Metric Speed_speed_avg holds a value of another type"
        );
    }
}
