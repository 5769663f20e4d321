//! Provenance attached to every health record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::UNIX_EPOCH;

/// Kind of hardware a record was captured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Unknown,
    Watch,
    Phone,
    Scale,
    Ring,
    HeadMounted,
    FitnessBand,
    ChestStrap,
    SmartDisplay,
}

impl Default for DeviceType {
    fn default() -> Self {
        DeviceType::Unknown
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub device_type: DeviceType,
}

/// Application that wrote the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataOrigin {
    pub package_name: String,
}

impl DataOrigin {
    pub fn new(package_name: impl Into<String>) -> Self {
        DataOrigin {
            package_name: package_name.into(),
        }
    }
}

/// Record provenance. `Metadata::default()` is the empty metadata used when
/// a caller supplies none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metadata {
    /// Identifier assigned by the store, empty until the record is inserted.
    pub id: String,
    pub data_origin: DataOrigin,
    pub last_modified_time: DateTime<Utc>,
    /// Identifier assigned by the writing client, used for upserts.
    pub client_record_id: Option<String>,
    pub client_record_version: i64,
    pub device: Option<Device>,
}

impl Metadata {
    pub fn empty() -> Self {
        Metadata {
            id: String::new(),
            data_origin: DataOrigin::default(),
            last_modified_time: DateTime::<Utc>::from(UNIX_EPOCH),
            client_record_id: None,
            client_record_version: 0,
            device: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Metadata::empty()
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata::empty()
    }
}
