use chrono::{DateTime, FixedOffset, Utc};

use crate::metadata::Metadata;

pub trait Record {
    fn metadata(&self) -> &Metadata;
}

/// A record captured at a single point in time, as opposed to one spanning
/// an interval.
pub trait InstantaneousRecord: Record {
    fn time(&self) -> DateTime<Utc>;

    /// Offset from UTC at `time`, `None` when the writer did not know it.
    fn zone_offset(&self) -> Option<FixedOffset>;
}
