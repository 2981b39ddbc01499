use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{core::id::ConsumerId, quantity::units::Units};

/// Cumulative meter value at a point in time.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    pub consumer_id: ConsumerId,
    pub at: NaiveDateTime,
    pub units: Units,
}

/// Readings of a single meter, always sorted by timestamp.
///
/// Readings with equal timestamps keep their insertion order.
#[derive(Clone, Debug, Default, derive_more::Deref)]
pub struct MeterReadings(Vec<MeterReading>);

impl MeterReadings {
    pub fn insert(&mut self, reading: MeterReading) {
        let index = self.0.partition_point(|existing| existing.at <= reading.at);
        self.0.insert(index, reading);
    }

    /// Units metered between the first and the last reading.
    ///
    /// Zero when there are fewer than two readings, or the meter went backwards.
    pub fn total_consumption(&self) -> Units {
        match self.0.as_slice() {
            [first, .., last] => last.units.saturating_sub(first.units),
            _ => Units::ZERO,
        }
    }
}

impl FromIterator<MeterReading> for MeterReadings {
    fn from_iter<T: IntoIterator<Item = MeterReading>>(iter: T) -> Self {
        let mut readings: Vec<_> = iter.into_iter().collect();
        readings.sort_by_key(|reading| reading.at);
        Self(readings)
    }
}

impl Extend<MeterReading> for MeterReadings {
    fn extend<T: IntoIterator<Item = MeterReading>>(&mut self, iter: T) {
        for reading in iter {
            self.insert(reading);
        }
    }
}
