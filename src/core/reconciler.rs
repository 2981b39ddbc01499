//! Derives the consumption of a billing period from cumulative meter readings.
//!
//! The period is bridged by the nearest readings around it rather than requiring a reading
//! exactly at its boundaries:
//!
//! - the «before» reading is the latest one not after the period start, or the earliest
//!   reading overall if the meter was first read later than that;
//! - the «after» reading is the first one not before the period end, or, if the meter has
//!   not been read since, the last reading within the period, or the latest reading overall.
//!
//! With sparse readings the estimate may therefore span more than one period.

use crate::{
    core::{period::Period, reading::MeterReading},
    quantity::units::Units,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reconciliation {
    Consumed(Consumption),
    NotBillable(NotBillable),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Consumption {
    pub before: MeterReading,
    pub after: MeterReading,
    pub units: Units,
}

/// The readings do not support a bill for the period. This is an outcome, not a failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq, derive_more::Display)]
pub enum NotBillable {
    #[display("only {n_readings} reading(s) recorded")]
    InsufficientReadings { n_readings: usize },

    #[display("meter went backwards from {before} to {after} units")]
    MeterReset { before: Units, after: Units },
}

/// Reconcile the period consumption.
///
/// The readings *must* be sorted by timestamp.
pub fn reconcile(readings: &[MeterReading], period: Period) -> Reconciliation {
    let [first, .., last] = readings else {
        return Reconciliation::NotBillable(NotBillable::InsufficientReadings {
            n_readings: readings.len(),
        });
    };

    let start = period.first_instant();
    let end = period.last_instant();

    let before =
        readings[..readings.partition_point(|reading| reading.at <= start)].last().unwrap_or(first);
    let after = readings[readings.partition_point(|reading| reading.at < end)..]
        .first()
        .or_else(|| readings.iter().rev().find(|reading| (start..=end).contains(&reading.at)))
        .unwrap_or(last);

    after.units.checked_sub(before.units).map_or(
        Reconciliation::NotBillable(NotBillable::MeterReset {
            before: before.units,
            after: after.units,
        }),
        |units| Reconciliation::Consumed(Consumption { before: *before, after: *after, units }),
    )
}
