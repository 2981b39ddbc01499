//! Demo data for a fresh data directory.

use chrono::{Months, NaiveDateTime};

use crate::{
    core::{
        id::ConsumerId,
        reading::MeterReading,
        register::{ConsumerRegister, NewConsumer},
    },
    prelude::*,
    quantity::units::Units,
};

const N_MONTHS: u32 = 6;

/// Populate an empty register with two consumers and half a year of monthly readings.
///
/// Returns whether anything was created.
#[instrument(skip_all)]
pub fn bootstrap_if_empty(register: &mut ConsumerRegister, now: NaiveDateTime) -> Result<bool> {
    if !register.is_empty() {
        return Ok(false);
    }
    let joined_on = now.date().checked_sub_months(Months::new(12)).context("date underflow")?;
    let demo = [
        (
            NewConsumer::builder()
                .name("Anita Kulkarni")
                .address("Pune")
                .phone("9800000001")
                .meter_number("MTR-1001")
                .build(),
            Units(1000),
            Units(120),
        ),
        (
            NewConsumer::builder()
                .name("Rohan Das")
                .address("Kolkata")
                .phone("9800000002")
                .meter_number("MTR-1002")
                .build(),
            Units(800),
            Units(90),
        ),
    ];
    for (details, initial, monthly) in demo {
        let consumer_id = register.add(details, joined_on);
        record_monthly(register, consumer_id, now, initial, monthly)?;
    }
    info!("created the demo consumers");
    Ok(true)
}

/// Append half a year of monthly readings to every consumer.
///
/// Each consumer gets its own starting value and monthly increment, derived from the id.
#[instrument(skip_all)]
pub fn import_sample_readings(register: &mut ConsumerRegister, now: NaiveDateTime) -> Result {
    let consumer_ids: Vec<ConsumerId> = register.iter().map(|consumer| consumer.id).collect();
    for consumer_id in &consumer_ids {
        let initial = Units(1000 + consumer_id.0 * 50);
        let monthly = Units(80 + (consumer_id.0 % 5) * 10);
        record_monthly(register, *consumer_id, now, initial, monthly)?;
    }
    info!(n_consumers = consumer_ids.len(), "imported the sample readings");
    Ok(())
}

/// Record a reading per month, the last one at `now`.
fn record_monthly(
    register: &mut ConsumerRegister,
    consumer_id: ConsumerId,
    now: NaiveDateTime,
    initial: Units,
    monthly: Units,
) -> Result {
    let mut units = initial;
    for months_ago in (0..N_MONTHS).rev() {
        units += monthly;
        let at = now.checked_sub_months(Months::new(months_ago)).context("date underflow")?;
        register.record_reading(MeterReading { consumer_id, at, units })?;
    }
    Ok(())
}
