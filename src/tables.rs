use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        bill::{Bill, BillCharges},
        consumer::Consumer,
        generator::{Outcome, SkipReason},
        id::ConsumerId,
        reading::MeterReading,
        register::ConsumerRegister,
        tariff::{SlabThreshold, Tariff},
    },
    fmt::{TIMESTAMP_FORMAT, optional},
    quantity::units::Units,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn consumer_name(register: &ConsumerRegister, consumer_id: ConsumerId) -> Cell {
    register.get(consumer_id).map_or_else(
        || Cell::new("(removed)").add_attribute(Attribute::Dim),
        |consumer| Cell::new(&consumer.name),
    )
}

fn paid_cell(bill: &Bill, unpaid: &str) -> Cell {
    bill.paid_at.map_or_else(
        || Cell::new(unpaid).fg(Color::Red),
        |paid_at| Cell::new(paid_at.format(TIMESTAMP_FORMAT)).fg(Color::Green),
    )
}

pub fn build_consumers_table<'a>(consumers: impl IntoIterator<Item = &'a Consumer>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Name", "Address", "Phone", "Meter", "Joined"]);
    for consumer in consumers {
        table.add_row(vec![
            Cell::new(consumer.id).set_alignment(CellAlignment::Right),
            Cell::new(&consumer.name),
            Cell::new(optional(consumer.address.as_deref())),
            Cell::new(optional(consumer.phone.as_deref())),
            Cell::new(optional(consumer.meter_number.as_deref())).add_attribute(Attribute::Dim),
            Cell::new(consumer.joined_on).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

/// Readings with the increment over the previous one.
pub fn build_readings_table(readings: &[MeterReading]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Timestamp", "Units", "Delta"]);
    let mut previous: Option<Units> = None;
    for reading in readings {
        let delta = previous.map_or_else(
            || Cell::new("-").add_attribute(Attribute::Dim),
            |previous| {
                reading
                    .units
                    .checked_sub(previous)
                    .map_or_else(|| Cell::new("reset").fg(Color::Red), Cell::new)
            },
        );
        table.add_row(vec![
            Cell::new(reading.at.format(TIMESTAMP_FORMAT)),
            Cell::new(reading.units).set_alignment(CellAlignment::Right),
            delta.set_alignment(CellAlignment::Right),
        ]);
        previous = Some(reading.units);
    }
    table
}

pub fn build_bills_table<'a>(
    bills: impl IntoIterator<Item = &'a Bill>,
    register: &ConsumerRegister,
) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Consumer", "Period", "Units", "Total", "Generated", "Paid"]);
    for bill in bills {
        table.add_row(vec![
            Cell::new(bill.id).set_alignment(CellAlignment::Right),
            consumer_name(register, bill.consumer_id),
            Cell::new(bill.period),
            Cell::new(bill.charges.units).set_alignment(CellAlignment::Right),
            Cell::new(bill.charges.total).set_alignment(CellAlignment::Right),
            Cell::new(bill.generated_at.format(TIMESTAMP_FORMAT)).add_attribute(Attribute::Dim),
            paid_cell(bill, "unpaid"),
        ]);
    }
    table
}

/// Single bill breakdown.
pub fn build_bill_table(bill: &Bill, register: &ConsumerRegister) -> Table {
    let mut table = new_table();
    table.add_row(vec![Cell::new("Bill"), Cell::new(bill.id)]);
    table.add_row(vec![Cell::new("Consumer"), consumer_name(register, bill.consumer_id)]);
    table.add_row(vec![Cell::new("Period"), Cell::new(bill.period)]);
    add_charges_rows(&mut table, &bill.charges);
    table.add_row(vec![
        Cell::new("Generated"),
        Cell::new(bill.generated_at.format(TIMESTAMP_FORMAT)),
    ]);
    table.add_row(vec![
        Cell::new("Paid"),
        paid_cell(bill, "no"),
    ]);
    table
}

/// Charge breakdown, as previewed for a consumption.
pub fn build_charges_table(charges: &BillCharges) -> Table {
    let mut table = new_table();
    add_charges_rows(&mut table, charges);
    table
}

fn add_charges_rows(table: &mut Table, charges: &BillCharges) {
    table.add_row(vec![Cell::new("Units"), Cell::new(charges.units)]);
    table.add_row(vec![Cell::new("Energy charge"), Cell::new(charges.energy)]);
    table.add_row(vec![Cell::new("Fixed charge"), Cell::new(charges.fixed)]);
    table.add_row(vec![
        Cell::new(format!("Tax ({})", charges.tax_rate)),
        Cell::new(charges.tax),
    ]);
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(charges.total).add_attribute(Attribute::Bold),
    ]);
}

pub fn build_tariff_table(tariff: &Tariff) -> Table {
    let mut table = new_table();
    table.set_header(vec!["From", "To", "Rate"]);
    let mut lower = Units::ZERO;
    for slab in tariff.slabs() {
        let (to, upper) = match slab.threshold {
            SlabThreshold::Bounded(threshold) => {
                let upper = lower + threshold;
                (Cell::new(upper), upper)
            }
            SlabThreshold::Unbounded => (Cell::new("∞").add_attribute(Attribute::Dim), lower),
        };
        table.add_row(vec![
            Cell::new(lower + Units(1)).set_alignment(CellAlignment::Right),
            to.set_alignment(CellAlignment::Right),
            Cell::new(slab.rate).set_alignment(CellAlignment::Right),
        ]);
        lower = upper;
    }
    table.add_row(vec![
        Cell::new("Fixed charge").add_attribute(Attribute::Dim),
        Cell::new(""),
        Cell::new(tariff.fixed_charge()).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Tax").add_attribute(Attribute::Dim),
        Cell::new(""),
        Cell::new(tariff.tax_rate()).set_alignment(CellAlignment::Right),
    ]);
    table
}

pub fn build_outcomes_table(outcomes: &[(ConsumerId, Outcome)], register: &ConsumerRegister) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Consumer", "Name", "Outcome", "Bill"]);
    for (consumer_id, outcome) in outcomes {
        let (outcome, bill) = match outcome {
            Outcome::Created(id) => (Cell::new("created").fg(Color::Green), Cell::new(id)),
            Outcome::Updated(id) => (Cell::new("updated").fg(Color::DarkYellow), Cell::new(id)),
            Outcome::Skipped(reason @ SkipReason::NotBillable(_)) => {
                (Cell::new(reason).add_attribute(Attribute::Dim), Cell::new("-"))
            }
            Outcome::Skipped(reason @ (SkipReason::AlreadyPaid(id) | SkipReason::Conflict(id))) => {
                (Cell::new(reason).fg(Color::Red), Cell::new(id))
            }
        };
        table.add_row(vec![
            Cell::new(consumer_id).set_alignment(CellAlignment::Right),
            consumer_name(register, *consumer_id),
            outcome,
            bill.set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Lifetime consumption per consumer.
pub fn build_consumption_table(register: &ConsumerRegister) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Name", "Readings", "Consumption"]);
    for consumer in register.iter() {
        let (n_readings, consumption) = register
            .meter_readings(consumer.id)
            .map_or((0, Units::ZERO), |readings| (readings.len(), readings.total_consumption()));
        table.add_row(vec![
            Cell::new(consumer.id).set_alignment(CellAlignment::Right),
            Cell::new(&consumer.name),
            Cell::new(n_readings).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
            Cell::new(consumption).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
