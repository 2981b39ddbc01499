use chrono::NaiveDateTime;

use crate::{
    core::{
        bill::{Bill, BillCharges},
        id::{BillId, ConsumerId, IdAllocator},
        ledger::BillLedger,
        period::Period,
        reading::MeterReading,
        reconciler::{NotBillable, Reconciliation, reconcile},
        tariff::Tariff,
    },
    db::repository::Repository,
    prelude::*,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Created(BillId),
    Updated(BillId),
    Skipped(SkipReason),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, derive_more::Display)]
pub enum SkipReason {
    #[display("not billable: {_0}")]
    NotBillable(NotBillable),

    #[display("bill {_0} is already paid")]
    AlreadyPaid(BillId),

    #[display("conflicts with bill {_0}")]
    Conflict(BillId),
}

/// Turns meter readings into bills priced with the current tariff.
pub struct BillGenerator<'a> {
    tariff: &'a Tariff,
    ids: &'a IdAllocator<BillId>,
}

impl<'a> BillGenerator<'a> {
    pub const fn new(tariff: &'a Tariff, ids: &'a IdAllocator<BillId>) -> Self {
        Self { tariff, ids }
    }

    /// Create or re-price the consumer's bill for the period.
    ///
    /// Repeating the call with unchanged readings updates the same bill in place.
    /// Paid bills are never overwritten.
    pub fn generate<R: Repository<BillId, Bill>>(
        &self,
        ledger: &mut BillLedger<R>,
        consumer_id: ConsumerId,
        readings: &[MeterReading],
        period: Period,
        now: NaiveDateTime,
    ) -> Outcome {
        let consumption = match reconcile(readings, period) {
            Reconciliation::Consumed(consumption) => consumption,
            Reconciliation::NotBillable(reason) => {
                debug!(%consumer_id, %period, %reason, "skipping");
                return Outcome::Skipped(SkipReason::NotBillable(reason));
            }
        };
        let charges = BillCharges::compute(self.tariff, consumption.units);

        if let Some(bill) = ledger.find_mut(consumer_id, period) {
            return match bill.regenerate(charges, now) {
                Ok(()) => {
                    debug!(%consumer_id, %period, id = %bill.id, total = %charges.total, "updated");
                    Outcome::Updated(bill.id)
                }
                Err(_) => Outcome::Skipped(SkipReason::AlreadyPaid(bill.id)),
            };
        }

        let bill = Bill::builder()
            .id(self.ids.allocate())
            .consumer_id(consumer_id)
            .period(period)
            .charges(charges)
            .generated_at(now)
            .build();
        let id = bill.id;
        match ledger.insert(bill) {
            Ok(()) => {
                debug!(%consumer_id, %period, %id, total = %charges.total, "created");
                Outcome::Created(id)
            }
            Err(error) => {
                warn!(%error, "failed to insert the bill");
                Outcome::Skipped(SkipReason::Conflict(error.existing))
            }
        }
    }

    /// Generate the period bills for every consumer.
    ///
    /// Every consumer gets its own outcome: one consumer being skipped does not affect the others.
    #[instrument(skip_all, fields(period = %period))]
    pub fn generate_for_period<'r, R: Repository<BillId, Bill>>(
        &self,
        ledger: &mut BillLedger<R>,
        consumers: impl IntoIterator<Item = (ConsumerId, &'r [MeterReading])>,
        period: Period,
        now: NaiveDateTime,
    ) -> Vec<(ConsumerId, Outcome)> {
        let outcomes: Vec<_> = consumers
            .into_iter()
            .map(|(consumer_id, readings)| {
                (consumer_id, self.generate(ledger, consumer_id, readings, period, now))
            })
            .collect();
        let n_generated =
            outcomes.iter().filter(|(_, outcome)| !matches!(outcome, Outcome::Skipped(_))).count();
        info!(n_consumers = outcomes.len(), n_generated, "generated");
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::quantity::{cost::Cost, units::Units};

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    fn reading(consumer_id: u64, month: u32, day: u32, units: u64) -> MeterReading {
        MeterReading { consumer_id: ConsumerId(consumer_id), at: at(month, day), units: Units(units) }
    }

    fn august() -> Period {
        Period::new(2025, 8).unwrap()
    }

    struct Fixture {
        tariff: Tariff,
        ids: IdAllocator<BillId>,
        ledger: BillLedger,
    }

    impl Fixture {
        fn new() -> Self {
            Self { tariff: Tariff::default(), ids: IdAllocator::default(), ledger: BillLedger::default() }
        }

        fn generate(&mut self, readings: &[MeterReading], now: NaiveDateTime) -> Outcome {
            BillGenerator::new(&self.tariff, &self.ids).generate(
                &mut self.ledger,
                ConsumerId(1),
                readings,
                august(),
                now,
            )
        }

        fn total(&self, id: BillId) -> Cost {
            self.ledger.get(id).unwrap().charges.total
        }
    }

    #[test]
    fn test_created_then_updated() {
        let mut fixture = Fixture::new();
        let readings = [reading(1, 7, 31, 1000), reading(1, 9, 1, 1150)];

        let Outcome::Created(id) = fixture.generate(&readings, at(9, 2)) else { panic!() };
        let total = fixture.total(id);

        assert_eq!(fixture.generate(&readings, at(9, 3)), Outcome::Updated(id));
        assert_eq!(fixture.total(id), total);
        assert_eq!(fixture.ledger.get(id).unwrap().generated_at, at(9, 3));
        assert_eq!(fixture.ledger.iter().count(), 1);
    }

    #[test]
    fn test_update_picks_up_new_readings_and_tariff() {
        let mut fixture = Fixture::new();
        let Outcome::Created(id) =
            fixture.generate(&[reading(1, 7, 31, 1000), reading(1, 8, 20, 1100)], at(8, 21))
        else {
            panic!()
        };
        assert_eq!(fixture.ledger.get(id).unwrap().charges.units, Units(100));

        fixture.tariff = Tariff::default().with_slab_specification("inf:1").unwrap();
        let readings = [reading(1, 7, 31, 1000), reading(1, 8, 20, 1100), reading(1, 9, 1, 1180)];
        assert_eq!(fixture.generate(&readings, at(9, 2)), Outcome::Updated(id));

        let charges = fixture.ledger.get(id).unwrap().charges;
        assert_eq!(charges.units, Units(180));
        assert_eq!(charges.energy, Cost::from(180.0));
    }

    #[test]
    fn test_paid_bill_is_protected() {
        let mut fixture = Fixture::new();
        let readings = [reading(1, 7, 31, 1000), reading(1, 9, 1, 1150)];
        let Outcome::Created(id) = fixture.generate(&readings, at(9, 2)) else { panic!() };
        let total = fixture.total(id);
        fixture.ledger.mark_paid(id, at(9, 5)).unwrap();

        let readings = [reading(1, 7, 31, 1000), reading(1, 9, 1, 1400)];
        assert_eq!(
            fixture.generate(&readings, at(9, 6)),
            Outcome::Skipped(SkipReason::AlreadyPaid(id)),
        );
        assert_eq!(fixture.total(id), total);
        assert_eq!(fixture.ledger.get(id).unwrap().generated_at, at(9, 2));
    }

    #[test]
    fn test_meter_reset_is_skipped() {
        let mut fixture = Fixture::new();
        let readings = [reading(1, 7, 31, 99_000), reading(1, 9, 1, 120)];
        assert_eq!(
            fixture.generate(&readings, at(9, 2)),
            Outcome::Skipped(SkipReason::NotBillable(NotBillable::MeterReset {
                before: Units(99_000),
                after: Units(120),
            })),
        );
        assert_eq!(fixture.ledger.iter().count(), 0);
    }

    #[test]
    fn test_insufficient_readings_are_skipped() {
        let mut fixture = Fixture::new();
        for readings in [&[][..], &[reading(1, 8, 15, 1000)][..]] {
            assert!(matches!(
                fixture.generate(readings, at(9, 2)),
                Outcome::Skipped(SkipReason::NotBillable(NotBillable::InsufficientReadings { .. })),
            ));
        }
        assert_eq!(fixture.ledger.iter().count(), 0);
    }

    #[test]
    fn test_generate_for_period_is_per_consumer() {
        let mut fixture = Fixture::new();
        let first = [reading(1, 7, 31, 1000), reading(1, 9, 1, 1100)];
        let second = [reading(2, 8, 10, 500)];
        let third = [reading(3, 7, 31, 2000), reading(3, 9, 1, 2350)];

        let outcomes = BillGenerator::new(&fixture.tariff, &fixture.ids).generate_for_period(
            &mut fixture.ledger,
            [
                (ConsumerId(1), &first[..]),
                (ConsumerId(2), &second[..]),
                (ConsumerId(3), &third[..]),
            ],
            august(),
            at(9, 2),
        );

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0], (ConsumerId(1), Outcome::Created(BillId(1))));
        assert!(matches!(outcomes[1], (ConsumerId(2), Outcome::Skipped(_))));
        assert_eq!(outcomes[2], (ConsumerId(3), Outcome::Created(BillId(2))));
        assert_eq!(fixture.total(BillId(2)), BillCharges::compute(&fixture.tariff, Units(350)).total);
    }
}
