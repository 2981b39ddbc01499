use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    core::{
        bill::Bill,
        error::{DuplicateBill, PaymentError},
        id::{BillId, ConsumerId},
        period::Period,
    },
    db::repository::{InMemory, Repository},
};

/// Issued bills, at most one per consumer and period.
#[derive(Default)]
pub struct BillLedger<R = InMemory<BillId, Bill>> {
    bills: R,
}

impl<R: Repository<BillId, Bill>> BillLedger<R> {
    pub fn insert(&mut self, bill: Bill) -> Result<(), DuplicateBill> {
        if let Some(existing) = self.find(bill.consumer_id, bill.period) {
            return Err(DuplicateBill {
                existing: existing.id,
                consumer_id: bill.consumer_id,
                period: bill.period,
            });
        }
        self.bills.insert(bill.id, bill);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: BillId) -> Option<&Bill> {
        self.bills.get(&id)
    }

    #[must_use]
    pub fn find(&self, consumer_id: ConsumerId, period: Period) -> Option<&Bill> {
        self.bills.values().find(|bill| bill.consumer_id == consumer_id && bill.period == period)
    }

    pub(crate) fn find_mut(&mut self, consumer_id: ConsumerId, period: Period) -> Option<&mut Bill> {
        self.bills.values_mut().find(|bill| bill.consumer_id == consumer_id && bill.period == period)
    }

    /// Record the payment. Fails if the bill is missing or already paid.
    pub fn mark_paid(&mut self, id: BillId, at: NaiveDateTime) -> Result<&Bill, PaymentError> {
        let bill = self.bills.get_mut(&id).ok_or(PaymentError::NotFound(id))?;
        bill.mark_paid(at)?;
        Ok(bill)
    }

    #[must_use]
    pub fn has_bills_for(&self, consumer_id: ConsumerId) -> bool {
        self.bills.values().any(|bill| bill.consumer_id == consumer_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bill> {
        self.bills.values()
    }

    pub fn filter<'a>(&'a self, filter: &'a BillFilter) -> impl Iterator<Item = &'a Bill> {
        self.iter().filter(|bill| filter.matches(bill))
    }
}

/// Bill enumeration criteria. Unset criteria match everything.
#[derive(Clone, Debug, Default, bon::Builder)]
pub struct BillFilter {
    pub paid: Option<bool>,
    pub consumer_id: Option<ConsumerId>,

    /// Inclusive.
    pub from_period: Option<Period>,

    /// Inclusive.
    pub to_period: Option<Period>,

    /// Inclusive, by the generation date.
    pub generated_from: Option<NaiveDate>,

    /// Inclusive, by the generation date.
    pub generated_to: Option<NaiveDate>,
}

impl BillFilter {
    #[must_use]
    pub fn matches(&self, bill: &Bill) -> bool {
        let generated_on = bill.generated_at.date();
        self.paid.is_none_or(|paid| bill.is_paid() == paid)
            && self.consumer_id.is_none_or(|consumer_id| bill.consumer_id == consumer_id)
            && self.from_period.is_none_or(|from| bill.period >= from)
            && self.to_period.is_none_or(|to| bill.period <= to)
            && self.generated_from.is_none_or(|from| generated_on >= from)
            && self.generated_to.is_none_or(|to| generated_on <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{bill::BillCharges, tariff::Tariff},
        quantity::units::Units,
    };

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn bill(id: u64, consumer_id: u64, month: u32) -> Bill {
        Bill::builder()
            .id(BillId(id))
            .consumer_id(ConsumerId(consumer_id))
            .period(Period::new(2025, month).unwrap())
            .charges(BillCharges::compute(&Tariff::default(), Units(100)))
            .generated_at(at(month + 1, 2))
            .build()
    }

    fn ledger() -> BillLedger {
        let mut ledger: BillLedger = BillLedger::default();
        ledger.insert(bill(1, 1, 6)).unwrap();
        ledger.insert(bill(2, 2, 6)).unwrap();
        ledger.insert(bill(3, 1, 7)).unwrap();
        ledger.insert(bill(4, 1, 8)).unwrap();
        ledger
    }

    fn ids<'a>(bills: impl Iterator<Item = &'a Bill>) -> Vec<u64> {
        bills.map(|bill| bill.id.0).collect()
    }

    #[test]
    fn test_insert_rejects_duplicate_period() {
        let mut ledger = ledger();
        assert_eq!(
            ledger.insert(bill(5, 1, 7)),
            Err(DuplicateBill {
                existing: BillId(3),
                consumer_id: ConsumerId(1),
                period: Period::new(2025, 7).unwrap(),
            }),
        );
        assert!(ledger.get(BillId(5)).is_none());
    }

    #[test]
    fn test_find() {
        let ledger = ledger();
        assert_eq!(ledger.find(ConsumerId(2), Period::new(2025, 6).unwrap()).map(|bill| bill.id), Some(BillId(2)));
        assert!(ledger.find(ConsumerId(2), Period::new(2025, 7).unwrap()).is_none());
    }

    #[test]
    fn test_mark_paid() {
        let mut ledger = ledger();
        assert!(ledger.mark_paid(BillId(2), at(7, 10)).unwrap().is_paid());
        assert_eq!(
            ledger.mark_paid(BillId(2), at(7, 11)),
            Err(PaymentError::AlreadyPaid { id: BillId(2), paid_at: at(7, 10) }),
        );
        assert_eq!(ledger.mark_paid(BillId(42), at(7, 11)), Err(PaymentError::NotFound(BillId(42))));
    }

    #[test]
    fn test_filter() {
        let mut ledger = ledger();
        ledger.mark_paid(BillId(1), at(7, 10)).unwrap();

        assert_eq!(ids(ledger.filter(&BillFilter::default())), [1, 2, 3, 4]);
        assert_eq!(ids(ledger.filter(&BillFilter::builder().paid(false).build())), [2, 3, 4]);
        assert_eq!(ids(ledger.filter(&BillFilter::builder().paid(true).build())), [1]);
        assert_eq!(
            ids(ledger.filter(&BillFilter::builder().consumer_id(ConsumerId(1)).build())),
            [1, 3, 4],
        );
        assert_eq!(
            ids(ledger.filter(
                &BillFilter::builder()
                    .from_period(Period::new(2025, 7).unwrap())
                    .to_period(Period::new(2025, 7).unwrap())
                    .build()
            )),
            [3],
        );
        assert_eq!(
            ids(ledger.filter(
                &BillFilter::builder()
                    .generated_from(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap())
                    .generated_to(NaiveDate::from_ymd_opt(2025, 8, 2).unwrap())
                    .build()
            )),
            [3],
        );
    }

    #[test]
    fn test_has_bills_for() {
        let ledger = ledger();
        assert!(ledger.has_bills_for(ConsumerId(2)));
        assert!(!ledger.has_bills_for(ConsumerId(3)));
    }
}
