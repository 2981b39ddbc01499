use bon::Builder;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        error::PaymentError,
        id::{BillId, ConsumerId},
        period::Period,
        tariff::Tariff,
    },
    quantity::{cost::Cost, proportion::TaxRate, units::Units},
};

/// Priced consumption.
///
/// `total = energy + fixed + (energy + fixed) × tax_rate`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BillCharges {
    pub units: Units,
    pub energy: Cost,
    pub fixed: Cost,
    pub tax_rate: TaxRate,
    pub tax: Cost,
    pub total: Cost,
}

impl BillCharges {
    pub fn compute(tariff: &Tariff, units: Units) -> Self {
        let energy = tariff.calculate(units);
        let fixed = tariff.fixed_charge();
        let tax_rate = tariff.tax_rate();
        let subtotal = energy + fixed;
        let tax = subtotal * tax_rate;
        Self { units, energy, fixed, tax_rate, tax, total: subtotal + tax }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Builder)]
pub struct Bill {
    pub id: BillId,
    pub consumer_id: ConsumerId,
    pub period: Period,
    pub charges: BillCharges,
    pub generated_at: NaiveDateTime,

    /// Set once the bill is paid. There is no way back.
    #[serde(default)]
    pub paid_at: Option<NaiveDateTime>,
}

impl Bill {
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        self.paid_at.is_some()
    }

    /// Re-price an unpaid bill in place. Paid bills are never touched.
    pub fn regenerate(&mut self, charges: BillCharges, at: NaiveDateTime) -> Result<(), PaymentError> {
        self.ensure_unpaid()?;
        self.charges = charges;
        self.generated_at = at;
        Ok(())
    }

    pub fn mark_paid(&mut self, at: NaiveDateTime) -> Result<(), PaymentError> {
        self.ensure_unpaid()?;
        self.paid_at = Some(at);
        Ok(())
    }

    const fn ensure_unpaid(&self) -> Result<(), PaymentError> {
        match self.paid_at {
            Some(paid_at) => Err(PaymentError::AlreadyPaid { id: self.id, paid_at }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn bill() -> Bill {
        Bill::builder()
            .id(BillId(1))
            .consumer_id(ConsumerId(1))
            .period(Period::new(2025, 8).unwrap())
            .charges(BillCharges::compute(&Tariff::default(), Units(150)))
            .generated_at(at(1))
            .build()
    }

    #[test]
    fn test_compute_charges() {
        let charges = BillCharges::compute(&Tariff::default(), Units(150));
        assert_eq!(charges.units, Units(150));
        assert_abs_diff_eq!(charges.energy.0.0, 575.0);
        assert_abs_diff_eq!(charges.fixed.0.0, 50.0);
        assert_abs_diff_eq!(charges.tax.0.0, 31.25);
        assert_abs_diff_eq!(charges.total.0.0, 656.25);
    }

    #[test]
    fn test_total_invariant() {
        for units in [0, 1, 99, 100, 101, 300, 301, 12_345] {
            let charges = BillCharges::compute(&Tariff::default(), Units(units));
            let subtotal = charges.energy + charges.fixed;
            assert_abs_diff_eq!(
                charges.total.0.0,
                (subtotal + subtotal * charges.tax_rate).0.0,
                epsilon = 1e-9,
            );
        }
    }

    #[test]
    fn test_mark_paid_once() {
        let mut bill = bill();
        assert!(!bill.is_paid());
        bill.mark_paid(at(5)).unwrap();
        assert!(bill.is_paid());
        assert_eq!(
            bill.mark_paid(at(6)),
            Err(PaymentError::AlreadyPaid { id: BillId(1), paid_at: at(5) }),
        );
        assert_eq!(bill.paid_at, Some(at(5)));
    }

    #[test]
    fn test_regenerate_paid_bill_is_rejected() {
        let mut bill = bill();
        bill.mark_paid(at(5)).unwrap();
        let charges = BillCharges::compute(&Tariff::default(), Units(10));
        assert!(bill.regenerate(charges, at(7)).is_err());
        assert_eq!(bill.charges.units, Units(150));
        assert_eq!(bill.generated_at, at(1));
    }

    #[test]
    fn test_json_round_trip() {
        let mut bill = bill();
        bill.mark_paid(at(5)).unwrap();
        let json = serde_json::to_string(&bill).unwrap();
        assert!(json.contains(r#""period":"2025-08""#));
        assert_eq!(serde_json::from_str::<Bill>(&json).unwrap(), bill);
    }
}
