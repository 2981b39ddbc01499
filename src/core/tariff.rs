pub mod slab;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub use self::slab::{Slab, SlabThreshold, parse_slabs};
use crate::{
    core::error::{ParseError, TariffError},
    quantity::{cost::Cost, proportion::TaxRate, units::Units},
};

/// Slab tariff with a fixed charge and tax.
///
/// The tariff is versionless: a bill is always priced with the tariff in force at the time of
/// generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedTariff")]
pub struct Tariff {
    slabs: Vec<Slab>,
    fixed_charge: Cost,
    tax_rate: TaxRate,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            slabs: vec![Slab::bounded(100, 3.5), Slab::bounded(200, 4.5), Slab::unbounded(6.0)],
            fixed_charge: Cost::from(50.0),
            tax_rate: TaxRate::default(),
        }
    }
}

impl Tariff {
    pub fn try_new(slabs: Vec<Slab>, fixed_charge: Cost, tax_rate: TaxRate) -> Result<Self, ParseError> {
        Self::validate_slabs(&slabs)?;
        Self::validate_fixed_charge(fixed_charge)?;
        Ok(Self { slabs, fixed_charge, tax_rate })
    }

    /// Replace the slabs, keeping the fixed charge and tax.
    pub fn with_slabs(self, slabs: Vec<Slab>) -> Result<Self, ParseError> {
        Self::try_new(slabs, self.fixed_charge, self.tax_rate)
    }

    /// Replace the slabs from the textual specification, see [`parse_slabs`].
    pub fn with_slab_specification(self, specification: &str) -> Result<Self, ParseError> {
        self.with_slabs(parse_slabs(specification)?)
    }

    pub fn with_fixed_charge(self, fixed_charge: Cost) -> Result<Self, ParseError> {
        Self::try_new(self.slabs, fixed_charge, self.tax_rate)
    }

    #[must_use]
    pub const fn with_tax_rate(mut self, tax_rate: TaxRate) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    #[must_use]
    pub fn slabs(&self) -> &[Slab] {
        &self.slabs
    }

    pub const fn fixed_charge(&self) -> Cost {
        self.fixed_charge
    }

    pub const fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Energy charge for the consumed units, excluding the fixed charge and tax.
    ///
    /// Slab thresholds are incremental: each slab prices the next `threshold` units above
    /// the preceding ones. Units beyond a tariff without an unbounded slab are not charged.
    pub fn calculate(&self, consumed: Units) -> Cost {
        let mut remaining = consumed;
        let mut charge = Cost::ZERO;
        for slab in &self.slabs {
            if remaining == Units::ZERO {
                break;
            }
            let taken = slab.take(remaining);
            charge += taken * slab.rate;
            remaining -= taken;
        }
        charge
    }

    fn validate_slabs(slabs: &[Slab]) -> Result<(), TariffError> {
        if slabs.is_empty() {
            return Err(TariffError::NoSlabs);
        }
        if let Some(position) = slabs[..slabs.len() - 1].iter().position(|slab| slab.is_unbounded()) {
            return Err(TariffError::UnboundedNotLast { position });
        }
        Ok(())
    }

    fn validate_fixed_charge(fixed_charge: Cost) -> Result<(), ParseError> {
        if fixed_charge.is_finite() && !fixed_charge.is_negative() {
            Ok(())
        } else {
            Err(ParseError::Amount(fixed_charge.0.0))
        }
    }
}

impl Display for Tariff {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for slab in &self.slabs {
            write!(f, "[{slab}]")?;
        }
        write!(f, " fixed:{} tax:{}", self.fixed_charge, self.tax_rate)
    }
}

#[derive(Deserialize)]
struct UncheckedTariff {
    slabs: Vec<Slab>,
    fixed_charge: Cost,
    tax_rate: TaxRate,
}

impl TryFrom<UncheckedTariff> for Tariff {
    type Error = ParseError;

    fn try_from(unchecked: UncheckedTariff) -> Result<Self, Self::Error> {
        Self::try_new(unchecked.slabs, unchecked.fixed_charge, unchecked.tax_rate)
    }
}
