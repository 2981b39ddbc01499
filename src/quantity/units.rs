use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::quantity::{cost::Cost, rate::UnitRate};

/// Whole number of metered units, either a cumulative meter value or a consumption.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[serde(transparent)]
#[must_use]
pub struct Units(pub u64);

impl Units {
    pub const ZERO: Self = Self(0);

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<UnitRate> for Units {
    type Output = Cost;

    fn mul(self, rhs: UnitRate) -> Self::Output {
        #[allow(clippy::cast_precision_loss)]
        Cost::from(self.0 as f64 * rhs.0.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_mul_rate() {
        let cost = Units(50) * UnitRate::from(3.5);
        assert_abs_diff_eq!(cost.0.0, 175.0);
    }

    #[test]
    fn test_checked_sub() {
        assert_eq!(Units(1200).checked_sub(Units(1000)), Some(Units(200)));
        assert_eq!(Units(900).checked_sub(Units(1000)), None);
        assert_eq!(Units(900).saturating_sub(Units(1000)), Units::ZERO);
    }
}
