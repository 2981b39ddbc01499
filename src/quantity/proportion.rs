use std::fmt::{Debug, Display, Formatter};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{core::error::ParseError, fmt::FormattedPercentage};

/// Tax rate as a fraction within `[0, 1)`.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
#[must_use]
pub struct TaxRate(OrderedFloat<f64>);

impl TaxRate {
    #[must_use]
    pub const fn fraction(self) -> f64 {
        self.0.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self(OrderedFloat(0.05))
    }
}

impl TryFrom<f64> for TaxRate {
    type Error = ParseError;

    fn try_from(fraction: f64) -> Result<Self, Self::Error> {
        if (0.0..1.0).contains(&fraction) {
            Ok(Self(OrderedFloat(fraction)))
        } else {
            Err(ParseError::TaxRate(fraction))
        }
    }
}

impl From<TaxRate> for f64 {
    fn from(rate: TaxRate) -> Self {
        rate.fraction()
    }
}

impl Display for TaxRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&FormattedPercentage(self.fraction()), f)
    }
}

impl Debug for TaxRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_accepts_half_open_range() {
        assert!(TaxRate::try_from(0.0).is_ok());
        assert!(TaxRate::try_from(0.999).is_ok());
        assert_eq!(TaxRate::try_from(1.0), Err(ParseError::TaxRate(1.0)));
        assert_eq!(TaxRate::try_from(-0.01), Err(ParseError::TaxRate(-0.01)));
        assert!(TaxRate::try_from(f64::NAN).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(TaxRate::default().to_string(), "5.0%");
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<TaxRate>("0.18").is_ok());
        assert!(serde_json::from_str::<TaxRate>("1.5").is_err());
    }
}
