pub mod cost;
pub mod proportion;
pub mod rate;
pub mod units;

use std::ops::{Div, Mul};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Floating-point amount tagged with its dimensions: metered units and money.
#[derive(
    Clone,
    Copy,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[must_use]
pub struct Quantity<const UNITS: isize, const COST: isize>(pub OrderedFloat<f64>);

impl<const UNITS: isize, const COST: isize> Quantity<UNITS, COST> {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.0.0.is_finite()
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.0 < 0.0
    }
}

impl<const UNITS: isize, const COST: isize> From<f64> for Quantity<UNITS, COST> {
    fn from(value: f64) -> Self {
        Self(OrderedFloat(value))
    }
}

impl<const UNITS: isize, const COST: isize> Mul<f64> for Quantity<UNITS, COST> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl<const UNITS: isize, const COST: isize> Div<f64> for Quantity<UNITS, COST> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl<const UNITS: isize, const COST: isize> Div<Self> for Quantity<UNITS, COST> {
    type Output = OrderedFloat<f64>;

    fn div(self, rhs: Self) -> Self::Output {
        self.0 / rhs.0
    }
}
