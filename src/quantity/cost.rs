use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{Quantity, proportion::TaxRate};

/// Monetary amount in the tariff's (single) currency.
pub type Cost = Quantity<0, 1>;

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl Mul<TaxRate> for Cost {
    type Output = Self;

    fn mul(self, rhs: TaxRate) -> Self::Output {
        self * rhs.fraction()
    }
}
