use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Price of a single metered unit.
pub type UnitRate = Quantity<-1, 1>;

impl Display for UnitRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/unit", self.0)
    }
}

impl Debug for UnitRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/u", self.0)
    }
}
