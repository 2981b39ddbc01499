use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    core::error::ParseError,
    quantity::{rate::UnitRate, units::Units},
};

/// Case-insensitive spellings of the unbounded threshold.
const UNBOUNDED_MARKERS: [&str; 3] = ["inf", "infty", "above"];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlabThreshold {
    /// The next N units above the preceding slabs.
    Bounded(Units),

    /// Everything above the preceding slabs.
    Unbounded,
}

/// Tariff tier.
///
/// Serialized as the same `units:rate` text that the slab specification uses.
#[derive(Clone, Copy, Debug, Eq, PartialEq, SerializeDisplay, DeserializeFromStr)]
pub struct Slab {
    pub threshold: SlabThreshold,
    pub rate: UnitRate,
}

impl Slab {
    pub fn bounded(units: u64, rate: f64) -> Self {
        Self { threshold: SlabThreshold::Bounded(Units(units)), rate: UnitRate::from(rate) }
    }

    pub fn unbounded(rate: f64) -> Self {
        Self { threshold: SlabThreshold::Unbounded, rate: UnitRate::from(rate) }
    }

    /// Portion of the remaining consumption that falls into this slab.
    pub fn take(self, remaining: Units) -> Units {
        match self.threshold {
            SlabThreshold::Bounded(threshold) => remaining.min(threshold),
            SlabThreshold::Unbounded => remaining,
        }
    }

    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(self.threshold, SlabThreshold::Unbounded)
    }
}

impl Display for Slab {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.threshold {
            SlabThreshold::Bounded(threshold) => write!(f, "{threshold}:{}", self.rate.0),
            SlabThreshold::Unbounded => write!(f, "above:{}", self.rate.0),
        }
    }
}

impl FromStr for Slab {
    type Err = ParseError;

    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        let segment = segment.trim();
        let error = || ParseError::SlabSegment(segment.to_owned());

        let (threshold, rate) = segment.split_once(':').ok_or_else(error)?;
        let (threshold, rate) = (threshold.trim(), rate.trim());

        let threshold = if UNBOUNDED_MARKERS.iter().any(|marker| threshold.eq_ignore_ascii_case(marker))
        {
            SlabThreshold::Unbounded
        } else {
            SlabThreshold::Bounded(threshold.parse().map_err(|_| error())?)
        };
        let rate: f64 = rate.parse().map_err(|_| error())?;
        if !rate.is_finite() || rate < 0.0 {
            return Err(error());
        }

        Ok(Self { threshold, rate: UnitRate::from(rate) })
    }
}

/// Parse the comma-separated slab specification, for example `100:3.5,200:4.5,inf:6.0`.
///
/// Any malformed segment fails the whole specification.
pub fn parse_slabs(specification: &str) -> Result<Vec<Slab>, ParseError> {
    specification.split(',').map(str::parse).collect()
}
