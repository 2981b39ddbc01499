use std::fmt::{Debug, Display, Formatter};

/// Reading timestamps as typed on the command line and shown in tables.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct FormattedPercentage(pub f64);

impl Debug for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Placeholder for absent optional fields.
pub fn optional(value: Option<&str>) -> &str {
    value.filter(|value| !value.is_empty()).unwrap_or("-")
}
