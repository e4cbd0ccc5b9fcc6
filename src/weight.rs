use core::{cmp::Ordering, fmt, str::FromStr};

use crate::Error;

/// The ordering key of the tree.
///
/// A `Weight` is always a finite `f64`, which makes the ordering total. NaN and the infinities
/// are rejected when the weight is constructed, so the tree itself never sees them.
#[derive(Copy, Clone, Debug)]
pub struct Weight(f64);

impl Weight {
    /// Returns a new weight, or [`Error::InvalidWeight`] if `value` is NaN or infinite.
    pub fn new(value: f64) -> Result<Weight, Error> {
        if value.is_finite() {
            Ok(Weight(value))
        } else {
            Err(Error::InvalidWeight(value))
        }
    }

    /// Returns the underlying value.
    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for Weight {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Weight {}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> Ordering {
        // -0.0 and 0.0 must compare equal, which `total_cmp` would not do.
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

impl TryFrom<f64> for Weight {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Weight::new(value)
    }
}

impl From<Weight> for f64 {
    fn from(weight: Weight) -> f64 {
        weight.0
    }
}

impl FromStr for Weight {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weight::new(s.parse::<f64>()?)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
