// ============================================================================
// Numeric Module
// Integer price and quantity value objects
// ============================================================================
//
// All prices are expressed in minor units (ticks) and all quantities in lots.
// A price of zero is the "unset" sentinel used by order constructors; it is
// never a valid trading price.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Price in minor units (ticks). Signed so that spreads are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Price(i64);

impl Price {
    /// Sentinel meaning "no price set".
    pub const ZERO: Price = Price(0);
    /// Upper bound, the tolerance of a marketable buy.
    pub const MAX: Price = Price(i64::MAX);
    /// Lower bound, the tolerance of a marketable sell.
    pub const MIN: Price = Price(i64::MIN);

    pub const fn new(ticks: i64) -> Self {
        Self(ticks)
    }

    pub const fn value(&self) -> i64 {
        self.0
    }

    pub const fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for Price {
    fn from(ticks: i64) -> Self {
        Self(ticks)
    }
}

impl Sub for Price {
    type Output = Price;

    fn sub(self, rhs: Price) -> Price {
        Price(self.0 - rhs.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quantity in lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Quantity(u64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub const fn new(lots: u64) -> Self {
        Self(lots)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Quantity {
    fn from(lots: u64) -> Self {
        Self(lots)
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Quantity) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        debug_assert!(self.0 >= rhs.0, "quantity underflow");
        Quantity(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Quantity) {
        debug_assert!(self.0 >= rhs.0, "quantity underflow");
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
