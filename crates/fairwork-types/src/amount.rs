use serde::{Deserialize, Serialize};
use std::fmt;

pub const TOKEN_DECIMALS: u32 = 8;
pub const TOKEN_BASE_UNIT: u64 = 100_000_000; // 10^8

/// Token value in indivisible base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenAmount(u64);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    /// Convert a display-unit value to base units, rounding to nearest.
    pub fn from_display(display: f64) -> Self {
        Self((display * TOKEN_BASE_UNIT as f64).round() as u64)
    }

    pub fn from_base_units(units: u64) -> Self {
        Self(units)
    }

    pub fn to_display(&self) -> f64 {
        self.0 as f64 / TOKEN_BASE_UNIT as f64
    }

    pub fn to_base_units(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(&self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(&self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(&self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.8} FAIR", self.to_display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let amount = TokenAmount::from_display(5.0);
        assert_eq!(amount.to_base_units(), 5 * TOKEN_BASE_UNIT);
        assert!((amount.to_display() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_display_rounds_to_nearest() {
        // 0.000000015 display units is 1.5 base units; nearest integer is 2
        let amount = TokenAmount::from_display(0.000000015);
        assert_eq!(amount.to_base_units(), 2);

        let amount = TokenAmount::from_display(0.000000014);
        assert_eq!(amount.to_base_units(), 1);
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = TokenAmount::from_base_units(100);
        let b = TokenAmount::from_base_units(30);

        assert_eq!(a.checked_add(b), Some(TokenAmount::from_base_units(130)));
        assert_eq!(a.checked_sub(b), Some(TokenAmount::from_base_units(70)));
        assert_eq!(b.checked_sub(a), None);

        let max = TokenAmount::from_base_units(u64::MAX);
        assert_eq!(max.checked_add(a), None);
        assert_eq!(max.saturating_add(a), max);
    }

    #[test]
    fn test_ordering() {
        assert!(TokenAmount::from_display(10.0) < TokenAmount::from_display(15.0));
        assert_eq!(TokenAmount::ZERO, TokenAmount::from_base_units(0));
    }
}
