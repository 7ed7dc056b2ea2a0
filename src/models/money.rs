//! Monetary amounts in Mauritanian ouguiya (MRU).

use serde::{Deserialize, Serialize};

/// A non-negative amount in the smallest whole currency unit (MRU).
///
/// Arithmetic saturates instead of wrapping: a cart total can never
/// silently overflow into a small number.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from a raw value in the smallest currency unit.
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value in the smallest currency unit.
    #[inline]
    #[must_use]
    pub const fn as_inner(self) -> u64 {
        self.0
    }

    /// Adds two amounts, saturating at `u64::MAX`.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Multiplies the amount by a quantity, saturating at `u64::MAX`.
    #[inline]
    #[must_use]
    pub const fn saturating_mul(self, factor: u64) -> Self {
        Self(self.0.saturating_mul(factor))
    }
}

impl From<u64> for Amount {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for Amount {
    /// Formats with thousands grouping and the currency suffix,
    /// e.g. `12 500 MRU`.
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} MRU", group_thousands(self.0))
    }
}

/// Renders a number with space-separated thousands groups.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len().div_ceil(3));
    let offset = digits.len() % 3;
    for (pos, ch) in digits.chars().enumerate() {
        if pos != 0 && pos % 3 == offset % 3 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Amount::new(0).to_string(), "0 MRU");
        assert_eq!(Amount::new(950).to_string(), "950 MRU");
        assert_eq!(Amount::new(1_000).to_string(), "1 000 MRU");
        assert_eq!(Amount::new(12_500).to_string(), "12 500 MRU");
        assert_eq!(Amount::new(1_234_567).to_string(), "1 234 567 MRU");
    }

    #[test]
    fn arithmetic_saturates() {
        let max = Amount::new(u64::MAX);
        assert_eq!(max.saturating_add(Amount::new(1)), max);
        assert_eq!(max.saturating_mul(2), max);
    }

    #[test]
    fn serde_is_transparent() {
        let amount = Amount::new(2_500);
        assert_eq!(serde_json::to_string(&amount).unwrap(), "2500");
        let back: Amount = serde_json::from_str("2500").unwrap();
        assert_eq!(back, amount);
    }
}
