//! Price representation using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in the store's single display currency (USD).
///
/// Backed by [`Decimal`] so cart totals never accumulate binary-float
/// rounding error. Serializes as a decimal string (`"3.50"`), which is
/// also the encoding used in the catalog seed file and in persisted
/// cart snapshots.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero. Catalog validation rejects these.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// This price multiplied by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display with two fractional digits, e.g. `$3.50`.
    #[must_use]
    pub fn display(&self) -> String {
        let mut amount = self.0.round_dp(2);
        amount.rescale(2);
        format!("${amount}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_display_pads_to_two_digits() {
        assert_eq!(Price::new(Decimal::new(35, 1)).display(), "$3.50");
        assert_eq!(Price::new(Decimal::new(7, 0)).display(), "$7.00");
        assert_eq!(Price::ZERO.display(), "$0.00");
    }

    #[test]
    fn test_times_and_sum() {
        let line = Price::new(Decimal::new(350, 2)).times(2);
        assert_eq!(line, Price::new(Decimal::new(700, 2)));

        let total: Price = [Price::new(Decimal::new(125, 2)), Price::new(Decimal::new(275, 2))]
            .into_iter()
            .sum();
        assert_eq!(total, Price::new(Decimal::new(400, 2)));
    }

    #[test]
    fn test_serde_uses_decimal_strings() {
        let price = Price::new(Decimal::new(599, 2));
        let json = serde_json::to_string(&price).expect("serialize");
        assert_eq!(json, "\"5.99\"");

        let parsed: Price = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, price);
    }
}
