//! Common utility functions for tax calculations.

use rust_decimal::Decimal;

/// Rounds a decimal value to the nearest whole baht.
///
/// Midpoints round toward positive infinity, so `2.5` becomes `3` and
/// `-2.5` becomes `-2`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use taxplan_core::calculations::common::round_to_whole;
///
/// assert_eq!(round_to_whole(dec!(7499.49)), dec!(7499));
/// assert_eq!(round_to_whole(dec!(0.5)), dec!(1));
/// assert_eq!(round_to_whole(dec!(-2.5)), dec!(-2));
/// ```
pub fn round_to_whole(value: Decimal) -> Decimal {
    (value + Decimal::new(5, 1)).floor()
}

/// Sums an iterator of amounts, yielding zero for an empty iterator.
pub fn sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().fold(Decimal::ZERO, |acc, x| acc + x)
}
