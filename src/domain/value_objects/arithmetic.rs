//! # Checked Arithmetic
//!
//! Safe arithmetic and money rounding for quotation amounts.
//!
//! This module provides:
//! - [`ArithmeticError`] - Error type for arithmetic failures
//! - [`CheckedArithmetic`] - Trait for safe arithmetic operations
//! - [`round_money`] - Rounds an amount to two decimal places
//! - [`percent_of`] - Applies a percentage to an amount
//!
//! Amounts are accumulated at full precision and rounded only when a
//! summary leaves the aggregator.
//!
//! # Examples
//!
//! ```
//! use boq_quotation::domain::value_objects::arithmetic::{round_money, CheckedArithmetic};
//! use rust_decimal::Decimal;
//!
//! let a = Decimal::new(10005, 3); // 10.005
//! assert_eq!(round_money(a), Decimal::new(1001, 2));
//! assert!(a.safe_add(Decimal::ONE).is_ok());
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Number of decimal places kept in money output.
pub const MONEY_SCALE: u32 = 2;

/// Error type for arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Division by zero attempted.
    #[error("division by zero")]
    DivisionByZero,
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Trait for checked arithmetic operations.
///
/// Returns `Result` instead of panicking on overflow or division by zero.
pub trait CheckedArithmetic: Sized {
    /// Safely add two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely multiply two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely divide two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::DivisionByZero` if the divisor is zero.
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        self.checked_div(rhs).ok_or(ArithmeticError::Overflow)
    }
}

/// Rounds an amount to [`MONEY_SCALE`] places, halves away from zero.
///
/// This is the decimal equivalent of `round(x * 100) / 100`.
///
/// # Examples
///
/// ```
/// use boq_quotation::domain::value_objects::arithmetic::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(26_6, 1)), Decimal::new(266, 1));
/// assert_eq!(round_money(Decimal::new(-10005, 3)), Decimal::new(-1001, 2));
/// ```
#[inline]
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `amount * percentage / 100` without intermediate rounding.
///
/// # Errors
///
/// Returns `ArithmeticError::Overflow` if the product overflows.
pub fn percent_of(amount: Decimal, percentage: Decimal) -> ArithmeticResult<Decimal> {
    amount.safe_mul(percentage)?.safe_div(Decimal::ONE_HUNDRED)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn error_display() {
        assert_eq!(ArithmeticError::Overflow.to_string(), "arithmetic overflow");
        assert_eq!(
            ArithmeticError::DivisionByZero.to_string(),
            "division by zero"
        );
    }

    #[test]
    fn round_money_half_away_from_zero() {
        assert_eq!(round_money(dec("10.005")), dec("10.01"));
        assert_eq!(round_money(dec("10.004999")), dec("10.00"));
        assert_eq!(round_money(dec("0.125")), dec("0.13"));
        assert_eq!(round_money(dec("-0.125")), dec("-0.13"));
    }

    #[test]
    fn round_money_keeps_short_values() {
        assert_eq!(round_money(dec("26.6")), dec("26.6"));
        assert_eq!(round_money(dec("380")), dec("380"));
    }

    #[test]
    fn percent_of_is_exact() {
        assert_eq!(percent_of(dec("380"), dec("7")).unwrap(), dec("26.6"));
        assert_eq!(percent_of(dec("100"), Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn safe_add_overflow() {
        assert_eq!(
            Decimal::MAX.safe_add(Decimal::ONE),
            Err(ArithmeticError::Overflow)
        );
    }

    #[test]
    fn safe_div_by_zero() {
        assert_eq!(
            Decimal::ONE.safe_div(Decimal::ZERO),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn safe_mul_keeps_scale() {
        assert_eq!(dec("1.5").safe_mul(dec("4")).unwrap(), dec("6.0"));
    }
}
