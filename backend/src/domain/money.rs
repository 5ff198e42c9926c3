//! Monetary amounts moved by ledger operations.

use rust_decimal::Decimal;

/// Maximum number of fractional digits an amount may carry.
///
/// Matches the scale of the `NUMERIC` balance columns so stored balances
/// always equal the sum of their journal entries.
pub const AMOUNT_SCALE: u32 = 4;

/// Largest amount or balance the `NUMERIC(20, 4)` columns can hold.
pub const AMOUNT_MAX: Decimal =
    Decimal::from_parts(0x630F_FFFF, 0x6BC7_5E2D, 0x5, false, AMOUNT_SCALE);

/// Validation failures for [`Amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// Zero or negative amount.
    #[error("amount must be greater than zero")]
    NonPositive,
    /// More fractional digits than balances can store.
    #[error("amount supports at most {AMOUNT_SCALE} decimal places")]
    TooPrecise,
    /// Larger than balances can store.
    #[error("amount must not exceed {AMOUNT_MAX}")]
    TooLarge,
}

impl AmountError {
    /// Stable code used in validation details.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NonPositive => "non_positive_amount",
            Self::TooPrecise => "amount_too_precise",
            Self::TooLarge => "amount_too_large",
        }
    }
}

/// A strictly positive amount of money.
///
/// # Examples
/// ```
/// use ledger::domain::Amount;
/// use rust_decimal::Decimal;
///
/// assert!(Amount::new(Decimal::new(2550, 2)).is_ok());
/// assert!(Amount::new(Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    /// Validate a raw decimal.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NonPositive`] for zero or negative values and
    /// [`AmountError::TooPrecise`] when the value has more than
    /// [`AMOUNT_SCALE`] fractional digits. Values above [`AMOUNT_MAX`] give
    /// [`AmountError::TooLarge`].
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NonPositive);
        }
        if value.normalize().scale() > AMOUNT_SCALE {
            return Err(AmountError::TooPrecise);
        }
        if value > AMOUNT_MAX {
            return Err(AmountError::TooLarge);
        }
        Ok(Self(value))
    }

    /// The amount as a positive decimal.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// The amount negated, as recorded on a debit entry.
    #[must_use]
    pub fn negated(&self) -> Decimal {
        -self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for amount validation.
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-1))]
    #[case(dec!(-0.0001))]
    fn rejects_non_positive_values(#[case] raw: Decimal) {
        assert_eq!(Amount::new(raw), Err(AmountError::NonPositive));
    }

    #[rstest]
    fn rejects_excess_precision() {
        assert_eq!(Amount::new(dec!(1.00001)), Err(AmountError::TooPrecise));
    }

    #[rstest]
    #[case(dec!(10000000000000000))]
    #[case(dec!(100000000000000000))]
    fn rejects_values_beyond_the_column_range(#[case] raw: Decimal) {
        assert_eq!(Amount::new(raw), Err(AmountError::TooLarge));
        assert_eq!(AmountError::TooLarge.code(), "amount_too_large");
    }

    #[rstest]
    fn accepts_the_largest_storable_value() {
        assert_eq!(AMOUNT_MAX, dec!(9999999999999999.9999));
        assert!(Amount::new(AMOUNT_MAX).is_ok());
    }

    #[rstest]
    #[case(dec!(0.0001))]
    #[case(dec!(100))]
    #[case(dec!(12.500000))]
    fn accepts_positive_values(#[case] raw: Decimal) {
        let amount = Amount::new(raw).expect("valid amount");
        assert_eq!(amount.value(), raw);
        assert_eq!(amount.negated(), -raw);
    }
}
