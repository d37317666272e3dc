//! Discount utilities
//!
//! Percentage arithmetic on minor units, and the discount codes accepted on
//! the cart page.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

/// The only code the demo store recognises.
pub const SAVE10: &str = "SAVE10";

/// Errors specific to discount calculations and code entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// No code was entered.
    #[error("Please enter a discount code")]
    MissingCode,

    /// The code is not recognised.
    #[error("Invalid discount code")]
    InvalidCode(String),
}

/// A validated discount code.
#[derive(Debug, Clone, Copy)]
pub struct DiscountCode {
    code: &'static str,
    percent: Percentage,
}

impl DiscountCode {
    /// Validate a code typed by the shopper. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::MissingCode`] for blank input and
    /// [`DiscountError::InvalidCode`] for anything unrecognised.
    pub fn parse(input: &str) -> Result<Self, DiscountError> {
        match input.trim() {
            "" => Err(DiscountError::MissingCode),
            SAVE10 => Ok(Self {
                code: SAVE10,
                percent: Percentage::from(0.10),
            }),
            other => Err(DiscountError::InvalidCode(other.to_string())),
        }
    }

    /// The canonical code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// The share of the subtotal taken off.
    #[must_use]
    pub fn percent(&self) -> Percentage {
        self.percent
    }
}

/// Calculate `percent` of a minor unit amount, rounding half away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}
