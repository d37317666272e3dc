//! Pricing
//!
//! Money conversions, cart totals and the cart page summary. Arithmetic is done
//! in minor units so that totals never pick up float drift.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::discounts::{DiscountCode, DiscountError, percent_of_minor};

/// Subtotals above this amount (in minor units) ship for free.
pub const FREE_SHIPPING_THRESHOLD_MINOR: i64 = 5_000;

/// Flat shipping charge in minor units.
pub const SHIPPING_MINOR: i64 = 999;

/// Sales tax rate applied to the discounted subtotal.
pub const TAX_RATE: f64 = 0.08;

/// Errors that can occur while calculating prices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TotalPriceError {
    /// Minor unit arithmetic overflowed.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// Percentage arithmetic failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Convert a decimal amount into money, rounding half away from zero to the
/// currency's minor unit.
#[must_use]
pub fn money_from_decimal(
    amount: Decimal,
    currency: &'static Currency,
) -> Option<Money<'static, Currency>> {
    amount
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .map(|minor| Money::from_minor(minor, currency))
}

/// Convert money into a decimal amount in major units.
#[must_use]
pub fn money_to_decimal(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), money.currency().exponent)
}

/// Price multiplied by a quantity.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the product does not fit in minor units.
pub fn line_total(
    price: &Money<'static, Currency>,
    quantity: u32,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .map(|minor| Money::from_minor(minor, price.currency()))
        .ok_or(TotalPriceError::Overflow)
}

/// Sum of `price * quantity` over the given lines.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the sum does not fit in minor units.
pub fn total_price<'p>(
    lines: impl IntoIterator<Item = (&'p Money<'static, Currency>, u32)>,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    let minor = lines.into_iter().try_fold(0_i64, |acc, (price, quantity)| {
        let line = line_total(price, quantity)?.to_minor_units();

        acc.checked_add(line).ok_or(TotalPriceError::Overflow)
    })?;

    Ok(Money::from_minor(minor, currency))
}

/// Cart page order summary.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary {
    /// Sum of line totals
    pub subtotal: Money<'static, Currency>,

    /// Amount taken off by a discount code
    pub discount: Money<'static, Currency>,

    /// Shipping charge
    pub shipping: Money<'static, Currency>,

    /// Sales tax
    pub tax: Money<'static, Currency>,

    /// Amount payable
    pub total: Money<'static, Currency>,
}

impl CartSummary {
    /// Build the summary for a subtotal, optionally applying a discount code.
    ///
    /// Shipping is free above [`FREE_SHIPPING_THRESHOLD_MINOR`]; tax is
    /// [`TAX_RATE`] of the discounted subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if any step overflows.
    pub fn calculate(
        subtotal: Money<'static, Currency>,
        discount: Option<&DiscountCode>,
    ) -> Result<Self, TotalPriceError> {
        let currency = subtotal.currency();
        let subtotal_minor = subtotal.to_minor_units();

        let discount_minor = discount
            .map(|code| percent_of_minor(&code.percent(), subtotal_minor))
            .transpose()?
            .unwrap_or(0);

        let discounted = subtotal_minor
            .checked_sub(discount_minor)
            .ok_or(TotalPriceError::Overflow)?;

        let shipping_minor = if discounted > FREE_SHIPPING_THRESHOLD_MINOR {
            0
        } else {
            SHIPPING_MINOR
        };

        let tax_minor = percent_of_minor(&Percentage::from(TAX_RATE), discounted)?;

        let total_minor = discounted
            .checked_add(shipping_minor)
            .and_then(|value| value.checked_add(tax_minor))
            .ok_or(TotalPriceError::Overflow)?;

        Ok(Self {
            subtotal,
            discount: Money::from_minor(discount_minor, currency),
            shipping: Money::from_minor(shipping_minor, currency),
            tax: Money::from_minor(tax_minor, currency),
            total: Money::from_minor(total_minor, currency),
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn money_from_decimal_rounds_to_minor_units() {
        let money = money_from_decimal(Decimal::new(99_99, 2), USD);

        assert_eq!(money, Some(Money::from_minor(9999, USD)));
    }

    #[test]
    fn money_from_decimal_rounds_half_away_from_zero() {
        assert_eq!(
            money_from_decimal(Decimal::new(1005, 3), USD),
            Some(Money::from_minor(101, USD))
        );
        assert_eq!(
            money_from_decimal(Decimal::new(1025, 3), USD),
            Some(Money::from_minor(103, USD))
        );
        assert_eq!(
            money_from_decimal(Decimal::new(-1005, 3), USD),
            Some(Money::from_minor(-101, USD))
        );
    }

    #[test]
    fn money_to_decimal_keeps_two_places() {
        let amount = money_to_decimal(&Money::from_minor(29997, USD));

        assert_eq!(amount, Decimal::new(29997, 2));
        assert_eq!(amount.to_string(), "299.97");
    }

    #[test]
    fn line_total_multiplies_quantity() -> TestResult {
        let price = Money::from_minor(9999, USD);

        assert_eq!(line_total(&price, 3)?, Money::from_minor(29997, USD));

        Ok(())
    }

    #[test]
    fn line_total_overflow_returns_error() {
        let price = Money::from_minor(i64::MAX, USD);

        assert_eq!(line_total(&price, 2), Err(TotalPriceError::Overflow));
    }

    #[test]
    fn total_price_sums_lines() -> TestResult {
        let a = Money::from_minor(9999, USD);
        let b = Money::from_minor(2299, USD);

        let total = total_price([(&a, 2), (&b, 1)], USD)?;

        assert_eq!(total, Money::from_minor(22297, USD));

        Ok(())
    }

    #[test]
    fn total_price_of_nothing_is_zero() -> TestResult {
        assert_eq!(total_price([], GBP)?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn summary_charges_shipping_at_or_below_threshold() -> TestResult {
        let summary = CartSummary::calculate(Money::from_minor(2999, USD), None)?;

        assert_eq!(summary.shipping, Money::from_minor(999, USD));
        assert_eq!(summary.tax, Money::from_minor(240, USD));
        assert_eq!(summary.total, Money::from_minor(2999 + 999 + 240, USD));

        Ok(())
    }

    #[test]
    fn summary_ships_free_above_threshold() -> TestResult {
        let summary = CartSummary::calculate(Money::from_minor(9999, USD), None)?;

        assert_eq!(summary.shipping, Money::from_minor(0, USD));
        assert_eq!(summary.tax, Money::from_minor(800, USD));
        assert_eq!(summary.total, Money::from_minor(10799, USD));

        Ok(())
    }

    #[test]
    fn summary_applies_discount_before_shipping_and_tax() -> TestResult {
        let code = DiscountCode::parse("SAVE10")?;

        let summary = CartSummary::calculate(Money::from_minor(5000, USD), Some(&code))?;

        assert_eq!(summary.discount, Money::from_minor(500, USD));
        assert_eq!(summary.shipping, Money::from_minor(999, USD));
        assert_eq!(summary.tax, Money::from_minor(360, USD));
        assert_eq!(summary.total, Money::from_minor(4500 + 999 + 360, USD));

        Ok(())
    }
}
