//! Price and discount arithmetic shared by products, carts and orders.
//!
//! Discounts are whole or fractional percentages in `[0, 100]`. Totals are
//! always derived from line snapshots, never from live catalog data.

use bigdecimal::BigDecimal;

/// Flat sales tax applied on top of the discounted total, in percent.
pub const TAX_PERCENT: i64 = 5;

/// `price - price * discount / 100`.
pub fn discounted_price(price: &BigDecimal, discount: &BigDecimal) -> BigDecimal {
    price - &(price * discount / BigDecimal::from(100))
}

pub fn tax_on(amount: &BigDecimal) -> BigDecimal {
    amount * BigDecimal::from(TAX_PERCENT) / BigDecimal::from(100)
}

/// `amount` plus tax.
pub fn with_tax(amount: &BigDecimal) -> BigDecimal {
    amount + &tax_on(amount)
}

/// Anything that contributes `unit_price * quantity` to a total.
pub trait PricedLine {
    fn unit_price(&self) -> &BigDecimal;
    fn discounted_unit_price(&self) -> &BigDecimal;
    fn quantity(&self) -> i32;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    /// Σ(unit price × quantity), before discount.
    pub total_price: BigDecimal,
    /// Σ((unit price − discounted unit price) × quantity).
    pub total_discount: BigDecimal,
}

impl Totals {
    pub fn zero() -> Self {
        Self {
            total_price: BigDecimal::from(0),
            total_discount: BigDecimal::from(0),
        }
    }

    pub fn of<L: PricedLine>(lines: &[L]) -> Self {
        lines.iter().fold(Self::zero(), |acc, line| {
            let qty = BigDecimal::from(line.quantity());
            let unit = line.unit_price();
            Totals {
                total_price: acc.total_price + unit * &qty,
                total_discount: acc.total_discount
                    + (unit - line.discounted_unit_price()) * &qty,
            }
        })
    }

    pub fn final_price(&self) -> BigDecimal {
        &self.total_price - &self.total_discount
    }

    pub fn tax(&self) -> BigDecimal {
        tax_on(&self.final_price())
    }

    pub fn grand_total(&self) -> BigDecimal {
        with_tax(&self.final_price())
    }
}

/// Price must be non-negative.
pub fn is_valid_price(price: &BigDecimal) -> bool {
    *price >= BigDecimal::from(0)
}

/// Discount must lie in `[0, 100]`.
pub fn is_valid_discount(discount: &BigDecimal) -> bool {
    *discount >= BigDecimal::from(0) && *discount <= BigDecimal::from(100)
}
