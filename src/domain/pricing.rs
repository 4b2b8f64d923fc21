//! Integer minor-unit pricing.
//!
//! Every step truncates toward zero, matching what the payment provider was
//! historically charged: `int(price * 100)` for the subtotal, then
//! `int(total * pct / 100)` for the discount and, on the discounted amount,
//! for the tax.

use bigdecimal::{BigDecimal, ToPrimitive};

use super::catalog::Item;
use super::errors::DomainError;

/// Convert a decimal amount to minor units (cents, kopecks), truncating.
pub fn convert_price(price: &BigDecimal) -> Result<i64, DomainError> {
    let minor = price * BigDecimal::from(100);
    truncate(&minor)
}

/// Total of `items` in minor units after an optional percentage discount and
/// an optional percentage tax. `None` means the adjustment is skipped.
pub fn calculate_total(
    items: &[Item],
    discount_pct: Option<&BigDecimal>,
    tax_pct: Option<&BigDecimal>,
) -> Result<i64, DomainError> {
    let subtotal: BigDecimal = items.iter().map(|i| &i.price).sum();
    let mut total = convert_price(&subtotal)?;

    if let Some(pct) = discount_pct {
        total -= percent_of(total, pct)?;
    }
    if let Some(pct) = tax_pct {
        total += percent_of(total, pct)?;
    }
    Ok(total)
}

fn percent_of(amount: i64, pct: &BigDecimal) -> Result<i64, DomainError> {
    let share = BigDecimal::from(amount) * pct / BigDecimal::from(100);
    truncate(&share)
}

fn truncate(value: &BigDecimal) -> Result<i64, DomainError> {
    value
        .with_scale(0)
        .to_i64()
        .ok_or_else(|| DomainError::InvalidInput(format!("amount {value} is out of range")))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::domain::catalog::Currency;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn item(id: i64, price: &str) -> Item {
        Item {
            id,
            name: format!("item-{id}"),
            description: String::new(),
            price: dec(price),
            currency: Currency::Usd,
        }
    }

    #[test]
    fn convert_price_truncates() {
        assert_eq!(convert_price(&dec("3.50")).unwrap(), 350);
        assert_eq!(convert_price(&dec("9.999")).unwrap(), 999);
        assert_eq!(convert_price(&dec("0")).unwrap(), 0);
    }

    #[test]
    fn total_without_adjustments() {
        assert_eq!(calculate_total(&[item(1, "3.50")], None, None).unwrap(), 350);
    }

    #[test]
    fn total_discount_then_tax() {
        let items = [item(1, "10.00")];
        let total = calculate_total(&items, Some(&dec("10")), Some(&dec("5"))).unwrap();
        assert_eq!(total, 945);
    }

    #[test]
    fn total_truncates_at_each_step() {
        // 1999 - trunc(299.85) = 1700; 1700 + trunc(119.0) = 1819
        let items = [item(1, "19.99")];
        let total = calculate_total(&items, Some(&dec("15")), Some(&dec("7"))).unwrap();
        assert_eq!(total, 1819);

        // 333 - trunc(33.3) = 300; 300 + trunc(39.99) = 339
        let items = [item(1, "3.33")];
        let total = calculate_total(&items, Some(&dec("10")), Some(&dec("13.33"))).unwrap();
        assert_eq!(total, 339);
    }

    #[test]
    fn tax_applies_to_discounted_amount() {
        let items = [item(1, "100.00")];
        let discounted_then_taxed =
            calculate_total(&items, Some(&dec("50")), Some(&dec("10"))).unwrap();
        assert_eq!(discounted_then_taxed, 5500);
        let tax_only = calculate_total(&items, None, Some(&dec("10"))).unwrap();
        assert_eq!(tax_only, 11000);
    }

    #[test]
    fn sums_multiple_items_before_converting() {
        let items = [item(1, "10.00"), item(2, "20.50")];
        assert_eq!(calculate_total(&items, None, None).unwrap(), 3050);
    }

    #[test]
    fn full_discount_is_zero() {
        let items = [item(1, "42.00")];
        let total = calculate_total(&items, Some(&dec("100")), Some(&dec("20"))).unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn empty_items_total_zero() {
        assert_eq!(calculate_total(&[], Some(&dec("10")), None).unwrap(), 0);
    }
}
