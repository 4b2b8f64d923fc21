use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::DomainError;

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 800;
pub const MAX_PERCENTAGE: i32 = 100;
/// Prices are stored as `NUMERIC(10, 2)`.
pub const PRICE_DECIMAL_PLACES: i64 = 2;
pub const PRICE_MAX_DIGITS: u32 = 10;

/// Currencies the shop can sell in. Stored and sent to the provider as the
/// lowercase ISO code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Rub,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Rub => "rub",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Rub => "₽",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "usd" => Ok(Currency::Usd),
            "rub" => Ok(Currency::Rub),
            other => Err(DomainError::InvalidInput(format!("Unsupported currency '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub currency: Currency,
}

/// A validated item that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub currency: Currency,
}

impl NewItem {
    pub fn new(
        name: String,
        description: String,
        price: BigDecimal,
        currency: Currency,
    ) -> Result<Self, DomainError> {
        check_name(&name)?;
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(DomainError::InvalidInput(format!(
                "description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        check_price(&price)?;
        Ok(Self {
            name,
            description,
            price: price.with_scale(PRICE_DECIMAL_PLACES),
            currency,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Discount {
    pub id: i64,
    pub name: String,
    pub percentage: i32,
    /// Provider coupon id.
    pub stripe_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tax {
    pub id: i64,
    pub name: String,
    pub percentage: i32,
    /// Provider tax rate id.
    pub stripe_id: String,
}

/// Name and percentage of a discount or tax that passed validation and may
/// be registered with the payment provider.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAdjustment {
    pub name: String,
    pub percentage: i32,
}

impl NewAdjustment {
    pub fn new(name: String, percentage: Option<i32>) -> Result<Self, DomainError> {
        check_name(&name)?;
        let percentage = percentage
            .ok_or_else(|| DomainError::InvalidInput("percentage is required".to_string()))?;
        if !(0..=MAX_PERCENTAGE).contains(&percentage) {
            return Err(DomainError::InvalidInput(format!(
                "percentage must be between 0 and {MAX_PERCENTAGE}, got {percentage}"
            )));
        }
        Ok(Self { name, percentage })
    }
}

fn check_price(price: &BigDecimal) -> Result<(), DomainError> {
    if *price < BigDecimal::zero() {
        return Err(DomainError::InvalidInput("price must not be negative".to_string()));
    }
    let (_, scale) = price.normalized().as_bigint_and_exponent();
    if scale > PRICE_DECIMAL_PLACES {
        return Err(DomainError::InvalidInput(format!(
            "price must have at most {PRICE_DECIMAL_PLACES} decimal places, got {price}"
        )));
    }
    let integer_digits = PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES as u32;
    if *price >= BigDecimal::from(10_i64.pow(integer_digits)) {
        return Err(DomainError::InvalidInput(format!(
            "price must have at most {integer_digits} digits before the decimal point, got {price}"
        )));
    }
    Ok(())
}

fn check_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidInput("name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::InvalidInput(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}
