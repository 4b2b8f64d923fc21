use thiserror::Error;

use crate::domain::catalog::Currency;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("All items in an order must share one currency, found {0} and {1}")]
    MixedCurrencies(Currency, Currency),
    #[error("Payment provider error: {0}")]
    Payment(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
