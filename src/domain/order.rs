use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::catalog::{Currency, Discount, Item, Tax};
use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    Created,
    InProgress,
    Done,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "Created",
            OrderStatus::InProgress => "InProgress",
            OrderStatus::Done => "Done",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(OrderStatus::Created),
            "InProgress" => Ok(OrderStatus::InProgress),
            "Done" => Ok(OrderStatus::Done),
            other => Err(DomainError::Internal(format!("Unknown order status '{other}'"))),
        }
    }
}

/// An order with its items, discount and tax loaded.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub items: Vec<Item>,
    pub discount: Option<Discount>,
    pub tax: Option<Tax>,
    pub currency: Option<Currency>,
    pub status: OrderStatus,
    pub session_key: String,
}

/// What a session asks to buy. Two requests are the same order when all four
/// fields are equal; "no discount" only matches "no discount".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub item_ids: BTreeSet<i64>,
    pub session_key: String,
    pub discount_id: Option<i64>,
    pub tax_id: Option<i64>,
}

impl OrderRequest {
    pub fn new(
        items: &[Item],
        session_key: &str,
        discount: Option<&Discount>,
        tax: Option<&Tax>,
    ) -> Self {
        Self {
            item_ids: items.iter().map(|i| i.id).collect(),
            session_key: session_key.to_string(),
            discount_id: discount.map(|d| d.id),
            tax_id: tax.map(|t| t.id),
        }
    }
}

/// Pick the first candidate whose item set equals `wanted`.
///
/// Candidates are expected to be pre-filtered on status, session, discount
/// and tax, and to arrive in creation order.
pub fn select_match<'a, I>(candidates: I, wanted: &BTreeSet<i64>) -> Option<i64>
where
    I: IntoIterator<Item = (i64, &'a BTreeSet<i64>)>,
{
    candidates
        .into_iter()
        .find(|(_, items)| *items == wanted)
        .map(|(id, _)| id)
}

/// The single currency shared by `currencies`, or `None` for an empty set.
pub fn resolve_currency<I>(currencies: I) -> Result<Option<Currency>, DomainError>
where
    I: IntoIterator<Item = Currency>,
{
    let mut resolved: Option<Currency> = None;
    for currency in currencies {
        match resolved {
            None => resolved = Some(currency),
            Some(existing) if existing != currency => {
                return Err(DomainError::MixedCurrencies(existing, currency));
            }
            Some(_) => {}
        }
    }
    Ok(resolved)
}

/// Outcome of a provider notification that passed verification.
#[derive(Debug, Clone)]
pub enum WebhookOutcome {
    Updated(OrderView),
    Ignored,
}
