use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::catalog::{Discount, Item, Tax};
use crate::domain::errors::DomainError;
use crate::schema::{discounts, items, order_items, orders, taxes};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub currency: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = items)]
pub struct NewItemRow {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub currency: String,
}

impl TryFrom<ItemRow> for Item {
    type Error = DomainError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        Ok(Item {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            currency: row.currency.parse().map_err(|_| {
                DomainError::Internal(format!(
                    "item {} has currency '{}'",
                    row.id, row.currency
                ))
            })?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = discounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DiscountRow {
    pub id: i64,
    pub name: String,
    pub percentage: i32,
    pub stripe_id: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = discounts)]
pub struct NewDiscountRow {
    pub name: String,
    pub percentage: i32,
    pub stripe_id: String,
}

impl From<DiscountRow> for Discount {
    fn from(row: DiscountRow) -> Self {
        Discount {
            id: row.id,
            name: row.name,
            percentage: row.percentage,
            stripe_id: row.stripe_id,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = taxes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaxRow {
    pub id: i64,
    pub name: String,
    pub percentage: i32,
    pub stripe_id: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = taxes)]
pub struct NewTaxRow {
    pub name: String,
    pub percentage: i32,
    pub stripe_id: String,
}

impl From<TaxRow> for Tax {
    fn from(row: TaxRow) -> Self {
        Tax {
            id: row.id,
            name: row.name,
            percentage: row.percentage,
            stripe_id: row.stripe_id,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub discount_id: Option<i64>,
    pub tax_id: Option<i64>,
    pub currency: Option<String>,
    pub status: String,
    pub session_key: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub discount_id: Option<i64>,
    pub tax_id: Option<i64>,
    pub status: &'a str,
    pub session_key: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i64,
    pub item_id: i64,
}
