use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::catalog::{Discount, Item, NewAdjustment, NewItem, Tax};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::schema::{discounts, items, taxes};

use super::models::{DiscountRow, ItemRow, NewDiscountRow, NewItemRow, NewTaxRow, TaxRow};

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn find_item(&self, id: i64) -> Result<Option<Item>, DomainError> {
        let mut conn = self.pool.get()?;

        items::table
            .find(id)
            .select(ItemRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Item::try_from)
            .transpose()
    }

    fn create_item(&self, item: NewItem) -> Result<Item, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(items::table)
            .values(&NewItemRow {
                name: item.name,
                description: item.description,
                price: item.price,
                currency: item.currency.code().to_string(),
            })
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)?;
        Item::try_from(row)
    }

    fn find_discount(&self, id: i64) -> Result<Option<Discount>, DomainError> {
        let mut conn = self.pool.get()?;

        Ok(discounts::table
            .find(id)
            .select(DiscountRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Discount::from))
    }

    fn create_discount(
        &self,
        adjustment: NewAdjustment,
        stripe_id: String,
    ) -> Result<Discount, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(discounts::table)
            .values(&NewDiscountRow {
                name: adjustment.name,
                percentage: adjustment.percentage,
                stripe_id,
            })
            .returning(DiscountRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn find_tax(&self, id: i64) -> Result<Option<Tax>, DomainError> {
        let mut conn = self.pool.get()?;

        Ok(taxes::table
            .find(id)
            .select(TaxRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Tax::from))
    }

    fn create_tax(&self, adjustment: NewAdjustment, stripe_id: String) -> Result<Tax, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(taxes::table)
            .values(&NewTaxRow {
                name: adjustment.name,
                percentage: adjustment.percentage,
                stripe_id,
            })
            .returning(TaxRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }
}
