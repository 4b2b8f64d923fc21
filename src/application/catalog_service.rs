use std::sync::Arc;

use log::info;

use crate::domain::catalog::{Discount, Item, NewAdjustment, NewItem, Tax};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;

#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        Self { repo }
    }

    pub fn get_item(&self, id: i64) -> Result<Item, DomainError> {
        self.repo.find_item(id)?.ok_or(DomainError::NotFound("Item"))
    }

    /// A missing id or a dangling reference both mean "no discount".
    pub fn find_discount(&self, id: Option<i64>) -> Result<Option<Discount>, DomainError> {
        match id {
            Some(id) => self.repo.find_discount(id),
            None => Ok(None),
        }
    }

    pub fn find_tax(&self, id: Option<i64>) -> Result<Option<Tax>, DomainError> {
        match id {
            Some(id) => self.repo.find_tax(id),
            None => Ok(None),
        }
    }

    pub fn create_item(&self, item: NewItem) -> Result<Item, DomainError> {
        let item = self.repo.create_item(item)?;
        info!("Created item {} ({} {})", item.id, item.price, item.currency);
        Ok(item)
    }

    /// Persist a discount already registered with the provider as `stripe_id`.
    pub fn save_discount(
        &self,
        adjustment: NewAdjustment,
        stripe_id: String,
    ) -> Result<Discount, DomainError> {
        let discount = self.repo.create_discount(adjustment, stripe_id)?;
        info!(
            "Created discount {} ({}%, {})",
            discount.id, discount.percentage, discount.stripe_id
        );
        Ok(discount)
    }

    /// Persist a tax already registered with the provider as `stripe_id`.
    pub fn save_tax(
        &self,
        adjustment: NewAdjustment,
        stripe_id: String,
    ) -> Result<Tax, DomainError> {
        let tax = self.repo.create_tax(adjustment, stripe_id)?;
        info!("Created tax {} ({}%, {})", tax.id, tax.percentage, tax.stripe_id);
        Ok(tax)
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::ports::MockCatalogRepository;

    #[test]
    fn unknown_item_is_not_found() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_find_item().with(eq(213)).returning(|_| Ok(None));
        let service = CatalogService::new(Arc::new(repo));

        let err = service.get_item(213).unwrap_err();
        assert_eq!(err.to_string(), "Item not found");
    }

    #[test]
    fn no_discount_id_skips_lookup() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_find_discount().never();
        repo.expect_find_tax().never();
        let service = CatalogService::new(Arc::new(repo));

        assert_eq!(service.find_discount(None).unwrap(), None);
        assert_eq!(service.find_tax(None).unwrap(), None);
    }

    #[test]
    fn save_discount_keeps_provider_id() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_create_discount()
            .withf(|adj, stripe_id| adj.percentage == 15 && stripe_id == "coupon_12345")
            .returning(|adj, stripe_id| {
                Ok(Discount {
                    id: 1,
                    name: adj.name,
                    percentage: adj.percentage,
                    stripe_id,
                })
            });
        let service = CatalogService::new(Arc::new(repo));

        let adj = NewAdjustment::new("TestSale".into(), Some(15)).unwrap();
        let discount = service.save_discount(adj, "coupon_12345".into()).unwrap();
        assert_eq!(discount.stripe_id, "coupon_12345");
    }
}
