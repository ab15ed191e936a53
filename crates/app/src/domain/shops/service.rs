//! Shops service.

use async_trait::async_trait;
use jiff::tz::TimeZone;
use mockall::automock;

use crate::{
    database::Db,
    domain::shops::{
        errors::ShopsServiceError,
        models::{NewShop, Shop, ShopUuid},
        repository::PgShopsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgShopsService {
    db: Db,
    repository: PgShopsRepository,
}

impl PgShopsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgShopsRepository::new(),
        }
    }
}

#[async_trait]
impl ShopsService for PgShopsService {
    async fn create_shop(&self, shop: NewShop) -> Result<Shop, ShopsServiceError> {
        if TimeZone::get(&shop.timezone).is_err() {
            return Err(ShopsServiceError::InvalidTimezone(shop.timezone));
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_shop(&mut tx, &shop).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_shop(&self, shop: ShopUuid) -> Result<Shop, ShopsServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_shop(&mut tx, shop).await?;

        tx.commit().await?;

        Ok(found)
    }
}

#[automock]
#[async_trait]
/// Shop (tenant) persistence operations.
pub trait ShopsService: Send + Sync {
    /// Creates a new shop after validating its timezone.
    async fn create_shop(&self, shop: NewShop) -> Result<Shop, ShopsServiceError>;

    /// Retrieve a single shop.
    async fn get_shop(&self, shop: ShopUuid) -> Result<Shop, ShopsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn shops_can_be_created_from_a_raw_pool() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgShopsService::new(Db::new(ctx.db.pool().clone()));

        let shop = svc
            .create_shop(NewShop {
                uuid: ShopUuid::new(),
                name: "Pool Shop".to_string(),
                timezone: "Asia/Karachi".to_string(),
            })
            .await?;

        assert_eq!(svc.get_shop(shop.uuid).await?.name, "Pool Shop");

        Ok(())
    }

    #[tokio::test]
    async fn create_shop_returns_correct_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ShopUuid::new();

        let shop = ctx
            .shops
            .create_shop(NewShop {
                uuid,
                name: "Fade District".to_string(),
                timezone: "Asia/Karachi".to_string(),
            })
            .await?;

        assert_eq!(shop.uuid, uuid);
        assert_eq!(shop.name, "Fade District");
        assert_eq!(shop.timezone, "Asia/Karachi");
        assert!(shop.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn create_shop_rejects_unknown_timezone() {
        let ctx = TestContext::new().await;

        let result = ctx
            .shops
            .create_shop(NewShop {
                uuid: ShopUuid::new(),
                name: "Nowhere".to_string(),
                timezone: "Mars/Olympus_Mons".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(ShopsServiceError::InvalidTimezone(_))),
            "expected InvalidTimezone, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_shop_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ShopUuid::new();

        ctx.shops
            .create_shop(NewShop {
                uuid,
                name: "First".to_string(),
                timezone: "Asia/Karachi".to_string(),
            })
            .await?;

        let result = ctx
            .shops
            .create_shop(NewShop {
                uuid,
                name: "Second".to_string(),
                timezone: "Asia/Karachi".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(ShopsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_shop_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.shops.get_shop(ShopUuid::new()).await;

        assert!(
            matches!(result, Err(ShopsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
