//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        barbers::models::BarberUuid,
        catalog::{
            errors::CatalogServiceError,
            models::{NewService, Service, ServiceUpdate, ServiceUuid},
            repository::PgCatalogRepository,
        },
        shops::models::ShopUuid,
    },
};

/// Longest bookable service: one full day.
const MAX_DURATION_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

fn check_duration(duration_minutes: i64) -> Result<(), CatalogServiceError> {
    if (1..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
        Ok(())
    } else {
        Err(CatalogServiceError::InvalidDuration)
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn create_service(
        &self,
        shop: ShopUuid,
        service: NewService,
    ) -> Result<Service, CatalogServiceError> {
        check_duration(service.duration_minutes)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_service(&mut tx, shop, &service)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_service(
        &self,
        shop: ShopUuid,
        service: ServiceUuid,
    ) -> Result<Service, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_service(&mut tx, shop, service).await?;

        tx.commit().await?;

        Ok(found)
    }

    async fn list_services(
        &self,
        shop: ShopUuid,
        barber: BarberUuid,
    ) -> Result<Vec<Service>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let services = self.repository.list_services(&mut tx, shop, barber).await?;

        tx.commit().await?;

        Ok(services)
    }

    async fn update_service(
        &self,
        shop: ShopUuid,
        service: ServiceUuid,
        update: ServiceUpdate,
    ) -> Result<Service, CatalogServiceError> {
        check_duration(update.duration_minutes)?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_service(&mut tx, shop, service, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_service(
        &self,
        shop: ShopUuid,
        service: ServiceUuid,
    ) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_service(&mut tx, shop, service).await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
/// Barber service-offering persistence operations.
pub trait CatalogService: Send + Sync {
    /// Creates a new service for a barber.
    async fn create_service(
        &self,
        shop: ShopUuid,
        service: NewService,
    ) -> Result<Service, CatalogServiceError>;

    /// Retrieve a single service.
    async fn get_service(
        &self,
        shop: ShopUuid,
        service: ServiceUuid,
    ) -> Result<Service, CatalogServiceError>;

    /// All live services offered by one barber.
    async fn list_services(
        &self,
        shop: ShopUuid,
        barber: BarberUuid,
    ) -> Result<Vec<Service>, CatalogServiceError>;

    /// Replace a service's editable fields.
    async fn update_service(
        &self,
        shop: ShopUuid,
        service: ServiceUuid,
        update: ServiceUpdate,
    ) -> Result<Service, CatalogServiceError>;

    /// Soft-delete a service. Existing appointments keep their snapshot.
    async fn delete_service(
        &self,
        shop: ShopUuid,
        service: ServiceUuid,
    ) -> Result<(), CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use chairtime::schedule::WeeklyAvailability;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn create_service_returns_correct_fields() -> TestResult {
        let ctx = TestContext::new().await;

        let barber = ctx.create_barber(WeeklyAvailability::default()).await;
        let uuid = ServiceUuid::new();

        let service = ctx
            .catalog
            .create_service(
                ctx.shop,
                NewService {
                    uuid,
                    barber_uuid: barber.uuid,
                    name: "Beard Trim".to_string(),
                    price: 800,
                    duration_minutes: 20,
                    description: Some("Shape and line-up".to_string()),
                },
            )
            .await?;

        assert_eq!(service.uuid, uuid);
        assert_eq!(service.barber_uuid, barber.uuid);
        assert_eq!(service.price, 800);
        assert_eq!(service.duration_minutes, 20);
        assert!(service.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn create_service_rejects_degenerate_durations() {
        let ctx = TestContext::new().await;

        let result = ctx
            .catalog
            .create_service(
                ctx.shop,
                NewService {
                    uuid: ServiceUuid::new(),
                    barber_uuid: BarberUuid::new(),
                    name: "Instant Cut".to_string(),
                    price: 100,
                    duration_minutes: 0,
                    description: None,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::InvalidDuration)),
            "expected InvalidDuration, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_service_for_unknown_barber_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx
            .catalog
            .create_service(
                ctx.shop,
                NewService {
                    uuid: ServiceUuid::new(),
                    barber_uuid: BarberUuid::new(),
                    name: "Haircut".to_string(),
                    price: 1500,
                    duration_minutes: 30,
                    description: None,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_services_returns_only_live_rows_for_that_barber() -> TestResult {
        let ctx = TestContext::new().await;

        let barber = ctx.create_barber(WeeklyAvailability::default()).await;
        let other = ctx.create_barber(WeeklyAvailability::default()).await;

        let kept = ctx.create_service(barber.uuid, "Haircut", 1500, 30).await;
        let dropped = ctx.create_service(barber.uuid, "Colouring", 4000, 90).await;
        ctx.create_service(other.uuid, "Haircut", 1200, 30).await;

        ctx.catalog.delete_service(ctx.shop, dropped.uuid).await?;

        let services = ctx.catalog.list_services(ctx.shop, barber.uuid).await?;
        let uuids: Vec<ServiceUuid> = services.iter().map(|s| s.uuid).collect();

        assert_eq!(uuids, vec![kept.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn update_service_replaces_editable_fields() -> TestResult {
        let ctx = TestContext::new().await;

        let barber = ctx.create_barber(WeeklyAvailability::default()).await;
        let service = ctx.create_service(barber.uuid, "Haircut", 1500, 30).await;

        let updated = ctx
            .catalog
            .update_service(
                ctx.shop,
                service.uuid,
                ServiceUpdate {
                    name: "Premium Haircut".to_string(),
                    price: 2000,
                    duration_minutes: 45,
                    description: None,
                },
            )
            .await?;

        assert_eq!(updated.name, "Premium Haircut");
        assert_eq!(updated.price, 2000);
        assert_eq!(updated.duration_minutes, 45);

        Ok(())
    }

    #[tokio::test]
    async fn delete_service_twice_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let barber = ctx.create_barber(WeeklyAvailability::default()).await;
        let service = ctx.create_service(barber.uuid, "Haircut", 1500, 30).await;

        ctx.catalog.delete_service(ctx.shop, service.uuid).await?;

        let result = ctx.catalog.delete_service(ctx.shop, service.uuid).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
