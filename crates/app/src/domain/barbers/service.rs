//! Barbers service.

use async_trait::async_trait;
use chairtime::schedule::WeeklyAvailability;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        barbers::{
            errors::BarbersServiceError,
            models::{Barber, BarberUuid, NewBarber},
            repository::PgBarbersRepository,
        },
        shops::models::ShopUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgBarbersService {
    db: Db,
    repository: PgBarbersRepository,
}

impl PgBarbersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgBarbersRepository::new(),
        }
    }
}

#[async_trait]
impl BarbersService for PgBarbersService {
    async fn create_barber(
        &self,
        shop: ShopUuid,
        barber: NewBarber,
    ) -> Result<Barber, BarbersServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_barber(&mut tx, shop, &barber).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_barber(
        &self,
        shop: ShopUuid,
        barber: BarberUuid,
    ) -> Result<Barber, BarbersServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_barber(&mut tx, shop, barber).await?;

        tx.commit().await?;

        Ok(found)
    }

    async fn set_availability(
        &self,
        shop: ShopUuid,
        barber: BarberUuid,
        availability: WeeklyAvailability,
    ) -> Result<Barber, BarbersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_availability(&mut tx, shop, barber, &availability)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
/// Barber persistence operations.
pub trait BarbersService: Send + Sync {
    /// Creates a new barber with its initial weekly availability.
    async fn create_barber(
        &self,
        shop: ShopUuid,
        barber: NewBarber,
    ) -> Result<Barber, BarbersServiceError>;

    /// Retrieve a single barber.
    async fn get_barber(
        &self,
        shop: ShopUuid,
        barber: BarberUuid,
    ) -> Result<Barber, BarbersServiceError>;

    /// Replace the barber's recurring weekly working hours.
    async fn set_availability(
        &self,
        shop: ShopUuid,
        barber: BarberUuid,
        availability: WeeklyAvailability,
    ) -> Result<Barber, BarbersServiceError>;
}
