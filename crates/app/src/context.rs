//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        appointments::{AppointmentsService, PgAppointmentsService},
        barbers::{BarbersService, PgBarbersService},
        catalog::{CatalogService, PgCatalogService},
        scheduling::{PgSchedulingService, SchedulingService},
        shops::{PgShopsService, ShopsService},
        users::{PgUsersService, UsersService},
        wallet::{PgWalletService, WalletService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub shops: Arc<dyn ShopsService>,
    pub users: Arc<dyn UsersService>,
    pub barbers: Arc<dyn BarbersService>,
    pub catalog: Arc<dyn CatalogService>,
    pub appointments: Arc<dyn AppointmentsService>,
    pub scheduling: Arc<dyn SchedulingService>,
    pub wallet: Arc<dyn WalletService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            shops: Arc::new(PgShopsService::new(db.clone())),
            users: Arc::new(PgUsersService::new(db.clone())),
            barbers: Arc::new(PgBarbersService::new(db.clone())),
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            appointments: Arc::new(PgAppointmentsService::new(db.clone())),
            scheduling: Arc::new(PgSchedulingService::new(db.clone())),
            wallet: Arc::new(PgWalletService::new(db)),
        })
    }
}
