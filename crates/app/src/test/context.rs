//! Test context for service-level integration tests.

use chairtime::schedule::{WeeklyAvailability, WorkingHours};
use jiff::{Timestamp, civil::time};

use crate::{
    database::Db,
    domain::{
        appointments::{
            PgAppointmentsService,
            models::{Appointment, AppointmentUuid, NewAppointment},
            service::AppointmentsService,
        },
        barbers::{
            PgBarbersService,
            models::{Barber, BarberUuid, NewBarber},
            service::BarbersService,
        },
        catalog::{
            PgCatalogService,
            models::{NewService, Service, ServiceUuid},
            service::CatalogService,
        },
        scheduling::PgSchedulingService,
        shops::{
            PgShopsService,
            models::{NewShop, ShopUuid},
            service::ShopsService,
        },
        users::{
            PgUsersService,
            models::{NewUser, User, UserUuid},
            service::UsersService,
        },
        wallet::PgWalletService,
    },
};

use super::db::TestDb;

pub(crate) struct TestContext {
    pub db: TestDb,
    pub db_handle: Db,

    /// Default shop (Asia/Karachi) everything in a test hangs off.
    pub shop: ShopUuid,

    pub shops: PgShopsService,
    pub users: PgUsersService,
    pub barbers: PgBarbersService,
    pub catalog: PgCatalogService,
    pub appointments: PgAppointmentsService,
    pub scheduling: PgSchedulingService,
    pub wallet: PgWalletService,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        let shops = PgShopsService::new(db.clone());

        let shop = shops
            .create_shop(NewShop {
                uuid: ShopUuid::new(),
                name: "Test Shop".to_string(),
                timezone: "Asia/Karachi".to_string(),
            })
            .await
            .expect("Failed to create default test shop")
            .uuid;

        Self {
            users: PgUsersService::new(db.clone()),
            barbers: PgBarbersService::new(db.clone()),
            catalog: PgCatalogService::new(db.clone()),
            appointments: PgAppointmentsService::new(db.clone()),
            scheduling: PgSchedulingService::new(db.clone()),
            wallet: PgWalletService::new(db.clone()),
            shops,
            shop,
            db_handle: db,
            db: test_db,
        }
    }

    /// Create an additional shop, for cross-tenant isolation tests.
    pub(crate) async fn create_shop(&self, name: &str) -> ShopUuid {
        self.shops
            .create_shop(NewShop {
                uuid: ShopUuid::new(),
                name: name.to_string(),
                timezone: "Asia/Karachi".to_string(),
            })
            .await
            .expect("Failed to create test shop")
            .uuid
    }

    pub(crate) async fn create_user(
        &self,
        display_name: &str,
        wallet_balance: u64,
        coins: u64,
    ) -> User {
        self.users
            .create_user(
                self.shop,
                NewUser {
                    uuid: UserUuid::new(),
                    display_name: display_name.to_string(),
                    wallet_balance,
                    coins,
                },
            )
            .await
            .expect("Failed to create test user")
    }

    pub(crate) async fn create_barber(&self, availability: WeeklyAvailability) -> Barber {
        self.barbers
            .create_barber(
                self.shop,
                NewBarber {
                    uuid: BarberUuid::new(),
                    display_name: "Test Barber".to_string(),
                    user_uuid: None,
                    availability,
                },
            )
            .await
            .expect("Failed to create test barber")
    }

    /// A barber open every day, for tests that only care about booking.
    pub(crate) async fn create_open_barber(&self) -> Barber {
        self.create_barber(open_all_week()).await
    }

    /// A barber open every day with earnings tracked against `payee`.
    pub(crate) async fn create_linked_barber(&self, payee: UserUuid) -> Barber {
        self.barbers
            .create_barber(
                self.shop,
                NewBarber {
                    uuid: BarberUuid::new(),
                    display_name: "Linked Barber".to_string(),
                    user_uuid: Some(payee),
                    availability: open_all_week(),
                },
            )
            .await
            .expect("Failed to create linked test barber")
    }

    pub(crate) async fn create_service(
        &self,
        barber: BarberUuid,
        name: &str,
        price: u64,
        duration_minutes: i64,
    ) -> Service {
        self.catalog
            .create_service(
                self.shop,
                NewService {
                    uuid: ServiceUuid::new(),
                    barber_uuid: barber,
                    name: name.to_string(),
                    price,
                    duration_minutes,
                    description: None,
                },
            )
            .await
            .expect("Failed to create test service")
    }

    pub(crate) async fn book(
        &self,
        customer: UserUuid,
        barber: BarberUuid,
        service: ServiceUuid,
        starts_at: Timestamp,
    ) -> Appointment {
        self.appointments
            .book_appointment(
                self.shop,
                NewAppointment {
                    uuid: AppointmentUuid::new(),
                    customer_uuid: customer,
                    barber_uuid: barber,
                    service_uuid: service,
                    starts_at,
                },
            )
            .await
            .expect("Failed to book test appointment")
    }
}

fn open_all_week() -> WeeklyAvailability {
    let hours = WorkingHours {
        open: time(0, 0, 0, 0),
        close: time(23, 59, 0, 0),
    };

    WeeklyAvailability {
        monday: Some(hours),
        tuesday: Some(hours),
        wednesday: Some(hours),
        thursday: Some(hours),
        friday: Some(hours),
        saturday: Some(hours),
        sunday: Some(hours),
    }
}
