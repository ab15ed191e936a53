//! Users service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        shops::models::ShopUuid,
        users::{
            errors::UsersServiceError,
            models::{NewUser, User, UserUuid},
            repository::PgUsersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, shop: ShopUuid, user: NewUser) -> Result<User, UsersServiceError> {
        let wallet_balance = i64::try_from(user.wallet_balance)?;
        let coins = i64::try_from(user.coins)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_user(&mut tx, shop, &user, wallet_balance, coins)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_user(&self, shop: ShopUuid, user: UserUuid) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_user(&mut tx, shop, user).await?;

        tx.commit().await?;

        Ok(found)
    }
}

#[automock]
#[async_trait]
/// User persistence operations. Balance mutations live on the wallet
/// service; this one only sets opening balances at creation.
pub trait UsersService: Send + Sync {
    /// Creates a new user with its opening balances.
    async fn create_user(&self, shop: ShopUuid, user: NewUser) -> Result<User, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, shop: ShopUuid, user: UserUuid) -> Result<User, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn create_user_returns_opening_balances() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = UserUuid::new();

        let user = ctx
            .users
            .create_user(
                ctx.shop,
                NewUser {
                    uuid,
                    display_name: "Bilal".to_string(),
                    wallet_balance: 2500,
                    coins: 1200,
                },
            )
            .await?;

        assert_eq!(user.uuid, uuid);
        assert_eq!(user.display_name, "Bilal");
        assert_eq!(user.wallet_balance, 2500);
        assert_eq!(user.coins, 1200);

        Ok(())
    }

    #[tokio::test]
    async fn get_user_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.users.get_user(ctx.shop, UserUuid::new()).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn user_not_visible_to_other_shop() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx.create_user("Hassan", 0, 0).await;
        let other_shop = ctx.create_shop("Other Shop").await;

        let result = ctx.users.get_user(other_shop, user.uuid).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound for cross-shop access, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_user_in_unknown_shop_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx
            .users
            .create_user(
                ShopUuid::new(),
                NewUser {
                    uuid: UserUuid::new(),
                    display_name: "Orphan".to_string(),
                    wallet_balance: 0,
                    coins: 0,
                },
            )
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }
}
