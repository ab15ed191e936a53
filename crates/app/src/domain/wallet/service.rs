//! Wallet service.
//!
//! Each operation is one database transaction: the appointment row is
//! locked first, the settle is conditioned on `payment_status` still being
//! unpaid at commit time, and balance guards live in the UPDATE statements
//! themselves. A transaction that loses to a concurrent payment is retried
//! a bounded number of times before surfacing `Conflict`.

use async_trait::async_trait;
use chairtime::{
    appointments::PaymentStatus,
    wallet::{GatewayMethod, PayoutPolicy, WalletTransactionKind, coins_to_wallet_credit},
};
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        appointments::{
            models::{Appointment, AppointmentUuid},
            repository::PgAppointmentsRepository,
        },
        barbers::repository::PgBarbersRepository,
        shops::models::ShopUuid,
        users::models::UserUuid,
        wallet::{
            errors::{WalletServiceError, is_retryable},
            models::{
                GatewayOutcome, PaymentReceipt, TopUpReceipt, WalletBalances, WalletTransaction,
            },
            repository::PgWalletRepository,
        },
    },
};

/// Attempts per operation before contention surfaces as `Conflict`.
const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct PgWalletService {
    db: Db,
    payout_policy: PayoutPolicy,
    wallet: PgWalletRepository,
    appointments: PgAppointmentsRepository,
    barbers: PgBarbersRepository,
}

impl PgWalletService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            payout_policy: PayoutPolicy::default(),
            wallet: PgWalletRepository::new(),
            appointments: PgAppointmentsRepository::new(),
            barbers: PgBarbersRepository::new(),
        }
    }

    /// Choose how the barber's side of a payment is settled.
    #[must_use]
    pub fn with_payout_policy(mut self, payout_policy: PayoutPolicy) -> Self {
        self.payout_policy = payout_policy;
        self
    }

    async fn pay_from_wallet_once(
        &self,
        shop: ShopUuid,
        appointment: AppointmentUuid,
        payer: UserUuid,
    ) -> Result<PaymentReceipt, WalletServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .appointments
            .get_appointment_for_update(&mut tx, shop, appointment)
            .await?;

        if current.payment_status == PaymentStatus::Paid {
            return Err(WalletServiceError::AlreadyPaid);
        }

        let balances = match self
            .wallet
            .debit_wallet(&mut tx, shop, payer, current.price)
            .await?
        {
            Some(balances) => balances,
            None => {
                // The guard refused: either the payer does not exist (the
                // lookup surfaces NotFound) or the balance is short.
                self.wallet.get_balances(&mut tx, shop, payer).await?;

                return Err(WalletServiceError::InsufficientBalance);
            }
        };

        let paid = self
            .appointments
            .mark_paid(&mut tx, shop, appointment, current.price)
            .await?
            .ok_or(WalletServiceError::AlreadyPaid)?;

        let amount = into_signed(paid.price)?;

        self.wallet
            .append_entry(
                &mut tx,
                shop,
                payer,
                WalletTransactionKind::PaymentSent,
                -amount,
                &format!("Payment for {}", paid.service_name),
            )
            .await?;

        self.record_payee_side(&mut tx, shop, &paid).await?;

        tx.commit().await?;

        Ok(PaymentReceipt {
            appointment: paid,
            payer_balances: balances,
        })
    }

    async fn top_up_once(
        &self,
        shop: ShopUuid,
        user: UserUuid,
        coins: u64,
        credit: u64,
    ) -> Result<TopUpReceipt, WalletServiceError> {
        let mut tx = self.db.begin().await?;

        let balances = match self
            .wallet
            .convert_coins(&mut tx, shop, user, coins, credit)
            .await?
        {
            Some(balances) => balances,
            None => {
                self.wallet.get_balances(&mut tx, shop, user).await?;

                return Err(WalletServiceError::InsufficientCoins);
            }
        };

        let amount = into_signed(credit)?;

        self.wallet
            .append_entry(
                &mut tx,
                shop,
                user,
                WalletTransactionKind::TopUp,
                amount,
                &format!("Converted {coins} coins"),
            )
            .await?;

        tx.commit().await?;

        Ok(TopUpReceipt {
            balances,
            credited: credit,
        })
    }

    async fn record_gateway_once(
        &self,
        shop: ShopUuid,
        appointment: AppointmentUuid,
        payer: UserUuid,
        method: GatewayMethod,
        reference: &str,
    ) -> Result<PaymentReceipt, WalletServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .appointments
            .get_appointment_for_update(&mut tx, shop, appointment)
            .await?;

        if current.payment_status == PaymentStatus::Paid {
            return Err(WalletServiceError::AlreadyPaid);
        }

        let paid = self
            .appointments
            .mark_paid(&mut tx, shop, appointment, current.price)
            .await?
            .ok_or(WalletServiceError::AlreadyPaid)?;

        let amount = into_signed(paid.price)?;

        // The money moved on the external rail, so the wallet is not
        // debited; the ledger still records the payer's side.
        self.wallet
            .append_entry(
                &mut tx,
                shop,
                payer,
                WalletTransactionKind::PaymentSent,
                -amount,
                &format!("{method} payment ({reference}) for {}", paid.service_name),
            )
            .await?;

        self.record_payee_side(&mut tx, shop, &paid).await?;

        let balances = self.wallet.get_balances(&mut tx, shop, payer).await?;

        tx.commit().await?;

        Ok(PaymentReceipt {
            appointment: paid,
            payer_balances: balances,
        })
    }

    /// Append the payee's ledger entry and, under
    /// [`PayoutPolicy::CreditWallet`], credit the barber's own wallet. A
    /// barber with no linked user keeps earnings off the ledger.
    async fn record_payee_side(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        appointment: &Appointment,
    ) -> Result<(), WalletServiceError> {
        let barber = match self
            .barbers
            .get_barber(tx, shop, appointment.barber_uuid)
            .await
        {
            Ok(barber) => barber,
            Err(sqlx::Error::RowNotFound) => return Ok(()),
            Err(error) => return Err(error.into()),
        };

        let Some(payee) = barber.user_uuid else {
            return Ok(());
        };

        let amount = into_signed(appointment.price)?;

        self.wallet
            .append_entry(
                tx,
                shop,
                payee,
                WalletTransactionKind::PaymentReceived,
                amount,
                &format!("Payment received for {}", appointment.service_name),
            )
            .await?;

        if self.payout_policy == PayoutPolicy::CreditWallet {
            self.wallet
                .credit_wallet(tx, shop, payee, appointment.price)
                .await?
                .ok_or(WalletServiceError::NotFound)?;
        }

        Ok(())
    }
}

#[async_trait]
impl WalletService for PgWalletService {
    #[tracing::instrument(
        name = "wallet.service.pay_from_wallet",
        skip(self),
        fields(shop_uuid = %shop, appointment_uuid = %appointment, payer_uuid = %payer),
        err
    )]
    async fn pay_from_wallet(
        &self,
        shop: ShopUuid,
        appointment: AppointmentUuid,
        payer: UserUuid,
    ) -> Result<PaymentReceipt, WalletServiceError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.pay_from_wallet_once(shop, appointment, payer).await {
                Err(error) if is_retryable(&error) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(WalletServiceError::Conflict);
                    }

                    tracing::info!(attempt, "payment transaction contended; retrying");
                }
                other => return other,
            }
        }
    }

    #[tracing::instrument(
        name = "wallet.service.top_up_from_coins",
        skip(self),
        fields(shop_uuid = %shop, user_uuid = %user, coins),
        err
    )]
    async fn top_up_from_coins(
        &self,
        shop: ShopUuid,
        user: UserUuid,
        coins: u64,
    ) -> Result<TopUpReceipt, WalletServiceError> {
        if coins == 0 {
            return Err(WalletServiceError::InvalidAmount);
        }

        let credit = coins_to_wallet_credit(coins);

        // Flooring must never burn coins for nothing.
        if credit == 0 {
            return Err(WalletServiceError::InvalidAmount);
        }

        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.top_up_once(shop, user, coins, credit).await {
                Err(error) if is_retryable(&error) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(WalletServiceError::Conflict);
                    }

                    tracing::info!(attempt, "top-up transaction contended; retrying");
                }
                other => return other,
            }
        }
    }

    #[tracing::instrument(
        name = "wallet.service.record_gateway_payment",
        skip(self, outcome),
        fields(shop_uuid = %shop, appointment_uuid = %appointment, payer_uuid = %payer, %method),
        err
    )]
    async fn record_gateway_payment(
        &self,
        shop: ShopUuid,
        appointment: AppointmentUuid,
        payer: UserUuid,
        method: GatewayMethod,
        outcome: GatewayOutcome,
    ) -> Result<PaymentReceipt, WalletServiceError> {
        let GatewayOutcome::Approved { reference } = outcome else {
            return Err(WalletServiceError::GatewayDeclined);
        };

        let mut attempt = 0;

        loop {
            attempt += 1;

            match self
                .record_gateway_once(shop, appointment, payer, method, &reference)
                .await
            {
                Err(error) if is_retryable(&error) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(WalletServiceError::Conflict);
                    }

                    tracing::info!(attempt, "gateway record contended; retrying");
                }
                other => return other,
            }
        }
    }

    async fn balances(
        &self,
        shop: ShopUuid,
        user: UserUuid,
    ) -> Result<WalletBalances, WalletServiceError> {
        let mut tx = self.db.begin().await?;

        let balances = self.wallet.get_balances(&mut tx, shop, user).await?;

        tx.commit().await?;

        Ok(balances)
    }

    async fn transactions(
        &self,
        shop: ShopUuid,
        user: UserUuid,
    ) -> Result<Vec<WalletTransaction>, WalletServiceError> {
        let mut tx = self.db.begin().await?;

        let entries = self.wallet.list_entries(&mut tx, shop, user).await?;

        tx.commit().await?;

        Ok(entries)
    }
}

#[automock]
#[async_trait]
/// Ledger operations. `wallet_balance`, `coins` and
/// `appointments.payment_status` are only ever written through these.
pub trait WalletService: Send + Sync {
    /// Settle an appointment from the payer's wallet balance.
    async fn pay_from_wallet(
        &self,
        shop: ShopUuid,
        appointment: AppointmentUuid,
        payer: UserUuid,
    ) -> Result<PaymentReceipt, WalletServiceError>;

    /// Convert loyalty coins into wallet balance at the fixed rate.
    async fn top_up_from_coins(
        &self,
        shop: ShopUuid,
        user: UserUuid,
        coins: u64,
    ) -> Result<TopUpReceipt, WalletServiceError>;

    /// Record an externally confirmed gateway charge against an
    /// appointment. No wallet balance moves.
    async fn record_gateway_payment(
        &self,
        shop: ShopUuid,
        appointment: AppointmentUuid,
        payer: UserUuid,
        method: GatewayMethod,
        outcome: GatewayOutcome,
    ) -> Result<PaymentReceipt, WalletServiceError>;

    /// A user's current balances.
    async fn balances(
        &self,
        shop: ShopUuid,
        user: UserUuid,
    ) -> Result<WalletBalances, WalletServiceError>;

    /// A user's ledger entries, newest first.
    async fn transactions(
        &self,
        shop: ShopUuid,
        user: UserUuid,
    ) -> Result<Vec<WalletTransaction>, WalletServiceError>;
}

fn into_signed(amount: u64) -> Result<i64, WalletServiceError> {
    i64::try_from(amount).map_err(|_| WalletServiceError::InvalidAmount)
}
