//! Transfer Engine
//!
//! Moves an amount between two accounts inside one unit of work:
//!
//! ```text
//! validate → sort ids → lock both rows → find sender/receiver
//!          → compute in minor units → save both → commit → invalidate cache
//! ```
//!
//! Both rows are always locked in ascending id order, whichever side is the
//! sender. Two transfers sharing an account therefore request their locks in
//! the same relative order and can never wait on each other in a cycle.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::TransferError;
use super::types::TransferRequest;
use crate::account::{Account, AccountStore, UnitOfWork, canonical_lock_order};
use crate::cache::CacheInvalidator;
use crate::money::{self, MoneyError};

pub struct TransferEngine {
    store: Arc<dyn AccountStore>,
    cache: Arc<dyn CacheInvalidator>,
}

impl TransferEngine {
    pub fn new(store: Arc<dyn AccountStore>, cache: Arc<dyn CacheInvalidator>) -> Self {
        Self { store, cache }
    }

    /// Execute one transfer. Either both balances change or neither does.
    pub async fn transfer(&self, req: &TransferRequest) -> Result<(), TransferError> {
        if req.from_account_id == req.to_account_id {
            return Err(TransferError::SameAccount);
        }

        let amount_minor =
            money::decimal_to_minor_units(req.amount).map_err(TransferError::InvalidAmount)?;
        if amount_minor <= 0 {
            return Err(TransferError::InvalidAmount(MoneyError::NotPositive));
        }

        info!(
            from = %req.from_account_id,
            to = %req.to_account_id,
            amount = %req.amount,
            "Transfer started"
        );

        let mut uow = self.store.begin().await?;
        let outcome = Self::apply(&mut *uow, req, amount_minor).await;
        if let Err(e) = outcome {
            debug!(error = %e, code = e.code(), "Transfer rejected, rolling back");
            if let Err(rollback_err) = uow.rollback().await {
                warn!(error = %rollback_err, "Rollback after rejected transfer failed");
            }
            return Err(e);
        }
        uow.commit().await?;

        self.cache.invalidate();
        info!(
            from = %req.from_account_id,
            to = %req.to_account_id,
            amount_minor,
            "Transfer committed"
        );
        Ok(())
    }

    async fn apply(
        uow: &mut dyn UnitOfWork,
        req: &TransferRequest,
        amount_minor: i64,
    ) -> Result<(), TransferError> {
        let ordered = canonical_lock_order(&[req.from_account_id, req.to_account_id]);
        let locked = uow.lock_for_update(&ordered).await?;

        // existence is only certain under lock
        let mut sender = take_locked(&locked, req.from_account_id)?;
        let mut receiver = take_locked(&locked, req.to_account_id)?;

        let sender_minor = sender
            .balance_minor()
            .map_err(|_| TransferError::CorruptBalance(sender.id))?;
        let receiver_minor = receiver
            .balance_minor()
            .map_err(|_| TransferError::CorruptBalance(receiver.id))?;

        let next_sender = sender_minor - amount_minor;
        if next_sender < 0 {
            debug!(
                account_id = %sender.id,
                balance_minor = sender_minor,
                amount_minor,
                "Insufficient balance"
            );
            return Err(TransferError::InsufficientBalance);
        }
        let next_receiver = receiver_minor
            .checked_add(amount_minor)
            .ok_or(TransferError::InvalidAmount(MoneyError::Overflow))?;

        sender.set_balance_minor(next_sender);
        receiver.set_balance_minor(next_receiver);
        uow.save_all(&[sender, receiver]).await?;
        Ok(())
    }
}

fn take_locked(locked: &[Account], id: uuid::Uuid) -> Result<Account, TransferError> {
    locked
        .iter()
        .find(|account| account.id == id)
        .cloned()
        .ok_or(TransferError::AccountNotFound(id))
}
