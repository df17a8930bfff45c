use anchor_lang::prelude::*;

use crate::constants::{INDEX_PAGE_CAPACITY, RATE_SCALE};
use crate::error::LockError;
use crate::utils::vesting;

/// One escrowed quantity of a single mint, released on a per-period vesting schedule.
/// Closed locks are deleted; reading a closed or unknown id yields the default record.
#[account]
#[derive(Default, Debug)]
pub struct Lock {
    /// Ledger-assigned id (sequential, never reused).
    pub id: u64,
    /// Party that may schedule or cancel the lock.
    pub creator: Pubkey,
    /// Escrowed token mint.
    pub asset: Pubkey,
    /// Total escrowed quantity, fixed for the lock's lifetime.
    pub amount: u64,
    /// Cumulative quantity already released.
    pub withdrawn: u64,
    /// Whole periods after `release_time` during which nothing vests.
    pub cliff_periods: u64,
    /// Fraction of `amount` vesting per period, scaled by `RATE_SCALE`.
    pub rate: u64,
    /// Vesting start (Unix seconds, UTC); 0 until scheduled.
    pub release_time: i64,
    /// Withdrawal authority; the default key defers to `creator`.
    pub recipient: Pubkey,
    /// true: cancel only while unscheduled. false: cancel any time before the first withdrawal.
    pub cancel_until_release: bool,
    /// Position of `id` in the ledger's active index.
    pub slot: u64,
    pub bump: u8,
    pub vault_bump: u8,
}

impl Lock {
    pub const SIZE: usize =
        8 +  // id
        32 + // creator
        32 + // asset
        8 +  // amount
        8 +  // withdrawn
        8 +  // cliff_periods
        8 +  // rate
        8 +  // release_time
        32 + // recipient
        1 +  // cancel_until_release
        8 +  // slot
        1 +  // bump
        1;   // vault_bump
}

/// Creation parameters for a lock.
#[derive(Clone, Copy, Debug)]
pub struct LockTerms {
    pub asset: Pubkey,
    pub amount: u64,
    pub cliff_periods: u64,
    pub rate: u64,
    pub recipient: Pubkey,
    pub cancel_until_release: bool,
}

impl LockTerms {
    pub fn validate(&self) -> Result<()> {
        require!(self.asset != Pubkey::default(), LockError::AssetRequired);
        require!(self.amount > 0, LockError::AmountRequired);
        require!(
            self.rate > 0 && self.rate <= RATE_SCALE,
            LockError::RateOutOfRange
        );
        Ok(())
    }
}

impl Lock {
    /// Index page holding this lock's slot.
    pub fn index_page(&self) -> u64 {
        self.slot / INDEX_PAGE_CAPACITY
    }

    pub fn is_active(&self) -> bool {
        self.creator != Pubkey::default()
    }

    /// Fills a freshly allocated record. `terms` must already be validated.
    pub fn open(&mut self, id: u64, slot: u64, creator: Pubkey, terms: LockTerms) {
        self.id = id;
        self.creator = creator;
        self.asset = terms.asset;
        self.amount = terms.amount;
        self.withdrawn = 0;
        self.cliff_periods = terms.cliff_periods;
        self.rate = terms.rate;
        self.release_time = 0;
        self.recipient = terms.recipient;
        self.cancel_until_release = terms.cancel_until_release;
        self.slot = slot;
    }

    /// Vested minus withdrawn. Zero while unscheduled, before release, or inside the cliff.
    pub fn withdrawable(&self, now_ts: i64) -> Result<u64> {
        let vested = vesting::vested_amount(
            self.amount,
            self.rate,
            self.cliff_periods,
            self.release_time,
            now_ts,
        )?;
        Ok(vested
            .checked_sub(self.withdrawn)
            .ok_or(LockError::MathOverflow)?)
    }

    pub fn schedule(&mut self, caller: Pubkey, release_time: i64, now_ts: i64) -> Result<()> {
        require!(self.is_active(), LockError::LockNotActive);
        require_keys_eq!(caller, self.creator, LockError::NotCreator);
        require!(release_time > 0, LockError::InvalidTimestamp);
        require!(release_time >= now_ts, LockError::ReleaseTimeInPast);
        require!(self.release_time == 0, LockError::AlreadyScheduled);
        self.release_time = release_time;
        Ok(())
    }

    /// Key allowed to withdraw.
    pub fn withdraw_authority(&self) -> Pubkey {
        if self.recipient == Pubkey::default() {
            self.creator
        } else {
            self.recipient
        }
    }

    /// Wallet that receives a withdrawal: `to`, else recipient, else creator.
    pub fn payee(&self, to: Pubkey) -> Pubkey {
        if to == Pubkey::default() {
            self.withdraw_authority()
        } else {
            to
        }
    }

    /// Wallet that receives a cancellation refund: `to`, else creator.
    pub fn refund_to(&self, to: Pubkey) -> Pubkey {
        if to == Pubkey::default() {
            self.creator
        } else {
            to
        }
    }

    /// Validates a withdrawal request and returns the quantity to release.
    /// `amount == 0 && percent == 0` requests everything currently withdrawable.
    pub fn resolve_withdrawal(
        &self,
        caller: Pubkey,
        amount: u64,
        percent: u64,
        now_ts: i64,
    ) -> Result<u64> {
        require!(amount == 0 || percent == 0, LockError::AmbiguousAmount);
        require!(percent <= RATE_SCALE, LockError::PercentOutOfRange);
        require!(self.is_active(), LockError::LockNotActive);
        require!(
            self.release_time != 0 && now_ts >= self.release_time,
            LockError::NotReleased
        );
        require!(
            (now_ts as i128) >= vesting::cliff_end(self.release_time, self.cliff_periods),
            LockError::CliffActive
        );
        require_keys_eq!(caller, self.withdraw_authority(), LockError::NotAuthorized);

        let available = self.withdrawable(now_ts)?;
        if amount > 0 {
            require!(amount <= available, LockError::InsufficientVestedBalance);
            Ok(amount)
        } else if percent > 0 {
            Ok(vesting::percent_of(available, percent)?)
        } else {
            Ok(available)
        }
    }

    /// Books a resolved withdrawal. Returns true once the lock is fully withdrawn.
    pub fn record_withdrawal(&mut self, request: u64) -> Result<bool> {
        let withdrawn = self
            .withdrawn
            .checked_add(request)
            .ok_or(LockError::MathOverflow)?;
        require!(
            withdrawn <= self.amount,
            LockError::InsufficientVestedBalance
        );
        self.withdrawn = withdrawn;
        Ok(withdrawn == self.amount)
    }

    pub fn authorize_cancel(&self, caller: Pubkey) -> Result<()> {
        require!(self.is_active(), LockError::LockNotActive);
        require!(self.withdrawn == 0, LockError::AlreadyWithdrawnFrom);
        if self.cancel_until_release {
            require!(self.release_time == 0, LockError::AlreadyReleased);
        }
        require_keys_eq!(caller, self.creator, LockError::NotCreator);
        Ok(())
    }

    /// Points this lock at a new active-index slot after a swap-remove moved it.
    pub fn relink(&mut self, expected_id: u64, slot: u64) -> Result<()> {
        require!(self.id == expected_id, LockError::MovedLockMismatch);
        self.slot = slot;
        Ok(())
    }
}

/// Read model returned by `get_lock`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct LockView {
    pub creator: Pubkey,
    pub asset: Pubkey,
    pub amount: u64,
    pub withdrawn: u64,
    pub cliff_periods: u64,
    pub rate: u64,
    pub release_time: i64,
    pub recipient: Pubkey,
    pub cancel_until_release: bool,
}

impl From<&Lock> for LockView {
    fn from(lock: &Lock) -> Self {
        Self {
            creator: lock.creator,
            asset: lock.asset,
            amount: lock.amount,
            withdrawn: lock.withdrawn,
            cliff_periods: lock.cliff_periods,
            rate: lock.rate,
            release_time: lock.release_time,
            recipient: lock.recipient,
            cancel_until_release: lock.cancel_until_release,
        }
    }
}
