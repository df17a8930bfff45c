use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

pub use instructions::*;
pub use state::LockView;

declare_id!("BLFzED3NuZBPn1cwHqytntrsKtfDAEGkFW4E66zBeC2c");

#[program]
pub mod token_lock {
    use super::*;

    pub fn initialize_ledger(ctx: Context<InitializeLedger>) -> Result<()> {
        instructions::initialize_ledger_handler(ctx)
    }

    /// Escrows `amount` of the `asset` mint and returns the new lock id.
    pub fn create_lock(
        ctx: Context<CreateLock>,
        amount: u64,
        cliff_periods: u64,
        rate: u64,
        recipient: Pubkey,
        cancel_until_release: bool,
    ) -> Result<u64> {
        instructions::create_lock_handler(ctx, amount, cliff_periods, rate, recipient, cancel_until_release)
    }

    pub fn schedule_release(
        ctx: Context<ScheduleRelease>,
        lock_id: u64,
        release_time: i64,
    ) -> Result<()> {
        instructions::schedule_release_handler(ctx, lock_id, release_time)
    }

    /// Releases vested tokens. At most one of `amount` / `percent` may be non-zero;
    /// both zero withdraws everything currently vested.
    pub fn withdraw(
        ctx: Context<Withdraw>,
        lock_id: u64,
        amount: u64,
        percent: u64,
        to: Pubkey,
    ) -> Result<u64> {
        instructions::withdraw_handler(ctx, lock_id, amount, percent, to)
    }

    /// Refunds the full escrow to `to` (or the creator) and closes the lock.
    pub fn cancel(ctx: Context<Cancel>, lock_id: u64, to: Pubkey) -> Result<u64> {
        instructions::cancel_handler(ctx, lock_id, to)
    }

    pub fn get_lock(ctx: Context<ReadLock>, lock_id: u64) -> Result<LockView> {
        instructions::get_lock_handler(ctx, lock_id)
    }

    pub fn preview_withdrawable(ctx: Context<ReadLock>, lock_id: u64) -> Result<u64> {
        instructions::preview_withdrawable_handler(ctx, lock_id)
    }

    pub fn get_active_lock_count(ctx: Context<ReadLedger>) -> Result<u64> {
        instructions::get_active_lock_count_handler(ctx)
    }

    pub fn get_active_lock_ids(
        ctx: Context<ReadLedger>,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<u64>> {
        instructions::get_active_lock_ids_handler(ctx, offset, limit)
    }
}
