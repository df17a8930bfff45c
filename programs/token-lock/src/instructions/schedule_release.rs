use anchor_lang::prelude::*;

use crate::constants::LOCK_SEED;
use crate::events::ReleaseScheduled;
use crate::state::Lock;

pub fn schedule_release_handler(
    ctx: Context<ScheduleRelease>,
    lock_id: u64,
    release_time: i64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts
        .lock
        .schedule(ctx.accounts.creator.key(), release_time, now)?;

    emit!(ReleaseScheduled {
        lock_id,
        release_time,
    });
    msg!("Lock {} releases at {}", lock_id, release_time);

    Ok(())
}

#[derive(Accounts)]
#[instruction(lock_id: u64)]
pub struct ScheduleRelease<'info> {
    #[account(
        mut,
        seeds = [LOCK_SEED, lock_id.to_le_bytes().as_ref()],
        bump = lock.bump
    )]
    pub lock: Account<'info, Lock>,

    pub creator: Signer<'info>,
}
