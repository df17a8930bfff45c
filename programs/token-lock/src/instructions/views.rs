use anchor_lang::prelude::*;

use crate::constants::{INDEX_SEED, LEDGER_SEED, LOCK_SEED};
use crate::error::LockError;
use crate::state::{page_ids, IndexPage, Ledger, Lock, LockView};

pub fn get_lock_handler(ctx: Context<ReadLock>, _lock_id: u64) -> Result<LockView> {
    let lock = load_lock(&ctx.accounts.lock.to_account_info())?;
    Ok(lock.as_ref().map(LockView::from).unwrap_or_default())
}

pub fn preview_withdrawable_handler(ctx: Context<ReadLock>, lock_id: u64) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    let withdrawable = match load_lock(&ctx.accounts.lock.to_account_info())? {
        Some(lock) => lock.withdrawable(now)?,
        None => 0,
    };
    msg!("Lock {}: {} withdrawable at {}", lock_id, withdrawable, now);
    Ok(withdrawable)
}

pub fn get_active_lock_count_handler(ctx: Context<ReadLedger>) -> Result<u64> {
    Ok(ctx.accounts.ledger.active_count)
}

/// Index pages covering `offset..offset + limit` are passed, in order, as remaining accounts.
pub fn get_active_lock_ids_handler(
    ctx: Context<ReadLedger>,
    offset: u64,
    limit: u32,
) -> Result<Vec<u64>> {
    let pages = ctx
        .remaining_accounts
        .iter()
        .map(load_index_page)
        .collect::<Result<Vec<_>>>()?;
    page_ids(ctx.accounts.ledger.active_count, &pages, offset, limit)
}

/// Decodes an index page and checks it sits at the PDA of its own page number.
fn load_index_page(info: &AccountInfo) -> Result<IndexPage> {
    require_keys_eq!(*info.owner, crate::ID, LockError::IndexPageMismatch);
    let page = {
        let data = info.try_borrow_data()?;
        IndexPage::try_deserialize(&mut &data[..])?
    };
    let expected = Pubkey::create_program_address(
        &[INDEX_SEED, page.page_no.to_le_bytes().as_ref(), &[page.bump]],
        &crate::ID,
    )
    .map_err(|_| LockError::IndexPageMismatch)?;
    require_keys_eq!(info.key(), expected, LockError::IndexPageMismatch);
    Ok(page)
}

/// Decodes a lock PDA; `None` when it was closed or never created.
fn load_lock(info: &AccountInfo) -> Result<Option<Lock>> {
    if info.owner != &crate::ID || info.data_is_empty() {
        return Ok(None);
    }
    let data = info.try_borrow_data()?;
    Ok(Some(Lock::try_deserialize(&mut &data[..])?))
}

#[derive(Accounts)]
#[instruction(lock_id: u64)]
pub struct ReadLock<'info> {
    /// CHECK: PDA of `lock_id`; may be closed or never created, decoded in-handler.
    #[account(seeds = [LOCK_SEED, lock_id.to_le_bytes().as_ref()], bump)]
    pub lock: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct ReadLedger<'info> {
    #[account(seeds = [LEDGER_SEED], bump = ledger.bump)]
    pub ledger: Box<Account<'info, Ledger>>,
}
