use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::events::CloseReason;
use crate::state::{IndexPage, Ledger, Lock};
use crate::utils::vault;

/// Accounts touched when a lock leaves the ledger.
pub struct ClosingLock<'a, 'info> {
    pub ledger: &'a mut Ledger,
    pub lock: &'a Account<'info, Lock>,
    pub vault: &'a mut Account<'info, TokenAccount>,
    pub slot_page: &'a mut IndexPage,
    pub last_page: Option<&'a mut IndexPage>,
    pub moved_lock: Option<&'a mut Lock>,
    /// Receives the lock and vault rent.
    pub creator: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
}

/// Closes the vault if it is empty, drops the lock from the active index, closes the lock
/// account and emits `LockClosed`. Shared by full withdrawal and cancel.
pub fn close_lock<'info>(
    accounts: ClosingLock<'_, 'info>,
    signer_seeds: &[&[&[u8]]],
    reason: CloseReason,
) -> Result<()> {
    let ClosingLock {
        ledger,
        lock,
        vault,
        slot_page,
        last_page,
        moved_lock,
        creator,
        token_program,
    } = accounts;

    // Tokens sent to the vault from outside keep it open; only an empty vault is closed.
    vault.reload()?;
    if vault.amount == 0 {
        vault::close_vault(
            token_program,
            vault.to_account_info(),
            creator.clone(),
            lock.to_account_info(),
            signer_seeds,
        )?;
    }

    let event = ledger.retire(lock, slot_page, last_page, moved_lock, reason)?;
    lock.close(creator)?;

    msg!("Lock {} closed: {:?}", event.lock_id, reason);
    emit!(event);
    Ok(())
}
