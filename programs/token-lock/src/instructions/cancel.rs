use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{INDEX_SEED, LEDGER_SEED, LOCK_SEED, VAULT_SEED};
use crate::error::LockError;
use crate::events::CloseReason;
use crate::instructions::close_lock::{close_lock, ClosingLock};
use crate::state::{IndexPage, Ledger, Lock};
use crate::utils::vault;

pub fn cancel_handler(ctx: Context<Cancel>, lock_id: u64, to: Pubkey) -> Result<u64> {
    let lock = &ctx.accounts.lock;
    lock.authorize_cancel(ctx.accounts.creator.key())?;

    let refund_to = lock.refund_to(to);
    require_keys_eq!(
        ctx.accounts.destination.mint,
        lock.asset,
        LockError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.destination.owner,
        refund_to,
        LockError::InvalidTokenAccount
    );

    let amount = lock.amount;
    let id_bytes = lock_id.to_le_bytes();
    let bump = [lock.bump];
    let signer_seeds: &[&[&[u8]]] = &[&[LOCK_SEED, id_bytes.as_ref(), bump.as_ref()]];

    vault::push_from_vault(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        ctx.accounts.destination.to_account_info(),
        ctx.accounts.lock.to_account_info(),
        signer_seeds,
        amount,
    )?;
    msg!("Lock {}: refunded {} to {}", lock_id, amount, refund_to);

    close_lock(
        ClosingLock {
            ledger: &mut ctx.accounts.ledger,
            lock: &ctx.accounts.lock,
            vault: &mut ctx.accounts.vault,
            slot_page: &mut ctx.accounts.slot_page,
            last_page: ctx.accounts.last_page.as_deref_mut(),
            moved_lock: ctx.accounts.moved_lock.as_deref_mut(),
            creator: ctx.accounts.creator.to_account_info(),
            token_program: ctx.accounts.token_program.to_account_info(),
        },
        signer_seeds,
        CloseReason::Cancelled,
    )?;

    Ok(amount)
}

#[derive(Accounts)]
#[instruction(lock_id: u64)]
pub struct Cancel<'info> {
    #[account(mut, seeds = [LEDGER_SEED], bump = ledger.bump)]
    pub ledger: Box<Account<'info, Ledger>>,

    #[account(
        mut,
        seeds = [LOCK_SEED, lock_id.to_le_bytes().as_ref()],
        bump = lock.bump
    )]
    pub lock: Account<'info, Lock>,

    #[account(
        mut,
        seeds = [VAULT_SEED, lock.key().as_ref()],
        bump = lock.vault_bump,
        constraint = vault.mint == lock.asset @ LockError::InvalidTokenMint,
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = destination.key() != vault.key() @ LockError::InvalidTokenAccount,
    )]
    pub destination: Account<'info, TokenAccount>,

    /// Index page holding this lock's slot.
    #[account(
        mut,
        seeds = [INDEX_SEED, lock.index_page().to_le_bytes().as_ref()],
        bump = slot_page.bump
    )]
    pub slot_page: Account<'info, IndexPage>,

    /// Page holding the last index slot, when it differs from `slot_page`.
    #[account(mut)]
    pub last_page: Option<Account<'info, IndexPage>>,

    /// Last lock in the active index; required when the cancelled lock is not last.
    #[account(mut)]
    pub moved_lock: Option<Account<'info, Lock>>,

    #[account(mut)]
    pub creator: Signer<'info>,

    pub token_program: Program<'info, Token>,
}
