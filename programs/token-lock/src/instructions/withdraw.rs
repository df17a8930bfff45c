use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{INDEX_SEED, LEDGER_SEED, LOCK_SEED, VAULT_SEED};
use crate::error::LockError;
use crate::events::{CloseReason, Released};
use crate::instructions::close_lock::{close_lock, ClosingLock};
use crate::state::{IndexPage, Ledger, Lock};
use crate::utils::vault;

pub fn withdraw_handler(
    ctx: Context<Withdraw>,
    lock_id: u64,
    amount: u64,
    percent: u64,
    to: Pubkey,
) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;

    // Capture AccountInfos before taking the mutable borrow of the lock.
    let lock_ai = ctx.accounts.lock.to_account_info();
    let token_program_ai = ctx.accounts.token_program.to_account_info();
    let vault_ai = ctx.accounts.vault.to_account_info();

    let lock = &mut ctx.accounts.lock;
    let request = lock.resolve_withdrawal(ctx.accounts.caller.key(), amount, percent, now)?;

    let payee = lock.payee(to);
    require_keys_eq!(
        ctx.accounts.destination.mint,
        lock.asset,
        LockError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.destination.owner,
        payee,
        LockError::InvalidTokenAccount
    );

    let id_bytes = lock_id.to_le_bytes();
    let bump = [lock.bump];
    let signer_seeds: &[&[&[u8]]] = &[&[LOCK_SEED, id_bytes.as_ref(), bump.as_ref()]];

    if request > 0 {
        vault::push_from_vault(
            token_program_ai.clone(),
            vault_ai,
            ctx.accounts.destination.to_account_info(),
            lock_ai,
            signer_seeds,
            request,
        )?;
    }

    let fully_vested = lock.record_withdrawal(request)?;

    emit!(Released {
        lock_id,
        recipient: payee,
        amount: request,
    });
    msg!(
        "Lock {}: released {} ({} of {})",
        lock_id,
        request,
        lock.withdrawn,
        lock.amount
    );

    if fully_vested {
        close_lock(
            ClosingLock {
                ledger: &mut ctx.accounts.ledger,
                lock: &ctx.accounts.lock,
                vault: &mut ctx.accounts.vault,
                slot_page: &mut ctx.accounts.slot_page,
                last_page: ctx.accounts.last_page.as_deref_mut(),
                moved_lock: ctx.accounts.moved_lock.as_deref_mut(),
                creator: ctx.accounts.creator.to_account_info(),
                token_program: token_program_ai,
            },
            signer_seeds,
            CloseReason::FullyVested,
        )?;
    }

    Ok(request)
}

#[derive(Accounts)]
#[instruction(lock_id: u64)]
pub struct Withdraw<'info> {
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

    /// Receives the lock and vault rent once the lock is fully withdrawn.
    #[account(mut, address = lock.creator @ LockError::InvalidCreatorAccount)]
    pub creator: SystemAccount<'info>,

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

    /// Last lock in the active index; required when this withdrawal closes a lock in another slot.
    #[account(mut)]
    pub moved_lock: Option<Account<'info, Lock>>,

    pub caller: Signer<'info>,

    pub token_program: Program<'info, Token>,
}
