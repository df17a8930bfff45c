use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{INDEX_SEED, LEDGER_SEED, LOCK_SEED, VAULT_SEED};
use crate::events::LockCreated;
use crate::state::{IndexPage, Ledger, Lock, LockTerms};
use crate::utils::vault;

pub fn create_lock_handler(
    ctx: Context<CreateLock>,
    amount: u64,
    cliff_periods: u64,
    rate: u64,
    recipient: Pubkey,
    cancel_until_release: bool,
) -> Result<u64> {
    let terms = LockTerms {
        asset: ctx.accounts.asset.key(),
        amount,
        cliff_periods,
        rate,
        recipient,
        cancel_until_release,
    };
    terms.validate()?;

    vault::pull_into_vault(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.creator_token_account.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        ctx.accounts.creator.to_account_info(),
        amount,
    )?;

    let tail = ctx.accounts.ledger.tail_page();
    ctx.accounts.index_page.claim(tail, ctx.bumps.index_page);
    let (lock_id, slot) = ctx.accounts.ledger.register(&mut ctx.accounts.index_page)?;
    let creator = ctx.accounts.creator.key();
    let lock = &mut ctx.accounts.lock;
    lock.open(lock_id, slot, creator, terms);
    lock.bump = ctx.bumps.lock;
    lock.vault_bump = ctx.bumps.vault;

    emit!(LockCreated {
        lock_id,
        creator,
        asset: terms.asset,
        amount,
        cliff_periods,
        rate,
        recipient,
    });
    msg!("Lock {} created: {} units", lock_id, amount);

    Ok(lock_id)
}

#[derive(Accounts)]
pub struct CreateLock<'info> {
    #[account(mut, seeds = [LEDGER_SEED], bump = ledger.bump)]
    pub ledger: Box<Account<'info, Ledger>>,

    /// Tail page of the active index, created when the previous page fills up.
    #[account(
        init_if_needed,
        payer = creator,
        space = IndexPage::space(),
        seeds = [INDEX_SEED, ledger.tail_page().to_le_bytes().as_ref()],
        bump
    )]
    pub index_page: Box<Account<'info, IndexPage>>,

    #[account(
        init,
        payer = creator,
        space = 8 + Lock::SIZE,
        seeds = [LOCK_SEED, ledger.next_lock_id.to_le_bytes().as_ref()],
        bump
    )]
    pub lock: Account<'info, Lock>,

    #[account(
        init,
        payer = creator,
        token::mint = asset,
        token::authority = lock,
        seeds = [VAULT_SEED, lock.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub asset: Account<'info, Mint>,

    #[account(
        mut,
        token::mint = asset,
        token::authority = creator,
    )]
    pub creator_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub creator: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
