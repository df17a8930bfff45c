use anchor_lang::prelude::*;

use crate::constants::{INDEX_PAGE_CAPACITY, LEDGER_SEED};
use crate::state::Ledger;

pub fn initialize_ledger_handler(ctx: Context<InitializeLedger>) -> Result<()> {
    let ledger = &mut ctx.accounts.ledger;
    ledger.next_lock_id = 0;
    ledger.active_count = 0;
    ledger.bump = ctx.bumps.ledger;

    msg!("Ledger initialized ({} ids per index page)", INDEX_PAGE_CAPACITY);
    Ok(())
}

#[derive(Accounts)]
pub struct InitializeLedger<'info> {
    #[account(
        init,
        payer = payer,
        space = 8 + Ledger::SIZE,
        seeds = [LEDGER_SEED],
        bump
    )]
    pub ledger: Box<Account<'info, Ledger>>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}
