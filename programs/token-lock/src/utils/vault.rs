//! SPL Token CPIs moving escrow in and out of lock vaults.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, CloseAccount, Transfer};

/// Moves `amount` from a holder's token account into a vault; the holder signs.
pub fn pull_into_vault<'info>(
    token_program: AccountInfo<'info>,
    from: AccountInfo<'info>,
    vault: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    token::transfer(
        CpiContext::new(
            token_program,
            Transfer {
                from,
                to: vault,
                authority,
            },
        ),
        amount,
    )
}

/// Moves `amount` out of a vault, signed by the owning lock PDA.
pub fn push_from_vault<'info>(
    token_program: AccountInfo<'info>,
    vault: AccountInfo<'info>,
    to: AccountInfo<'info>,
    lock: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    token::transfer(
        CpiContext::new_with_signer(
            token_program,
            Transfer {
                from: vault,
                to,
                authority: lock,
            },
            signer_seeds,
        ),
        amount,
    )
}

/// Closes an emptied vault and returns its rent to `destination`.
pub fn close_vault<'info>(
    token_program: AccountInfo<'info>,
    vault: AccountInfo<'info>,
    destination: AccountInfo<'info>,
    lock: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    token::close_account(CpiContext::new_with_signer(
        token_program,
        CloseAccount {
            account: vault,
            destination,
            authority: lock,
        },
        signer_seeds,
    ))
}
