use anchor_lang::prelude::*;

/// Custom error codes for the token lock program.
#[error_code]
pub enum LockError {
    #[msg("Asset required")]
    AssetRequired,

    #[msg("Amount required")]
    AmountRequired,

    #[msg("Rate out of range")]
    RateOutOfRange,

    #[msg("Not creator")]
    NotCreator,

    #[msg("Release time in past")]
    ReleaseTimeInPast,

    #[msg("Invalid timestamp")]
    InvalidTimestamp,

    #[msg("Already scheduled")]
    AlreadyScheduled,

    #[msg("Not released")]
    NotReleased,

    #[msg("Cliff active")]
    CliffActive,

    #[msg("Not authorized")]
    NotAuthorized,

    #[msg("Ambiguous amount: pass at most one of amount and percent")]
    AmbiguousAmount,

    #[msg("Percent out of range")]
    PercentOutOfRange,

    #[msg("Insufficient vested balance")]
    InsufficientVestedBalance,

    #[msg("Already withdrawn from")]
    AlreadyWithdrawnFrom,

    #[msg("Already released")]
    AlreadyReleased,

    #[msg("Lock does not exist or is closed")]
    LockNotActive,

    #[msg("Index page account missing or mismatched")]
    IndexPageMismatch,

    #[msg("Active index slot does not hold this lock")]
    ActiveIndexCorrupt,

    #[msg("Moved lock account missing or mismatched")]
    MovedLockMismatch,

    #[msg("Creator account does not match the lock")]
    InvalidCreatorAccount,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Math overflow")]
    MathOverflow,
}
