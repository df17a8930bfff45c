use anchor_lang::prelude::*;

#[event]
pub struct LockCreated {
    pub lock_id: u64,
    pub creator: Pubkey,
    pub asset: Pubkey,
    pub amount: u64,
    pub cliff_periods: u64,
    pub rate: u64,
    pub recipient: Pubkey,
}

#[event]
pub struct ReleaseScheduled {
    pub lock_id: u64,
    pub release_time: i64,
}

#[event]
pub struct Released {
    pub lock_id: u64,
    /// Wallet actually paid.
    pub recipient: Pubkey,
    pub amount: u64,
}

#[event]
pub struct LockClosed {
    pub lock_id: u64,
    pub creator: Pubkey,
    pub asset: Pubkey,
    pub amount: u64,
    pub reason: CloseReason,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseReason {
    FullyVested,
    Cancelled,
}
