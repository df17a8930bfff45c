pub mod vault;
pub mod vesting;
