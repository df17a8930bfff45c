pub mod ledger;
pub mod lock;

pub use ledger::*;
pub use lock::*;
