pub mod initialize_ledger;
pub mod create_lock;
pub mod schedule_release;
pub mod withdraw;
pub mod cancel;
pub mod close_lock;
pub mod views;

pub use initialize_ledger::*;
pub use create_lock::*;
pub use schedule_release::*;
pub use withdraw::*;
pub use cancel::*;
pub use views::*;
