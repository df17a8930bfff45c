//! Program-wide constants. Fixed for the life of a deployment.

/// Integer representing 100% in `rate` and `percent` fields.
pub const RATE_SCALE: u64 = 1_000_000_000_000;

/// Seconds per day (UTC).
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Duration of one vesting period.
pub const PERIOD_LENGTH: i64 = SECONDS_PER_DAY;

/// Ids held by one active-index page account. The index grows by whole pages.
pub const INDEX_PAGE_CAPACITY: u64 = 128;

/// Max ids returned by one `get_active_lock_ids` call (return data is capped at 1024 bytes).
pub const MAX_PAGE_IDS: u32 = 127;

pub const LEDGER_SEED: &[u8] = b"ledger";
pub const INDEX_SEED: &[u8] = b"index";
pub const LOCK_SEED: &[u8] = b"lock";
pub const VAULT_SEED: &[u8] = b"vault";
