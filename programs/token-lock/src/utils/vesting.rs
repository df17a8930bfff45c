//! Per-period vesting arithmetic.
//! - elapsed_periods = floor((now - release_time) / PERIOD_LENGTH), 0 while unset or before release
//! - vested_periods = max(0, elapsed_periods - cliff_periods)
//! - vested_fraction = min(vested_periods * rate, RATE_SCALE)
//! - vested_amount = floor(amount * vested_fraction / RATE_SCALE)

use crate::constants::{PERIOD_LENGTH, RATE_SCALE};
use crate::error::LockError;

/// Whole vesting periods elapsed since `release_time`.
pub fn elapsed_periods(now_ts: i64, release_time: i64) -> u64 {
    if release_time == 0 || now_ts < release_time {
        return 0;
    }
    let elapsed = (now_ts as i128) - (release_time as i128);
    (elapsed / PERIOD_LENGTH as i128) as u64
}

/// Portion of `amount` vested at `now_ts`. Never errors on an unscheduled or cliff-blocked lock.
pub fn vested_amount(
    amount: u64,
    rate: u64,
    cliff_periods: u64,
    release_time: i64,
    now_ts: i64,
) -> Result<u64, LockError> {
    let vested_periods = elapsed_periods(now_ts, release_time).saturating_sub(cliff_periods);
    let fraction = (vested_periods as u128)
        .saturating_mul(rate as u128)
        .min(RATE_SCALE as u128);
    let vested = (amount as u128)
        .checked_mul(fraction)
        .ok_or(LockError::MathOverflow)?
        / RATE_SCALE as u128;
    u64::try_from(vested).map_err(|_| LockError::MathOverflow)
}

/// First timestamp at which the cliff no longer blocks withdrawals.
pub fn cliff_end(release_time: i64, cliff_periods: u64) -> i128 {
    (release_time as i128) + (cliff_periods as i128) * (PERIOD_LENGTH as i128)
}

/// floor(available * percent / RATE_SCALE).
pub fn percent_of(available: u64, percent: u64) -> Result<u64, LockError> {
    if percent > RATE_SCALE {
        return Err(LockError::PercentOutOfRange);
    }
    let share = (available as u128)
        .checked_mul(percent as u128)
        .ok_or(LockError::MathOverflow)?
        / RATE_SCALE as u128;
    u64::try_from(share).map_err(|_| LockError::MathOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_767_225_600; // 2026-01-01 00:00:00 UTC
    const TEN_PERCENT: u64 = RATE_SCALE / 10;

    #[test]
    fn nothing_vests_before_release() {
        assert_eq!(vested_amount(1000, TEN_PERCENT, 0, 0, T).unwrap(), 0);
        assert_eq!(vested_amount(1000, TEN_PERCENT, 0, T, T - 1).unwrap(), 0);
        assert_eq!(elapsed_periods(T - 1, T), 0);
    }

    #[test]
    fn period_boundary_inclusive() {
        assert_eq!(elapsed_periods(T + PERIOD_LENGTH - 1, T), 0);
        assert_eq!(elapsed_periods(T + PERIOD_LENGTH, T), 1);
        assert_eq!(vested_amount(1000, TEN_PERCENT, 0, T, T + PERIOD_LENGTH - 1).unwrap(), 0);
        assert_eq!(vested_amount(1000, TEN_PERCENT, 0, T, T + PERIOD_LENGTH).unwrap(), 100);
    }

    #[test]
    fn cliff_periods_are_skipped() {
        let rate = RATE_SCALE / 5;
        assert_eq!(vested_amount(1000, rate, 3, T, T + 2 * PERIOD_LENGTH).unwrap(), 0);
        assert_eq!(vested_amount(1000, rate, 3, T, T + 3 * PERIOD_LENGTH).unwrap(), 0);
        assert_eq!(vested_amount(1000, rate, 3, T, T + 4 * PERIOD_LENGTH).unwrap(), 200);
    }

    #[test]
    fn saturates_at_full_amount() {
        assert_eq!(vested_amount(1000, TEN_PERCENT, 0, T, T + 10 * PERIOD_LENGTH).unwrap(), 1000);
        assert_eq!(vested_amount(1000, TEN_PERCENT, 0, T, T + 500 * PERIOD_LENGTH).unwrap(), 1000);
        assert_eq!(vested_amount(u64::MAX, RATE_SCALE, u64::MAX - 1, 1, i64::MAX).unwrap(), 0);
        assert_eq!(vested_amount(u64::MAX, RATE_SCALE, 0, 1, i64::MAX).unwrap(), u64::MAX);
    }

    #[test]
    fn floors_fractional_amounts() {
        // 1/3 of a percent per period on 1000 units.
        let rate = RATE_SCALE / 300;
        assert_eq!(vested_amount(1000, rate, 0, T, T + PERIOD_LENGTH).unwrap(), 3);
        assert_eq!(vested_amount(1000, rate, 0, T, T + 2 * PERIOD_LENGTH).unwrap(), 6);
    }

    #[test]
    fn vesting_never_reverses() {
        let mut last = 0;
        for day in 0..40 {
            let v = vested_amount(7_777, RATE_SCALE / 30, 2, T, T + day * PERIOD_LENGTH + 17).unwrap();
            assert!(v >= last);
            last = v;
        }
        assert_eq!(last, 7_777);
    }

    #[test]
    fn cliff_end_does_not_overflow() {
        assert_eq!(cliff_end(T, 0), T as i128);
        assert_eq!(cliff_end(T, 3), (T + 3 * PERIOD_LENGTH) as i128);
        assert!(cliff_end(i64::MAX, u64::MAX) > i64::MAX as i128);
    }

    #[test]
    fn percent_share() {
        assert_eq!(percent_of(1000, RATE_SCALE / 2).unwrap(), 500);
        assert_eq!(percent_of(999, RATE_SCALE / 2).unwrap(), 499);
        assert_eq!(percent_of(1000, RATE_SCALE).unwrap(), 1000);
        assert_eq!(percent_of(1000, 0).unwrap(), 0);
        assert!(matches!(
            percent_of(1000, RATE_SCALE + 1),
            Err(LockError::PercentOutOfRange)
        ));
    }
}
