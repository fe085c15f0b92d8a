//! Deterministic exponential backoff.

use std::time::Duration;

/// Delay to wait after the `attempt`-th failure (1-based).
///
/// `base * 2^(attempt-1)`, clamped to `max` when one is given. No jitter:
/// the same inputs always produce the same delay. Attempt 0 waits nothing.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Option<Duration>) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let factor = u32::try_from(2u64.saturating_pow(attempt - 1)).unwrap_or(u32::MAX);
    let delay = base.saturating_mul(factor);

    match max {
        Some(cap) => delay.min(cap),
        None => delay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_SEC: Duration = Duration::from_secs(1);

    #[test]
    fn test_backoff_doubles_from_one_second() {
        for n in 1..=12u32 {
            assert_eq!(
                calculate_backoff(n, ONE_SEC, None),
                Duration::from_secs(1 << (n - 1)),
                "attempt {}",
                n
            );
        }
    }

    #[test]
    fn test_default_schedule() {
        let schedule: Vec<u64> = (1..6)
            .map(|n| calculate_backoff(n, ONE_SEC, None).as_secs())
            .collect();
        assert_eq!(schedule, vec![1, 2, 4, 8, 16]);
    }

    #[test]
    fn test_zero_attempt_waits_nothing() {
        assert_eq!(calculate_backoff(0, ONE_SEC, None), Duration::ZERO);
    }

    #[test]
    fn test_base_and_cap() {
        let base = Duration::from_secs(3);
        let cap = Some(Duration::from_secs(60));
        assert_eq!(calculate_backoff(1, base, cap), Duration::from_secs(3));
        assert_eq!(calculate_backoff(3, base, cap), Duration::from_secs(12));
        assert_eq!(calculate_backoff(6, base, cap), Duration::from_secs(60));
    }

    #[test]
    fn test_huge_attempt_saturates() {
        let delay = calculate_backoff(200, ONE_SEC, None);
        assert_eq!(delay, Duration::from_secs(u32::MAX as u64));
    }
}
