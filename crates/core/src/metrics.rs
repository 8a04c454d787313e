//! Read-side metric formulas.
//!
//! Dashboards recompute every metric on demand from current entity state;
//! nothing here is persisted and none of it holds independent invariants.
//! The counting queries live in the repository layer; the ratio math lives
//! here so it can be unit-tested without a database.

/// Live-release rate over a set of recorded outcomes: the share of animals
/// that left shelter care alive (adoption, transfer, return to owner).
///
/// Returns `None` when no outcomes were recorded in the window.
pub fn live_release_rate(live_outcomes: i64, total_outcomes: i64) -> Option<f64> {
    if total_outcomes <= 0 {
        None
    } else {
        Some(live_outcomes as f64 / total_outcomes as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_release_rate_basic() {
        assert_eq!(live_release_rate(9, 10), Some(0.9));
    }

    #[test]
    fn all_live_is_one() {
        assert_eq!(live_release_rate(4, 4), Some(1.0));
    }

    #[test]
    fn empty_window_is_none() {
        assert_eq!(live_release_rate(0, 0), None);
    }
}
