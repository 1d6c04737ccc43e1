//! Lower-is-better reconciliation of a locally known best against leaderboard values.

/// Folds `incoming` into `current`, keeping the lowest move count.
///
/// Leaderboards report zero when the player has no entry, so non-positive values count as absent.
pub fn reconcile_best(current: Option<u32>, incoming: Option<u32>) -> Option<u32> {
    match (current, incoming.filter(|&value| value > 0)) {
        (current, None) => current,
        (None, Some(incoming)) => Some(incoming),
        (Some(current), Some(incoming)) => Some(current.min(incoming)),
    }
}

/// Whether `moves` beats the best known before the game ended.
pub const fn is_improvement(current: Option<u32>, moves: u32) -> bool {
    match current {
        Some(best) => moves < best,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconcile_keeps_the_minimum() {
        assert_eq!(reconcile_best(None, Some(30)), Some(30));
        assert_eq!(reconcile_best(Some(30), Some(24)), Some(24));
        assert_eq!(reconcile_best(Some(24), Some(30)), Some(24));
    }

    #[test]
    fn reconcile_treats_missing_and_zero_as_absent() {
        assert_eq!(reconcile_best(Some(24), None), Some(24));
        assert_eq!(reconcile_best(Some(24), Some(0)), Some(24));
        assert_eq!(reconcile_best(None, Some(0)), None);
    }

    #[test]
    fn reconcile_never_exceeds_incoming() {
        for current in [None, Some(1), Some(20), Some(u32::MAX)] {
            for incoming in [1, 19, 20, 21, 500] {
                let best = reconcile_best(current, Some(incoming)).unwrap();
                assert!(best <= incoming);
                assert_eq!(best, current.map_or(incoming, |c| c.min(incoming)));
            }
        }
    }

    #[test]
    fn improvement_is_strictly_lower() {
        assert!(is_improvement(None, 40));
        assert!(is_improvement(Some(41), 40));
        assert!(!is_improvement(Some(40), 40));
    }
}
