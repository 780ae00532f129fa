//! One-rep-max estimation
//!
//! Epley is the primary formula; Brzycki is offered for comparison. Both are
//! only trusted for 1-15 reps and return None outside that domain.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ExerciseSession, SetRecord};
use crate::rounding::{round_to_increment, round_to_tenth};

/// Highest rep count the formulas are trusted for
pub const MAX_ESTIMATE_REPS: u32 = 15;

fn in_domain(reps: u32) -> bool {
    reps > 0 && reps <= MAX_ESTIMATE_REPS
}

/// Epley: load * (1 + reps / 30), rounded to 0.1 kg
pub fn epley_1rm(load_kg: f64, reps: u32) -> Option<f64> {
    if !in_domain(reps) {
        return None;
    }
    if reps == 1 {
        return Some(load_kg);
    }
    Some(round_to_tenth(load_kg * (1.0 + reps as f64 / 30.0)))
}

/// Brzycki: load * 36 / (37 - reps), rounded to 0.1 kg
pub fn brzycki_1rm(load_kg: f64, reps: u32) -> Option<f64> {
    if !in_domain(reps) {
        return None;
    }
    if reps == 1 {
        return Some(load_kg);
    }
    Some(round_to_tenth(load_kg * 36.0 / (37.0 - reps as f64)))
}

/// Best Epley estimate across sets. Out-of-range sets are skipped, never averaged in.
pub fn estimate_1rm<'a, I>(sets: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a SetRecord>,
{
    sets.into_iter()
        .filter_map(|s| epley_1rm(s.effective_load_kg, s.reps_completed))
        .fold(None, |best: Option<f64>, e| Some(best.map_or(e, |b| b.max(e))))
}

/// Load for a percentage of 1RM, snapped to the nearest increment
pub fn load_from_percentage(one_rm_kg: f64, percentage: f64, increment_kg: f64) -> f64 {
    round_to_increment(one_rm_kg * percentage, increment_kg)
}

// ---------------------------------------------------------------------------
/// Session Estimates: per-session 1RM series for progress charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEstimate {
    pub session_id: String,
    pub session_date: NaiveDate,
    pub estimated_1rm_kg: f64,
}

/// Best working-set estimate per session, oldest first.
///
/// Takes history in the usual newest-first order; sessions with no
/// qualifying working set are left out.
pub fn session_estimates(history: &[ExerciseSession]) -> Vec<SessionEstimate> {
    history
        .iter()
        .rev()
        .filter_map(|session| {
            estimate_1rm(session.working_sets()).map(|estimated_1rm_kg| SessionEstimate {
                session_id: session.session_id.clone(),
                session_date: session.session_date,
                estimated_1rm_kg,
            })
        })
        .collect()
}

/// Best estimate anywhere in the history
pub fn best_estimate(history: &[ExerciseSession]) -> Option<f64> {
    session_estimates(history)
        .into_iter()
        .map(|e| e.estimated_1rm_kg)
        .fold(None, |best: Option<f64>, e| Some(best.map_or(e, |b| b.max(e))))
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SetType;
    use crate::test_utils::{make_plain_session, make_set};

    #[test]
    fn test_epley_single_rep_is_load() {
        assert_eq!(epley_1rm(100.0, 1), Some(100.0));
    }

    #[test]
    fn test_epley_known_values() {
        assert_eq!(epley_1rm(100.0, 5), Some(116.7));
        assert_eq!(epley_1rm(80.0, 8), Some(101.3));
    }

    #[test]
    fn test_epley_exceeds_load_for_multiple_reps() {
        for load in [20.0, 62.5, 100.0, 180.0] {
            assert_eq!(epley_1rm(load, 1), Some(load));
            for reps in 2..=15 {
                let estimate = epley_1rm(load, reps).unwrap();
                assert!(estimate > load, "{}kg x {} gave {}", load, reps, estimate);
            }
        }
    }

    #[test]
    fn test_out_of_domain_reps() {
        for reps in [0, 16, 20, 100] {
            assert_eq!(epley_1rm(60.0, reps), None);
            assert_eq!(brzycki_1rm(60.0, reps), None);
        }
    }

    #[test]
    fn test_brzycki() {
        assert_eq!(brzycki_1rm(100.0, 1), Some(100.0));
        // 100 * 36 / 27 = 133.33
        assert_eq!(brzycki_1rm(100.0, 10), Some(133.3));
    }

    #[test]
    fn test_estimate_takes_max() {
        let sets = vec![make_set(5, 80.0), make_set(4, 80.0), make_set(3, 80.0)];
        // 80 * (1 + 5/30) = 93.3
        assert_eq!(estimate_1rm(&sets), Some(93.3));
    }

    #[test]
    fn test_estimate_ignores_out_of_range_sets() {
        let sets = vec![make_set(20, 60.0), make_set(8, 80.0)];
        assert_eq!(estimate_1rm(&sets), epley_1rm(80.0, 8));
    }

    #[test]
    fn test_estimate_none_cases() {
        let empty: Vec<SetRecord> = vec![];
        assert_eq!(estimate_1rm(&empty), None);
        assert_eq!(estimate_1rm(&vec![make_set(20, 60.0)]), None);
    }

    #[test]
    fn test_load_from_percentage() {
        // 140 * 0.75 = 105
        assert_eq!(load_from_percentage(140.0, 0.75, 2.5), 105.0);
        // 133.3 * 0.8 = 106.64 -> 107.5
        assert_eq!(load_from_percentage(133.3, 0.8, 2.5), 107.5);
        // No increment: raw product
        assert_eq!(load_from_percentage(100.0, 0.75, 0.0), 75.0);
    }

    #[test]
    fn test_session_estimates_oldest_first() {
        // Arrange: newest-first history
        let history = vec![
            make_plain_session(vec![make_set(5, 90.0)]),
            make_plain_session(vec![make_set(20, 40.0)]),
            make_plain_session(vec![
                make_set(5, 85.0),
                make_set(10, 100.0).with_set_type(SetType::Amrap),
            ]),
        ];

        // Act
        let series = session_estimates(&history);

        // Assert: the 20-rep session is skipped, the amrap set is ignored
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].estimated_1rm_kg, 99.2);
        assert_eq!(series[1].estimated_1rm_kg, 105.0);
        assert_eq!(best_estimate(&history), Some(105.0));
    }
}
