//! Plateau and missed-rep streak detection
//!
//! Both counters walk history newest-first and stop at the first session
//! that breaks the run. There is no partial credit and no skipping.

use crate::models::ExerciseSession;

/// Average reps may drift by less than this and still count as "the same"
pub const DEFAULT_PLATEAU_REPS_TOLERANCE: f64 = 0.5;

/// Working sets below min reps needed for a session to count as a miss
pub const DEFAULT_MISS_THRESHOLD: usize = 2;

/// Count consecutive sessions at the reference load and average reps.
///
/// A session without working sets ends the streak.
pub fn count_plateau_sessions<'a, I>(
    history: I,
    reference_load_kg: f64,
    reference_avg_reps: f64,
    reps_tolerance: f64,
) -> u32
where
    I: IntoIterator<Item = &'a ExerciseSession>,
{
    let mut count = 0;
    for session in history {
        let Some(avg_reps) = session.average_working_reps() else {
            break;
        };
        let session_load = mode_load(&session.working_loads());

        if session_load == reference_load_kg && (avg_reps - reference_avg_reps).abs() < reps_tolerance {
            count += 1;
        } else {
            break;
        }
    }
    count
}

/// Count consecutive sessions where at least `miss_threshold` working sets
/// fell short of `min_reps`.
pub fn count_consecutive_miss_sessions<'a, I>(
    history: I,
    min_reps: u32,
    miss_threshold: usize,
) -> u32
where
    I: IntoIterator<Item = &'a ExerciseSession>,
{
    let mut count = 0;
    for session in history {
        let misses = session
            .working_sets()
            .filter(|s| s.reps_completed < min_reps)
            .count();
        if misses >= miss_threshold {
            count += 1;
        } else {
            break;
        }
    }
    count
}

/// Most frequent load. Ties go to the value seen first; empty input is 0.
pub fn mode_load(loads: &[f64]) -> f64 {
    // (value, frequency) in first-seen order
    let mut freq: Vec<(f64, usize)> = Vec::new();
    for &load in loads {
        match freq.iter_mut().find(|(value, _)| *value == load) {
            Some((_, n)) => *n += 1,
            None => freq.push((load, 1)),
        }
    }

    let mut best: Option<(f64, usize)> = None;
    for (value, n) in freq {
        if best.is_none_or(|(_, best_n)| n > best_n) {
            best = Some((value, n));
        }
    }
    best.map(|(value, _)| value).unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
