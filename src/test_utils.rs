//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Set and session factories
//! - Canned plateau / missed-rep histories
//! - A ready-to-tweak engine input

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, NaiveDate};

use crate::models::{
  Equipment, ExerciseMeta, ExercisePreference, ExerciseSession, MovementPattern, RecommendationInput,
  SetRecord, TemplateExerciseConfig, UserSettings,
};
use crate::variant::VariantKey;

static SESSION_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Date every factory session is anchored to
pub fn base_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
}

/// ---------------------------------------------------------------------------
/// Set and Session Factories
/// ---------------------------------------------------------------------------

/// A working set with an external load
pub fn make_set(reps: u32, load_kg: f64) -> SetRecord {
  SetRecord::external(load_kg, reps)
}

/// A session with the given variant, dated at the base date
pub fn make_session(variant: VariantKey, sets: Vec<SetRecord>) -> ExerciseSession {
  let seq = SESSION_SEQ.fetch_add(1, Ordering::Relaxed);
  ExerciseSession {
    session_id: format!("session-{}", seq),
    session_date: base_date(),
    variant,
    sets,
  }
}

pub fn make_plain_session(sets: Vec<SetRecord>) -> ExerciseSession {
  make_session(VariantKey::plain(), sets)
}

/// A plain session `weeks_ago` weeks before the base date
pub fn make_weekly_session(weeks_ago: i64, sets: Vec<SetRecord>) -> ExerciseSession {
  let mut session = make_plain_session(sets);
  session.session_date = base_date() - Duration::weeks(weeks_ago);
  session
}

/// Newest-first weekly sessions, each three identical sets
pub fn make_plateau_history(sessions: usize, load_kg: f64, reps: u32) -> Vec<ExerciseSession> {
  (0..sessions)
    .map(|i| {
      make_weekly_session(
        i as i64,
        vec![make_set(reps, load_kg), make_set(reps, load_kg), make_set(reps, load_kg)],
      )
    })
    .collect()
}

/// Newest-first weekly sessions where every session misses `min_reps` on all three sets
pub fn make_miss_history(sessions: usize, load_kg: f64, min_reps: u32) -> Vec<ExerciseSession> {
  (0..sessions)
    .map(|i| {
      make_weekly_session(
        i as i64,
        vec![
          make_set(min_reps - 2, load_kg),
          make_set(min_reps - 2, load_kg),
          make_set(min_reps - 1, load_kg),
        ],
      )
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Engine Input Factories
/// ---------------------------------------------------------------------------

pub fn mock_barbell_squat() -> ExerciseMeta {
  ExerciseMeta {
    id: "ex-squat".to_string(),
    supports_bodyweight: false,
    equipment: Equipment::Barbell,
    movement_pattern: MovementPattern::Squat,
  }
}

pub fn mock_exercise(
  id: &str,
  supports_bodyweight: bool,
  equipment: Equipment,
  movement_pattern: MovementPattern,
) -> ExerciseMeta {
  ExerciseMeta {
    id: id.to_string(),
    supports_bodyweight,
    equipment,
    movement_pattern,
  }
}

pub fn make_template(target_sets: u32, min_reps: u32, max_reps: u32) -> TemplateExerciseConfig {
  TemplateExerciseConfig {
    target_sets,
    min_reps,
    max_reps,
    variant: VariantKey::plain(),
  }
}

pub fn mock_user_settings() -> UserSettings {
  UserSettings::default()
}

/// Barbell squat, 3 x 6-10, moderate settings with auto-deload on
pub fn make_input(history: Vec<ExerciseSession>) -> RecommendationInput {
  RecommendationInput {
    exercise: mock_barbell_squat(),
    template_exercise: make_template(3, 6, 10),
    history,
    current_bodyweight_kg: None,
    preferences: ExercisePreference::default(),
    user_settings: mock_user_settings(),
  }
}
