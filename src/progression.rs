//! Progressive-Overload Recommendation Engine
//!
//! Double progression over a rep range. Each call re-derives the state from
//! history; nothing is persisted between calls:
//! - first_session: no comparable history, start from the equipment default
//! - increase: every set reached the top of the range, add load
//! - maintain: keep the load, add a rep to each set
//! - decrease: two or more sets fell below the range, shed a little load
//! - deload: repeated failing sessions, scale the load down
//! - plateau_break: the same load and reps too many sessions in a row
//!
//! Key principles:
//! - Only working sets count (warmups, dropsets, amrap sets are ignored)
//! - History is newest-first and never re-sorted
//! - Loads always land on the resolved increment

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ConfigError, EngineTables, BODYWEIGHT_ADDED_LOAD_INCREMENT_KG};
use crate::models::{
    Aggressiveness, Equipment, ExerciseSession, ProgressionState, RecommendationInput,
    RecommendationResult, SetLoad, SetRecommendation,
};
use crate::plateau::{
    count_consecutive_miss_sessions, count_plateau_sessions, mode_load, DEFAULT_MISS_THRESHOLD,
    DEFAULT_PLATEAU_REPS_TOLERANCE,
};
use crate::rounding::{round_half_up, round_to_increment};
use crate::variant::{filter_by_variant, MatchStrategy};

/// Consecutive failing sessions that trigger an auto-deload
pub const DELOAD_MISS_SESSIONS: u32 = 3;

/// Sets below min reps in the last session that trigger a decrease
pub const DECREASE_MISSED_SETS: usize = 2;

// ---------------------------------------------------------------------------
/// Error Handling
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum EngineError {
    #[error("Failed to parse recommendation input: {0}")]
    Parse(String),

    #[error("Invalid rep range: {min}-{max}")]
    InvalidRepRange { min: u32, max: u32 },

    #[error("Template must prescribe at least one set")]
    NoTargetSets,

    #[error("Invalid load: {0}")]
    InvalidLoad(String),

    #[error("Invalid set record: {0}")]
    InvalidSetRecord(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("History is not newest-first: {0}")]
    HistoryOrder(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
/// Resolved Configuration: rep range and increment for this call
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepRange {
    pub min_reps: u32,
    pub max_reps: u32,
}

impl RepRange {
    /// Rounded midpoint, halves going up
    pub fn midpoint(&self) -> u32 {
        round_half_up((self.min_reps as f64 + self.max_reps as f64) / 2.0)
    }
}

/// Preference overrides win over the template
pub fn resolve_rep_range(input: &RecommendationInput) -> RepRange {
    RepRange {
        min_reps: input
            .preferences
            .min_reps_override
            .unwrap_or(input.template_exercise.min_reps),
        max_reps: input
            .preferences
            .max_reps_override
            .unwrap_or(input.template_exercise.max_reps),
    }
}

/// Preference, then dumbbell, then movement pattern, then the fallback
pub fn resolve_increment(input: &RecommendationInput, tables: &EngineTables) -> f64 {
    if let Some(increment) = input.preferences.load_increment_kg {
        return increment;
    }
    if input.exercise.equipment == Equipment::Dumbbell {
        return tables.dumbbell_increment_kg;
    }
    tables.increment_for(input.exercise.movement_pattern)
}

// ---------------------------------------------------------------------------
/// Last Session: what the newest relevant session tells us
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct LastSession {
    load_kg: f64,
    reps_per_set: Vec<u32>,
    avg_reps: f64,
}

impl LastSession {
    /// None when the session has no working sets
    fn from_session(session: &ExerciseSession) -> Option<Self> {
        let avg_reps = session.average_working_reps()?;
        Some(Self {
            load_kg: mode_load(&session.working_loads()),
            reps_per_set: session.working_reps(),
            avg_reps,
        })
    }

    fn rounded_avg_reps(&self) -> u32 {
        round_half_up(self.avg_reps)
    }
}

/// Load and per-set rep targets decided for the next session
#[derive(Debug, Clone)]
struct Prescription {
    state: ProgressionState,
    load_kg: f64,
    rep_targets: Vec<u32>,
}

// ---------------------------------------------------------------------------
/// Engine
// ---------------------------------------------------------------------------

/// Stateless recommendation engine. Holds only its constant tables, so one
/// instance can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct ProgressionEngine {
    tables: EngineTables,
}

impl ProgressionEngine {
    pub fn new(tables: EngineTables) -> Self {
        Self { tables }
    }

    /// Engine using tables from `LIFT_COACH_*` environment overrides
    pub fn from_env() -> Result<Self, EngineError> {
        Ok(Self::new(EngineTables::from_env()?))
    }

    pub fn tables(&self) -> &EngineTables {
        &self.tables
    }

    /// Decide the next session's load and reps for one exercise
    pub fn recommend(
        &self,
        input: &RecommendationInput,
    ) -> Result<RecommendationResult, EngineError> {
        let range = validate(input)?;
        let increment = resolve_increment(input, &self.tables);
        if increment <= 0.0 {
            warn!(
                exercise = %input.exercise.id,
                increment,
                "non-positive load increment, rounding disabled"
            );
        }

        let matched = filter_by_variant(&input.history, &input.template_exercise.variant);
        let match_strategy = (!input.history.is_empty()).then_some(matched.strategy);
        debug!(
            exercise = %input.exercise.id,
            strategy = %matched.strategy,
            relevant = matched.sessions.len(),
            total = input.history.len(),
            "selected history"
        );

        let Some(last) = matched
            .sessions
            .first()
            .and_then(|session| LastSession::from_session(session))
        else {
            return Ok(self.first_session(input, range, match_strategy));
        };

        let relevant = matched.sessions.iter().copied();
        let settings = &input.user_settings;

        // Deload short-circuits everything else
        if settings.auto_deload_enabled {
            let miss_sessions = count_consecutive_miss_sessions(
                relevant.clone(),
                range.min_reps,
                DEFAULT_MISS_THRESHOLD,
            );
            if miss_sessions >= DELOAD_MISS_SESSIONS {
                let prescription = Prescription {
                    state: ProgressionState::Deload,
                    load_kg: round_to_increment(
                        last.load_kg * (1.0 - settings.deload_scale_pct),
                        increment,
                    ),
                    rep_targets: vec![range.min_reps.saturating_sub(2).max(1)],
                };
                let reasoning = format!(
                    "Auto-deload after {} straight sessions of missed reps at {}kg, taking {}% off.",
                    miss_sessions,
                    last.load_kg,
                    (settings.deload_scale_pct * 100.0).round()
                );
                return Ok(self.finish(input, range, prescription, reasoning, match_strategy));
            }
        }

        let mut prescription = evaluate_last_session(
            &last,
            range,
            increment,
            input.template_exercise.target_sets,
            self.tables.decrease_pct_for(settings.aggressiveness),
        );

        if matches!(
            prescription.state,
            ProgressionState::Maintain | ProgressionState::Increase
        ) {
            let plateau_sessions = count_plateau_sessions(
                relevant,
                last.load_kg,
                last.avg_reps,
                DEFAULT_PLATEAU_REPS_TOLERANCE,
            );
            if plateau_sessions >= settings.plateau_threshold {
                debug!(
                    exercise = %input.exercise.id,
                    plateau_sessions,
                    "plateau detected"
                );
                prescription = plateau_break(&last, range, increment, settings.aggressiveness);
            }
        }

        let reasoning = build_reasoning(&prescription, &last, range, input.user_settings.aggressiveness);
        Ok(self.finish(input, range, prescription, reasoning, match_strategy))
    }

    fn first_session(
        &self,
        input: &RecommendationInput,
        range: RepRange,
        match_strategy: Option<MatchStrategy>,
    ) -> RecommendationResult {
        let load_kg = if input.exercise.is_pure_bodyweight() {
            input.current_bodyweight_kg.unwrap_or(0.0)
        } else {
            self.tables.starting_load_for(input.exercise.equipment)
        };
        let reps = range.midpoint();

        let reasoning = if input.exercise.is_pure_bodyweight() {
            format!(
                "First session, starting with bodyweight only for {} reps; adjust as needed.",
                reps
            )
        } else {
            format!(
                "First session, starting conservative at {}kg for {} reps; adjust as needed.",
                load_kg, reps
            )
        };

        let prescription = Prescription {
            state: ProgressionState::FirstSession,
            load_kg,
            rep_targets: vec![reps],
        };
        self.finish(input, range, prescription, reasoning, match_strategy)
    }

    /// Expand a prescription into per-set targets and the display summary
    fn finish(
        &self,
        input: &RecommendationInput,
        range: RepRange,
        prescription: Prescription,
        reasoning: String,
        match_strategy: Option<MatchStrategy>,
    ) -> RecommendationResult {
        let pure_bodyweight = input.exercise.is_pure_bodyweight();
        let sets = build_sets(
            input.template_exercise.target_sets,
            prescription.load_kg,
            &prescription.rep_targets,
            range.min_reps,
            pure_bodyweight,
            input.current_bodyweight_kg,
        );

        debug!(
            exercise = %input.exercise.id,
            state = %prescription.state,
            load_kg = prescription.load_kg,
            "recommendation ready"
        );

        RecommendationResult {
            sets,
            reasoning,
            progression_state: prescription.state,
            suggested_load_kg: (!pure_bodyweight).then_some(prescription.load_kg),
            suggested_reps: prescription
                .rep_targets
                .first()
                .copied()
                .unwrap_or(range.min_reps),
            match_strategy,
        }
    }
}

/// Recommend with the built-in tables
pub fn recommend(input: &RecommendationInput) -> Result<RecommendationResult, EngineError> {
    ProgressionEngine::default().recommend(input)
}

// ---------------------------------------------------------------------------
/// State Machine
// ---------------------------------------------------------------------------

/// Increase, decrease or maintain based on the last session alone
fn evaluate_last_session(
    last: &LastSession,
    range: RepRange,
    increment: f64,
    target_sets: u32,
    decrease_pct: f64,
) -> Prescription {
    let all_hit_max = last.reps_per_set.iter().all(|&r| r >= range.max_reps);
    let missed_min = last
        .reps_per_set
        .iter()
        .filter(|&&r| r < range.min_reps)
        .count();

    if all_hit_max {
        Prescription {
            state: ProgressionState::Increase,
            load_kg: round_to_increment(last.load_kg + increment, increment),
            rep_targets: vec![range.min_reps],
        }
    } else if missed_min >= DECREASE_MISSED_SETS {
        Prescription {
            state: ProgressionState::Decrease,
            load_kg: round_to_increment(last.load_kg * (1.0 - decrease_pct), increment),
            rep_targets: vec![range.min_reps],
        }
    } else {
        // One more rep per set, capped at the top of the range
        let mut rep_targets: Vec<u32> = last
            .reps_per_set
            .iter()
            .map(|&r| r.saturating_add(1).min(range.max_reps))
            .collect();
        while rep_targets.len() < target_sets as usize {
            let prev = rep_targets.last().copied().unwrap_or(range.min_reps);
            rep_targets.push(prev.saturating_add(1).min(range.max_reps));
        }
        Prescription {
            state: ProgressionState::Maintain,
            load_kg: last.load_kg,
            rep_targets,
        }
    }
}

/// Force adaptation after a plateau, scaled by aggressiveness
fn plateau_break(
    last: &LastSession,
    range: RepRange,
    increment: f64,
    aggressiveness: Aggressiveness,
) -> Prescription {
    let (load_kg, reps) = match aggressiveness {
        Aggressiveness::Conservative => {
            let micro = increment / 2.0;
            (round_to_increment(last.load_kg + micro, micro), range.min_reps)
        }
        Aggressiveness::Moderate => (
            round_to_increment(last.load_kg + increment, increment),
            range.min_reps,
        ),
        Aggressiveness::Aggressive => (
            round_to_increment(last.load_kg + increment, increment),
            range.min_reps.saturating_sub(1).max(1),
        ),
    };
    Prescription {
        state: ProgressionState::PlateauBreak,
        load_kg,
        rep_targets: vec![reps],
    }
}

fn build_sets(
    target_sets: u32,
    load_kg: f64,
    rep_targets: &[u32],
    fallback_reps: u32,
    pure_bodyweight: bool,
    current_bodyweight_kg: Option<f64>,
) -> Vec<SetRecommendation> {
    let load = match (pure_bodyweight, current_bodyweight_kg) {
        (true, Some(bodyweight_kg)) => SetLoad::Bodyweight {
            bodyweight_kg,
            added_load_kg: round_to_increment(
                (load_kg - bodyweight_kg).max(0.0),
                BODYWEIGHT_ADDED_LOAD_INCREMENT_KG,
            ),
        },
        _ => SetLoad::External {
            external_load_kg: load_kg,
        },
    };

    (0..target_sets as usize)
        .map(|i| SetRecommendation {
            load,
            reps_target: rep_targets
                .get(i)
                .or(rep_targets.last())
                .copied()
                .unwrap_or(fallback_reps),
        })
        .collect()
}

fn build_reasoning(
    prescription: &Prescription,
    last: &LastSession,
    range: RepRange,
    aggressiveness: Aggressiveness,
) -> String {
    let avg = last.rounded_avg_reps();
    match prescription.state {
        ProgressionState::Increase => format!(
            "You hit {}+ reps on every set at {}kg, time to add weight.",
            range.max_reps, last.load_kg
        ),
        ProgressionState::Maintain => format!(
            "Averaging {} reps at {}kg, keep the weight and push for more reps.",
            avg, last.load_kg
        ),
        ProgressionState::Decrease => format!(
            "Struggled at {}kg (avg {} reps), dropping the weight slightly.",
            last.load_kg, avg
        ),
        ProgressionState::PlateauBreak => format!(
            "Plateau detected at {}kg x {} reps, {} to break through.",
            last.load_kg,
            avg,
            if aggressiveness == Aggressiveness::Conservative {
                "micro-loading"
            } else {
                "bumping the load"
            }
        ),
        // Produced elsewhere with their own wording
        ProgressionState::Deload | ProgressionState::FirstSession => String::new(),
    }
}

// ---------------------------------------------------------------------------
/// Input Validation
// ---------------------------------------------------------------------------

/// Reject inputs that would produce a misleading recommendation
fn validate(input: &RecommendationInput) -> Result<RepRange, EngineError> {
    if input.template_exercise.target_sets == 0 {
        return Err(EngineError::NoTargetSets);
    }

    let range = resolve_rep_range(input);
    if range.min_reps == 0 || range.min_reps > range.max_reps {
        return Err(EngineError::InvalidRepRange {
            min: range.min_reps,
            max: range.max_reps,
        });
    }

    let settings = &input.user_settings;
    if !(0.0..1.0).contains(&settings.deload_scale_pct) {
        return Err(EngineError::InvalidSetting(format!(
            "deload_scale_pct must be in [0, 1), got {}",
            settings.deload_scale_pct
        )));
    }
    if settings.plateau_threshold == 0 {
        return Err(EngineError::InvalidSetting(
            "plateau_threshold must be at least 1".to_string(),
        ));
    }

    if let Some(increment) = input.preferences.load_increment_kg {
        if !increment.is_finite() {
            return Err(EngineError::InvalidLoad(format!(
                "load_increment_kg must be finite, got {}",
                increment
            )));
        }
    }
    if let Some(bodyweight) = input.current_bodyweight_kg {
        if !(bodyweight.is_finite() && bodyweight > 0.0) {
            return Err(EngineError::InvalidLoad(format!(
                "current_bodyweight_kg must be positive, got {}",
                bodyweight
            )));
        }
    }

    for session in &input.history {
        for set in &session.sets {
            if set.reps_completed == 0 {
                return Err(EngineError::InvalidSetRecord(format!(
                    "session {} has a set with 0 reps",
                    session.session_id
                )));
            }
            if !(set.effective_load_kg.is_finite() && set.effective_load_kg >= 0.0) {
                return Err(EngineError::InvalidLoad(format!(
                    "session {} has effective load {}",
                    session.session_id, set.effective_load_kg
                )));
            }
        }
    }

    if let Some(pair) = input
        .history
        .windows(2)
        .find(|pair| pair[0].session_date < pair[1].session_date)
    {
        return Err(EngineError::HistoryOrder(format!(
            "{} ({}) comes before {} ({})",
            pair[0].session_id, pair[0].session_date, pair[1].session_id, pair[1].session_date
        )));
    }

    Ok(range)
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
