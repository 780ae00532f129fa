//! Progressive-overload coach
//!
//! Given one exercise's logged history and the next session's template, the
//! engine recommends the load and per-set rep targets with a short reasoning
//! line. Every call is a pure function of its input.

pub mod config;
pub mod models;
pub mod one_rep_max;
pub mod plateau;
pub mod progression;
pub mod rounding;
pub mod variant;

#[cfg(test)]
mod test_utils;

pub use config::{ConfigError, EngineTables};
pub use models::{
  Aggressiveness, Equipment, ExerciseMeta, ExercisePreference, ExerciseSession, MovementPattern,
  ProgressionState, RecommendationInput, RecommendationResult, SetLoad, SetRecommendation,
  SetRecord, SetType, TemplateExerciseConfig, UserSettings,
};
pub use progression::{recommend, EngineError, ProgressionEngine};
pub use variant::{MatchStrategy, VariantKey, VariantValue};

/// Parse a JSON request and return the recommendation as JSON.
///
/// Build the engine once at startup (`ProgressionEngine::from_env()` loads
/// `.env` and the `LIFT_COACH_*` overrides) and pass it to every request.
pub fn recommend_json(engine: &ProgressionEngine, json: &str) -> Result<String, EngineError> {
  let input = RecommendationInput::from_json(json)?;
  let result = engine.recommend(&input)?;
  Ok(result.to_json())
}
