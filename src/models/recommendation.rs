use serde::{Deserialize, Serialize};

use super::exercise::{ExerciseMeta, ExercisePreference, TemplateExerciseConfig};
use super::session::ExerciseSession;
use super::settings::UserSettings;
use crate::progression::EngineError;
use crate::variant::MatchStrategy;

/// Everything the engine needs for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationInput {
  pub exercise: ExerciseMeta,
  pub template_exercise: TemplateExerciseConfig,
  /// Newest first. The engine never re-sorts.
  #[serde(default)]
  pub history: Vec<ExerciseSession>,
  #[serde(default)]
  pub current_bodyweight_kg: Option<f64>,
  #[serde(default)]
  pub preferences: ExercisePreference,
  #[serde(default)]
  pub user_settings: UserSettings,
}

impl RecommendationInput {
  pub fn from_json(json: &str) -> Result<Self, EngineError> {
    serde_json::from_str(json).map_err(|e| EngineError::Parse(e.to_string()))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionState {
  FirstSession,
  Increase,
  Maintain,
  Decrease,
  Deload,
  PlateauBreak,
}

impl std::fmt::Display for ProgressionState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::FirstSession => write!(f, "first_session"),
      Self::Increase => write!(f, "increase"),
      Self::Maintain => write!(f, "maintain"),
      Self::Decrease => write!(f, "decrease"),
      Self::Deload => write!(f, "deload"),
      Self::PlateauBreak => write!(f, "plateau_break"),
    }
  }
}

impl std::str::FromStr for ProgressionState {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "first_session" => Ok(Self::FirstSession),
      "increase" => Ok(Self::Increase),
      "maintain" => Ok(Self::Maintain),
      "decrease" => Ok(Self::Decrease),
      "deload" => Ok(Self::Deload),
      "plateau_break" => Ok(Self::PlateauBreak),
      _ => Err(format!("Unknown progression state: {}", s)),
    }
  }
}

/// How a prescribed load is expressed to the lifter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "load_type", rename_all = "snake_case")]
pub enum SetLoad {
  External { external_load_kg: f64 },
  Bodyweight { bodyweight_kg: f64, added_load_kg: f64 },
}

/// One prescribed set for the next session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetRecommendation {
  #[serde(flatten)]
  pub load: SetLoad,
  pub reps_target: u32,
}

impl SetRecommendation {
  pub fn external_load_kg(&self) -> Option<f64> {
    match self.load {
      SetLoad::External { external_load_kg } => Some(external_load_kg),
      SetLoad::Bodyweight { .. } => None,
    }
  }

  pub fn added_load_kg(&self) -> Option<f64> {
    match self.load {
      SetLoad::Bodyweight { added_load_kg, .. } => Some(added_load_kg),
      SetLoad::External { .. } => None,
    }
  }

  pub fn bodyweight_kg(&self) -> Option<f64> {
    match self.load {
      SetLoad::Bodyweight { bodyweight_kg, .. } => Some(bodyweight_kg),
      SetLoad::External { .. } => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
  pub sets: Vec<SetRecommendation>,
  pub reasoning: String,
  pub progression_state: ProgressionState,
  /// Primary load for display. None for pure bodyweight exercises.
  pub suggested_load_kg: Option<f64>,
  pub suggested_reps: u32,
  /// Which variant tier supplied the history (None without history)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub match_strategy: Option<MatchStrategy>,
}

impl RecommendationResult {
  pub fn to_json(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_default()
  }
}
