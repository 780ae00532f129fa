use serde::{Deserialize, Serialize};

use crate::variant::VariantKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
  Barbell,
  Dumbbell,
  Bodyweight,
  Cable,
  Machine,
  Kettlebell,
  Band,
  Other,
}

impl Equipment {
  pub const ALL: [Equipment; 8] = [
    Self::Barbell,
    Self::Dumbbell,
    Self::Bodyweight,
    Self::Cable,
    Self::Machine,
    Self::Kettlebell,
    Self::Band,
    Self::Other,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Barbell => "barbell",
      Self::Dumbbell => "dumbbell",
      Self::Bodyweight => "bodyweight",
      Self::Cable => "cable",
      Self::Machine => "machine",
      Self::Kettlebell => "kettlebell",
      Self::Band => "band",
      Self::Other => "other",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
  Squat,
  Hinge,
  PushHorizontal,
  PushVertical,
  PullHorizontal,
  PullVertical,
  Carry,
  Core,
  Isolation,
  /// Anything without a default increment (uses the fallback)
  Other,
}

impl MovementPattern {
  pub const ALL: [MovementPattern; 10] = [
    Self::Squat,
    Self::Hinge,
    Self::PushHorizontal,
    Self::PushVertical,
    Self::PullHorizontal,
    Self::PullVertical,
    Self::Carry,
    Self::Core,
    Self::Isolation,
    Self::Other,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Squat => "squat",
      Self::Hinge => "hinge",
      Self::PushHorizontal => "push_horizontal",
      Self::PushVertical => "push_vertical",
      Self::PullHorizontal => "pull_horizontal",
      Self::PullVertical => "pull_vertical",
      Self::Carry => "carry",
      Self::Core => "core",
      Self::Isolation => "isolation",
      Self::Other => "other",
    }
  }
}

/// Static exercise attributes relevant to progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseMeta {
  pub id: String,
  pub supports_bodyweight: bool,
  pub equipment: Equipment,
  pub movement_pattern: MovementPattern,
}

impl ExerciseMeta {
  /// Bodyweight-capable and performed with no equipment (pull-ups, dips...)
  pub fn is_pure_bodyweight(&self) -> bool {
    self.supports_bodyweight && self.equipment == Equipment::Bodyweight
  }
}

/// Prescription source from the workout template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateExerciseConfig {
  pub target_sets: u32,
  pub min_reps: u32,
  pub max_reps: u32,
  #[serde(default)]
  pub variant: VariantKey,
}

/// Per-exercise overrides; any `Some` wins over the derived default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExercisePreference {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub load_increment_kg: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_reps_override: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_reps_override: Option<u32>,
}
