use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::variant::VariantKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetType {
  #[default]
  Working,
  Warmup,
  Dropset,
  Amrap,
}

impl std::fmt::Display for SetType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Working => write!(f, "working"),
      Self::Warmup => write!(f, "warmup"),
      Self::Dropset => write!(f, "dropset"),
      Self::Amrap => write!(f, "amrap"),
    }
  }
}

impl std::str::FromStr for SetType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "working" => Ok(Self::Working),
      "warmup" => Ok(Self::Warmup),
      "dropset" => Ok(Self::Dropset),
      "amrap" => Ok(Self::Amrap),
      _ => Err(format!("Unknown set type: {}", s)),
    }
  }
}

/// One completed set from history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
  pub reps_completed: u32,
  /// Load actually moved: external load, or bodyweight + added load
  pub effective_load_kg: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub external_load_kg: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bodyweight_kg: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub added_load_kg: Option<f64>,
  #[serde(default)]
  pub set_type: SetType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rpe: Option<f64>,
}

impl SetRecord {
  /// A working set with an external load (barbell, dumbbell, machine...)
  pub fn external(load_kg: f64, reps: u32) -> Self {
    Self {
      reps_completed: reps,
      effective_load_kg: load_kg,
      external_load_kg: Some(load_kg),
      bodyweight_kg: None,
      added_load_kg: None,
      set_type: SetType::Working,
      rpe: None,
    }
  }

  /// A working set moving bodyweight plus an optional added load
  pub fn bodyweight(bodyweight_kg: f64, added_load_kg: f64, reps: u32) -> Self {
    Self {
      reps_completed: reps,
      effective_load_kg: bodyweight_kg + added_load_kg,
      external_load_kg: None,
      bodyweight_kg: Some(bodyweight_kg),
      added_load_kg: Some(added_load_kg),
      set_type: SetType::Working,
      rpe: None,
    }
  }

  pub fn with_set_type(mut self, set_type: SetType) -> Self {
    self.set_type = set_type;
    self
  }

  pub fn with_rpe(mut self, rpe: f64) -> Self {
    self.rpe = Some(rpe);
    self
  }

  pub fn is_working(&self) -> bool {
    self.set_type == SetType::Working
  }
}

/// One exercise's performance within one workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSession {
  pub session_id: String,
  pub session_date: NaiveDate,
  #[serde(default)]
  pub variant: VariantKey,
  pub sets: Vec<SetRecord>,
}

impl ExerciseSession {
  /// Only sets tagged `working` count toward progression
  pub fn working_sets(&self) -> impl Iterator<Item = &SetRecord> {
    self.sets.iter().filter(|s| s.is_working())
  }

  pub fn working_loads(&self) -> Vec<f64> {
    self.working_sets().map(|s| s.effective_load_kg).collect()
  }

  pub fn working_reps(&self) -> Vec<u32> {
    self.working_sets().map(|s| s.reps_completed).collect()
  }

  /// Mean reps across working sets (None without working sets)
  pub fn average_working_reps(&self) -> Option<f64> {
    let reps = self.working_reps();
    if reps.is_empty() {
      return None;
    }
    Some(reps.iter().map(|&r| r as f64).sum::<f64>() / reps.len() as f64)
  }
}
