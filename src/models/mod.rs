pub mod exercise;
pub mod recommendation;
pub mod session;
pub mod settings;

pub use exercise::{Equipment, ExerciseMeta, ExercisePreference, MovementPattern, TemplateExerciseConfig};
pub use recommendation::{
  ProgressionState, RecommendationInput, RecommendationResult, SetLoad, SetRecommendation,
};
pub use session::{ExerciseSession, SetRecord, SetType};
pub use settings::{Aggressiveness, UserSettings};
