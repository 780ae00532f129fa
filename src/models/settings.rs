use serde::{Deserialize, Serialize};

/// How hard the engine pushes when deciding load changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Aggressiveness {
  Conservative,
  #[default]
  Moderate,
  Aggressive,
}

impl Aggressiveness {
  pub const ALL: [Aggressiveness; 3] = [Self::Conservative, Self::Moderate, Self::Aggressive];

  pub fn level(&self) -> u8 {
    match self {
      Self::Conservative => 1,
      Self::Moderate => 2,
      Self::Aggressive => 3,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Conservative => "Conservative",
      Self::Moderate => "Moderate",
      Self::Aggressive => "Aggressive",
    }
  }
}

impl TryFrom<u8> for Aggressiveness {
  type Error = String;
  fn try_from(level: u8) -> Result<Self, Self::Error> {
    match level {
      1 => Ok(Self::Conservative),
      2 => Ok(Self::Moderate),
      3 => Ok(Self::Aggressive),
      _ => Err(format!("Aggressiveness must be 1-3, got {}", level)),
    }
  }
}

impl From<Aggressiveness> for u8 {
  fn from(value: Aggressiveness) -> Self {
    value.level()
  }
}

/// Progression policy for a user. Missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
  pub aggressiveness: Aggressiveness,
  /// Identical sessions in a row before a plateau break
  pub plateau_threshold: u32,
  pub auto_deload_enabled: bool,
  /// Fraction of load removed on deload (0.10 = 10%)
  pub deload_scale_pct: f64,
}

impl Default for UserSettings {
  fn default() -> Self {
    Self {
      aggressiveness: Aggressiveness::Moderate,
      plateau_threshold: 3,
      auto_deload_enabled: true,
      deload_scale_pct: 0.10,
    }
  }
}
