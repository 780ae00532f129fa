//! Engine tables: load increments, starting loads, decrease percentages
//!
//! Defaults are built in. Any entry can be overridden from the environment
//! (or a `.env` file) with `LIFT_COACH_*` variables.

use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

use crate::models::{Aggressiveness, Equipment, MovementPattern};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const ENV_PREFIX: &str = "LIFT_COACH";

/// Increment when nothing more specific applies
pub const FALLBACK_INCREMENT_KG: f64 = 1.25;
/// Commercial gym dumbbells usually jump in 2 kg steps
pub const DUMBBELL_INCREMENT_KG: f64 = 2.0;
/// Used when a level has no entry in the decrease table
pub const DEFAULT_DECREASE_PCT: f64 = 0.0375;
/// Added loads on bodyweight movements snap to this
pub const BODYWEIGHT_ADDED_LOAD_INCREMENT_KG: f64 = 1.25;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ConfigError {
  #[error("Invalid configuration value for {key}: {value:?}")]
  Invalid { key: String, value: String },
}

/// ---------------------------------------------------------------------------
/// Engine Tables
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct EngineTables {
  pub fallback_increment_kg: f64,
  pub dumbbell_increment_kg: f64,
  pub increments_kg: HashMap<MovementPattern, f64>,
  pub starting_loads_kg: HashMap<Equipment, f64>,
  pub decrease_pct: HashMap<Aggressiveness, f64>,
  pub default_decrease_pct: f64,
}

impl Default for EngineTables {
  fn default() -> Self {
    let increments_kg = HashMap::from([
      (MovementPattern::Squat, 2.5),
      (MovementPattern::Hinge, 2.5),
      (MovementPattern::PushHorizontal, 2.5),
      (MovementPattern::PushVertical, 1.25),
      (MovementPattern::PullHorizontal, 2.5),
      (MovementPattern::PullVertical, 2.5),
      (MovementPattern::Carry, 2.5),
      (MovementPattern::Core, 1.0),
      (MovementPattern::Isolation, 1.0),
    ]);

    let starting_loads_kg = HashMap::from([
      (Equipment::Barbell, 20.0), // empty bar
      (Equipment::Dumbbell, 5.0),
      (Equipment::Bodyweight, 0.0),
      (Equipment::Cable, 5.0),
      (Equipment::Machine, 10.0),
      (Equipment::Kettlebell, 8.0),
      (Equipment::Band, 0.0),
      (Equipment::Other, 0.0),
    ]);

    let decrease_pct = HashMap::from([
      (Aggressiveness::Conservative, 0.05),
      (Aggressiveness::Moderate, 0.0375),
      (Aggressiveness::Aggressive, 0.025),
    ]);

    Self {
      fallback_increment_kg: FALLBACK_INCREMENT_KG,
      dumbbell_increment_kg: DUMBBELL_INCREMENT_KG,
      increments_kg,
      starting_loads_kg,
      decrease_pct,
      default_decrease_pct: DEFAULT_DECREASE_PCT,
    }
  }
}

impl EngineTables {
  /// Built-in tables with `LIFT_COACH_*` overrides from the environment.
  /// A `.env` file in the working directory is loaded first if present.
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Built-in tables with overrides from an arbitrary key lookup
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut tables = Self::default();

    if let Some(v) = read_kg(&lookup, &format!("{}_FALLBACK_INCREMENT_KG", ENV_PREFIX))? {
      tables.fallback_increment_kg = v;
    }
    if let Some(v) = read_kg(&lookup, &format!("{}_DUMBBELL_INCREMENT_KG", ENV_PREFIX))? {
      tables.dumbbell_increment_kg = v;
    }
    for pattern in MovementPattern::ALL {
      let key = format!("{}_INCREMENT_{}_KG", ENV_PREFIX, pattern.as_str().to_uppercase());
      if let Some(v) = read_kg(&lookup, &key)? {
        tables.increments_kg.insert(pattern, v);
      }
    }
    for equipment in Equipment::ALL {
      let key = format!("{}_STARTING_LOAD_{}_KG", ENV_PREFIX, equipment.as_str().to_uppercase());
      if let Some(v) = read_kg(&lookup, &key)? {
        tables.starting_loads_kg.insert(equipment, v);
      }
    }
    for level in Aggressiveness::ALL {
      let key = format!("{}_DECREASE_PCT_{}", ENV_PREFIX, level.level());
      if let Some(v) = read_fraction(&lookup, &key)? {
        tables.decrease_pct.insert(level, v);
      }
    }
    if let Some(v) = read_fraction(&lookup, &format!("{}_DEFAULT_DECREASE_PCT", ENV_PREFIX))? {
      tables.default_decrease_pct = v;
    }

    Ok(tables)
  }

  /// Default increment for a movement pattern (dumbbell handling lives in the engine)
  pub fn increment_for(&self, pattern: MovementPattern) -> f64 {
    self
      .increments_kg
      .get(&pattern)
      .copied()
      .unwrap_or(self.fallback_increment_kg)
  }

  pub fn starting_load_for(&self, equipment: Equipment) -> f64 {
    self.starting_loads_kg.get(&equipment).copied().unwrap_or(0.0)
  }

  pub fn decrease_pct_for(&self, aggressiveness: Aggressiveness) -> f64 {
    self
      .decrease_pct
      .get(&aggressiveness)
      .copied()
      .unwrap_or(self.default_decrease_pct)
  }
}

fn read_raw<F>(lookup: &F, key: &str) -> Result<Option<(String, f64)>, ConfigError>
where
  F: Fn(&str) -> Option<String>,
{
  let Some(raw) = lookup(key) else {
    return Ok(None);
  };
  let parsed: f64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
    key: key.to_string(),
    value: raw.clone(),
  })?;
  Ok(Some((raw, parsed)))
}

/// Non-negative, finite kilogram value
fn read_kg<F>(lookup: &F, key: &str) -> Result<Option<f64>, ConfigError>
where
  F: Fn(&str) -> Option<String>,
{
  match read_raw(lookup, key)? {
    Some((_, v)) if v.is_finite() && v >= 0.0 => {
      tracing::debug!(key, value = v, "engine table override");
      Ok(Some(v))
    }
    Some((raw, _)) => Err(ConfigError::Invalid {
      key: key.to_string(),
      value: raw,
    }),
    None => Ok(None),
  }
}

/// Fraction in [0, 1)
fn read_fraction<F>(lookup: &F, key: &str) -> Result<Option<f64>, ConfigError>
where
  F: Fn(&str) -> Option<String>,
{
  match read_raw(lookup, key)? {
    Some((_, v)) if (0.0..1.0).contains(&v) => {
      tracing::debug!(key, value = v, "engine table override");
      Ok(Some(v))
    }
    Some((raw, _)) => Err(ConfigError::Invalid {
      key: key.to_string(),
      value: raw,
    }),
    None => Ok(None),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  fn test_default_tables() {
    let tables = EngineTables::default();
    assert_eq!(tables.increment_for(MovementPattern::Squat), 2.5);
    assert_eq!(tables.increment_for(MovementPattern::PushVertical), 1.25);
    assert_eq!(tables.increment_for(MovementPattern::Isolation), 1.0);
    assert_eq!(tables.increment_for(MovementPattern::Other), 1.25);
    assert_eq!(tables.starting_load_for(Equipment::Barbell), 20.0);
    assert_eq!(tables.starting_load_for(Equipment::Kettlebell), 8.0);
    assert_eq!(tables.decrease_pct_for(Aggressiveness::Conservative), 0.05);
    assert_eq!(tables.decrease_pct_for(Aggressiveness::Aggressive), 0.025);
  }

  #[test]
  fn test_missing_decrease_entry_uses_default() {
    let mut tables = EngineTables::default();
    tables.decrease_pct.remove(&Aggressiveness::Aggressive);
    assert_eq!(tables.decrease_pct_for(Aggressiveness::Aggressive), 0.0375);
  }

  #[test]
  fn test_from_lookup_overrides() {
    let vars = HashMap::from([
      ("LIFT_COACH_DUMBBELL_INCREMENT_KG", "2.5"),
      ("LIFT_COACH_INCREMENT_PUSH_VERTICAL_KG", "2.5"),
      ("LIFT_COACH_INCREMENT_OTHER_KG", "0.5"),
      ("LIFT_COACH_STARTING_LOAD_BARBELL_KG", "15"),
      ("LIFT_COACH_DECREASE_PCT_1", "0.1"),
    ]);

    let tables = EngineTables::from_lookup(|k| vars.get(k).map(|v| v.to_string()))
      .expect("overrides should parse");

    assert_eq!(tables.dumbbell_increment_kg, 2.5);
    assert_eq!(tables.increment_for(MovementPattern::PushVertical), 2.5);
    assert_eq!(tables.increment_for(MovementPattern::Other), 0.5);
    assert_eq!(tables.starting_load_for(Equipment::Barbell), 15.0);
    assert_eq!(tables.decrease_pct_for(Aggressiveness::Conservative), 0.1);
    // Untouched entries keep their defaults
    assert_eq!(tables.increment_for(MovementPattern::Squat), 2.5);
  }

  #[test]
  fn test_from_lookup_rejects_garbage() {
    let result = EngineTables::from_lookup(|k| {
      (k == "LIFT_COACH_FALLBACK_INCREMENT_KG").then(|| "heavy".to_string())
    });
    match result {
      Err(ConfigError::Invalid { key, value }) => {
        assert_eq!(key, "LIFT_COACH_FALLBACK_INCREMENT_KG");
        assert_eq!(value, "heavy");
      }
      other => panic!("expected invalid config, got {:?}", other),
    }
  }

  #[test]
  fn test_from_lookup_rejects_out_of_range() {
    assert!(EngineTables::from_lookup(|k| {
      (k == "LIFT_COACH_DECREASE_PCT_2").then(|| "1.5".to_string())
    })
    .is_err());
    assert!(EngineTables::from_lookup(|k| {
      (k == "LIFT_COACH_STARTING_LOAD_MACHINE_KG").then(|| "-10".to_string())
    })
    .is_err());
    assert!(EngineTables::from_lookup(|k| {
      (k == "LIFT_COACH_DUMBBELL_INCREMENT_KG").then(|| "inf".to_string())
    })
    .is_err());
  }

  #[test]
  #[serial]
  fn test_from_env_reads_process_environment() {
    temp_env::with_vars(
      [
        ("LIFT_COACH_FALLBACK_INCREMENT_KG", Some("0.5")),
        ("LIFT_COACH_DEFAULT_DECREASE_PCT", Some("0.04")),
      ],
      || {
        let tables = EngineTables::from_env().expect("env overrides should parse");
        assert_eq!(tables.fallback_increment_kg, 0.5);
        assert_eq!(tables.default_decrease_pct, 0.04);
      },
    );
  }

  #[test]
  #[serial]
  fn test_from_env_without_overrides_is_default() {
    temp_env::with_vars_unset(
      [
        "LIFT_COACH_FALLBACK_INCREMENT_KG",
        "LIFT_COACH_DEFAULT_DECREASE_PCT",
        "LIFT_COACH_DUMBBELL_INCREMENT_KG",
      ],
      || {
        let tables = EngineTables::from_env().expect("defaults should load");
        assert_eq!(tables.fallback_increment_kg, FALLBACK_INCREMENT_KG);
        assert_eq!(tables.dumbbell_increment_kg, DUMBBELL_INCREMENT_KG);
      },
    );
  }

  #[test]
  #[serial]
  fn test_from_env_invalid_value() {
    temp_env::with_var("LIFT_COACH_DUMBBELL_INCREMENT_KG", Some("two"), || {
      assert!(EngineTables::from_env().is_err());
    });
  }
}
