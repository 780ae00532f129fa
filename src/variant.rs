//! Variant matching for exercise history
//!
//! Different variants of the same lift (flat vs 45° incline bench, wide vs
//! close grip) have different strength curves and must not be blended.
//! History is narrowed in three tiers:
//! - exact: every target modifier present with an identical value
//! - partial: numeric modifiers within a tolerance, the rest identical
//! - any: nothing matched, fall back to the whole history

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::ExerciseSession;

/// Default numeric tolerance for partial matches (degrees for incline_deg)
pub const DEFAULT_PARTIAL_TOLERANCE: f64 = 10.0;

// ---------------------------------------------------------------------------
/// Variant Value: one modifier setting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantValue {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl VariantValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for VariantValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for VariantValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for VariantValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for VariantValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for VariantValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

// ---------------------------------------------------------------------------
/// Variant Key: open modifier map (incline_deg, grip, stance, ...)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantKey(BTreeMap<String, VariantValue>);

impl VariantKey {
    pub const INCLINE_DEG: &'static str = "incline_deg";
    pub const GRIP: &'static str = "grip";
    pub const STANCE: &'static str = "stance";

    /// The plain, modifier-free variant
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<VariantValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&VariantValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VariantValue)> {
        self.0.iter()
    }

    pub fn incline_deg(&self) -> Option<f64> {
        self.get(Self::INCLINE_DEG).and_then(VariantValue::as_number)
    }

    pub fn grip(&self) -> Option<&str> {
        self.get(Self::GRIP).and_then(VariantValue::as_text)
    }

    pub fn stance(&self) -> Option<&str> {
        self.get(Self::STANCE).and_then(VariantValue::as_text)
    }
}

// ---------------------------------------------------------------------------
/// Match Strategy: which tier produced the history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    Partial,
    Any,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Partial => write!(f, "partial"),
            Self::Any => write!(f, "any"),
        }
    }
}

/// Sessions selected for comparison, still newest-first
#[derive(Debug, Clone)]
pub struct VariantMatch<'a> {
    pub sessions: Vec<&'a ExerciseSession>,
    pub strategy: MatchStrategy,
}

// ---------------------------------------------------------------------------
/// Matching
// ---------------------------------------------------------------------------

/// Exact match. A plain target only matches plain sessions.
pub fn matches_exact(session: &VariantKey, target: &VariantKey) -> bool {
    if target.is_empty() {
        return session.is_empty();
    }
    target
        .iter()
        .all(|(key, value)| session.get(key) == Some(value))
}

/// Partial match: numeric modifiers may differ by up to `tolerance`.
/// A plain target matches everything.
pub fn matches_partial(session: &VariantKey, target: &VariantKey, tolerance: f64) -> bool {
    if target.is_empty() {
        return true;
    }
    target
        .iter()
        .all(|(key, target_val)| match (session.get(key), target_val) {
            (Some(VariantValue::Number(s)), VariantValue::Number(t)) => (s - t).abs() <= tolerance,
            (Some(session_val), _) => session_val == target_val,
            (None, _) => false,
        })
}

/// Three-tier history selection: exact, then partial, then everything.
pub fn filter_by_variant<'a>(
    sessions: &'a [ExerciseSession],
    target: &VariantKey,
) -> VariantMatch<'a> {
    let exact: Vec<_> = sessions
        .iter()
        .filter(|s| matches_exact(&s.variant, target))
        .collect();
    if !exact.is_empty() {
        return VariantMatch {
            sessions: exact,
            strategy: MatchStrategy::Exact,
        };
    }

    let partial: Vec<_> = sessions
        .iter()
        .filter(|s| matches_partial(&s.variant, target, DEFAULT_PARTIAL_TOLERANCE))
        .collect();
    if !partial.is_empty() {
        return VariantMatch {
            sessions: partial,
            strategy: MatchStrategy::Partial,
        };
    }

    VariantMatch {
        sessions: sessions.iter().collect(),
        strategy: MatchStrategy::Any,
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
