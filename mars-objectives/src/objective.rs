//! Named objectives: milestones claimed during play and awards funded for end-game scoring.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which output bucket an objective belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    Milestone,
    Award,
}

impl ObjectiveKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Milestone => "milestone",
            Self::Award => "award",
        }
    }
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Anything identified by a stable, unique name.
///
/// Synergy lookups and membership checks only ever look at the name, so the
/// evaluator and selector are written against this trait rather than the
/// concrete variants.
pub trait Objective: Clone {
    const KIND: ObjectiveKind;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
}

impl Milestone {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Objective for Milestone {
    const KIND: ObjectiveKind = ObjectiveKind::Milestone;

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Award {
    pub name: String,
}

impl Award {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Objective for Award {
    const KIND: ObjectiveKind = ObjectiveKind::Award;

    fn name(&self) -> &str {
        &self.name
    }
}

/// Collect the names of a slice of objectives, preserving order.
#[must_use]
pub fn names<T: Objective>(objectives: &[T]) -> Vec<&str> {
    objectives.iter().map(Objective::name).collect()
}
