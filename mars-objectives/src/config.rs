//! Per-session selection configuration.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Board, Expansion, PartitionId};

/// Objectives of each kind in play on a plain board.
pub const BASE_TARGET_COUNT: usize = 5;

/// Rejection-sampling bound used by the constrained policy unless overridden.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5_000;

/// How milestones and awards are chosen for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RandomizationPolicy {
    /// Fixed board lists plus expansion leads; no randomness.
    None,
    /// Random draw that must pass the limited synergy rules.
    #[default]
    Limited,
    /// Random draw with no synergy filtering.
    Unlimited,
}

impl RandomizationPolicy {
    pub const ALL: &'static [Self] = &[Self::None, Self::Limited, Self::Unlimited];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Limited => "limited",
            Self::Unlimited => "unlimited",
        }
    }

    #[must_use]
    pub const fn is_random(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for RandomizationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RandomizationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.key() == key)
            .ok_or_else(|| format!("unknown randomization policy: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default)]
    pub policy: RandomizationPolicy,
    #[serde(default)]
    pub board: Board,
    #[serde(default)]
    pub expansions: BTreeSet<Expansion>,
    /// Session seed; drawn from OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "SelectionConfig::default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            policy: RandomizationPolicy::default(),
            board: Board::default(),
            expansions: BTreeSet::new(),
            seed: None,
            max_attempts: Self::default_max_attempts(),
        }
    }
}

impl SelectionConfig {
    const fn default_max_attempts() -> u32 {
        DEFAULT_MAX_ATTEMPTS
    }

    /// Load a configuration from JSON; omitted fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RandomizationPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    #[must_use]
    pub fn with_expansion(mut self, expansion: Expansion) -> Self {
        self.expansions.insert(expansion);
        self
    }

    #[must_use]
    pub fn with_expansions(mut self, expansions: impl IntoIterator<Item = Expansion>) -> Self {
        self.expansions.extend(expansions);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn is_enabled(&self, expansion: Expansion) -> bool {
        self.expansions.contains(&expansion)
    }

    /// Whether objectives owned by `partition` may be in play this session.
    #[must_use]
    pub fn enables(&self, partition: PartitionId) -> bool {
        match partition {
            PartitionId::Board(board) => board.is_base() || board == self.board,
            PartitionId::Expansion(expansion) => self.is_enabled(expansion),
        }
    }

    /// Milestones (and, equally, awards) in play. Each enabled expansion adds one slot.
    #[must_use]
    pub fn target_count(&self) -> usize {
        BASE_TARGET_COUNT + self.expansions.len()
    }
}
