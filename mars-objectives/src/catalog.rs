//! Static milestone/award catalogs partitioned by board and expansion.
//!
//! A [`Catalog`] is built once at process start and handed to consumers by
//! reference. It never changes afterwards; the selector only copies
//! references out of it into per-call working pools.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::config::SelectionConfig;
use crate::objective::{Award, Milestone, Objective};

/// Map a session is played on.
///
/// Tharsis, Elysium and Hellas together make up the base partition, which is
/// always eligible. Arabia Terra objectives are only in play on Arabia Terra.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Board {
    #[default]
    Tharsis,
    Elysium,
    Hellas,
    ArabiaTerra,
}

impl Board {
    pub const ALL: &'static [Self] = &[
        Self::Tharsis,
        Self::Elysium,
        Self::Hellas,
        Self::ArabiaTerra,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Tharsis => "tharsis",
            Self::Elysium => "elysium",
            Self::Hellas => "hellas",
            Self::ArabiaTerra => "arabia_terra",
        }
    }

    /// Whether this board's objectives belong to the always-eligible base partition.
    #[must_use]
    pub const fn is_base(self) -> bool {
        !matches!(self, Self::ArabiaTerra)
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.key() == key)
    }
}

/// Optional rules module contributing its own objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expansion {
    Venus,
    Ares,
    Moon,
}

impl Expansion {
    pub const ALL: &'static [Self] = &[Self::Venus, Self::Ares, Self::Moon];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Venus => "venus",
            Self::Ares => "ares",
            Self::Moon => "moon",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.key() == key)
    }
}

/// Owner of a catalog partition. Ordering is the declared pool order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionId {
    Board(Board),
    Expansion(Expansion),
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board(board) => write!(f, "board:{}", board.key()),
            Self::Expansion(expansion) => write!(f, "expansion:{}", expansion.key()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPartition {
    pub id: PartitionId,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub awards: Vec<Award>,
}

impl CatalogPartition {
    #[must_use]
    pub fn new(id: PartitionId, milestones: &[&str], awards: &[&str]) -> Self {
        Self {
            id,
            milestones: milestones.iter().copied().map(Milestone::new).collect(),
            awards: awards.iter().copied().map(Award::new).collect(),
        }
    }

    /// Milestone names followed by award names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.milestones
            .iter()
            .map(Objective::name)
            .chain(self.awards.iter().map(Objective::name))
    }
}

/// Errors raised when a catalog violates its structural invariants.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("objective {name:?} appears in both {first} and {second}")]
    DuplicateName {
        name: String,
        first: PartitionId,
        second: PartitionId,
    },
    #[error("partition {0} is declared more than once")]
    DuplicatePartition(PartitionId),
    #[error("base board {} needs at least one milestone and one award", .0.key())]
    EmptyBaseBoard(Board),
    #[error("catalog JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Milestones and awards eligible for one session, in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EligiblePools {
    pub milestones: Vec<Milestone>,
    pub awards: Vec<Award>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    partitions: Vec<CatalogPartition>,
}

#[derive(Deserialize)]
struct CatalogFile {
    partitions: Vec<CatalogPartition>,
}

impl Catalog {
    /// Build a catalog, checking name uniqueness and base board coverage.
    ///
    /// # Errors
    ///
    /// Returns an error if a name appears twice, a partition is declared
    /// twice, or a base board lacks milestones or awards.
    pub fn from_partitions(mut partitions: Vec<CatalogPartition>) -> Result<Self, CatalogError> {
        partitions.sort_by_key(|p| p.id);
        for pair in partitions.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(CatalogError::DuplicatePartition(pair[0].id));
            }
        }

        let mut owners: HashMap<&str, PartitionId> = HashMap::new();
        for partition in &partitions {
            for name in partition.names() {
                if let Some(first) = owners.insert(name, partition.id) {
                    return Err(CatalogError::DuplicateName {
                        name: name.to_string(),
                        first,
                        second: partition.id,
                    });
                }
            }
        }

        for &board in Board::ALL.iter().filter(|b| b.is_base()) {
            let covered = partitions.iter().any(|p| {
                p.id == PartitionId::Board(board) && !p.milestones.is_empty() && !p.awards.is_empty()
            });
            if !covered {
                return Err(CatalogError::EmptyBaseBoard(board));
            }
        }

        Ok(Self { partitions })
    }

    /// Load a catalog from JSON of the form `{"partitions": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the catalog is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_partitions(file.partitions)
    }

    /// The built-in catalog shipped with the engine.
    #[must_use]
    pub fn standard() -> Self {
        const STANDARD: &[(PartitionId, &[&str], &[&str])] = &[
            (
                PartitionId::Board(Board::Tharsis),
                &["Terraformer", "Mayor", "Gardener", "Builder", "Planner"],
                &["Landlord", "Banker", "Scientist", "Thermalist", "Miner"],
            ),
            (
                PartitionId::Board(Board::Elysium),
                &["Generalist", "Specialist", "Ecologist", "Tycoon", "Legend"],
                &[
                    "Celebrity",
                    "Industrialist",
                    "Desert Settler",
                    "Estate Dealer",
                    "Benefactor",
                ],
            ),
            (
                PartitionId::Board(Board::Hellas),
                &["Diversifier", "Tactician", "Polar Explorer", "Energizer", "Rim Settler"],
                &["Cultivator", "Magnate", "Space Baron", "Excentric", "Contractor"],
            ),
            (
                PartitionId::Board(Board::ArabiaTerra),
                &["Economizer", "Pioneer", "Land Specialist", "Martian", "Terran"],
                &[
                    "Cosmic Settler",
                    "Botanist",
                    "Coordinator",
                    "Zoologist",
                    "Manufacturer",
                ],
            ),
            (
                PartitionId::Expansion(Expansion::Venus),
                &["Hoverlord"],
                &["Venuphile"],
            ),
            (
                PartitionId::Expansion(Expansion::Ares),
                &["Networker"],
                &["Entrepreneur"],
            ),
            (
                PartitionId::Expansion(Expansion::Moon),
                &["One Giant Step", "Lunarchitect"],
                &["Lunar Magnate", "Full Moon"],
            ),
        ];

        Self {
            partitions: STANDARD
                .iter()
                .map(|&(id, milestones, awards)| CatalogPartition::new(id, milestones, awards))
                .collect(),
        }
    }

    #[must_use]
    pub fn partitions(&self) -> &[CatalogPartition] {
        &self.partitions
    }

    #[must_use]
    pub fn partition(&self, id: PartitionId) -> Option<&CatalogPartition> {
        self.partitions.iter().find(|p| p.id == id)
    }

    /// Every objective a session may draw from, in declared partition order.
    ///
    /// Objectives of a disabled expansion (or of Arabia Terra on another
    /// board) never make it into the pools.
    #[must_use]
    pub fn eligible(&self, config: &SelectionConfig) -> EligiblePools {
        let mut pools = EligiblePools::default();
        for partition in self.partitions.iter().filter(|p| config.enables(p.id)) {
            pools.milestones.extend(partition.milestones.iter().cloned());
            pools.awards.extend(partition.awards.iter().cloned());
        }
        pools
    }

    /// The deterministic board used when randomization is off: the session
    /// board's canonical lists followed by the lead milestone and lead award
    /// of each enabled expansion.
    #[must_use]
    pub fn fixed(&self, config: &SelectionConfig) -> EligiblePools {
        let mut pools = EligiblePools::default();
        if let Some(board) = self.partition(PartitionId::Board(config.board)) {
            pools.milestones.extend(board.milestones.iter().cloned());
            pools.awards.extend(board.awards.iter().cloned());
        }
        for partition in self
            .partitions
            .iter()
            .filter(|p| matches!(p.id, PartitionId::Expansion(_)) && config.enables(p.id))
        {
            pools.milestones.extend(partition.milestones.first().cloned());
            pools.awards.extend(partition.awards.first().cloned());
        }
        pools
    }

    /// Names owned by partitions that the given configuration leaves out.
    #[must_use]
    pub fn excluded_names(&self, config: &SelectionConfig) -> Vec<&str> {
        self.partitions
            .iter()
            .filter(|p| !config.enables(p.id))
            .flat_map(CatalogPartition::names)
            .collect()
    }
}
