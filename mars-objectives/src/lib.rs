//! Mars Objectives Selection Engine
//!
//! Chooses the milestones and awards in play for a game session. The pool
//! grows with the enabled expansions; a synergy model keeps randomly drawn
//! boards from rewarding a single strategy twice.
//!
//! The catalog and synergy table are immutable once built. Consumers receive
//! them by reference through a [`Registry`] or a [`Selector`]; the only
//! process-wide state is the lazily built standard registry.

pub mod catalog;
pub mod config;
pub mod objective;
pub mod rng;
pub mod selector;
pub mod synergy;

use std::sync::OnceLock;

// Re-export commonly used types
pub use catalog::{
    Board, Catalog, CatalogError, CatalogPartition, EligiblePools, Expansion, PartitionId,
};
pub use config::{BASE_TARGET_COUNT, DEFAULT_MAX_ATTEMPTS, RandomizationPolicy, SelectionConfig};
pub use objective::{Award, Milestone, Objective, ObjectiveKind};
pub use rng::SelectionRng;
pub use selector::{DrawTrace, SelectionOutcome, SelectionResult, SelectionTrace, Selector};
pub use synergy::{
    LIMITED_SYNERGY, SynergyEntry, SynergyReport, SynergyRules, SynergyTable, SynergyTableError,
    UNLIMITED_SYNERGY,
};

/// Trait for abstracting where catalog and synergy data come from.
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the milestone/award catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or is malformed.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;

    /// Load the synergy table
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be loaded or is malformed.
    fn load_synergies(&self) -> Result<SynergyTable, Self::Error>;
}

/// Read-only pairing of a catalog with its synergy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    catalog: Catalog,
    synergies: SynergyTable,
}

impl Registry {
    #[must_use]
    pub const fn new(catalog: Catalog, synergies: SynergyTable) -> Self {
        Self { catalog, synergies }
    }

    /// Build a registry from a platform-specific loader.
    ///
    /// # Errors
    ///
    /// Returns the loader's error if either data set fails to load.
    pub fn load<L: DataLoader>(loader: &L) -> Result<Self, L::Error> {
        Ok(Self::new(loader.load_catalog()?, loader.load_synergies()?))
    }

    /// The built-in catalog and table, built on first use.
    #[must_use]
    pub fn standard() -> &'static Self {
        static STANDARD: OnceLock<Registry> = OnceLock::new();
        STANDARD.get_or_init(|| Self::new(Catalog::standard(), SynergyTable::standard()))
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn synergies(&self) -> &SynergyTable {
        &self.synergies
    }

    #[must_use]
    pub const fn selector(&self) -> Selector<'_> {
        Selector::new(&self.catalog, &self.synergies)
    }
}

/// Choose the milestones and awards for a session from the standard registry.
#[must_use]
pub fn choose_milestones_and_awards(config: &SelectionConfig) -> SelectionResult {
    Registry::standard().selector().select(config)
}

/// Largest pairwise synergy among `names` in the standard table.
#[must_use]
pub fn maximum_synergy<'n, I>(names: I) -> u32
where
    I: IntoIterator<Item = &'n str>,
{
    Registry::standard().synergies().maximum_synergy(names)
}

/// Check `names` against `rules` using the standard table.
#[must_use]
pub fn verify_synergy_rules<'n, I>(names: I, rules: &SynergyRules) -> bool
where
    I: IntoIterator<Item = &'n str>,
{
    Registry::standard()
        .synergies()
        .verify_synergy_rules(names, rules)
}
