//! Pairwise synergy between objectives and the rules that bound it.
//!
//! Higher synergy means two objectives reward the same strategy, so a board
//! containing both hands an easy double payout to whoever plays that way.
//! The table is symmetric and sparse: pairs without an entry score 0.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use thiserror::Error;

/// Thresholds a set of objectives must respect to count as balanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SynergyRules {
    /// Pairs at or above this weight count as "high".
    pub high_threshold: u32,
    pub max_synergy_allowed: u32,
    pub number_of_high_allowed: u32,
    pub total_synergy_allowed: u32,
}

/// Rules applied by the constrained randomization policy.
///
/// Recorded games replay against these values; changing them changes which
/// boards a seed produces.
pub const LIMITED_SYNERGY: SynergyRules = SynergyRules {
    high_threshold: 4,
    max_synergy_allowed: 5,
    number_of_high_allowed: 2,
    total_synergy_allowed: 15,
};

/// Rules that accept every set.
pub const UNLIMITED_SYNERGY: SynergyRules = SynergyRules {
    high_threshold: u32::MAX,
    max_synergy_allowed: u32::MAX,
    number_of_high_allowed: u32::MAX,
    total_synergy_allowed: u32::MAX,
};

/// One table row: an unordered pair and its weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynergyEntry {
    pub a: String,
    pub b: String,
    pub weight: u32,
}

#[derive(Debug, Error)]
pub enum SynergyTableError {
    #[error("objective {0:?} cannot have synergy with itself")]
    SelfPair(String),
    #[error("synergy between {a:?} and {b:?} declared as both {first} and {second}")]
    ConflictingWeight {
        a: String,
        b: String,
        first: u32,
        second: u32,
    },
    #[error("synergy table JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Aggregate synergy over every unordered pair of a name set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SynergyReport {
    pub total: u32,
    pub high_pairs: u32,
    pub max: u32,
}

impl SynergyReport {
    #[must_use]
    pub const fn satisfies(&self, rules: &SynergyRules) -> bool {
        self.total <= rules.total_synergy_allowed
            && self.high_pairs <= rules.number_of_high_allowed
            && self.max <= rules.max_synergy_allowed
    }

    /// Combined excess over each ceiling; 0 exactly when the rules hold.
    #[must_use]
    pub const fn violation(&self, rules: &SynergyRules) -> u32 {
        self.total
            .saturating_sub(rules.total_synergy_allowed)
            .saturating_add(self.high_pairs.saturating_sub(rules.number_of_high_allowed))
            .saturating_add(self.max.saturating_sub(rules.max_synergy_allowed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SynergyTable {
    weights: HashMap<String, HashMap<String, u32>>,
    entries: usize,
}

impl SynergyTable {
    /// Build a table, rejecting self-pairs and pairs declared with two weights.
    ///
    /// # Errors
    ///
    /// Returns an error on the first malformed entry.
    pub fn from_entries<I>(entries: I) -> Result<Self, SynergyTableError>
    where
        I: IntoIterator<Item = SynergyEntry>,
    {
        let mut table = Self::default();
        for entry in entries {
            table.insert(entry)?;
        }
        Ok(table)
    }

    /// Load `[{"a": .., "b": .., "weight": ..}, ..]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or an entry is malformed.
    pub fn from_json(json: &str) -> Result<Self, SynergyTableError> {
        let entries: Vec<SynergyEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    fn insert(&mut self, entry: SynergyEntry) -> Result<(), SynergyTableError> {
        let SynergyEntry { a, b, weight } = entry;
        if a == b {
            return Err(SynergyTableError::SelfPair(a));
        }
        if let Some(&first) = self.weights.get(&a).and_then(|row| row.get(&b)) {
            if first == weight {
                return Ok(());
            }
            return Err(SynergyTableError::ConflictingWeight {
                a,
                b,
                first,
                second: weight,
            });
        }
        self.weights
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), weight);
        self.weights.entry(b).or_default().insert(a, weight);
        self.entries += 1;
        Ok(())
    }

    /// Built-in weights for the standard catalog.
    #[must_use]
    pub fn standard() -> Self {
        const STANDARD: &[(&str, &str, u32)] = &[
            // Tharsis
            ("Gardener", "Landlord", 6),
            ("Mayor", "Landlord", 5),
            ("Mayor", "Gardener", 3),
            ("Terraformer", "Thermalist", 3),
            ("Builder", "Miner", 2),
            ("Banker", "Thermalist", 1),
            ("Planner", "Scientist", 1),
            // Elysium
            ("Desert Settler", "Estate Dealer", 5),
            ("Specialist", "Industrialist", 4),
            ("Generalist", "Industrialist", 2),
            ("Tycoon", "Celebrity", 1),
            ("Legend", "Celebrity", 1),
            // Hellas
            ("Polar Explorer", "Cultivator", 3),
            ("Rim Settler", "Space Baron", 3),
            ("Diversifier", "Excentric", 2),
            ("Tactician", "Contractor", 2),
            ("Energizer", "Magnate", 1),
            // Expansions
            ("Hoverlord", "Venuphile", 5),
            ("Networker", "Entrepreneur", 8),
            ("One Giant Step", "Full Moon", 8),
            ("Lunarchitect", "Lunar Magnate", 8),
            ("One Giant Step", "Lunarchitect", 5),
            ("Full Moon", "Lunar Magnate", 5),
            ("One Giant Step", "Lunar Magnate", 3),
            ("Lunarchitect", "Full Moon", 3),
            // Across boards
            ("Terraformer", "Benefactor", 9),
            ("Gardener", "Cultivator", 9),
            ("Builder", "Contractor", 9),
            ("Tycoon", "Magnate", 7),
            ("Landlord", "Cultivator", 6),
            ("Landlord", "Estate Dealer", 5),
            ("Specialist", "Energizer", 5),
            ("Energizer", "Industrialist", 5),
            ("Miner", "Industrialist", 5),
            ("Diversifier", "Generalist", 5),
            ("Botanist", "Gardener", 5),
            ("Botanist", "Cultivator", 5),
            ("Gardener", "Estate Dealer", 4),
            ("Gardener", "Desert Settler", 4),
            ("Banker", "Specialist", 4),
            ("Energizer", "Thermalist", 4),
            ("Ecologist", "Excentric", 4),
            ("Entrepreneur", "Landlord", 4),
            ("Land Specialist", "Landlord", 4),
            ("Manufacturer", "Builder", 4),
            ("Mayor", "Desert Settler", 3),
            ("Mayor", "Estate Dealer", 3),
            ("Polar Explorer", "Landlord", 3),
            ("Polar Explorer", "Gardener", 3),
            ("Builder", "Tycoon", 3),
            ("Builder", "Magnate", 3),
            ("Ecologist", "Diversifier", 3),
            ("Hoverlord", "Excentric", 3),
            ("Networker", "Landlord", 3),
            ("Cosmic Settler", "Mayor", 3),
            ("Coordinator", "Legend", 3),
            ("Zoologist", "Ecologist", 3),
            ("Economizer", "Banker", 3),
            ("Space Baron", "Celebrity", 2),
            ("Venuphile", "Excentric", 2),
            ("Miner", "Contractor", 2),
            ("Tactician", "Scientist", 2),
            ("Terran", "Space Baron", 2),
            ("Pioneer", "Mayor", 2),
            ("Martian", "Scientist", 1),
        ];

        Self::from_entries(STANDARD.iter().map(|&(a, b, weight)| SynergyEntry {
            a: a.to_string(),
            b: b.to_string(),
            weight,
        }))
        .unwrap_or_default()
    }

    /// Number of distinct pairs with an entry.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Symmetric lookup; absent pairs score 0.
    #[must_use]
    pub fn synergy_of(&self, a: &str, b: &str) -> u32 {
        self.weights
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .unwrap_or(0)
    }

    /// Aggregate synergy of a name set. Repeated names are counted once.
    #[must_use]
    pub fn report<'n, I>(&self, names: I, high_threshold: u32) -> SynergyReport
    where
        I: IntoIterator<Item = &'n str>,
    {
        let mut unique: SmallVec<[&str; 16]> = SmallVec::new();
        for name in names {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }

        let mut report = SynergyReport::default();
        for (i, a) in unique.iter().enumerate() {
            for b in &unique[i + 1..] {
                let synergy = self.synergy_of(a, b);
                report.total = report.total.saturating_add(synergy);
                report.max = report.max.max(synergy);
                if synergy >= high_threshold {
                    report.high_pairs += 1;
                }
            }
        }
        report
    }

    /// Largest pairwise synergy in the set, or 0 for fewer than two names.
    #[must_use]
    pub fn maximum_synergy<'n, I>(&self, names: I) -> u32
    where
        I: IntoIterator<Item = &'n str>,
    {
        self.report(names, u32::MAX).max
    }

    /// Whether total, high-pair count and maximum all stay within `rules`.
    #[must_use]
    pub fn verify_synergy_rules<'n, I>(&self, names: I, rules: &SynergyRules) -> bool
    where
        I: IntoIterator<Item = &'n str>,
    {
        self.report(names, rules.high_threshold).satisfies(rules)
    }
}
