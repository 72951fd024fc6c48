use anyhow::Result;
use mars_objectives::{Registry, SelectionConfig};

pub mod checks;

/// What every scenario check has access to.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioCtx<'a> {
    pub registry: &'a Registry,
    /// Configuration loaded from `--config`; scenarios override the fields they vary.
    pub base: &'a SelectionConfig,
    pub verbose: bool,
}

/// Facts gathered by one passing iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Observation {
    /// Combined fingerprint of every board the iteration selected.
    pub digest: u64,
    pub selections: usize,
    pub fallbacks: usize,
}

impl Observation {
    pub fn absorb(&mut self, other: Self) {
        self.digest = self.digest.rotate_left(5) ^ other.digest;
        self.selections += other.selections;
        self.fallbacks += other.fallbacks;
    }
}

pub type ScenarioCheck = fn(&ScenarioCtx<'_>, u64) -> Result<Observation>;

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub check: ScenarioCheck,
}

impl TestScenario {
    #[must_use]
    pub const fn new(key: &'static str, name: &'static str, check: ScenarioCheck) -> Self {
        Self { key, name, check }
    }

    /// Run one iteration against `seed`.
    ///
    /// # Errors
    ///
    /// Returns the first expectation the selection broke.
    pub fn run(&self, ctx: &ScenarioCtx<'_>, seed: u64) -> Result<Observation> {
        (self.check)(ctx, seed)
    }
}

const SCENARIOS: &[TestScenario] = &[
    TestScenario::new("matrix", "Policy and Expansion Matrix", checks::matrix),
    TestScenario::new("exclusion", "Disabled Content Exclusion", checks::exclusion),
    TestScenario::new("synergy", "Limited Synergy Compliance", checks::synergy),
    TestScenario::new("determinism", "Seed Determinism", checks::determinism),
    TestScenario::new("fixed", "Fixed Board Selection", checks::fixed),
];

pub fn get_scenario(name: &str) -> Option<&'static TestScenario> {
    let key = name.trim().to_lowercase();
    let key = match key.as_str() {
        "policies" | "combinations" => "matrix",
        "expansions" | "disabled" => "exclusion",
        "limited" | "rules" => "synergy",
        "deterministic" | "replay" => "determinism",
        "none" | "default" => "fixed",
        other => other,
    };
    SCENARIOS.iter().find(|scenario| scenario.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.key, s.name)).collect()
}

/// Expand `all` into every scenario key, keeping explicit names in order.
pub fn expand_scenarios(names: Vec<String>) -> Vec<String> {
    let mut expanded = Vec::with_capacity(names.len());
    for name in names {
        if name.eq_ignore_ascii_case("all") {
            expanded.extend(SCENARIOS.iter().map(|s| s.key.to_string()));
        } else {
            expanded.push(name);
        }
    }
    let mut seen = std::collections::HashSet::new();
    expanded.retain(|name| seen.insert(name.to_lowercase()));
    expanded
}
