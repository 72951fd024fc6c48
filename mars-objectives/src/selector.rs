//! Milestone and award selection under the three randomization policies.
//!
//! Each attempt samples milestones and awards together and checks the whole
//! board at once, so under the limited policy an accepted board respects the
//! synergy rules (and therefore so does each half of it).
use log::{debug, info, warn};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, EligiblePools};
use crate::config::{RandomizationPolicy, SelectionConfig};
use crate::objective::{Award, Milestone, Objective, ObjectiveKind};
use crate::rng::SelectionRng;
use crate::synergy::{LIMITED_SYNERGY, SynergyReport, SynergyRules, SynergyTable};

/// Objectives in play for one session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionResult {
    pub milestones: Vec<Milestone>,
    pub awards: Vec<Award>,
}

impl SelectionResult {
    #[must_use]
    pub fn milestone_names(&self) -> Vec<&str> {
        crate::objective::names(&self.milestones)
    }

    #[must_use]
    pub fn award_names(&self) -> Vec<&str> {
        crate::objective::names(&self.awards)
    }

    /// Milestone names followed by award names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.milestones
            .iter()
            .map(Objective::name)
            .chain(self.awards.iter().map(Objective::name))
    }
}

/// How one half of the board was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrawTrace {
    /// Candidates drawn; 0 for the fixed policy.
    pub attempts: u32,
    /// The attempt bound ran out and the least-violating candidate was kept.
    pub fell_back: bool,
    /// The pool was smaller than the target count.
    pub degraded: bool,
    /// Synergy of the milestones alone, or of the whole board for awards.
    pub report: SynergyReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionTrace {
    pub seed: Option<u64>,
    pub policy: RandomizationPolicy,
    pub target_count: usize,
    pub milestones: DrawTrace,
    pub awards: DrawTrace,
}

impl SelectionTrace {
    #[must_use]
    pub const fn fell_back(&self) -> bool {
        self.milestones.fell_back || self.awards.fell_back
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOutcome {
    pub result: SelectionResult,
    pub trace: SelectionTrace,
}

struct Draw<T> {
    picked: Vec<T>,
    trace: DrawTrace,
}

/// Chooses milestones and awards from an injected catalog and synergy table.
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a> {
    catalog: &'a Catalog,
    synergies: &'a SynergyTable,
    rules: SynergyRules,
}

impl<'a> Selector<'a> {
    /// Selector applying [`LIMITED_SYNERGY`] for the limited policy.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, synergies: &'a SynergyTable) -> Self {
        Self {
            catalog,
            synergies,
            rules: LIMITED_SYNERGY,
        }
    }

    /// Override the rules used by the limited policy.
    #[must_use]
    pub const fn with_rules(mut self, rules: SynergyRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub const fn rules(&self) -> &SynergyRules {
        &self.rules
    }

    #[must_use]
    pub fn select(&self, config: &SelectionConfig) -> SelectionResult {
        self.select_traced(config).result
    }

    /// Select using per-kind streams derived from `config.seed` (or fresh entropy).
    #[must_use]
    pub fn select_traced(&self, config: &SelectionConfig) -> SelectionOutcome {
        let rng = SelectionRng::from_optional_seed(config.seed);
        let mut outcome = {
            let mut milestone_rng = rng.stream(ObjectiveKind::Milestone);
            let mut award_rng = rng.stream(ObjectiveKind::Award);
            self.run(config, &mut *milestone_rng, &mut *award_rng)
        };
        outcome.trace.seed = Some(rng.seed());
        outcome
    }

    /// Select with both kinds seeded from a caller-supplied random source.
    ///
    /// `config.seed` is ignored and the trace carries no seed.
    #[must_use]
    pub fn select_with_rng<R>(&self, config: &SelectionConfig, rng: &mut R) -> SelectionOutcome
    where
        R: Rng + ?Sized,
    {
        let mut milestone_rng = ChaCha8Rng::seed_from_u64(rng.r#gen());
        let mut award_rng = ChaCha8Rng::seed_from_u64(rng.r#gen());
        self.run(config, &mut milestone_rng, &mut award_rng)
    }

    fn run<M, A>(
        &self,
        config: &SelectionConfig,
        milestone_rng: &mut M,
        award_rng: &mut A,
    ) -> SelectionOutcome
    where
        M: Rng + ?Sized,
        A: Rng + ?Sized,
    {
        let target = config.target_count();
        let (milestones, awards) = match config.policy {
            RandomizationPolicy::None => {
                let fixed = self.catalog.fixed(config);
                self.fixed_draws(fixed, target)
            }
            RandomizationPolicy::Limited | RandomizationPolicy::Unlimited => {
                let pools = self.catalog.eligible(config);
                self.random_draws(&pools, target, config, milestone_rng, award_rng)
            }
        };

        SelectionOutcome {
            result: SelectionResult {
                milestones: milestones.picked,
                awards: awards.picked,
            },
            trace: SelectionTrace {
                seed: None,
                policy: config.policy,
                target_count: target,
                milestones: milestones.trace,
                awards: awards.trace,
            },
        }
    }

    fn fixed_draws(&self, fixed: EligiblePools, target: usize) -> (Draw<Milestone>, Draw<Award>) {
        let EligiblePools {
            mut milestones,
            mut awards,
        } = fixed;
        milestones.truncate(target);
        awards.truncate(target);

        let milestone_report = self
            .synergies
            .report(milestones.iter().map(Objective::name), self.rules.high_threshold);
        let board_report = self.synergies.report(
            milestones
                .iter()
                .map(Objective::name)
                .chain(awards.iter().map(Objective::name)),
            self.rules.high_threshold,
        );

        let milestones = fixed_draw(milestones, target, milestone_report);
        let awards = fixed_draw(awards, target, board_report);
        (milestones, awards)
    }

    fn random_draws<M, A>(
        &self,
        pools: &EligiblePools,
        target: usize,
        config: &SelectionConfig,
        milestone_rng: &mut M,
        award_rng: &mut A,
    ) -> (Draw<Milestone>, Draw<Award>)
    where
        M: Rng + ?Sized,
        A: Rng + ?Sized,
    {
        let EligiblePools { milestones, awards } = pools;
        let milestone_amount = drawable::<Milestone>(milestones.len(), target);
        let award_amount = drawable::<Award>(awards.len(), target);

        let mut sample = || {
            (
                index::sample(&mut *milestone_rng, milestones.len(), milestone_amount).into_vec(),
                index::sample(&mut *award_rng, awards.len(), award_amount).into_vec(),
            )
        };
        let board_report = |m: &[usize], a: &[usize]| {
            self.synergies.report(
                m.iter()
                    .map(|&i| milestones[i].name())
                    .chain(a.iter().map(|&i| awards[i].name())),
                self.rules.high_threshold,
            )
        };

        let rules = match config.policy {
            RandomizationPolicy::Limited => Some(self.rules),
            RandomizationPolicy::None | RandomizationPolicy::Unlimited => None,
        };
        let Some(rules) = rules else {
            let (m, a) = sample();
            let report = board_report(&m, &a);
            return self.random_board(pools, &m, &a, target, 1, false, report);
        };

        // Every draw of two whole pools is the same board.
        let max_attempts = if milestone_amount == milestones.len() && award_amount == awards.len()
        {
            1
        } else {
            config.max_attempts.max(1)
        };

        let mut best: Option<(u32, Vec<usize>, Vec<usize>, SynergyReport)> = None;
        for attempt in 1..=max_attempts {
            let (m, a) = sample();
            let report = board_report(&m, &a);
            if report.satisfies(&rules) {
                debug!("board accepted after {attempt} attempt(s)");
                return self.random_board(pools, &m, &a, target, attempt, false, report);
            }
            let violation = report.violation(&rules);
            if best.as_ref().is_none_or(|(least, ..)| violation < *least) {
                best = Some((violation, m, a, report));
            }
        }

        let (violation, m, a, report) = best.unwrap_or_default();
        warn!(
            "no board satisfied the synergy rules in {max_attempts} attempts; keeping the closest (excess {violation})"
        );
        self.random_board(pools, &m, &a, target, max_attempts, true, report)
    }

    #[allow(clippy::too_many_arguments)]
    fn random_board(
        &self,
        pools: &EligiblePools,
        milestone_indices: &[usize],
        award_indices: &[usize],
        target: usize,
        attempts: u32,
        fell_back: bool,
        board_report: SynergyReport,
    ) -> (Draw<Milestone>, Draw<Award>) {
        let milestones = pick(&pools.milestones, milestone_indices);
        let awards = pick(&pools.awards, award_indices);
        let milestone_report = self
            .synergies
            .report(milestones.iter().map(Objective::name), self.rules.high_threshold);
        let trace = |picked: usize, report| DrawTrace {
            attempts,
            fell_back,
            degraded: picked < target,
            report,
        };
        (
            Draw {
                trace: trace(milestones.len(), milestone_report),
                picked: milestones,
            },
            Draw {
                trace: trace(awards.len(), board_report),
                picked: awards,
            },
        )
    }
}

/// Objectives of kind `T` that can be drawn from a pool of `pool_len`.
fn drawable<T: Objective>(pool_len: usize, target: usize) -> usize {
    if pool_len < target {
        info!(
            "{} pool holds {pool_len} of {target} requested; selecting all of it",
            T::KIND
        );
    }
    target.min(pool_len)
}

fn pick<T: Clone>(pool: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| pool[i].clone()).collect()
}

fn fixed_draw<T: Objective>(picked: Vec<T>, target: usize, report: SynergyReport) -> Draw<T> {
    let degraded = picked.len() < target;
    if degraded {
        info!(
            "fixed {} list holds {} of {target} requested",
            T::KIND,
            picked.len()
        );
    }
    Draw {
        picked,
        trace: DrawTrace {
            attempts: 0,
            fell_back: false,
            degraded,
            report,
        },
    }
}
