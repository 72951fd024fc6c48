use std::collections::HashSet;

use anyhow::{Result, bail, ensure};
use colored::Colorize;
use mars_objectives::{
    Board, Expansion, LIMITED_SYNERGY, Objective, PartitionId, RandomizationPolicy,
    SelectionConfig, SelectionOutcome,
};

use super::{Observation, ScenarioCtx};
use crate::common::board_digest;

fn expansion_subsets() -> impl Iterator<Item = Vec<Expansion>> {
    (0..1u8 << Expansion::ALL.len()).map(|mask| {
        Expansion::ALL
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1u8 << *bit) != 0)
            .map(|(_, &expansion)| expansion)
            .collect()
    })
}

fn observe(outcome: &SelectionOutcome) -> Observation {
    Observation {
        digest: board_digest(&outcome.result),
        selections: 1,
        fallbacks: usize::from(outcome.trace.fell_back()),
    }
}

fn describe(config: &SelectionConfig) -> String {
    let expansions: Vec<&str> = config.expansions.iter().map(|e| e.key()).collect();
    format!(
        "{} on {} with [{}]",
        config.policy,
        config.board.key(),
        expansions.join(",")
    )
}

/// Check the subset, size and uniqueness guarantees of one outcome.
fn check_well_formed(
    ctx: &ScenarioCtx<'_>,
    config: &SelectionConfig,
    outcome: &SelectionOutcome,
) -> Result<()> {
    let pools = ctx.registry.catalog().eligible(config);
    let target = config.target_count();
    let label = describe(config);

    let sides = [
        (
            "milestone",
            outcome.result.milestone_names(),
            pools.milestones.iter().map(Objective::name).collect::<HashSet<_>>(),
        ),
        (
            "award",
            outcome.result.award_names(),
            pools.awards.iter().map(Objective::name).collect::<HashSet<_>>(),
        ),
    ];

    for (kind, names, pool) in sides {
        let unique: HashSet<&str> = names.iter().copied().collect();
        ensure!(
            unique.len() == names.len(),
            "{label}: duplicate {kind} in {names:?}"
        );
        if let Some(stray) = names.iter().find(|n| !pool.contains(*n)) {
            bail!("{label}: {kind} {stray} is not eligible");
        }
        if config.policy.is_random() {
            let expected = target.min(pool.len());
            ensure!(
                names.len() == expected,
                "{label}: expected {expected} {kind}s, got {}",
                names.len()
            );
        } else {
            ensure!(
                !names.is_empty() && names.len() <= target,
                "{label}: fixed {kind} list has {} entries",
                names.len()
            );
        }
    }
    Ok(())
}

pub fn matrix(ctx: &ScenarioCtx<'_>, seed: u64) -> Result<Observation> {
    let selector = ctx.registry.selector();
    let mut observation = Observation::default();
    for &policy in RandomizationPolicy::ALL {
        for &board in Board::ALL {
            for expansions in expansion_subsets() {
                let mut config = ctx.base.clone().with_policy(policy).with_board(board);
                config.expansions = expansions.into_iter().collect();
                config.seed = Some(seed);
                let outcome = selector.select_traced(&config);
                check_well_formed(ctx, &config, &outcome)?;
                observation.absorb(observe(&outcome));
            }
        }
    }
    Ok(observation)
}

pub fn exclusion(ctx: &ScenarioCtx<'_>, seed: u64) -> Result<Observation> {
    let mut config = ctx
        .base
        .clone()
        .with_policy(RandomizationPolicy::Limited)
        .with_seed(seed);
    config.expansions.clear();
    if config.board == Board::ArabiaTerra {
        config.board = Board::Tharsis;
    }

    let catalog = ctx.registry.catalog();
    let excluded: HashSet<&str> = catalog.excluded_names(&config).into_iter().collect();
    let gated = [
        PartitionId::Board(Board::ArabiaTerra),
        PartitionId::Expansion(Expansion::Venus),
        PartitionId::Expansion(Expansion::Ares),
        PartitionId::Expansion(Expansion::Moon),
    ];
    for id in gated {
        if let Some(partition) = catalog.partition(id) {
            ensure!(
                partition.names().all(|n| excluded.contains(n)),
                "{id} should be excluded from {}",
                describe(&config)
            );
        }
    }

    let outcome = ctx.registry.selector().select_traced(&config);
    let leaked: Vec<&str> = outcome
        .result
        .names()
        .filter(|n| excluded.contains(n))
        .collect();
    ensure!(
        leaked.is_empty(),
        "{}: disabled objectives selected: {leaked:?}",
        describe(&config)
    );
    check_well_formed(ctx, &config, &outcome)?;
    Ok(observe(&outcome))
}

pub fn synergy(ctx: &ScenarioCtx<'_>, seed: u64) -> Result<Observation> {
    let selector = ctx.registry.selector();
    let synergies = ctx.registry.synergies();
    let mut observation = Observation::default();

    for &board in Board::ALL {
        for expansions in expansion_subsets() {
            let mut config = ctx
                .base
                .clone()
                .with_policy(RandomizationPolicy::Limited)
                .with_board(board);
            config.expansions = expansions.into_iter().collect();
            config.seed = Some(seed);
            let outcome = selector.select_traced(&config);
            check_well_formed(ctx, &config, &outcome)?;

            ensure!(
                !outcome.trace.fell_back(),
                "{}: no board passed in {} attempts (closest excess {})",
                describe(&config),
                outcome.trace.awards.attempts,
                outcome.trace.awards.report.violation(&LIMITED_SYNERGY)
            );
            if ctx.verbose {
                println!(
                    "     {} {}: accepted after {} attempt(s)",
                    "↳".dimmed(),
                    describe(&config),
                    outcome.trace.awards.attempts
                );
            }

            let report = synergies.report(outcome.result.names(), LIMITED_SYNERGY.high_threshold);
            ensure!(
                report.satisfies(&LIMITED_SYNERGY),
                "{}: accepted board breaks the limited rules ({report:?})",
                describe(&config)
            );
            ensure!(
                report == outcome.trace.awards.report,
                "{}: trace report {:?} disagrees with recomputed {report:?}",
                describe(&config),
                outcome.trace.awards.report
            );
            observation.absorb(observe(&outcome));
        }
    }
    Ok(observation)
}

pub fn determinism(ctx: &ScenarioCtx<'_>, seed: u64) -> Result<Observation> {
    let selector = ctx.registry.selector();
    let config = ctx.base.clone().with_seed(seed);

    let first = selector.select_traced(&config);
    let second = selector.select_traced(&config);
    ensure!(
        first == second,
        "{}: seed {seed} produced two different boards",
        describe(&config)
    );
    ensure!(
        first.trace.seed == Some(seed),
        "trace recorded seed {:?} instead of {seed}",
        first.trace.seed
    );
    Ok(observe(&first))
}

pub fn fixed(ctx: &ScenarioCtx<'_>, seed: u64) -> Result<Observation> {
    let selector = ctx.registry.selector();
    let catalog = ctx.registry.catalog();
    let config = ctx
        .base
        .clone()
        .with_policy(RandomizationPolicy::None)
        .with_seed(seed);

    let outcome = selector.select_traced(&config);
    let reseeded = selector.select(&config.clone().with_seed(seed.wrapping_add(1)));
    ensure!(
        outcome.result == reseeded,
        "{}: fixed board changed with the seed",
        describe(&config)
    );

    let target = config.target_count();
    let mut milestones: Vec<&str> = Vec::new();
    let mut awards: Vec<&str> = Vec::new();
    if let Some(board) = catalog.partition(PartitionId::Board(config.board)) {
        milestones.extend(board.milestones.iter().map(Objective::name));
        awards.extend(board.awards.iter().map(Objective::name));
    }
    for &expansion in &config.expansions {
        if let Some(partition) = catalog.partition(PartitionId::Expansion(expansion)) {
            milestones.extend(partition.milestones.first().map(Objective::name));
            awards.extend(partition.awards.first().map(Objective::name));
        }
    }
    milestones.truncate(target);
    awards.truncate(target);

    ensure!(
        outcome.result.milestone_names() == milestones,
        "{}: expected milestones {milestones:?}, got {:?}",
        describe(&config),
        outcome.result.milestone_names()
    );
    ensure!(
        outcome.result.award_names() == awards,
        "{}: expected awards {awards:?}, got {:?}",
        describe(&config),
        outcome.result.award_names()
    );
    Ok(observe(&outcome))
}
