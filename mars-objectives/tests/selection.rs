use std::collections::HashSet;
use std::hash::Hasher;

use mars_objectives::{
    Board, Catalog, Expansion, LIMITED_SYNERGY, Objective, RandomizationPolicy, Registry,
    SelectionConfig, SelectionOutcome, Selector, SynergyEntry, SynergyRules, SynergyTable,
    choose_milestones_and_awards, verify_synergy_rules,
};
use twox_hash::XxHash64;

fn expansion_subsets() -> Vec<Vec<Expansion>> {
    (0..1u8 << Expansion::ALL.len())
        .map(|mask| {
            Expansion::ALL
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1u8 << *bit) != 0)
                .map(|(_, &expansion)| expansion)
                .collect()
        })
        .collect()
}

fn every_config() -> Vec<SelectionConfig> {
    let mut configs = Vec::new();
    for &policy in RandomizationPolicy::ALL {
        for &board in Board::ALL {
            for expansions in expansion_subsets() {
                configs.push(
                    SelectionConfig::default()
                        .with_policy(policy)
                        .with_board(board)
                        .with_expansions(expansions),
                );
            }
        }
    }
    configs
}

fn assert_well_formed(catalog: &Catalog, config: &SelectionConfig, outcome: &SelectionOutcome) {
    let pools = catalog.eligible(config);
    let target = config.target_count();
    let result = &outcome.result;

    let milestone_pool: HashSet<&str> = pools.milestones.iter().map(Objective::name).collect();
    let award_pool: HashSet<&str> = pools.awards.iter().map(Objective::name).collect();
    let milestones: HashSet<&str> = result.milestones.iter().map(Objective::name).collect();
    let awards: HashSet<&str> = result.awards.iter().map(Objective::name).collect();

    assert_eq!(milestones.len(), result.milestones.len(), "duplicate milestone");
    assert_eq!(awards.len(), result.awards.len(), "duplicate award");
    assert!(milestones.is_subset(&milestone_pool), "{config:?}");
    assert!(awards.is_subset(&award_pool), "{config:?}");

    if config.policy.is_random() {
        assert_eq!(milestones.len(), target.min(milestone_pool.len()));
        assert_eq!(awards.len(), target.min(award_pool.len()));
    } else {
        assert!(milestones.len() <= target && awards.len() <= target);
    }
}

#[test]
fn entry_point_completes_for_every_combination() {
    for config in every_config() {
        let result = choose_milestones_and_awards(&config);
        assert!(!result.milestones.is_empty(), "{config:?}");
        assert!(!result.awards.is_empty(), "{config:?}");
    }
}

#[test]
fn results_are_drawn_from_the_eligible_pools() {
    let registry = Registry::standard();
    let selector = registry.selector();
    for (i, config) in every_config().into_iter().enumerate() {
        let config = config.with_seed(i as u64);
        let outcome = selector.select_traced(&config);
        assert_well_formed(registry.catalog(), &config, &outcome);
        assert_eq!(outcome.trace.seed, Some(i as u64));
        assert_eq!(outcome.trace.target_count, config.target_count());
    }
}

#[test]
fn disabled_content_never_appears() {
    let registry = Registry::standard();
    let selector = registry.selector();
    let configs = [
        SelectionConfig::default(),
        SelectionConfig::default()
            .with_policy(RandomizationPolicy::Unlimited)
            .with_board(Board::Hellas)
            .with_expansion(Expansion::Ares),
    ];

    for config in configs {
        let excluded: HashSet<&str> = registry
            .catalog()
            .excluded_names(&config)
            .into_iter()
            .collect();
        assert!(excluded.contains("Hoverlord"));
        assert!(excluded.contains("Economizer"));

        for seed in 0..10_000u64 {
            let result = selector.select(&config.clone().with_seed(seed));
            let leaked: Vec<&str> = result.names().filter(|n| excluded.contains(n)).collect();
            assert!(leaked.is_empty(), "seed {seed} leaked {leaked:?}");
        }
    }
}

#[test]
fn limited_boards_pass_with_any_expansions() {
    let registry = Registry::standard();
    let selector = registry.selector();
    for &board in Board::ALL {
        for expansions in expansion_subsets() {
            for seed in 0..100u64 {
                let config = SelectionConfig::default()
                    .with_policy(RandomizationPolicy::Limited)
                    .with_board(board)
                    .with_expansions(expansions.clone())
                    .with_seed(seed);
                let outcome = selector.select_traced(&config);
                assert!(
                    !outcome.trace.fell_back(),
                    "seed {seed} on {board:?} with {expansions:?} fell back"
                );
                assert!(
                    verify_synergy_rules(outcome.result.names(), &LIMITED_SYNERGY),
                    "seed {seed} on {board:?} with {expansions:?}"
                );
                assert!(verify_synergy_rules(
                    outcome.result.milestone_names(),
                    &LIMITED_SYNERGY
                ));
                assert!(verify_synergy_rules(
                    outcome.result.award_names(),
                    &LIMITED_SYNERGY
                ));
            }
        }
    }
}

#[test]
fn fallback_still_fills_every_slot() {
    let catalog = Catalog::standard();
    let names: Vec<&str> = catalog.partitions().iter().flat_map(|p| p.names()).collect();
    let dense = SynergyTable::from_entries(names.iter().enumerate().flat_map(|(i, a)| {
        names[i + 1..].iter().map(move |b| SynergyEntry {
            a: (*a).to_string(),
            b: (*b).to_string(),
            weight: 1,
        })
    }))
    .unwrap();
    let strict = SynergyRules {
        high_threshold: 1,
        max_synergy_allowed: 0,
        number_of_high_allowed: 0,
        total_synergy_allowed: 0,
    };
    let config = SelectionConfig::default()
        .with_expansions(Expansion::ALL.iter().copied())
        .with_max_attempts(3)
        .with_seed(17);

    let outcome = Selector::new(&catalog, &dense)
        .with_rules(strict)
        .select_traced(&config);
    assert_well_formed(&catalog, &config, &outcome);
    assert_eq!(outcome.result.milestones.len(), 8);
    assert_eq!(outcome.result.awards.len(), 8);
    assert!(outcome.trace.milestones.fell_back);
    assert!(outcome.trace.awards.fell_back);
    assert_eq!(outcome.trace.milestones.attempts, 3);
    assert_eq!(outcome.trace.milestones.report.total, 28);
}

#[test]
fn replaying_a_seed_reproduces_the_board() {
    let selector = Registry::standard().selector();
    let config = SelectionConfig::default()
        .with_board(Board::ArabiaTerra)
        .with_expansion(Expansion::Venus)
        .with_seed(0x00C0_FFEE);

    let first = selector.select_traced(&config);
    let second = selector.select_traced(&config);
    assert_eq!(first, second);
    assert_eq!(digest(&first), digest(&second));

    let other = selector.select_traced(&config.clone().with_seed(0x00C0_FFEF));
    assert_eq!(other.trace.seed, Some(0x00C0_FFEF));
}

#[test]
fn unseeded_sessions_record_their_seed() {
    let selector = Registry::standard().selector();
    let config = SelectionConfig::default().with_policy(RandomizationPolicy::Unlimited);
    let outcome = selector.select_traced(&config);
    let seed = outcome.trace.seed.unwrap();
    let replay = selector.select_traced(&config.with_seed(seed));
    assert_eq!(outcome.result, replay.result);
}

#[test]
fn fixed_policy_ignores_randomness() {
    let config = SelectionConfig::default()
        .with_policy(RandomizationPolicy::None)
        .with_expansions([Expansion::Ares, Expansion::Moon]);
    let first = choose_milestones_and_awards(&config);
    let second = choose_milestones_and_awards(&config.with_seed(1));
    assert_eq!(first, second);
    assert_eq!(
        first.milestone_names(),
        vec![
            "Terraformer",
            "Mayor",
            "Gardener",
            "Builder",
            "Planner",
            "Networker",
            "One Giant Step"
        ]
    );
    assert_eq!(
        first.award_names(),
        vec![
            "Landlord",
            "Banker",
            "Scientist",
            "Thermalist",
            "Miner",
            "Entrepreneur",
            "Lunar Magnate"
        ]
    );
}

#[test]
fn json_data_drives_selection() {
    let catalog = Catalog::from_json(
        r#"{"partitions":[
            {"id":{"board":"tharsis"},"milestones":[{"name":"Red"}],"awards":[{"name":"Dust"}]},
            {"id":{"board":"elysium"},"milestones":[{"name":"Crater"}],"awards":[{"name":"Ridge"}]},
            {"id":{"board":"hellas"},"milestones":[{"name":"Basin"}],"awards":[{"name":"Pole"}]}
        ]}"#,
    )
    .unwrap();
    let synergies = SynergyTable::from_json(r#"[{"a":"Red","b":"Ridge","weight":9}]"#).unwrap();
    let registry = Registry::new(catalog, synergies);

    let outcome = registry
        .selector()
        .select_traced(&SelectionConfig::default().with_seed(4));
    assert_eq!(outcome.result.milestones.len(), 3);
    assert_eq!(outcome.result.awards.len(), 3);
    assert!(outcome.trace.milestones.degraded);
    assert!(outcome.trace.awards.fell_back);
    assert_eq!(outcome.trace.awards.report.max, 9);
}

fn digest(outcome: &SelectionOutcome) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    for name in outcome.result.names() {
        hasher.write(name.as_bytes());
        hasher.write_u8(0);
    }
    hasher.finish()
}
