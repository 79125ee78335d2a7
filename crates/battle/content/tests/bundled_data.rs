//! Loads the bundled data directory end to end and plays its scenarios.

use battle_content::{ContentFactory, validate};
use battle_core::{
    AbilityId, AbilityOracle, BattleEngine, BattleEnv, BattleEvent, BattleStatus, ChannelFlags,
    Faction, TemplateId,
};

const SCENARIOS: [&str; 2] = ["skirmish", "crypt"];
const MAX_TICKS: u64 = 20_000;

fn factory() -> ContentFactory {
    ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
}

#[test]
fn bundled_config_loads() {
    let config = factory().load_config().unwrap();
    assert_eq!(config.tick_ms, 100);
    assert_eq!(config.dying_ticks, 5);
    assert!(config.strict_content);
}

#[test]
fn bundled_content_has_no_dangling_references() {
    let tables = factory().load_content().unwrap();
    assert!(validate(&tables).is_empty());
    assert!(tables.templates().any(|t| t.id == TemplateId::new("necromancer")));

    let raise_dead = tables.ability(&AbilityId::new("raise_dead")).unwrap();
    assert_eq!(raise_dead.flags, ChannelFlags::BLOCKS_ACTIONS);
    let blizzard = tables.ability(&AbilityId::new("blizzard")).unwrap();
    assert!(blizzard.flags.contains(ChannelFlags::BLOCKS_MOVEMENT | ChannelFlags::BLOCKS_ACTIONS));
}

#[test]
fn bundled_scenarios_build() {
    let factory = factory();
    let tables = factory.load_content().unwrap();

    for name in SCENARIOS {
        let spec = factory.load_scenario(name).unwrap();
        let state = spec.build(&tables).unwrap();

        assert_eq!(state.tick, 0);
        assert!(state.living(Faction::Heroes).count() > 0, "{name}");
        assert!(state.living(Faction::Enemies).count() > 0, "{name}");
    }
}

#[test]
fn bundled_scenarios_play_to_completion() {
    let factory = factory();
    let config = factory.load_config().unwrap();
    let tables = factory.load_content().unwrap();
    let env = BattleEnv::with_content(&config, &tables);

    for name in SCENARIOS {
        let mut state = factory.load_scenario(name).unwrap().build(&tables).unwrap();
        let events = BattleEngine::new(&mut state).run(env, MAX_TICKS).unwrap();

        assert_ne!(state.status, BattleStatus::Ongoing, "{name} never finished");
        let ended = events
            .iter()
            .filter(|e| matches!(e, BattleEvent::BattleEnded { .. }))
            .count();
        assert_eq!(ended, 1, "{name}");
    }
}

#[test]
fn bundled_scenarios_replay_identically() {
    let factory = factory();
    let config = factory.load_config().unwrap();
    let tables = factory.load_content().unwrap();
    let env = BattleEnv::with_content(&config, &tables);
    let spec = factory.load_scenario("crypt").unwrap();

    let mut first = spec.build(&tables).unwrap();
    let mut second = spec.build(&tables).unwrap();
    let a = BattleEngine::new(&mut first).run(env, 600).unwrap();
    let b = BattleEngine::new(&mut second).run(env, 600).unwrap();

    assert_eq!(a, b);
    assert_eq!(first, second);
}
