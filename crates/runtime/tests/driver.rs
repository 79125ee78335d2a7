//! Runtime driver tests on tokio's paused clock.

use std::time::Duration;

use battle_content::ContentFactory;
use battle_core::{
    Arena, AttackProc, BattleContext, BattleState, BattleStatus, CombatStats, ContentError,
    ContentTables, EngineConfig, EngineError, Participant, StatusId,
};
use battle_runtime::{Runtime, RuntimeConfig, RuntimeError, RuntimeEvent, StopReason};
use tokio::time::Instant;

fn bundled() -> (EngineConfig, ContentTables, BattleState) {
    let factory = ContentFactory::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../battle/content/data"
    ));
    let config = factory.load_config().unwrap();
    let content = factory.load_content().unwrap();
    let state = factory.load_scenario("skirmish").unwrap().build(&content).unwrap();
    (config, content, state)
}

fn runtime_config(engine: EngineConfig, max_ticks: Option<u64>) -> RuntimeConfig {
    RuntimeConfig {
        engine,
        max_ticks,
        ..RuntimeConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn plays_a_scenario_to_the_end() {
    let (engine, content, state) = bundled();

    let summary = Runtime::builder()
        .config(runtime_config(engine, Some(20_000)))
        .initial_state(state)
        .content(content)
        .build()
        .unwrap()
        .wait()
        .await
        .unwrap();

    assert_eq!(summary.reason, StopReason::Finished);
    assert_ne!(summary.status, BattleStatus::Ongoing);
    assert_eq!(summary.elapsed_ms, summary.tick * 100);
}

#[tokio::test(start_paused = true)]
async fn stops_at_the_tick_limit() {
    let (engine, content, state) = bundled();

    let summary = Runtime::builder()
        .config(runtime_config(engine, Some(25)))
        .initial_state(state)
        .content(content)
        .build()
        .unwrap()
        .wait()
        .await
        .unwrap();

    assert_eq!(summary.reason, StopReason::TickLimit);
    assert_eq!(summary.status, BattleStatus::Ongoing);
    assert_eq!(summary.tick, 25);
    assert_eq!(summary.elapsed_ms, 2_500);
}

#[tokio::test(start_paused = true)]
async fn ticks_are_paced_by_the_wall_clock() {
    let (engine, content, state) = bundled();
    let start = Instant::now();

    Runtime::builder()
        .config(runtime_config(engine.clone(), Some(10)))
        .initial_state(state.clone())
        .content(content.clone())
        .build()
        .unwrap()
        .wait()
        .await
        .unwrap();
    let real_time = start.elapsed();
    assert!(real_time >= Duration::from_millis(900), "{real_time:?}");
    assert!(real_time < Duration::from_millis(1_000), "{real_time:?}");

    let start = Instant::now();
    let fast = RuntimeConfig {
        time_scale: 10.0,
        ..runtime_config(engine, Some(10))
    };
    Runtime::builder()
        .config(fast)
        .initial_state(state)
        .content(content)
        .build()
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert!(start.elapsed() < Duration::from_millis(100), "{:?}", start.elapsed());
}

#[tokio::test(start_paused = true)]
async fn broadcasts_every_tick_in_order() {
    let (engine, content, state) = bundled();

    let runtime = Runtime::builder()
        .config(runtime_config(engine, Some(30)))
        .initial_state(state)
        .content(content)
        .build()
        .unwrap();
    let mut events = runtime.subscribe_events();
    runtime.wait().await.unwrap();

    assert!(matches!(
        events.recv().await.unwrap(),
        RuntimeEvent::Started { participants: 6, tick_ms: 100 }
    ));
    for expected in 1..=30 {
        match events.recv().await.unwrap() {
            RuntimeEvent::Tick(report) => assert_eq!(report.tick, expected),
            other => panic!("expected tick {expected}, got {other:?}"),
        }
    }
    match events.recv().await.unwrap() {
        RuntimeEvent::Finished(summary) => assert_eq!(summary.reason, StopReason::TickLimit),
        other => panic!("expected summary, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn pause_holds_the_battle_clock() {
    let (engine, content, state) = bundled();

    let runtime = Runtime::builder()
        .config(runtime_config(engine, None))
        .initial_state(state)
        .content(content)
        .start_paused(true)
        .build()
        .unwrap();
    let handle = runtime.handle();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.query_state().await.unwrap().tick, 0);

    assert_eq!(handle.set_paused(false).await.unwrap(), 0);
    tokio::time::sleep(Duration::from_secs(1)).await;
    let resumed_at = handle.set_paused(true).await.unwrap();
    assert!(resumed_at >= 9, "{resumed_at}");

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.query_state().await.unwrap().tick, resumed_at);

    let summary = runtime.shutdown().await.unwrap();
    assert_eq!(summary.reason, StopReason::Stopped);
    assert_eq!(summary.tick, resumed_at);
}

#[tokio::test(start_paused = true)]
async fn failed_tick_is_rolled_back_and_reported() {
    let stats = CombatStats {
        max_hp: 100.0,
        damage: 5.0,
        attack_speed: 1.0,
        attack_range: 30.0,
        movement_speed: 50.0,
        ..CombatStats::default()
    };
    let mut cursed = Participant::hero("cursed", stats).at(100.0, 100.0);
    cursed.on_attack_procs.push(AttackProc {
        chance: 1.0,
        status: StatusId::new("missing"),
    });
    let mut state = BattleState::new(Arena::default(), BattleContext::default(), 9);
    state.add_participant(cursed);
    state.add_participant(Participant::enemy("target", stats).at(120.0, 100.0));

    let runtime = Runtime::builder()
        .config(runtime_config(EngineConfig::default().with_strict_content(true), None))
        .initial_state(state)
        .build()
        .unwrap();
    let mut events = runtime.subscribe_events();

    let err = runtime.wait().await.unwrap_err();
    match err {
        RuntimeError::Engine { tick, source } => {
            assert_eq!(tick, 2);
            assert_eq!(
                source,
                EngineError::Content(ContentError::UnknownStatus(StatusId::new("missing")))
            );
        }
        other => panic!("unexpected error: {other}"),
    }

    let mut failed = None;
    while let Ok(event) = events.recv().await {
        if let RuntimeEvent::Failed { tick, .. } = event {
            failed = Some(tick);
        }
    }
    assert_eq!(failed, Some(2));
}
