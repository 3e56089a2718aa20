use std::path::PathBuf;
use std::sync::Arc;

use shadow_content::{ContentBundle, ContentFactory};
use shadow_core::{
    EnemyKind, GameEvent, InputFlags, InputSnapshot, PuzzleKind, Simulation, StateStore,
};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn shipped_data_loads() {
    let bundle = ContentBundle::load_dir(data_dir()).unwrap();
    let content = &bundle.content;

    assert_eq!(content.levels().len(), 5);
    assert!(content.items.get("fuel").is_some());
    assert_eq!(content.quests[0].id, "dungeon_clear");
    assert_eq!(content.quests[0].objectives.len(), 3);
    assert_eq!(bundle.config.economy.starting_credits, 120);

    let dungeon = content.level("DungeonScene", "lightworks").unwrap();
    assert_eq!(dungeon.id, "entrance");
    assert!(dungeon.has_puzzle(PuzzleKind::ShadowMaze));

    let arena = content.level("BossScene", "arena").unwrap();
    assert_eq!(arena.enemies[0].kind, EnemyKind::Warden);
    assert_eq!(arena.lantern_radius, Some(90.0));
}

#[test]
fn single_map_loads_by_name() {
    let factory = ContentFactory::new(data_dir());
    let district = factory.load_map("district2").unwrap();
    assert_eq!(district.puzzles[0].options.gate_x, Some(208.0));
}

#[test]
fn new_game_runs_on_shipped_data() {
    let bundle = ContentBundle::load_dir(data_dir()).unwrap();
    let mut sim = Simulation::new(bundle.config, Arc::new(bundle.content), StateStore::new());
    sim.new_game().unwrap();

    let events = sim.drain_events();
    assert!(events.contains(&GameEvent::hint("Emberwatch Plaza. Talk to the Elder.")));

    let report = sim.step(&InputSnapshot::new(InputFlags::UP), 16.0);
    assert!(report.exit.is_none());
    assert!(report.events.contains(&GameEvent::HudRefresh));
}

#[test]
fn unknown_shop_item_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for file in ["items.ron", "quests.ron", "npcs.ron", "config.toml"] {
        std::fs::copy(data_dir().join(file), dir.path().join(file)).unwrap();
    }
    std::fs::create_dir(dir.path().join("maps")).unwrap();
    std::fs::write(
        dir.path().join("dialogues.ron"),
        r#"#![enable(implicit_some)]
        {
            "elder": (start: "a", nodes: { "a": (text: "hi", responses: []) }),
            "smith": (start: "a", nodes: { "a": (text: "buy?", responses: [(text: "yes", shop: "sword", end: true)]) }),
            "scribe": (start: "a", nodes: { "a": (text: "...", responses: []) }),
            "runner": (start: "a", nodes: { "a": (text: "...", responses: []) }),
            "shadow": (start: "a", nodes: { "a": (text: "...", responses: []) }),
            "warden": (start: "a", nodes: { "a": (text: "...", responses: []) }),
        }"#,
    )
    .unwrap();

    let err = ContentBundle::load_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("unknown item 'sword'"));
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = ContentBundle::load_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("items.ron"));
}
