//! Session tests against the shipped content.

use std::sync::Arc;

use shadow_core::{GameEvent, InputFlags, InputSnapshot, KeyValueStore, MemoryStorage, SAVE_KEY};
use shadow_runtime::{RuntimeConfig, RuntimeError, Session, Topic};

const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../game/content/data");
const FRAME_MS: f32 = 16.0;

fn session_with(config: RuntimeConfig) -> Session {
    Session::builder()
        .config(config)
        .content_dir(DATA_DIR)
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn new_game_publishes_enter_hint() {
    let mut session = session_with(RuntimeConfig::default());
    let mut hud = session.subscribe(Topic::Hud);

    session.new_game().unwrap();

    let first = hud.try_recv().unwrap();
    assert_eq!(
        first.payload,
        GameEvent::hint("Emberwatch Plaza. Talk to the Elder.")
    );
    assert_eq!(first.frame, 0);
    assert_eq!(hud.try_recv().unwrap().payload, GameEvent::HudRefresh);
    assert_eq!(session.simulation().store().credits(), 120);
}

#[test]
fn save_survives_a_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = RuntimeConfig {
        storage_dir: Some(dir.path().to_path_buf()),
        ..RuntimeConfig::default()
    };

    let mut first = session_with(config.clone());
    first.new_game().unwrap();
    first.simulation_mut().store_mut().set_credits(42);
    first.save().unwrap();
    assert!(dir.path().join(format!("{SAVE_KEY}.json")).exists());

    let mut second = session_with(config);
    assert!(second.load().unwrap());
    assert_eq!(second.simulation().store().credits(), 42);
    assert_eq!(
        second.simulation().level().map(|level| level.id.as_str()),
        Some("town")
    );
}

#[test]
fn load_without_save_reports_nothing() {
    let storage = Arc::new(MemoryStorage::new());
    let mut session = Session::builder()
        .content_dir(DATA_DIR)
        .unwrap()
        .storage(storage.clone())
        .build()
        .unwrap();

    assert!(!session.load().unwrap());

    session.new_game().unwrap();
    session.save().unwrap();
    assert!(storage.get_item(SAVE_KEY).unwrap().is_some());
}

#[test]
fn walking_into_an_exit_enters_the_target_level() {
    let mut session = session_with(RuntimeConfig::default());
    let mut world = session.subscribe(Topic::World);
    session.new_game().unwrap();

    let down = InputSnapshot::new(InputFlags::DOWN);
    let mut followed = None;
    for _ in 0..200 {
        let report = session.tick(&down, FRAME_MS).unwrap();
        if report.exit.is_some() {
            followed = report.exit;
            break;
        }
    }

    let exit = followed.expect("player never reached the dungeon exit");
    assert_eq!(exit.id, "to_dungeon");
    let location = session.simulation().store().location().clone();
    assert_eq!(location.scene, "DungeonScene");
    assert_eq!(location.entry, "entrance");

    let event = world.try_recv().unwrap();
    assert!(matches!(
        event.payload,
        GameEvent::ExitReached { ref exit, .. } if exit == "to_dungeon"
    ));
    assert_eq!(event.frame + 1, session.frame());
}

#[test]
fn exits_are_left_to_the_caller_when_not_followed() {
    let config = RuntimeConfig {
        follow_exits: false,
        ..RuntimeConfig::default()
    };
    let mut session = session_with(config);
    session.new_game().unwrap();

    let down = InputSnapshot::new(InputFlags::DOWN);
    let mut reached = false;
    for _ in 0..200 {
        if session.tick(&down, FRAME_MS).unwrap().exit.is_some() {
            reached = true;
            break;
        }
    }

    assert!(reached);
    assert_eq!(
        session.simulation().store().location().scene,
        "OverworldScene"
    );
}

#[test]
fn build_requires_content() {
    let err = Session::builder().build().unwrap_err();
    assert!(matches!(err, RuntimeError::MissingContent));
}

#[test]
fn bad_content_dir_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let Err(err) = Session::builder().content_dir(dir.path()) else {
        panic!("empty directory accepted as content");
    };
    match err {
        RuntimeError::ContentLoad { path, reason } => {
            assert_eq!(path, dir.path());
            assert!(reason.contains("items.ron"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
