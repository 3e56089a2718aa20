//! Interaction, body swapping and dialogue side effects.
use crate::actor::BodyKind;
use crate::common::Vec2;
use crate::dialogue::DialogueResponse;
use crate::economy::{PurchaseError, ShopItem};
use crate::event::GameEvent;
use crate::state::StatKey;

use super::Simulation;

impl Simulation {
    fn controlled_position(&self) -> Vec2 {
        match self.controlling {
            BodyKind::Player => self.player.position,
            BodyKind::Shadow => self.shadow.position,
        }
    }

    /// Talks to the closest NPC in reach. With nobody in reach, offers fuel
    /// at the level's shrine and turns its lamps.
    pub(super) fn interact(&mut self) {
        let Some(level) = &self.level else {
            return;
        };
        let origin = self.controlled_position();
        let reach = self.config.interaction.npc_radius;
        let nearest = level
            .descriptor
            .npcs
            .iter()
            .map(|npc| (npc, npc.position().distance(origin)))
            .filter(|(_, distance)| *distance < reach)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(npc, _)| npc);

        if let Some(spawn) = nearest {
            let Some(npc) = self.content.npc(&spawn.id) else {
                tracing::warn!(npc = %spawn.id, "npc spawn has no registry entry");
                return;
            };
            tracing::debug!(npc = %npc.id, dialog = %npc.dialog, "starting dialogue");
            if self.dialogue.start(&npc.dialog).is_none() {
                tracing::warn!(npc = %npc.id, dialog = %npc.dialog, "dialogue could not start");
            }
            return;
        }

        if self.puzzles.has_shrine() && self.store.stat(StatKey::LanternFuel) > 0.0 {
            self.debt
                .appease(&mut self.store, self.config.debt.shrine_appease);
            self.events.push(GameEvent::hint("Debt lowered at shrine."));
            self.events.push(GameEvent::HudRefresh);
        }
        if self.puzzles.rotate_lamps(&mut self.light) {
            self.events.push(GameEvent::hint("The lamp turns."));
        }
    }

    /// Hands control to the other body if the swap cooldown has elapsed.
    /// Entering a shadow that stands in bright light burns it.
    pub(super) fn try_swap(&mut self, shadow_light: f32) {
        if !self.shadow.can_swap() {
            return;
        }
        self.controlling = self.controlling.other();
        let to_shadow = self.controlling == BodyKind::Shadow;
        self.player.set_controlled(!to_shadow);
        self.shadow.set_controlled(to_shadow);
        self.shadow.mark_swapped();
        tracing::debug!(controlling = %self.controlling, "swapped bodies");

        if to_shadow && self.shadow.apply_swap_burn(shadow_light, &mut self.store) {
            self.events
                .push(GameEvent::hint("The light burns your shadow!"));
        }
    }

    /// Runs the quest and shop hooks attached to a dialogue response.
    pub(super) fn apply_response_effects(&mut self, response: &DialogueResponse) {
        if let Some(quest) = &response.set_quest {
            self.quests
                .activate_quest(&mut self.store, quest, &mut self.events);
        }

        let Some(item_id) = &response.shop else {
            return;
        };
        let Some(item) = self.content.items.get(item_id) else {
            tracing::warn!(item = %item_id, "dialogue offers an unknown item");
            return;
        };
        match self.shop.purchase(&mut self.store, ShopItem::single(item)) {
            Ok(_) => {
                self.events
                    .push(GameEvent::hint(format!("{} acquired.", item.name)));
                self.events.push(GameEvent::HudRefresh);
            }
            Err(PurchaseError::InsufficientCredits { .. }) => {
                self.events
                    .push(GameEvent::hint(format!("Not enough credits for {}.", item.name)));
            }
            Err(err) => tracing::warn!(item = %item.id, "purchase failed: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::*;
    use crate::combat::EnemyKind;
    use crate::config::GameConfig;
    use crate::debt::CurseId;
    use crate::dialogue::{DialogueNode, DialogueScript};
    use crate::economy::{ItemCategory, ItemDefinition};
    use crate::env::{
        EnemySpawn, ExitSpec, LevelDescriptor, LevelHints, NpcDefinition, NpcSpawn, PuzzleKind,
        PuzzleOptions, PuzzleSpec, SpawnPoints, StaticContent,
    };
    use crate::input::{InputFlags, InputSnapshot};
    use crate::quest::QuestDefinition;
    use crate::state::{MemoryStorage, StateStore};

    const FRAME_MS: f32 = 16.0;

    fn level(scene: &str, id: &str) -> LevelDescriptor {
        LevelDescriptor {
            id: id.into(),
            name: id.into(),
            scene: scene.into(),
            width: 40,
            height: 22,
            light_sources: Vec::new(),
            enemies: Vec::new(),
            npcs: Vec::new(),
            puzzles: Vec::new(),
            exits: Vec::new(),
            spawn: SpawnPoints {
                player: Vec2::new(48.0, 48.0),
                shadow: Vec2::new(64.0, 48.0),
            },
            entries: BTreeMap::new(),
            lantern_radius: None,
            phase_debt_bonus: 0.0,
            hints: LevelHints::default(),
        }
    }

    fn puzzle(kind: PuzzleKind, x: f32, y: f32) -> PuzzleSpec {
        PuzzleSpec {
            kind,
            x,
            y,
            options: PuzzleOptions::default(),
        }
    }

    fn smith_script() -> DialogueScript {
        let greet = DialogueNode {
            speaker: "Smith".into(),
            text: "Need oil for that lantern?".into(),
            responses: vec![
                DialogueResponse {
                    text: "Buy fuel".into(),
                    next: Some("thanks".into()),
                    shop: Some("fuel".into()),
                    ..Default::default()
                },
                DialogueResponse {
                    text: "Anything to do?".into(),
                    end: true,
                    set_quest: Some("dungeon_clear".into()),
                    ..Default::default()
                },
            ],
        };
        let thanks = DialogueNode {
            speaker: "Smith".into(),
            text: "Mind the dark.".into(),
            responses: vec![DialogueResponse {
                text: "Bye".into(),
                end: true,
                ..Default::default()
            }],
        };
        DialogueScript {
            start: "greet".into(),
            nodes: BTreeMap::from([("greet".into(), greet), ("thanks".into(), thanks)]),
        }
    }

    fn content() -> StaticContent {
        let mut town = level("OverworldScene", "town");
        town.npcs.push(NpcSpawn {
            id: "smith".into(),
            x: 60.0,
            y: 48.0,
        });
        town.exits.push(ExitSpec {
            id: "to_dungeon".into(),
            x: 120.0,
            y: 48.0,
            target_scene: "DungeonScene".into(),
            target_entry: "entrance".into(),
        });

        let mut dungeon = level("DungeonScene", "entrance");
        dungeon.puzzles = vec![
            puzzle(PuzzleKind::ShadowMaze, 200.0, 120.0),
            puzzle(PuzzleKind::Shrine, 40.0, 40.0),
        ];

        // Smith stands exactly at the edge of interaction reach.
        let mut plaza = level("OverworldScene", "plaza");
        plaza.npcs.push(NpcSpawn {
            id: "smith".into(),
            x: 72.0,
            y: 48.0,
        });

        let mut crypt = level("DungeonScene", "crypt");
        crypt.enemies.push(EnemySpawn {
            kind: EnemyKind::Lightborn,
            x: 48.0,
            y: 48.0,
        });

        StaticContent::new()
            .with_items([ItemDefinition {
                id: "fuel".into(),
                name: "Fuel".into(),
                description: String::new(),
                category: ItemCategory::Consumable,
                price: 50,
            }])
            .with_quests(vec![QuestDefinition {
                id: "dungeon_clear".into(),
                name: "Clear the Lightworks".into(),
                description: String::new(),
                objectives: vec!["mirror".into(), "plates".into(), "phase".into()],
            }])
            .with_npcs([NpcDefinition {
                id: "smith".into(),
                name: "Smith".into(),
                dialog: "smith".into(),
                role: "merchant".into(),
            }])
            .with_dialogues([("smith".to_owned(), smith_script())])
            .unwrap()
            .with_levels([town, dungeon, plaza, crypt])
            .unwrap()
    }

    fn simulation_with(store: StateStore) -> Simulation {
        Simulation::new(GameConfig::default(), Arc::new(content()), store)
    }

    fn started() -> Simulation {
        let mut sim = simulation_with(StateStore::new());
        sim.new_game().unwrap();
        sim.drain_events();
        sim
    }

    fn press(sim: &mut Simulation, flags: InputFlags) -> Vec<GameEvent> {
        let mut events = sim.step(&InputSnapshot::new(flags), FRAME_MS).events;
        events.extend(sim.step(&InputSnapshot::default(), FRAME_MS).events);
        events
    }

    fn hints(events: &[GameEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Hint(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn new_game_enters_town() {
        let sim = started();
        assert_eq!(sim.level().map(|level| level.id.as_str()), Some("town"));
        assert_eq!(sim.store().credits(), 120);
        assert_eq!(sim.player().position, Vec2::new(48.0, 48.0));
        assert_eq!(sim.controlling(), BodyKind::Player);
    }

    #[test]
    fn step_without_level_is_inert() {
        let mut sim = simulation_with(StateStore::new());
        let report = sim.step(&InputSnapshot::new(InputFlags::RIGHT), FRAME_MS);
        assert!(report.events.is_empty());
        assert!(report.exit.is_none());
    }

    #[test]
    fn pause_freezes_the_world() {
        let mut sim = started();
        press(&mut sim, InputFlags::PAUSE);
        assert!(sim.is_paused());

        let report = sim.step(&InputSnapshot::new(InputFlags::RIGHT), 1000.0);
        assert!(report.paused);
        assert_eq!(sim.player().position, Vec2::new(48.0, 48.0));
    }

    #[test]
    fn dialogue_purchase_charges_credits_and_applies_fuel() {
        let mut sim = started();
        press(&mut sim, InputFlags::INTERACT);
        assert_eq!(sim.dialogue().current_node_id(), Some("greet"));

        let next = sim.select_response(0).map(|node| node.text.clone());
        assert_eq!(next.as_deref(), Some("Mind the dark."));
        assert_eq!(sim.store().credits(), 70);
        assert_eq!(sim.store().item_count("fuel"), 3);
        assert_eq!(sim.store().stat(StatKey::LanternFuel), 140.0);
        assert!(hints(&sim.drain_events()).contains(&"Fuel acquired."));
    }

    #[test]
    fn purchase_without_credits_leaves_state_alone() {
        let mut sim = started();
        sim.store_mut().set_credits(20);
        press(&mut sim, InputFlags::INTERACT);
        sim.select_response(0);

        assert_eq!(sim.store().credits(), 20);
        assert_eq!(sim.store().item_count("fuel"), 2);
        assert!(hints(&sim.drain_events()).contains(&"Not enough credits for Fuel."));
    }

    #[test]
    fn dialogue_response_activates_quest() {
        let mut sim = started();
        press(&mut sim, InputFlags::INTERACT);
        assert!(sim.select_response(1).is_none());
        assert!(!sim.dialogue().is_active());

        let activated = GameEvent::QuestProgressChanged {
            quest: "dungeon_clear".into(),
            completed: 0,
            total: 3,
            done: false,
        };
        assert!(sim.drain_events().contains(&activated));
        assert_eq!(
            sim.quest_hud_lines(),
            vec!["Clear the Lightworks: 0/3".to_owned()]
        );
    }

    #[test]
    fn shadow_phase_in_maze_charges_debt_and_completes_objective() {
        let mut sim = started();
        press(&mut sim, InputFlags::INTERACT);
        sim.select_response(1);
        sim.enter_level("DungeonScene", "entrance").unwrap();
        sim.drain_events();

        press(&mut sim, InputFlags::LANTERN);
        press(&mut sim, InputFlags::SWAP);
        assert_eq!(sim.controlling(), BodyKind::Shadow);

        let events = press(&mut sim, InputFlags::ABILITY);
        assert_eq!(sim.store().stat(StatKey::Debt), 5.0);
        assert!(hints(&events).contains(&"Shadow phased through barrier!"));
        let progress = sim.store().quest("dungeon_clear").unwrap();
        assert_eq!(progress.objectives, vec![false, false, true]);

        // Only the first phase counts toward the puzzle.
        let events = press(&mut sim, InputFlags::ABILITY);
        assert_eq!(sim.store().stat(StatKey::Debt), 10.0);
        assert!(!hints(&events).contains(&"Shadow phased through barrier!"));
    }

    #[test]
    fn npc_at_reach_edge_is_out_of_range() {
        let mut sim = started();
        sim.enter_level("OverworldScene", "plaza").unwrap();
        sim.drain_events();

        press(&mut sim, InputFlags::INTERACT);
        assert!(!sim.dialogue().is_active());
    }

    #[test]
    fn held_swap_only_swaps_once() {
        let mut sim = started();
        let held = InputSnapshot::new(InputFlags::SWAP);
        for _ in 0..5 {
            sim.step(&held, 400.0);
        }
        assert_eq!(sim.controlling(), BodyKind::Shadow);
    }

    #[test]
    fn curses_follow_debt_and_shrine_eases_them() {
        let mut sim = started();
        sim.enter_level("DungeonScene", "entrance").unwrap();
        sim.drain_events();

        sim.store_mut().update_stat(StatKey::Debt, 80.0);
        let events = sim.step(&InputSnapshot::default(), FRAME_MS).events;
        assert!(events.contains(&GameEvent::CurseApplied {
            curse: CurseId::LowRegen
        }));
        assert!(events.contains(&GameEvent::CurseApplied {
            curse: CurseId::Flicker
        }));
        assert!(hints(&events).contains(&"Debt curse applied! Appease at a shrine."));

        let events = press(&mut sim, InputFlags::INTERACT);
        assert_eq!(sim.store().stat(StatKey::Debt), 65.0);
        assert_eq!(sim.store().stat(StatKey::LanternFuel), 85.0);
        assert!(events.contains(&GameEvent::CurseCleared {
            curse: CurseId::Flicker
        }));
        assert!(hints(&events).contains(&"Debt lowered at shrine."));
        assert!(hints(&events).contains(&"Debt eased."));
        assert!(sim.debt().is_active(CurseId::LowRegen));
    }

    #[test]
    fn walking_into_exit_reports_it() {
        let mut sim = started();
        let report = sim.step(&InputSnapshot::new(InputFlags::RIGHT), 1000.0);

        let exit = report.exit.expect("exit reached");
        assert_eq!(exit.target_scene, "DungeonScene");
        assert!(report.events.contains(&GameEvent::ExitReached {
            exit: "to_dungeon".into(),
            target_scene: "DungeonScene".into(),
            target_entry: "entrance".into(),
        }));

        sim.enter_level(&exit.target_scene, &exit.target_entry)
            .unwrap();
        assert_eq!(sim.store().location().scene, "DungeonScene");
    }

    #[test]
    fn enemy_contact_costs_hp() {
        let mut sim = started();
        sim.enter_level("DungeonScene", "crypt").unwrap();
        sim.drain_events();

        let events = sim.step(&InputSnapshot::default(), FRAME_MS).events;
        assert!(events.contains(&GameEvent::PlayerDamaged { amount: 10.0 }));
        assert!(hints(&events).contains(&"You were hit!"));
        assert!(sim.store().stat(StatKey::Hp) <= 90.0);

        // Grace window: a second frame in contact does not hurt again.
        let events = sim.step(&InputSnapshot::default(), FRAME_MS).events;
        assert!(!events.contains(&GameEvent::PlayerDamaged { amount: 10.0 }));
    }

    #[test]
    fn save_and_load_resume_the_saved_level() {
        let storage = MemoryStorage::new();
        let mut sim = simulation_with(StateStore::with_storage(Arc::new(storage.clone())));
        sim.new_game().unwrap();
        sim.enter_level("DungeonScene", "entrance").unwrap();
        sim.store_mut().set_credits(42);
        sim.save().unwrap();

        let mut restored = simulation_with(StateStore::with_storage(Arc::new(storage)));
        let record = restored.load().unwrap().expect("saved record");
        assert_eq!(record.credits, 42);
        assert_eq!(
            restored.level().map(|level| level.id.as_str()),
            Some("entrance")
        );
        assert_eq!(restored.store().credits(), 42);
    }

    #[test]
    fn load_without_save_returns_none() {
        let mut sim = simulation_with(StateStore::new());
        assert!(sim.load().unwrap().is_none());
        assert!(sim.level().is_none());
    }
}
