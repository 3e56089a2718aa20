//! Quest ledger: static quest metadata joined with persisted progress.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::{EventQueue, GameEvent};
use crate::state::{QuestError, QuestProgress, StateStore};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Objective labels in display order.
    pub objectives: Vec<String>,
}

/// A quest with live progress, paired with its definition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveQuest<'a> {
    pub definition: &'a QuestDefinition,
    pub progress: &'a QuestProgress,
}

impl ActiveQuest<'_> {
    /// `"{name}: {completed}/{total}"`.
    pub fn hud_line(&self) -> String {
        format!(
            "{}: {}/{}",
            self.definition.name,
            self.progress.completed_count(),
            self.definition.objectives.len()
        )
    }
}

/// Registered quest definitions. Progress itself lives in the [`StateStore`].
#[derive(Clone, Debug, Default)]
pub struct QuestLog {
    definitions: BTreeMap<String, QuestDefinition>,
}

impl QuestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads definitions, replacing any with the same id. Save state is not
    /// touched.
    pub fn register(&mut self, definitions: impl IntoIterator<Item = QuestDefinition>) {
        for definition in definitions {
            self.definitions.insert(definition.id.clone(), definition);
        }
    }

    pub fn definition(&self, id: &str) -> Option<&QuestDefinition> {
        self.definitions.get(id)
    }

    /// Starts tracking `id`, or returns its existing progress. Unknown ids
    /// yield `None`.
    pub fn activate_quest(
        &self,
        store: &mut StateStore,
        id: &str,
        events: &mut EventQueue,
    ) -> Option<QuestProgress> {
        let Some(definition) = self.definitions.get(id) else {
            tracing::warn!(quest = id, "cannot activate unknown quest");
            return None;
        };
        let is_new = store.quest(id).is_none();
        let progress = store.upsert_quest(id, definition.objectives.len()).clone();
        if is_new {
            tracing::debug!(quest = id, "quest activated");
            events.push(progress_event(&progress));
        }
        Some(progress)
    }

    /// Completes one objective. Returns `Ok(true)` when it was newly
    /// completed; repeats are `Ok(false)` and emit nothing.
    pub fn mark_objective(
        &self,
        store: &mut StateStore,
        id: &str,
        index: usize,
        events: &mut EventQueue,
    ) -> Result<bool, QuestError> {
        let definition = self
            .definitions
            .get(id)
            .ok_or_else(|| QuestError::Unknown(id.to_owned()))?;
        let total = definition.objectives.len();
        if index >= total {
            return Err(QuestError::ObjectiveOutOfRange {
                quest: id.to_owned(),
                index,
                total,
            });
        }
        let changed = store.complete_objective(id, index)?;
        if changed && let Some(progress) = store.quest(id) {
            tracing::debug!(
                quest = id,
                index,
                done = progress.completed,
                "objective completed"
            );
            events.push(progress_event(progress));
        }
        Ok(changed)
    }

    /// Live progress joined with definitions, in activation order. Progress
    /// without a registered definition is skipped.
    pub fn active_quests<'a>(&'a self, store: &'a StateStore) -> Vec<ActiveQuest<'a>> {
        store
            .quests()
            .iter()
            .filter_map(|progress| {
                self.definitions
                    .get(&progress.id)
                    .map(|definition| ActiveQuest {
                        definition,
                        progress,
                    })
            })
            .collect()
    }

    pub fn hud_lines(&self, store: &StateStore) -> Vec<String> {
        self.active_quests(store)
            .iter()
            .map(ActiveQuest::hud_line)
            .collect()
    }
}

fn progress_event(progress: &QuestProgress) -> GameEvent {
    GameEvent::QuestProgressChanged {
        quest: progress.id.clone(),
        completed: progress.completed_count(),
        total: progress.total(),
        done: progress.completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUEST: &str = "dungeon_clear";

    fn dungeon_clear() -> QuestDefinition {
        QuestDefinition {
            id: QUEST.into(),
            name: "Lightworks".into(),
            description: "Restore the Lightworks.".into(),
            objectives: vec!["Mirror".into(), "Plates".into(), "Phase".into()],
        }
    }

    fn setup() -> (QuestLog, StateStore, EventQueue) {
        let mut log = QuestLog::new();
        log.register([dungeon_clear()]);
        let mut store = StateStore::new();
        store.new_game();
        (log, store, EventQueue::new())
    }

    #[test]
    fn register_does_not_touch_save_state() {
        let (_, store, _) = setup();
        assert!(store.quests().is_empty());
    }

    #[test]
    fn activate_creates_then_returns_existing() {
        let (log, mut store, mut events) = setup();
        let first = log.activate_quest(&mut store, QUEST, &mut events).unwrap();
        assert_eq!(first.objectives, vec![false; 3]);
        log.mark_objective(&mut store, QUEST, 1, &mut events)
            .unwrap();

        let again = log.activate_quest(&mut store, QUEST, &mut events).unwrap();
        assert_eq!(again.objectives, vec![false, true, false]);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn unknown_quest_is_not_activated() {
        let (log, mut store, mut events) = setup();
        let activated = log.activate_quest(&mut store, "missing", &mut events);
        assert!(activated.is_none());
        assert!(store.quests().is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn mark_objective_emits_progress_once() {
        let (log, mut store, mut events) = setup();
        log.activate_quest(&mut store, QUEST, &mut events);
        events.drain();

        let first = log.mark_objective(&mut store, QUEST, 0, &mut events);
        let second = log.mark_objective(&mut store, QUEST, 0, &mut events);
        assert_eq!(first, Ok(true));
        assert_eq!(second, Ok(false));
        assert_eq!(
            events.drain(),
            vec![GameEvent::QuestProgressChanged {
                quest: QUEST.into(),
                completed: 1,
                total: 3,
                done: false,
            }]
        );
    }

    #[test]
    fn out_of_range_objective_is_rejected() {
        let (log, mut store, mut events) = setup();
        log.activate_quest(&mut store, QUEST, &mut events);
        let err = log
            .mark_objective(&mut store, QUEST, 3, &mut events)
            .unwrap_err();
        assert_eq!(
            err,
            QuestError::ObjectiveOutOfRange {
                quest: QUEST.into(),
                index: 3,
                total: 3,
            }
        );
        assert_eq!(store.quest(QUEST).unwrap().completed_count(), 0);
    }

    #[test]
    fn marking_inactive_quest_is_rejected() {
        let (log, mut store, mut events) = setup();
        assert_eq!(
            log.mark_objective(&mut store, QUEST, 0, &mut events),
            Err(QuestError::NotActive(QUEST.into()))
        );
        assert_eq!(
            log.mark_objective(&mut store, "nope", 0, &mut events),
            Err(QuestError::Unknown("nope".into()))
        );
    }

    #[test]
    fn active_quests_skip_stale_progress() {
        let (log, mut store, mut events) = setup();
        store.upsert_quest("removed_content", 2);
        log.activate_quest(&mut store, QUEST, &mut events);
        let marked = log.mark_objective(&mut store, QUEST, 2, &mut events);
        assert_eq!(marked, Ok(true));

        let active = log.active_quests(&store);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].definition.id, QUEST);
        assert_eq!(log.hud_lines(&store), vec!["Lightworks: 1/3".to_owned()]);
    }

    #[test]
    fn completing_all_objectives_marks_done() {
        let (log, mut store, mut events) = setup();
        log.activate_quest(&mut store, QUEST, &mut events);
        for index in 0..3 {
            log.mark_objective(&mut store, QUEST, index, &mut events)
                .unwrap();
        }
        assert!(store.quest(QUEST).unwrap().completed);
        assert!(matches!(
            events.iter().last(),
            Some(GameEvent::QuestProgressChanged {
                done: true,
                completed: 3,
                ..
            })
        ));
    }
}
