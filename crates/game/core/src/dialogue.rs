//! Branching dialogue traversal.
//!
//! The engine only walks the graph. Response side effects (`shop`,
//! `set_quest`) are interpreted by the caller before it calls
//! [`DialogueEngine::choose`].
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueResponse {
    pub text: String,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub end: bool,
    /// Item id offered for purchase when this response is chosen.
    #[serde(default)]
    pub shop: Option<String>,
    /// Quest id activated when this response is chosen.
    #[serde(default)]
    pub set_quest: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueNode {
    #[serde(default)]
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub responses: Vec<DialogueResponse>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueScript {
    pub start: String,
    pub nodes: BTreeMap<String, DialogueNode>,
}

impl DialogueScript {
    pub fn node(&self, id: &str) -> Option<&DialogueNode> {
        self.nodes.get(id)
    }

    /// Checks that the start node exists and that every response either ends
    /// the conversation or names an existing `next` node.
    pub fn validate(&self) -> Result<(), DialogueScriptError> {
        if !self.nodes.contains_key(&self.start) {
            return Err(DialogueScriptError::MissingStart(self.start.clone()));
        }
        for (id, node) in &self.nodes {
            for (index, response) in node.responses.iter().enumerate() {
                match (&response.next, response.end) {
                    (Some(_), true) => {
                        return Err(DialogueScriptError::Ambiguous {
                            node: id.clone(),
                            index,
                        });
                    }
                    (Some(target), false) if !self.nodes.contains_key(target) => {
                        return Err(DialogueScriptError::DanglingNext {
                            node: id.clone(),
                            index,
                            target: target.clone(),
                        });
                    }
                    (None, false) => {
                        return Err(DialogueScriptError::DeadEnd {
                            node: id.clone(),
                            index,
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DialogueScriptError {
    #[error("start node '{0}' does not exist")]
    MissingStart(String),

    #[error("response {index} of node '{node}' points at missing node '{target}'")]
    DanglingNext {
        node: String,
        index: usize,
        target: String,
    },

    #[error("response {index} of node '{node}' both ends and continues")]
    Ambiguous { node: String, index: usize },

    #[error("response {index} of node '{node}' neither ends nor continues")]
    DeadEnd { node: String, index: usize },
}

impl GameError for DialogueScriptError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingStart(_) => "DIALOGUE_MISSING_START",
            Self::DanglingNext { .. } => "DIALOGUE_DANGLING_NEXT",
            Self::Ambiguous { .. } => "DIALOGUE_AMBIGUOUS_RESPONSE",
            Self::DeadEnd { .. } => "DIALOGUE_DEAD_END_RESPONSE",
        }
    }
}

#[derive(Clone, Debug)]
struct Cursor {
    script: String,
    node: String,
}

/// Conversation state machine over loaded scripts.
#[derive(Clone, Debug, Default)]
pub struct DialogueEngine {
    scripts: BTreeMap<String, DialogueScript>,
    active: Option<Cursor>,
}

impl DialogueEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, id: impl Into<String>, script: DialogueScript) {
        self.scripts.insert(id.into(), script);
    }

    pub fn has_script(&self, id: &str) -> bool {
        self.scripts.contains_key(id)
    }

    /// Begins `id` at its start node. Unknown scripts (or a missing start
    /// node) leave the engine idle and return `None`.
    pub fn start(&mut self, id: &str) -> Option<&DialogueNode> {
        let Some(script) = self.scripts.get(id) else {
            tracing::warn!(script = id, "unknown dialogue script");
            self.active = None;
            return None;
        };
        if !script.nodes.contains_key(&script.start) {
            self.active = None;
            return None;
        }
        self.active = Some(Cursor {
            script: id.to_owned(),
            node: script.start.clone(),
        });
        self.current_node()
    }

    /// Follows `response`. Ending responses, unresolvable `next` targets and
    /// calls with no active conversation all terminate and return `None`.
    pub fn choose(&mut self, response: &DialogueResponse) -> Option<&DialogueNode> {
        let cursor = self.active.take()?;
        if response.end {
            return None;
        }
        let next = response.next.as_deref()?;
        let script = self.scripts.get(&cursor.script)?;
        if !script.nodes.contains_key(next) {
            tracing::debug!(script = %cursor.script, next, "dialogue target missing, ending");
            return None;
        }
        self.active = Some(Cursor {
            script: cursor.script,
            node: next.to_owned(),
        });
        self.current_node()
    }

    /// Response `index` of the current node.
    pub fn response(&self, index: usize) -> Option<&DialogueResponse> {
        self.current_node()?.responses.get(index)
    }

    pub fn current_node(&self) -> Option<&DialogueNode> {
        let cursor = self.active.as_ref()?;
        self.scripts.get(&cursor.script)?.node(&cursor.node)
    }

    pub fn current_node_id(&self) -> Option<&str> {
        self.active.as_ref().map(|cursor| cursor.node.as_str())
    }

    pub fn active_script(&self) -> Option<&str> {
        self.active.as_ref().map(|cursor| cursor.script.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Abandons the current conversation.
    pub fn end(&mut self) {
        self.active = None;
    }
}
