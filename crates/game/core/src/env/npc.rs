use serde::{Deserialize, Serialize};

/// Registry entry for a character the player can talk to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcDefinition {
    pub id: String,
    pub name: String,
    /// Dialogue script started on interaction.
    pub dialog: String,
    #[serde(default)]
    pub role: String,
}
