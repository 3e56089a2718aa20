//! Dialogue script loader.

use std::collections::BTreeMap;
use std::path::Path;

use shadow_core::DialogueScript;

use crate::loaders::{LoadResult, read_file};

/// Loader for dialogue scripts from RON files.
///
/// RON format: a map from script id to script.
pub struct DialogueLoader;

impl DialogueLoader {
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, DialogueScript>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid dialogue file {}: {}", path.display(), e))
    }

    /// Parses and validates every script. A `next` pointing at a missing
    /// node fails the whole file.
    pub fn parse(content: &str) -> LoadResult<BTreeMap<String, DialogueScript>> {
        let scripts: BTreeMap<String, DialogueScript> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse dialogue RON: {}", e))?;

        for (id, script) in &scripts {
            script
                .validate()
                .map_err(|e| anyhow::anyhow!("Dialogue '{}' is invalid: {}", id, e))?;
        }
        Ok(scripts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_hooks() {
        let scripts = DialogueLoader::parse(
            r#"#![enable(implicit_some)]
            {
                "smith": (
                    start: "greet",
                    nodes: {
                        "greet": (
                            speaker: "Smith",
                            text: "Oil?",
                            responses: [
                                (text: "Buy", shop: "fuel", end: true),
                                (text: "Work?", setQuest: "dungeon_clear", end: true),
                            ],
                        ),
                    },
                ),
            }"#,
        )
        .unwrap();

        let greet = scripts["smith"].node("greet").unwrap();
        assert_eq!(greet.responses[0].shop.as_deref(), Some("fuel"));
        assert_eq!(
            greet.responses[1].set_quest.as_deref(),
            Some("dungeon_clear")
        );
    }

    #[test]
    fn dangling_next_fails() {
        let err = DialogueLoader::parse(
            r#"#![enable(implicit_some)]
            {
                "broken": (
                    start: "a",
                    nodes: {
                        "a": (text: "...", responses: [(text: "go", next: "nowhere")]),
                    },
                ),
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Dialogue 'broken' is invalid"));
    }
}
