use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata for one gameplay modifier ("funbox").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunboxInfo {
    pub name: String,
    /// Whether results under this modifier may become records.
    pub can_get_pb: bool,
    #[serde(default)]
    pub ignores_language: bool,
    /// Extra text shown after the name in the chart label, e.g. a timer.
    #[serde(default)]
    pub result_content: Option<String>,
}

impl FunboxInfo {
    pub fn new(name: &str, can_get_pb: bool) -> Self {
        Self {
            name: name.to_string(),
            can_get_pb,
            ignores_language: false,
            result_content: None,
        }
    }
}

/// The set of modifiers the application knows about. Results referencing
/// identifiers missing from the registry are treated as not record-eligible.
#[derive(Clone, Debug, Default)]
pub struct FunboxRegistry {
    entries: HashMap<String, FunboxInfo>,
}

impl FunboxRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, info: FunboxInfo) {
        self.entries.insert(info.name.clone(), info);
    }

    pub fn get(&self, name: &str) -> Option<&FunboxInfo> {
        self.entries.get(name)
    }

    pub fn all_can_get_pb(&self, active: &[String]) -> bool {
        active
            .iter()
            .all(|name| self.get(name).is_some_and(|info| info.can_get_pb))
    }

    pub fn any_ignores_language(&self, active: &[String]) -> bool {
        active
            .iter()
            .any(|name| self.get(name).is_some_and(|info| info.ignores_language))
    }

    /// Chart label content: registered names space-joined, each followed by
    /// its result content in parentheses when present.
    pub fn label_content(&self, active: &[String]) -> String {
        let mut parts: Vec<String> = Vec::new();
        for name in active {
            if let Some(info) = self.get(name) {
                match &info.result_content {
                    Some(content) => parts.push(format!("{}({})", info.name, content)),
                    None => parts.push(info.name.clone()),
                }
            }
        }
        parts.join(" ")
    }
}
