use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "RawBindings")]
/// Configurable keyboard bindings mapping actions to key codes.
pub struct KeybindingOptions {
    /// Maps action → key string (e.g. `ResetCamera` → `"KeyR"`).
    pub bindings: HashMap<KeyAction, String>,
    /// Reverse lookup cache (key string → action). Rebuilt on load.
    #[serde(skip)]
    key_to_action: HashMap<String, KeyAction>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let bindings = HashMap::from([
            (KeyAction::ResetCamera, "KeyR".into()),
            (KeyAction::ResetViewer, "Backspace".into()),
            (KeyAction::Screenshot, "KeyP".into()),
            (KeyAction::CycleDisplayModel, "KeyM".into()),
            (KeyAction::ResetSelection, "KeyC".into()),
            (KeyAction::CloseInfo, "Escape".into()),
        ]);

        let mut opts = Self {
            bindings,
            key_to_action: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

#[derive(Deserialize)]
struct RawBindings {
    #[serde(default = "default_bindings")]
    bindings: HashMap<KeyAction, String>,
}

fn default_bindings() -> HashMap<KeyAction, String> {
    KeybindingOptions::default().bindings
}

impl From<RawBindings> for KeybindingOptions {
    fn from(raw: RawBindings) -> Self {
        let mut opts = Self {
            bindings: raw.bindings,
            key_to_action: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl KeybindingOptions {
    /// Rebuild the reverse lookup map (key string → action).
    pub fn rebuild_reverse_map(&mut self) {
        self.key_to_action.clear();
        for (action, key) in &self.bindings {
            let _ = self.key_to_action.insert(key.clone(), *action);
        }
    }

    /// Look up the action for a key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.key_to_action.get(key).copied()
    }
}
