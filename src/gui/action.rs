//! JSON actions sent by a settings panel (web page or native webview).

use std::path::PathBuf;

use crate::engine::command::MolvisCommand;
use crate::options::DisplayModel;

/// One panel interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Pick a radio button in the `Models` folder.
    SetModel(DisplayModel),
    /// Submit the atom search field.
    SearchAtoms(String),
    /// Pick a color for the highlighted atoms (`0xRRGGBB`).
    SetAtomColor(u32),
    /// `Reset Atom Color` button.
    ResetAtomColor,
    /// `Reset Atom Selection` button.
    ResetSelection,
    /// `Reset Camera` button.
    ResetCamera,
    /// `Reset Viewer` button.
    ResetViewer,
    /// `Save Screenshot` button.
    TakeScreenshot,
    /// Load a file chosen by the host.
    LoadFile(PathBuf),
    /// Pick an entry of the example lists.
    LoadExample(String),
    /// `Load local model file` button.
    OpenFileDialog,
    /// Set a single option field: `options[section][field] = value`.
    SetOption {
        /// Top-level section key (e.g. `"lighting"`).
        section: String,
        /// Field key within the section (e.g. `"ambient"`).
        field: String,
        /// New JSON value.
        value: serde_json::Value,
    },
}

impl UiAction {
    /// The engine command this action triggers.
    #[must_use]
    pub fn into_command(self) -> MolvisCommand {
        match self {
            Self::SetModel(model) => MolvisCommand::SetDisplayModel(model),
            Self::SearchAtoms(query) => MolvisCommand::SearchAtoms(query),
            Self::SetAtomColor(color) => MolvisCommand::SetAtomColor(color),
            Self::ResetAtomColor => MolvisCommand::ResetAtomColor,
            Self::ResetSelection => MolvisCommand::ResetSelection,
            Self::ResetCamera => MolvisCommand::ResetCamera,
            Self::ResetViewer => MolvisCommand::ResetViewer,
            Self::TakeScreenshot => MolvisCommand::TakeScreenshot,
            Self::LoadFile(path) => MolvisCommand::LoadPath(path),
            Self::LoadExample(path) => MolvisCommand::LoadExample(path),
            Self::OpenFileDialog => MolvisCommand::OpenFileDialog,
            Self::SetOption {
                section,
                field,
                value,
            } => MolvisCommand::SetOption {
                section,
                field,
                value,
            },
        }
    }
}

/// Parse a JSON message `{"action": "...", ...}`.
#[must_use]
pub fn parse_action_str(body: &str) -> Option<UiAction> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(msg) => parse_action(&msg),
        Err(e) => {
            log::warn!("ignoring malformed panel message: {e}");
            None
        }
    }
}

/// Parse a panel message into a [`UiAction`]. Unknown actions and
/// missing fields yield `None`.
#[must_use]
pub fn parse_action(msg: &serde_json::Value) -> Option<UiAction> {
    let action = msg.get("action")?.as_str()?;
    let string = |key: &str| -> Option<String> {
        msg.get(key)?.as_str().map(str::to_owned)
    };
    match action {
        "set_model" => {
            let model = serde_json::from_value(msg.get("model")?.clone()).ok()?;
            Some(UiAction::SetModel(model))
        }
        "search_atoms" => Some(UiAction::SearchAtoms(string("query")?)),
        "set_atom_color" => parse_color(msg.get("color")?).map(UiAction::SetAtomColor),
        "reset_atom_color" => Some(UiAction::ResetAtomColor),
        "reset_selection" => Some(UiAction::ResetSelection),
        "reset_camera" => Some(UiAction::ResetCamera),
        "reset_viewer" => Some(UiAction::ResetViewer),
        "take_screenshot" => Some(UiAction::TakeScreenshot),
        "load_file" => Some(UiAction::LoadFile(PathBuf::from(string("path")?))),
        "load_example" => Some(UiAction::LoadExample(string("path")?)),
        "open_file_dialog" => Some(UiAction::OpenFileDialog),
        "set_option" => Some(UiAction::SetOption {
            section: string("section")?,
            field: string("field")?,
            value: msg.get("value")?.clone(),
        }),
        other => {
            log::warn!("unknown panel action {other:?}");
            None
        }
    }
}

/// A color as a number (`11189196`) or a hex string (`"#aabbcc"`,
/// `"0xaabbcc"`).
fn parse_color(value: &serde_json::Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok().filter(|&c| c <= 0x00ff_ffff);
    }
    let s = value.as_str()?.trim();
    let hex = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s);
    match hex.len() {
        6 => u32::from_str_radix(hex, 16).ok(),
        3 => {
            let short = u32::from_str_radix(hex, 16).ok()?;
            let (r, g, b) = ((short >> 8) & 0xf, (short >> 4) & 0xf, short & 0xf);
            Some(((r * 0x11) << 16) | ((g * 0x11) << 8) | (b * 0x11))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_button_actions() {
        assert_eq!(
            parse_action_str(r#"{"action":"reset_camera"}"#),
            Some(UiAction::ResetCamera)
        );
        assert_eq!(
            parse_action(&json!({"action": "take_screenshot"})),
            Some(UiAction::TakeScreenshot)
        );
        assert_eq!(parse_action(&json!({"action": "explode"})), None);
        assert_eq!(parse_action_str("not json"), None);
    }

    #[test]
    fn parses_model_and_search() {
        assert_eq!(
            parse_action(&json!({"action": "set_model", "model": "van_der_waals"})),
            Some(UiAction::SetModel(DisplayModel::VanDerWaals))
        );
        assert_eq!(
            parse_action(&json!({"action": "search_atoms", "query": "C, O"}))
                .map(UiAction::into_command),
            Some(MolvisCommand::SearchAtoms("C, O".into()))
        );
        assert_eq!(parse_action(&json!({"action": "search_atoms"})), None);
    }

    #[test]
    fn atom_color_accepts_numbers_and_hex() {
        let color = |v| parse_action(&json!({"action": "set_atom_color", "color": v}));
        assert_eq!(color(json!(0x00aa_bbcc)), Some(UiAction::SetAtomColor(0x00aa_bbcc)));
        assert_eq!(color(json!("#aabbcc")), Some(UiAction::SetAtomColor(0x00aa_bbcc)));
        assert_eq!(color(json!("0xAABBCC")), Some(UiAction::SetAtomColor(0x00aa_bbcc)));
        assert_eq!(color(json!("#abc")), Some(UiAction::SetAtomColor(0x00aa_bbcc)));
        assert_eq!(color(json!("#abcd")), None);
        assert_eq!(color(json!(0x0100_0000)), None);
    }

    #[test]
    fn set_option_keeps_the_raw_value() {
        let action = parse_action(&json!({
            "action": "set_option",
            "section": "lighting",
            "field": "ambient",
            "value": 0.4,
        }));
        assert_eq!(
            action.map(UiAction::into_command),
            Some(MolvisCommand::SetOption {
                section: "lighting".into(),
                field: "ambient".into(),
                value: json!(0.4),
            })
        );
    }

    #[test]
    fn load_actions_map_to_commands() {
        assert_eq!(
            parse_action(&json!({"action": "load_example", "path": "models/pdb/1wxr.pdb"}))
                .map(UiAction::into_command),
            Some(MolvisCommand::LoadExample("models/pdb/1wxr.pdb".into()))
        );
        assert_eq!(
            parse_action(&json!({"action": "load_file", "path": "/tmp/a.stl"})),
            Some(UiAction::LoadFile(PathBuf::from("/tmp/a.stl")))
        );
    }
}
