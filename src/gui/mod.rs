//! Settings panel: widget state and the JSON actions a panel sends.
//!
//! Hosts render the panel however they like and report interactions as
//! [`UiAction`]s, which map one-to-one onto engine commands.

pub mod action;
pub mod panel;

pub use action::{parse_action, parse_action_str, UiAction};
pub use panel::{Folder, PanelState, DEFAULT_ATOM_COLOR};
