//! Layered per-instance color state.
//!
//! An instance's displayed color is computed from independent layers
//! instead of being mutated in place:
//!
//! 1. the base color from the model,
//! 2. a user recolor (override),
//! 3. a highlight boost while the instance is in a search selection or
//!    under a pointer.
//!
//! Clearing a layer therefore always restores exactly what the instance
//! looked like without it.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};

/// Something that can hover an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pointer {
    /// The mouse cursor or a touch point.
    Mouse,
    /// A VR controller by input-source index.
    Controller(u8),
}

/// Color layers for one instance list (the scene's spheres).
#[derive(Debug, Clone, Default)]
pub struct InstanceColors {
    base: Vec<[f32; 4]>,
    overrides: FxHashMap<u32, [f32; 4]>,
    /// Search term → highlighted instances.
    selected: BTreeMap<String, Vec<u32>>,
    /// Search term → recolored instances.
    recolored: BTreeMap<String, Vec<u32>>,
    hover: FxHashMap<Pointer, u32>,
    /// Whether hovered instances are brightened.
    hover_highlight: bool,
    highlight_boost: f32,
    changed: bool,
}

fn brighten(color: [f32; 4], boost: f32) -> [f32; 4] {
    [
        (color[0] + boost).min(1.0),
        (color[1] + boost).min(1.0),
        (color[2] + boost).min(1.0),
        color[3],
    ]
}

impl InstanceColors {
    /// Layers over `base` with the given highlight boost per channel.
    #[must_use]
    pub fn new(base: Vec<[f32; 4]>, highlight_boost: f32) -> Self {
        Self {
            base,
            hover_highlight: true,
            highlight_boost,
            changed: true,
            ..Self::default()
        }
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// `true` when there are no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Base color of instance `i`.
    #[must_use]
    pub fn base(&self, i: u32) -> Option<[f32; 4]> {
        self.base.get(i as usize).copied()
    }

    /// Turn brightening of hovered instances on or off. Hover state is
    /// tracked either way.
    pub fn set_hover_highlight(&mut self, on: bool) {
        if self.hover_highlight != on {
            self.hover_highlight = on;
            self.changed = true;
        }
    }

    fn is_highlighted(&self, i: u32) -> bool {
        (self.hover_highlight && self.hover.values().any(|&h| h == i))
            || self.selected.values().any(|group| group.contains(&i))
    }

    /// Displayed color of instance `i`.
    #[must_use]
    pub fn effective(&self, i: u32) -> Option<[f32; 4]> {
        let base = self.base(i)?;
        let color = self.overrides.get(&i).copied().unwrap_or(base);
        Some(if self.is_highlighted(i) {
            brighten(color, self.highlight_boost)
        } else {
            color
        })
    }

    /// Displayed colors of all instances, in order.
    #[must_use]
    pub fn effective_all(&self) -> Vec<[f32; 4]> {
        let hovered = self.hover.values().filter(|_| self.hover_highlight);
        let highlighted: FxHashSet<u32> = hovered
            .copied()
            .chain(self.selected.values().flatten().copied())
            .collect();
        (0..self.base.len() as u32)
            .map(|i| {
                let color = self
                    .overrides
                    .get(&i)
                    .copied()
                    .unwrap_or(self.base[i as usize]);
                if highlighted.contains(&i) {
                    brighten(color, self.highlight_boost)
                } else {
                    color
                }
            })
            .collect()
    }

    /// Highlight `indices` as the selection for search term `key`,
    /// replacing any earlier selection for the same term.
    pub fn select_group(&mut self, key: &str, indices: Vec<u32>) {
        let indices: Vec<u32> = indices
            .into_iter()
            .filter(|&i| (i as usize) < self.base.len())
            .collect();
        let _ = self.selected.insert(key.to_owned(), indices);
        self.changed = true;
    }

    /// Total number of highlighted search results.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.values().map(Vec::len).sum()
    }

    /// Search terms currently selected.
    pub fn selected_keys(&self) -> impl Iterator<Item = &str> {
        self.selected.keys().map(String::as_str)
    }

    /// Give every selected instance `color` and move the selection into
    /// the recolored set. Returns how many instances changed.
    pub fn recolor_selected(&mut self, color: [f32; 4]) -> usize {
        let selected = std::mem::take(&mut self.selected);
        let mut count = 0;
        for (key, group) in selected {
            for &i in &group {
                let _ = self.overrides.insert(i, color);
            }
            count += group.len();
            self.recolored.entry(key).or_default().extend(group);
        }
        if count > 0 {
            self.changed = true;
        }
        count
    }

    /// Drop every user recolor, along with any selection made for the
    /// same search terms.
    pub fn reset_recolored(&mut self) {
        if self.recolored.is_empty() {
            return;
        }
        let recolored = std::mem::take(&mut self.recolored);
        for (key, group) in recolored {
            for i in group {
                let _ = self.overrides.remove(&i);
            }
            let _ = self.selected.remove(&key);
        }
        self.changed = true;
    }

    /// Remove all search highlights.
    pub fn reset_selection(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.changed = true;
        }
    }

    /// Set what `pointer` hovers. Returns `true` when that changed.
    pub fn set_hover(&mut self, pointer: Pointer, instance: Option<u32>) -> bool {
        let instance = instance.filter(|&i| (i as usize) < self.base.len());
        let previous = match instance {
            Some(i) => self.hover.insert(pointer, i),
            None => self.hover.remove(&pointer),
        };
        let changed = previous != instance;
        self.changed |= changed;
        changed
    }

    /// Instance hovered by `pointer`.
    #[must_use]
    pub fn hovered(&self, pointer: Pointer) -> Option<u32> {
        self.hover.get(&pointer).copied()
    }

    /// Whether any pointer other than `pointer` hovers something.
    #[must_use]
    pub fn hovered_by_other(&self, pointer: Pointer) -> bool {
        self.hover.keys().any(|&p| p != pointer)
    }

    /// Drop every layer above the base colors.
    pub fn clear(&mut self) {
        self.overrides.clear();
        self.selected.clear();
        self.recolored.clear();
        self.hover.clear();
        self.changed = true;
    }

    /// Whether colors changed since the last [`Self::take_changed`].
    #[must_use]
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Report and clear the "colors changed" flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [0.8, 0.0, 0.0, 1.0];
    const GREY: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
    const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

    fn colors() -> InstanceColors {
        InstanceColors::new(vec![RED, GREY, GREY], 0.5)
    }

    #[test]
    fn hover_brightens_and_restores() {
        let mut c = colors();
        assert!(c.set_hover(Pointer::Mouse, Some(0)));
        assert_eq!(c.effective(0), Some([1.0, 0.5, 0.5, 1.0]));
        assert!(!c.set_hover(Pointer::Mouse, Some(0)));
        assert!(c.set_hover(Pointer::Mouse, None));
        assert_eq!(c.effective(0), Some(RED));
    }

    #[test]
    fn selection_then_recolor_then_reset() {
        let mut c = colors();
        c.select_group("C", vec![1, 2]);
        assert_eq!(c.selected_count(), 2);
        assert_eq!(c.effective(1), Some([0.7, 0.7, 0.7, 1.0]));

        assert_eq!(c.recolor_selected(BLUE), 2);
        assert_eq!(c.selected_count(), 0);
        assert_eq!(c.effective(2), Some(BLUE));

        c.reset_recolored();
        assert_eq!(c.effective_all(), vec![RED, GREY, GREY]);
    }

    #[test]
    fn reset_selection_keeps_recolors() {
        let mut c = colors();
        c.select_group("O", vec![0]);
        let _ = c.recolor_selected(BLUE);
        c.select_group("C", vec![1]);
        c.reset_selection();
        assert_eq!(c.effective_all(), vec![BLUE, GREY, GREY]);
    }

    #[test]
    fn reselecting_is_idempotent() {
        let mut c = colors();
        c.select_group("C", vec![1]);
        c.select_group("C", vec![1]);
        assert_eq!(c.effective(1), Some([0.7, 0.7, 0.7, 1.0]));
    }

    #[test]
    fn hover_over_selection_does_not_double_boost() {
        let mut c = colors();
        c.select_group("C", vec![1]);
        let _ = c.set_hover(Pointer::Mouse, Some(1));
        assert_eq!(c.effective(1), Some([0.7, 0.7, 0.7, 1.0]));
        let _ = c.set_hover(Pointer::Mouse, None);
        assert_eq!(c.effective(1), Some([0.7, 0.7, 0.7, 1.0]));
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut c = colors();
        c.select_group("X", vec![7]);
        assert_eq!(c.selected_count(), 0);
        assert!(!c.set_hover(Pointer::Controller(0), Some(9)));
        assert_eq!(c.effective(9), None);
    }

    #[test]
    fn controllers_hover_independently() {
        let mut c = colors();
        let _ = c.set_hover(Pointer::Controller(0), Some(0));
        assert!(c.hovered_by_other(Pointer::Controller(1)));
        assert!(!c.hovered_by_other(Pointer::Controller(0)));
        assert_eq!(c.hovered(Pointer::Controller(0)), Some(0));
    }

    #[test]
    fn changed_flag_is_consumed() {
        let mut c = colors();
        assert!(c.take_changed());
        assert!(!c.take_changed());
        c.reset_selection();
        c.reset_recolored();
        assert!(!c.changed());
        let _ = c.set_hover(Pointer::Mouse, Some(1));
        assert!(c.changed());
        assert!(c.take_changed());
    }

    #[test]
    fn hover_without_highlight_is_still_tracked() {
        let mut c = colors();
        c.set_hover_highlight(false);
        let _ = c.set_hover(Pointer::Mouse, Some(0));
        assert_eq!(c.hovered(Pointer::Mouse), Some(0));
        assert_eq!(c.effective(0), c.base(0));
        assert_eq!(c.effective_all()[0], RED);
    }
}
