//! Authoritative scene: the loaded model, its display geometry and the
//! per-instance color layers.
//!
//! Mutations bump a generation counter; the renderer compares it with the
//! generation it last uploaded and only re-uploads when they differ.

pub mod bounds;
pub mod cartoon;
pub mod colors;
pub mod info;
pub mod instances;
pub mod representation;

pub use bounds::Aabb;
pub use colors::{InstanceColors, Pointer};
pub use info::AtomInfo;
pub use instances::{CylinderInstance, MeshData, MeshVertex, SphereInstance};
pub use representation::{build_geometry, InstanceSource, SceneGeometry};

use crate::options::{rgb_hex_to_rgba, DisplayModel, Options};
use crate::structure::{element, LoadedModel};

/// The loaded model and everything derived from it.
#[derive(Debug, Default)]
pub struct Scene {
    model: Option<LoadedModel>,
    display_model: DisplayModel,
    geometry: SceneGeometry,
    colors: InstanceColors,
    /// Monotonically increasing generation; bumped on geometry changes.
    generation: u64,
    /// Generation that was last consumed by the renderer.
    rendered_generation: u64,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Whether geometry changed since the last `mark_rendered()`.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.generation != self.rendered_generation
    }

    /// Record that the renderer uploaded the current geometry.
    pub fn mark_rendered(&mut self) {
        self.rendered_generation = self.generation;
    }

    /// Force a full re-upload on the next frame.
    pub fn mark_dirty(&mut self) {
        self.invalidate();
    }

    /// Whether sphere colors changed since the renderer last uploaded them.
    #[must_use]
    pub fn colors_changed(&self) -> bool {
        self.colors.changed()
    }

    /// Report and clear the "sphere colors changed" flag.
    pub fn take_colors_changed(&mut self) -> bool {
        self.colors.take_changed()
    }

    // -- Model --

    /// Replace the model and build its geometry with the configured
    /// display model.
    pub fn set_model(&mut self, model: LoadedModel, options: &Options) {
        log::info!("scene: showing {}", model.name());
        self.model = Some(model);
        self.display_model = options.display.display_model;
        self.rebuild_fresh(options);
    }

    /// Drop the model.
    pub fn clear(&mut self) {
        self.model = None;
        self.geometry = SceneGeometry::default();
        self.colors = InstanceColors::default();
        self.invalidate();
    }

    /// The loaded model.
    #[must_use]
    pub fn model(&self) -> Option<&LoadedModel> {
        self.model.as_ref()
    }

    /// Whether a model is loaded.
    #[must_use]
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// The active display model.
    #[must_use]
    pub fn display_model(&self) -> DisplayModel {
        self.display_model
    }

    /// Switch the display model; search highlights and recolors reset.
    pub fn set_display_model(&mut self, display: DisplayModel, options: &Options) {
        self.display_model = display;
        if self.model.is_some() {
            self.rebuild_fresh(options);
        }
    }

    fn rebuild_fresh(&mut self, options: &Options) {
        let Some(model) = &self.model else {
            return;
        };
        self.geometry = build_geometry(model, self.display_model, options);
        let base = self.geometry.spheres.iter().map(|s| s.color).collect();
        self.colors = InstanceColors::new(base, options.colors.highlight_boost);
        self.colors.set_hover_highlight(options.picking.hover_highlight);
        self.invalidate();
    }

    /// Rebuild after an option change. Color layers survive when the
    /// sphere list keeps its length.
    pub fn rebuild(&mut self, options: &Options) {
        let Some(model) = &self.model else {
            return;
        };
        let geometry = build_geometry(model, self.display_model, options);
        if geometry.spheres.len() == self.colors.len() {
            self.geometry = geometry;
            self.colors.set_hover_highlight(options.picking.hover_highlight);
            self.invalidate();
        } else {
            self.rebuild_fresh(options);
        }
    }

    // -- Geometry --

    /// Bounds of the drawn geometry (empty when nothing is loaded).
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.geometry.bounds
    }

    /// The built geometry.
    #[must_use]
    pub fn geometry(&self) -> &SceneGeometry {
        &self.geometry
    }

    /// Sphere instances with their displayed colors.
    #[must_use]
    pub fn sphere_instances(&self) -> Vec<SphereInstance> {
        self.geometry
            .spheres
            .iter()
            .zip(self.colors.effective_all())
            .map(|(s, color)| SphereInstance { color, ..*s })
            .collect()
    }

    /// Whether sphere picking makes sense for the current model.
    #[must_use]
    pub fn picking_enabled(&self) -> bool {
        matches!(
            self.model,
            Some(LoadedModel::Molecule(_) | LoadedModel::Primitives(_))
        ) && !self.geometry.spheres.is_empty()
    }

    // -- Colors --

    /// The color layers.
    #[must_use]
    pub fn colors(&self) -> &InstanceColors {
        &self.colors
    }

    /// Highlight atoms whose element matches one of the comma-separated
    /// symbols in `query`. Returns the number of highlighted instances.
    ///
    /// Each term replaces its own earlier highlight; other terms stay.
    pub fn select_atoms(&mut self, query: &str) -> usize {
        let Some(LoadedModel::Molecule(mol)) = &self.model else {
            return 0;
        };
        let mut total = 0;
        for term in query.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let key = term.to_ascii_lowercase();
            let instances: Vec<u32> = mol
                .atoms_with_symbol(term)
                .into_iter()
                .filter_map(|atom| self.geometry.instance_of_atom(atom))
                .collect();
            total += instances.len();
            log::debug!("search {term:?}: {} atoms", instances.len());
            self.colors.select_group(&key, instances);
        }
        total
    }

    /// Recolor every highlighted atom with `0xRRGGBB`. Returns how many
    /// instances changed.
    pub fn recolor_selection(&mut self, hex: u32) -> usize {
        self.colors.recolor_selected(rgb_hex_to_rgba(hex))
    }

    /// Undo every recolor.
    pub fn reset_atom_colors(&mut self) {
        self.colors.reset_recolored();
    }

    /// Remove every search highlight.
    pub fn reset_selection(&mut self) {
        self.colors.reset_selection();
    }

    /// Set what `pointer` hovers. Returns whether anything changed.
    pub fn set_hover(&mut self, pointer: Pointer, instance: Option<u32>) -> bool {
        self.colors.set_hover(pointer, instance)
    }

    /// What `pointer` hovers.
    #[must_use]
    pub fn hovered(&self, pointer: Pointer) -> Option<u32> {
        self.colors.hovered(pointer)
    }

    // -- Info --

    /// Info panel contents for sphere instance `instance`.
    #[must_use]
    pub fn atom_info(&self, instance: u32) -> Option<AtomInfo> {
        let source = *self.geometry.sphere_sources.get(instance as usize)?;
        match (source, self.model.as_ref()?) {
            (InstanceSource::Atom(i), LoadedModel::Molecule(mol)) => {
                let atom = mol.atoms.get(i as usize)?;
                let residue = if atom.residue.is_empty() {
                    String::new()
                } else {
                    format!("{} {}", atom.residue, atom.residue_seq)
                };
                Some(AtomInfo {
                    position: atom.position,
                    color: element::lookup(&atom.symbol).color,
                    symbol: Some(atom.symbol.clone()),
                    name: atom.name.clone(),
                    residue,
                })
            }
            (InstanceSource::Primitive(i), LoadedModel::Primitives(prims)) => {
                let sphere = prims.spheres.get(i as usize)?;
                let c = sphere.color;
                Some(AtomInfo {
                    position: sphere.center,
                    color: [c[0], c[1], c[2]].map(|v| (v * 255.0).round() as u8),
                    symbol: None,
                    name: format!("sphere #{i}"),
                    residue: String::new(),
                })
            }
            _ => None,
        }
    }
}
