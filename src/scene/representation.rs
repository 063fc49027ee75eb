//! Display-model construction: turns a loaded model into instance lists.
//!
//! Molecules are centered on the origin before any geometry is built.
//! Surfaces and JSON primitives keep their file coordinates.

use glam::Vec3;

use super::bounds::Aabb;
use super::cartoon::{tube_mesh, TubeParams};
use super::instances::{CylinderInstance, MeshData, MeshVertex, SphereInstance};
use crate::options::{DisplayModel, Options};
use crate::structure::{element, LoadedModel, Molecule, Primitives, SurfaceMesh};

/// What a sphere instance stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceSource {
    /// Atom index in the molecule.
    Atom(u32),
    /// Sphere index in the JSON primitive list.
    Primitive(u32),
}

/// Everything the renderer draws for one model.
#[derive(Debug, Clone, Default)]
pub struct SceneGeometry {
    /// Atom or primitive spheres, in pickable order.
    pub spheres: Vec<SphereInstance>,
    /// Source of each sphere, same length as `spheres`.
    pub sphere_sources: Vec<InstanceSource>,
    /// Bonds, primitive cylinders and bounding-box edges.
    pub cylinders: Vec<CylinderInstance>,
    /// Surfaces and cartoon tubes.
    pub meshes: Vec<MeshData>,
    /// Bounds of the drawn geometry (spheres include their radii).
    pub bounds: Aabb,
    /// Translation applied to the file coordinates.
    pub offset: Vec3,
    /// Light with the key light only.
    pub key_light_only: bool,
}

impl SceneGeometry {
    /// Whether nothing would be drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
            && self.cylinders.is_empty()
            && self.meshes.iter().all(MeshData::is_empty)
    }

    /// Instance index showing atom `atom`, if any.
    #[must_use]
    pub fn instance_of_atom(&self, atom: u32) -> Option<u32> {
        // Atom spheres are emitted in atom order.
        if self.sphere_sources.get(atom as usize) == Some(&InstanceSource::Atom(atom)) {
            return Some(atom);
        }
        self.sphere_sources
            .iter()
            .position(|s| *s == InstanceSource::Atom(atom))
            .map(|i| i as u32)
    }
}

fn rgba(rgb: [f32; 3]) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], 1.0]
}

fn rgb(rgba: [f32; 4]) -> [f32; 3] {
    [rgba[0], rgba[1], rgba[2]]
}

/// Build the geometry of `model` in `display` model.
///
/// `display` only matters for molecules.
#[must_use]
pub fn build_geometry(
    model: &LoadedModel,
    display: DisplayModel,
    options: &Options,
) -> SceneGeometry {
    let mut geometry = match model {
        LoadedModel::Molecule(mol) => molecule_geometry(mol, display, options),
        LoadedModel::Surface(mesh) => surface_geometry(mesh, options),
        LoadedModel::Primitives(prims) => primitive_geometry(prims),
    };

    if options.display.show_bounds && !geometry.bounds.is_empty() {
        let radius = options.geometry.bounds_radius;
        let color = options.colors.bounds;
        geometry.cylinders.extend(
            geometry
                .bounds
                .edges()
                .iter()
                .map(|&(a, b)| CylinderInstance::between(a, b, radius, color, color)),
        );
    }

    log::debug!(
        "built {:?} geometry: {} spheres, {} cylinders, {} meshes",
        display,
        geometry.spheres.len(),
        geometry.cylinders.len(),
        geometry.meshes.len()
    );
    geometry
}

fn molecule_geometry(
    mol: &Molecule,
    display: DisplayModel,
    options: &Options,
) -> SceneGeometry {
    let geo = &options.geometry;
    let offset = -mol.bounds().center();
    let positions: Vec<Vec3> =
        mol.atoms.iter().map(|a| a.position + offset).collect();
    let elements: Vec<_> =
        mol.atoms.iter().map(|a| element::lookup(&a.symbol)).collect();

    let mut out = SceneGeometry {
        offset,
        ..SceneGeometry::default()
    };

    let push_atoms = |out: &mut SceneGeometry, radius_of: &dyn Fn(usize) -> f32| {
        for (i, (&pos, info)) in positions.iter().zip(&elements).enumerate() {
            let color = rgba(info.color_f32());
            let sphere = SphereInstance::new(pos, radius_of(i), color);
            out.bounds.include(pos - Vec3::splat(sphere.radius()));
            out.bounds.include(pos + Vec3::splat(sphere.radius()));
            out.spheres.push(sphere);
            out.sphere_sources.push(InstanceSource::Atom(i as u32));
        }
    };

    match display {
        DisplayModel::BallsAndSticks => {
            push_atoms(&mut out, &|i| elements[i].covalent_radius * geo.ball_scale);
            let color = options.colors.bond;
            for bond in &mol.bonds {
                let (a, b) = (bond.a as usize, bond.b as usize);
                out.cylinders.push(CylinderInstance::between(
                    positions[a],
                    positions[b],
                    geo.bond_radius,
                    color,
                    color,
                ));
            }
        }
        DisplayModel::Wireframe => {
            for bond in &mol.bonds {
                let (a, b) = (bond.a as usize, bond.b as usize);
                out.cylinders.push(CylinderInstance::between(
                    positions[a],
                    positions[b],
                    geo.wire_radius,
                    elements[a].color_f32(),
                    elements[b].color_f32(),
                ));
            }
            out.bounds = Aabb::from_points(positions.iter().copied());
        }
        DisplayModel::VanDerWaals => {
            push_atoms(&mut out, &|i| elements[i].vdw_radius * geo.vdw_scale);
        }
        DisplayModel::Cartoon => {
            let chains: Vec<Vec<Vec3>> = mol
                .ca_trace()
                .into_iter()
                .map(|chain| chain.into_iter().map(|p| p + offset).collect())
                .collect();
            if chains.is_empty() {
                log::warn!("{}: no alpha carbons, cartoon is empty", mol.name);
            }
            let params = TubeParams {
                radius: geo.cartoon_radius,
                segments_per_span: geo.cartoon_segments as usize,
                sides: geo.tube_sides as usize,
                color: options.colors.cartoon,
            };
            let tube = tube_mesh(&chains, &params);
            out.bounds =
                Aabb::from_points(tube.vertices.iter().map(|v| Vec3::from(v.position)));
            if out.bounds.is_empty() {
                out.bounds = Aabb::from_points(positions.iter().copied());
            }
            if !tube.is_empty() {
                out.meshes.push(tube);
            }
            out.key_light_only = true;
        }
    }
    out
}

fn surface_geometry(mesh: &SurfaceMesh, options: &Options) -> SceneGeometry {
    let color = options.colors.surface;
    let vertices = mesh
        .positions
        .iter()
        .zip(&mesh.normals)
        .map(|(p, n)| MeshVertex {
            position: p.to_array(),
            normal: n.to_array(),
            color,
        })
        .collect();
    SceneGeometry {
        meshes: vec![MeshData {
            vertices,
            indices: mesh.indices.clone(),
        }],
        bounds: mesh.bounds(),
        ..SceneGeometry::default()
    }
}

fn primitive_geometry(prims: &Primitives) -> SceneGeometry {
    let spheres = prims
        .spheres
        .iter()
        .map(|s| SphereInstance::new(s.center, s.radius, s.color))
        .collect();
    let sphere_sources = (0..prims.spheres.len() as u32)
        .map(InstanceSource::Primitive)
        .collect();
    let cylinders = prims
        .cylinders
        .iter()
        .map(|c| {
            CylinderInstance::between(
                c.origin,
                c.extremity,
                c.radius,
                rgb(c.color),
                rgb(c.color),
            )
        })
        .collect();
    SceneGeometry {
        spheres,
        sphere_sources,
        cylinders,
        bounds: prims.bounds(),
        ..SceneGeometry::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{Atom, Bond, CylinderPrimitive, SpherePrimitive};

    fn atom(name: &str, symbol: &str, position: Vec3) -> Atom {
        Atom {
            serial: 0,
            name: name.into(),
            residue: "ALA".into(),
            chain: 'A',
            residue_seq: 1,
            position,
            symbol: symbol.into(),
        }
    }

    fn water() -> LoadedModel {
        LoadedModel::Molecule(Molecule {
            name: "water".into(),
            atoms: vec![
                atom("O", "O", Vec3::new(10.0, 0.0, 0.0)),
                atom("H1", "H", Vec3::new(11.0, 0.0, 0.0)),
                atom("H2", "H", Vec3::new(10.0, 1.0, 0.0)),
            ],
            bonds: vec![Bond { a: 0, b: 1 }, Bond { a: 0, b: 2 }],
        })
    }

    fn options() -> Options {
        let mut o = Options::default();
        o.display.show_bounds = false;
        o
    }

    #[test]
    fn balls_and_sticks_uses_covalent_radii() {
        let g = build_geometry(&water(), DisplayModel::BallsAndSticks, &options());
        assert_eq!(g.spheres.len(), 3);
        assert_eq!(g.cylinders.len(), 2);
        let o = element::lookup("O");
        assert!((g.spheres[0].radius() - o.covalent_radius * 0.5).abs() < 1e-6);
        assert_eq!(g.sphere_sources[2], InstanceSource::Atom(2));
        // Centered on the atom bounds.
        assert!((g.offset - Vec3::new(-10.5, -0.5, 0.0)).length() < 1e-6);
        assert!(g.bounds.contains(Vec3::ZERO));
    }

    #[test]
    fn wireframe_has_no_spheres_and_atom_colored_halves() {
        let g = build_geometry(&water(), DisplayModel::Wireframe, &options());
        assert!(g.spheres.is_empty());
        assert_eq!(g.cylinders.len(), 2);
        let c = g.cylinders[0];
        assert_eq!(c.radius(), options().geometry.wire_radius);
        let o = element::lookup("O").color_f32();
        assert_eq!([c.color_a[0], c.color_a[1], c.color_a[2]], o);
    }

    #[test]
    fn van_der_waals_has_no_bonds() {
        let g = build_geometry(&water(), DisplayModel::VanDerWaals, &options());
        assert_eq!(g.spheres.len(), 3);
        assert!(g.cylinders.is_empty());
        let h = element::lookup("H");
        assert!((g.spheres[1].radius() - h.vdw_radius).abs() < 1e-6);
    }

    #[test]
    fn cartoon_without_alpha_carbons_is_empty() {
        let g = build_geometry(&water(), DisplayModel::Cartoon, &options());
        assert!(g.is_empty());
        assert!(g.key_light_only);
        assert!(!g.bounds.is_empty());
    }

    #[test]
    fn cartoon_follows_the_ca_trace() {
        let model = LoadedModel::Molecule(Molecule {
            name: "peptide".into(),
            atoms: (0..4)
                .map(|i| atom("CA", "C", Vec3::new(i as f32 * 3.8, 0.0, 0.0)))
                .collect(),
            bonds: vec![],
        });
        let g = build_geometry(&model, DisplayModel::Cartoon, &options());
        assert_eq!(g.meshes.len(), 1);
        assert!(g.spheres.is_empty());
        assert!(g.bounds.size().x > 11.0);
    }

    #[test]
    fn primitives_are_drawn_verbatim() {
        let model = LoadedModel::Primitives(Primitives {
            name: "rep".into(),
            spheres: vec![SpherePrimitive {
                center: Vec3::new(5.0, 5.0, 5.0),
                radius: 2.0,
                color: [1.0, 0.0, 0.0, 1.0],
            }],
            cylinders: vec![CylinderPrimitive {
                origin: Vec3::ZERO,
                extremity: Vec3::new(0.0, 4.0, 0.0),
                radius: 0.5,
                color: [0.0, 0.0, 1.0, 1.0],
            }],
        });
        let g = build_geometry(&model, DisplayModel::Wireframe, &options());
        assert_eq!(g.spheres[0].position(), Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(g.sphere_sources, vec![InstanceSource::Primitive(0)]);
        assert!((g.cylinders[0].length() - 4.0).abs() < 1e-6);
        assert_eq!(g.offset, Vec3::ZERO);
    }

    #[test]
    fn bounds_helper_adds_twelve_edges() {
        let mut o = options();
        o.display.show_bounds = true;
        let g = build_geometry(&water(), DisplayModel::VanDerWaals, &o);
        assert_eq!(g.cylinders.len(), 12);
    }

    #[test]
    fn surface_mesh_keeps_file_coordinates() {
        let model = LoadedModel::Surface(SurfaceMesh {
            name: "tri".into(),
            positions: vec![
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(5.0, 0.0, 0.0),
                Vec3::new(4.0, 1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 3],
            indices: vec![0, 1, 2],
        });
        let g = build_geometry(&model, DisplayModel::BallsAndSticks, &options());
        assert!(g.spheres.is_empty());
        assert_eq!(g.meshes[0].vertices[0].position, [4.0, 0.0, 0.0]);
        assert_eq!(g.meshes[0].vertices[0].color, options().colors.surface);
    }
}
