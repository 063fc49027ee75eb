//! Loaded model data and the file parsers that produce it.
//!
//! Three kinds of model can be shown:
//!
//! - [`Molecule`]: atoms and bonds from a PDB file
//! - [`SurfaceMesh`]: a molecular surface from an OBJ or STL file
//! - [`Primitives`]: spheres and cylinders from a JSON representation
//!
//! [`load_path`] and [`parse_bytes`] pick the parser from the file
//! extension and return a [`LoadedModel`].

mod bonds;
pub mod element;
pub mod obj;
pub mod pdb;
pub mod primitives;
pub mod stl;

use std::path::Path;

use glam::Vec3;

pub use self::bonds::infer_bonds;
pub use self::primitives::{CylinderPrimitive, Primitives, SpherePrimitive};
use crate::error::MolvisError;
use crate::scene::bounds::Aabb;

/// A single atom record.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number from the source file.
    pub serial: u32,
    /// Atom name (`"CA"`, `"O1"`).
    pub name: String,
    /// Residue name (`"ALA"`, `"HOH"`), empty for small molecules.
    pub residue: String,
    /// Chain identifier, `' '` when absent.
    pub chain: char,
    /// Residue sequence number.
    pub residue_seq: i32,
    /// Position in Å, as written in the file.
    pub position: Vec3,
    /// Capitalized element symbol.
    pub symbol: String,
}

/// A bond between two atoms, stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bond {
    /// Lower atom index.
    pub a: u32,
    /// Higher atom index.
    pub b: u32,
}

impl Bond {
    /// Build a bond with its endpoints ordered. Returns `None` for self
    /// bonds.
    #[must_use]
    pub fn new(i: u32, j: u32) -> Option<Self> {
        match i.cmp(&j) {
            std::cmp::Ordering::Less => Some(Self { a: i, b: j }),
            std::cmp::Ordering::Greater => Some(Self { a: j, b: i }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Atoms and bonds of one structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    /// Display name (file stem).
    pub name: String,
    /// Atoms in file order.
    pub atoms: Vec<Atom>,
    /// Unique bonds.
    pub bonds: Vec<Bond>,
}

impl Molecule {
    /// Axis-aligned bounds of the atom centers.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.atoms.iter().map(|a| a.position))
    }

    /// Indices of atoms whose element matches `symbol` (case-insensitive).
    #[must_use]
    pub fn atoms_with_symbol(&self, symbol: &str) -> Vec<u32> {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, a)| a.symbol.eq_ignore_ascii_case(symbol))
            .map(|(i, _)| i as u32)
            .collect()
    }

    /// Alpha-carbon positions grouped by chain, in file order.
    ///
    /// Chains with fewer than two CA atoms are dropped.
    #[must_use]
    pub fn ca_trace(&self) -> Vec<Vec<Vec3>> {
        let mut chains: Vec<(char, Vec<Vec3>)> = Vec::new();
        for atom in self.atoms.iter().filter(|a| a.name == "CA" && a.symbol == "C")
        {
            match chains.last_mut() {
                Some((chain, points)) if *chain == atom.chain => {
                    points.push(atom.position);
                }
                _ => chains.push((atom.chain, vec![atom.position])),
            }
        }
        chains
            .into_iter()
            .map(|(_, points)| points)
            .filter(|points| points.len() >= 2)
            .collect()
    }
}

/// A triangle mesh read from OBJ or STL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    /// Display name (object name or file stem).
    pub name: String,
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex unit normals, same length as `positions`.
    pub normals: Vec<Vec3>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    /// Axis-aligned bounds of all vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().copied())
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Replace the normals with area-weighted vertex normals.
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (Some(pa), Some(pb), Some(pc)) = (
                self.positions.get(a),
                self.positions.get(b),
                self.positions.get(c),
            ) else {
                continue;
            };
            // Unnormalized cross product weights by triangle area.
            let n = (*pb - *pa).cross(*pc - *pa);
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
        }
        self.normals = normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect();
    }
}

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    /// Protein Data Bank text format.
    Pdb,
    /// Wavefront OBJ surface.
    Obj,
    /// STL surface (ASCII or binary).
    Stl,
    /// JSON list of spheres and cylinders.
    Json,
}

impl ModelFormat {
    /// Pick a format from a file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::UnsupportedFormat`] for any other extension.
    pub fn from_extension(ext: &str) -> Result<Self, MolvisError> {
        match ext.to_ascii_lowercase().as_str() {
            "pdb" | "ent" => Ok(Self::Pdb),
            "obj" => Ok(Self::Obj),
            "stl" => Ok(Self::Stl),
            "json" => Ok(Self::Json),
            other => Err(MolvisError::UnsupportedFormat(other.to_owned())),
        }
    }

    /// Pick a format from a path or URL.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::UnsupportedFormat`] when the extension is
    /// missing or unknown.
    pub fn from_path(path: &Path) -> Result<Self, MolvisError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                MolvisError::UnsupportedFormat(path.display().to_string())
            })?;
        Self::from_extension(ext)
    }

    /// Pick a format from a bare file name such as `"1wxr.pdb"`.
    ///
    /// # Errors
    ///
    /// See [`ModelFormat::from_path`].
    pub fn from_name(name: &str) -> Result<Self, MolvisError> {
        Self::from_path(Path::new(name))
    }

    /// Whether atoms of this format can be searched and restyled.
    #[must_use]
    pub fn is_molecular(self) -> bool {
        matches!(self, Self::Pdb)
    }
}

/// The result of loading any supported file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedModel {
    /// Atoms and bonds.
    Molecule(Molecule),
    /// Triangle surface.
    Surface(SurfaceMesh),
    /// Explicit spheres and cylinders.
    Primitives(Primitives),
}

impl LoadedModel {
    /// Display name of the model.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Molecule(m) => &m.name,
            Self::Surface(s) => &s.name,
            Self::Primitives(p) => &p.name,
        }
    }

    /// Bounds of everything the model draws.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        match self {
            Self::Molecule(m) => m.bounds(),
            Self::Surface(s) => s.bounds(),
            Self::Primitives(p) => p.bounds(),
        }
    }

    /// The molecule, if this model is one.
    #[must_use]
    pub fn as_molecule(&self) -> Option<&Molecule> {
        match self {
            Self::Molecule(m) => Some(m),
            _ => None,
        }
    }
}

/// Parsing switches that are not part of the file itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadSettings {
    /// Infer bonds by distance when a PDB file has no `CONECT` records.
    pub infer_bonds: bool,
    /// Extra distance (Å) on top of the covalent radii sum.
    pub bond_tolerance: f32,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            infer_bonds: true,
            bond_tolerance: 0.45,
        }
    }
}

/// Read and parse a model file, choosing the parser by extension.
///
/// # Errors
///
/// Fails when the extension is unsupported, the file cannot be read, or
/// its contents do not parse.
pub fn load_path(
    path: &Path,
    settings: &LoadSettings,
) -> Result<LoadedModel, MolvisError> {
    let format = ModelFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");
    log::info!("loading {} ({} bytes)", path.display(), bytes.len());
    parse_bytes(format, name, &bytes, settings)
}

/// Parse in-memory file contents.
///
/// # Errors
///
/// Fails when the bytes are not valid for `format`.
pub fn parse_bytes(
    format: ModelFormat,
    name: &str,
    bytes: &[u8],
    settings: &LoadSettings,
) -> Result<LoadedModel, MolvisError> {
    let model = match format {
        ModelFormat::Pdb => {
            let text = utf8(bytes)?;
            LoadedModel::Molecule(pdb::parse(name, text, settings)?)
        }
        ModelFormat::Obj => LoadedModel::Surface(obj::parse(name, utf8(bytes)?)?),
        ModelFormat::Stl => LoadedModel::Surface(stl::parse(name, bytes)?),
        ModelFormat::Json => {
            LoadedModel::Primitives(primitives::parse(name, utf8(bytes)?)?)
        }
    };
    Ok(model)
}

fn utf8(bytes: &[u8]) -> Result<&str, MolvisError> {
    std::str::from_utf8(bytes)
        .map_err(|e| MolvisError::StructureLoad(format!("not UTF-8 text: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str, chain: char, position: Vec3) -> Atom {
        Atom {
            serial: 0,
            name: name.into(),
            residue: "ALA".into(),
            chain,
            residue_seq: 1,
            position,
            symbol: "C".into(),
        }
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ModelFormat::from_name("1wxr.PDB").unwrap(), ModelFormat::Pdb);
        assert_eq!(ModelFormat::from_name("2ptc.obj").unwrap(), ModelFormat::Obj);
        assert_eq!(ModelFormat::from_name("2ptc.stl").unwrap(), ModelFormat::Stl);
        assert_eq!(
            ModelFormat::from_name("rep.json").unwrap(),
            ModelFormat::Json
        );
        assert!(matches!(
            ModelFormat::from_name("mol.xyz"),
            Err(MolvisError::UnsupportedFormat(_))
        ));
        assert!(ModelFormat::from_name("noext").is_err());
    }

    #[test]
    fn bond_orders_endpoints() {
        assert_eq!(Bond::new(5, 2), Some(Bond { a: 2, b: 5 }));
        assert_eq!(Bond::new(3, 3), None);
    }

    #[test]
    fn ca_trace_splits_chains() {
        let mol = Molecule {
            name: "t".into(),
            atoms: vec![
                atom("CA", 'A', Vec3::ZERO),
                atom("CB", 'A', Vec3::X),
                atom("CA", 'A', Vec3::Y),
                atom("CA", 'B', Vec3::Z),
                atom("CA", 'C', Vec3::ONE),
                atom("CA", 'C', Vec3::NEG_ONE),
            ],
            bonds: vec![],
        };
        let trace = mol.ca_trace();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0], vec![Vec3::ZERO, Vec3::Y]);
        assert_eq!(trace[1], vec![Vec3::ONE, Vec3::NEG_ONE]);
    }

    #[test]
    fn recompute_normals_for_flat_quad() {
        let mut mesh = SurfaceMesh {
            name: "quad".into(),
            positions: vec![
                Vec3::ZERO,
                Vec3::X,
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::Y,
            ],
            normals: vec![],
            indices: vec![0, 1, 2, 0, 2, 3],
        };
        mesh.recompute_normals();
        assert_eq!(mesh.normals.len(), 4);
        for n in &mesh.normals {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn load_path_reads_pdb_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("water.pdb");
        std::fs::write(
            &path,
            "HETATM    1  O   HOH A   1       0.000   0.000   0.000  1.00  0.00           O\n\
             HETATM    2  H1  HOH A   1       0.957   0.000   0.000  1.00  0.00           H\n\
             HETATM    3  H2  HOH A   1      -0.240   0.927   0.000  1.00  0.00           H\n",
        )
        .unwrap();
        let model = load_path(&path, &LoadSettings::default()).unwrap();
        let mol = model.as_molecule().unwrap();
        assert_eq!(mol.name, "water");
        assert_eq!(mol.atoms.len(), 3);
        // No CONECT records, so O-H bonds are inferred.
        assert_eq!(mol.bonds.len(), 2);
    }
}
