//! Distance-based bond inference for files without connectivity records.

use glam::{IVec3, Vec3};
use rustc_hash::FxHashMap;

use super::{element, Atom, Bond};

/// Infer covalent bonds from atom distances.
///
/// Two atoms bond when their distance is at most the sum of their
/// covalent radii plus `tolerance`. Atoms are bucketed into a uniform
/// grid whose cell is the largest possible cutoff, so each atom only
/// checks the 27 surrounding cells.
#[must_use]
pub fn infer_bonds(atoms: &[Atom], tolerance: f32) -> Vec<Bond> {
    if atoms.len() < 2 {
        return Vec::new();
    }

    let radii: Vec<f32> = atoms
        .iter()
        .map(|a| element::lookup(&a.symbol).covalent_radius)
        .collect();
    let max_radius = radii.iter().copied().fold(0.0_f32, f32::max);
    let cell = (2.0 * max_radius + tolerance).max(0.1);

    let cell_of = |p: Vec3| -> IVec3 { (p / cell).floor().as_ivec3() };

    let mut grid: FxHashMap<IVec3, Vec<u32>> = FxHashMap::default();
    for (i, atom) in atoms.iter().enumerate() {
        grid.entry(cell_of(atom.position))
            .or_default()
            .push(i as u32);
    }

    let mut bonds = Vec::new();
    for (i, atom) in atoms.iter().enumerate() {
        let home = cell_of(atom.position);
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let Some(bucket) = grid.get(&(home + IVec3::new(dx, dy, dz)))
                    else {
                        continue;
                    };
                    for &j in bucket {
                        let j_idx = j as usize;
                        if j_idx <= i {
                            continue;
                        }
                        let cutoff = radii[i] + radii[j_idx] + tolerance;
                        let d2 = atom.position.distance_squared(atoms[j_idx].position);
                        if d2 > 1e-6 && d2 <= cutoff * cutoff {
                            bonds.push(Bond { a: i as u32, b: j });
                        }
                    }
                }
            }
        }
    }
    bonds.sort_unstable();
    bonds
}
