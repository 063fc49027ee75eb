//! JSON representation of explicit spheres and cylinders.
//!
//! ```json
//! {
//!   "primitives": {
//!     "spheres":   [{ "center": [0, 0, 0], "r": 0.5 }],
//!     "cylinders": [{ "origin": [0, 0, 0], "extremity": [0, 1, 0], "r": 0.1 }]
//!   },
//!   "colors": {
//!     "sphere_colors":   ["#ff0000ff"],
//!     "cylinder_colors": ["#cccccc"]
//!   }
//! }
//! ```
//!
//! Colors pair with primitives by position; surplus entries on either side
//! are dropped.

use glam::Vec3;
use serde::Deserialize;

use crate::error::MolvisError;
use crate::scene::bounds::Aabb;

/// A sphere to draw as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpherePrimitive {
    /// Center.
    pub center: Vec3,
    /// Radius.
    pub radius: f32,
    /// RGBA color.
    pub color: [f32; 4],
}

/// A cylinder between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderPrimitive {
    /// Start of the axis.
    pub origin: Vec3,
    /// End of the axis.
    pub extremity: Vec3,
    /// Radius.
    pub radius: f32,
    /// RGBA color.
    pub color: [f32; 4],
}

/// A parsed primitives file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Primitives {
    /// Display name (file stem).
    pub name: String,
    /// Spheres in file order.
    pub spheres: Vec<SpherePrimitive>,
    /// Cylinders in file order.
    pub cylinders: Vec<CylinderPrimitive>,
}

impl Primitives {
    /// Bounds including sphere radii and cylinder endpoints grown by
    /// their radii.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::EMPTY;
        for s in &self.spheres {
            aabb.include(s.center - Vec3::splat(s.radius));
            aabb.include(s.center + Vec3::splat(s.radius));
        }
        for c in &self.cylinders {
            let r = Vec3::splat(c.radius);
            for end in [c.origin, c.extremity] {
                aabb.include(end - r);
                aabb.include(end + r);
            }
        }
        aabb
    }
}

#[derive(Deserialize)]
struct RawSphere {
    center: [f32; 3],
    r: f32,
}

#[derive(Deserialize)]
struct RawCylinder {
    origin: [f32; 3],
    extremity: [f32; 3],
    r: f32,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawPrimitives {
    spheres: Vec<RawSphere>,
    cylinders: Vec<RawCylinder>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawColors {
    sphere_colors: Vec<String>,
    cylinder_colors: Vec<String>,
}

#[derive(Deserialize)]
struct RawRepresentation {
    primitives: RawPrimitives,
    #[serde(default)]
    colors: RawColors,
}

/// Parse a hex color: `#rgb`, `#rrggbb` or `#rrggbbaa` (`#` optional).
///
/// # Errors
///
/// Returns [`MolvisError::StructureLoad`] for any other shape.
pub fn parse_hex_color(hex: &str) -> Result<[f32; 4], MolvisError> {
    let digits = hex.trim().trim_start_matches('#');
    let bad = || MolvisError::StructureLoad(format!("invalid color {hex:?}"));
    let nibble = |c: u8| -> Result<u8, MolvisError> {
        (c as char).to_digit(16).map(|d| d as u8).ok_or_else(bad)
    };
    let bytes = digits.as_bytes();
    let channels: Vec<u8> = match bytes.len() {
        3 => bytes
            .iter()
            .map(|&c| nibble(c).map(|n| n * 17))
            .collect::<Result<_, _>>()?,
        6 | 8 => bytes
            .chunks_exact(2)
            .map(|pair| -> Result<u8, MolvisError> {
                Ok(nibble(pair[0])? * 16 + nibble(pair[1])?)
            })
            .collect::<Result<_, MolvisError>>()?,
        _ => return Err(bad()),
    };
    let f = |i: usize| channels.get(i).map_or(1.0, |&v| f32::from(v) / 255.0);
    Ok([f(0), f(1), f(2), f(3)])
}

/// Parse a primitives JSON document.
///
/// # Errors
///
/// Returns [`MolvisError::StructureLoad`] for invalid JSON, a missing
/// `primitives` object, bad colors, or a document with nothing to draw.
pub fn parse(name: &str, content: &str) -> Result<Primitives, MolvisError> {
    let raw: RawRepresentation = serde_json::from_str(content)?;

    let spheres = raw
        .primitives
        .spheres
        .iter()
        .zip(&raw.colors.sphere_colors)
        .map(|(s, color)| -> Result<SpherePrimitive, MolvisError> {
            Ok(SpherePrimitive {
                center: Vec3::from_array(s.center),
                radius: s.r,
                color: parse_hex_color(color)?,
            })
        })
        .collect::<Result<Vec<_>, MolvisError>>()?;

    let cylinders = raw
        .primitives
        .cylinders
        .iter()
        .zip(&raw.colors.cylinder_colors)
        .map(|(c, color)| -> Result<CylinderPrimitive, MolvisError> {
            Ok(CylinderPrimitive {
                origin: Vec3::from_array(c.origin),
                extremity: Vec3::from_array(c.extremity),
                radius: c.r,
                color: parse_hex_color(color)?,
            })
        })
        .collect::<Result<Vec<_>, MolvisError>>()?;

    if spheres.is_empty() && cylinders.is_empty() {
        return Err(MolvisError::StructureLoad(format!(
            "{name}: no colored primitives"
        )));
    }

    log::info!(
        "{name}: {} spheres, {} cylinders",
        spheres.len(),
        cylinders.len()
    );

    Ok(Primitives {
        name: name.to_owned(),
        spheres,
        cylinders,
    })
}
