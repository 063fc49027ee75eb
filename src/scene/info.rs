//! Text shown when an atom is clicked.

use glam::Vec3;

/// Everything the info panel shows about one picked instance.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomInfo {
    /// Position as written in the source file.
    pub position: Vec3,
    /// Base color, 0-255 per channel.
    pub color: [u8; 3],
    /// Element symbol (`None` for JSON primitives).
    pub symbol: Option<String>,
    /// Atom name, or `sphere #i` for primitives.
    pub name: String,
    /// Residue name and sequence number, empty when unknown.
    pub residue: String,
}

fn trim_float(v: f32) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

impl AtomInfo {
    /// Ordered `(label, value)` rows for the panel.
    #[must_use]
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            (
                "Position",
                format!(
                    "( {}, {}, {} )",
                    trim_float(self.position.x),
                    trim_float(self.position.y),
                    trim_float(self.position.z)
                ),
            ),
            (
                "Color",
                format!("{}, {}, {}", self.color[0], self.color[1], self.color[2]),
            ),
        ];
        if let Some(symbol) = &self.symbol {
            rows.push(("Periodic Table Symbol", symbol.clone()));
        }
        rows
    }

    /// Rows as a JSON object for web hosts.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .rows()
            .into_iter()
            .map(|(k, v)| (k.to_owned(), serde_json::Value::String(v)))
            .collect();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_panel_order() {
        let info = AtomInfo {
            position: Vec3::new(1.5, -0.25, 3.0),
            color: [144, 144, 144],
            symbol: Some("C".into()),
            name: "C1".into(),
            residue: String::new(),
        };
        let rows = info.rows();
        assert_eq!(rows[0], ("Position", "( 1.5, -0.25, 3 )".to_owned()));
        assert_eq!(rows[1], ("Color", "144, 144, 144".to_owned()));
        assert_eq!(rows[2], ("Periodic Table Symbol", "C".to_owned()));
        assert_eq!(info.to_json()["Color"], "144, 144, 144");
    }

    #[test]
    fn primitives_have_no_symbol_row() {
        let info = AtomInfo {
            position: Vec3::ZERO,
            color: [255, 0, 0],
            symbol: None,
            name: "sphere #0".into(),
            residue: String::new(),
        };
        assert_eq!(info.rows().len(), 2);
        assert_eq!(info.rows()[0].1, "( 0, 0, 0 )");
    }
}
