//! Per-element display data: CPK colors and atomic radii.
//!
//! Colors follow the Jmol CPK palette. Covalent radii are the Cordero
//! values except for H, C, N and O, which use the smaller radii the
//! ball-and-stick view was tuned with. Van der Waals radii are Bondi's.

/// Display data for one chemical element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementInfo {
    /// Capitalized periodic-table symbol (`"C"`, `"Fe"`).
    pub symbol: &'static str,
    /// CPK color as 8-bit RGB.
    pub color: [u8; 3],
    /// Covalent radius in Å.
    pub covalent_radius: f32,
    /// Van der Waals radius in Å.
    pub vdw_radius: f32,
}

impl ElementInfo {
    /// Color as linear-ish `[0, 1]` floats for instance buffers.
    #[must_use]
    pub fn color_f32(&self) -> [f32; 3] {
        [
            f32::from(self.color[0]) / 255.0,
            f32::from(self.color[1]) / 255.0,
            f32::from(self.color[2]) / 255.0,
        ]
    }
}

const fn el(
    symbol: &'static str,
    color: [u8; 3],
    covalent_radius: f32,
    vdw_radius: f32,
) -> ElementInfo {
    ElementInfo {
        symbol,
        color,
        covalent_radius,
        vdw_radius,
    }
}

/// Entry used for symbols missing from the table.
pub const UNKNOWN: ElementInfo = el("X", [255, 20, 147], 0.75, 1.5);

static ELEMENTS: &[ElementInfo] = &[
    el("H", [255, 255, 255], 0.32, 1.20),
    el("He", [217, 255, 255], 0.28, 1.40),
    el("Li", [204, 128, 255], 1.28, 1.82),
    el("Be", [194, 255, 0], 0.96, 1.53),
    el("B", [255, 181, 181], 0.84, 1.92),
    el("C", [144, 144, 144], 0.75, 1.70),
    el("N", [48, 80, 248], 0.71, 1.55),
    el("O", [255, 13, 13], 0.63, 1.52),
    el("F", [144, 224, 80], 0.57, 1.47),
    el("Ne", [179, 227, 245], 0.58, 1.54),
    el("Na", [171, 92, 242], 1.66, 2.27),
    el("Mg", [138, 255, 0], 1.41, 1.73),
    el("Al", [191, 166, 166], 1.21, 1.84),
    el("Si", [240, 200, 160], 1.11, 2.10),
    el("P", [255, 128, 0], 1.07, 1.80),
    el("S", [255, 255, 48], 1.05, 1.80),
    el("Cl", [31, 240, 31], 1.02, 1.75),
    el("Ar", [128, 209, 227], 1.06, 1.88),
    el("K", [143, 64, 212], 2.03, 2.75),
    el("Ca", [61, 255, 0], 1.76, 2.31),
    el("Sc", [230, 230, 230], 1.70, 2.11),
    el("Ti", [191, 194, 199], 1.60, 2.00),
    el("V", [166, 166, 171], 1.53, 2.00),
    el("Cr", [138, 153, 199], 1.39, 2.00),
    el("Mn", [156, 122, 199], 1.39, 2.00),
    el("Fe", [224, 102, 51], 1.32, 2.00),
    el("Co", [240, 144, 160], 1.26, 2.00),
    el("Ni", [80, 208, 80], 1.24, 1.63),
    el("Cu", [200, 128, 51], 1.32, 1.40),
    el("Zn", [125, 128, 176], 1.22, 1.39),
    el("Ga", [194, 143, 143], 1.22, 1.87),
    el("Ge", [102, 143, 143], 1.20, 2.11),
    el("As", [189, 128, 227], 1.19, 1.85),
    el("Se", [255, 161, 0], 1.20, 1.90),
    el("Br", [166, 41, 41], 1.20, 1.85),
    el("Kr", [92, 184, 209], 1.16, 2.02),
    el("Rb", [112, 46, 176], 2.20, 3.03),
    el("Sr", [0, 255, 0], 1.95, 2.49),
    el("Ag", [192, 192, 192], 1.45, 1.72),
    el("Cd", [255, 217, 143], 1.44, 1.58),
    el("Sn", [102, 128, 128], 1.39, 2.17),
    el("I", [148, 0, 148], 1.39, 1.98),
    el("Xe", [66, 158, 176], 1.40, 2.16),
    el("Cs", [87, 23, 143], 2.44, 3.43),
    el("Ba", [0, 201, 0], 2.15, 2.68),
    el("Pt", [208, 208, 224], 1.36, 1.75),
    el("Au", [255, 209, 35], 1.36, 1.66),
    el("Hg", [184, 184, 208], 1.32, 1.55),
    el("Pb", [87, 89, 97], 1.46, 2.02),
    el("U", [0, 143, 255], 1.96, 1.86),
];

/// Look up an element by symbol, ignoring case and surrounding whitespace.
#[must_use]
pub fn find(symbol: &str) -> Option<&'static ElementInfo> {
    let symbol = symbol.trim();
    ELEMENTS
        .iter()
        .find(|e| e.symbol.eq_ignore_ascii_case(symbol))
}

/// Look up an element, falling back to [`UNKNOWN`].
#[must_use]
pub fn lookup(symbol: &str) -> &'static ElementInfo {
    find(symbol).unwrap_or(&UNKNOWN)
}

/// Normalize a raw symbol to periodic-table capitalization (`"FE"` → `"Fe"`).
#[must_use]
pub fn normalize_symbol(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    chars.next().map_or_else(String::new, |first| {
        let mut out = String::with_capacity(2);
        out.push(first.to_ascii_uppercase());
        out.extend(chars.map(|c| c.to_ascii_lowercase()));
        out
    })
}
