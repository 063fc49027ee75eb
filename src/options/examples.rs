use serde::{Deserialize, Serialize};

/// Example models offered in the panel, as paths relative to `base`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExampleOptions {
    /// Directory or URL prefix the example paths are relative to.
    pub base: String,
    /// PDB examples.
    pub pdb: Vec<String>,
    /// STL examples.
    pub stl: Vec<String>,
    /// OBJ examples.
    pub obj: Vec<String>,
}

impl Default for ExampleOptions {
    fn default() -> Self {
        let surfaces = |ext: &str| {
            ["1c4k-60k", "2h1l-200k", "2lzx-80k", "2ptc-74k", "6ds5-170k"]
                .iter()
                .map(|stem| format!("models/{ext}/{stem}.{ext}"))
                .collect()
        };
        Self {
            base: "assets".into(),
            pdb: vec![
                "models/pdb/caffeine.pdb".into(),
                "models/pdb/1wxr.pdb".into(),
            ],
            stl: surfaces("stl"),
            obj: surfaces("obj"),
        }
    }
}

impl ExampleOptions {
    /// Every example path, PDB first.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.pdb
            .iter()
            .chain(&self.stl)
            .chain(&self.obj)
            .map(String::as_str)
    }

    /// Whether `path` is one of the listed examples.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.all().any(|p| p == path)
    }

    /// Resolve an example path against `base`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        if self.base.is_empty() {
            path.to_owned()
        } else {
            format!("{}/{path}", self.base.trim_end_matches('/'))
        }
    }
}
