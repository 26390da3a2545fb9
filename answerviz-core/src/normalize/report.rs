use std::fmt;

/// What the sanitizer did to one input location.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepairKind {
    /// Missing or unusable value replaced by the field default.
    Defaulted,
    /// Numeric value pulled into range (or rounded to an integer).
    Clamped { original: f64, value: f64 },
    /// Entry discarded entirely.
    Dropped { reason: String },
    /// Identifier changed to keep layer ids unique.
    Renamed { original: String, value: String },
    /// No usable layers survived; the default scene was installed.
    FallbackScene,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Repair {
    /// JSON-path-like location in the input, e.g. `$.visualization.layers[0].props.x`.
    pub path: String,
    #[serde(flatten)]
    pub kind: RepairKind,
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RepairKind::Defaulted => write!(f, "{}: defaulted", self.path),
            RepairKind::Clamped { original, value } => {
                write!(f, "{}: {original} -> {value}", self.path)
            }
            RepairKind::Dropped { reason } => write!(f, "{}: dropped ({reason})", self.path),
            RepairKind::Renamed { original, value } => {
                write!(f, "{}: id '{original}' -> '{value}'", self.path)
            }
            RepairKind::FallbackScene => write!(f, "{}: default scene installed", self.path),
        }
    }
}

/// Every deviation between a candidate and the visualization produced from it.
///
/// An already-canonical candidate yields an empty report.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct SanitizeReport {
    pub repairs: Vec<Repair>,
}

impl SanitizeReport {
    pub fn len(&self) -> usize {
        self.repairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Repair> {
        self.repairs.iter()
    }

    pub fn at(&self, path: &str) -> impl Iterator<Item = &Repair> {
        self.repairs.iter().filter(move |r| r.path == path)
    }
}

impl fmt::Display for SanitizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.repairs.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{r}")?;
        }
        Ok(())
    }
}
