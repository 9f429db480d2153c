use strum::{Display, EnumString, IntoStaticStr};

/// Processing state of a single unit on a canvassing route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum UnitStatus {
    #[default]
    NotProcessed,
    NotReached,
    NotInterested,
    Interested,
    Written,
}

impl UnitStatus {
    /// Parse the spellings found in spreadsheet exports
    /// (german labels, english labels and the canonical names).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return Some(Self::default());
        }
        if let Ok(status) = label.parse() {
            return Some(status);
        }
        let status = match label.as_str() {
            "nicht bearbeitet" | "offen" | "not processed" | "open" => Self::NotProcessed,
            "nicht angetroffen" | "nicht erreicht" | "not reached" | "not home" => {
                Self::NotReached
            }
            "kein interesse" | "not interested" => Self::NotInterested,
            "interesse" | "interessiert" | "interested" => Self::Interested,
            "geschrieben" | "abgeschlossen" | "written" | "signed" => Self::Written,
            _ => return None,
        };
        Some(status)
    }
}

/// A single residential or commercial entity within a street address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Unit {
    pub status: UnitStatus,
    /// Floor
    pub etage: Option<String>,
    /// Position on the floor
    pub lage: Option<String>,
    pub notiz: Option<String>,
}

impl Unit {
    /// Units of the same address are told apart by floor and position.
    pub fn signature(&self) -> UnitSignature {
        UnitSignature::new(self.etage.as_deref(), self.lage.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UnitSignature {
    pub etage: String,
    pub lage: String,
}

impl UnitSignature {
    pub fn new(etage: Option<&str>, lage: Option<&str>) -> Self {
        let canonical = |s: Option<&str>| {
            s.map(|s| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
                .unwrap_or_default()
        };
        Self {
            etage: canonical(etage),
            lage: canonical(lage),
        }
    }
}
