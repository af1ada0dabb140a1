use serde::{Deserialize, Serialize};
use std::fmt;

/// Achievement tier reached by a participant, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Milestone {
    #[default]
    None,
    M1,
    M2,
    M3,
    M4,
}

impl Milestone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Milestone::None => "None",
            Milestone::M1 => "M1",
            Milestone::M2 => "M2",
            Milestone::M3 => "M3",
            Milestone::M4 => "M4",
        }
    }

    /// Parses the labels used by the leaderboard API and the exported data
    /// files. Unknown labels fall back to `None`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "m1" | "milestone 1" => Milestone::M1,
            "m2" | "milestone 2" => Milestone::M2,
            "m3" | "milestone 3" => Milestone::M3,
            "m4" | "milestone 4" | "ultimate milestone" => Milestone::M4,
            _ => Milestone::None,
        }
    }

    pub fn next(&self) -> Option<Milestone> {
        match self {
            Milestone::None => Some(Milestone::M1),
            Milestone::M1 => Some(Milestone::M2),
            Milestone::M2 => Some(Milestone::M3),
            Milestone::M3 => Some(Milestone::M4),
            Milestone::M4 => None,
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
