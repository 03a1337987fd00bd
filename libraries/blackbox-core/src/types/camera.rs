/// Camera slot identifiers
use serde::{Deserialize, Serialize};

/// Camera slot of a channel within a recording session
///
/// Unique per session: loading a second channel at the same position
/// replaces the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraPosition {
    Front,
    Rear,
    Left,
    Right,
    Interior,
}

impl CameraPosition {
    /// All positions in display order
    pub const ALL: [CameraPosition; 5] = [
        Self::Front,
        Self::Rear,
        Self::Left,
        Self::Right,
        Self::Interior,
    ];

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Rear => "rear",
            Self::Left => "left",
            Self::Right => "right",
            Self::Interior => "interior",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "front" => Some(Self::Front),
            "rear" => Some(Self::Rear),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "interior" => Some(Self::Interior),
            _ => None,
        }
    }

    /// Human-readable label
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Front => "Front",
            Self::Rear => "Rear",
            Self::Left => "Left Side",
            Self::Right => "Right Side",
            Self::Interior => "Interior",
        }
    }
}

impl std::fmt::Display for CameraPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
