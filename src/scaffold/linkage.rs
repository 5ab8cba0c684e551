use super::lattice::SlotPos;

/// The two lysine linkages the lattice can express directionally: K48
/// extends leftward and up (drawn red), K63 rightward and up (drawn blue).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Linkage {
    K48,
    K63,
}

impl Linkage {
    pub fn label(self) -> &'static str {
        match self {
            Self::K48 => "K48",
            Self::K63 => "K63",
        }
    }

    /// Maps a branching-site name to the linkage it extends along. The
    /// rest of the site vocabulary (M1, K6, K11, K27, K29, K33) is
    /// accepted in chain trees but never produces a placement.
    pub fn from_site(site: &str) -> Option<Self> {
        match site {
            "K48" => Some(Self::K48),
            "K63" => Some(Self::K63),
            _ => None,
        }
    }

    /// The sole translation from lattice geometry to chemical identity:
    /// a target left of its source is a K48 linkage, anything else K63.
    /// Shared by the interactive builder and the tree layout so both
    /// produce indistinguishable arrows.
    pub fn classify(source: SlotPos, target: SlotPos) -> Self {
        if target.x < source.x {
            Self::K48
        } else {
            Self::K63
        }
    }

    /// Sign of the horizontal step this linkage takes on the lattice.
    pub fn direction(self) -> f32 {
        match self {
            Self::K48 => -1.0,
            Self::K63 => 1.0,
        }
    }
}

/// Protecting-group tags a branch site can carry instead of a nested chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtectKind {
    Aboc,
    Smac,
}
