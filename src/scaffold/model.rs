use super::linkage::Linkage;

/// A realized linkage between two slots. `linkage` is `None` for the
/// neutral backbone-continuation arrows the tree layout emits, which
/// carry no chemical identity. Arrows are immutable once created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrow {
    pub from: usize,
    pub to: usize,
    pub linkage: Option<Linkage>,
}

/// Tri-state protecting-group indicator drawn near a slot. Markers are
/// purely informational and never gain arrows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerState {
    Unprotected,
    Aboc,
    Smac,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub x: f32,
    pub y: f32,
    pub state: MarkerState,
}

/// The output shape both the interactive builder and the tree layout
/// produce. The renderer pulls one snapshot of this per frame and never
/// writes back.
#[derive(Clone, Debug, PartialEq)]
pub struct AssemblyModel {
    /// Activation count per slot, indexed by slot id. 0 = untouched,
    /// 1 = primary unit placed, 2+ = reused slot.
    pub activations: Vec<u32>,
    pub arrows: Vec<Arrow>,
    pub markers: Vec<Marker>,
}

impl AssemblyModel {
    pub fn empty(slots: usize) -> Self {
        Self {
            activations: vec![0; slots],
            arrows: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn total_activation(&self) -> u32 {
        self.activations.iter().sum()
    }
}
