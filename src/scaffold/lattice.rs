/// Vertical spacing between layers; layers above the root have smaller y.
pub const LAYER_STEP: f32 = 50.0;
/// Horizontal spacing between siblings within one layer.
pub const SIBLING_STEP: f32 = 100.0;
/// Widest horizontal reach allowed for a placement one layer up.
pub const ADJACENT_SPAN: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotPos {
    pub x: f32,
    pub y: f32,
}

/// The fixed grid of placement slots shared by every scaffold panel.
///
/// Five layers of 1-2-3-4-5 slots going upward ("upward" is strictly
/// decreasing y), with each slot wired to the one or two slots diagonally
/// above it. The grid never changes after construction; the builder, the
/// tree layout, and the renderer all share one instance read-only.
#[derive(Clone, Debug)]
pub struct LatticeGraph {
    positions: Vec<SlotPos>,
    edges: Vec<(usize, usize)>,
    root_y: f32,
}

impl LatticeGraph {
    /// The standard pentamer lattice: 15 slots, root at (300, 300).
    pub fn pentamer() -> Self {
        Self::with_layers(5, SlotPos { x: 300.0, y: 300.0 })
    }

    fn with_layers(layers: usize, root: SlotPos) -> Self {
        let mut positions = Vec::new();
        for layer in 0..layers {
            let y = root.y - layer as f32 * LAYER_STEP;
            let leftmost = root.x - layer as f32 * (SIBLING_STEP / 2.0);
            for slot in 0..=layer {
                positions.push(SlotPos {
                    x: leftmost + slot as f32 * SIBLING_STEP,
                    y,
                });
            }
        }

        let mut edges = Vec::new();
        for (lower, lower_pos) in positions.iter().enumerate() {
            for (upper, upper_pos) in positions.iter().enumerate() {
                let one_above = (lower_pos.y - upper_pos.y - LAYER_STEP).abs() < 0.5;
                let close = (upper_pos.x - lower_pos.x).abs() < SIBLING_STEP;
                if one_above && close {
                    edges.push((lower, upper));
                }
            }
        }

        Self {
            positions,
            edges,
            root_y: root.y,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[SlotPos] {
        &self.positions
    }

    pub fn pos(&self, id: usize) -> SlotPos {
        self.positions[id]
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn adjacent(&self, a: usize, b: usize) -> bool {
        self.edges
            .iter()
            .any(|&(p, q)| (p == a && q == b) || (p == b && q == a))
    }

    pub fn neighbors(&self, id: usize) -> Vec<usize> {
        let mut out = Vec::new();
        for &(p, q) in &self.edges {
            if p == id {
                out.push(q);
            } else if q == id {
                out.push(p);
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Layer index derived from y: the root sits on layer 0.
    pub fn layer_of(&self, id: usize) -> usize {
        ((self.root_y - self.positions[id].y) / LAYER_STEP).round() as usize
    }
}
