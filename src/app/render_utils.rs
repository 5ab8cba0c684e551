use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::scaffold::SlotPos;

/// Design-space size of one scaffold panel; lattice coordinates live in
/// this box and get scaled uniformly into whatever rect the panel has.
pub(super) const SCAFFOLD_WIDTH: f32 = 570.0;
pub(super) const SCAFFOLD_HEIGHT: f32 = 370.0;

pub(super) const SLOT_RADIUS: f32 = 20.0;
pub(super) const MARKER_RADIUS: f32 = SLOT_RADIUS / 4.0;

#[derive(Clone, Copy, Debug)]
pub(super) struct PanelTransform {
    pub scale: f32,
    pub offset: Vec2,
}

impl PanelTransform {
    /// Uniform fit of the design space into `rect`, centered.
    pub fn fit(rect: Rect) -> Self {
        let scale = (rect.width() / SCAFFOLD_WIDTH)
            .min(rect.height() / SCAFFOLD_HEIGHT)
            .max(f32::EPSILON);
        let offset = rect.min.to_vec2()
            + vec2(
                (rect.width() - SCAFFOLD_WIDTH * scale) / 2.0,
                (rect.height() - SCAFFOLD_HEIGHT * scale) / 2.0,
            );
        Self { scale, offset }
    }

    pub fn to_screen(&self, pos: SlotPos) -> Pos2 {
        pos2(pos.x * self.scale, pos.y * self.scale) + self.offset
    }

    pub fn to_lattice(&self, screen: Pos2) -> SlotPos {
        let local = (screen - self.offset) / self.scale;
        SlotPos {
            x: local.x,
            y: local.y,
        }
    }
}

/// Sideways shift for an arrow so the two opposing linkages between the
/// same slot pair do not overlap; K63 shifts to one side, K48 the other.
pub(super) fn perpendicular_offset(a: Pos2, b: Pos2, side: f32, amount: f32) -> Vec2 {
    let delta = b - a;
    let length = delta.length().max(f32::EPSILON);
    vec2(-delta.y / length, delta.x / length) * side * amount
}

/// Midpoint arrowhead for the segment a -> b.
pub(super) fn arrowhead(a: Pos2, b: Pos2, length: f32) -> [Pos2; 3] {
    let mid = pos2((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    let angle = (b.y - a.y).atan2(b.x - a.x);
    let left = angle - std::f32::consts::FRAC_PI_6;
    let right = angle + std::f32::consts::FRAC_PI_6;
    [
        mid,
        pos2(mid.x - length * left.cos(), mid.y - length * left.sin()),
        pos2(mid.x - length * right.cos(), mid.y - length * right.sin()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_round_trips_between_lattice_and_screen() {
        let rect = Rect::from_min_size(pos2(10.0, 20.0), vec2(285.0, 300.0));
        let transform = PanelTransform::fit(rect);

        let pos = SlotPos { x: 300.0, y: 300.0 };
        let back = transform.to_lattice(transform.to_screen(pos));
        assert!((back.x - pos.x).abs() < 1e-3);
        assert!((back.y - pos.y).abs() < 1e-3);
    }

    #[test]
    fn perpendicular_offset_flips_with_side() {
        let a = pos2(0.0, 0.0);
        let b = pos2(10.0, 0.0);
        let up = perpendicular_offset(a, b, 1.0, 5.0);
        let down = perpendicular_offset(a, b, -1.0, 5.0);
        assert!((up + down).length() < 1e-6);
        assert!((up.length() - 5.0).abs() < 1e-4);
    }
}
