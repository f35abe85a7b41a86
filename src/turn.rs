//! Rotation state for the turnable middle layer.

use nalgebra::{Matrix4, Vector3};

/// Angle added or removed by one turn command, in radians.
pub(crate) const TURN_STEP: f32 = std::f32::consts::FRAC_PI_8;

/// Accumulated rotation of the middle layer about the vertical axis.
///
/// The angle is continuous and unbounded: turns are not snapped to quarter
/// increments, and wrap-around happens implicitly through trigonometric
/// periodicity. Positive angles rotate right-handed about +Y, so at +90
/// degrees the grid point (1, 0, 0) lands on (0, 0, -1).
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LayerTurn {
    pub(crate) angle: f32,
}

impl LayerTurn {
    pub(crate) fn turn_left(&mut self) {
        self.angle += TURN_STEP;
    }

    pub(crate) fn turn_right(&mut self) {
        self.angle -= TURN_STEP;
    }

    /// Rotation matrix for the layer's current angle.
    pub(crate) fn rotation(&self) -> Matrix4<f32> {
        Matrix4::from_axis_angle(&Vector3::y_axis(), self.angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    #[test]
    fn opposite_turns_cancel_exactly() {
        let mut turn = LayerTurn::default();
        turn.turn_left();
        turn.turn_right();
        assert_eq!(turn.angle, 0.0);

        turn.turn_right();
        turn.turn_left();
        assert_eq!(turn.angle, 0.0);
    }

    #[test]
    fn four_left_turns_make_a_quarter_rotation() {
        let mut turn = LayerTurn::default();
        for _ in 0..4 {
            turn.turn_left();
        }
        assert!((turn.angle - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn quarter_rotation_maps_x_axis_to_negative_z() {
        let mut turn = LayerTurn::default();
        for _ in 0..4 {
            turn.turn_left();
        }
        let rotated = turn.rotation().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((rotated - Point3::new(0.0, 0.0, -1.0)).norm() < EPS);
    }

    #[test]
    fn angle_accumulates_without_bound() {
        let mut turn = LayerTurn::default();
        for _ in 0..32 {
            turn.turn_left();
        }
        assert!((turn.angle - 32.0 * TURN_STEP).abs() < EPS);
    }
}
