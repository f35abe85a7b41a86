//! Free-flying camera with Euler-angle orientation.
//!
//! Yaw and pitch are stored in degrees; the look direction is derived from
//! them on demand. Movement commands step the position relative to the
//! current facing by a fixed speed per command.

use nalgebra::{Matrix4, Point3, Vector3};

/// World up axis. Shared by the view matrix and the strafe direction.
const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

/// Pitch limit in degrees; keeps the look direction off the poles.
const PITCH_LIMIT: f32 = 89.0;

#[derive(Debug, Clone)]
pub(crate) struct Camera {
    pub(crate) position: Point3<f32>,
    /// Horizontal look angle in degrees.
    pub(crate) yaw: f32,
    /// Vertical look angle in degrees, always within [-89, 89].
    pub(crate) pitch: f32,
    /// Distance covered by one move command.
    pub(crate) speed: f32,
    /// Degrees of rotation per unit of rotate-command delta.
    pub(crate) sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
            speed: 0.15,
            sensitivity: 2.0,
        }
    }
}

impl Camera {
    /// Unit look direction derived from yaw and pitch.
    pub(crate) fn front(&self) -> Vector3<f32> {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    /// Unit strafe direction, orthogonal to both the look direction and
    /// world up even when the camera is pitched.
    fn right(&self) -> Vector3<f32> {
        self.front().cross(&WORLD_UP).normalize()
    }

    pub(crate) fn move_forward(&mut self) {
        self.position += self.front() * self.speed;
    }

    pub(crate) fn move_backward(&mut self) {
        self.position -= self.front() * self.speed;
    }

    pub(crate) fn move_left(&mut self) {
        self.position -= self.right() * self.speed;
    }

    pub(crate) fn move_right(&mut self) {
        self.position += self.right() * self.speed;
    }

    /// Applies a rotation step. Vertical input decreases pitch, so a
    /// negative `dy` looks up. Pitch is clamped afterwards.
    pub(crate) fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub(crate) fn view_matrix(&self) -> Matrix4<f32> {
        let target = self.position + self.front();
        Matrix4::look_at_rh(&self.position, &target, &WORLD_UP)
    }
}

/// Perspective projection parameters. The aspect ratio is a fixed
/// render-target constant and does not track viewport resizes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Projection {
    pub(crate) aspect: f32,
    pub(crate) fovy: f32,
    pub(crate) znear: f32,
    pub(crate) zfar: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            aspect: 1024.0 / 768.0,
            fovy: std::f32::consts::FRAC_PI_2,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl Projection {
    pub(crate) fn build_projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fovy, self.znear, self.zfar)
    }
}

/// Per-frame camera matrices in GPU layout, column-major.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct FrameUniforms {
    pub(crate) view: [[f32; 4]; 4],
    pub(crate) proj: [[f32; 4]; 4],
}

impl FrameUniforms {
    pub(crate) fn new(camera: &Camera, projection: &Projection) -> Self {
        Self {
            view: camera.view_matrix().into(),
            proj: projection.build_projection_matrix().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn vec_approx_eq(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).norm() < 1e-4
    }

    #[test]
    fn front_is_unit_length_for_all_orientations() {
        let mut camera = Camera::default();
        for yaw in (-360..=360).step_by(15) {
            for pitch in (-89..=89).step_by(11) {
                camera.yaw = yaw as f32;
                camera.pitch = pitch as f32;
                assert!((camera.front().norm() - 1.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn initial_front_looks_down_negative_z() {
        let camera = Camera::default();
        assert!(vec_approx_eq(camera.front(), Vector3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn pitch_stays_clamped() {
        let mut camera = Camera::default();
        for _ in 0..200 {
            camera.rotate(0.0, -5.0);
        }
        assert!((camera.pitch - 89.0).abs() < EPS);
        for _ in 0..400 {
            camera.rotate(0.0, 5.0);
        }
        assert!((camera.pitch + 89.0).abs() < EPS);
    }

    #[test]
    fn strafe_round_trip_restores_position() {
        let mut camera = Camera::default();
        camera.rotate(3.0, -2.0);
        let start = camera.position;
        camera.move_left();
        camera.move_right();
        assert!((camera.position - start).norm() < 1e-4);
    }

    #[test]
    fn rotate_scenario_turns_front_to_positive_x() {
        let mut camera = Camera::default();
        camera.rotate(45.0, 0.0);
        assert!((camera.yaw - 0.0).abs() < EPS);
        assert!(vec_approx_eq(camera.front(), Vector3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn view_matrix_maps_camera_position_to_origin() {
        let mut camera = Camera::default();
        camera.position = Point3::new(1.5, -2.0, 4.0);
        camera.rotate(17.0, 4.0);
        let eye_in_view = camera.view_matrix().transform_point(&camera.position);
        assert!(eye_in_view.coords.norm() < 1e-4);
    }

    #[test]
    fn forward_then_backward_round_trip() {
        let mut camera = Camera::default();
        camera.rotate(-7.0, 3.0);
        let start = camera.position;
        camera.move_forward();
        camera.move_backward();
        assert!((camera.position - start).norm() < 1e-4);
    }
}
