//! Scene state and per-frame transform composition.
//!
//! The scene owns the camera, the layer-turn state, and the 27 cubies, and
//! is handed explicitly to the update and render phases. Input reaches it
//! only as [`Command`] values, so the whole state machine can be driven in
//! tests without a window or GPU.

use nalgebra::{Matrix4, Vector3};

use crate::camera::Camera;
use crate::cube::{self, Cubie, CUBIE_COUNT};
use crate::renderer::CubieInstance;
use crate::turn::LayerTurn;

/// Distance between neighboring cubie centers. Slightly above the cubie
/// size so the gaps between sub-cubes stay visible.
pub(crate) const CUBIE_SPACING: f32 = 1.01;

/// Indices of the rotatable middle layer (the grid.z == 0 slab).
const TURNING_LAYER: std::ops::Range<usize> = 9..18;

/// The closed set of input commands. Input adapters translate raw events
/// into these; nothing else mutates the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Command {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Rotate { dx: f32, dy: f32 },
    TurnLeft,
    TurnRight,
}

#[derive(Debug, Clone)]
pub(crate) struct Scene {
    pub(crate) camera: Camera,
    pub(crate) turn: LayerTurn,
    pub(crate) cubies: [Cubie; CUBIE_COUNT],
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            turn: LayerTurn::default(),
            cubies: cube::build_assembly(),
        }
    }
}

impl Scene {
    /// Applies one drained input command.
    pub(crate) fn apply(&mut self, command: Command) {
        match command {
            Command::MoveForward => self.camera.move_forward(),
            Command::MoveBackward => self.camera.move_backward(),
            Command::MoveLeft => self.camera.move_left(),
            Command::MoveRight => self.camera.move_right(),
            Command::Rotate { dx, dy } => self.camera.rotate(dx, dy),
            Command::TurnLeft => self.turn.turn_left(),
            Command::TurnRight => self.turn.turn_right(),
        }
    }

    /// Whether the cubie at `index` belongs to the turnable middle layer.
    pub(crate) fn in_turning_layer(index: usize) -> bool {
        TURNING_LAYER.contains(&index)
    }

    /// Model matrix for one cubie.
    ///
    /// The grid offset is translated first and middle-layer members are then
    /// rotated about the assembly's vertical axis, so the layer turns as a
    /// rigid unit around the cube center instead of each cubie spinning in
    /// place.
    pub(crate) fn model_matrix(&self, index: usize) -> Matrix4<f32> {
        let grid = self.cubies[index].grid;
        let offset = Vector3::new(grid.x as f32, grid.y as f32, grid.z as f32) * CUBIE_SPACING;
        let translation = Matrix4::new_translation(&offset);
        if Self::in_turning_layer(index) {
            self.turn.rotation() * translation
        } else {
            translation
        }
    }

    /// Composes the per-frame instance data for all 27 cubies.
    pub(crate) fn cubie_instances(&self) -> Vec<CubieInstance> {
        (0..CUBIE_COUNT)
            .map(|index| CubieInstance {
                model: self.model_matrix(index).into(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn mat_approx_eq(a: &Matrix4<f32>, b: &Matrix4<f32>) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn turning_layer_is_the_middle_z_slab() {
        let scene = Scene::default();
        for (index, cubie) in scene.cubies.iter().enumerate() {
            assert_eq!(Scene::in_turning_layer(index), cubie.grid.z == 0);
        }
        assert_eq!((0..CUBIE_COUNT).filter(|&i| Scene::in_turning_layer(i)).count(), 9);
    }

    #[test]
    fn static_cubies_get_pure_translations() {
        let mut scene = Scene::default();
        scene.turn.turn_left();
        // Index 0 sits in the front slab and must ignore the layer angle.
        let grid = scene.cubies[0].grid;
        let expected = Matrix4::new_translation(&Vector3::new(
            grid.x as f32 * CUBIE_SPACING,
            grid.y as f32 * CUBIE_SPACING,
            grid.z as f32 * CUBIE_SPACING,
        ));
        assert!(mat_approx_eq(&scene.model_matrix(0), &expected));
    }

    #[test]
    fn center_cubie_stays_at_origin() {
        let mut scene = Scene::default();
        scene.turn.turn_left();
        let center = scene.model_matrix(13).transform_point(&Point3::origin());
        assert!(center.coords.norm() < 1e-5);
    }

    #[test]
    fn quarter_turn_swings_layer_cubie_around_the_axis() {
        let mut scene = Scene::default();
        for _ in 0..4 {
            scene.apply(Command::TurnLeft);
        }
        // Cubie 14 sits at grid (1, 0, 0); after a 90 degree layer turn its
        // center must arrive at (0, 0, -spacing), orbiting the cube center.
        assert_eq!(scene.cubies[14].grid, cube::grid_coords(14));
        let center = scene.model_matrix(14).transform_point(&Point3::origin());
        assert!((center - Point3::new(0.0, 0.0, -CUBIE_SPACING)).norm() < 1e-5);
    }

    #[test]
    fn turn_commands_are_exact_inverses() {
        let mut scene = Scene::default();
        scene.apply(Command::TurnLeft);
        scene.apply(Command::TurnRight);
        assert_eq!(scene.turn.angle, 0.0);
    }

    #[test]
    fn move_commands_reach_the_camera() {
        let mut scene = Scene::default();
        let start = scene.camera.position;
        scene.apply(Command::MoveForward);
        assert!((scene.camera.position - start).norm() > 0.0);
        scene.apply(Command::MoveBackward);
        assert!((scene.camera.position - start).norm() < 1e-5);
    }

    #[test]
    fn rotate_command_updates_orientation() {
        let mut scene = Scene::default();
        scene.apply(Command::Rotate { dx: 45.0, dy: 0.0 });
        assert!((scene.camera.yaw - 0.0).abs() < 1e-5);
    }

    #[test]
    fn instances_cover_every_cubie() {
        let scene = Scene::default();
        assert_eq!(scene.cubie_instances().len(), CUBIE_COUNT);
    }
}
