//! Custom shader widget hosting the cube viewport.
//!
//! The widget owns the scene state, translates keyboard events into the
//! command queue, and snapshots the composed frame (camera matrices plus 27
//! model matrices) into a primitive for the GPU renderer.

use iced::widget::shader::{self, wgpu};
use iced::{Rectangle, event, keyboard, mouse};

use crate::Message;
use crate::camera::{FrameUniforms, Projection};
use crate::cube::{Cubie, CUBIE_COUNT};
use crate::renderer::{CubieInstance, Renderer};
use crate::scene::{Command, Scene};

/// One frame's worth of render input, captured from the scene.
#[derive(Debug, Clone)]
pub(crate) struct CubePrimitive {
    cubies: [Cubie; CUBIE_COUNT],
    uniforms: FrameUniforms,
    instances: Vec<CubieInstance>,
}

impl shader::Primitive for CubePrimitive {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        storage: &mut shader::Storage,
        bounds: &Rectangle,
        viewport: &shader::Viewport,
    ) {
        if !storage.has::<Renderer>() {
            let renderer = pollster::block_on(Renderer::new(
                device,
                format,
                *bounds,
                viewport.physical_size(),
                &self.cubies,
            ))
            .unwrap_or_else(|error| {
                log::error!("renderer setup failed: {error}");
                panic!("renderer setup failed: {error}");
            });
            storage.store(renderer);
        }
        let renderer = storage.get_mut::<Renderer>().unwrap();
        renderer.resize(device, *bounds, viewport.physical_size());
        renderer.update_frame(queue, self.uniforms, &self.instances);
    }

    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        storage: &shader::Storage,
        target: &wgpu::TextureView,
        _clip_bounds: &Rectangle<u32>,
    ) {
        let renderer = storage.get::<Renderer>().unwrap();
        renderer.render(encoder, target);
    }
}

/// Widget-internal state: the scene plus the pending command queue.
pub(crate) struct CubeShaderState {
    scene: Scene,
    projection: Projection,
    pending: Vec<Command>,
}

impl Default for CubeShaderState {
    fn default() -> Self {
        Self {
            scene: Scene::default(),
            projection: Projection::default(),
            pending: Vec::new(),
        }
    }
}

/// The shader program; carries the UI-control values into the widget.
pub(crate) struct CubeShaderProgram {
    speed: f32,
    sensitivity: f32,
}

impl CubeShaderProgram {
    pub(crate) fn new(speed: f32, sensitivity: f32) -> Self {
        Self { speed, sensitivity }
    }
}

impl shader::Program<Message> for CubeShaderProgram {
    type State = CubeShaderState;
    type Primitive = CubePrimitive;

    fn update(
        &self,
        state: &mut Self::State,
        event: shader::Event,
        _bounds: Rectangle,
        _cursor: mouse::Cursor,
        _shell: &mut iced::advanced::Shell<'_, Message>,
    ) -> (event::Status, Option<Message>) {
        state.scene.camera.speed = self.speed;
        state.scene.camera.sensitivity = self.sensitivity;

        let status = match event {
            shader::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => {
                match command_for_key(&key) {
                    Some(command) => {
                        state.pending.push(command);
                        event::Status::Captured
                    }
                    None => event::Status::Ignored,
                }
            }
            _ => event::Status::Ignored,
        };

        // Update phase: drain the queue so draw() only ever sees a fully
        // committed scene.
        for command in state.pending.drain(..) {
            state.scene.apply(command);
        }

        (status, None)
    }

    fn draw(
        &self,
        state: &Self::State,
        _cursor: mouse::Cursor,
        _bounds: Rectangle,
    ) -> Self::Primitive {
        CubePrimitive {
            cubies: state.scene.cubies,
            uniforms: FrameUniforms::new(&state.scene.camera, &state.projection),
            instances: state.scene.cubie_instances(),
        }
    }
}

/// Maps a pressed key to its command. Arrows translate the camera, WASD
/// rotates it in fixed angular steps, Space/Backspace turn the middle layer.
fn command_for_key(key: &keyboard::Key) -> Option<Command> {
    use keyboard::key::Named;

    match key {
        keyboard::Key::Named(Named::ArrowUp) => Some(Command::MoveForward),
        keyboard::Key::Named(Named::ArrowDown) => Some(Command::MoveBackward),
        keyboard::Key::Named(Named::ArrowLeft) => Some(Command::MoveLeft),
        keyboard::Key::Named(Named::ArrowRight) => Some(Command::MoveRight),
        keyboard::Key::Named(Named::Space) => Some(Command::TurnLeft),
        keyboard::Key::Named(Named::Backspace) => Some(Command::TurnRight),
        keyboard::Key::Character(c) => match c.as_str() {
            "w" => Some(Command::Rotate { dx: 0.0, dy: -1.0 }),
            "s" => Some(Command::Rotate { dx: 0.0, dy: 1.0 }),
            "a" => Some(Command::Rotate { dx: -1.0, dy: 0.0 }),
            "d" => Some(Command::Rotate { dx: 1.0, dy: 0.0 }),
            _ => None,
        },
        _ => None,
    }
}
