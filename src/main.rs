//! Interactive 3x3x3 Rubik's cube viewer with iced UI.
//!
//! A colored cube assembly rendered with wgpu behind a free-flying camera.
//! The arrow keys move the camera, WASD rotates it, and Space/Backspace
//! spin the middle layer.

use iced::widget::{Column, Row, Shader, Slider};
use iced::{Element, Length, Settings, Task};

mod camera;
mod cube;
mod error;
mod renderer;
mod scene;
mod shader_widget;
mod turn;

use shader_widget::CubeShaderProgram;

/// Main application state - handles UI controls only
#[derive(Debug)]
pub(crate) struct CubeApp {
    camera_speed: f32,
    sensitivity: f32,
}

/// Messages that the application can receive
#[derive(Debug, Clone)]
pub(crate) enum Message {
    CameraSpeed(f32),
    Sensitivity(f32),
}

impl CubeApp {
    /// Create a new application instance
    pub(crate) fn new() -> Self {
        Self {
            camera_speed: 0.15,
            sensitivity: 2.0,
        }
    }

    /// Get the title of the application
    pub(crate) fn title(&self) -> &'static str {
        "Rubik's Cube"
    }

    /// Update the application state
    pub(crate) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CameraSpeed(value) => {
                self.camera_speed = value;
            }
            Message::Sensitivity(value) => {
                self.sensitivity = value;
            }
        }

        Task::none()
    }

    /// Create the view for the application
    pub(crate) fn view(&self) -> Element<Message> {
        // Left pane with controls
        let controls = Column::new()
            .spacing(20)
            .push(
                Column::new()
                    .spacing(5)
                    .push(iced::widget::text("Camera Speed"))
                    .push(
                        Slider::new(0.05..=0.5, self.camera_speed, Message::CameraSpeed)
                            .step(0.01)
                            .width(250),
                    ),
            )
            .push(
                Column::new()
                    .spacing(5)
                    .push(iced::widget::text("Look Sensitivity"))
                    .push(
                        Slider::new(0.5..=5.0, self.sensitivity, Message::Sensitivity)
                            .step(0.1)
                            .width(250),
                    ),
            )
            .push(
                Column::new()
                    .spacing(5)
                    .push(iced::widget::text("Keys"))
                    .push(iced::widget::text("Arrows: move camera"))
                    .push(iced::widget::text("WASD: look around"))
                    .push(iced::widget::text("Space/Backspace: turn layer")),
            );

        // Right pane with 3D viewport
        let viewport = Shader::new(CubeShaderProgram::new(self.camera_speed, self.sensitivity))
            .width(Length::Fill)
            .height(Length::Fill);

        // Main layout: left controls + right viewport
        Row::new()
            .spacing(10)
            .padding(10)
            .push(
                iced::widget::container(controls)
                    .width(Length::Shrink)
                    .height(Length::Fill),
            )
            .push(viewport)
            .into()
    }
}

/// Entry point for the cube viewer
fn main() -> iced::Result {
    env_logger::builder().format_timestamp(None).init();
    log::info!("starting cube viewer");

    let app = CubeApp::new();
    iced::application(app.title(), CubeApp::update, CubeApp::view)
        .settings(Settings {
            antialiasing: true,
            ..Settings::default()
        })
        .run_with(move || (app, Task::none()))
}
