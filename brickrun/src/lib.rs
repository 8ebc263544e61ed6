//! Brickrun - a tile-based side-scrolling platformer.
//!
//! The simulation core (`world`, `collision`, `physics`, `combat`, `camera`,
//! `game`) is windowing-free and fully testable; `engine` and `render` put it
//! on screen with winit and wgpu.

pub mod camera;
pub mod collision;
pub mod combat;
pub mod config;
pub mod effects;
pub mod engine;
pub mod entities;
pub mod error;
pub mod events;
pub mod game;
pub mod grid;
pub mod input;
pub mod math;
pub mod physics;
pub mod render;
pub mod ui;
pub mod world;

pub use crate::camera::{Camera2D, CameraController, CameraMode, CameraRig};
pub use crate::config::GameConfig;
pub use crate::engine::{Engine, EngineConfig, EngineContext, Game};
pub use crate::error::{ConfigError, WorldLoadError};
pub use crate::events::{EventQueue, GameEvent};
pub use crate::game::GameState;
pub use crate::input::{Action, FrameInput, InputMap, InputState};
pub use crate::math::{Rect, Vec2};
pub use crate::render::{DrawList, Renderer, TextRasterizer};
pub use crate::ui::{UiEvent, UiLayer, UiLayout};
pub use crate::world::World;
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
