use std::time::{Duration, Instant};

use anyhow::Result;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, Event, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::config::WindowConfig;
use crate::input::InputState;
use crate::math::Vec2;
use crate::render::{Letterbox, Renderer};

// Pixels of trackpad scroll that count as one wheel step.
const PIXELS_PER_SCROLL_STEP: f64 = 40.0;
const FPS_SMOOTHING: f64 = 0.1;

/// Window and pacing settings for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub title: String,
    /// Virtual canvas size; the initial window uses the same logical size.
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Frames per second to aim for. Zero runs as fast as presentation allows.
    pub target_fps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        WindowConfig::default().into()
    }
}

impl From<WindowConfig> for EngineConfig {
    fn from(window: WindowConfig) -> Self {
        Self {
            title: window.title,
            width: window.width,
            height: window.height,
            vsync: window.vsync,
            target_fps: window.target_fps,
        }
    }
}

impl EngineConfig {
    fn frame_budget(&self) -> Option<Duration> {
        (self.target_fps > 0).then(|| Duration::from_secs_f64(1.0 / self.target_fps as f64))
    }
}

/// Owns the window and event loop and drives a [`Game`].
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run the provided game until the window is closed, Escape is pressed,
    /// or the game requests exit.
    pub fn run<G: Game + 'static>(self, mut game: G) -> Result<()> {
        let config = self.config;

        let event_loop = EventLoop::new()?;
        let mut window_attributes = Window::default_attributes();
        window_attributes.title = config.title.clone();
        window_attributes.inner_size = Some(LogicalSize::new(config.width, config.height).into());
        let window = event_loop.create_window(window_attributes)?;

        // The window must outlive the renderer's surface, which lives for
        // the rest of the process.
        let window: &'static Window = Box::leak(Box::new(window));

        let mut ctx = EngineContext::new(window, &config)?;
        game.init(&mut ctx)?;
        log::info!("Engine started: {}x{} virtual canvas", config.width, config.height);

        let frame_budget = config.frame_budget();
        let mut last_frame = Instant::now();
        event_loop.run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => {
                ctx.handle_window_event(&event);

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::KeyboardInput { event, .. } if is_escape_pressed(&event) => {
                        elwt.exit()
                    }
                    WindowEvent::Resized(new_size) => ctx.resize_renderer(new_size),
                    WindowEvent::RedrawRequested => {
                        if let Err(err) = game.draw(&mut ctx) {
                            log::error!("Encountered error during draw: {err:?}");
                            elwt.exit();
                            return;
                        }
                        if ctx.exit_requested {
                            elwt.exit();
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                let now = Instant::now();
                if let Some(budget) = frame_budget {
                    let next = last_frame + budget;
                    if now < next {
                        elwt.set_control_flow(ControlFlow::WaitUntil(next));
                        return;
                    }
                }
                ctx.update_time(now - last_frame);
                last_frame = now;

                let result = game.update(&mut ctx);
                // Per-frame input is consumed by this update.
                ctx.input.begin_frame();
                if let Err(err) = result {
                    log::error!("Encountered error during update: {err:?}");
                    elwt.exit();
                    return;
                }
                if ctx.exit_requested {
                    elwt.exit();
                    return;
                }

                elwt.set_control_flow(ControlFlow::Poll);
                ctx.window.request_redraw();
            }
            _ => {}
        })?;

        Ok(())
    }
}

fn is_escape_pressed(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed && matches!(event.physical_key, PhysicalKey::Code(KeyCode::Escape))
}

/// Wheel delta in whole steps, positive away from the user.
fn scroll_steps(delta: &MouseScrollDelta) -> i32 {
    let steps = match delta {
        MouseScrollDelta::LineDelta(_, y) => *y as f64,
        MouseScrollDelta::PixelDelta(position) => position.y / PIXELS_PER_SCROLL_STEP,
    };
    if steps.is_finite() {
        steps.round() as i32
    } else {
        0
    }
}

/// Shared context provided to game code each frame.
pub struct EngineContext<'window> {
    window: &'window Window,
    delta_time: Duration,
    elapsed_time: Duration,
    fps: f64,
    exit_requested: bool,
    input: InputState,
    renderer: Renderer<'window>,
}

impl<'window> EngineContext<'window> {
    fn new(window: &'window Window, config: &EngineConfig) -> Result<Self> {
        let virtual_size = Vec2::new(config.width as f64, config.height as f64);
        let renderer = Renderer::new(window, config.vsync, virtual_size)?;

        Ok(Self {
            window,
            delta_time: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            fps: 0.0,
            exit_requested: false,
            input: InputState::new(),
            renderer,
        })
    }

    fn update_time(&mut self, delta: Duration) {
        self.delta_time = delta;
        self.elapsed_time += delta;
        let seconds = delta.as_secs_f64();
        if seconds > 0.0 {
            let instant = 1.0 / seconds;
            self.fps = if self.fps == 0.0 {
                instant
            } else {
                self.fps + (instant - self.fps) * FPS_SMOOTHING
            };
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.input.handle_key(event),
            WindowEvent::MouseInput { state, button, .. } => self.input.handle_mouse_button(*button, *state),
            WindowEvent::CursorMoved { position, .. } => {
                let physical = Vec2::new(position.x, position.y);
                let position = self.renderer.letterbox().to_virtual(physical);
                self.input.handle_cursor_moved(position);
            }
            WindowEvent::MouseWheel { delta, .. } => self.input.handle_scroll(scroll_steps(delta)),
            _ => {}
        }
    }

    fn resize_renderer(&mut self, new_size: PhysicalSize<u32>) {
        self.renderer.resize(new_size);
    }

    /// Duration between the current and previous frames.
    pub fn delta_time(&self) -> Duration {
        self.delta_time
    }

    /// Total time elapsed since the engine started running.
    pub fn elapsed_time(&self) -> Duration {
        self.elapsed_time
    }

    /// Smoothed frames per second.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn window(&self) -> &Window {
        self.window
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Request that the engine exit after the current frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn renderer(&mut self) -> &mut Renderer<'window> {
        &mut self.renderer
    }

    /// Current mapping from the virtual canvas to the window.
    pub fn letterbox(&self) -> Letterbox {
        self.renderer.letterbox()
    }
}

/// Trait implemented by user code to hook into the engine lifecycle.
pub trait Game {
    /// Called once after the window is created but before the first frame.
    fn init(&mut self, _ctx: &mut EngineContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Update game state. Called once per frame before drawing.
    fn update(&mut self, ctx: &mut EngineContext<'_>) -> Result<()>;

    /// Draw the current frame. Called after update when a redraw is requested.
    fn draw(&mut self, ctx: &mut EngineContext<'_>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn wheel_deltas_become_whole_steps() {
        assert_eq!(scroll_steps(&MouseScrollDelta::LineDelta(0.0, 1.0)), 1);
        assert_eq!(scroll_steps(&MouseScrollDelta::LineDelta(0.0, -2.0)), -2);
        assert_eq!(scroll_steps(&MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0))), 2);
        assert_eq!(scroll_steps(&MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 10.0))), 0);
        assert_eq!(scroll_steps(&MouseScrollDelta::LineDelta(0.0, f32::NAN)), 0);
    }

    #[test]
    fn engine_config_follows_the_window_section() {
        let window = WindowConfig {
            title: "Level 1".into(),
            target_fps: 0,
            ..WindowConfig::default()
        };
        let config = EngineConfig::from(window);
        assert_eq!(config.title, "Level 1");
        assert_eq!(config.frame_budget(), None);
        assert!(EngineConfig::default().frame_budget().is_some());
    }
}
