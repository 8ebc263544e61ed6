//! Side-scroller cameras: a follow camera locked to the player's x position
//! and a free camera panned by hand. A [`CameraRig`] owns one of each and
//! switches between them without destroying either.

use crate::config::CameraConfig;
use crate::entities::Body;
use crate::math::{Rect, Vec2};

/// World-to-screen transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera2D {
    /// World position shown at the top-left of the viewport.
    pub offset: Vec2,
    /// Scale applied after subtracting `offset`. Always positive.
    pub zoom: f64,
    /// Virtual screen size in pixels.
    pub viewport: Vec2,
}

impl Camera2D {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            viewport,
        }
    }

    /// Map a world rectangle to screen space.
    pub fn to_screen(&self, rect: &Rect) -> Rect {
        Rect::new(
            (rect.x - self.offset.x) * self.zoom,
            (rect.y - self.offset.y) * self.zoom,
            rect.w * self.zoom,
            rect.h * self.zoom,
        )
    }

    /// Map a screen point back to world space.
    pub fn to_world(&self, point: Vec2) -> Vec2 {
        point / self.zoom + self.offset
    }

    /// The part of the world the viewport currently shows.
    pub fn visible_rect(&self) -> Rect {
        Rect::from_position_size(self.offset, self.viewport / self.zoom)
    }

    /// Multiply zoom by `step` once per scroll step, clamped to `[min, max]`.
    pub fn apply_zoom(&mut self, steps: i32, step: f64, min: f64, max: f64) {
        if steps == 0 || !step.is_finite() || step <= 0.0 {
            return;
        }
        let zoom = self.zoom * step.powi(steps);
        if zoom.is_finite() {
            self.zoom = zoom.clamp(min, max);
        }
    }
}

/// Per-frame camera controls.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraInput {
    /// Pan direction, each axis in `[-1, 1]`.
    pub pan: Vec2,
    /// Scroll steps this frame: positive zooms in.
    pub zoom_steps: i32,
}

/// A camera positioning strategy.
pub trait CameraController {
    fn update(&mut self, dt: f64, input: &CameraInput, target: &Body);
    fn camera(&self) -> &Camera2D;
    fn camera_mut(&mut self) -> &mut Camera2D;
}

/// Horizontal-only follow. `offset.y` stays at zero.
#[derive(Clone, Debug)]
pub struct FollowCamera {
    camera: Camera2D,
}

impl FollowCamera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            camera: Camera2D::new(viewport),
        }
    }

    /// Jump straight to `target` with no easing.
    pub fn snap_to(&mut self, target: &Body) {
        if !target.position.is_finite() {
            return;
        }
        self.camera.offset = Vec2::new(target.position.x - self.camera.viewport.x / 2.0, 0.0);
    }
}

impl CameraController for FollowCamera {
    fn update(&mut self, _dt: f64, _input: &CameraInput, target: &Body) {
        self.snap_to(target);
    }

    fn camera(&self) -> &Camera2D {
        &self.camera
    }

    fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }
}

/// Manually panned camera. Ignores any target.
#[derive(Clone, Debug)]
pub struct FreeCamera {
    camera: Camera2D,
    pan_speed: f64,
}

impl FreeCamera {
    pub fn new(viewport: Vec2, pan_speed: f64) -> Self {
        Self {
            camera: Camera2D::new(viewport),
            pan_speed,
        }
    }
}

impl CameraController for FreeCamera {
    fn update(&mut self, dt: f64, input: &CameraInput, _target: &Body) {
        let pan = Vec2::new(input.pan.x.clamp(-1.0, 1.0), input.pan.y.clamp(-1.0, 1.0));
        let delta = pan * (self.pan_speed * dt);
        if delta.is_finite() {
            self.camera.offset += delta;
        }
    }

    fn camera(&self) -> &Camera2D {
        &self.camera
    }

    fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CameraMode {
    #[default]
    Follow,
    Free,
}

/// Both cameras plus which one is current.
#[derive(Clone, Debug)]
pub struct CameraRig {
    follow: FollowCamera,
    free: FreeCamera,
    mode: CameraMode,
    zoom_step: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl CameraRig {
    pub fn new(viewport: Vec2, config: &CameraConfig) -> Self {
        Self {
            follow: FollowCamera::new(viewport),
            free: FreeCamera::new(viewport, config.pan_speed),
            mode: CameraMode::Follow,
            zoom_step: config.zoom_step,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Switch cameras. Entering Follow re-seeds it from `target` at once;
    /// entering Free starts from wherever the follow camera was looking.
    pub fn set_mode(&mut self, mode: CameraMode, target: &Body) {
        if mode == self.mode {
            return;
        }
        match mode {
            CameraMode::Follow => self.follow.snap_to(target),
            CameraMode::Free => self.free.camera.offset = self.follow.camera.offset,
        }
        self.mode = mode;
        log::info!("Camera mode: {:?}", mode);
    }

    pub fn toggle(&mut self, target: &Body) -> CameraMode {
        let next = match self.mode {
            CameraMode::Follow => CameraMode::Free,
            CameraMode::Free => CameraMode::Follow,
        };
        self.set_mode(next, target);
        next
    }

    /// Update the current camera. The other one is left untouched.
    pub fn update(&mut self, dt: f64, input: &CameraInput, target: &Body) {
        let (zoom_step, min_zoom, max_zoom) = (self.zoom_step, self.min_zoom, self.max_zoom);
        let controller = self.current_controller_mut();
        controller
            .camera_mut()
            .apply_zoom(input.zoom_steps, zoom_step, min_zoom, max_zoom);
        controller.update(dt, input, target);
    }

    /// Re-centre the follow camera on `target`, e.g. after a respawn.
    pub fn reseed(&mut self, target: &Body) {
        self.follow.snap_to(target);
    }

    pub fn current(&self) -> &Camera2D {
        match self.mode {
            CameraMode::Follow => self.follow.camera(),
            CameraMode::Free => self.free.camera(),
        }
    }

    fn current_controller_mut(&mut self) -> &mut dyn CameraController {
        match self.mode {
            CameraMode::Follow => &mut self.follow,
            CameraMode::Free => &mut self.free,
        }
    }
}
