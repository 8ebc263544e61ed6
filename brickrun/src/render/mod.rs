//! Draw-list compositor.
//!
//! Game and UI code push [`DrawCommand`]s in virtual screen coordinates; the
//! [`Renderer`] sorts them by layer and z-index and letterboxes the virtual
//! canvas onto the window.

mod text;
mod wgpu_backend;

pub use text::{TextImage, TextRasterizer};
pub use wgpu_backend::Renderer;

use crate::camera::Camera2D;
use crate::math::{Rect, Vec2};

/// RGBA with sRGB-encoded components in `0.0..=1.0`.
pub type Color = [f32; 4];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// What to draw inside a command's rectangle.
#[derive(Clone, Debug, PartialEq)]
pub enum Drawable {
    ColorRect {
        color: Color,
    },
    Text {
        text: String,
        size: f32,
        color: Color,
        /// Filled behind the text across the whole rectangle.
        background: Option<Color>,
        align: TextAlign,
    },
}

/// Compositing layer. UI always draws above the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    World,
    Ui,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub layer: Layer,
    pub z_index: i32,
    /// Virtual screen rectangle.
    pub rect: Rect,
    pub drawable: Drawable,
}

/// Anything that can put itself into a draw list.
pub trait Renderable {
    fn render(&self, list: &mut DrawList, camera: &Camera2D);
}

/// Unsorted draw commands for one frame.
#[derive(Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Queue a world-space drawable, transformed by `camera`.
    pub fn push_world(&mut self, camera: &Camera2D, world_rect: &Rect, z_index: i32, drawable: Drawable) {
        self.commands.push(DrawCommand {
            layer: Layer::World,
            z_index,
            rect: camera.to_screen(world_rect),
            drawable,
        });
    }

    /// Queue a screen-space UI drawable.
    pub fn push_ui(&mut self, rect: Rect, z_index: i32, drawable: Drawable) {
        self.commands.push(DrawCommand {
            layer: Layer::Ui,
            z_index,
            rect,
            drawable,
        });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Back-to-front order: World before Ui, ascending z within a layer.
    /// Equal keys keep submission order.
    pub fn sorted(&self) -> Vec<&DrawCommand> {
        let mut sorted: Vec<&DrawCommand> = self.commands.iter().collect();
        sorted.sort_by_key(|command| (command.layer, command.z_index));
        sorted
    }
}

/// Uniform scale and centring that fits the virtual canvas into the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Letterbox {
    pub scale: f64,
    /// Top-left of the canvas in physical pixels.
    pub offset: Vec2,
    pub virtual_size: Vec2,
}

impl Letterbox {
    pub fn fit(virtual_size: Vec2, physical_size: Vec2) -> Self {
        let scale = if virtual_size.x > 0.0 && virtual_size.y > 0.0 {
            (physical_size.x / virtual_size.x).min(physical_size.y / virtual_size.y).max(0.0)
        } else {
            0.0
        };
        let offset = Vec2::new(
            (physical_size.x - virtual_size.x * scale) / 2.0,
            (physical_size.y - virtual_size.y * scale) / 2.0,
        );
        Self {
            scale,
            offset,
            virtual_size,
        }
    }

    /// Canvas area in physical pixels.
    pub fn viewport(&self) -> Rect {
        Rect::from_position_size(self.offset, self.virtual_size * self.scale)
    }

    pub fn to_physical(&self, rect: &Rect) -> Rect {
        Rect::new(
            self.offset.x + rect.x * self.scale,
            self.offset.y + rect.y * self.scale,
            rect.w * self.scale,
            rect.h * self.scale,
        )
    }

    /// Map a physical cursor position onto the canvas.
    pub fn to_virtual(&self, point: Vec2) -> Vec2 {
        if self.scale <= 0.0 {
            return Vec2::ZERO;
        }
        (point - self.offset) / self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_cmd(layer: Layer, z_index: i32, tag: f64) -> DrawCommand {
        DrawCommand {
            layer,
            z_index,
            rect: Rect::new(tag, 0.0, 1.0, 1.0),
            drawable: Drawable::ColorRect { color: [1.0; 4] },
        }
    }

    #[test]
    fn ui_draws_over_world_regardless_of_z() {
        let mut list = DrawList::new();
        list.push(rect_cmd(Layer::Ui, -5, 0.0));
        list.push(rect_cmd(Layer::World, 10, 1.0));
        list.push(rect_cmd(Layer::World, 2, 2.0));
        list.push(rect_cmd(Layer::World, 2, 3.0));

        let order: Vec<f64> = list.sorted().iter().map(|c| c.rect.x).collect();
        assert_eq!(order, vec![2.0, 3.0, 1.0, 0.0]);
    }

    #[test]
    fn world_commands_go_through_the_camera() {
        let mut camera = Camera2D::new(Vec2::new(800.0, 600.0));
        camera.offset = Vec2::new(600.0, 0.0);
        let mut list = DrawList::new();
        list.push_world(&camera, &Rect::new(1000.0, 500.0, 20.0, 50.0), 1, Drawable::ColorRect { color: [1.0; 4] });
        assert_eq!(list.sorted()[0].rect, Rect::new(400.0, 500.0, 20.0, 50.0));
    }

    #[test]
    fn letterbox_centres_the_canvas() {
        let wide = Letterbox::fit(Vec2::new(800.0, 600.0), Vec2::new(1920.0, 1080.0));
        assert_eq!(wide.scale, 1.8);
        assert_eq!(wide.offset, Vec2::new(240.0, 0.0));
        assert_eq!(wide.viewport(), Rect::new(240.0, 0.0, 1440.0, 1080.0));

        let tall = Letterbox::fit(Vec2::new(800.0, 600.0), Vec2::new(400.0, 600.0));
        assert_eq!(tall.scale, 0.5);
        assert_eq!(tall.offset, Vec2::new(0.0, 150.0));
        assert_eq!(tall.to_virtual(Vec2::new(200.0, 300.0)), Vec2::new(400.0, 300.0));
        assert_eq!(tall.to_physical(&Rect::new(400.0, 300.0, 10.0, 10.0)), Rect::new(200.0, 300.0, 5.0, 5.0));
    }

    #[test]
    fn degenerate_window_sizes_do_not_divide_by_zero() {
        let boxed = Letterbox::fit(Vec2::new(800.0, 600.0), Vec2::new(0.0, 0.0));
        assert_eq!(boxed.scale, 0.0);
        assert_eq!(boxed.to_virtual(Vec2::new(10.0, 10.0)), Vec2::ZERO);
    }
}
