use crate::camera::Camera2D;
use crate::math::{Rect, Vec2};
use crate::render::{Color, DrawList, Drawable, Renderable, TextAlign};

/// World-layer z for effects; entities draw below this.
pub const EFFECT_Z: i32 = 50;

const RISE_SPEED: f64 = 60.0;
const LIFETIME: f64 = 0.8;
const FONT_SIZE: f32 = 20.0;
const SCORE_COLOR: Color = [1.0, 0.85, 0.2, 1.0];

/// "+100" text that rises from a stomp and fades out.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingText {
    pub text: String,
    /// Bottom centre of the text in world coordinates.
    pub position: Vec2,
    /// Remaining lifetime in seconds.
    pub lifetime: f64,
    pub max_lifetime: f64,
}

impl FloatingText {
    pub fn score(position: Vec2, reward: i64) -> Self {
        Self {
            text: format!("+{reward}"),
            position,
            lifetime: LIFETIME,
            max_lifetime: LIFETIME,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }

    /// 0.0 when spawned, 1.0 when expired.
    pub fn age(&self) -> f64 {
        if self.max_lifetime > 0.0 {
            (1.0 - self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    fn update(&mut self, dt: f64) {
        self.position.y -= RISE_SPEED * dt;
        self.lifetime -= dt;
    }

    fn rect(&self) -> Rect {
        let size = FONT_SIZE as f64;
        let width = self.text.chars().count() as f64 * size * 0.6;
        Rect::new(self.position.x - width / 2.0, self.position.y - size * 1.25, width, size * 1.25)
    }
}

/// Short-lived world effects.
#[derive(Default)]
pub struct Effects {
    texts: Vec<FloatingText>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_score(&mut self, position: Vec2, reward: i64) {
        self.texts.push(FloatingText::score(position, reward));
    }

    pub fn update(&mut self, dt: f64) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        for text in &mut self.texts {
            text.update(dt);
        }
        self.texts.retain(FloatingText::is_alive);
    }

    pub fn texts(&self) -> &[FloatingText] {
        &self.texts
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

impl Renderable for Effects {
    fn render(&self, list: &mut DrawList, camera: &Camera2D) {
        for text in &self.texts {
            let mut color = SCORE_COLOR;
            color[3] *= (1.0 - text.age()) as f32;
            list.push_world(
                camera,
                &text.rect(),
                EFFECT_Z,
                Drawable::Text {
                    text: text.text.clone(),
                    size: FONT_SIZE,
                    color,
                    background: None,
                    align: TextAlign::Center,
                },
            );
        }
    }
}
