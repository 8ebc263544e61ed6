use std::path::Path;

use ab_glyph::{point, Font, FontArc, Glyph, GlyphId, PxScale, ScaleFont};
use anyhow::{anyhow, Context, Result};

/// A string rasterised to white RGBA8 with coverage in the alpha channel.
///
/// Colour is applied as a tint when the image is drawn.
pub struct TextImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Lays out and rasterises single-line strings with one font.
#[derive(Clone)]
pub struct TextRasterizer {
    font: FontArc,
}

impl TextRasterizer {
    /// Load a font from bytes (TTF/OTF format).
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| anyhow!("Failed to load font: {}", e))?;
        Ok(Self { font })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?;
        Self::from_bytes(bytes).with_context(|| format!("Failed to parse font {}", path.display()))
    }

    /// Width and line height of `text` at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        let (_, width) = self.layout(text, size);
        let scaled = self.font.as_scaled(PxScale::from(size));
        (width, scaled.ascent() - scaled.descent())
    }

    /// Rasterise `text`. Returns `None` for strings with no visible extent.
    pub fn rasterize(&self, text: &str, size: f32) -> Option<TextImage> {
        if !(size.is_finite() && size > 0.0) {
            return None;
        }
        let (width, height) = self.measure(text, size);
        let width = width.ceil() as u32;
        let height = height.ceil() as u32;
        if width == 0 || height == 0 {
            return None;
        }

        let mut pixels = vec![0u8; (width * height * 4) as usize];
        let (glyphs, _) = self.layout(text, size);
        for glyph in glyphs {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, coverage| {
                let px = bounds.min.x as i64 + x as i64;
                let py = bounds.min.y as i64 + y as i64;
                if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                    return;
                }
                let idx = ((py as u32 * width + px as u32) * 4) as usize;
                let alpha = (coverage.clamp(0.0, 1.0) * 255.0) as u8;
                pixels[idx] = 255;
                pixels[idx + 1] = 255;
                pixels[idx + 2] = 255;
                pixels[idx + 3] = pixels[idx + 3].max(alpha);
            });
        }

        Some(TextImage {
            width,
            height,
            pixels,
        })
    }

    // Glyphs positioned on a baseline at `ascent`, plus the total advance.
    fn layout(&self, text: &str, size: f32) -> (Vec<Glyph>, f32) {
        let scale = PxScale::from(size);
        let scaled = self.font.as_scaled(scale);
        let mut caret = point(0.0, scaled.ascent());
        let mut previous: Option<GlyphId> = None;
        let mut glyphs = Vec::with_capacity(text.len());

        for ch in text.chars().filter(|c| !c.is_control()) {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret.x += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(scale, caret));
            caret.x += scaled.h_advance(id);
            previous = Some(id);
        }
        (glyphs, caret.x.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled_font() -> TextRasterizer {
        TextRasterizer::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../assets/fonts/DejaVuSans.ttf"))
            .unwrap()
    }

    #[test]
    fn rejects_invalid_font_data() {
        assert!(TextRasterizer::from_bytes(vec![0, 1, 2, 3]).is_err());
    }

    #[test]
    fn longer_strings_are_wider() {
        let font = bundled_font();
        let (short, line) = font.measure("FPS", 20.0);
        let (long, _) = font.measure("FPS: 60", 20.0);
        assert!(short > 0.0);
        assert!(long > short);
        assert!(line >= 20.0);
    }

    #[test]
    fn rasterized_text_has_coverage() {
        let font = bundled_font();
        let image = font.rasterize("Start", 24.0).unwrap();
        assert_eq!(image.pixels.len(), (image.width * image.height * 4) as usize);
        assert!(image.pixels.chunks(4).any(|px| px[3] > 0));
        assert!(font.rasterize("", 24.0).is_none());
        assert!(font.rasterize("x", 0.0).is_none());
    }
}
