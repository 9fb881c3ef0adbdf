use crate::error::RenderError;
use ab_glyph::{Font, FontVec, Glyph, PxScale, ScaleFont, point};
use std::collections::HashMap;
use tiny_skia::{Color, Pixmap, PixmapPaint, PremultipliedColorU8, Transform};

#[derive(Hash, Eq, PartialEq, Clone)]
struct TextKey {
    text: String,
    size_bits: u32,
    rgba: [u8; 4],
}

/// Rasterises labels with an optional runtime-loaded font, caching each label
pub struct TextPainter {
    font: Option<FontVec>,
    cache: HashMap<TextKey, Pixmap>,
}

impl TextPainter {
    pub fn without_font() -> Self {
        Self {
            font: None,
            cache: HashMap::new(),
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, RenderError> {
        let font = FontVec::try_from_vec(bytes).map_err(|e| RenderError::Font(e.to_string()))?;
        Ok(Self {
            font: Some(font),
            cache: HashMap::with_capacity(16),
        })
    }

    /// Draws `text` centred on `center`. Returns `false` when no font is loaded.
    pub fn draw_centered(
        &mut self,
        canvas: &mut Pixmap,
        text: &str,
        center: (f32, f32),
        size: f32,
        rgba: [u8; 4],
    ) -> bool {
        let Some(font) = self.font.as_ref() else {
            return false;
        };
        let key = TextKey {
            text: text.to_string(),
            size_bits: size.to_bits(),
            rgba,
        };
        if !self.cache.contains_key(&key) {
            let color = Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
            let Some(rendered) = render_text_pixmap(text, size, font, color) else {
                return false;
            };
            self.cache.insert(key.clone(), rendered);
        }
        let Some(label) = self.cache.get(&key) else {
            return false;
        };

        let x = (center.0 - label.width() as f32 * 0.5) as i32;
        let y = (center.1 - label.height() as f32 * 0.5) as i32;
        canvas.draw_pixmap(
            x,
            y,
            label.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        true
    }
}

/// Rasterises `text` tightly into a premultiplied pixmap. `None` when nothing is visible.
pub fn render_text_pixmap<F: Font>(
    text: &str,
    font_size: f32,
    font: &F,
    color: Color,
) -> Option<Pixmap> {
    let scale = PxScale::from(font_size);
    let sf = font.as_scaled(scale);

    // Layout with baseline at ascent
    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::new();
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for g in &glyphs {
        if let Some(out) = font.outline_glyph(g.clone()) {
            let b = out.px_bounds();
            min_x = min_x.min(b.min.x);
            min_y = min_y.min(b.min.y);
            max_x = max_x.max(b.max.x);
            max_y = max_y.max(b.max.y);
        }
    }

    if min_x == f32::INFINITY {
        return None;
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;
    let mut pm = Pixmap::new(w, h)?;

    let stride = w as usize;
    let dst = pm.pixels_mut();
    let cu = color.to_color_u8();

    for g in &glyphs {
        let Some(out) = font.outline_glyph(g.clone()) else {
            continue;
        };
        let b = out.px_bounds();
        out.draw(|x, y, cov| {
            if cov <= f32::EPSILON {
                return;
            }
            let ix = (x as f32 + b.min.x - min_x).floor() as i32;
            let iy = (y as f32 + b.min.y - min_y).floor() as i32;
            if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                return;
            }
            let i = iy as usize * stride + ix as usize;

            // Premultiply by coverage, then source-over onto what is already there
            let a = (cov * cu.alpha() as f32 / 255.0).clamp(0.0, 1.0);
            let sa = (a * 255.0) as u8;
            let inv = 1.0 - a;
            let bg = dst[i];
            let over = |src: u8, dst: u8| {
                ((src as f32 * a) as u8).saturating_add((dst as f32 * inv) as u8)
            };
            let al = sa.saturating_add((bg.alpha() as f32 * inv) as u8);
            let r = over(cu.red(), bg.red()).min(al);
            let g = over(cu.green(), bg.green()).min(al);
            let bl = over(cu.blue(), bg.blue()).min(al);

            if let Some(px) = PremultipliedColorU8::from_rgba(r, g, bl, al) {
                dst[i] = px;
            }
        });
    }

    Some(pm)
}
