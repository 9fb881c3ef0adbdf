use fovea_core::StimulusSpec;
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Transform};

/// Inset of the letter inside its square, as a fraction of item size
const INSET: f32 = 0.15;
/// Bar thickness, as a fraction of item size
const THICKNESS: f32 = 0.18;

/// Outline of a T or L occupying the square at `(x, y)` before rotation.
pub fn glyph_path(glyph: char, x: f32, y: f32, size: f32) -> Option<Path> {
    let m = size * INSET;
    let t = size * THICKNESS;
    let span = size - 2.0 * m;

    let mut pb = PathBuilder::new();
    match glyph {
        'T' => {
            pb.push_rect(Rect::from_xywh(x + m, y + m, span, t)?);
            pb.push_rect(Rect::from_xywh(x + (size - t) / 2.0, y + m, t, span)?);
        }
        _ => {
            pb.push_rect(Rect::from_xywh(x + m, y + m, t, span)?);
            pb.push_rect(Rect::from_xywh(x + m, y + size - m - t, span, t)?);
        }
    }
    pb.finish()
}

pub fn draw_stimulus(pixmap: &mut Pixmap, item: &StimulusSpec, size: f32, color: Color) {
    let Some(path) = glyph_path(item.glyph(), item.position.x, item.position.y, size) else {
        return;
    };
    let (cx, cy) = item.center(size);
    let transform = Transform::from_rotate_at(item.rotation.degrees(), cx, cy);

    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
}

pub fn draw_stimuli(pixmap: &mut Pixmap, items: &[StimulusSpec], size: f32, color: Color) {
    for item in items {
        draw_stimulus(pixmap, item, size, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fovea_core::{Position, Rotation};

    fn ink_at(pm: &Pixmap, x: u32, y: u32) -> bool {
        pm.pixel(x, y).map(|p| p.alpha() > 200).unwrap_or(false)
    }

    fn single(glyph_target: bool, rotation: Rotation) -> Pixmap {
        let mut pm = Pixmap::new(100, 100).unwrap();
        let item = StimulusSpec {
            position: Position::new(20.0, 20.0),
            is_target: glyph_target,
            rotation,
        };
        draw_stimulus(&mut pm, &item, 60.0, Color::BLACK);
        pm
    }

    #[test]
    fn t_has_top_bar_and_centre_stem() {
        let pm = single(true, Rotation::Deg0);
        // top bar spans the width near the top of the square
        assert!(ink_at(&pm, 35, 33));
        assert!(ink_at(&pm, 65, 33));
        // stem runs down the middle
        assert!(ink_at(&pm, 50, 60));
        // lower left corner stays empty
        assert!(!ink_at(&pm, 32, 70));
    }

    #[test]
    fn l_has_left_stem_and_bottom_bar() {
        let pm = single(false, Rotation::Deg0);
        assert!(ink_at(&pm, 33, 50));
        assert!(ink_at(&pm, 60, 67));
        assert!(!ink_at(&pm, 65, 33));
    }

    #[test]
    fn half_turn_flips_the_t() {
        let pm = single(true, Rotation::Deg180);
        // bar now sits at the bottom, top corners empty
        assert!(ink_at(&pm, 35, 67));
        assert!(!ink_at(&pm, 35, 33));
    }

    #[test]
    fn nothing_drawn_outside_items() {
        let mut pm = Pixmap::new(200, 200).unwrap();
        let items = vec![StimulusSpec {
            position: Position::new(0.0, 0.0),
            is_target: false,
            rotation: Rotation::Deg90,
        }];
        draw_stimuli(&mut pm, &items, 60.0, Color::BLACK);
        assert!(!ink_at(&pm, 150, 150));
    }
}
