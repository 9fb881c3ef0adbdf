//! Foveation mask: a translucent layer over the whole display with one fully
//! transparent circle at the focus point.

use crate::error::RenderError;
use fovea_core::FocusPoint;
use serde::{Deserialize, Serialize};
use tiny_skia::{BlendMode, Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Radius of the foveal window in pixels
    pub radius: f32,
    pub color: [u8; 3],
    /// Coverage strength of the occluding layer, 0..=1
    pub opacity: f32,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            radius: 30.0,
            color: [0xb7, 0xb7, 0xb7],
            opacity: 0.9725,
        }
    }
}

impl MaskConfig {
    pub fn alpha(&self) -> u8 {
        (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

pub struct OcclusionMask {
    config: MaskConfig,
    surface: Option<Pixmap>,
    last_focus: Option<FocusPoint>,
}

impl OcclusionMask {
    /// A mask with no surface yet. Renders are skipped until [`attach`](Self::attach).
    pub fn new(config: MaskConfig) -> Self {
        Self {
            config,
            surface: None,
            last_focus: None,
        }
    }

    /// (Re)creates the mask surface at display size and draws it at the last
    /// focus point, or the origin before any pointer movement.
    pub fn attach(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let surface =
            Pixmap::new(width, height).ok_or(RenderError::SurfaceSize { width, height })?;
        self.surface = Some(surface);
        self.render(self.last_focus.unwrap_or_default());
        Ok(())
    }

    pub fn detach(&mut self) {
        self.surface = None;
    }

    /// Redraws the mask around `focus`. Returns `false` when no surface is attached.
    pub fn render(&mut self, focus: FocusPoint) -> bool {
        self.last_focus = Some(focus);
        let Some(surface) = self.surface.as_mut() else {
            tracing::trace!("mask surface not attached, render skipped");
            return false;
        };

        surface.fill(Color::TRANSPARENT);

        let [r, g, b] = self.config.color;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, self.config.alpha());
        paint.anti_alias = false;
        if let Some(full) = Rect::from_xywh(
            0.0,
            0.0,
            surface.width() as f32,
            surface.height() as f32,
        ) {
            surface.fill_rect(full, &paint, Transform::identity(), None);
        }

        if let Some(window) = PathBuilder::from_circle(focus.x, focus.y, self.config.radius) {
            let mut cut = Paint::default();
            cut.set_color_rgba8(0, 0, 0, 255);
            cut.blend_mode = BlendMode::DestinationOut;
            cut.anti_alias = true;
            surface.fill_path(&window, &cut, FillRule::Winding, Transform::identity(), None);
        }

        true
    }

    /// Mask alpha at a pixel, `None` when detached or out of range.
    pub fn coverage_at(&self, x: u32, y: u32) -> Option<u8> {
        self.surface
            .as_ref()
            .and_then(|s| s.pixel(x, y))
            .map(|p| p.alpha())
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.surface.as_ref()
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached(width: u32, height: u32) -> OcclusionMask {
        let mut mask = OcclusionMask::new(MaskConfig::default());
        mask.attach(width, height).unwrap();
        mask
    }

    #[test]
    fn render_without_surface_is_a_noop() {
        let mut mask = OcclusionMask::new(MaskConfig::default());
        assert!(!mask.render(FocusPoint::new(10.0, 10.0)));
        assert_eq!(mask.coverage_at(10, 10), None);
    }

    #[test]
    fn covers_everything_but_the_window() {
        let mut mask = attached(400, 300);
        let full = MaskConfig::default().alpha();
        assert!(mask.render(FocusPoint::new(200.0, 150.0)));

        // inside the 30 px window
        assert_eq!(mask.coverage_at(200, 150), Some(0));
        assert_eq!(mask.coverage_at(220, 150), Some(0));
        assert_eq!(mask.coverage_at(200, 130), Some(0));

        // outside it
        assert_eq!(mask.coverage_at(240, 150), Some(full));
        assert_eq!(mask.coverage_at(0, 0), Some(full));
        assert_eq!(mask.coverage_at(399, 299), Some(full));
    }

    #[test]
    fn window_follows_focus() {
        let mut mask = attached(400, 300);
        let full = MaskConfig::default().alpha();
        mask.render(FocusPoint::new(50.0, 50.0));
        assert_eq!(mask.coverage_at(50, 50), Some(0));

        mask.render(FocusPoint::new(300.0, 200.0));
        assert_eq!(mask.coverage_at(50, 50), Some(full));
        assert_eq!(mask.coverage_at(300, 200), Some(0));
    }

    #[test]
    fn window_clips_at_display_edge() {
        let mut mask = attached(200, 200);
        mask.render(FocusPoint::new(0.0, 0.0));
        assert_eq!(mask.coverage_at(0, 0), Some(0));
        assert_eq!(mask.coverage_at(10, 10), Some(0));
        assert_eq!(mask.coverage_at(100, 100), Some(MaskConfig::default().alpha()));
    }

    #[test]
    fn attach_replays_last_focus() {
        let mut mask = OcclusionMask::new(MaskConfig::default());
        mask.render(FocusPoint::new(60.0, 60.0));
        mask.attach(120, 120).unwrap();
        assert_eq!(mask.coverage_at(60, 60), Some(0));
        assert_eq!(mask.coverage_at(5, 5), Some(MaskConfig::default().alpha()));
    }

    #[test]
    fn attach_covers_display_before_any_pointer_move() {
        let mut mask = OcclusionMask::new(MaskConfig::default());
        mask.attach(320, 240).unwrap();
        let full = MaskConfig::default().alpha();
        assert_eq!(mask.coverage_at(300, 200), Some(full));
        assert_eq!(mask.coverage_at(100, 100), Some(full));
        assert_eq!(mask.coverage_at(0, 0), Some(0));
    }

    #[test]
    fn opacity_maps_to_alpha() {
        assert_eq!(MaskConfig::default().alpha(), 248);
        let cfg = MaskConfig {
            opacity: 2.0,
            ..MaskConfig::default()
        };
        assert_eq!(cfg.alpha(), 255);
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        let mut mask = OcclusionMask::new(MaskConfig::default());
        assert!(mask.attach(0, 10).is_err());
        assert!(mask.pixmap().is_none());
    }
}
