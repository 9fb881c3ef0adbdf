use crate::error::RenderError;
use crate::mask::OcclusionMask;
use crate::stimuli::draw_stimuli;
use crate::text::TextPainter;
use fovea_core::{Feedback, FocusPoint, StimulusSpec, TrialState};
use fovea_timing::Timer;
use std::time::Duration;
use tiny_skia::{
    Color, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

const BACKGROUND: Color = Color::WHITE;
const INK: Color = Color::BLACK;
const BUTTON_SIZE: (f32, f32) = (160.0, 56.0);
const CURSOR_RING_RADIUS: f32 = 25.0;

pub struct FrameStats {
    pub clear: Duration,
    pub scene: Duration,
    pub mask: Duration,
    pub copy: Duration,
    pub total: Duration,
}

/// What one frame shows, borrowed from the running session
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub state: TrialState,
    pub items: &'a [StimulusSpec],
    pub item_size: f32,
    pub feedback: Option<Feedback>,
    pub focus: FocusPoint,
}

/// Composes stimuli, the occlusion mask and overlays into the window frame
pub struct SkiaRenderer {
    width: u32,
    height: u32,
    center: (f32, f32),
    canvas: Pixmap,
    text: TextPainter,
    cursor_ring: bool,
}

impl SkiaRenderer {
    pub fn new(width: u32, height: u32, text: TextPainter) -> Result<Self, RenderError> {
        let canvas = Pixmap::new(width, height).ok_or(RenderError::SurfaceSize { width, height })?;
        Ok(Self {
            width,
            height,
            center: (width as f32 / 2.0, height as f32 / 2.0),
            canvas,
            text,
            cursor_ring: false,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) -> Result<(), RenderError> {
        self.canvas = Pixmap::new(new_width, new_height).ok_or(RenderError::SurfaceSize {
            width: new_width,
            height: new_height,
        })?;
        self.width = new_width;
        self.height = new_height;
        self.center = (new_width as f32 / 2.0, new_height as f32 / 2.0);
        Ok(())
    }

    /// Enables the debug ring drawn at the focus point.
    pub fn set_cursor_ring(&mut self, enabled: bool) {
        self.cursor_ring = enabled;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn start_button(&self) -> Option<Rect> {
        let (w, h) = BUTTON_SIZE;
        Rect::from_xywh(self.center.0 - w / 2.0, self.center.1 - h / 2.0, w, h)
    }

    pub fn start_button_contains(&self, x: f32, y: f32) -> bool {
        self.start_button()
            .is_some_and(|r| x >= r.left() && x < r.right() && y >= r.top() && y < r.bottom())
    }

    /// Draws `scene` and copies it into `frame_buffer` (RGBA8, window sized).
    pub fn render_frame<T: Timer>(
        &mut self,
        scene: &Scene<'_>,
        mask: &OcclusionMask,
        frame_buffer: &mut [u8],
        timer: &mut T,
    ) -> Result<FrameStats, RenderError> {
        let expected = self.canvas.data().len();
        if frame_buffer.len() != expected {
            return Err(RenderError::FrameSize {
                expected,
                actual: frame_buffer.len(),
            });
        }

        let t_clear = {
            let t = timer.now();
            self.canvas.fill(BACKGROUND);
            timer.elapsed(t)
        };

        let t_scene = {
            let t = timer.now();
            if scene.state.shows_stimuli() {
                draw_stimuli(&mut self.canvas, scene.items, scene.item_size, INK);
            }
            timer.elapsed(t)
        };

        let t_mask = {
            let t = timer.now();
            self.composite_mask(mask);
            if self.cursor_ring {
                self.draw_cursor_ring(scene.focus);
            }
            match (scene.state, scene.feedback) {
                (TrialState::Idle, _) => self.draw_start_button(),
                (TrialState::FeedbackShown, Some(feedback)) => self.draw_feedback(feedback),
                _ => {}
            }
            timer.elapsed(t)
        };

        let t_copy = {
            let t = timer.now();
            frame_buffer.copy_from_slice(self.canvas.data());
            timer.elapsed(t)
        };

        let total = t_clear + t_scene + t_mask + t_copy;
        timer.record_frame(total);

        Ok(FrameStats {
            clear: t_clear,
            scene: t_scene,
            mask: t_mask,
            copy: t_copy,
            total,
        })
    }

    fn composite_mask(&mut self, mask: &OcclusionMask) {
        let Some(layer) = mask.pixmap() else {
            return;
        };
        self.canvas.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn draw_cursor_ring(&mut self, focus: FocusPoint) {
        let Some(ring) = PathBuilder::from_circle(focus.x, focus.y, CURSOR_RING_RADIUS) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(255, 0, 0, 255);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: 1.0,
            ..Default::default()
        };
        self.canvas
            .stroke_path(&ring, &paint, &stroke, Transform::identity(), None);
    }

    fn draw_start_button(&mut self) {
        let Some(rect) = self.start_button() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(58, 123, 213, 255);
        self.canvas
            .fill_rect(rect, &paint, Transform::identity(), None);
        self.text
            .draw_centered(&mut self.canvas, "Start", self.center, 28.0, [255, 255, 255, 255]);
    }

    fn draw_feedback(&mut self, feedback: Feedback) {
        let anchor = (self.center.0, 40.0);
        let color = feedback.color();
        if self
            .text
            .draw_centered(&mut self.canvas, feedback.label(), anchor, 32.0, color)
        {
            return;
        }

        // No font: fall back to a coloured banner
        let Some(banner) = Rect::from_xywh(anchor.0 - 100.0, anchor.1 - 20.0, 200.0, 40.0) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
        self.canvas
            .fill_rect(banner, &paint, Transform::identity(), None);
    }
}
