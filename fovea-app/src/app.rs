use crate::config::{AppConfig, DisplayConfig};
use anyhow::{Context, Result};
use fovea_core::{Bounds, TrialEvent, TrialState};
use fovea_experiment::{ExperimentEvent, ExperimentSession, TracingSink, TrialEventSink};
use fovea_render::{OcclusionMask, Scene, SkiaRenderer, TextPainter};
use fovea_timing::{HighPrecisionTimer, Timer};
use pixels::{Pixels, SurfaceTexture};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    session: ExperimentSession<HighPrecisionTimer, StdRng>,
    renderer: Option<SkiaRenderer>,
    mask: OcclusionMask,
    sink: TracingSink,
    /// Handed to the renderer once the window exists
    text: Option<TextPainter>,
    display: DisplayConfig,
    frame_timer: HighPrecisionTimer,
    cursor: PhysicalPosition<f64>,
    scale_factor: f64,
    refresh_rate: Option<f64>,

    should_exit: bool,
}

impl App {
    pub fn new(config: AppConfig, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => {
                tracing::info!(seed, "layout generation seeded");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let session = ExperimentSession::new(config.experiment, HighPrecisionTimer::new(), rng)
            .context("invalid experiment configuration")?;

        let text = match &config.display.font_path {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("reading font {}", path.display()))?;
                let painter = TextPainter::from_bytes(bytes)
                    .with_context(|| format!("loading font {}", path.display()))?;
                tracing::info!(font = %path.display(), "font loaded");
                painter
            }
            None => {
                tracing::warn!("no font given, feedback is shown as a coloured banner");
                TextPainter::without_font()
            }
        };

        Ok(Self {
            window: None,
            pixels: None,
            session,
            renderer: None,
            mask: OcclusionMask::new(config.mask),
            sink: TracingSink,
            text: Some(text),
            display: config.display,
            frame_timer: HighPrecisionTimer::new(),
            cursor: PhysicalPosition::new(0.0, 0.0),
            scale_factor: 1.0,
            refresh_rate: None,
            should_exit: false,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        tracing::info!(
            platform = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            "click Start or press Enter to begin, Space for target absent, Escape to quit"
        );
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .context("no monitor available")?;

        self.refresh_rate = monitor
            .refresh_rate_millihertz()
            .map(|rate| rate as f64 / 1000.0);

        let mut attributes = Window::default_attributes().with_title("Fovea");
        if self.display.fullscreen {
            attributes = attributes
                .with_fullscreen(Some(Fullscreen::Borderless(Some(monitor))))
                .with_resizable(false);
        }

        let window = Arc::new(event_loop.create_window(attributes)?);
        let size = window.inner_size();
        self.scale_factor = window.scale_factor();

        tracing::info!(
            width = size.width,
            height = size.height,
            scale_factor = self.scale_factor,
            refresh_hz = ?self.refresh_rate,
            fullscreen = self.display.fullscreen,
            "display configured"
        );

        let surface = SurfaceTexture::new(size.width, size.height, window.clone());
        self.pixels = Some(Pixels::new(size.width, size.height, surface)?);

        let text = self.text.take().unwrap_or_else(TextPainter::without_font);
        let mut renderer = SkiaRenderer::new(size.width, size.height, text)?;
        renderer.set_cursor_ring(self.display.debug_cursor_ring);
        self.renderer = Some(renderer);

        self.attach_display(size)?;

        window.set_cursor_visible(false);
        window.request_redraw();
        self.window = Some(window);

        Ok(())
    }

    fn attach_display(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        self.mask
            .attach(size.width, size.height)
            .context("allocating mask surface")?;
        self.session
            .attach_display(Bounds::from_pixels(size.width, size.height));
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let (Some(pix), Some(renderer)) = (self.pixels.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };

        let state = self.session.state();
        let items = self
            .session
            .current_layout()
            .map(|layout| layout.items.as_slice())
            .unwrap_or(&[]);
        let scene = Scene {
            state,
            items,
            item_size: self.session.item_size(),
            feedback: self.session.feedback(),
            focus: self.session.focus(),
        };

        let frame = pix.frame_mut();
        let stats = renderer.render_frame(&scene, &self.mask, frame, &mut self.frame_timer)?;
        let now = self.frame_timer.now();
        pix.render()?;
        let present = self.frame_timer.elapsed(now);

        tracing::trace!(
            clear_ms = stats.clear.as_secs_f64() * 1e3,
            scene_ms = stats.scene.as_secs_f64() * 1e3,
            mask_ms = stats.mask.as_secs_f64() * 1e3,
            copy_ms = stats.copy.as_secs_f64() * 1e3,
            present_ms = present.as_secs_f64() * 1e3,
            "frame"
        );

        // The layout is on screen only once a frame carrying it was presented
        if state == TrialState::Presenting {
            self.deliver(ExperimentEvent::Presented);
        }

        Ok(())
    }

    fn update(&mut self) {
        for event in self.session.update() {
            self.deliver(event);
        }
    }

    fn deliver(&mut self, event: ExperimentEvent) {
        if let Some(trial_event) = self.session.handle_event(event) {
            if matches!(trial_event, TrialEvent::Started { .. }) {
                self.mask.render(self.session.focus());
            }
            self.sink.publish(&trial_event);
        }
    }

    fn handle_pointer(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = position;
        let (x, y) = (position.x as f32, position.y as f32);
        self.deliver(ExperimentEvent::PointerMoved { x, y });
        self.mask.render(self.session.focus());
    }

    fn handle_click(&mut self) {
        let (x, y) = (self.cursor.x as f32, self.cursor.y as f32);
        if self.session.state() == TrialState::Idle {
            let on_button = self
                .renderer
                .as_ref()
                .is_some_and(|r| r.start_button_contains(x, y));
            if on_button {
                self.deliver(ExperimentEvent::StartPressed);
            }
            return;
        }
        if let Some(index) = self.session.hit_test(x, y) {
            self.deliver(ExperimentEvent::StimulusClicked { index });
        }
    }

    fn handle_key(&mut self, event: KeyEvent, event_loop: &ActiveEventLoop) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;
        match code {
            KeyCode::Space if pressed => self.deliver(ExperimentEvent::AbsentKeyPressed),
            KeyCode::Space => self.deliver(ExperimentEvent::AbsentKeyReleased),
            KeyCode::Enter | KeyCode::NumpadEnter if pressed && !event.repeat => {
                self.deliver(ExperimentEvent::StartPressed)
            }
            KeyCode::Escape if pressed => self.cleanup_and_exit(event_loop),
            _ => {}
        }
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            tracing::debug!("window minimised, resize skipped");
            return;
        }
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                tracing::error!(error = %e, "failed to resize surface");
            }
            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                tracing::error!(error = %e, "failed to resize buffer");
            }
        }
        if let Some(renderer) = self.renderer.as_mut() {
            if let Err(e) = renderer.resize(new_size.width, new_size.height) {
                tracing::error!(error = %e, "failed to resize renderer");
            }
        }
        if let Err(e) = self.attach_display(new_size) {
            tracing::error!(error = %e, "failed to reattach display");
        }
        tracing::info!(width = new_size.width, height = new_size.height, "display resized");
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.set_cursor_visible(true);
        }

        let stats = self.frame_timer.frame_stats();
        tracing::info!(
            trials = self.session.trial_number(),
            frames = stats.samples,
            mean_ms = stats.average_frame_time_ns / 1e6,
            jitter_ms = stats.jitter_ns / 1e6,
            min_ms = stats.min_frame_time_ns / 1e6,
            max_ms = stats.max_frame_time_ns / 1e6,
            fps = stats.effective_fps,
            "session finished"
        );

        self.mask.detach();
        self.session.detach_display();
        self.should_exit = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                tracing::error!(error = %format!("{e:#}"), "failed to create window and surface");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.cleanup_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    tracing::error!(error = %format!("{e:#}"), "render failed");
                    self.cleanup_and_exit(event_loop);
                    return;
                }
                self.update();
                if let Some(win) = &self.window {
                    win.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => self.handle_pointer(position),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.handle_click(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event, event_loop),
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                if let Some(window) = &self.window {
                    self.handle_resize(window.inner_size());
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}
