//! Engine context
//!
//! Owns the frame buffer, frame timing and the schedule. One `Engine`
//! drives one window; nothing here is global.

use crate::color::Color;
use crate::config::EngineConfig;
use crate::display::{Canvas, OpacityMode, PixelBuffer, GLYPH_HEIGHT};
use crate::schedule::{FrameContext, Schedule};
use crate::util::FpsCounter;

const FPS_SAMPLES: usize = 60;

pub struct Engine {
    config: EngineConfig,
    schedule: Schedule,
    buffer: PixelBuffer,
    ctx: FrameContext,
    fps: FpsCounter,
    mode: OpacityMode,
    clear_color: Color,
    show_fps: bool,
}

impl Engine {
    pub fn new(config: EngineConfig, schedule: Schedule) -> Self {
        let buffer = PixelBuffer::with_size(config.width, config.height);
        let ctx = FrameContext::new(config.width, config.height);
        Self {
            mode: config.opacity_mode,
            clear_color: config.clear_color(),
            show_fps: config.show_fps,
            config,
            schedule,
            buffer,
            ctx,
            fps: FpsCounter::new(FPS_SAMPLES),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The frame buffer as of the last completed frame
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn context(&self) -> &FrameContext {
        &self.ctx
    }

    /// Opacity mode the next frame starts in. Systems may change it and
    /// the change carries over to later frames.
    pub fn mode(&self) -> OpacityMode {
        self.mode
    }

    pub fn toggle_fps(&mut self) {
        self.show_fps = !self.show_fps;
    }

    /// Render one frame of `dt` seconds into the buffer.
    /// Returns false once a system has asked to quit.
    pub fn frame(&mut self, dt: f32) -> bool {
        self.ctx.advance(dt);

        let mut canvas = Canvas::new(&mut self.buffer).with_mode(self.mode);
        canvas.clear(self.clear_color);
        self.schedule.run_frame(&mut self.ctx, &mut canvas);
        self.mode = canvas.mode();

        if self.show_fps {
            draw_fps_overlay(&mut canvas, &self.fps);
        }

        !self.ctx.quit_requested()
    }

    /// Open a window and run frames until the window closes, Escape is
    /// pressed or a system requests quit.
    #[cfg(feature = "sdl")]
    pub fn run(mut self) -> crate::error::Result<()> {
        use sdl2::keyboard::Keycode;

        use crate::display::{Display, InputEvent, RenderTarget};

        let (width, height) = (self.config.width, self.config.height);
        let (mut display, texture_creator) = Display::with_options(
            &self.config.title,
            width,
            height,
            self.config.pixel_scale,
            self.config.vsync,
        )?;
        let mut target = RenderTarget::with_size(&texture_creator, width, height)?;

        log::info!(
            "{}: {}x{} at scale {}, vsync {}",
            self.config.title,
            width,
            height,
            self.config.pixel_scale,
            if self.config.vsync { "on" } else { "off" }
        );
        log::info!("{:?}", self.schedule);

        'main: loop {
            let (dt, _current_fps, _avg_fps) = self.fps.tick();

            for event in display.poll_events() {
                match event {
                    InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                    InputEvent::KeyDown(Keycode::F) => self.toggle_fps(),
                    _ => {},
                }
            }

            let running = self.frame(dt);

            // Hold the buffer still while it is uploaded
            self.buffer.lock();
            let presented = display.present(&mut target, &mut self.buffer);
            self.buffer.unlock();
            presented?;

            if !running {
                log::debug!("quit requested by a system");
                break;
            }
        }

        log::info!(
            "stopped after {} frames ({:.1}s)",
            self.ctx.frame + 1,
            self.ctx.elapsed
        );
        Ok(())
    }
}

/// Overlay text: each label is followed by its own value
fn fps_text(fps: &FpsCounter) -> String {
    let ms = fps.avg_frame_time_ms();
    let avg_fps = if ms > 0.0 { 1000.0 / ms } else { 0.0 };
    let (min_fps, max_fps) = fps.min_max_fps();
    format!(
        "FPS avg {} min {} max {} {}ms",
        avg_fps as u32, min_fps as u32, max_fps as u32, ms as u32
    )
}

/// Frame statistics along the bottom edge, drawn with a drop shadow
fn draw_fps_overlay(canvas: &mut Canvas<'_>, fps: &FpsCounter) {
    let text = fps_text(fps);

    let mode = canvas.mode();
    canvas.set_mode(OpacityMode::Normal);
    let y = canvas.height() as i32 - GLYPH_HEIGHT as i32 - 4;
    canvas.draw_string(5, y + 1, &text, Color::BLACK, 1);
    canvas.draw_string(4, y, &text, Color::YELLOW, 1);
    canvas.set_mode(mode);
}
