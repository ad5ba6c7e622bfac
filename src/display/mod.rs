mod canvas;
pub mod font;
mod pixel_buffer;

pub use canvas::{Canvas, OpacityMode};
pub use font::{font_sheet, text_size, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use pixel_buffer::PixelBuffer;

#[cfg(feature = "sdl")]
pub use window::{Display, InputEvent, RenderTarget};

pub const DEFAULT_WIDTH: u32 = 256;
pub const DEFAULT_HEIGHT: u32 = 240;

#[cfg(feature = "sdl")]
mod window {
    use sdl2::event::Event;
    use sdl2::keyboard::Keycode;
    use sdl2::pixels::PixelFormatEnum;
    use sdl2::render::{Canvas, Texture, TextureCreator};
    use sdl2::video::{Window, WindowContext};
    use sdl2::EventPump;

    use super::PixelBuffer;
    use crate::error::Result;

    pub struct Display {
        canvas: Canvas<Window>,
        event_pump: EventPump,
        width: u32,
        height: u32,
    }

    /// Streaming texture the frame buffer is uploaded into
    pub struct RenderTarget<'a> {
        texture: Texture<'a>,
        width: u32,
        height: u32,
    }

    #[derive(Debug, Clone)]
    pub enum InputEvent {
        Quit,
        KeyDown(Keycode),
        KeyUp(Keycode),
    }

    impl Display {
        /// Open a window of `width * scale` by `height * scale` pixels.
        /// vsync=true locks presentation to the monitor refresh.
        pub fn with_options(
            title: &str,
            width: u32,
            height: u32,
            scale: u32,
            vsync: bool,
        ) -> Result<(Self, TextureCreator<WindowContext>)> {
            let scale = scale.max(1);
            let sdl_context = sdl2::init()?;
            let video_subsystem = sdl_context.video()?;

            let too_large = || crate::error::Error::Resolution {
                width,
                height,
                scale,
            };
            let window_width = width.checked_mul(scale).ok_or_else(too_large)?;
            let window_height = height.checked_mul(scale).ok_or_else(too_large)?;

            let window = video_subsystem
                .window(title, window_width, window_height)
                .position_centered()
                .build()
                .map_err(|e| e.to_string())?;

            let mut canvas_builder = window.into_canvas().accelerated();
            if vsync {
                canvas_builder = canvas_builder.present_vsync();
            }
            let canvas = canvas_builder.build().map_err(|e| e.to_string())?;

            let texture_creator = canvas.texture_creator();
            let event_pump = sdl_context.event_pump()?;

            Ok((
                Self {
                    canvas,
                    event_pump,
                    width,
                    height,
                },
                texture_creator,
            ))
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }

        /// Upload `buffer` if it changed since the last upload, then present.
        /// The texture is stretched over the whole window.
        pub fn present(&mut self, target: &mut RenderTarget, buffer: &mut PixelBuffer) -> Result<()> {
            if buffer.width() != target.width || buffer.height() != target.height {
                return Err(crate::error::Error::SizeMismatch {
                    expected: (target.width, target.height),
                    found: (buffer.width(), buffer.height()),
                });
            }

            if buffer.take_dirty() {
                target
                    .texture
                    .update(None, buffer.as_bytes(), (buffer.width() * 4) as usize)
                    .map_err(|e| e.to_string())?;
            }

            self.canvas.copy(&target.texture, None, None)?;
            self.canvas.present();
            Ok(())
        }

        pub fn poll_events(&mut self) -> Vec<InputEvent> {
            let mut events = Vec::new();

            for event in self.event_pump.poll_iter() {
                match event {
                    Event::Quit { .. } => events.push(InputEvent::Quit),
                    Event::KeyDown {
                        keycode: Some(k), ..
                    } => events.push(InputEvent::KeyDown(k)),
                    Event::KeyUp {
                        keycode: Some(k), ..
                    } => events.push(InputEvent::KeyUp(k)),
                    _ => {},
                }
            }

            events
        }
    }

    impl<'a> RenderTarget<'a> {
        pub fn with_size(
            texture_creator: &'a TextureCreator<WindowContext>,
            width: u32,
            height: u32,
        ) -> Result<Self> {
            // ABGR8888 is R, G, B, A in memory on little-endian, matching Color's layout
            let texture = texture_creator
                .create_texture_streaming(PixelFormatEnum::ABGR8888, width, height)
                .map_err(|e| e.to_string())?;
            Ok(Self {
                texture,
                width,
                height,
            })
        }
    }
}
