//! pixelforge - a small retro software rasterizer.
//!
//! Everything is drawn on the CPU into a [`PixelBuffer`] through a
//! [`Canvas`], which applies the active [`OpacityMode`] to every write.
//! With the `sdl` feature the buffer is presented in a scaled window.

pub mod color;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod schedule;
pub mod util;

pub use color::Color;
pub use config::EngineConfig;
pub use display::{Canvas, OpacityMode, PixelBuffer};
pub use engine::Engine;
pub use error::{Error, Result};
pub use schedule::{FrameContext, Phase, Schedule, System};
