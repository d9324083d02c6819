use std::env;
use std::str::FromStr;

use thiserror::Error;
use winit::dpi::PhysicalSize;

pub const TITLE: &str = "triangle";
pub const DIMS: PhysicalSize<u32> = PhysicalSize {
    width: 1024,
    height: 768,
};
pub const MIN_DIMS: f64 = 64.0;
pub const GLES_VERSION: (u8, u8) = (2, 0);
pub const DEPTH_BITS: u8 = 24;

pub const RENDER_MODE_VAR: &str = "TRIANGLE_RENDER_MODE";

/// When the host asks for a new frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Every turn of the event loop, paced by vsync.
    Continuously,
    /// Only when the window system reports the surface as damaged.
    WhenDirty,
}

impl Default for RenderMode {
    fn default() -> Self {
        RenderMode::Continuously
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown render mode `{0}`, expected `continuously` or `when_dirty`")]
pub struct ParseRenderModeError(String);

impl FromStr for RenderMode {
    type Err = ParseRenderModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuously" | "continuous" => Ok(RenderMode::Continuously),
            "when_dirty" | "when-dirty" => Ok(RenderMode::WhenDirty),
            _ => Err(ParseRenderModeError(s.to_owned())),
        }
    }
}

impl RenderMode {
    pub fn from_env() -> Result<Self, ParseRenderModeError> {
        match env::var(RENDER_MODE_VAR) {
            Ok(value) => value.parse(),
            Err(_) => Ok(RenderMode::default()),
        }
    }
}

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
