//! Crate-wide error type
//!
//! Only operations that cannot partially succeed report errors. The drawing
//! path never does; it drops writes instead.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Buffer-to-buffer copy between different dimensions
    SizeMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
    /// Image file could not be decoded
    Image(image::ImageError),
    Io(std::io::Error),
    /// Malformed configuration file
    Config(serde_json::Error),
    /// Frame buffer or window size outside what the engine can allocate
    Resolution { width: u32, height: u32, scale: u32 },
    /// Window or texture failure reported by SDL (which only gives us strings)
    Display(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SizeMismatch { expected, found } => write!(
                f,
                "buffer size mismatch: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            Error::Image(e) => write!(f, "image decode failed: {}", e),
            Error::Io(e) => write!(f, "i/o error: {}", e),
            Error::Config(e) => write!(f, "invalid config: {}", e),
            Error::Resolution {
                width,
                height,
                scale,
            } => write!(
                f,
                "unsupported resolution {}x{} at scale {}",
                width, height, scale
            ),
            Error::Display(msg) => write!(f, "display error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Image(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::Config(e) => Some(e),
            Error::SizeMismatch { .. } | Error::Resolution { .. } | Error::Display(_) => None,
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Display(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_message() {
        let e = Error::SizeMismatch {
            expected: (4, 4),
            found: (2, 3),
        };
        assert_eq!(e.to_string(), "buffer size mismatch: expected 4x4, found 2x3");
    }

    #[test]
    fn test_display_error_from_string() {
        let e: Error = String::from("no video device").into();
        assert!(matches!(e, Error::Display(ref m) if m == "no video device"));
        assert!(std::error::Error::source(&e).is_none());
    }

    #[test]
    fn test_resolution_message() {
        let e = Error::Resolution {
            width: 65536,
            height: 65536,
            scale: 3,
        };
        assert_eq!(e.to_string(), "unsupported resolution 65536x65536 at scale 3");
    }
}
