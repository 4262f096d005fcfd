//! Error types for pixeldust.
//!
//! The simulation itself never fails. Errors only come from building a
//! [`Field`](crate::Field) (bad configuration, no images) and from the
//! outer surfaces: decoding image files and bringing up the viewer window.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating an [`EffectConfig`](crate::EffectConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value outside its accepted range.
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// Human readable constraint that was violated.
        reason: String,
    },

    /// The JSON document could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading source images.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    /// The image file could not be decoded.
    #[error("failed to load image '{}': {source}", .path.display())]
    Decode {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// A field needs at least one image to sample.
    #[error("no source images provided")]
    NoImages,
}

/// Errors raised while building a [`Field`](crate::Field).
#[derive(Debug, Error)]
pub enum FieldError {
    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Image list was empty.
    #[error(transparent)]
    Image(#[from] ImageLoadError),

    /// Width or height was zero.
    #[error("field dimensions must be non-zero, got {width}x{height}")]
    ZeroSize {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

/// Errors that can occur during GPU initialization for the viewer.
#[cfg(feature = "viewer")]
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; ensure your system supports Vulkan/Metal/DX12/WebGPU")]
    NoAdapter,

    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur when running the viewer.
#[cfg(feature = "viewer")]
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),

    /// The field could not be built.
    #[error(transparent)]
    Field(#[from] FieldError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_message_names_field() {
        let err = ConfigError::invalid("gap", "must be in [0, 1)");
        assert_eq!(
            err.to_string(),
            "invalid config value for `gap`: must be in [0, 1)"
        );
    }

    #[test]
    fn test_field_error_is_transparent() {
        let err: FieldError = ImageLoadError::NoImages.into();
        assert_eq!(err.to_string(), "no source images provided");
    }

    #[test]
    fn test_zero_size_message() {
        let err = FieldError::ZeroSize {
            width: 0,
            height: 720,
        };
        assert_eq!(
            err.to_string(),
            "field dimensions must be non-zero, got 0x720"
        );
    }
}
