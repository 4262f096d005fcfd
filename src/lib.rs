//! # pixeldust
//!
//! Render an image as a field of colored blocks that scatter away from the
//! pointer and spring back to where they came from.
//!
//! Every block ("particle") is anchored to a pixel sampled from a source image
//! on a fixed grid. Each frame the pointer pushes nearby particles away while a
//! damped spring pulls every particle back to its origin. Switching images
//! re-anchors the live particles onto the new pixel grid instead of rebuilding
//! them, so the picture morphs from one image into the next.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pixeldust::prelude::*;
//!
//! let images = vec![load_image("logo.png")?, load_image("portrait.png")?];
//! let config = EffectConfig::new()
//!     .with_particle_spacing(3)
//!     .with_gap(0.01)
//!     .with_brightness(2.0)
//!     .with_vibrate(Vibrate { chance: 0.1, velocity: 0.2 });
//!
//! let field = Field::new(1280, 720, images, config)?;
//! Viewer::new(field).run()?;
//! ```
//!
//! ## Headless use
//!
//! Everything except the viewer works on any [`Surface`]. [`Canvas`] is a CPU
//! RGBA surface, so a field can be stepped and inspected without a window:
//!
//! ```ignore
//! let mut canvas = Canvas::new(200, 100);
//! let mut field = Field::new(200, 100, images, EffectConfig::new().with_seed(7))?;
//! field.init(&mut canvas);
//! field.set_pointer(100.0, 50.0);
//! for _ in 0..60 {
//!     field.frame(&mut canvas);
//! }
//! canvas.save("frame.png")?;
//! ```
//!
//! ## Configuration
//!
//! | option | effect | default |
//! |--------|--------|---------|
//! | `gap` | fraction of each cell left blank | `0` |
//! | `particle_spacing` | grid stride in pixels, also the block size | `5` |
//! | `color` | fixed color for all particles | sampled |
//! | `influence_radius` | pointer repulsion radius (squared distance) | `20000` |
//! | `brightness` | multiplier for sampled RGB | `1` |
//! | `vibrate` | random jitter for resting particles | off |
//! | `ease` | random range of per-particle elasticity | `0.1` |
//! | `scale` | source image draw scale | `1` |
//! | `seed` | seed for reproducible runs | entropy |

pub mod color;
pub mod config;
pub mod error;
pub mod field;
#[cfg(feature = "viewer")]
mod gpu;
pub mod input;
pub mod particle;
pub mod surface;
pub mod time;
#[cfg(feature = "viewer")]
mod viewer;

pub use color::{sample_color, Color};
pub use config::{EffectConfig, Vibrate};
pub use error::{ConfigError, FieldError, ImageLoadError};
#[cfg(feature = "viewer")]
pub use error::{GpuError, ViewerError};
pub use field::{Field, Reconciliation};
pub use glam::{IVec2, Vec2};
pub use input::{Command, InputAction, Pointer};
pub use particle::Particle;
pub use surface::{load_image, Canvas, Surface};
pub use time::FrameClock;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use pixeldust::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::config::{EffectConfig, Vibrate};
    pub use crate::field::Field;
    pub use crate::input::{Command, Pointer};
    pub use crate::surface::{load_image, Canvas, Surface};
    #[cfg(feature = "viewer")]
    pub use crate::viewer::Viewer;
    pub use crate::{IVec2, Vec2};
}
