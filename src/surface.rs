//! Drawing surfaces.
//!
//! A [`Surface`] is the 2D drawing target a [`Field`](crate::Field) samples
//! source images from and renders particles onto. [`Canvas`] is the CPU
//! implementation backed by an [`image::RgbaImage`]; the viewer uploads it to
//! the GPU once per frame.
//!
//! Coordinates are in pixels with the origin at the top-left corner. Drawing
//! outside the surface is clipped silently.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::error::ImageLoadError;

/// 2D drawing target.
pub trait Surface {
    /// Surface extent in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Draw `image` scaled to `w x h` with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32, w: f32, h: f32);

    /// Read a rectangle back as row-major RGBA bytes, 4 per pixel.
    ///
    /// Pixels outside the surface read as transparent black.
    fn read_pixels(&self, x: u32, y: u32, w: u32, h: u32) -> Vec<u8>;

    /// Reset a rectangle to transparent black.
    fn clear(&mut self, x: f32, y: f32, w: f32, h: f32);

    /// Fill a rectangle with an opaque color.
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
}

/// CPU RGBA surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Create a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Raw RGBA bytes of the whole canvas.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Write the current contents to an image file (format from extension).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.image.save(path)
    }

    fn fill(&mut self, x: f32, y: f32, w: f32, h: f32, pixel: Rgba<u8>) {
        let Some((x0, x1)) = clip_span(x, w, self.image.width()) else {
            return;
        };
        let Some((y0, y1)) = clip_span(y, h, self.image.height()) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px, py, pixel);
            }
        }
    }
}

impl Surface for Canvas {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32, w: f32, h: f32) {
        if !(x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite()) {
            return;
        }
        let (tw, th) = (w.round() as u32, h.round() as u32);
        if tw == 0 || th == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }

        let (ox, oy) = (x.round() as i64, y.round() as i64);
        if image.dimensions() == (tw, th) {
            imageops::overlay(&mut self.image, image, ox, oy);
        } else {
            let scaled = imageops::resize(image, tw, th, FilterType::Triangle);
            imageops::overlay(&mut self.image, &scaled, ox, oy);
        }
    }

    fn read_pixels(&self, x: u32, y: u32, w: u32, h: u32) -> Vec<u8> {
        let mut out = vec![0u8; w as usize * h as usize * 4];
        let (width, height) = self.image.dimensions();
        for row in 0..h {
            let sy = y.saturating_add(row);
            if sy >= height {
                break;
            }
            for col in 0..w {
                let sx = x.saturating_add(col);
                if sx >= width {
                    break;
                }
                let dst = (row as usize * w as usize + col as usize) * 4;
                out[dst..dst + 4].copy_from_slice(&self.image.get_pixel(sx, sy).0);
            }
        }
        out
    }

    fn clear(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.fill(x, y, w, h, Rgba([0, 0, 0, 0]));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let [r, g, b] = color.0;
        self.fill(x, y, w, h, Rgba([r, g, b, 255]));
    }
}

/// Snap `[start, start + len)` to whole pixels and clip it to `[0, limit)`.
fn clip_span(start: f32, len: f32, limit: u32) -> Option<(u32, u32)> {
    if !(start.is_finite() && len.is_finite()) || len <= 0.0 {
        return None;
    }
    let lo = start.round().max(0.0);
    let hi = (start + len).round().min(limit as f32);
    if lo >= hi {
        return None;
    }
    Some((lo as u32, hi as u32))
}

/// Decode a PNG or JPEG file into RGBA.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RgbaImage, ImageLoadError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| ImageLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.into_rgba8())
}
