//! Pixel color sampling.

use image::Rgb;

/// Fill color of a particle.
pub type Color = Rgb<u8>;

/// Sample the display color of the pixel starting at byte `index` in an RGBA
/// buffer.
///
/// Returns `None` when the pixel is fully transparent (or `index` lies outside
/// the buffer); alpha presence is the only thing deciding whether a grid cell
/// becomes a particle. Otherwise the override color is returned when set, or
/// each RGB channel multiplied by `brightness` and clamped to 255.
pub fn sample_color(
    pixels: &[u8],
    index: usize,
    brightness: f32,
    override_color: Option<[u8; 3]>,
) -> Option<Color> {
    let rgba = pixels.get(index..index + 4)?;
    if rgba[3] == 0 {
        return None;
    }
    if let Some(rgb) = override_color {
        return Some(Rgb(rgb));
    }

    let scale = |channel: u8| (channel as f32 * brightness).min(255.0) as u8;
    Some(Rgb([scale(rgba[0]), scale(rgba[1]), scale(rgba[2])]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_pixel_is_none() {
        let pixels = [255, 128, 7, 0];
        assert_eq!(sample_color(&pixels, 0, 1.0, None), None);
        assert_eq!(sample_color(&pixels, 0, 3.0, Some([1, 2, 3])), None);
    }

    #[test]
    fn test_brightness_scales_and_clamps() {
        let pixels = [0, 0, 0, 0, 100, 200, 20, 1];
        assert_eq!(sample_color(&pixels, 4, 1.0, None), Some(Rgb([100, 200, 20])));
        assert_eq!(sample_color(&pixels, 4, 2.0, None), Some(Rgb([200, 255, 40])));
        assert_eq!(sample_color(&pixels, 4, 0.5, None), Some(Rgb([50, 100, 10])));
    }

    #[test]
    fn test_override_color_wins() {
        let pixels = [10, 20, 30, 255];
        assert_eq!(
            sample_color(&pixels, 0, 2.0, Some([9, 8, 7])),
            Some(Rgb([9, 8, 7]))
        );
    }

    #[test]
    fn test_out_of_bounds_is_none() {
        let pixels = [10, 20, 30, 255];
        assert_eq!(sample_color(&pixels, 4, 1.0, None), None);
        assert_eq!(sample_color(&pixels, 2, 1.0, None), None);
    }
}
