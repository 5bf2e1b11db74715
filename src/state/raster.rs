// Image dimensions and single-pixel color lookups on the loaded map.

/// Scale of the preview image drawn while panning/zooming.
pub const LOW_RES_FACTOR: f64 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Per-channel (Chebyshev) match.
    pub fn within(self, reference: Rgb, tolerance: u8) -> bool {
        self.r.abs_diff(reference.r) <= tolerance
            && self.g.abs_diff(reference.g) <= tolerance
            && self.b.abs_diff(reference.b) <= tolerance
    }
}

/// Native dimensions of the full-resolution image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// Preview dimensions, never collapsing below one pixel.
    pub fn preview(self) -> ImageSize {
        let scale = |v: u32| ((v as f64 * LOW_RES_FACTOR).floor() as u32).max(1);
        ImageSize {
            width: scale(self.width),
            height: scale(self.height),
        }
    }

    /// Nearest integer pixel to an image-space position, or None outside.
    pub fn pixel_at(self, x: f64, y: f64) -> Option<(u32, u32)> {
        let xr = x.round();
        let yr = y.round();
        if !(xr >= 0.0 && yr >= 0.0) {
            return None;
        }
        if xr >= self.width as f64 || yr >= self.height as f64 {
            return None;
        }
        Some((xr as u32, yr as u32))
    }
}

/// Reads the color of one image pixel on demand.
///
/// Implementations return None whenever the pixel cannot be read; callers
/// treat that as "no color information", never as an error.
pub trait PixelSource {
    fn sample(&self, x: f64, y: f64) -> Option<Rgb>;
}

/// Row-major RGBA pixels held in memory, four bytes per pixel.
#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    size: ImageSize,
    rgba: Vec<u8>,
}

#[cfg(test)]
impl PixelBuffer {
    /// Returns None when the byte length does not match the dimensions.
    pub fn from_rgba(size: ImageSize, rgba: Vec<u8>) -> Option<Self> {
        let expected = (size.width as usize)
            .checked_mul(size.height as usize)?
            .checked_mul(4)?;
        (rgba.len() == expected).then_some(Self { size, rgba })
    }
}

#[cfg(test)]
impl PixelSource for PixelBuffer {
    fn sample(&self, x: f64, y: f64) -> Option<Rgb> {
        let (xi, yi) = self.size.pixel_at(x, y)?;
        let i = (yi as usize * self.size.width as usize + xi as usize) * 4;
        let px = self.rgba.get(i..i + 3)?;
        Some(Rgb::new(px[0], px[1], px[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> PixelBuffer {
        // 2x2: red, green / blue, white
        let rgba = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        PixelBuffer::from_rgba(ImageSize { width: 2, height: 2 }, rgba).unwrap()
    }

    #[test]
    fn sample_rounds_to_nearest_pixel() {
        let buf = checker();
        assert_eq!(buf.sample(0.4, 0.4), Some(Rgb::new(255, 0, 0)));
        assert_eq!(buf.sample(0.6, 0.2), Some(Rgb::new(0, 255, 0)));
        assert_eq!(buf.sample(1.2, 0.9), Some(Rgb::new(255, 255, 255)));
    }

    #[test]
    fn sample_outside_is_none() {
        let buf = checker();
        assert_eq!(buf.sample(-0.6, 0.0), None);
        assert_eq!(buf.sample(1.6, 0.0), None);
        assert_eq!(buf.sample(0.0, 2.0), None);
        assert_eq!(buf.sample(f64::NAN, 0.0), None);
    }

    #[test]
    fn pixel_at_rounds_and_bounds_checks() {
        let size = ImageSize { width: 4, height: 3 };
        assert_eq!(size.pixel_at(0.0, 0.0), Some((0, 0)));
        assert_eq!(size.pixel_at(-0.4, 2.4), Some((0, 2)));
        assert_eq!(size.pixel_at(3.49, 1.5), Some((3, 2)));
        // The image edge itself rounds onto a pixel that does not exist.
        assert_eq!(size.pixel_at(4.0, 0.0), None);
        assert_eq!(size.pixel_at(0.0, 2.5), None);
        assert_eq!(size.pixel_at(-0.6, 0.0), None);
        assert_eq!(size.pixel_at(f64::NAN, 0.0), None);
        assert_eq!(size.pixel_at(0.0, f64::INFINITY), None);
    }

    #[test]
    fn mismatched_length_rejected() {
        assert!(PixelBuffer::from_rgba(ImageSize { width: 2, height: 2 }, vec![0; 15]).is_none());
    }

    #[test]
    fn tolerance_is_per_channel() {
        let reference = Rgb::new(18, 21, 67);
        assert!(Rgb::new(23, 16, 72).within(reference, 5));
        assert!(!Rgb::new(24, 21, 67).within(reference, 5));
        assert!(!Rgb::new(18, 21, 61).within(reference, 5));
    }

    #[test]
    fn preview_never_collapses() {
        let s = ImageSize { width: 3, height: 1000 }.preview();
        assert_eq!(s, ImageSize { width: 1, height: 250 });
    }
}
