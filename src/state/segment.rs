// Segment classification: a segment is ignored when it leaves the image or
// touches the background color.
use super::raster::{ImageSize, PixelSource, Rgb};
use super::Point;

/// Background color excluded from measurement (#121543).
pub const IGNORE_COLOR: Rgb = Rgb::new(18, 21, 67);
pub const IGNORE_TOLERANCE: u8 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub ignored: bool,
}

#[derive(Clone, Copy)]
pub struct SegmentClassifier<'a> {
    /// Full-resolution size; None until an image has loaded.
    image: Option<ImageSize>,
    /// None when pixels cannot be read at all (tainted or missing canvas).
    pixels: Option<&'a dyn PixelSource>,
}

impl<'a> SegmentClassifier<'a> {
    pub fn new(image: Option<ImageSize>, pixels: Option<&'a dyn PixelSource>) -> Self {
        Self { image, pixels }
    }

    fn out_of_bounds(&self, p: Point) -> bool {
        match self.image {
            None => true,
            Some(s) => p.x < 0.0 || p.x > s.width as f64 || p.y < 0.0 || p.y > s.height as f64,
        }
    }

    /// Unreadable pixels never match.
    fn touches_ignore_color(&self, p: Point) -> bool {
        self.pixels
            .and_then(|src| src.sample(p.x, p.y))
            .is_some_and(|c| c.within(IGNORE_COLOR, IGNORE_TOLERANCE))
    }

    pub fn classify(&self, p1: Point, p2: Point) -> Classification {
        let ignored = self.out_of_bounds(p1)
            || self.out_of_bounds(p2)
            || self.touches_ignore_color(p1)
            || self.touches_ignore_color(p2);
        Classification { ignored }
    }

    pub fn total_distance(&self, path: &[Point]) -> f64 {
        path.windows(2)
            .filter_map(|w| match w {
                [a, b] if !self.classify(*a, *b).ignored => Some(a.distance(*b)),
                _ => None,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PixelBuffer;
    use approx::assert_abs_diff_eq;
    use std::cell::RefCell;

    const SIZE: ImageSize = ImageSize {
        width: 100,
        height: 100,
    };

    /// 100x100 white image with an ignore-colored block at x,y in 40..60.
    fn map_with_lake() -> PixelBuffer {
        let mut rgba = Vec::with_capacity(100 * 100 * 4);
        for y in 0..100 {
            for x in 0..100 {
                if (40..60).contains(&x) && (40..60).contains(&y) {
                    rgba.extend_from_slice(&[20, 19, 70, 255]);
                } else {
                    rgba.extend_from_slice(&[255, 255, 255, 255]);
                }
            }
        }
        PixelBuffer::from_rgba(SIZE, rgba).unwrap()
    }

    /// Paints everything in the ignore color and records each lookup.
    #[derive(Default)]
    struct CountingSource {
        lookups: RefCell<Vec<(f64, f64)>>,
        unreadable: bool,
    }

    impl PixelSource for CountingSource {
        fn sample(&self, x: f64, y: f64) -> Option<Rgb> {
            self.lookups.borrow_mut().push((x, y));
            (!self.unreadable).then_some(IGNORE_COLOR)
        }
    }

    #[test]
    fn right_angle_path_totals_twenty() {
        let c = SegmentClassifier::new(Some(SIZE), None);
        let path = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        assert_abs_diff_eq!(c.total_distance(&path), 20.0);
    }

    #[test]
    fn out_of_bounds_is_ignored_regardless_of_color() {
        let buf = map_with_lake();
        let c = SegmentClassifier::new(Some(SIZE), Some(&buf));
        assert!(c.classify(Point::new(-5.0, 3.0), Point::new(10.0, 10.0)).ignored);
        assert!(c.classify(Point::new(10.0, 10.0), Point::new(-5.0, 3.0)).ignored);
        // Upper bound is inclusive.
        assert!(!c.classify(Point::new(100.0, 100.0), Point::new(0.0, 0.0)).ignored);
        assert!(c.classify(Point::new(100.1, 0.0), Point::new(0.0, 0.0)).ignored);
    }

    #[test]
    fn colored_endpoint_is_ignored() {
        let buf = map_with_lake();
        let c = SegmentClassifier::new(Some(SIZE), Some(&buf));
        assert!(c.classify(Point::new(10.0, 10.0), Point::new(50.0, 50.0)).ignored);
        assert!(!c.classify(Point::new(10.0, 10.0), Point::new(30.0, 10.0)).ignored);
        // Crossing the lake without landing in it still counts.
        assert!(!c.classify(Point::new(30.0, 50.0), Point::new(70.0, 50.0)).ignored);
    }

    #[test]
    fn classify_is_symmetric() {
        let buf = map_with_lake();
        let c = SegmentClassifier::new(Some(SIZE), Some(&buf));
        let pts = [
            Point::new(-5.0, 3.0),
            Point::new(10.0, 10.0),
            Point::new(45.0, 45.0),
            Point::new(99.6, 99.6),
            Point::new(100.0, 0.0),
            Point::new(120.0, 5.0),
        ];
        for a in pts {
            for b in pts {
                assert_eq!(c.classify(a, b), c.classify(b, a));
            }
        }
    }

    #[test]
    fn missing_pixels_fail_open() {
        let c = SegmentClassifier::new(Some(SIZE), None);
        assert!(!c.classify(Point::new(50.0, 50.0), Point::new(45.0, 45.0)).ignored);
    }

    #[test]
    fn no_image_ignores_everything() {
        let c = SegmentClassifier::new(None, None);
        let path = [Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        assert!(c.classify(path[0], path[1]).ignored);
        assert_eq!(c.total_distance(&path), 0.0);
    }

    #[test]
    fn duplicate_points_contribute_zero() {
        let c = SegmentClassifier::new(Some(SIZE), None);
        let path = [Point::new(5.0, 5.0), Point::new(5.0, 5.0), Point::new(8.0, 9.0)];
        assert!(!c.classify(path[0], path[1]).ignored);
        assert_abs_diff_eq!(c.total_distance(&path), 5.0);
    }

    #[test]
    fn total_skips_only_ignored_segments() {
        let buf = map_with_lake();
        let c = SegmentClassifier::new(Some(SIZE), Some(&buf));
        let path = [
            Point::new(10.0, 10.0),
            Point::new(30.0, 10.0),  // counted: 20
            Point::new(50.0, 50.0),  // ignored (lake)
            Point::new(80.0, 90.0),  // ignored (lake)
            Point::new(80.0, 95.0),  // counted: 5
            Point::new(80.0, 130.0), // ignored (outside)
        ];
        assert_abs_diff_eq!(c.total_distance(&path), 25.0);
    }

    #[test]
    fn only_endpoints_are_sampled() {
        let src = CountingSource::default();
        let c = SegmentClassifier::new(Some(SIZE), Some(&src));
        assert!(c.classify(Point::new(10.0, 10.0), Point::new(90.0, 20.0)).ignored);
        // The first endpoint already matches, so the second is never read.
        assert_eq!(*src.lookups.borrow(), [(10.0, 10.0)]);
        src.lookups.borrow_mut().clear();
        // Out-of-bounds segments are decided without any pixel reads.
        assert!(c.classify(Point::new(-1.0, 10.0), Point::new(90.0, 20.0)).ignored);
        assert!(src.lookups.borrow().is_empty());
    }

    #[test]
    fn unreadable_pixels_fail_open() {
        let src = CountingSource {
            unreadable: true,
            ..Default::default()
        };
        let c = SegmentClassifier::new(Some(SIZE), Some(&src));
        let path = [Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        assert!(!c.classify(path[0], path[1]).ignored);
        assert_abs_diff_eq!(c.total_distance(&path), 5.0);
        assert_eq!(src.lookups.borrow().len(), 4);
    }
}
