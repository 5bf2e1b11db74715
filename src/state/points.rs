/// A position in image space (native raster pixels, unaffected by pan/zoom).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Ordered path; insertion order defines segment adjacency.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointStore {
    points: Vec<Point>,
}

impl PointStore {
    pub fn append(&mut self, p: Point) {
        self.points.push(p);
    }

    pub fn pop_last(&mut self) -> Option<Point> {
        self.points.pop()
    }

    /// Ignored when `index` is past the end.
    pub fn replace_at(&mut self, index: usize, p: Point) {
        if let Some(slot) = self.points.get_mut(index) {
            *slot = p;
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// First point whose on-screen distance to `cursor` is under `screen_radius`.
    pub fn nearest_within_radius(&self, cursor: Point, screen_radius: f64, zoom: f64) -> Option<usize> {
        self.points
            .iter()
            .position(|p| p.distance(cursor) * zoom < screen_radius)
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(pts: &[(f64, f64)]) -> PointStore {
        let mut s = PointStore::default();
        for &(x, y) in pts {
            s.append(Point::new(x, y));
        }
        s
    }

    #[test]
    fn pop_on_empty_is_noop() {
        let mut s = PointStore::default();
        assert_eq!(s.pop_last(), None);
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn replace_out_of_range_does_nothing() {
        let mut s = store(&[(1.0, 1.0)]);
        s.replace_at(3, Point::new(9.0, 9.0));
        assert_eq!(s.as_slice(), &[Point::new(1.0, 1.0)]);
        s.replace_at(0, Point::new(2.0, 3.0));
        assert_eq!(s.as_slice(), &[Point::new(2.0, 3.0)]);
    }

    #[test]
    fn hit_radius_is_constant_on_screen() {
        let s = store(&[(0.0, 0.0), (100.0, 0.0)]);
        // 15 image px away: hit at zoom 1, miss at zoom 2 (30 screen px).
        assert_eq!(s.nearest_within_radius(Point::new(115.0, 0.0), 20.0, 1.0), Some(1));
        assert_eq!(s.nearest_within_radius(Point::new(115.0, 0.0), 20.0, 2.0), None);
        // 30 image px away at zoom 0.5 is 15 screen px.
        assert_eq!(s.nearest_within_radius(Point::new(0.0, 30.0), 20.0, 0.5), Some(0));
    }

    #[test]
    fn earliest_point_wins_on_overlap() {
        let s = store(&[(5.0, 5.0), (6.0, 5.0)]);
        assert_eq!(s.nearest_within_radius(Point::new(6.0, 5.0), 20.0, 1.0), Some(0));
    }
}
