// Pan/zoom state mapping screen (canvas buffer) coordinates to image space.
use super::Point;

pub const MIN_ZOOM: f64 = 0.05;
pub const MAX_ZOOM: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

/// Direction of a single wheel tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomStep {
    In,
    Out,
}

impl ZoomStep {
    /// Positive wheel delta scrolls towards the user, which zooms out.
    pub fn from_wheel_delta(delta_y: f64) -> Self {
        if delta_y > 0.0 { ZoomStep::Out } else { ZoomStep::In }
    }

    pub fn factor(self, increment: f64) -> f64 {
        match self {
            ZoomStep::In => 1.0 + increment,
            ZoomStep::Out => 1.0 - increment,
        }
    }
}

impl ViewTransform {
    pub fn to_image_space(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.zoom,
            (screen.y - self.pan_y) / self.zoom,
        )
    }

    pub fn to_screen_space(&self, image: Point) -> Point {
        Point::new(
            image.x * self.zoom + self.pan_x,
            image.y * self.zoom + self.pan_y,
        )
    }

    /// Multiplies zoom by `factor` keeping the image point under `anchor` fixed.
    /// Returns false when the clamp left zoom unchanged.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) -> bool {
        let old_zoom = self.zoom;
        let new_zoom = (old_zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if new_zoom == old_zoom {
            return false;
        }
        let fixed = self.to_image_space(anchor);
        self.zoom = new_zoom;
        let drifted = self.to_screen_space(fixed);
        self.pan_by(anchor.x - drifted.x, anchor.y - drifted.y);
        true
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Middle-button drag in progress: pointer position and pan at grab time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGrab {
    pub start_x: f64,
    pub start_y: f64,
    pub initial_pan_x: f64,
    pub initial_pan_y: f64,
}

impl PanGrab {
    pub fn begin(view: &ViewTransform, client_x: f64, client_y: f64) -> Self {
        Self {
            start_x: client_x,
            start_y: client_y,
            initial_pan_x: view.pan_x,
            initial_pan_y: view.pan_y,
        }
    }

    /// Pan is absolute from the grab origin so rounding never accumulates.
    pub fn apply(&self, view: &mut ViewTransform, client_x: f64, client_y: f64, speed: f64) {
        let target_x = self.initial_pan_x + (client_x - self.start_x) * speed;
        let target_y = self.initial_pan_y + (client_y - self.start_y) * speed;
        view.pan_by(target_x - view.pan_x, target_y - view.pan_y);
    }
}

/// Scales a position inside the canvas' CSS box to canvas buffer pixels.
pub fn display_to_buffer(
    display_x: f64,
    display_y: f64,
    box_width: f64,
    box_height: f64,
    buffer_width: f64,
    buffer_height: f64,
) -> Point {
    let bw = if box_width > 0.0 { box_width } else { 1.0 };
    let bh = if box_height > 0.0 { box_height } else { 1.0 };
    Point::new(display_x * (buffer_width / bw), display_y * (buffer_height / bh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn image_and_screen_space_are_inverse() {
        let view = ViewTransform {
            zoom: 2.5,
            pan_x: -40.0,
            pan_y: 17.0,
        };
        let p = Point::new(123.25, -8.5);
        let back = view.to_image_space(view.to_screen_space(p));
        assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-9);
    }

    #[test]
    fn zoom_keeps_point_under_cursor() {
        let mut view = ViewTransform {
            zoom: 0.7,
            pan_x: 31.0,
            pan_y: -12.0,
        };
        let anchor = Point::new(412.0, 233.0);
        for step in [ZoomStep::In, ZoomStep::In, ZoomStep::Out, ZoomStep::In] {
            let before = view.to_image_space(anchor);
            view.zoom_at(anchor, step.factor(0.1));
            let screen = view.to_screen_space(before);
            assert_abs_diff_eq!(screen.x, anchor.x, epsilon = 1e-9);
            assert_abs_diff_eq!(screen.y, anchor.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn zoom_stays_clamped() {
        let mut view = ViewTransform::default();
        let anchor = Point::new(50.0, 50.0);
        for _ in 0..200 {
            view.zoom_at(anchor, ZoomStep::In.factor(0.1));
            assert!(view.zoom <= MAX_ZOOM);
        }
        assert_abs_diff_eq!(view.zoom, MAX_ZOOM);
        for _ in 0..400 {
            view.zoom_at(anchor, ZoomStep::Out.factor(0.1));
            assert!(view.zoom >= MIN_ZOOM);
        }
        assert_abs_diff_eq!(view.zoom, MIN_ZOOM);
    }

    #[test]
    fn zoom_at_clamp_leaves_pan_alone() {
        let mut view = ViewTransform {
            zoom: MAX_ZOOM,
            pan_x: 5.0,
            pan_y: 6.0,
        };
        assert!(!view.zoom_at(Point::new(100.0, 100.0), 1.1));
        assert_eq!(view.pan_x, 5.0);
        assert_eq!(view.pan_y, 6.0);
    }

    #[test]
    fn wheel_direction() {
        assert_eq!(ZoomStep::from_wheel_delta(120.0), ZoomStep::Out);
        assert_eq!(ZoomStep::from_wheel_delta(-3.0), ZoomStep::In);
    }

    #[test]
    fn pan_grab_is_relative_to_grab_origin() {
        let mut view = ViewTransform {
            zoom: 1.0,
            pan_x: 10.0,
            pan_y: 20.0,
        };
        let grab = PanGrab::begin(&view, 100.0, 100.0);
        grab.apply(&mut view, 105.0, 98.0, 4.0);
        assert_eq!((view.pan_x, view.pan_y), (30.0, 12.0));
        grab.apply(&mut view, 100.0, 100.0, 4.0);
        assert_eq!((view.pan_x, view.pan_y), (10.0, 20.0));
    }

    #[test]
    fn display_mapping_guards_collapsed_box() {
        let p = display_to_buffer(10.0, 5.0, 0.0, 50.0, 200.0, 100.0);
        assert_eq!(p, Point::new(2000.0, 10.0));
        let q = display_to_buffer(50.0, 25.0, 100.0, 50.0, 200.0, 100.0);
        assert_eq!(q, Point::new(100.0, 50.0));
    }
}
