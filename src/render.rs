//! Drawing of the measured path, shared by the live canvas and PNG export.
//!
//! Everything here talks to a [`Surface`]; the browser implementation lives in
//! `canvas.rs`. Sizes are given in screen pixels and divided by the zoom for
//! the live view so strokes keep a constant on-screen thickness. Export draws
//! at zoom 1.

use crate::model::MeasureState;
use crate::state::{PixelSource, Point, SegmentClassifier};
use crate::util::{distance_label, export_info_line};

pub const LINE_WIDTH: f64 = 8.0;
pub const DASH: f64 = 10.0;
pub const MARKER_RADIUS: f64 = 15.0;
pub const MARKER_OUTLINE: f64 = 4.0;
pub const TEXT_SIZE: f64 = 150.0;
pub const TEXT_OUTLINE: f64 = 20.0;

pub const COUNTED_COLOR: &str = "rgba(255,0,0,0.9)";
pub const IGNORED_COLOR: &str = "rgba(150, 150, 150, 0.5)";
pub const MARKER_COLOR: &str = "red";
pub const MARKER_FILL: &str = "white";
pub const MARKER_ACTIVE_FILL: &str = "yellow";
pub const LABEL_FILL: &str = "red";
pub const LABEL_OUTLINE: &str = "black";

/// Which copy of the image to put behind the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backdrop {
    Full,
    /// Downscaled copy, stretched back to full image size.
    Preview,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
    /// Dash and gap length; None draws a solid line.
    pub dash: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font: String,
    pub fill: &'static str,
    pub align: Align,
    /// Outline color and width, stroked before the fill.
    pub outline: Option<(&'static str, f64)>,
}

pub trait Surface {
    /// Wipes the whole surface in screen space.
    fn clear(&mut self);
    /// Maps image space to the surface: `screen = image * zoom + pan`.
    fn set_view(&mut self, zoom: f64, pan_x: f64, pan_y: f64);
    fn draw_backdrop(&mut self, backdrop: Backdrop);
    fn stroke_segment(&mut self, from: Point, to: Point, stroke: &Stroke);
    fn draw_marker(&mut self, center: Point, radius: f64, outline_width: f64, fill: &'static str);
    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle);
}

/// Pixel sizes for one pass, already divided by the zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Metrics {
    line: f64,
    dash: f64,
    radius: f64,
    outline: f64,
    text: f64,
    text_outline: f64,
}

impl Metrics {
    fn at_zoom(zoom: f64) -> Self {
        Self {
            line: LINE_WIDTH / zoom,
            dash: DASH / zoom,
            radius: MARKER_RADIUS / zoom,
            outline: MARKER_OUTLINE / zoom,
            text: TEXT_SIZE / zoom,
            text_outline: TEXT_OUTLINE / zoom,
        }
    }
}

fn segment_stroke(ignored: bool, m: &Metrics) -> Stroke {
    if ignored {
        Stroke {
            color: IGNORED_COLOR,
            width: m.line,
            dash: Some(m.dash),
        }
    } else {
        Stroke {
            color: COUNTED_COLOR,
            width: m.line,
            dash: None,
        }
    }
}

/// Segments, markers and the running label. Returns the counted total.
fn draw_path<S: Surface>(
    surface: &mut S,
    points: &[Point],
    classifier: &SegmentClassifier<'_>,
    active: Option<usize>,
    m: &Metrics,
) -> f64 {
    for pair in points.windows(2) {
        if let [a, b] = *pair {
            let ignored = classifier.classify(a, b).ignored;
            surface.stroke_segment(a, b, &segment_stroke(ignored, m));
        }
    }
    let total = classifier.total_distance(points);
    for (i, p) in points.iter().enumerate() {
        let fill = if active == Some(i) { MARKER_ACTIVE_FILL } else { MARKER_FILL };
        surface.draw_marker(*p, m.radius, m.outline, fill);
    }
    if let [.., a, b] = points {
        let mid = a.midpoint(*b);
        let style = TextStyle {
            font: format!("bold {}px sans-serif", m.text),
            fill: LABEL_FILL,
            align: Align::Center,
            outline: Some((LABEL_OUTLINE, m.text_outline)),
        };
        surface.draw_text(&distance_label(total), Point::new(mid.x, mid.y - m.text), &style);
    }
    total
}

/// Live view. `has_preview` tells whether a downscaled copy exists.
pub fn render<S: Surface>(
    surface: &mut S,
    state: &MeasureState,
    pixels: Option<&dyn PixelSource>,
    has_preview: bool,
) -> f64 {
    let view = state.view;
    surface.clear();
    surface.set_view(view.zoom, view.pan_x, view.pan_y);
    if state.image.is_some() {
        let backdrop = if state.low_res && has_preview {
            Backdrop::Preview
        } else {
            Backdrop::Full
        };
        surface.draw_backdrop(backdrop);
    }
    let classifier = state.classifier(pixels);
    draw_path(
        surface,
        state.points.as_slice(),
        &classifier,
        state.dragging,
        &Metrics::at_zoom(view.zoom),
    )
}

/// Native-resolution copy for download, independent of pan/zoom/low-res.
pub fn render_export<S: Surface>(surface: &mut S, state: &MeasureState, pixels: Option<&dyn PixelSource>) -> f64 {
    surface.clear();
    surface.set_view(1.0, 0.0, 0.0);
    if state.image.is_some() {
        surface.draw_backdrop(Backdrop::Full);
    }
    let classifier = state.classifier(pixels);
    let total = draw_path(surface, state.points.as_slice(), &classifier, None, &Metrics::at_zoom(1.0));
    let info = TextStyle {
        font: "16px sans-serif".into(),
        fill: "black",
        align: Align::Left,
        outline: None,
    };
    surface.draw_text(&export_info_line(total), Point::new(10.0, 20.0), &info);
    total
}
