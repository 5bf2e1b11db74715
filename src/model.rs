//! Measuring session: the single owned state of the tool and the reducer
//! that applies input actions to it.
//!
//! Positions in actions are canvas-buffer (screen) coordinates except for the
//! client coordinates carried for panning, which only ever feed deltas.

use std::rc::Rc;
use yew::Reducible;

use crate::config::MeasureConfig;
use crate::state::{
    ImageSize, PanGrab, PixelSource, Point, PointStore, SegmentClassifier, ViewTransform, ZoomStep,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// Maps `MouseEvent.button`; unknown buttons are ignored.
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(PointerButton::Primary),
            1 => Some(PointerButton::Middle),
            2 => Some(PointerButton::Secondary),
            _ => None,
        }
    }
}

/// Interaction tuning copied from the configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interaction {
    pub zoom_increment: f64,
    pub pan_speed: f64,
    pub hit_radius: f64,
}

impl From<&MeasureConfig> for Interaction {
    fn from(cfg: &MeasureConfig) -> Self {
        Self {
            zoom_increment: cfg.zoom_increment,
            pan_speed: cfg.pan_speed,
            hit_radius: cfg.hit_radius,
        }
    }
}

impl Default for Interaction {
    fn default() -> Self {
        Self::from(&MeasureConfig::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Grab,
    Grabbing,
    AllScroll,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::AllScroll => "all-scroll",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeasureState {
    pub points: PointStore,
    pub view: ViewTransform,
    /// Index of the point following the pointer.
    pub dragging: Option<usize>,
    pub pan: Option<PanGrab>,
    /// Point under the pointer when idle, for cursor feedback.
    pub hover: Option<usize>,
    /// Draw the preview instead of the full image.
    pub low_res: bool,
    /// Full-resolution size once the image has loaded.
    pub image: Option<ImageSize>,
    pub image_failed: bool,
    pub interaction: Interaction,
    /// Bumped on every effective change; the canvas redraws when it moves.
    pub version: u64,
}

impl MeasureState {
    pub fn new(interaction: Interaction) -> Self {
        Self {
            points: PointStore::default(),
            view: ViewTransform::default(),
            dragging: None,
            pan: None,
            hover: None,
            low_res: false,
            image: None,
            image_failed: false,
            interaction,
            version: 0,
        }
    }

    pub fn classifier<'a>(&self, pixels: Option<&'a dyn PixelSource>) -> SegmentClassifier<'a> {
        SegmentClassifier::new(self.image, pixels)
    }

    pub fn total_distance(&self, pixels: Option<&dyn PixelSource>) -> f64 {
        self.classifier(pixels).total_distance(self.points.as_slice())
    }

    pub fn cursor(&self) -> Cursor {
        if self.pan.is_some() {
            Cursor::AllScroll
        } else if self.dragging.is_some() {
            Cursor::Grabbing
        } else if self.hover.is_some() {
            Cursor::Grab
        } else {
            Cursor::Default
        }
    }

    pub fn mode_label(&self) -> &'static str {
        if self.pan.is_some() {
            "Panning"
        } else if self.dragging.is_some() {
            "Moving point"
        } else {
            "Place points"
        }
    }

    /// Problem worth showing next to the read-out.
    pub fn status(&self) -> Option<&'static str> {
        self.image_failed.then_some("Map failed to load")
    }

    pub fn can_undo(&self) -> bool {
        !self.points.is_empty()
    }

    fn hit(&self, screen: Point) -> Option<usize> {
        let cursor = self.view.to_image_space(screen);
        self.points
            .nearest_within_radius(cursor, self.interaction.hit_radius, self.view.zoom)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MeasureAction {
    ImageLoaded { size: ImageSize },
    ImageFailed,
    PointerDown {
        button: PointerButton,
        screen: Point,
        client_x: f64,
        client_y: f64,
    },
    PointerMove {
        screen: Point,
        client_x: f64,
        client_y: f64,
    },
    PointerUp,
    Wheel { anchor: Point, delta_y: f64 },
    /// Fired by the settle timer after the last wheel tick.
    SettleZoom,
    Undo,
    Clear,
}

impl Reducible for MeasureState {
    type Action = MeasureAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use MeasureAction::*;
        let mut new = (*self).clone();
        match action {
            ImageLoaded { size } => {
                new.image = Some(size);
                new.image_failed = false;
                new.view.reset();
                new.low_res = false;
            }
            ImageFailed => {
                new.image = None;
                new.image_failed = true;
            }
            PointerDown {
                button,
                screen,
                client_x,
                client_y,
            } => match button {
                PointerButton::Secondary => {
                    if new.points.pop_last().is_none() {
                        return self;
                    }
                    new.dragging = None;
                    new.hover = None;
                }
                PointerButton::Middle => {
                    new.pan = Some(PanGrab::begin(&new.view, client_x, client_y));
                    new.low_res = true;
                }
                PointerButton::Primary => {
                    if let Some(i) = new.hit(screen) {
                        new.dragging = Some(i);
                    } else {
                        let p = new.view.to_image_space(screen);
                        new.points.append(p);
                    }
                }
            },
            PointerMove {
                screen,
                client_x,
                client_y,
            } => {
                if let Some(grab) = new.pan {
                    grab.apply(&mut new.view, client_x, client_y, new.interaction.pan_speed);
                } else if let Some(i) = new.dragging {
                    let p = new.view.to_image_space(screen);
                    new.points.replace_at(i, p);
                } else {
                    let hover = new.hit(screen);
                    if hover == new.hover {
                        return self;
                    }
                    new.hover = hover;
                }
            }
            PointerUp => {
                if new.pan.is_none() && new.dragging.is_none() {
                    return self;
                }
                if new.pan.take().is_some() {
                    new.low_res = false;
                }
                new.dragging = None;
            }
            Wheel { anchor, delta_y } => {
                let factor = ZoomStep::from_wheel_delta(delta_y).factor(new.interaction.zoom_increment);
                if !new.view.zoom_at(anchor, factor) {
                    return self;
                }
                new.low_res = true;
            }
            SettleZoom => {
                if !new.low_res || new.pan.is_some() {
                    return self;
                }
                new.low_res = false;
            }
            Undo => {
                if new.points.pop_last().is_none() {
                    return self;
                }
                new.dragging = None;
                new.hover = None;
            }
            Clear => {
                new.points.clear();
                new.view.reset();
                new.dragging = None;
                new.hover = None;
                new.pan = None;
                new.low_res = false;
            }
        }
        new.version = new.version.wrapping_add(1);
        new.into()
    }
}
