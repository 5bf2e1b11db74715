pub mod points;
pub mod raster;
pub mod segment;
pub mod view;

pub use points::{Point, PointStore};
#[cfg(test)]
pub use raster::PixelBuffer;
pub use raster::{ImageSize, PixelSource};
pub use segment::SegmentClassifier;
pub use view::{PanGrab, ViewTransform, ZoomStep, display_to_buffer};
