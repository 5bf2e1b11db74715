// Browser side of rendering: the 2d-context surface, raster preparation after
// an image loads, and PNG export.
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlAnchorElement, HtmlCanvasElement, HtmlImageElement};

use crate::error::{js_err, MeasureError};
use crate::model::MeasureState;
use crate::render::{self, Align, Backdrop, Stroke, Surface, TextStyle};
use crate::state::{ImageSize, PixelSource, Point};
use crate::state::raster::Rgb;

/// The loaded image plus everything derived from it. Replaced as a unit.
pub struct LoadedRaster {
    pub image: HtmlImageElement,
    pub size: ImageSize,
    /// Downscaled copy for pan/zoom; None if it could not be built.
    pub preview: Option<HtmlCanvasElement>,
    /// None when the image taints the canvas (cross-origin).
    pub pixels: Option<CanvasPixels>,
}

impl LoadedRaster {
    pub fn prepare(document: &Document, image: HtmlImageElement) -> Self {
        let size = ImageSize {
            width: image.natural_width(),
            height: image.natural_height(),
        };
        let preview = build_preview(document, &image, size)
            .map_err(|e| log::warn!("preview unavailable, panning at full resolution: {}", e))
            .ok();
        let pixels = CanvasPixels::new(document, &image, size)
            .map_err(|e| log::warn!("color exclusion disabled: {}", e))
            .ok();
        log::info!(
            "image ready {}x{} (preview: {}, pixels: {})",
            size.width,
            size.height,
            preview.is_some(),
            pixels.is_some()
        );
        Self {
            image,
            size,
            preview,
            pixels,
        }
    }

    pub fn pixel_source(&self) -> Option<&dyn PixelSource> {
        self.pixels.as_ref().map(|p| p as &dyn PixelSource)
    }
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, MeasureError> {
    canvas
        .get_context("2d")
        .map_err(|e| MeasureError::Context(js_err(e)))?
        .ok_or_else(|| MeasureError::Context("getContext returned null".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| MeasureError::Context("not a CanvasRenderingContext2d".into()))
}

fn offscreen(document: &Document, size: ImageSize) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), MeasureError> {
    let canvas = document
        .create_element("canvas")
        .map_err(|e| MeasureError::Context(js_err(e)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| MeasureError::Context("created element is not a canvas".into()))?;
    canvas.set_width(size.width.max(1));
    canvas.set_height(size.height.max(1));
    let ctx = context_2d(&canvas)?;
    Ok((canvas, ctx))
}

fn build_preview(document: &Document, image: &HtmlImageElement, size: ImageSize) -> Result<HtmlCanvasElement, MeasureError> {
    let small = size.preview();
    let (canvas, ctx) = offscreen(document, small)?;
    ctx.draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, small.width as f64, small.height as f64)
        .map_err(|e| MeasureError::Context(js_err(e)))?;
    Ok(canvas)
}

/// Off-screen full-resolution copy of the image, read one pixel at a time.
pub struct CanvasPixels {
    _canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    size: ImageSize,
}

impl CanvasPixels {
    /// Fails when the image cannot be drawn or its pixels are unreadable.
    fn new(document: &Document, image: &HtmlImageElement, size: ImageSize) -> Result<Self, MeasureError> {
        let (canvas, ctx) = offscreen(document, size)?;
        ctx.draw_image_with_html_image_element(image, 0.0, 0.0)
            .map_err(|e| MeasureError::PixelAccess(js_err(e)))?;
        // A tainted canvas rejects every read; find out once, up front.
        ctx.get_image_data(0.0, 0.0, 1.0, 1.0)
            .map_err(|e| MeasureError::PixelAccess(js_err(e)))?;
        Ok(Self {
            _canvas: canvas,
            ctx,
            size,
        })
    }
}

impl PixelSource for CanvasPixels {
    fn sample(&self, x: f64, y: f64) -> Option<Rgb> {
        let (px, py) = self.size.pixel_at(x, y)?;
        let data = self.ctx.get_image_data(px as f64, py as f64, 1.0, 1.0).ok()?.data();
        match data.0.as_slice() {
            [r, g, b, ..] => Some(Rgb::new(*r, *g, *b)),
            _ => None,
        }
    }
}

/// [`Surface`] over a 2d context. JS errors from individual draw calls are
/// dropped; a failed stroke only affects that frame.
pub struct CanvasSurface<'a> {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    raster: Option<&'a LoadedRaster>,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(canvas: &HtmlCanvasElement, raster: Option<&'a LoadedRaster>) -> Result<Self, MeasureError> {
        Ok(Self {
            ctx: context_2d(canvas)?,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
            raster,
        })
    }

    fn set_dash(&self, dash: Option<f64>) {
        let pattern = js_sys::Array::new();
        if let Some(d) = dash {
            pattern.push(&d.into());
            pattern.push(&d.into());
        }
        self.ctx.set_line_dash(&pattern).ok();
    }
}

impl Surface for CanvasSurface<'_> {
    fn clear(&mut self) {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn set_view(&mut self, zoom: f64, pan_x: f64, pan_y: f64) {
        self.ctx.set_transform(zoom, 0.0, 0.0, zoom, pan_x, pan_y).ok();
    }

    fn draw_backdrop(&mut self, backdrop: Backdrop) {
        let Some(raster) = self.raster else { return };
        let (w, h) = (raster.size.width as f64, raster.size.height as f64);
        match (backdrop, &raster.preview) {
            (Backdrop::Preview, Some(preview)) => {
                self.ctx
                    .draw_image_with_html_canvas_element_and_dw_and_dh(preview, 0.0, 0.0, w, h)
                    .ok();
            }
            _ => {
                self.ctx.draw_image_with_html_image_element(&raster.image, 0.0, 0.0).ok();
            }
        }
    }

    fn stroke_segment(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.ctx.set_stroke_style_str(stroke.color);
        self.ctx.set_line_width(stroke.width);
        self.set_dash(stroke.dash);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
        self.set_dash(None);
    }

    fn draw_marker(&mut self, center: Point, radius: f64, outline_width: f64, fill: &'static str) {
        self.ctx.begin_path();
        self.ctx.set_fill_style_str(fill);
        self.ctx.set_stroke_style_str(render::MARKER_COLOR);
        self.ctx.set_line_width(outline_width);
        self.ctx.arc(center.x, center.y, radius, 0.0, std::f64::consts::PI * 2.0).ok();
        self.ctx.fill();
        self.ctx.stroke();
    }

    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.ctx.set_font(&style.font);
        self.ctx.set_text_align(match style.align {
            Align::Left => "left",
            Align::Center => "center",
        });
        if let Some((color, width)) = style.outline {
            self.ctx.set_stroke_style_str(color);
            self.ctx.set_line_width(width);
            self.ctx.stroke_text(text, at.x, at.y).ok();
        }
        self.ctx.set_fill_style_str(style.fill);
        self.ctx.fill_text(text, at.x, at.y).ok();
    }
}

/// Renders the path at native resolution and triggers a PNG download.
pub fn export_png(
    document: &Document,
    live: &HtmlCanvasElement,
    state: &MeasureState,
    raster: Option<&LoadedRaster>,
    file_name: &str,
) -> Result<f64, MeasureError> {
    let size = raster.map(|r| r.size).unwrap_or(ImageSize {
        width: live.width(),
        height: live.height(),
    });
    let (out, _) = offscreen(document, size).map_err(|e| MeasureError::Export(e.to_string()))?;
    let mut surface = CanvasSurface::new(&out, raster)?;
    let total = render::render_export(&mut surface, state, raster.and_then(LoadedRaster::pixel_source));
    let url = out
        .to_data_url_with_type("image/png")
        .map_err(|e| MeasureError::Export(js_err(e)))?;
    let anchor = document
        .create_element("a")
        .map_err(|e| MeasureError::Export(js_err(e)))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| MeasureError::Export("created element is not an anchor".into()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    Ok(total)
}
