use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("no global window/document")]
    NoWindow,
    #[error("canvas element is not mounted")]
    CanvasMissing,
    #[error("2d context unavailable: {0}")]
    Context(String),
    #[error("pixel data unreadable: {0}")]
    PixelAccess(String),
    #[error("export failed: {0}")]
    Export(String),
    #[error("configuration is not valid JSON: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Debug-formats a JS exception; JsValue carries no Display impl.
pub fn js_err(v: JsValue) -> String {
    v.as_string().unwrap_or_else(|| format!("{:?}", v))
}
