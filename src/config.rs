//! Tool configuration.
//!
//! Defaults match the shipped map. An optional JSON object stored under the
//! `tm_config` localStorage key overrides any subset of fields, e.g.
//! `{"map_path": "public/other.png", "pan_speed": 2.0}`. The ignore color and
//! its tolerance are deliberately absent: they are fixed constants of the
//! segment classifier.

use serde::{Deserialize, Serialize};

use crate::error::MeasureError;

pub const STORAGE_KEY: &str = "tm_config";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Image loaded at startup.
    pub map_path: String,
    /// File name offered for the exported PNG.
    pub export_file_name: String,
    /// Relative zoom change per wheel tick.
    pub zoom_increment: f64,
    /// Multiplier applied to pointer movement while middle-button panning.
    pub pan_speed: f64,
    /// Grab radius around points, in screen pixels.
    pub hit_radius: f64,
    /// Delay after the last wheel tick before switching back to full resolution.
    pub settle_delay_ms: i32,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            map_path: "public/map.png".into(),
            export_file_name: "trajectory.png".into(),
            zoom_increment: 0.1,
            pan_speed: 4.0,
            hit_radius: 20.0,
            settle_delay_ms: 100,
        }
    }
}

impl MeasureConfig {
    pub fn from_json(raw: &str) -> Result<Self, MeasureError> {
        let cfg: MeasureConfig = serde_json::from_str(raw)?;
        cfg.validated()
    }

    fn validated(self) -> Result<Self, MeasureError> {
        if !(self.zoom_increment > 0.0 && self.zoom_increment < 1.0) {
            return Err(MeasureError::InvalidConfig(format!(
                "zoom_increment must be in (0, 1), got {}",
                self.zoom_increment
            )));
        }
        if !(self.hit_radius > 0.0) {
            return Err(MeasureError::InvalidConfig(format!(
                "hit_radius must be positive, got {}",
                self.hit_radius
            )));
        }
        if self.settle_delay_ms < 0 {
            return Err(MeasureError::InvalidConfig(format!(
                "settle_delay_ms must not be negative, got {}",
                self.settle_delay_ms
            )));
        }
        Ok(self)
    }

    /// Reads the localStorage override, falling back to defaults on any problem.
    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|win| win.local_storage().ok().flatten())
            .and_then(|store| store.get_item(STORAGE_KEY).ok().flatten());
        match raw {
            None => Self::default(),
            Some(raw) => match Self::from_json(&raw) {
                Ok(cfg) => {
                    log::info!("using configuration override from '{}'", STORAGE_KEY);
                    cfg
                }
                Err(e) => {
                    log::warn!("ignoring '{}': {}", STORAGE_KEY, e);
                    Self::default()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = MeasureConfig::from_json(r#"{"map_path":"maps/valley.png","pan_speed":1.5}"#).unwrap();
        assert_eq!(cfg.map_path, "maps/valley.png");
        assert_eq!(cfg.pan_speed, 1.5);
        assert_eq!(cfg.export_file_name, "trajectory.png");
        assert_eq!(cfg.settle_delay_ms, 100);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(matches!(
            MeasureConfig::from_json("{not json"),
            Err(MeasureError::Config(_))
        ));
    }

    #[test]
    fn out_of_range_increment_rejected() {
        assert!(matches!(
            MeasureConfig::from_json(r#"{"zoom_increment":1.0}"#),
            Err(MeasureError::InvalidConfig(_))
        ));
    }
}
