use log::{warn, Level};
use serde::Deserialize;

/// Attribute on `<body>` holding a JSON object that overrides any of the
/// fields below.
pub const CONFIG_ATTRIBUTE: &str = "data-motion-config";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    /// Time the preloader stays up after the window `load` event.
    pub loader_delay_ms: u32,
    /// Cursor overlay and tilt cards only run above this viewport width.
    pub desktop_breakpoint: f64,
    /// Fraction of the remaining distance the cursor ring covers each frame.
    pub cursor_smoothing: f64,
    pub magnetic_strength: f64,
    pub tilt_divisor: f64,
    pub tilt_perspective: f64,
    pub resize_debounce_ms: u32,
    /// Global time scale applied when the user prefers reduced motion.
    pub reduced_motion_time_scale: f64,
    pub nav_scrolled_offset: f64,
    pub anchor_offset: f64,
    pub whatsapp_number: String,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            loader_delay_ms: 1500,
            desktop_breakpoint: 768.0,
            cursor_smoothing: 0.15,
            magnetic_strength: 0.3,
            tilt_divisor: 20.0,
            tilt_perspective: 1000.0,
            resize_debounce_ms: 250,
            reduced_motion_time_scale: 3.0,
            nav_scrolled_offset: 80.0,
            anchor_offset: 100.0,
            whatsapp_number: "554888045775".to_string(),
        }
    }
}

impl MotionConfig {
    pub fn from_json(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::default();
        };
        match serde_json::from_str(raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring invalid {}: {}", CONFIG_ATTRIBUTE, e);
                Self::default()
            }
        }
    }

    /// Reads the overrides from the live document, falling back to defaults
    /// when there is no document or no attribute.
    pub fn from_document() -> Self {
        let raw = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.body())
            .and_then(|body| body.get_attribute(CONFIG_ATTRIBUTE));
        Self::from_json(raw.as_deref())
    }

    pub fn is_desktop(&self, viewport_width: f64) -> bool {
        viewport_width > self.desktop_breakpoint
    }
}

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}
