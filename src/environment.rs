//! Runtime environment accessor.
//!
//! Every signal the collector reads (user agent, screen geometry, rendering
//! probes, page origin) comes through the [`Environment`] trait instead of
//! process-wide globals. Embedders implement it over their host (a webview
//! bridge, a headless browser, request headers); [`StaticEnvironment`] is a
//! plain snapshot used by the CLI and by tests.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error_handling::EnvironmentError;

/// Screen geometry as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenInfo {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
    /// Bits per pixel
    pub color_depth: u32,
}

/// WebGL vendor and renderer strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebGlInfo {
    /// `VENDOR` (or unmasked vendor when exposed)
    pub vendor: String,
    /// `RENDERER` (or unmasked renderer when exposed)
    pub renderer: String,
}

/// Read access to the host the metadata describes.
///
/// Accessors return `Err` when reading fails and, for the rendering probes,
/// `Ok(None)` when the capability simply does not exist.
pub trait Environment: Send + Sync {
    /// Raw user-agent string.
    fn user_agent(&self) -> Result<String, EnvironmentError>;

    /// Preferred language tag, e.g. `en-US`.
    fn language(&self) -> Result<String, EnvironmentError>;

    /// Screen geometry.
    fn screen(&self) -> Result<ScreenInfo, EnvironmentError>;

    /// Minutes to add to local time to reach UTC (positive west of Greenwich).
    fn timezone_offset_minutes(&self) -> Result<i32, EnvironmentError>;

    /// Logical processor count.
    fn hardware_concurrency(&self) -> Result<u32, EnvironmentError>;

    /// Maximum simultaneous touch points.
    fn max_touch_points(&self) -> Result<u32, EnvironmentError>;

    /// Serialized output of a fixed canvas drawing, `None` without a 2D canvas.
    fn canvas_data(&self) -> Result<Option<String>, EnvironmentError>;

    /// WebGL vendor/renderer, `None` without a WebGL context.
    fn webgl_info(&self) -> Result<Option<WebGlInfo>, EnvironmentError>;

    /// Width of `text` rendered in `family` with `fallback` as the generic
    /// fallback family. `None` when no text-measuring context exists.
    fn measure_text(
        &self,
        family: &str,
        fallback: &str,
        text: &str,
    ) -> Result<Option<f64>, EnvironmentError>;

    /// Origin of the page the collector runs in, `None` outside a page.
    fn page_origin(&self) -> Option<Url>;

    /// Whether outbound HTTP requests can be made at all.
    fn has_networking(&self) -> bool;
}

/// An environment captured as plain values.
///
/// Missing values read as [`EnvironmentError::Unavailable`]. Rendering probes
/// report "capability absent" when their field is unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticEnvironment {
    /// Raw user-agent string
    pub user_agent: Option<String>,
    /// Preferred language tag
    pub language: Option<String>,
    /// Screen geometry
    pub screen: Option<ScreenInfo>,
    /// Minutes to add to local time to reach UTC
    pub timezone_offset_minutes: Option<i32>,
    /// Logical processor count
    pub hardware_concurrency: Option<u32>,
    /// Maximum simultaneous touch points
    pub max_touch_points: Option<u32>,
    /// Canvas drawing output; unset means no 2D canvas
    pub canvas_data: Option<String>,
    /// WebGL strings; unset means no WebGL context
    pub webgl: Option<WebGlInfo>,
    /// Rendered probe-text width per font family, baselines included.
    /// Families absent here render with their fallback's width.
    pub text_widths: HashMap<String, f64>,
    /// Origin of the hosting page
    pub page_origin: Option<Url>,
    /// Whether outbound HTTP is possible
    pub networking: bool,
}

impl StaticEnvironment {
    /// An environment that only knows its user agent.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: Some(user_agent.into()),
            ..Default::default()
        }
    }

    /// Snapshot of the current process: language from `LANG`, processor count,
    /// and the local UTC offset. Networking is assumed available.
    pub fn from_host(user_agent: impl Into<String>) -> Self {
        let language = std::env::var("LANG")
            .ok()
            .and_then(|lang| lang.split('.').next().map(|tag| tag.replace('_', "-")))
            .filter(|tag| !tag.is_empty() && tag != "C" && tag != "POSIX");
        let offset_secs = chrono::Local::now().offset().local_minus_utc();
        let hardware_concurrency = std::thread::available_parallelism()
            .ok()
            .map(|n| n.get() as u32);

        Self {
            user_agent: Some(user_agent.into()),
            language,
            timezone_offset_minutes: Some(-offset_secs / 60),
            hardware_concurrency,
            max_touch_points: Some(0),
            networking: true,
            ..Default::default()
        }
    }

    /// Loads a snapshot from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read environment file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse environment file {}", path.display()))
    }

    /// Sets the language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the screen geometry.
    pub fn with_screen(mut self, width: u32, height: u32, color_depth: u32) -> Self {
        self.screen = Some(ScreenInfo {
            width,
            height,
            color_depth,
        });
        self
    }

    /// Sets the UTC offset in minutes (positive west of Greenwich).
    pub fn with_timezone_offset(mut self, minutes: i32) -> Self {
        self.timezone_offset_minutes = Some(minutes);
        self
    }

    /// Sets processor count and touch points.
    pub fn with_hardware(mut self, concurrency: u32, touch_points: u32) -> Self {
        self.hardware_concurrency = Some(concurrency);
        self.max_touch_points = Some(touch_points);
        self
    }

    /// Sets the canvas drawing output.
    pub fn with_canvas(mut self, data: impl Into<String>) -> Self {
        self.canvas_data = Some(data.into());
        self
    }

    /// Sets the WebGL vendor and renderer.
    pub fn with_webgl(mut self, vendor: impl Into<String>, renderer: impl Into<String>) -> Self {
        self.webgl = Some(WebGlInfo {
            vendor: vendor.into(),
            renderer: renderer.into(),
        });
        self
    }

    /// Records the probe-text width for one font family.
    pub fn with_text_width(mut self, family: impl Into<String>, width: f64) -> Self {
        self.text_widths.insert(family.into(), width);
        self
    }

    /// Sets the page origin.
    pub fn with_page_origin(mut self, origin: Url) -> Self {
        self.page_origin = Some(origin);
        self
    }

    /// Marks networking as available or not.
    pub fn with_networking(mut self, available: bool) -> Self {
        self.networking = available;
        self
    }
}

fn required<T: Clone>(value: &Option<T>, what: &'static str) -> Result<T, EnvironmentError> {
    value.clone().ok_or(EnvironmentError::Unavailable(what))
}

impl Environment for StaticEnvironment {
    fn user_agent(&self) -> Result<String, EnvironmentError> {
        required(&self.user_agent, "userAgent")
    }

    fn language(&self) -> Result<String, EnvironmentError> {
        required(&self.language, "language")
    }

    fn screen(&self) -> Result<ScreenInfo, EnvironmentError> {
        required(&self.screen, "screen")
    }

    fn timezone_offset_minutes(&self) -> Result<i32, EnvironmentError> {
        required(&self.timezone_offset_minutes, "timezoneOffset")
    }

    fn hardware_concurrency(&self) -> Result<u32, EnvironmentError> {
        required(&self.hardware_concurrency, "hardwareConcurrency")
    }

    fn max_touch_points(&self) -> Result<u32, EnvironmentError> {
        required(&self.max_touch_points, "maxTouchPoints")
    }

    fn canvas_data(&self) -> Result<Option<String>, EnvironmentError> {
        Ok(self.canvas_data.clone())
    }

    fn webgl_info(&self) -> Result<Option<WebGlInfo>, EnvironmentError> {
        Ok(self.webgl.clone())
    }

    fn measure_text(
        &self,
        family: &str,
        fallback: &str,
        _text: &str,
    ) -> Result<Option<f64>, EnvironmentError> {
        if self.text_widths.is_empty() {
            return Ok(None);
        }
        let width = self
            .text_widths
            .get(family)
            .or_else(|| self.text_widths.get(fallback))
            .copied()
            .unwrap_or_default();
        Ok(Some(width))
    }

    fn page_origin(&self) -> Option<Url> {
        self.page_origin.clone()
    }

    fn has_networking(&self) -> bool {
        self.networking
    }
}
