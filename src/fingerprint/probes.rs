//! Rendering probes used by comprehensive fingerprints.
//!
//! Each probe degrades to a sentinel string instead of failing, so a single
//! missing capability never aborts the fingerprint.

use crate::config::{BASELINE_FONTS, FONT_PROBE_TEXT, PROBE_FONTS};
use crate::environment::Environment;

/// The host has no 2D canvas.
pub const NO_CANVAS: &str = "no-canvas";
/// Reading the canvas failed.
pub const CANVAS_ERROR: &str = "canvas-error";
/// The host has no WebGL context.
pub const NO_WEBGL: &str = "no-webgl";
/// Reading WebGL info failed.
pub const WEBGL_ERROR: &str = "webgl-error";
/// The host cannot measure text.
pub const NO_FONT_PROBE: &str = "no-font-probe";
/// Measuring text failed.
pub const FONT_ERROR: &str = "font-error";

/// Canvas rendering output, or a sentinel.
pub fn canvas_probe(env: &dyn Environment) -> String {
    match env.canvas_data() {
        Ok(Some(data)) if !data.is_empty() => data,
        Ok(_) => NO_CANVAS.to_string(),
        Err(e) => {
            log::debug!("Canvas probe failed: {}", e);
            CANVAS_ERROR.to_string()
        }
    }
}

/// `vendor~renderer`, or a sentinel.
pub fn webgl_probe(env: &dyn Environment) -> String {
    match env.webgl_info() {
        Ok(Some(info)) => format!("{}~{}", info.vendor, info.renderer),
        Ok(None) => NO_WEBGL.to_string(),
        Err(e) => {
            log::debug!("WebGL probe failed: {}", e);
            WEBGL_ERROR.to_string()
        }
    }
}

/// Comma-separated list of detected fonts, or a sentinel.
///
/// A font counts as installed when the probe text renders with a width that
/// differs from at least one generic baseline family it falls back to.
pub fn font_probe(env: &dyn Environment) -> String {
    match detect_fonts(env) {
        Ok(Some(fonts)) => fonts.join(","),
        Ok(None) => NO_FONT_PROBE.to_string(),
        Err(e) => {
            log::debug!("Font probe failed: {}", e);
            FONT_ERROR.to_string()
        }
    }
}

fn detect_fonts(
    env: &dyn Environment,
) -> Result<Option<Vec<&'static str>>, crate::error_handling::EnvironmentError> {
    let mut baselines = Vec::with_capacity(BASELINE_FONTS.len());
    for &baseline in BASELINE_FONTS {
        match env.measure_text(baseline, baseline, FONT_PROBE_TEXT)? {
            Some(width) => baselines.push((baseline, width)),
            None => return Ok(None),
        }
    }

    let mut detected = Vec::new();
    for &font in PROBE_FONTS {
        for &(baseline, baseline_width) in &baselines {
            let width = env.measure_text(font, baseline, FONT_PROBE_TEXT)?;
            if width.is_some_and(|w| w != baseline_width) {
                detected.push(font);
                break;
            }
        }
    }
    Ok(Some(detected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::StaticEnvironment;
    use crate::fingerprint::test_support::FailingProbes;

    #[test]
    fn test_probes_report_missing_capabilities() {
        let env = StaticEnvironment::new("ua");
        assert_eq!(canvas_probe(&env), NO_CANVAS);
        assert_eq!(webgl_probe(&env), NO_WEBGL);
        assert_eq!(font_probe(&env), NO_FONT_PROBE);
    }

    #[test]
    fn test_probes_report_errors_as_sentinels() {
        let env = FailingProbes;
        assert_eq!(canvas_probe(&env), CANVAS_ERROR);
        assert_eq!(webgl_probe(&env), WEBGL_ERROR);
        assert_eq!(font_probe(&env), FONT_ERROR);
    }

    #[test]
    fn test_probes_return_values() {
        let env = StaticEnvironment::new("ua")
            .with_canvas("data:image/png;base64,AAAA")
            .with_webgl("Intel Inc.", "Intel Iris OpenGL Engine");
        assert_eq!(canvas_probe(&env), "data:image/png;base64,AAAA");
        assert_eq!(webgl_probe(&env), "Intel Inc.~Intel Iris OpenGL Engine");
    }

    #[test]
    fn test_font_probe_detects_fonts_with_different_widths() {
        let env = StaticEnvironment::new("ua")
            .with_text_width("monospace", 120.0)
            .with_text_width("sans-serif", 100.0)
            .with_text_width("serif", 98.0)
            .with_text_width("Georgia", 104.0)
            .with_text_width("Verdana", 111.0);
        assert_eq!(font_probe(&env), "Georgia,Verdana");
    }

    #[test]
    fn test_font_probe_no_installed_fonts() {
        let env = StaticEnvironment::new("ua")
            .with_text_width("monospace", 120.0)
            .with_text_width("sans-serif", 100.0)
            .with_text_width("serif", 98.0);
        assert_eq!(font_probe(&env), "");
    }
}
