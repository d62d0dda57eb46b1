//! User-Agent classification.
//!
//! Classifies a raw user-agent string into platform, browser, and device type
//! by scanning ordered pattern tables over a lower-cased copy of the input.
//! First match wins, so table order is the tie-break policy: many tokens
//! overlap (`windows` appears in every Windows version, Chromium browsers
//! embed `chrome/` and `safari/`).

use serde::{Deserialize, Serialize};

use crate::config::UNKNOWN;
use crate::environment::Environment;
use crate::error_handling::ClassifierError;

/// Device form factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Desktop or laptop (default)
    #[default]
    Desktop,
    /// Phone-sized device
    Mobile,
    /// Tablet-sized device
    Tablet,
}

impl DeviceType {
    /// Lower-case label used in the output record.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one user-agent string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// The input string, unmodified
    pub user_agent: String,
    /// Platform label, `"Unknown"` when nothing matched
    pub platform: String,
    /// Browser label, `"Unknown"` when nothing matched
    pub browser: String,
    /// Device form factor
    pub device_type: DeviceType,
}

/// How a table entry matches the lower-cased input.
enum Rule {
    /// Input contains the marker.
    Contains(&'static str),
    /// Input contains the marker and none of the excluded markers.
    ContainsWithout(&'static str, &'static [&'static str]),
}

impl Rule {
    fn matches(&self, ua: &str) -> bool {
        match self {
            Rule::Contains(marker) => ua.contains(marker),
            Rule::ContainsWithout(marker, excluded) => {
                ua.contains(marker) && !excluded.iter().any(|e| ua.contains(e))
            }
        }
    }
}

// Most specific first: Windows versions before generic Windows, iPad before
// iPhone/iPod before Mac (iPadOS 13+ desktop mode reports "macintosh"),
// Android before Linux (Android UAs contain "linux"), Chrome OS before Linux.
const PLATFORM_PATTERNS: &[(&str, &str)] = &[
    ("windows nt 10.0", "Windows 10"),
    ("windows nt 6.3", "Windows 8.1"),
    ("windows nt 6.2", "Windows 8"),
    ("windows nt 6.1", "Windows 7"),
    ("windows phone", "Windows Phone"),
    ("windows", "Windows"),
    ("ipad", "iPadOS"),
    ("iphone", "iOS"),
    ("ipod", "iOS"),
    ("mac os x", "macOS"),
    ("macintosh", "macOS"),
    ("android", "Android"),
    ("cros ", "Chrome OS"),
    ("ubuntu", "Ubuntu"),
    ("linux", "Linux"),
    ("freebsd", "FreeBSD"),
];

// Chromium derivatives before Chrome; Safari only without a Chrome marker.
const BROWSER_PATTERNS: &[(Rule, &str)] = &[
    (Rule::Contains("edg/"), "Edge"),
    (Rule::Contains("edge/"), "Edge"),
    (Rule::Contains("opr/"), "Opera"),
    (Rule::Contains("opera"), "Opera"),
    (Rule::Contains("brave"), "Brave"),
    (Rule::Contains("vivaldi"), "Vivaldi"),
    (Rule::Contains("samsungbrowser"), "Samsung Internet"),
    (Rule::Contains("firefox/"), "Firefox"),
    (Rule::Contains("fxios"), "Firefox"),
    (Rule::Contains("crios"), "Chrome"),
    (Rule::Contains("chrome/"), "Chrome"),
    (Rule::Contains("chromium"), "Chromium"),
    (
        Rule::ContainsWithout("safari", &["chrome", "crios", "chromium"]),
        "Safari",
    ),
    (Rule::Contains("trident/"), "Internet Explorer"),
    (Rule::Contains("msie"), "Internet Explorer"),
];

// Tablets first: tablet UAs can carry "mobile" (Kindle Silk) and Android
// tablets are only told apart from phones by the missing "mobile" token.
const DEVICE_PATTERNS: &[(Rule, DeviceType)] = &[
    (Rule::Contains("ipad"), DeviceType::Tablet),
    (Rule::Contains("tablet"), DeviceType::Tablet),
    (Rule::Contains("kindle"), DeviceType::Tablet),
    (Rule::Contains("silk"), DeviceType::Tablet),
    (Rule::Contains("playbook"), DeviceType::Tablet),
    (Rule::ContainsWithout("android", &["mobile"]), DeviceType::Tablet),
    (Rule::Contains("mobile"), DeviceType::Mobile),
    (Rule::Contains("iphone"), DeviceType::Mobile),
    (Rule::Contains("ipod"), DeviceType::Mobile),
    (Rule::Contains("android"), DeviceType::Mobile),
    (Rule::Contains("blackberry"), DeviceType::Mobile),
    (Rule::Contains("windows phone"), DeviceType::Mobile),
    (Rule::Contains("opera mini"), DeviceType::Mobile),
    (Rule::Contains("iemobile"), DeviceType::Mobile),
];

fn detect_platform(ua: &str) -> &'static str {
    PLATFORM_PATTERNS
        .iter()
        .find(|(pattern, _)| ua.contains(pattern))
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN)
}

fn detect_browser(ua: &str) -> &'static str {
    BROWSER_PATTERNS
        .iter()
        .find(|(rule, _)| rule.matches(ua))
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN)
}

fn detect_device_type(ua: &str) -> DeviceType {
    DEVICE_PATTERNS
        .iter()
        .find(|(rule, _)| rule.matches(ua))
        .map(|(_, device)| *device)
        .unwrap_or_default()
}

/// Classifies a user-agent string. Total over all inputs, never fails.
///
/// # Examples
///
/// ```
/// use client_metadata::{classify_user_agent, DeviceType};
///
/// let result = classify_user_agent("");
/// assert_eq!(result.platform, "Unknown");
/// assert_eq!(result.browser, "Unknown");
/// assert_eq!(result.device_type, DeviceType::Desktop);
/// ```
pub fn classify_user_agent(user_agent: &str) -> ClassificationResult {
    let ua = user_agent.to_lowercase();
    ClassificationResult {
        user_agent: user_agent.to_string(),
        platform: detect_platform(&ua).to_string(),
        browser: detect_browser(&ua).to_string(),
        device_type: detect_device_type(&ua),
    }
}

/// Reads the user agent from `env` and classifies it.
///
/// # Errors
///
/// Returns `ClassifierError` when the environment cannot supply a user agent.
pub fn classify_environment(
    env: &dyn Environment,
) -> Result<ClassificationResult, ClassifierError> {
    let user_agent = env.user_agent()?;
    Ok(classify_user_agent(&user_agent))
}
