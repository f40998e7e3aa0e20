//! Smartphone Usage Ingestion Model
//!
//! Wire types for the usage payload posted by the phone agent, the
//! package-to-app-name lookup used when rendering responses and log rows,
//! and the coarse screen-time level reported alongside the fuzzy assessment.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Usage payload posted to `POST /usage`.
///
/// Times arrive in seconds; the inference engine takes hours, see
/// [`hours`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsagePayload {
    /// Total foreground screen time across all apps, in seconds.
    #[serde(default)]
    pub total_screen_time_s: f64,
    /// Per-app breakdown.
    #[serde(default)]
    pub usage_data: Vec<AppUsage>,
}

/// One app's share of the reported screen time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUsage {
    /// Android package id, e.g. `com.whatsapp`.
    pub package: String,
    /// Foreground time for this app, in seconds.
    #[serde(default)]
    pub foreground_time_s: f64,
}

impl AppUsage {
    /// Human-readable app name, falling back to the raw package id.
    pub fn app_name(&self) -> &str {
        app_name(&self.package)
    }
}

/// Coarse screen-time bucket reported next to the fuzzy assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScreenTimeLevel {
    Low,
    Moderate,
    High,
}

impl ScreenTimeLevel {
    /// Bucket thresholds: up to 2 h low, up to 5 h moderate, above that high.
    pub fn from_hours(total_hours: f64) -> Self {
        if total_hours <= 2.0 {
            ScreenTimeLevel::Low
        } else if total_hours <= 5.0 {
            ScreenTimeLevel::Moderate
        } else {
            ScreenTimeLevel::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScreenTimeLevel::Low => "Low",
            ScreenTimeLevel::Moderate => "Moderate",
            ScreenTimeLevel::High => "High",
        }
    }
}

/// Convert reported seconds to the hours the engine consumes.
pub fn hours(seconds: f64) -> f64 {
    seconds / 3600.0
}

/// Render seconds as `"H h M min S s"` for responses and the log.
pub fn format_hms(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours} h {minutes} min {secs} s")
}

/// Map a package id to a display name, falling back to the package id.
pub fn app_name(package: &str) -> &str {
    package_names()
        .get(package)
        .copied()
        .unwrap_or(package)
}

fn package_names() -> &'static IndexMap<&'static str, &'static str> {
    static NAMES: OnceLock<IndexMap<&'static str, &'static str>> = OnceLock::new();
    NAMES.get_or_init(|| {
        IndexMap::from([
            ("com.ss.android.ugc.trill", "TikTok"),
            ("com.twitter.android", "Twitter"),
            ("com.whatsapp", "WhatsApp"),
            ("com.instagram.android", "Instagram"),
            ("com.miui.home", "System launcher"),
            ("com.android.chrome", "Chrome"),
            ("com.google.android.apps.docs.editors.sheets", "Google Sheets"),
            ("com.google.android.apps.tachyon", "Google Meet"),
            ("com.miui.securitycenter", "Security"),
            ("com.google.android.youtube", "YouTube"),
            ("com.android.vending", "Google Play Store"),
            ("com.miui.gallery", "Gallery"),
            ("com.facebook.katana", "Facebook"),
            ("org.telegram.messenger", "Telegram"),
            ("com.google.android.packageinstaller", "Package Installer"),
            ("com.google.android.apps.wellbeing", "Digital Wellbeing"),
            ("com.google.android.permissioncontroller", "Permission Controller"),
            ("com.miui.cleaner", "Cleaner"),
            ("com.xiaomi.account", "Xiaomi Account"),
            ("com.mi.android.globalFileexplorer", "File Manager"),
            ("com.android.systemui", "System UI"),
            ("com.miui.aod", "Always-on display"),
        ])
    })
}
