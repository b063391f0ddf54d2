//! Package metadata exposed to the host's application catalog.

use serde::Serialize;

/// Static description of an application package.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AppManifest {
    pub name: &'static str,
    pub version: &'static str,
    pub git_url: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
}

/// Manifest of the demo application package.
pub const DEMO_MANIFEST: AppManifest = AppManifest {
    name: "Time Display Demo",
    version: "0.0.1",
    git_url: "https://github.com/yang0/autotask_app_demo.git",
    description: "A demo application for displaying the current time in different formats and timezones, and for browsing files",
    tags: &["application", "demo", "time", "timezone", "files"],
};
