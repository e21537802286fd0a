//! Web App Manifest `icons` fragment for the generated icon set.
//!
//! A PWA declares its installable icons in `manifest.json` as an array of
//! `{ src, sizes, type, purpose }` entries. This module serializes the set
//! this tool just generated so it can be pasted into (or diffed against)
//! the app's manifest.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Root of the fragment file: just the `icons` array.
#[derive(Serialize, Debug, Clone)]
pub struct ManifestIcons {
    pub icons: Vec<IconEntry>,
}

/// One icon declaration in Web App Manifest form.
#[derive(Serialize, Debug, Clone)]
pub struct IconEntry {
    /// Path to the image, relative to the manifest.
    pub src: String,

    /// Space-separated size list; always a single "WxH" here.
    pub sizes: String,

    /// MIME type of the image.
    #[serde(rename = "type")]
    pub mime_type: String,

    /// Display purposes the icon serves (e.g. "any maskable").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl IconEntry {
    /// Entry for a generated `icon-<L>x<L>.png` at the given edge length.
    pub fn png(size: u32) -> Self {
        Self {
            src: format!("icons/icon-{size}x{size}.png"),
            sizes: format!("{size}x{size}"),
            mime_type: "image/png".to_string(),
            purpose: Some("any maskable".to_string()),
        }
    }
}

/// Writes `manifest-icons.json` into the output directory, one entry per
/// generated size, in generation order.
pub fn write_manifest_icons(dir: &Path, sizes: &[u32]) -> Result<()> {
    let fragment = ManifestIcons {
        icons: sizes.iter().map(|&size| IconEntry::png(size)).collect(),
    };
    let json = serde_json::to_string_pretty(&fragment)
        .context("Failed to serialize manifest icons")?;
    std::fs::write(dir.join("manifest-icons.json"), json)
        .context("Failed to write manifest-icons.json")
}
