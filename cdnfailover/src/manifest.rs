use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::replace::DEFAULT_PREFIX;

/// The full config file
#[derive(Debug, Clone, Deserialize)]
pub struct FailoverManifest {
    /// Print diagnostics while compiling and rewriting.
    #[serde(default)]
    pub verbose: bool,

    /// Emit plain local tags with no CDN reference (offline builds).
    #[serde(default)]
    pub uselocalfilesonly: bool,

    #[serde(default)]
    pub files: Vec<AssetEntry>,

    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default = "default_output")]
    pub output_dir: PathBuf,

    /// Opening delimiter shared by every marker.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// File paths or unix style glob patterns, relative to `root`.
    #[serde(default)]
    pub inputs: Vec<String>,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_output() -> PathBuf {
    PathBuf::from("output")
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

/// One configured resource: a CDN URL and the local copy to fall back to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssetEntry {
    /// Entries with an empty name are skipped.
    #[serde(default)]
    pub name: String,

    #[serde(default, rename = "cdn")]
    pub cdn_url: String,

    #[serde(default, rename = "local")]
    pub local_path: String,

    #[serde(default, rename = "cdnintegrity")]
    pub integrity: Option<String>,

    #[serde(default, rename = "cdncrossorigin")]
    pub cross_origin: Option<String>,
}

impl AssetEntry {
    pub fn new(name: impl Into<String>, cdn_url: impl Into<String>, local_path: impl Into<String>) -> Self {
        AssetEntry {
            name: name.into(),
            cdn_url: cdn_url.into(),
            local_path: local_path.into(),
            integrity: None,
            cross_origin: None,
        }
    }
    pub fn with_integrity(mut self, integrity: impl Into<String>) -> Self {
        self.integrity = Some(integrity.into());
        self
    }
    pub fn with_cross_origin(mut self, cross_origin: impl Into<String>) -> Self {
        self.cross_origin = Some(cross_origin.into());
        self
    }
    /// An empty value counts as absent.
    pub fn integrity(&self) -> Option<&str> {
        self.integrity.as_deref().filter(|x| !x.is_empty())
    }
    /// An empty value counts as absent.
    pub fn cross_origin(&self) -> Option<&str> {
        self.cross_origin.as_deref().filter(|x| !x.is_empty())
    }
}

pub fn load_manifest(path: impl AsRef<Path>) -> Result<FailoverManifest> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|error| Error::Io(path.to_path_buf(), error))?;
    let extension = path
        .extension()
        .and_then(|x| x.to_str())
        .map(|x| x.to_ascii_lowercase());
    match extension.as_deref() {
        Some("toml") => parse_toml(&text),
        Some("json") => parse_json(&text),
        _ => Err(Error::UnknownManifestFormat(path.to_path_buf())),
    }
}

pub fn parse_toml(text: &str) -> Result<FailoverManifest> {
    Ok(toml::from_str(text)?)
}

pub fn parse_json(text: &str) -> Result<FailoverManifest> {
    Ok(serde_json::from_str(text)?)
}
