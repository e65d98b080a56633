use std::collections::HashSet;

use crate::debug;
use crate::manifest::AssetEntry;
use crate::snippet::{build_script_snippet, build_style_snippet};

/// Closing delimiter appended to an entry name to form its marker.
pub const MARKER_SUFFIX: &str = " -->";

/// A marker (without the shared prefix) and the markup that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPattern {
    pub marker: String,
    pub replacement: String,
}

/// Patterns paired with the names of the entries that produced them, in
/// configuration order.
#[derive(Debug, Clone, Default)]
pub struct CompiledPatterns {
    patterns: Vec<MarkerPattern>,
    names: Vec<String>,
    duplicates: Vec<String>,
}

impl CompiledPatterns {
    fn push(&mut self, name: &str, pattern: MarkerPattern) {
        self.names.push(name.to_string());
        self.patterns.push(pattern);
    }
    pub fn patterns(&self) -> &[MarkerPattern] {
        &self.patterns
    }
    pub fn names(&self) -> &[String] {
        &self.names
    }
    /// Names that were configured more than once; only the first was used.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
    pub fn len(&self) -> usize {
        self.patterns.len()
    }
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
    pub fn get(&self, name: &str) -> Option<&MarkerPattern> {
        self.names
            .iter()
            .zip(&self.patterns)
            .find(|(x, _)| x.as_str() == name)
            .map(|(_, pattern)| pattern)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Script,
    Stylesheet,
}

impl AssetKind {
    /// Anything whose CDN URL ends in `css` is a stylesheet.
    pub fn of(entry: &AssetEntry) -> Self {
        if entry.cdn_url.ends_with("css") {
            AssetKind::Stylesheet
        } else {
            AssetKind::Script
        }
    }
}

pub fn marker_for(name: &str) -> String {
    format!("{name}{MARKER_SUFFIX}")
}

/// Turns configured entries into marker patterns.
///
/// The ordinal handed to the script builder is the entry's position in
/// `entries`, skipped entries included, so it stays stable when unnamed
/// entries are added or removed elsewhere in the list. Only the first entry
/// with a given name is used.
pub fn compile(entries: &[AssetEntry], local_only: bool) -> CompiledPatterns {
    let mut compiled = CompiledPatterns::default();
    let mut seen = HashSet::<&str>::new();
    for (ordinal, entry) in entries.iter().enumerate() {
        if entry.name.is_empty() {
            continue;
        }
        if !seen.insert(entry.name.as_str()) {
            debug!("warn"; "ignoring duplicate entry `{}` at position {}", entry.name, ordinal);
            compiled.duplicates.push(entry.name.clone());
            continue;
        }
        let replacement = match AssetKind::of(entry) {
            AssetKind::Stylesheet => build_style_snippet(entry, local_only),
            AssetKind::Script => build_script_snippet(entry, ordinal, local_only),
        };
        let pattern = MarkerPattern {
            marker: marker_for(&entry.name),
            replacement,
        };
        compiled.push(&entry.name, pattern);
    }
    debug!(
        "cdnfailover";
        "options has {} entries with nonempty name:{}",
        compiled.names.len(),
        compiled.names.join(",")
    );
    compiled
}
