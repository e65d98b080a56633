//! Replaces `<!-- cdnfailover:<name> -->` markers in HTML with tags that load
//! an asset from its CDN and fall back to a local copy when that fails.

pub mod logger;
pub mod error;
pub mod manifest;
pub mod snippet;
pub mod compile;
pub mod replace;
pub mod file;
pub mod transform;
pub mod path_utils;
pub mod pipeline;
pub mod cli;

pub use error::{Error, Result};
pub use manifest::{AssetEntry, FailoverManifest};
pub use compile::{compile, CompiledPatterns, MarkerPattern};
pub use replace::{MarkerReplacer, PatternReplacer, Replaced};
pub use file::{Contents, SourceFile};
pub use transform::{Collected, FailoverTransform, FileSink};
