use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The file arrived as an unread stream instead of a buffer.
    #[error("cdnfailover: Streaming not supported ({})", path.display())]
    UnsupportedInputKind { path: PathBuf },

    #[error("IO error when accessing `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("manifest parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("manifest parsing error")]
    Json(#[from] serde_json::Error),

    #[error("unsupported manifest format `{}` (expected .toml or .json)", .0.display())]
    UnknownManifestFormat(PathBuf),

    #[error("invalid input pattern")]
    Glob(#[from] glob::PatternError),

    #[error("failed to build marker matcher")]
    Pattern(#[from] regex::Error),

    #[error("`{}` is not inside the project root `{}`", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },
}
