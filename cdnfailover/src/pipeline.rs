use std::path::{Path, PathBuf};

use crate::compile::compile;
use crate::error::{Error, Result};
use crate::file::{Contents, SourceFile};
use crate::manifest::{AssetEntry, FailoverManifest};
use crate::transform::{FailoverTransform, FileSink};
use crate::{debug, log, logger};

/// One build: every input is rewritten into `output_dir`.
#[derive(Debug, Clone)]
pub struct Build {
    pub root: PathBuf,
    pub inputs: Vec<String>,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub local_only: bool,
    pub entries: Vec<AssetEntry>,
}

#[derive(Debug, Default)]
pub struct BuildReport {
    pub written: usize,
    /// Targets that already held identical contents.
    pub unchanged: usize,
    pub directories: usize,
    pub errors: Vec<Error>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Build {
    /// Paths in the manifest are relative to the directory holding it.
    pub fn from_manifest(manifest: &FailoverManifest, manifest_dir: impl AsRef<Path>) -> Self {
        let root = manifest_dir.as_ref().join(&manifest.root);
        Build {
            output_dir: root.join(&manifest.output_dir),
            root,
            inputs: manifest.inputs.clone(),
            prefix: manifest.prefix.clone(),
            local_only: manifest.uselocalfilesonly,
            entries: manifest.files.clone(),
        }
    }
    pub fn run(&self) -> Result<BuildReport> {
        let compiled = compile(&self.entries, self.local_only);
        let transform = FailoverTransform::new(&compiled, self.prefix.clone())?;
        let sources = crate::path_utils::resolve_file_path_patterns(&self.root, &self.inputs)?
            .into_iter()
            .filter(|path| !crate::path_utils::is_within(path, &self.output_dir))
            .collect::<Vec<_>>();
        debug!("cdnfailover"; "{} input files under {}", sources.len(), self.root.display());
        let mut writer = OutputWriter {
            root: &self.root,
            output_dir: &self.output_dir,
            report: BuildReport::default(),
        };
        for path in sources {
            match SourceFile::load(&path) {
                Ok(file) => transform.process(file, &mut writer),
                Err(error) => writer.error(error),
            }
        }
        let report = writer.report;
        log!(
            "cdnfailover";
            "wrote {} files ({} unchanged) to {}",
            report.written,
            report.unchanged,
            self.output_dir.display()
        );
        Ok(report)
    }
}

/// Final stage of a build: places each forwarded file under the output dir.
struct OutputWriter<'a> {
    root: &'a Path,
    output_dir: &'a Path,
    report: BuildReport,
}

impl OutputWriter<'_> {
    fn write(&mut self, file: SourceFile) -> Result<()> {
        let target = crate::path_utils::output_path(&file.path, self.root, self.output_dir)?;
        let io_error = |error| Error::Io(target.clone(), error);
        match file.contents {
            Contents::Empty => {
                std::fs::create_dir_all(&target).map_err(io_error)?;
                self.report.directories += 1;
            }
            Contents::Buffered(bytes) => {
                let should_write = std::fs::read(&target)
                    .map(|current| current != bytes)
                    .unwrap_or(true);
                if !should_write {
                    self.report.unchanged += 1;
                    return Ok(())
                }
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent).map_err(io_error)?;
                }
                std::fs::write(&target, bytes).map_err(io_error)?;
                self.report.written += 1;
            }
            Contents::Streamed(_) => return Err(Error::UnsupportedInputKind { path: file.path }),
        }
        Ok(())
    }
}

impl FileSink for OutputWriter<'_> {
    fn push(&mut self, file: SourceFile) {
        if let Err(error) = self.write(file) {
            self.error(error);
        }
    }
    fn error(&mut self, error: Error) {
        match std::error::Error::source(&error) {
            Some(source) => logger::error(&format!("{error}: {source}")),
            None => logger::error(&error.to_string()),
        }
        self.report.errors.push(error);
    }
}
