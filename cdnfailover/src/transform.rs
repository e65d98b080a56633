use crate::compile::CompiledPatterns;
use crate::debug;
use crate::error::{Error, Result};
use crate::file::{Contents, SourceFile};
use crate::replace::{MarkerReplacer, PatternReplacer};

/// Downstream of the transform: receives every processed file, or the error
/// that stopped it.
pub trait FileSink {
    fn push(&mut self, file: SourceFile);
    fn error(&mut self, error: Error);
}

/// Keeps everything it is handed.
#[derive(Debug, Default)]
pub struct Collected {
    pub files: Vec<SourceFile>,
    pub errors: Vec<Error>,
}

impl FileSink for Collected {
    fn push(&mut self, file: SourceFile) {
        self.files.push(file);
    }
    fn error(&mut self, error: Error) {
        self.errors.push(error);
    }
}

/// Rewrites markers in each file it is given.
#[derive(Debug, Clone)]
pub struct FailoverTransform<R = MarkerReplacer> {
    replacer: R,
}

impl FailoverTransform<MarkerReplacer> {
    /// Fails when the marker matcher cannot be built, before any file is read.
    pub fn new(compiled: &CompiledPatterns, prefix: impl Into<String>) -> Result<Self> {
        let replacer = MarkerReplacer::compile(prefix, compiled.patterns())?;
        Ok(FailoverTransform::with_replacer(replacer))
    }
}

impl<R: PatternReplacer> FailoverTransform<R> {
    pub fn with_replacer(replacer: R) -> Self {
        FailoverTransform { replacer }
    }
    /// Forwards `file` to `sink` exactly once, rewritten if any marker
    /// matched. Streamed payloads are reported as errors instead.
    pub fn process(&self, file: SourceFile, sink: &mut impl FileSink) {
        let SourceFile { path, contents } = file;
        match contents {
            Contents::Empty => sink.push(SourceFile::empty(path)),
            Contents::Streamed(_) => sink.error(Error::UnsupportedInputKind { path }),
            Contents::Buffered(bytes) => match self.rewrite(&bytes) {
                Some(text) => sink.push(SourceFile::buffered(path, text)),
                None => sink.push(SourceFile::buffered(path, bytes)),
            },
        }
    }
    pub fn process_all(&self, files: impl IntoIterator<Item = SourceFile>, sink: &mut impl FileSink) {
        for file in files {
            self.process(file, sink);
        }
    }
    /// `None` when nothing was replaced, so the original bytes can be kept.
    fn rewrite(&self, bytes: &[u8]) -> Option<String> {
        let text = String::from_utf8_lossy(bytes);
        let result = self.replacer.replace(&text);
        if result.count == 0 {
            return None
        }
        debug!("cdnfailover"; "successfully replaced {} patterns", result.count);
        Some(result.content)
    }
}
