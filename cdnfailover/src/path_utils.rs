use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Resolves file paths or unix style glob patterns, each relative to `root`.
///
/// A pattern that is not a valid glob is taken as a literal path when such
/// a file exists. Results keep pattern order, without duplicates.
pub fn resolve_file_path_patterns(root: impl AsRef<Path>, patterns: &[String]) -> Result<Vec<PathBuf>> {
    fn resolve_entry_as_glob(pattern: &str) -> Result<Vec<PathBuf>> {
        let mut results = Vec::<PathBuf>::new();
        for entry in glob::glob(pattern)? {
            match entry {
                Ok(path) => results.push(path),
                Err(error) => {
                    let path = error.path().to_path_buf();
                    return Err(Error::Io(path, std::io::Error::from(error)))
                }
            }
        }
        Ok(results)
    }
    fn resolve_entry(pattern: &Path) -> Result<Vec<PathBuf>> {
        let pattern_str = pattern.to_string_lossy();
        match resolve_entry_as_glob(&pattern_str) {
            Ok(results) => Ok(results),
            Err(_) if pattern.exists() => Ok(vec![pattern.to_path_buf()]),
            Err(error) => Err(error),
        }
    }
    let root = root.as_ref();
    let mut seen = HashSet::<PathBuf>::new();
    let mut results = Vec::<PathBuf>::new();
    for pattern in patterns {
        for path in resolve_entry(&root.join(pattern))? {
            if seen.insert(path_clean::clean(&path)) {
                results.push(path);
            }
        }
    }
    Ok(results)
}

/// `path` relative to `root`, or `None` when it lies outside of it.
pub fn relative_to_root(path: impl AsRef<Path>, root: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path_clean::clean(path.as_ref());
    let root = path_clean::clean(root.as_ref());
    if root == Path::new(".") {
        let inside = path.is_relative() && !path.starts_with("..");
        return inside.then_some(path)
    }
    path.strip_prefix(&root).ok().map(Path::to_path_buf)
}

/// Where `source` lands under `output_dir`, mirroring its place under `root`.
pub fn output_path(source: impl AsRef<Path>, root: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let source = source.as_ref();
    let root = root.as_ref();
    let relative = relative_to_root(source, root).ok_or_else(|| Error::OutsideRoot {
        path: source.to_path_buf(),
        root: root.to_path_buf(),
    })?;
    Ok(output_dir.as_ref().join(relative))
}

pub fn is_within(path: impl AsRef<Path>, dir: impl AsRef<Path>) -> bool {
    path_clean::clean(path.as_ref()).starts_with(path_clean::clean(dir.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths() {
        assert_eq!(relative_to_root("site/pages/a.html", "site"), Some(PathBuf::from("pages/a.html")));
        assert_eq!(relative_to_root("./pages/a.html", "."), Some(PathBuf::from("pages/a.html")));
        assert_eq!(relative_to_root("../a.html", "."), None);
        assert_eq!(relative_to_root("other/a.html", "site"), None);
    }

    #[test]
    fn output_mirrors_root_layout() {
        let out = output_path("site/pages/a.html", "site", "dist").unwrap();
        assert_eq!(out, PathBuf::from("dist/pages/a.html"));
        assert!(matches!(
            output_path("elsewhere/a.html", "site", "dist"),
            Err(Error::OutsideRoot { .. })
        ));
    }

    #[test]
    fn within() {
        assert!(is_within("site/output/a.html", "site/output"));
        assert!(is_within("./site/output/a.html", "site/output/"));
        assert!(!is_within("site/outputs/a.html", "site/output"));
    }

    #[test]
    fn resolves_globs_and_literal_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.html"), "").unwrap();
        std::fs::write(dir.path().join("b.html"), "").unwrap();
        std::fs::write(dir.path().join("odd[.html"), "").unwrap();
        let patterns = vec!["*.html".to_string(), "a.html".to_string(), "odd[.html".to_string()];
        let paths = resolve_file_path_patterns(dir.path(), &patterns).unwrap();
        let names = paths
            .iter()
            .map(|x| x.file_name().unwrap().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["a.html", "b.html", "odd[.html"]);
        assert!(matches!(
            resolve_file_path_patterns(dir.path(), &["missing[.html".to_string()]),
            Err(Error::Glob(_))
        ));
    }
}
