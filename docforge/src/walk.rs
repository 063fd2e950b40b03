//! Document discovery.
//!
//! Lists the documents under a root directory whose file name matches a
//! glob. Excluded directories are pruned before descent, so nothing beneath
//! them is read.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::DocforgeError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Which files to visit.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    file_pattern: Pattern,
    exclude: Vec<Pattern>,
}

impl WalkOptions {
    /// Builds options from a file-name glob and excluded directory globs.
    ///
    /// Exclusions are matched against directory paths relative to the walk
    /// root, using `/` as separator.
    ///
    /// # Errors
    ///
    /// Returns `DocforgeError::Usage` if a pattern is malformed.
    pub fn new(file_pattern: &str, exclude: &[String]) -> Result<Self, DocforgeError> {
        let compile = |p: &str| {
            Pattern::new(p)
                .map_err(|e| DocforgeError::Usage(format!("invalid pattern '{p}': {e}")))
        };
        Ok(Self {
            file_pattern: compile(file_pattern)?,
            exclude: exclude
                .iter()
                .map(|p| compile(p.trim_end_matches('/')))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Returns `true` if `name` matches the file pattern.
    #[must_use]
    pub fn matches_file(&self, name: &str) -> bool {
        self.file_pattern.matches_with(name, MATCH_OPTIONS)
    }

    /// Returns `true` if a directory at `relative` is excluded.
    #[must_use]
    pub fn is_excluded(&self, relative: &Path) -> bool {
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_with(&relative, MATCH_OPTIONS))
    }
}

/// Lists matching files under `root`, sorted by path.
///
/// A file root is returned as-is when its name matches.
///
/// # Errors
///
/// Returns `DocforgeError::InvalidPath` if `root` does not exist, is a file
/// not matching the pattern, or is neither file nor directory, and
/// `DocforgeError::Io` if a directory cannot be read.
pub fn discover(root: &Path, options: &WalkOptions) -> Result<Vec<PathBuf>, DocforgeError> {
    if root.is_file() {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if !options.matches_file(&name) {
            return Err(DocforgeError::InvalidPath {
                path: root.to_path_buf(),
                reason: format!("file name does not match '{}'", options.file_pattern),
            });
        }
        return Ok(vec![root.to_path_buf()]);
    }

    if !root.is_dir() {
        return Err(DocforgeError::InvalidPath {
            path: root.to_path_buf(),
            reason: "not a file or directory".to_string(),
        });
    }

    let keep = |entry: &DirEntry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if options.is_excluded(relative) {
            debug!(path = %entry.path().display(), "skipping excluded directory");
            return false;
        }
        true
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(keep)
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && options.matches_file(&entry.file_name().to_string_lossy())
        {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
