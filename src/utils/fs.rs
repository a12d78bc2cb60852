//! Rooted file access for bundle sources and outputs.
//!
//! Every path the engine handles is a plain string taken from configuration or
//! from markup (`targetDirectory + dest` is string concatenation, not a path
//! join). `ProjectFs` resolves those strings against the project root and is the
//! only place the engine touches the filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Filesystem errors, always carrying the offending path.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("failed to read `{0}`")]
    Read(String, #[source] io::Error),

    #[error("failed to write `{0}`")]
    Write(String, #[source] io::Error),

    #[error("failed to copy `{0}` to `{1}`")]
    Copy(String, String, #[source] io::Error),

    #[error("invalid glob pattern `{0}`")]
    Pattern(String, #[source] glob::PatternError),

    #[error("failed to expand glob `{0}`")]
    Glob(String, #[source] glob::GlobError),
}

/// File access rooted at the project directory.
#[derive(Debug, Clone)]
pub struct ProjectFs {
    root: PathBuf,
}

impl ProjectFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a configured path string against the project root.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn read(&self, path: &str) -> Result<String, FsError> {
        fs::read_to_string(self.resolve(path)).map_err(|e| FsError::Read(path.to_string(), e))
    }

    /// Write `content`, creating parent directories as needed.
    pub fn write(&self, path: &str, content: &str) -> Result<(), FsError> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| FsError::Write(path.to_string(), e))?;
        }
        fs::write(&target, content).map_err(|e| FsError::Write(path.to_string(), e))
    }

    /// Copy a file, creating parent directories of the destination as needed.
    pub fn copy(&self, from: &str, to: &str) -> Result<(), FsError> {
        let copy_err = |e| FsError::Copy(from.to_string(), to.to_string(), e);
        let target = self.resolve(to);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(copy_err)?;
        }
        fs::copy(self.resolve(from), &target).map_err(copy_err)?;
        Ok(())
    }

    /// Expand a glob pattern into matching files.
    ///
    /// Matches are returned relative to the project root (with `/` separators)
    /// when the pattern is relative, so they can be appended to a destination
    /// prefix. Directories are skipped.
    pub fn glob(&self, pattern: &str) -> Result<Vec<String>, FsError> {
        let full = self.resolve(pattern);
        let full = full.to_string_lossy();
        let entries =
            glob::glob(&full).map_err(|e| FsError::Pattern(pattern.to_string(), e))?;

        let mut matches = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| FsError::Glob(pattern.to_string(), e))?;
            if path.is_dir() {
                continue;
            }
            matches.push(self.display_relative(&path, Path::new(pattern).is_absolute()));
        }
        Ok(matches)
    }

    fn display_relative(&self, path: &Path, absolute: bool) -> String {
        if absolute {
            return path.to_string_lossy().into_owned();
        }
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let fs = ProjectFs::new(dir.path());

        fs.write("dist/js/app.js", "var a;").unwrap();
        assert_eq!(fs.read("dist/js/app.js").unwrap(), "var a;");
    }

    #[test]
    fn test_read_missing_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let fs = ProjectFs::new(dir.path());

        let err = fs.read("missing.js").unwrap_err();
        assert!(err.to_string().contains("missing.js"));
    }

    #[test]
    fn test_glob_returns_root_relative_matches() {
        let dir = TempDir::new().unwrap();
        let fs = ProjectFs::new(dir.path());
        fs.write("fonts/a.woff", "a").unwrap();
        fs.write("fonts/sub/b.woff", "b").unwrap();
        fs.write("fonts/readme.txt", "c").unwrap();

        let mut matches = fs.glob("fonts/**/*.woff").unwrap();
        matches.sort();
        assert_eq!(matches, vec!["fonts/a.woff", "fonts/sub/b.woff"]);
    }

    #[test]
    fn test_glob_no_match_is_empty() {
        let dir = TempDir::new().unwrap();
        let fs = ProjectFs::new(dir.path());
        assert!(fs.glob("nothing/*.png").unwrap().is_empty());
    }

    #[test]
    fn test_copy_into_new_directory() {
        let dir = TempDir::new().unwrap();
        let fs = ProjectFs::new(dir.path());
        fs.write("img/logo.svg", "<svg/>").unwrap();

        fs.copy("img/logo.svg", "dist/img/logo.svg").unwrap();
        assert_eq!(fs.read("dist/img/logo.svg").unwrap(), "<svg/>");
    }
}
