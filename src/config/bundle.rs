//! Bundle descriptors (`[[bundle]]`).
//!
//! # Example
//!
//! ```toml
//! [[bundle]]
//! src = ["js/a.js", "js/b.js"]
//! dest = "dist/app.js"
//!
//! [[bundle]]
//! src = "fonts/**/*.woff2"
//! dest = "dist/"
//! action = "copy"
//! ```

use serde::{Deserialize, Serialize};

/// One explicitly configured bundle.
///
/// Every field is optional at parse time: a descriptor missing `src` or
/// `dest` is reported and skipped on its own instead of failing the whole
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleDescriptor {
    /// Source path, or list of source paths (glob patterns for `copy`).
    pub src: Option<BundleSource>,
    /// Destination file (`pack`) or destination prefix (`copy`).
    pub dest: Option<String>,
    /// `pack` or `copy`, case-insensitive. Anything else packs.
    pub action: Option<String>,
}

impl BundleDescriptor {
    /// Destination, treating an empty string as absent.
    pub fn dest(&self) -> Option<&str> {
        self.dest.as_deref().filter(|d| !d.is_empty())
    }

    /// Source, treating an empty path as absent.
    pub fn src(&self) -> Option<&BundleSource> {
        self.src
            .as_ref()
            .filter(|s| !matches!(s, BundleSource::Single(p) if p.is_empty()))
    }

    pub fn action(&self) -> BundleAction {
        BundleAction::from_config(self.action.as_deref())
    }
}

/// `src` of a bundle: a single path or a list of paths.
///
/// The distinction matters when packing: a single script is handed to the
/// minifier as a file, a list is assembled into an aggregate first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BundleSource {
    Single(String),
    List(Vec<String>),
}

impl BundleSource {
    pub fn paths(&self) -> &[String] {
        match self {
            Self::Single(path) => std::slice::from_ref(path),
            Self::List(paths) => paths,
        }
    }
}

/// What to do with a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleAction {
    /// Merge and minify sources into `dest`.
    Pack,
    /// Copy glob matches under the `dest` prefix.
    Copy,
}

impl BundleAction {
    /// Resolve a configured action; unknown or missing actions pack.
    pub fn from_config(action: Option<&str>) -> Self {
        match action.map(str::to_ascii_uppercase).as_deref() {
            Some("COPY") => Self::Copy,
            _ => Self::Pack,
        }
    }
}
