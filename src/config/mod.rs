//! Packer configuration management for `pakman.toml`.
//!
//! # Example
//!
//! ```toml
//! pack_dependencies = true
//! src = "./index.html"
//! dest = "index.html"
//! target_directory = "dist/"
//! cssmin = true
//!
//! [uglify]
//! mangle = true
//! compress = true
//!
//! [[bundle]]
//! src = ["js/a.js", "js/b.js"]
//! dest = "dist/app.js"
//! ```
//!
//! The camelCase option names (`packDependencies`, `bundleConfig`,
//! `targetDirectory`) are accepted as aliases.

mod bundle;
mod error;

pub use bundle::{BundleAction, BundleDescriptor, BundleSource};
pub use error::{ConfigDiagnostics, ConfigError};

use crate::{cli::Cli, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing pakman.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PakmanConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Scan `src` for marker regions and pack them.
    #[serde(alias = "packDependencies")]
    pub pack_dependencies: bool,

    /// Explicit bundles. Required, but may be empty.
    #[serde(rename = "bundle", alias = "bundleConfig", alias = "bundle_config")]
    pub bundles: Option<Vec<BundleDescriptor>>,

    /// Host document scanned for marker regions.
    pub src: Option<String>,

    /// Where the rewritten host document goes.
    pub dest: Option<String>,

    /// Script minifier options.
    pub uglify: ScriptMinifyOptions,

    /// Minify stylesheet bundles.
    pub cssmin: bool,

    /// Prefix for every marker-mode output path (concatenated, not joined).
    #[serde(alias = "targetDirectory")]
    pub target_directory: Option<String>,

    /// Line terminator the host document is split on and written with.
    pub line_ending: LineEnding,

    /// Emit a line terminator for START and STOP marker lines.
    pub marker_line_breaks: bool,
}

impl Default for PakmanConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            pack_dependencies: false,
            bundles: None,
            src: None,
            dest: None,
            uglify: ScriptMinifyOptions::default(),
            cssmin: true,
            target_directory: None,
            line_ending: LineEnding::default(),
            marker_line_breaks: true,
        }
    }
}

/// Options forwarded to the script minifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptMinifyOptions {
    /// Shorten local identifiers.
    pub mangle: bool,
    /// Apply compression transforms.
    pub compress: bool,
}

impl Default for ScriptMinifyOptions {
    fn default() -> Self {
        Self {
            mangle: true,
            compress: true,
        }
    }
}

/// Host document line terminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Crlf,
    Lf,
}

impl LineEnding {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Crlf => "\r\n",
            Self::Lf => "\n",
        }
    }
}

impl PakmanConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let config_path =
            find_config_file(&cli.config).ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = config_path;
        config.apply_cli(cli);
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            let display_path = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            warn!("config"; "unknown fields in {}, ignoring: {}", display_path, ignored.join(", "));
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Apply CLI overrides.
    fn apply_cli(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        Self::update_option(&mut self.cssmin, cli.cssmin.as_ref());
        if cli.target_directory.is_some() {
            self.target_directory.clone_from(&cli.target_directory);
        }
        if cli.dest.is_some() {
            self.dest.clone_from(&cli.dest);
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate the options both packing modes depend on.
    ///
    /// # Checks
    /// - the bundle list must be configured (an empty list is fine)
    /// - `src` must be set when `pack_dependencies` is enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if self.bundles.is_none() {
            diag.error_with_hint(
                "bundle",
                "bundle config not specified in configuration",
                "add at least one [[bundle]] table, or `bundle = []`",
            );
        }

        if self.pack_dependencies && self.src.as_deref().is_none_or(str::is_empty) {
            diag.error_with_hint(
                "src",
                "source not specified in configuration",
                "set `src` to the document containing PAKMAN:START markers",
            );
        }

        diag.into_result()
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PakmanConfig {
    let (parsed, ignored) = PakmanConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
