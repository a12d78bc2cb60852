//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Pack scripts and stylesheets into bundles
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: pakman.toml)
    #[arg(short = 'C', long, default_value = "pakman.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Prefix prepended to every marker-mode output path
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub target_directory: Option<String>,

    /// Where the rewritten host document is written
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub dest: Option<String>,

    /// Minify stylesheet bundles
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub cssmin: Option<bool>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pakman"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("pakman.toml"));
        assert!(cli.target_directory.is_none());
        assert!(cli.cssmin.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "pakman", "-C", "build/pakman.toml", "-t", "dist/", "-d", "index.html", "--cssmin", "false", "-v",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("build/pakman.toml"));
        assert_eq!(cli.target_directory.as_deref(), Some("dist/"));
        assert_eq!(cli.dest.as_deref(), Some("index.html"));
        assert_eq!(cli.cssmin, Some(false));
        assert!(cli.verbose);
    }

    #[test]
    fn test_version_and_verbose_flags_are_distinct() {
        let err = Cli::try_parse_from(["pakman", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let cli = Cli::try_parse_from(["pakman", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_bare_cssmin_flag_means_true() {
        let cli = Cli::try_parse_from(["pakman", "--cssmin"]).unwrap();
        assert_eq!(cli.cssmin, Some(true));
    }
}
