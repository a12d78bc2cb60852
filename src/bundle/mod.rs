//! Explicit bundle packing (`[[bundle]]` tables).
//!
//! Every descriptor is dispatched on its own. Failures are captured in a
//! [`BundleReport`] instead of stopping the loop, and reported once all
//! descriptors have run.

mod dispatch;

pub use dispatch::dispatch;

use thiserror::Error;

use crate::asset::{AssetError, BundleKind};
use crate::config::{BundleDescriptor, PakmanConfig};
use crate::utils::fs::{FsError, ProjectFs};
use crate::{log, warn};

/// Why a single bundle could not be produced.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("destination path not provided in bundle")]
    MissingDest,

    #[error("source not provided in bundle")]
    MissingSrc,

    #[error("pakman does not consume the following file type: .{0}")]
    UnsupportedType(String),

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// What a successful bundle produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOutput {
    Packed {
        dest: String,
        kind: BundleKind,
        bytes: usize,
    },
    Copied {
        dest: String,
        files: usize,
    },
}

/// Result of one descriptor, in configuration order.
#[derive(Debug)]
pub struct BundleOutcome {
    /// Position in the bundle list (0-based).
    pub index: usize,
    /// Configured destination, if any.
    pub dest: Option<String>,
    pub result: Result<BundleOutput, BundleError>,
}

#[derive(Debug, Default)]
pub struct BundleReport {
    outcomes: Vec<BundleOutcome>,
}

impl BundleReport {
    pub fn outcomes(&self) -> &[BundleOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &BundleOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Print one line per produced bundle and a warning per failure.
    pub fn log(&self) {
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(BundleOutput::Packed { dest, kind, bytes }) => {
                    log!("pack"; "wrote {} {} ({} bytes)", kind.as_str(), dest, bytes);
                }
                Ok(BundleOutput::Copied { dest, files }) => {
                    log!("copy"; "copied {} file{} to {}", files, if *files == 1 { "" } else { "s" }, dest);
                }
                Err(err) => {
                    let label = outcome.dest.as_deref().unwrap_or("<no dest>");
                    warn!("bundle"; "#{} {}: {}", outcome.index + 1, label, err);
                }
            }
        }

        if self.has_failures() {
            warn!(
                "bundle"; "{} of {} bundles failed",
                self.failures().count(),
                self.outcomes.len()
            );
        }
    }
}

/// Pack every descriptor in order, isolating failures.
pub fn pack_bundles(
    bundles: &[BundleDescriptor],
    config: &PakmanConfig,
    fs: &ProjectFs,
) -> BundleReport {
    let outcomes = bundles
        .iter()
        .enumerate()
        .map(|(index, bundle)| BundleOutcome {
            index,
            dest: bundle.dest.clone(),
            result: dispatch(bundle, config, fs),
        })
        .collect();

    BundleReport { outcomes }
}
