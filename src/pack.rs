//! Packing task orchestration.
//!
//! Phases:
//! - **Validate** - options both modes depend on
//! - **Bundles** - explicit `[[bundle]]` tables, failures isolated per bundle
//! - **Dependencies** - marker regions of `src`, when `pack_dependencies` is set

use anyhow::{Context, Result};

use crate::{
    bundle::pack_bundles,
    config::PakmanConfig,
    debug, log,
    marker::{DependencySummary, pack_dependencies},
    utils::fs::ProjectFs,
};

/// What one run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Bundles written or copied.
    pub bundles_packed: usize,
    /// Bundles that failed (already reported as warnings).
    pub bundles_failed: usize,
    /// Present when the marker pass ran.
    pub dependencies: Option<DependencySummary>,
}

/// Run the whole packing task.
pub fn run(config: &PakmanConfig, fs: &ProjectFs) -> Result<RunSummary> {
    config.validate()?;
    let mut summary = RunSummary::default();

    if let Some(bundles) = config.bundles.as_deref().filter(|b| !b.is_empty()) {
        log!("pack"; "packing {} bundle{}", bundles.len(), if bundles.len() == 1 { "" } else { "s" });
        let report = pack_bundles(bundles, config, fs);
        report.log();
        summary.bundles_packed = report.succeeded();
        summary.bundles_failed = report.outcomes().len() - summary.bundles_packed;
    } else {
        debug!("pack"; "no bundles configured");
    }

    if config.pack_dependencies {
        let src = config.src.as_deref().unwrap_or_default();
        log!("pack"; "scanning {} for dependencies", src);
        let deps = pack_dependencies(config, fs)
            .with_context(|| format!("failed to pack dependencies of `{src}`"))?;
        log!(
            "pack"; "{} region{} packed into {}",
            deps.regions,
            if deps.regions == 1 { "" } else { "s" },
            deps.output
        );
        summary.dependencies = Some(deps);
    }

    Ok(summary)
}
