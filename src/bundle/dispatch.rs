//! Per-bundle dispatch: PACK (merge + minify) or COPY (glob + copy).

use crate::asset::{
    BundleKind, ScriptAggregate, ScriptInput, StyleAggregate, minify_css, minify_scripts,
    rebase_urls, strip_script, strip_to_text,
};
use crate::config::{BundleAction, BundleDescriptor, BundleSource, PakmanConfig};
use crate::utils::fs::ProjectFs;
use crate::{debug, log};

use super::{BundleError, BundleOutput};

/// Validate a descriptor and run its action.
pub fn dispatch(
    bundle: &BundleDescriptor,
    config: &PakmanConfig,
    fs: &ProjectFs,
) -> Result<BundleOutput, BundleError> {
    let dest = bundle.dest().ok_or(BundleError::MissingDest)?;
    let src = bundle.src().ok_or(BundleError::MissingSrc)?;

    match bundle.action() {
        BundleAction::Copy => copy(src, dest, fs),
        BundleAction::Pack => pack(src, dest, config, fs),
    }
}

/// Merge `src` into a minified bundle at `dest`.
///
/// A single script path is handed to the minifier as a file; a list is read,
/// comment-stripped and aggregated first. Stylesheets are URL-rebased towards
/// `dest` in both cases.
fn pack(
    src: &BundleSource,
    dest: &str,
    config: &PakmanConfig,
    fs: &ProjectFs,
) -> Result<BundleOutput, BundleError> {
    log!("pack"; "packing {}...", dest);

    let kind = BundleKind::from_dest(dest).map_err(BundleError::UnsupportedType)?;
    let code = match (kind, src) {
        (BundleKind::Script, BundleSource::List(paths)) => {
            let mut scripts = ScriptAggregate::new();
            for path in paths {
                debug!("pack"; "consuming {}...", path);
                scripts.insert(path.as_str(), strip_script(&fs.read(path)?, path)?);
            }
            debug!("pack"; "crunching bundle of {} scripts...", scripts.len());
            minify_scripts(ScriptInput::Aggregate(&scripts), fs, &config.uglify)?
        }
        (BundleKind::Script, BundleSource::Single(path)) => {
            debug!("pack"; "crunching bundle...");
            minify_scripts(ScriptInput::File(path), fs, &config.uglify)?
        }
        (BundleKind::Style, BundleSource::List(paths)) => {
            let mut styles = StyleAggregate::new();
            for path in paths {
                debug!("pack"; "consuming {}...", path);
                styles.append(&rebase_urls(&fs.read(path)?, path, dest));
            }
            debug!("pack"; "crunching bundle...");
            if config.cssmin {
                minify_css(styles.as_str(), dest)?
            } else {
                styles.as_str().to_string()
            }
        }
        (BundleKind::Style, BundleSource::Single(path)) => {
            debug!("pack"; "crunching bundle...");
            let source = fs.read(path)?;
            if config.cssmin {
                minify_css(&rebase_urls(&source, path, dest), path)?
            } else {
                // Without minification a single stylesheet is only
                // comment-stripped; its URLs keep their original base.
                strip_to_text(&source, path)?
            }
        }
    };

    debug!("pack"; "spitting out {}...", dest);
    fs.write(dest, &code)?;

    Ok(BundleOutput::Packed {
        dest: dest.to_string(),
        kind,
        bytes: code.len(),
    })
}

/// Copy every glob match of `src` to `dest` + match path.
///
/// `dest` is a prefix, not a directory join: `dist/` + `img/a.png` gives
/// `dist/img/a.png`, so the matched directory structure is kept.
fn copy(src: &BundleSource, dest: &str, fs: &ProjectFs) -> Result<BundleOutput, BundleError> {
    let mut files = 0;
    for pattern in src.paths() {
        log!("copy"; "copying files in {}", pattern);
        for path in fs.glob(pattern)? {
            fs.copy(&path, &format!("{dest}{path}"))?;
            files += 1;
        }
    }

    Ok(BundleOutput::Copied {
        dest: dest.to_string(),
        files,
    })
}
