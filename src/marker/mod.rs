//! Marker-mode packing of a host document.
//!
//! The host document (`src`) is split into lines and run through the
//! [`Scanner`]. Markup between `PAKMAN:START {..}` and `PAKMAN:STOP` lines
//! lists the region's dependencies; on STOP they are bundled and the region is
//! replaced by references to the bundles. Everything outside regions is copied
//! unchanged.
//!
//! ```html
//! <!-- PAKMAN:START {'action': 'pack', 'dest': 'js/app.js'} -->
//! <script src="js/a.js"></script>
//! <link href="css/a.css" rel="stylesheet">
//! <!-- PAKMAN:STOP -->
//! ```
//!
//! becomes
//!
//! ```html
//!      <script src="js/app.js"></script>
//!      <link href="js/app.css" rel="stylesheet" />
//! ```
//!
//! Line terminators: copied lines always get one; START and STOP lines get
//! one unless `marker_line_breaks = false`; manifest lines never do.

mod manifest;
mod region;
mod scanner;

use thiserror::Error;

use manifest::parse_line;
use region::{RegionContext, RegionSession};
use scanner::{ScanState, Scanner, Transition};

use crate::asset::AssetError;
use crate::config::PakmanConfig;
use crate::utils::fs::{FsError, ProjectFs};
use crate::{debug, log, warn};

/// Errors that abort the marker pass.
#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("source not specified in configuration")]
    MissingSource,

    #[error("marker line carries no region config: `{0}`")]
    MissingRegionConfig(String),

    #[error("invalid region config `{0}`")]
    RegionConfig(String, #[source] json5::Error),

    #[error("pakman action not defined in source: `{0}`")]
    ActionNotDefined(String),

    #[error("failed to parse manifest markup: {0}")]
    Markup(String),

    #[error("destination path not specified for output")]
    MissingDestination,

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("line {line}: {error}")]
    AtLine {
        line: usize,
        error: Box<MarkerError>,
    },
}

/// What a marker pass produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySummary {
    /// Path the rewritten document was written to.
    pub output: String,
    /// Number of regions finalized.
    pub regions: usize,
}

/// Pack every marker region of the configured host document.
pub fn pack_dependencies(
    config: &PakmanConfig,
    fs: &ProjectFs,
) -> Result<DependencySummary, MarkerError> {
    let src = config
        .src
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(MarkerError::MissingSource)?;
    let document = fs.read(src)?;

    let ctx = RegionContext {
        fs,
        target_directory: config.target_directory.as_deref().unwrap_or_default(),
        uglify: &config.uglify,
        cssmin: config.cssmin,
        line_break: config.line_ending.as_str(),
    };
    let mut packer = DocumentPacker::new(ctx, config.dest.clone(), config.marker_line_breaks);

    for (index, line) in document.split(ctx.line_break).enumerate() {
        packer.feed(line).map_err(|error| MarkerError::AtLine {
            line: index + 1,
            error: Box::new(error),
        })?;
    }

    let (buffer, document_dest, regions) = packer.finish();
    let output = output_path(config.target_directory.as_deref(), document_dest.as_deref(), src)?;

    log!("pack"; "writing {}", output);
    fs.write(&output, &buffer)?;

    Ok(DependencySummary { output, regions })
}

/// Rebuilds the host document line by line.
pub struct DocumentPacker<'a> {
    ctx: RegionContext<'a>,
    scanner: Scanner,
    session: Option<RegionSession>,
    buffer: String,
    /// Document `dest` option, normalized each time a region opens.
    document_dest: Option<String>,
    marker_line_breaks: bool,
    regions: usize,
}

impl<'a> DocumentPacker<'a> {
    pub fn new(ctx: RegionContext<'a>, document_dest: Option<String>, marker_line_breaks: bool) -> Self {
        Self {
            ctx,
            scanner: Scanner::new(),
            session: None,
            buffer: String::new(),
            document_dest,
            marker_line_breaks,
            regions: 0,
        }
    }

    /// Process one line of the host document.
    pub fn feed(&mut self, line: &str) -> Result<(), MarkerError> {
        match self.scanner.step(line)? {
            Transition::Copy(text) => {
                self.buffer.push_str(text);
                self.buffer.push_str(self.ctx.line_break);
            }
            Transition::Open(config) => {
                debug!("scan"; "region opened for {}", config.dest);
                self.document_dest = self.document_dest.as_deref().map(strip_bundle_suffix);
                self.session = Some(RegionSession::open(config));
                self.marker_break();
            }
            Transition::Manifest(text) => {
                if let Some(session) = self.session.as_mut() {
                    session.config().ensure_pack()?;
                    for reference in parse_line(text)? {
                        session.collect(&reference, self.ctx.fs)?;
                    }
                }
            }
            Transition::Close => {
                if let Some(session) = self.session.take() {
                    let markup = session.finish(&self.ctx)?;
                    self.buffer.push_str(&markup);
                    self.regions += 1;
                }
                self.marker_break();
            }
        }
        Ok(())
    }

    /// Finish the document: `(buffer, normalized dest, regions)`.
    ///
    /// A region still open at the end of the document is dropped.
    pub fn finish(self) -> (String, Option<String>, usize) {
        if self.scanner.state() == ScanState::Collecting
            && let Some(session) = &self.session
        {
            warn!("scan"; "document ended inside the region for {}; region dropped", session.config().dest);
        }
        (self.buffer, self.document_dest, self.regions)
    }

    fn marker_break(&mut self) {
        if self.marker_line_breaks {
            self.buffer.push_str(self.ctx.line_break);
        }
    }
}

/// Remove the first `.js` and then the first `.css` from the document dest.
fn strip_bundle_suffix(dest: &str) -> String {
    dest.replacen(".js", "", 1).replacen(".css", "", 1)
}

/// Where the rewritten document goes.
///
/// `target_directory + dest`, else `target_directory + src` (first `./`
/// removed), else `dest`.
fn output_path(
    target_directory: Option<&str>,
    dest: Option<&str>,
    src: &str,
) -> Result<String, MarkerError> {
    let target_directory = target_directory.filter(|t| !t.is_empty());
    let dest = dest.filter(|d| !d.is_empty());

    match (target_directory, dest) {
        (Some(target), Some(dest)) => Ok(format!("{target}{dest}")),
        (Some(target), None) => Ok(format!("{target}{}", src.replacen("./", "", 1))),
        (None, Some(dest)) => Ok(dest.to_string()),
        (None, None) => Err(MarkerError::MissingDestination),
    }
}
