//! Asset transforms, aggregation and minification.
//!
//! Pipeline per source file:
//! - scripts: read -> [`strip_script`] -> [`ScriptAggregate`] -> [`minify_scripts`]
//! - stylesheets: read -> [`rebase_urls`] -> [`StyleAggregate`] -> [`minify_css`]

mod aggregate;
mod kind;
pub mod minify;
pub mod rebase;
pub mod strip;

use thiserror::Error;

use crate::utils::fs::FsError;

pub use aggregate::{ScriptAggregate, StyleAggregate};
pub use kind::BundleKind;
pub use minify::{ScriptInput, minify_css, minify_scripts};
pub use rebase::rebase_urls;
pub use strip::{strip_script, strip_to_text};

/// Errors raised while transforming or minifying assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Fs(#[from] FsError),

    #[error("failed to parse script `{0}`: {1}")]
    ScriptParse(String, String),

    #[error("failed to parse stylesheet `{0}`: {1}")]
    StyleParse(String, String),

    #[error("failed to print stylesheet `{0}`: {1}")]
    StylePrint(String, String),
}
