//! Stylesheet URL rebasing.
//!
//! Relative `url(...)` references are rewritten so they keep pointing at the
//! same file once the stylesheet text is moved from `from` to `to`. Absolute
//! paths, URLs with a scheme (`http:`, `data:`), fragment-only references and
//! `~` module references are left alone, as are URLs with no relative path
//! from the new location (a bundle written above the project root).

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::utils::path::{is_external_link, join, parent_dir, relative, split_path_suffix};

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^'")\s]*))\s*\)"#).unwrap()
});

/// Rewrite relative URLs in `css` from the location `from` to `to`.
///
/// Both paths are file paths (the stylesheet and the bundle), relative to the
/// same root.
pub fn rebase_urls<'a>(css: &'a str, from: &str, to: &str) -> Cow<'a, str> {
    let from_dir = parent_dir(from);
    let to_dir = parent_dir(to);

    URL_RE.replace_all(css, |caps: &Captures<'_>| {
        let (url, quote) = if let Some(m) = caps.get(1) {
            (m.as_str(), "\"")
        } else if let Some(m) = caps.get(2) {
            (m.as_str(), "'")
        } else {
            (caps.get(3).map_or("", |m| m.as_str()), "")
        };

        if !should_rebase(url) {
            return caps[0].to_string();
        }

        let (path, suffix) = split_path_suffix(url);
        match relative(to_dir, &join(from_dir, path)) {
            Some(rebased) => format!("url({quote}{rebased}{suffix}{quote})"),
            None => caps[0].to_string(),
        }
    })
}

fn should_rebase(url: &str) -> bool {
    !(url.is_empty()
        || url.starts_with('/')
        || url.starts_with('#')
        || url.starts_with('~')
        || is_external_link(url))
}
