//! Path and URL utilities.
//!
//! Pure functions over `/`-separated path strings. No side effects.

use std::path::Path;

/// Check if a link is external (has a URL scheme like http:, data:, etc.)
///
/// A valid scheme must:
/// - Have at least 1 character before the colon
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Split a URL into the path part and its `?query#fragment` suffix.
///
/// # Examples
/// ```ignore
/// assert_eq!(split_path_suffix("font.woff?v=2#x"), ("font.woff", "?v=2#x"));
/// assert_eq!(split_path_suffix("a.png"), ("a.png", ""));
/// ```
#[inline]
pub fn split_path_suffix(url: &str) -> (&str, &str) {
    match url.find(['?', '#']) {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    }
}

/// Directory part of a `/`-separated path (`""` for a bare file name).
#[inline]
pub fn parent_dir(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(0) => "/",
        Some(pos) => &path[..pos],
        None => "",
    }
}

/// Lexically normalize a `/`-separated path.
///
/// Removes `.` segments and resolves `..` against preceding segments. Leading
/// `..` segments that cannot be resolved are kept.
pub fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

/// Join two `/`-separated paths and normalize the result.
pub fn join(base: &str, rel: &str) -> String {
    if base.is_empty() {
        normalize(rel)
    } else {
        normalize(&format!("{base}/{rel}"))
    }
}

/// Relative path from directory `from_dir` to `to`.
///
/// Both arguments are normalized first; they must share the same anchor
/// (both relative to the project root, or both absolute). Returns `None` when
/// no relative path exists, e.g. when `from_dir` climbs above the root.
///
/// # Examples
/// ```ignore
/// assert_eq!(relative("dist/css", "img/bg.png").unwrap(), "../../img/bg.png");
/// assert_eq!(relative("css", "css/fonts/a.woff").unwrap(), "fonts/a.woff");
/// ```
pub fn relative(from_dir: &str, to: &str) -> Option<String> {
    let from = normalize(from_dir);
    let to = normalize(to);
    let diff = pathdiff::diff_paths(Path::new(&to), Path::new(&from))?;

    Some(
        diff.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_external_link() {
        assert!(is_external_link("https://example.com/a.png"));
        assert!(is_external_link("data:image/png;base64,AAAA"));
        assert!(!is_external_link("../img/a.png"));
        assert!(!is_external_link("/img/a.png"));
    }

    #[test]
    fn test_split_path_suffix() {
        assert_eq!(split_path_suffix("font.woff?v=2#x"), ("font.woff", "?v=2#x"));
        assert_eq!(split_path_suffix("a.svg#icon"), ("a.svg", "#icon"));
        assert_eq!(split_path_suffix("a.png"), ("a.png", ""));
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("css/site.css"), "css");
        assert_eq!(parent_dir("./a/b/c.css"), "./a/b");
        assert_eq!(parent_dir("site.css"), "");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("./a/./b/../c"), "a/c");
        assert_eq!(normalize("../a/b"), "../a/b");
        assert_eq!(normalize("a/../../b"), "../b");
        assert_eq!(normalize("/a/../b"), "/b");
    }

    #[test]
    fn test_relative() {
        assert_eq!(relative("dist/css", "img/bg.png").as_deref(), Some("../../img/bg.png"));
        assert_eq!(relative("css", "css/fonts/a.woff").as_deref(), Some("fonts/a.woff"));
        assert_eq!(relative("", "img/a.png").as_deref(), Some("img/a.png"));
        assert_eq!(relative("dist", "dist/a.png").as_deref(), Some("a.png"));
        assert_eq!(relative("./dist/../css", "img/a.png").as_deref(), Some("../img/a.png"));
    }

    #[test]
    fn test_relative_from_above_root_is_unknown() {
        assert_eq!(relative("../x", "img.png"), None);
        assert_eq!(relative("../x", "../x/img.png").as_deref(), Some("img.png"));
    }
}
