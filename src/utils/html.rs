//! HTML attribute helpers.

use std::borrow::Cow;

/// Unescape HTML entities in an attribute value.
///
/// Handles the XML entities, `&nbsp;` and numeric character references.
/// Unknown or malformed entities are kept verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find('&') {
        result.push_str(&rest[..start]);
        let tail = &rest[start + 1..];

        let Some(end) = tail.find(';').filter(|&end| end > 0 && end <= 10) else {
            result.push('&');
            rest = tail;
            continue;
        };

        let entity = &tail[..end];
        match decode_entity(entity) {
            Some(c) => result.push(c),
            None => {
                result.push('&');
                result.push_str(entity);
                result.push(';');
            }
        }
        rest = &tail[end + 1..];
    }

    result.push_str(rest);
    Cow::Owned(result)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        s if s.starts_with("#x") || s.starts_with("#X") => {
            u32::from_str_radix(&s[2..], 16).ok().and_then(char::from_u32)
        }
        s if s.starts_with('#') => s[1..].parse().ok().and_then(char::from_u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_borrowed_when_plain() {
        assert!(matches!(unescape("js/app.js"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape("a.js?x=1&amp;y=2"), "a.js?x=1&y=2");
        assert_eq!(unescape("&#47;lib&#x2F;a.js"), "/lib/a.js");
    }

    #[test]
    fn test_unescape_keeps_unknown() {
        assert_eq!(unescape("a&b"), "a&b");
        assert_eq!(unescape("&bogus;x"), "&bogus;x");
    }
}
