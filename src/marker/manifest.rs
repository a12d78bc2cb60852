//! Manifest line parsing.
//!
//! A line inside a region is parsed as a markup fragment. Only attributes
//! matter: every `src` is a script reference and every `href` a stylesheet
//! reference, whatever tag carries them.

use crate::utils::html::unescape;

use super::MarkerError;

/// An asset referenced from a manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    Script(String),
    Style(String),
}

/// Extract asset references from one line, in document order.
pub fn parse_line(line: &str) -> Result<Vec<AssetRef>, MarkerError> {
    let dom = tl::parse(line, tl::ParserOptions::default())
        .map_err(|e| MarkerError::Markup(format!("{e:?}")))?;
    let parser = dom.parser();

    let mut refs = Vec::new();
    for handle in dom.children() {
        collect_refs(*handle, parser, &mut refs);
    }
    Ok(refs)
}

fn collect_refs(handle: tl::NodeHandle, parser: &tl::Parser<'_>, refs: &mut Vec<AssetRef>) {
    let Some(tl::Node::Tag(tag)) = handle.get(parser) else {
        return;
    };

    for (name, value) in tag.attributes().iter() {
        let Some(value) = value else {
            continue;
        };
        let value = unescape(&value).into_owned();
        match name.to_ascii_lowercase().as_str() {
            "src" => refs.push(AssetRef::Script(value)),
            "href" => refs.push(AssetRef::Style(value)),
            _ => {}
        }
    }

    for child in tag.children().top().iter() {
        collect_refs(*child, parser, refs);
    }
}
