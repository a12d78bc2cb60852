//! Comment stripping.
//!
//! Scripts are reprinted by oxc with comments disabled; stylesheets are
//! reprinted by lightningcss, which does not keep comments.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::parser::Parser;

use super::{AssetError, minify::script_source_type};

/// Remove all comments from a script, keeping it readable.
pub fn strip_script(source: &str, label: &str) -> Result<String, AssetError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, script_source_type()).parse();
    if let Some(err) = ret.errors.first() {
        return Err(AssetError::ScriptParse(label.to_string(), err.to_string()));
    }
    let code = Codegen::new()
        .with_options(CodegenOptions {
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .build(&ret.program)
        .code;
    Ok(code)
}

/// Remove all comments from a stylesheet without minifying it.
pub fn strip_to_text(source: &str, label: &str) -> Result<String, AssetError> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| AssetError::StyleParse(label.to_string(), e.to_string()))?;
    let result = stylesheet
        .to_css(PrinterOptions::default())
        .map_err(|e| AssetError::StylePrint(label.to_string(), e.to_string()))?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_script_removes_comments() {
        let out = strip_script("/*c*/var a = 1; // trailing\n", "a.js").unwrap();
        assert!(out.contains("var a = 1"));
        assert!(!out.contains("/*c*/"));
        assert!(!out.contains("trailing"));
    }

    #[test]
    fn test_strip_script_reports_label_on_error() {
        let err = strip_script("var = ;", "broken.js").unwrap_err();
        assert!(err.to_string().contains("broken.js"));
    }

    #[test]
    fn test_strip_to_text_keeps_rules() {
        let out = strip_to_text("/* header */\n.a { color: red; }\n", "site.css").unwrap();
        assert!(!out.contains("header"));
        assert!(out.contains(".a"));
        assert!(out.contains("color: red"));
    }
}
