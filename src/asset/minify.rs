//! Asset minification for JS and CSS bundles.
//!
//! Uses oxc for JavaScript and lightningcss for CSS.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::config::ScriptMinifyOptions;
use crate::utils::fs::ProjectFs;

use super::{AssetError, ScriptAggregate};

/// Label used in errors for sources that were merged before parsing.
const AGGREGATE_LABEL: &str = "<bundle>";

/// What the script minifier is asked to process.
#[derive(Debug, Clone, Copy)]
pub enum ScriptInput<'a> {
    /// Sources assembled by the caller, minified as one program.
    Aggregate(&'a ScriptAggregate),
    /// A single file, loaded by the minifier itself.
    File(&'a str),
}

/// Bundled scripts are classic browser scripts, not modules: top-level
/// declarations are globals and must survive compression.
pub(super) fn script_source_type() -> SourceType {
    SourceType::script()
}

/// Minify a script input into bundle text.
pub fn minify_scripts(
    input: ScriptInput<'_>,
    fs: &ProjectFs,
    options: &ScriptMinifyOptions,
) -> Result<String, AssetError> {
    match input {
        ScriptInput::Aggregate(aggregate) => {
            minify_js(&aggregate.concat(), AGGREGATE_LABEL, options)
        }
        ScriptInput::File(path) => {
            let source = fs.read(path)?;
            minify_js(&source, path, options)
        }
    }
}

/// Minify JavaScript source code.
pub fn minify_js(
    source: &str,
    label: &str,
    options: &ScriptMinifyOptions,
) -> Result<String, AssetError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, script_source_type()).parse();
    if let Some(err) = ret.errors.first() {
        return Err(AssetError::ScriptParse(label.to_string(), err.to_string()));
    }
    let mut program = ret.program;
    let minifier_options = MinifierOptions {
        mangle: options.mangle.then(MangleOptions::default),
        compress: options.compress.then(CompressOptions::smallest),
    };
    let ret = Minifier::new(minifier_options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str, label: &str) -> Result<String, AssetError> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| AssetError::StyleParse(label.to_string(), e.to_string()))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| AssetError::StylePrint(label.to_string(), e.to_string()))?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options() -> ScriptMinifyOptions {
        ScriptMinifyOptions::default()
    }

    #[test]
    fn test_minify_aggregate_keeps_globals() {
        let mut agg = ScriptAggregate::new();
        agg.insert("a.js", "var a = 1;".into());
        agg.insert("b.js", "var b = 2;".into());

        let fs = ProjectFs::new(".");
        let out = minify_scripts(ScriptInput::Aggregate(&agg), &fs, &options()).unwrap();
        assert!(out.contains("a=1"));
        assert!(out.contains("b=2"));
        assert!(out.find("a=1") < out.find("b=2"));
    }

    #[test]
    fn test_minify_keeps_uncalled_top_level_declarations() {
        let out = minify_js(
            "function greet(name) { return 'hi ' + name; }\nvar counter = 0;\nfunction bump() { counter++; }\n",
            "globals.js",
            &options(),
        )
        .unwrap();
        assert!(out.contains("function greet("));
        assert!(out.contains("function bump("));
        assert!(out.contains("counter"));
    }

    #[test]
    fn test_minify_single_file_reads_path() {
        let dir = TempDir::new().unwrap();
        let fs = ProjectFs::new(dir.path());
        fs.write("main.js", "/* banner */\nvar answer = 42;\n").unwrap();

        let out = minify_scripts(ScriptInput::File("main.js"), &fs, &options()).unwrap();
        assert!(out.contains("answer=42"));
        assert!(!out.contains("banner"));
    }

    #[test]
    fn test_minify_single_file_missing() {
        let dir = TempDir::new().unwrap();
        let fs = ProjectFs::new(dir.path());
        let err = minify_scripts(ScriptInput::File("nope.js"), &fs, &options()).unwrap_err();
        assert!(matches!(err, AssetError::Fs(_)));
    }

    #[test]
    fn test_minify_js_parse_error() {
        let err = minify_js("function (", "bad.js", &options()).unwrap_err();
        assert!(matches!(err, AssetError::ScriptParse(ref label, _) if label == "bad.js"));
    }

    #[test]
    fn test_minify_css() {
        let out = minify_css(".a {\n  color: red;\n}\n/* x */\n", "a.css").unwrap();
        assert_eq!(out, ".a{color:red}");
    }

    #[test]
    fn test_minify_css_empty() {
        assert_eq!(minify_css("", "empty.css").unwrap(), "");
    }
}
