//! Region config and per-region collection state.

use serde::Deserialize;

use crate::asset::{
    ScriptAggregate, ScriptInput, StyleAggregate, minify_css, minify_scripts, rebase_urls,
    strip_script,
};
use crate::config::ScriptMinifyOptions;
use crate::debug;
use crate::utils::fs::ProjectFs;

use super::MarkerError;
use super::manifest::AssetRef;

/// The only action a region accepts.
pub const PACK_ACTION: &str = "PACK";

/// Indentation of generated reference lines.
const REFERENCE_INDENT: &str = "     ";

/// `{ action, dest }` carried by a START marker line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegionConfig {
    /// Uppercased on parse.
    pub action: String,
    /// Bundle path as referenced from the host document.
    pub dest: String,
}

impl RegionConfig {
    /// Parse the JSON5 object between the first `{` and its matching `}`.
    ///
    /// Single and double quoted strings are both accepted.
    pub fn from_marker_line(line: &str) -> Result<Self, MarkerError> {
        let fragment = object_fragment(line)
            .ok_or_else(|| MarkerError::MissingRegionConfig(line.trim().to_string()))?;
        let mut config: Self = json5::from_str(fragment)
            .map_err(|e| MarkerError::RegionConfig(fragment.to_string(), e))?;
        config.action = config.action.to_uppercase();
        Ok(config)
    }

    /// Fail unless the region packs.
    pub fn ensure_pack(&self) -> Result<(), MarkerError> {
        if self.action == PACK_ACTION {
            Ok(())
        } else {
            Err(MarkerError::ActionNotDefined(self.action.clone()))
        }
    }

    /// `dest` with its extension removed (first occurrence of `.ext`).
    pub fn dest_base(&self) -> String {
        match self.dest.rsplit_once('.') {
            Some((_, ext)) => self.dest.replacen(&format!(".{ext}"), "", 1),
            None => self.dest.clone(),
        }
    }
}

/// Slice from the first `{` to its matching `}`, skipping braces in strings.
fn object_fragment(line: &str) -> Option<&str> {
    let start = line.find('{')?;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in line[start..].char_indices() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&line[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Settings shared by every region of one document.
#[derive(Debug, Clone, Copy)]
pub struct RegionContext<'a> {
    pub fs: &'a ProjectFs,
    /// Prefix for bundle output paths, concatenated as a string.
    pub target_directory: &'a str,
    pub uglify: &'a ScriptMinifyOptions,
    pub cssmin: bool,
    pub line_break: &'a str,
}

/// Collection state of one open region.
///
/// Created on START and consumed on STOP, so nothing carries over into the
/// next region.
#[derive(Debug)]
pub struct RegionSession {
    config: RegionConfig,
    scripts: ScriptAggregate,
    styles: StyleAggregate,
}

impl RegionSession {
    pub fn open(config: RegionConfig) -> Self {
        Self {
            config,
            scripts: ScriptAggregate::new(),
            styles: StyleAggregate::new(),
        }
    }

    pub fn config(&self) -> &RegionConfig {
        &self.config
    }

    /// Read and transform one referenced asset into the matching aggregate.
    pub fn collect(&mut self, reference: &AssetRef, fs: &ProjectFs) -> Result<(), MarkerError> {
        match reference {
            AssetRef::Script(path) => {
                debug!("pack"; "consuming {}...", path);
                let source = strip_script(&fs.read(path)?, path)?;
                self.scripts.insert(path.as_str(), source);
            }
            AssetRef::Style(path) => {
                debug!("pack"; "consuming {}...", path);
                let target = format!("{}.css", self.config.dest);
                self.styles.append(&rebase_urls(&fs.read(path)?, path, &target));
            }
        }
        Ok(())
    }

    /// Write the region's bundles and return the markup replacing the region.
    ///
    /// An empty region writes nothing and returns an empty string.
    pub fn finish(self, ctx: &RegionContext<'_>) -> Result<String, MarkerError> {
        self.config.ensure_pack()?;

        let mut markup = String::new();
        let dest = &self.config.dest;

        if !self.scripts.is_empty() {
            debug!("pack"; "consuming javascript: {}", self.scripts.paths().collect::<Vec<_>>().join(", "));
            markup.push_str(&format!("{REFERENCE_INDENT}<script src=\"{dest}\"></script>"));
            markup.push_str(ctx.line_break);

            let code = minify_scripts(ScriptInput::Aggregate(&self.scripts), ctx.fs, ctx.uglify)?;
            ctx.fs.write(&format!("{}{dest}", ctx.target_directory), &code)?;
        }

        if !self.styles.is_empty() {
            debug!("pack"; "consuming css...");
            let href = format!("{}.css", self.config.dest_base());
            markup.push_str(&format!(
                "{REFERENCE_INDENT}<link href=\"{href}\" rel=\"stylesheet\" />"
            ));

            let css = if ctx.cssmin {
                minify_css(self.styles.as_str(), &href)?
            } else {
                self.styles.as_str().to_string()
            };
            ctx.fs.write(&format!("{}{href}", ctx.target_directory), &css)?;
        }

        Ok(markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(action: &str, dest: &str) -> RegionConfig {
        RegionConfig {
            action: action.to_string(),
            dest: dest.to_string(),
        }
    }

    fn context<'a>(fs: &'a ProjectFs, uglify: &'a ScriptMinifyOptions) -> RegionContext<'a> {
        RegionContext {
            fs,
            target_directory: "dist/",
            uglify,
            cssmin: true,
            line_break: "\r\n",
        }
    }

    #[test]
    fn test_parse_single_quoted_config() {
        let config =
            RegionConfig::from_marker_line("<!-- PAKMAN:START {'action':'pack','dest':'js/app.js'} -->")
                .unwrap();
        assert_eq!(config, self::config("PACK", "js/app.js"));
    }

    #[test]
    fn test_parse_double_quoted_and_unquoted_keys() {
        let config =
            RegionConfig::from_marker_line(r#"<!-- pakman:start {action: "Pack", dest: "app.js"} -->"#)
                .unwrap();
        assert_eq!(config, self::config("PACK", "app.js"));
    }

    #[test]
    fn test_parse_braces_inside_strings() {
        let config =
            RegionConfig::from_marker_line("<!-- PAKMAN:START {action:'pack',dest:'a}b.js'} -->")
                .unwrap();
        assert_eq!(config.dest, "a}b.js");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            RegionConfig::from_marker_line("<!-- PAKMAN:START {action:'pack' -->"),
            Err(MarkerError::MissingRegionConfig(_))
        ));
        assert!(matches!(
            RegionConfig::from_marker_line("<!-- PAKMAN:START {dest:'a.js'} -->"),
            Err(MarkerError::RegionConfig(..))
        ));
        assert!(matches!(
            RegionConfig::from_marker_line("<!-- PAKMAN:START {action:} -->"),
            Err(MarkerError::RegionConfig(..))
        ));
    }

    #[test]
    fn test_dest_base() {
        assert_eq!(config("PACK", "js/app.js").dest_base(), "js/app");
        assert_eq!(config("PACK", "bundle").dest_base(), "bundle");
    }

    #[test]
    fn test_ensure_pack() {
        assert!(config("PACK", "a.js").ensure_pack().is_ok());
        assert!(matches!(
            config("COPY", "a.js").ensure_pack(),
            Err(MarkerError::ActionNotDefined(ref a)) if a == "COPY"
        ));
    }

    #[test]
    fn test_empty_region_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let fs = ProjectFs::new(dir.path());
        let uglify = ScriptMinifyOptions::default();

        let session = RegionSession::open(config("PACK", "js/app.js"));
        let markup = session.finish(&context(&fs, &uglify)).unwrap();
        assert!(markup.is_empty());
        assert!(!fs.resolve("dist").exists());
    }

    #[test]
    fn test_finish_scripts_and_styles() {
        let dir = TempDir::new().unwrap();
        let fs = ProjectFs::new(dir.path());
        let uglify = ScriptMinifyOptions::default();
        fs.write("js/a.js", "/* a */ var a = 1;").unwrap();
        fs.write("css/a.css", ".a { background: url(../img/a.png); }").unwrap();

        let mut session = RegionSession::open(config("PACK", "js/app.js"));
        session.collect(&AssetRef::Script("js/a.js".into()), &fs).unwrap();
        session.collect(&AssetRef::Style("css/a.css".into()), &fs).unwrap();

        let markup = session.finish(&context(&fs, &uglify)).unwrap();
        assert_eq!(
            markup,
            "     <script src=\"js/app.js\"></script>\r\n     <link href=\"js/app.css\" rel=\"stylesheet\" />"
        );

        let js = fs.read("dist/js/app.js").unwrap();
        assert!(js.contains("a=1"));
        assert!(!js.contains("/* a */"));

        let css = fs.read("dist/js/app.css").unwrap();
        assert!(css.contains("../img/a.png"));
    }

    #[test]
    fn test_finish_rejects_non_pack_action() {
        let dir = TempDir::new().unwrap();
        let fs = ProjectFs::new(dir.path());
        let uglify = ScriptMinifyOptions::default();

        let session = RegionSession::open(config("MERGE", "a.js"));
        assert!(matches!(
            session.finish(&context(&fs, &uglify)),
            Err(MarkerError::ActionNotDefined(_))
        ));
    }
}
