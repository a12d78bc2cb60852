//! Bundle kind detection.

/// Kind of bundle a destination path produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleKind {
    /// `.js` destination.
    Script,
    /// `.css` destination.
    Style,
}

impl BundleKind {
    /// Detect the bundle kind from a destination's extension (case-insensitive).
    ///
    /// The extension is the text after the last `.`; a destination without any
    /// `.` is treated as one big extension. Returns the rejected extension on
    /// failure so it can be reported.
    pub fn from_dest(dest: &str) -> Result<Self, String> {
        let ext = dest.rsplit('.').next().unwrap_or(dest);
        match ext.to_ascii_lowercase().as_str() {
            "js" => Ok(Self::Script),
            "css" => Ok(Self::Style),
            _ => Err(ext.to_string()),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Style => "stylesheet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dest() {
        assert_eq!(BundleKind::from_dest("dist/app.js"), Ok(BundleKind::Script));
        assert_eq!(BundleKind::from_dest("dist/APP.CSS"), Ok(BundleKind::Style));
        assert_eq!(BundleKind::from_dest("dist/app.min.js"), Ok(BundleKind::Script));
        assert_eq!(BundleKind::Style.as_str(), "stylesheet");
    }

    #[test]
    fn test_from_dest_rejects_other_types() {
        assert_eq!(BundleKind::from_dest("dist/app.ts"), Err("ts".to_string()));
        assert_eq!(BundleKind::from_dest("bundle"), Err("bundle".to_string()));
    }
}
