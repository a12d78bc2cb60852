//! In-progress bundle contents.

/// Script sources keyed by path, in insertion order.
///
/// Keys are unique: inserting a path twice replaces the earlier text but keeps
/// its original position, so the bundle order is that of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptAggregate {
    entries: Vec<(String, String)>,
}

impl ScriptAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, source: String) {
        let path = path.into();
        match self.entries.iter_mut().find(|(key, _)| *key == path) {
            Some((_, existing)) => *existing = source,
            None => self.entries.push((path, source)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(path, _)| path.as_str())
    }

    /// Join all sources into one program.
    ///
    /// Each source is terminated with `;` so a file missing its trailing
    /// semicolon cannot merge with the next one.
    pub fn concat(&self) -> String {
        let capacity = self.entries.iter().map(|(_, s)| s.len() + 2).sum();
        let mut out = String::with_capacity(capacity);
        for (_, source) in &self.entries {
            out.push_str(source);
            out.push_str(";\n");
        }
        out
    }
}

/// Stylesheet text accumulated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleAggregate {
    buffer: String,
}

impl StyleAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, css: &str) {
        self.buffer.push_str(css);
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}
