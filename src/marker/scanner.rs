//! Line-oriented marker state machine.
//!
//! ```text
//!            PAKMAN:START {..}               PAKMAN:STOP
//! Scanning ───────────────────► Collecting ─────────────► Scanning
//!   │  other line: Copy            │  other line: Manifest
//! ```
//!
//! The scanner does no I/O: it classifies each line and parses the region
//! config carried by START lines. Acting on the transitions is the caller's
//! job.

use super::MarkerError;
use super::region::RegionConfig;

pub const START_MARKER: &str = "PAKMAN:START";
pub const STOP_MARKER: &str = "PAKMAN:STOP";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanState {
    /// Outside any region.
    #[default]
    Scanning,
    /// Between a START and its STOP marker.
    Collecting,
}

/// What a single line means for the output document.
#[derive(Debug, PartialEq, Eq)]
pub enum Transition<'a> {
    /// Line outside any region, copied verbatim.
    Copy(&'a str),
    /// START marker line; a region opens with this config.
    Open(RegionConfig),
    /// Markup inside a region, never copied.
    Manifest(&'a str),
    /// STOP marker line; the open region is finalized.
    Close,
}

/// Pure transition function: `(state, line) -> (state, transition)`.
pub fn transition(state: ScanState, line: &str) -> Result<(ScanState, Transition<'_>), MarkerError> {
    match state {
        ScanState::Scanning if has_marker(line, START_MARKER) => Ok((
            ScanState::Collecting,
            Transition::Open(RegionConfig::from_marker_line(line)?),
        )),
        ScanState::Scanning => Ok((ScanState::Scanning, Transition::Copy(line))),
        ScanState::Collecting if has_marker(line, STOP_MARKER) => {
            Ok((ScanState::Scanning, Transition::Close))
        }
        ScanState::Collecting => Ok((ScanState::Collecting, Transition::Manifest(line))),
    }
}

/// Stateful wrapper around [`transition`].
#[derive(Debug, Default)]
pub struct Scanner {
    state: ScanState,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn step<'a>(&mut self, line: &'a str) -> Result<Transition<'a>, MarkerError> {
        let (state, transition) = transition(self.state, line)?;
        self.state = state;
        Ok(transition)
    }
}

/// Case-insensitive marker search.
fn has_marker(line: &str, marker: &str) -> bool {
    line.to_ascii_uppercase().contains(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(action: &str, dest: &str) -> RegionConfig {
        RegionConfig {
            action: action.to_string(),
            dest: dest.to_string(),
        }
    }

    #[test]
    fn test_plain_lines_are_copied() {
        let mut scanner = Scanner::new();
        assert_eq!(scanner.step("<html>").unwrap(), Transition::Copy("<html>"));
        assert_eq!(scanner.step("").unwrap(), Transition::Copy(""));
        assert_eq!(scanner.state(), ScanState::Scanning);
    }

    #[test]
    fn test_full_region_cycle() {
        let mut scanner = Scanner::new();

        let open = scanner
            .step("<!-- pakman:start {'action': 'pack', 'dest': 'js/app.js'} -->")
            .unwrap();
        assert_eq!(open, Transition::Open(region("PACK", "js/app.js")));
        assert_eq!(scanner.state(), ScanState::Collecting);

        let line = r#"<script src="js/a.js"></script>"#;
        assert_eq!(scanner.step(line).unwrap(), Transition::Manifest(line));

        assert_eq!(scanner.step("<!-- PAKMAN:STOP -->").unwrap(), Transition::Close);
        assert_eq!(scanner.state(), ScanState::Scanning);
    }

    #[test]
    fn test_start_inside_region_is_manifest() {
        let (state, t) = transition(ScanState::Collecting, "<!-- PAKMAN:START {} -->").unwrap();
        assert_eq!(state, ScanState::Collecting);
        assert!(matches!(t, Transition::Manifest(_)));
    }

    #[test]
    fn test_stop_outside_region_is_copied() {
        let (state, t) = transition(ScanState::Scanning, "<!-- PAKMAN:STOP -->").unwrap();
        assert_eq!(state, ScanState::Scanning);
        assert_eq!(t, Transition::Copy("<!-- PAKMAN:STOP -->"));
    }

    #[test]
    fn test_start_without_config_fails() {
        let err = transition(ScanState::Scanning, "<!-- PAKMAN:START -->").unwrap_err();
        assert!(matches!(err, MarkerError::MissingRegionConfig(_)));
    }
}
