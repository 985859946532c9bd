//! # Session Files
//!
//! A session is a YAML document describing a complete engine state: tuning,
//! rules, overrides and display settings. Loading one replays it through the
//! engine's commands, so the same validation applies as for live edits.
//!
//! ## Format
//! ```yaml
//! tuning: standard          # preset or saved name, or a list of integers
//! frets: 18
//! fretboard2: false
//! ghost_rows: { above: 0, below: 0 }
//! rules:
//!   - fretboard: 1
//!     root: E               # note name, any accepted spelling
//!     chunk: Maj Triad      # chunk name or numeric id
//!     color: red
//!     display: noteName     # none | scaleDegree | noteName
//! overrides:
//!   - { fretboard: 1, string: 0, fret: 0, kind: suppress }
//!   - { fretboard: 1, string: 2, fret: 5, kind: highlight, color: blue, display: scaleDegree, bound_rule: 0 }
//! ```
//!
//! Every key is optional. Overrides are restored as written, not toggled, and
//! are not checked against the rules.
//!
//! ## Example
//! ```rust
//! use fretboard::session::SessionConfig;
//! use fretboard::FretboardId;
//!
//! let session = SessionConfig::from_yaml("rules:\n  - { root: A, chunk: Min Pentatonic }\n")?;
//! let engine = session.build_engine(None)?;
//! assert!(engine.resolve_highlight(FretboardId::Main, 4, 0).is_some()); // open A
//! # Ok::<(), fretboard::FretboardError>(())
//! ```

use crate::chunk::ChunkCatalog;
use crate::engine::{FretboardEngine, DEFAULT_FRETS, MAX_FRETS};
use crate::error::FretboardError;
use crate::overrides::{Coordinate, ManualHighlight, OverrideEntry};
use crate::pitch::parse_note_name;
use crate::rules::{Color, DisplayMode, FretboardId, RuleSpec};
use crate::tuning::{lookup_tuning, NamedTunings};
use serde::Deserialize;

fn default_frets() -> u32 {
    DEFAULT_FRETS
}

fn default_fretboard() -> FretboardId {
    FretboardId::Main
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TuningConfig {
    Values(Vec<i32>),
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChunkRef {
    Id(u32),
    Name(String),
}

impl ChunkRef {
    fn resolve(&self, catalog: &ChunkCatalog) -> Result<u32, FretboardError> {
        match self {
            ChunkRef::Id(id) => Ok(*id),
            ChunkRef::Name(name) => catalog
                .chunk_by_name(name)
                .map(|chunk| chunk.id())
                .ok_or_else(|| FretboardError::UnknownChunkName(name.clone())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct GhostRows {
    #[serde(default)]
    pub above: usize,
    #[serde(default)]
    pub below: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleConfig {
    #[serde(default = "default_fretboard")]
    pub fretboard: FretboardId,
    pub root: String,
    pub chunk: ChunkRef,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub display: DisplayMode,
}

impl RuleConfig {
    fn to_spec(&self, catalog: &ChunkCatalog) -> Result<RuleSpec, FretboardError> {
        Ok(RuleSpec::new(
            self.fretboard,
            parse_note_name(&self.root)?,
            self.chunk.resolve(catalog)?,
            self.color.clone(),
            self.display,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideKind {
    Suppress,
    Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OverrideConfig {
    #[serde(default = "default_fretboard")]
    pub fretboard: FretboardId,
    pub string: usize,
    pub fret: u32,
    pub kind: OverrideKind,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub display: DisplayMode,
    #[serde(default)]
    pub bound_rule: Option<usize>,
}

impl OverrideConfig {
    fn entry(&self) -> OverrideEntry {
        match self.kind {
            OverrideKind::Suppress => OverrideEntry::Suppressed,
            OverrideKind::Highlight => OverrideEntry::Manual(ManualHighlight {
                color: self.color.clone(),
                display_mode: self.display,
                bound_rule: self.bound_rule,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub tuning: Option<TuningConfig>,
    #[serde(default = "default_frets")]
    pub frets: u32,
    #[serde(default, rename = "fretboard2")]
    pub fretboard2_active: bool,
    #[serde(default)]
    pub ghost_rows: GhostRows,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    #[serde(default)]
    pub overrides: Vec<OverrideConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tuning: None,
            frets: DEFAULT_FRETS,
            fretboard2_active: false,
            ghost_rows: GhostRows::default(),
            rules: Vec::new(),
            overrides: Vec::new(),
        }
    }
}

impl SessionConfig {
    pub fn from_yaml(source: &str) -> Result<Self, FretboardError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let session: Self = serde_yaml::from_str(source).map_err(|e| FretboardError::ConfigError(e.to_string()))?;
        if session.frets > MAX_FRETS {
            return Err(FretboardError::ConfigError(format!(
                "frets must be at most {}, got {}",
                MAX_FRETS, session.frets
            )));
        }
        Ok(session)
    }

    /// Replay the session into a fresh engine. `saved` supplies named tunings
    /// beyond the built-in presets.
    pub fn build_engine(&self, saved: Option<&NamedTunings>) -> Result<FretboardEngine, FretboardError> {
        let mut engine = FretboardEngine::new();

        match &self.tuning {
            Some(TuningConfig::Values(values)) => engine.set_tuning(values)?,
            Some(TuningConfig::Named(name)) => engine.set_tuning(&lookup_tuning(name, saved)?)?,
            None => {}
        }

        for rule in &self.rules {
            let spec = rule.to_spec(engine.catalog())?;
            engine.add_rule(&spec)?;
        }

        for entry in &self.overrides {
            let coord = Coordinate::new(entry.fretboard, entry.string, entry.fret);
            engine.restore_override(coord, entry.entry())?;
        }

        engine.set_fretboard2_active(self.fretboard2_active);
        log::info!(
            "session loaded: {} rules, {} overrides",
            engine.rules().len(),
            engine.overrides().len()
        );
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::HighlightOrigin;

    const SESSION: &str = r#"
tuning: [4, 11, 7, 2, 9, 2]
frets: 12
fretboard2: true
ghost_rows: { above: 2 }
rules:
  - fretboard: 1
    root: D
    chunk: Maj Triad
    color: red
    display: noteName
  - fretboard: 2
    root: "F#/Gb"
    chunk: 4
    color: green
    display: scaleDegree
overrides:
  - { fretboard: 1, string: 5, fret: 0, kind: suppress }
  - { fretboard: 2, string: 0, fret: 1, kind: highlight, color: blue, display: scaleDegree, bound_rule: 1 }
"#;

    #[test]
    fn test_parse_full_session() {
        let session = SessionConfig::from_yaml(SESSION).unwrap();
        assert_eq!(session.tuning, Some(TuningConfig::Values(vec![4, 11, 7, 2, 9, 2])));
        assert_eq!(session.frets, 12);
        assert!(session.fretboard2_active);
        assert_eq!(session.ghost_rows, GhostRows { above: 2, below: 0 });
        assert_eq!(session.rules[1].chunk, ChunkRef::Id(4));
        assert_eq!(session.overrides[1].bound_rule, Some(1));
    }

    #[test]
    fn test_build_engine_replays_session() {
        let engine = SessionConfig::from_yaml(SESSION).unwrap().build_engine(None).unwrap();
        assert_eq!(engine.current_tuning()[5].value(), 2);
        assert!(engine.is_active(FretboardId::Secondary));

        // Drop-D low string is D, but its open fret is suppressed
        assert!(engine.resolve_highlight(FretboardId::Main, 5, 0).is_none());
        assert_eq!(
            engine.resolve_highlight(FretboardId::Main, 3, 0).unwrap().label.as_deref(),
            Some("D")
        );

        // F on the first string sits a semitone under the bound F# rule root
        let manual = engine.resolve_highlight(FretboardId::Secondary, 0, 1).unwrap();
        assert_eq!(manual.origin, HighlightOrigin::Manual);
        assert_eq!(manual.label.as_deref(), Some("7"));
    }

    #[test]
    fn test_named_tuning_from_store() {
        let store = NamedTunings::from_json(r#"{"Open D": [2, 9, 6, 2, 9, 2]}"#).unwrap();
        let session = SessionConfig::from_yaml("tuning: Open D").unwrap();
        let engine = session.build_engine(Some(&store)).unwrap();
        assert_eq!(engine.current_tuning()[2].value(), 6);

        assert_eq!(
            session.build_engine(None).unwrap_err(),
            FretboardError::UnknownTuning("Open D".to_string())
        );
    }

    #[test]
    fn test_empty_session_is_default() {
        let session = SessionConfig::from_yaml("  \n").unwrap();
        assert_eq!(session, SessionConfig::default());
        let engine = session.build_engine(None).unwrap();
        assert!(engine.rules().is_empty());
        assert!(!engine.is_active(FretboardId::Secondary));
    }

    #[test]
    fn test_session_errors() {
        let unknown_chunk = SessionConfig::from_yaml("rules:\n  - { root: C, chunk: Lydian }\n").unwrap();
        assert_eq!(
            unknown_chunk.build_engine(None).unwrap_err(),
            FretboardError::UnknownChunkName("Lydian".to_string())
        );

        let bad_note = SessionConfig::from_yaml("rules:\n  - { root: H, chunk: 0 }\n").unwrap();
        assert_eq!(
            bad_note.build_engine(None).unwrap_err(),
            FretboardError::InvalidNoteName("H".to_string())
        );

        let bad_length = SessionConfig::from_yaml("tuning: [1, 2, 3]").unwrap();
        assert!(matches!(
            bad_length.build_engine(None),
            Err(FretboardError::InvalidTuning { expected: 6, actual: 3 })
        ));

        assert!(matches!(
            SessionConfig::from_yaml("rules:\n  - { fretboard: 3, root: C, chunk: 0 }\n"),
            Err(FretboardError::ConfigError(_))
        ));

        assert!(matches!(
            SessionConfig::from_yaml("frets: 4000000000"),
            Err(FretboardError::ConfigError(_))
        ));
        assert_eq!(SessionConfig::from_yaml("frets: 36").unwrap().frets, MAX_FRETS);
    }
}
