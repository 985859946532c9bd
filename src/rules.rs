//! # Highlight Rules
//!
//! An ordered list of highlight rules. Each rule binds a chunk to a root
//! pitch class, a color and a display mode, and targets one of the two
//! fretboard views.
//!
//! ## Precedence
//! A rule's priority is its position: later rules paint over earlier ones.
//! When several rules on the same view match a pitch, the **last** one in
//! list order wins outright. Nothing is merged or blended.
//!
//! ```rust
//! use fretboard::chunk::ChunkCatalog;
//! use fretboard::pitch::pitch_class_of;
//! use fretboard::rules::{Color, DisplayMode, FretboardId, HighlightRuleSet, RuleSpec};
//!
//! let catalog = ChunkCatalog::builtin();
//! let mut rules = HighlightRuleSet::new();
//! let e_major = RuleSpec::new(FretboardId::Main, pitch_class_of(4), 1, Color::new("red"), DisplayMode::NoteName);
//! let e_single = RuleSpec::new(FretboardId::Main, pitch_class_of(4), 0, Color::new("blue"), DisplayMode::None);
//! rules.append(e_major.build(&catalog)?);
//! rules.append(e_single.build(&catalog)?);
//!
//! // Both rules match E; the second one was added later and wins.
//! let winner = rules.resolve(FretboardId::Main, 4).unwrap();
//! assert_eq!(winner.index, 1);
//! assert_eq!(winner.rule.color.as_str(), "blue");
//! # Ok::<(), fretboard::FretboardError>(())
//! ```
//!
//! ## Related Modules
//! - `chunk` - The pitch-class sets rules refer to
//! - `resolver` - Combines rule matches with manual overrides

use crate::chunk::{Chunk, ChunkCatalog};
use crate::error::FretboardError;
use crate::pitch::{pitch_class_of, PitchClass};
use crate::tuning::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two fretboard views, serialized as 1 or 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FretboardId {
    Main,
    Secondary,
}

impl FretboardId {
    pub const ALL: [FretboardId; 2] = [FretboardId::Main, FretboardId::Secondary];
}

impl TryFrom<u8> for FretboardId {
    type Error = FretboardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FretboardId::Main),
            2 => Ok(FretboardId::Secondary),
            other => Err(FretboardError::InvalidFretboard(other)),
        }
    }
}

impl From<FretboardId> for u8 {
    fn from(id: FretboardId) -> Self {
        match id {
            FretboardId::Main => 1,
            FretboardId::Secondary => 2,
        }
    }
}

impl fmt::Display for FretboardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fretboard {}", u8::from(*self))
    }
}

/// What text, if any, is drawn inside a highlighted fret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayMode {
    #[default]
    None,
    ScaleDegree,
    NoteName,
}

/// Highlight color name. Not validated; the renderer decides what it means.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Colors offered by the highlight dropdowns
    pub const PALETTE: [&'static str; 6] = ["red", "blue", "green", "yellow", "purple", "orange"];

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(Self::PALETTE[0])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRule {
    pub fretboard: FretboardId,
    pub root: PitchClass,
    pub chunk: Chunk,
    pub color: Color,
    pub display_mode: DisplayMode,
}

impl HighlightRule {
    /// Offset of `absolute` above this rule's root, if the chunk contains it.
    pub fn matches(&self, absolute: i32) -> Option<PitchClass> {
        let offset = pitch_class_of(absolute - self.root.value() as i32);
        self.chunk.contains(offset).then_some(offset)
    }
}

/// A rule as the UI describes it: the chunk is named by id and checked
/// against the catalog when the rule is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    pub fretboard: FretboardId,
    pub root: PitchClass,
    pub chunk_id: u32,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub display_mode: DisplayMode,
}

impl RuleSpec {
    pub fn new(
        fretboard: FretboardId,
        root: PitchClass,
        chunk_id: u32,
        color: Color,
        display_mode: DisplayMode,
    ) -> Self {
        Self {
            fretboard,
            root,
            chunk_id,
            color,
            display_mode,
        }
    }

    pub fn build(&self, catalog: &ChunkCatalog) -> Result<HighlightRule, FretboardError> {
        let chunk = catalog
            .chunk_by_id(self.chunk_id)
            .ok_or(FretboardError::UnknownChunk(self.chunk_id))?;
        Ok(HighlightRule {
            fretboard: self.fretboard,
            root: self.root,
            chunk: chunk.clone(),
            color: self.color.clone(),
            display_mode: self.display_mode,
        })
    }
}

/// Partial edit of a rule; `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleUpdate {
    pub fretboard: Option<FretboardId>,
    pub root: Option<PitchClass>,
    pub chunk_id: Option<u32>,
    pub color: Option<Color>,
    pub display_mode: Option<DisplayMode>,
}

impl RuleUpdate {
    /// Build the replacement rule; `rule` itself is never modified.
    pub fn apply(&self, rule: &HighlightRule, catalog: &ChunkCatalog) -> Result<HighlightRule, FretboardError> {
        let chunk = match self.chunk_id {
            Some(id) => catalog
                .chunk_by_id(id)
                .ok_or(FretboardError::UnknownChunk(id))?
                .clone(),
            None => rule.chunk.clone(),
        };
        Ok(HighlightRule {
            fretboard: self.fretboard.unwrap_or(rule.fretboard),
            root: self.root.unwrap_or(rule.root),
            chunk,
            color: self.color.clone().unwrap_or_else(|| rule.color.clone()),
            display_mode: self.display_mode.unwrap_or(rule.display_mode),
        })
    }
}

/// The rule that won for a pitch, with its position and the matched offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleMatch<'a> {
    pub index: usize,
    pub rule: &'a HighlightRule,
    pub offset: PitchClass,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightRuleSet {
    rules: Vec<HighlightRule>,
}

impl HighlightRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HighlightRule> {
        self.rules.get(index)
    }

    pub fn as_slice(&self) -> &[HighlightRule] {
        &self.rules
    }

    /// Add a rule at the highest priority. Returns its index.
    pub fn append(&mut self, rule: HighlightRule) -> usize {
        self.rules.push(rule);
        self.rules.len() - 1
    }

    pub fn remove_at(&mut self, index: usize) -> Result<HighlightRule, FretboardError> {
        self.check_index(index)?;
        Ok(self.rules.remove(index))
    }

    /// Replace a rule as a whole, returning the old one.
    pub fn replace(&mut self, index: usize, rule: HighlightRule) -> Result<HighlightRule, FretboardError> {
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.rules[index], rule))
    }

    /// Swap with the previous rule. Returns `false` when already first.
    pub fn move_up(&mut self, index: usize) -> Result<bool, FretboardError> {
        self.check_index(index)?;
        if index == 0 {
            return Ok(false);
        }
        self.rules.swap(index - 1, index);
        Ok(true)
    }

    /// Swap with the next rule. Returns `false` when already last.
    pub fn move_down(&mut self, index: usize) -> Result<bool, FretboardError> {
        self.check_index(index)?;
        if index + 1 == self.rules.len() {
            return Ok(false);
        }
        self.rules.swap(index, index + 1);
        Ok(true)
    }

    pub fn move_rule(&mut self, index: usize, direction: Direction) -> Result<bool, FretboardError> {
        match direction {
            Direction::Up => self.move_up(index),
            Direction::Down => self.move_down(index),
        }
    }

    /// Rules targeting one view, in priority order, with their positions in the full list
    pub fn rules_for(&self, fretboard: FretboardId) -> impl Iterator<Item = (usize, &HighlightRule)> {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.fretboard == fretboard)
    }

    /// Winning rule for an absolute pitch on one view: the last match in list order.
    pub fn resolve(&self, fretboard: FretboardId, absolute: i32) -> Option<RuleMatch<'_>> {
        // Scanning from the back makes the first hit the last match.
        self.rules
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, rule)| rule.fretboard == fretboard)
            .find_map(|(index, rule)| {
                rule.matches(absolute)
                    .map(|offset| RuleMatch { index, rule, offset })
            })
    }

    fn check_index(&self, index: usize) -> Result<(), FretboardError> {
        if index < self.rules.len() {
            Ok(())
        } else {
            Err(FretboardError::RuleIndexOutOfRange {
                index,
                len: self.rules.len(),
            })
        }
    }
}
