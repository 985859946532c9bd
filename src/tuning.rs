//! # Tuning State
//!
//! The open pitch of every string, shared by both fretboard views. String 0
//! is the first entry of the sequence; the number of strings is fixed when the
//! state is created and never changes afterwards.
//!
//! ## Presets and Named Tunings
//! Two presets are built in (`standard` and `reversed-standard`). Tunings the
//! user saved live in an external key-value store as JSON
//! `{ "name": [6 integers] }`; [`NamedTunings`] reads that format so the
//! caller can pass the sequence on to [`TuningState::replace_all`]. Nothing
//! in here writes to the store.
//!
//! ## Example
//! ```rust
//! use fretboard::tuning::{Direction, TuningState};
//!
//! let mut tuning = TuningState::standard();
//! assert_eq!(tuning.get(0).unwrap().value(), 4);
//! tuning.bump(0, Direction::Down)?;
//! assert_eq!(tuning.get(0).unwrap().value(), 3);
//! # Ok::<(), fretboard::FretboardError>(())
//! ```

use crate::error::FretboardError;
use crate::pitch::{note_name, pitch_class_of, PitchClass};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// E B G D A E, string 0 first
pub const STANDARD_TUNING: [i32; 6] = [4, 11, 7, 2, 9, 4];

/// E A D G B E, string 0 first
pub const REVERSED_STANDARD_TUNING: [i32; 6] = [4, 9, 2, 7, 11, 4];

pub const PRESETS: [(&str, &[i32]); 2] = [
    ("standard", &STANDARD_TUNING),
    ("reversed-standard", &REVERSED_STANDARD_TUNING),
];

/// One semitone step, or one position in an ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn delta(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// Look up a built-in preset by name
pub fn preset(name: &str) -> Option<&'static [i32]> {
    let name = name.trim();
    PRESETS
        .iter()
        .find(|(preset_name, _)| preset_name.eq_ignore_ascii_case(name))
        .map(|(_, values)| *values)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuningState {
    strings: Vec<PitchClass>,
}

impl TuningState {
    /// Fix the string count to `initial.len()`; every value is folded to a pitch class.
    pub fn new(initial: &[i32]) -> Self {
        Self {
            strings: initial.iter().map(|&v| pitch_class_of(v)).collect(),
        }
    }

    pub fn standard() -> Self {
        Self::new(&STANDARD_TUNING)
    }

    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    pub fn get(&self, string: usize) -> Option<PitchClass> {
        self.strings.get(string).copied()
    }

    pub fn as_slice(&self) -> &[PitchClass] {
        &self.strings
    }

    /// Move one string up or down a semitone, wrapping B↔C. Returns the new open pitch.
    pub fn bump(&mut self, string: usize, direction: Direction) -> Result<PitchClass, FretboardError> {
        let len = self.strings.len();
        let slot = self
            .strings
            .get_mut(string)
            .ok_or(FretboardError::StringIndexOutOfRange { index: string, len })?;
        *slot = pitch_class_of(slot.value() as i32 + direction.delta());
        Ok(*slot)
    }

    /// Replace every string at once. The length must match the fixed string count.
    pub fn replace_all(&mut self, values: &[i32]) -> Result<(), FretboardError> {
        if values.len() != self.strings.len() {
            return Err(FretboardError::InvalidTuning {
                expected: self.strings.len(),
                actual: values.len(),
            });
        }
        self.strings = values.iter().map(|&v| pitch_class_of(v)).collect();
        Ok(())
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.strings.iter().map(|&pc| note_name(pc)).collect()
    }
}

impl Default for TuningState {
    fn default() -> Self {
        Self::standard()
    }
}

/// Saved tunings as the external store hands them over
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct NamedTunings {
    tunings: BTreeMap<String, Vec<i32>>,
}

impl NamedTunings {
    /// Parse the store's JSON object of `name -> [integers]`.
    ///
    /// # Example
    /// ```
    /// use fretboard::tuning::NamedTunings;
    ///
    /// let store = NamedTunings::from_json(r#"{"Drop D": [4, 11, 7, 2, 9, 2]}"#)?;
    /// assert_eq!(store.get("Drop D"), Some(&[4, 11, 7, 2, 9, 2][..]));
    /// # Ok::<(), fretboard::FretboardError>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self, FretboardError> {
        serde_json::from_str(json).map_err(|e| FretboardError::ConfigError(e.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&[i32]> {
        self.tunings.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tunings.keys().map(String::as_str)
    }
}

/// Find a tuning by name: saved tunings first, then the built-in presets.
pub fn lookup_tuning(name: &str, saved: Option<&NamedTunings>) -> Result<Vec<i32>, FretboardError> {
    saved
        .and_then(|store| store.get(name))
        .or_else(|| preset(name))
        .map(<[i32]>::to_vec)
        .ok_or_else(|| FretboardError::UnknownTuning(name.to_string()))
}
