//! # Pitch Math
//!
//! Semitone arithmetic and the fixed lookup tables for note names and scale
//! degrees. Nothing in here holds state.
//!
//! ## Pitch Classes
//! A pitch class is a semitone distance from C in `0..=11`. Any integer folds
//! onto one with [`pitch_class_of`], including negatives, so fret arithmetic
//! never needs bounds checks:
//!
//! ```rust
//! use fretboard::pitch::{pitch_class_of, note_name, degree_label};
//!
//! assert_eq!(pitch_class_of(-1).value(), 11);
//! assert_eq!(note_name(pitch_class_of(4 + 12)), "E");
//! assert_eq!(degree_label(pitch_class_of(10)), "b7");
//! ```
//!
//! ## Note Names
//! Each pitch class has exactly one canonical label; enharmonic pairs share a
//! combined label such as `"C#/Db"`. [`parse_note_name`] inverts the table and
//! also accepts a single spelling (`"C#"`, `"Db"`) in any letter case.

use crate::error::FretboardError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical note labels indexed by pitch class
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#/Db", "D", "D#/Eb", "E", "F", "F#/Gb", "G", "G#/Ab", "A", "A#/Bb", "B",
];

/// Scale-degree shorthand indexed by semitone offset from a root
pub const DEGREE_LABELS: [&str; 12] = [
    "1", "b2", "2", "b3", "3", "4", "b5", "5", "b6", "6", "b7", "7",
];

/// A note irrespective of octave, always in `0..=11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "u8")]
pub struct PitchClass(u8);

impl PitchClass {
    /// Returns `None` for values outside `0..=11`; use [`pitch_class_of`] to wrap instead.
    pub const fn new(value: u8) -> Option<Self> {
        if value < 12 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Semitone offset of `self` above `root`.
    pub fn offset_from(self, root: PitchClass) -> PitchClass {
        pitch_class_of(self.0 as i32 - root.0 as i32)
    }
}

impl From<i32> for PitchClass {
    fn from(value: i32) -> Self {
        pitch_class_of(value)
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> Self {
        pc.0
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(note_name(*self))
    }
}

/// Fold any integer onto a pitch class: `((value mod 12) + 12) mod 12`.
pub fn pitch_class_of(value: i32) -> PitchClass {
    PitchClass(value.rem_euclid(12) as u8)
}

pub fn note_name(pc: PitchClass) -> &'static str {
    NOTE_NAMES[pc.0 as usize]
}

/// Scale-degree label for an offset relative to a root (0 → "1", 11 → "7").
pub fn degree_label(offset: PitchClass) -> &'static str {
    DEGREE_LABELS[offset.0 as usize]
}

/// Parse a note label back into its pitch class.
///
/// Accepts the canonical combined labels (`"A#/Bb"`) and single spellings built
/// from a letter followed by any number of `#` or `b` accidentals. Matching is
/// case-insensitive, so `"a#/bb"` and `"BB"` (B flat) both parse.
///
/// # Example
/// ```
/// use fretboard::pitch::parse_note_name;
///
/// assert_eq!(parse_note_name("F#/Gb").unwrap().value(), 6);
/// assert_eq!(parse_note_name("gb").unwrap().value(), 6);
/// assert_eq!(parse_note_name("Cb").unwrap().value(), 11);
/// assert!(parse_note_name("H").is_err());
/// ```
pub fn parse_note_name(label: &str) -> Result<PitchClass, FretboardError> {
    let trimmed = label.trim();
    let invalid = || FretboardError::InvalidNoteName(label.to_string());

    if let Some(index) = NOTE_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(trimmed))
    {
        return Ok(PitchClass(index as u8));
    }

    let mut chars = trimmed.chars();
    let letter = chars.next().ok_or_else(invalid)?;
    let base: i32 = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return Err(invalid()),
    };

    let mut accidental = 0;
    for c in chars {
        match c {
            '#' => accidental += 1,
            'b' | 'B' => accidental -= 1,
            _ => return Err(invalid()),
        }
    }

    Ok(pitch_class_of(base + accidental))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_wraps_in_both_directions() {
        for p in -30..30 {
            assert_eq!(pitch_class_of(p), pitch_class_of(p + 12));
            assert_eq!(pitch_class_of(p), pitch_class_of(p - 12));
            assert!(pitch_class_of(p).value() < 12);
        }
        assert_eq!(pitch_class_of(-13).value(), 11);
        assert_eq!(pitch_class_of(25).value(), 1);
    }

    #[test]
    fn test_note_names_are_invertible() {
        for v in 0..12u8 {
            let pc = PitchClass::new(v).unwrap();
            assert_eq!(parse_note_name(note_name(pc)).unwrap(), pc);
        }
    }

    #[test]
    fn test_single_spellings() {
        assert_eq!(parse_note_name("C#").unwrap().value(), 1);
        assert_eq!(parse_note_name("Db").unwrap().value(), 1);
        assert_eq!(parse_note_name(" e ").unwrap().value(), 4);
        assert_eq!(parse_note_name("BB").unwrap().value(), 10);
        assert_eq!(parse_note_name("E#").unwrap().value(), 5);
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(
            parse_note_name(""),
            Err(FretboardError::InvalidNoteName(String::new()))
        );
        assert!(parse_note_name("X").is_err());
        assert!(parse_note_name("C%").is_err());
    }

    #[test]
    fn test_degree_labels() {
        let e = pitch_class_of(4);
        assert_eq!(degree_label(pitch_class_of(7).offset_from(e)), "b3");
        assert_eq!(degree_label(pitch_class_of(2).offset_from(e)), "b7");
        assert_eq!(degree_label(e.offset_from(e)), "1");
        assert_eq!(degree_label(pitch_class_of(11)), "7");
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(PitchClass::new(12).is_none());
        assert_eq!(PitchClass::new(0), Some(PitchClass::default()));
    }
}
