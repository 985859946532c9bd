//! # Ghost Strings
//!
//! Non-playable rows drawn above and below the real strings so scale shapes
//! can be seen continuing past the edges of the neck. They repeat the
//! tuning's cycle of open pitches and are derived from the tuning on every
//! call; nothing here is stored, and overrides never apply to them.
//!
//! ## Cycle
//! The cycle is the tuning's open pitches, with the last string dropped when
//! it repeats the first (standard tuning's two E strings count once).
//!
//! ```rust
//! use fretboard::ghost::{ghost_rows_above, ghost_rows_below};
//! use fretboard::tuning::TuningState;
//!
//! let tuning = TuningState::standard(); // E B G D A E
//! let above: Vec<u8> = ghost_rows_above(&tuning, 3).iter().map(|pc| pc.value()).collect();
//! let below: Vec<u8> = ghost_rows_below(&tuning, 2).iter().map(|pc| pc.value()).collect();
//! assert_eq!(above, vec![7, 2, 9]); // G D A, top row first
//! assert_eq!(below, vec![11, 7]);   // B G
//! ```

use crate::pitch::PitchClass;
use crate::tuning::TuningState;

fn cycle(tuning: &TuningState) -> &[PitchClass] {
    let strings = tuning.as_slice();
    match (strings.first(), strings.last()) {
        (Some(first), Some(last)) if strings.len() > 1 && first == last => &strings[..strings.len() - 1],
        _ => strings,
    }
}

/// Open pitches of `count` rows above string 0, top row first.
pub fn ghost_rows_above(tuning: &TuningState, count: usize) -> Vec<PitchClass> {
    let cycle = cycle(tuning);
    if cycle.is_empty() {
        return Vec::new();
    }
    // Row k counted outward from string 0 walks the cycle backwards.
    let mut rows: Vec<PitchClass> = (0..count)
        .map(|k| cycle[cycle.len() - 1 - k % cycle.len()])
        .collect();
    rows.reverse();
    rows
}

/// Open pitches of `count` rows below the last string, nearest row first.
pub fn ghost_rows_below(tuning: &TuningState, count: usize) -> Vec<PitchClass> {
    let cycle = cycle(tuning);
    let Some(last) = tuning.as_slice().last() else {
        return Vec::new();
    };
    let start = cycle.iter().position(|pc| pc == last).unwrap_or(0);
    (1..=count)
        .map(|i| cycle[(start + i) % cycle.len()])
        .collect()
}
