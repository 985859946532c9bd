//! # Manual Overrides
//!
//! Per-fret exceptions to the rule-computed highlights. Each coordinate
//! (fretboard, string, fret) holds at most one entry:
//!
//! - **Suppressed** - draw nothing, whatever the rules say
//! - **Manual** - draw this highlight instead
//!
//! ## Toggle Lifecycle
//! ```text
//! Unmanaged --toggle, rules match------> Suppressed --toggle--> Unmanaged
//! Unmanaged --toggle, no rule match----> Manual     --toggle--> Unmanaged
//! ```
//! There are no other transitions, so toggling twice always gets back to the
//! unmanaged state.
//!
//! Entries are never re-validated when the tuning or the rules change. A
//! manual highlight bound to a rule index reads that rule live at resolution
//! time; if the index no longer exists the degree label is left blank.

use crate::rules::{Color, DisplayMode, FretboardId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One fret on one string of one view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub fretboard: FretboardId,
    pub string: usize,
    pub fret: u32,
}

impl Coordinate {
    pub fn new(fretboard: FretboardId, string: usize, fret: u32) -> Self {
        Self {
            fretboard,
            string,
            fret,
        }
    }
}

/// A hand-placed highlight. Also the shape of the UI's current selection,
/// which becomes the stored highlight when a toggle places one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualHighlight {
    #[serde(default)]
    pub color: Color,
    #[serde(default, alias = "display")]
    pub display_mode: DisplayMode,
    /// Rule whose root and chunk supply the degree label, read at query time
    #[serde(default, alias = "bound_rule")]
    pub bound_rule: Option<usize>,
}

pub type Selection = ManualHighlight;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum OverrideEntry {
    #[serde(rename = "suppress")]
    Suppressed,
    #[serde(rename = "highlight")]
    Manual(ManualHighlight),
}

/// What a toggle did to the coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Cleared,
    Suppressed,
    Highlighted,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualOverrideStore {
    entries: HashMap<Coordinate, OverrideEntry>,
}

impl ManualOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: Coordinate) -> Option<&OverrideEntry> {
        self.entries.get(&coord)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flip a coordinate between unmanaged and managed.
    ///
    /// An existing entry is removed. Otherwise the coordinate is suppressed
    /// when `rules_match` is true, or gets `selection` as a manual highlight
    /// when it is false.
    ///
    /// # Example
    /// ```
    /// use fretboard::overrides::{Coordinate, ManualOverrideStore, OverrideEntry, Selection, ToggleOutcome};
    /// use fretboard::rules::FretboardId;
    ///
    /// let mut store = ManualOverrideStore::new();
    /// let at = Coordinate::new(FretboardId::Main, 0, 3);
    ///
    /// assert_eq!(store.toggle(at, true, &Selection::default()), ToggleOutcome::Suppressed);
    /// assert_eq!(store.get(at), Some(&OverrideEntry::Suppressed));
    /// assert_eq!(store.toggle(at, true, &Selection::default()), ToggleOutcome::Cleared);
    /// assert!(store.get(at).is_none());
    /// ```
    pub fn toggle(&mut self, coord: Coordinate, rules_match: bool, selection: &Selection) -> ToggleOutcome {
        if self.entries.remove(&coord).is_some() {
            return ToggleOutcome::Cleared;
        }
        if rules_match {
            self.entries.insert(coord, OverrideEntry::Suppressed);
            ToggleOutcome::Suppressed
        } else {
            self.entries
                .insert(coord, OverrideEntry::Manual(selection.clone()));
            ToggleOutcome::Highlighted
        }
    }

    /// Put an entry back verbatim, e.g. when loading a saved session.
    pub fn restore(&mut self, coord: Coordinate, entry: OverrideEntry) -> Option<OverrideEntry> {
        self.entries.insert(coord, entry)
    }

    /// All entries ordered by coordinate
    pub fn entries(&self) -> Vec<(Coordinate, &OverrideEntry)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(c, e)| (*c, e)).collect();
        entries.sort_by_key(|(c, _)| *c);
        entries
    }
}
