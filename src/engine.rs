//! # Fretboard Engine
//!
//! The single context that owns all highlight state: the chunk catalog, the
//! shared tuning, the rule list, the manual overrides and the activation flag
//! of the secondary view. The UI calls the commands below in response to user
//! actions, then re-queries [`FretboardEngine::resolve_highlight`] for every
//! visible fret. The engine never pushes notifications; re-rendering after a
//! mutation is up to the caller.
//!
//! ## Commands
//! - [`bump_string()`](FretboardEngine::bump_string), [`set_tuning()`](FretboardEngine::set_tuning)
//! - [`add_rule()`](FretboardEngine::add_rule), [`remove_rule()`](FretboardEngine::remove_rule),
//!   [`move_rule()`](FretboardEngine::move_rule), [`set_rule_fields()`](FretboardEngine::set_rule_fields)
//! - [`toggle_override()`](FretboardEngine::toggle_override)
//! - [`set_fretboard2_active()`](FretboardEngine::set_fretboard2_active)
//!
//! A command that fails returns the error and leaves every container as it was.
//!
//! ## Example
//! ```rust
//! use fretboard::{Color, DisplayMode, FretboardEngine, FretboardId, RuleSpec, Selection};
//! use fretboard::pitch::pitch_class_of;
//!
//! let mut engine = FretboardEngine::new();
//! engine.add_rule(&RuleSpec::new(
//!     FretboardId::Main,
//!     pitch_class_of(4),
//!     1,
//!     Color::new("red"),
//!     DisplayMode::NoteName,
//! ))?;
//!
//! let open_e = engine.resolve_highlight(FretboardId::Main, 0, 0).unwrap();
//! assert_eq!(open_e.label.as_deref(), Some("E"));
//!
//! engine.toggle_override(FretboardId::Main, 0, 0, &Selection::default())?;
//! assert!(engine.resolve_highlight(FretboardId::Main, 0, 0).is_none());
//! # Ok::<(), fretboard::FretboardError>(())
//! ```

use crate::chunk::ChunkCatalog;
use crate::error::FretboardError;
use crate::overrides::{Coordinate, ManualOverrideStore, OverrideEntry, Selection, ToggleOutcome};
use crate::pitch::PitchClass;
use crate::resolver::{Highlight, Resolver};
use crate::rules::{FretboardId, HighlightRule, HighlightRuleSet, RuleSpec, RuleUpdate};
use crate::tuning::{Direction, TuningState};

/// Frets drawn per string when nothing else is configured
pub const DEFAULT_FRETS: u32 = 18;

/// Largest fret count a session may ask to draw
pub const MAX_FRETS: u32 = 36;

/// Resolved highlights for one view: one row per string, one cell per fret from 0
pub type ViewGrid = Vec<Vec<Option<Highlight>>>;

#[derive(Debug, Clone)]
pub struct FretboardEngine {
    catalog: ChunkCatalog,
    tuning: TuningState,
    rules: HighlightRuleSet,
    overrides: ManualOverrideStore,
    secondary_active: bool,
}

impl FretboardEngine {
    /// Built-in catalog, standard six-string tuning, no rules, secondary view off.
    pub fn new() -> Self {
        Self::with_parts(ChunkCatalog::builtin(), TuningState::standard())
    }

    pub fn with_parts(catalog: ChunkCatalog, tuning: TuningState) -> Self {
        Self {
            catalog,
            tuning,
            rules: HighlightRuleSet::new(),
            overrides: ManualOverrideStore::new(),
            secondary_active: false,
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn bump_string(&mut self, string: usize, direction: Direction) -> Result<PitchClass, FretboardError> {
        let open = self
            .tuning
            .bump(string, direction)
            .inspect_err(|e| log::warn!("bump_string rejected: {}", e))?;
        log::debug!("string {} retuned to {}", string, open);
        Ok(open)
    }

    pub fn set_tuning(&mut self, values: &[i32]) -> Result<(), FretboardError> {
        self.tuning
            .replace_all(values)
            .inspect_err(|e| log::warn!("set_tuning rejected: {}", e))?;
        log::debug!("tuning set to {:?}", self.tuning.labels());
        Ok(())
    }

    /// Append a rule at the highest priority. Returns its index.
    pub fn add_rule(&mut self, spec: &RuleSpec) -> Result<usize, FretboardError> {
        let rule = spec
            .build(&self.catalog)
            .inspect_err(|e| log::warn!("add_rule rejected: {}", e))?;
        let index = self.rules.append(rule);
        log::debug!("rule {} added for {}", index, spec.fretboard);
        Ok(index)
    }

    pub fn remove_rule(&mut self, index: usize) -> Result<HighlightRule, FretboardError> {
        let removed = self
            .rules
            .remove_at(index)
            .inspect_err(|e| log::warn!("remove_rule rejected: {}", e))?;
        log::debug!("rule {} removed, {} remain", index, self.rules.len());
        Ok(removed)
    }

    /// Returns `false` when the rule is already at that end of the list.
    pub fn move_rule(&mut self, index: usize, direction: Direction) -> Result<bool, FretboardError> {
        let moved = self
            .rules
            .move_rule(index, direction)
            .inspect_err(|e| log::warn!("move_rule rejected: {}", e))?;
        if moved {
            log::debug!("rule {} moved {:?}", index, direction);
        }
        Ok(moved)
    }

    pub fn set_rule_fields(&mut self, index: usize, update: &RuleUpdate) -> Result<(), FretboardError> {
        let current = self.rules.get(index).ok_or(FretboardError::RuleIndexOutOfRange {
            index,
            len: self.rules.len(),
        });
        let replacement = current
            .and_then(|rule| update.apply(rule, &self.catalog))
            .inspect_err(|e| log::warn!("set_rule_fields rejected: {}", e))?;
        self.rules.replace(index, replacement)?;
        log::debug!("rule {} updated", index);
        Ok(())
    }

    /// Flip the override at a coordinate; see [`ManualOverrideStore::toggle`].
    pub fn toggle_override(
        &mut self,
        fretboard: FretboardId,
        string: usize,
        fret: u32,
        selection: &Selection,
    ) -> Result<ToggleOutcome, FretboardError> {
        let resolver = self.resolver();
        let absolute = resolver
            .absolute_value(string, fret)
            .ok_or(FretboardError::StringIndexOutOfRange {
                index: string,
                len: self.tuning.string_count(),
            })
            .inspect_err(|e| log::warn!("toggle_override rejected: {}", e))?;
        let rules_match = resolver.resolve_rules(fretboard, absolute).is_some();

        let coord = Coordinate::new(fretboard, string, fret);
        let outcome = self.overrides.toggle(coord, rules_match, selection);
        log::debug!("override at {:?}: {:?}", coord, outcome);
        Ok(outcome)
    }

    /// Put a saved override back without toggle semantics.
    pub fn restore_override(&mut self, coord: Coordinate, entry: OverrideEntry) -> Result<(), FretboardError> {
        if coord.string >= self.tuning.string_count() {
            return Err(FretboardError::StringIndexOutOfRange {
                index: coord.string,
                len: self.tuning.string_count(),
            });
        }
        self.overrides.restore(coord, entry);
        Ok(())
    }

    pub fn set_fretboard2_active(&mut self, active: bool) {
        self.secondary_active = active;
        log::debug!("secondary fretboard active: {}", active);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn resolve_highlight(&self, fretboard: FretboardId, string: usize, fret: u32) -> Option<Highlight> {
        self.resolver()
            .resolve(Coordinate::new(fretboard, string, fret))
    }

    /// Resolve every fret `0..=frets` of every string on one view.
    /// Returns `None` for the secondary view while it is switched off.
    pub fn resolve_view(&self, fretboard: FretboardId, frets: u32) -> Option<ViewGrid> {
        if !self.is_active(fretboard) {
            return None;
        }
        let resolver = self.resolver();
        let grid = (0..self.tuning.string_count())
            .map(|string| {
                (0..=frets)
                    .map(|fret| resolver.resolve(Coordinate::new(fretboard, string, fret)))
                    .collect()
            })
            .collect();
        Some(grid)
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.tuning, &self.rules, &self.overrides)
    }

    pub fn current_tuning(&self) -> &[PitchClass] {
        self.tuning.as_slice()
    }

    pub fn tuning(&self) -> &TuningState {
        &self.tuning
    }

    pub fn rules(&self) -> &[HighlightRule] {
        self.rules.as_slice()
    }

    pub fn catalog(&self) -> &ChunkCatalog {
        &self.catalog
    }

    pub fn overrides(&self) -> &ManualOverrideStore {
        &self.overrides
    }

    /// The main view is always active; the secondary one follows its flag.
    pub fn is_active(&self, fretboard: FretboardId) -> bool {
        match fretboard {
            FretboardId::Main => true,
            FretboardId::Secondary => self.secondary_active,
        }
    }
}

impl Default for FretboardEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::pitch_class_of;
    use crate::rules::{Color, DisplayMode};

    fn spec(fretboard: FretboardId, root: i32, chunk_id: u32, color: &str, mode: DisplayMode) -> RuleSpec {
        RuleSpec::new(fretboard, pitch_class_of(root), chunk_id, Color::new(color), mode)
    }

    #[test]
    fn test_failed_commands_leave_state_unchanged() {
        let mut engine = FretboardEngine::new();
        engine
            .add_rule(&spec(FretboardId::Main, 4, 1, "red", DisplayMode::None))
            .unwrap();

        assert!(engine.set_tuning(&[1, 2, 3, 4, 5]).is_err());
        assert!(engine.add_rule(&spec(FretboardId::Main, 0, 42, "red", DisplayMode::None)).is_err());
        assert!(engine.remove_rule(3).is_err());
        assert!(engine.move_rule(1, Direction::Up).is_err());
        assert!(engine.bump_string(9, Direction::Up).is_err());
        let bad_chunk = RuleUpdate {
            chunk_id: Some(42),
            color: Some(Color::new("blue")),
            ..RuleUpdate::default()
        };
        assert_eq!(engine.set_rule_fields(0, &bad_chunk), Err(FretboardError::UnknownChunk(42)));
        assert_eq!(
            engine.set_rule_fields(1, &RuleUpdate::default()),
            Err(FretboardError::RuleIndexOutOfRange { index: 1, len: 1 })
        );
        assert!(engine.toggle_override(FretboardId::Main, 6, 0, &Selection::default()).is_err());

        assert_eq!(engine.tuning(), &TuningState::standard());
        assert_eq!(engine.rules().len(), 1);
        assert_eq!(engine.rules()[0].color.as_str(), "red");
        assert!(engine.overrides().is_empty());
    }

    #[test]
    fn test_set_rule_fields_changes_resolution() {
        let mut engine = FretboardEngine::new();
        engine
            .add_rule(&spec(FretboardId::Main, 4, 1, "red", DisplayMode::ScaleDegree))
            .unwrap();
        assert_eq!(
            engine.resolve_highlight(FretboardId::Main, 0, 0).unwrap().label.as_deref(),
            Some("1")
        );

        let to_c = RuleUpdate {
            root: Some(pitch_class_of(0)),
            ..RuleUpdate::default()
        };
        engine.set_rule_fields(0, &to_c).unwrap();
        assert_eq!(
            engine.resolve_highlight(FretboardId::Main, 0, 0).unwrap().label.as_deref(),
            Some("3")
        );

        let to_secondary = RuleUpdate {
            fretboard: Some(FretboardId::Secondary),
            ..RuleUpdate::default()
        };
        engine.set_rule_fields(0, &to_secondary).unwrap();
        assert!(engine.resolve_highlight(FretboardId::Main, 0, 0).is_none());
        assert!(engine.resolve_highlight(FretboardId::Secondary, 0, 0).is_some());
    }

    #[test]
    fn test_bump_string_affects_both_views() {
        let mut engine = FretboardEngine::new();
        engine
            .add_rule(&spec(FretboardId::Main, 5, 0, "red", DisplayMode::None))
            .unwrap();
        engine
            .add_rule(&spec(FretboardId::Secondary, 5, 0, "blue", DisplayMode::None))
            .unwrap();
        assert!(engine.resolve_highlight(FretboardId::Main, 0, 0).is_none());

        engine.bump_string(0, Direction::Up).unwrap();
        assert_eq!(engine.current_tuning()[0].value(), 5);
        assert!(engine.resolve_highlight(FretboardId::Main, 0, 0).is_some());
        assert!(engine.resolve_highlight(FretboardId::Secondary, 0, 0).is_some());
    }

    #[test]
    fn test_resolve_view_respects_activation() {
        let mut engine = FretboardEngine::new();
        engine
            .add_rule(&spec(FretboardId::Secondary, 0, 0, "red", DisplayMode::NoteName))
            .unwrap();
        assert!(engine.resolve_view(FretboardId::Secondary, 12).is_none());

        engine.set_fretboard2_active(true);
        let grid = engine.resolve_view(FretboardId::Secondary, 12).unwrap();
        assert_eq!(grid.len(), 6);
        assert!(grid.iter().all(|row| row.len() == 13));
        // Low E string: C at fret 8
        assert_eq!(grid[0][8].as_ref().unwrap().label.as_deref(), Some("C"));
        assert!(grid[0][7].is_none());

        let main = engine.resolve_view(FretboardId::Main, 12).unwrap();
        assert!(main.iter().flatten().all(Option::is_none));
    }

    #[test]
    fn test_restore_override_checks_string() {
        let mut engine = FretboardEngine::new();
        let off_board = Coordinate::new(FretboardId::Main, 8, 0);
        assert!(engine.restore_override(off_board, OverrideEntry::Suppressed).is_err());
        let on_board = Coordinate::new(FretboardId::Main, 5, 0);
        engine.restore_override(on_board, OverrideEntry::Suppressed).unwrap();
        assert_eq!(engine.overrides().len(), 1);
    }
}
