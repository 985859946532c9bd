//! # Highlight Resolver
//!
//! Decides what is drawn on a single fret by combining the tuning, the rule
//! list and the manual overrides. It only reads those three containers, so
//! the same state always produces the same answer and the caller can query
//! every visible fret on every re-render.
//!
//! ## Resolution Order
//! 1. `absolute = open pitch of the string + fret number`, with the fret folded to one octave
//! 2. A suppression at the coordinate → nothing
//! 3. A manual highlight at the coordinate → that highlight. If it is bound
//!    to a rule index, the degree is computed from that rule's *current* root;
//!    a missing rule leaves the degree blank
//! 4. Otherwise the last matching rule for the view (see `rules`)
//!
//! ## Labels
//! `DisplayMode::ScaleDegree` yields a degree label, `DisplayMode::NoteName`
//! the note name of the absolute pitch, and `DisplayMode::None` no label.

use crate::overrides::{Coordinate, ManualHighlight, ManualOverrideStore, OverrideEntry};
use crate::pitch::{degree_label, note_name, pitch_class_of, PitchClass};
use crate::rules::{Color, DisplayMode, FretboardId, HighlightRuleSet};
use crate::tuning::TuningState;
use serde::Serialize;

/// Where a resolved highlight came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HighlightOrigin {
    Rule { index: usize },
    Manual,
}

/// What to draw on one fret
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub color: Color,
    pub display_mode: DisplayMode,
    /// `None` for `DisplayMode::None`; empty when a degree cannot be computed
    pub label: Option<String>,
    pub origin: HighlightOrigin,
}

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    tuning: &'a TuningState,
    rules: &'a HighlightRuleSet,
    overrides: &'a ManualOverrideStore,
}

impl<'a> Resolver<'a> {
    pub fn new(
        tuning: &'a TuningState,
        rules: &'a HighlightRuleSet,
        overrides: &'a ManualOverrideStore,
    ) -> Self {
        Self {
            tuning,
            rules,
            overrides,
        }
    }

    /// Open pitch plus fret, with the fret folded to one octave first. Only
    /// the pitch class of the result is meaningful.
    pub fn absolute_value(&self, string: usize, fret: u32) -> Option<i32> {
        self.tuning.get(string).map(|open| above_open(open, fret))
    }

    /// Resolve one coordinate. A string index past the tuning resolves to nothing.
    pub fn resolve(&self, coord: Coordinate) -> Option<Highlight> {
        let absolute = self.absolute_value(coord.string, coord.fret)?;
        match self.overrides.get(coord) {
            Some(OverrideEntry::Suppressed) => None,
            Some(OverrideEntry::Manual(manual)) => Some(self.manual(manual, absolute)),
            None => self.resolve_rules(coord.fretboard, absolute),
        }
    }

    /// Rule-only resolution for an absolute pitch, ignoring overrides.
    pub fn resolve_rules(&self, fretboard: FretboardId, absolute: i32) -> Option<Highlight> {
        let found = self.rules.resolve(fretboard, absolute)?;
        Some(Highlight {
            color: found.rule.color.clone(),
            display_mode: found.rule.display_mode,
            label: label(found.rule.display_mode, absolute, Some(found.offset)),
            origin: HighlightOrigin::Rule { index: found.index },
        })
    }

    fn manual(&self, manual: &ManualHighlight, absolute: i32) -> Highlight {
        let degree = manual
            .bound_rule
            .and_then(|index| self.rules.get(index))
            .map(|rule| pitch_class_of(absolute).offset_from(rule.root));
        Highlight {
            color: manual.color.clone(),
            display_mode: manual.display_mode,
            label: label(manual.display_mode, absolute, degree),
            origin: HighlightOrigin::Manual,
        }
    }
}

/// Pitch `fret` semitones above `open`, in `0..24`
pub fn above_open(open: PitchClass, fret: u32) -> i32 {
    open.value() as i32 + (fret % 12) as i32
}

fn label(mode: DisplayMode, absolute: i32, degree: Option<PitchClass>) -> Option<String> {
    match mode {
        DisplayMode::None => None,
        DisplayMode::ScaleDegree => Some(degree.map(degree_label).unwrap_or_default().to_string()),
        DisplayMode::NoteName => Some(note_name(pitch_class_of(absolute)).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkCatalog;
    use crate::rules::RuleSpec;

    struct Fixture {
        tuning: TuningState,
        rules: HighlightRuleSet,
        overrides: ManualOverrideStore,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                tuning: TuningState::standard(),
                rules: HighlightRuleSet::new(),
                overrides: ManualOverrideStore::new(),
            }
        }

        fn add(&mut self, root: i32, chunk_id: u32, color: &str, mode: DisplayMode) {
            let rule = RuleSpec::new(FretboardId::Main, pitch_class_of(root), chunk_id, Color::new(color), mode)
                .build(&ChunkCatalog::builtin())
                .unwrap();
            self.rules.append(rule);
        }

        fn resolve(&self, string: usize, fret: u32) -> Option<Highlight> {
            Resolver::new(&self.tuning, &self.rules, &self.overrides)
                .resolve(Coordinate::new(FretboardId::Main, string, fret))
        }
    }

    #[test]
    fn test_rule_highlight_labels() {
        let mut fx = Fixture::new();
        fx.add(4, 1, "red", DisplayMode::ScaleDegree);

        // string 1 is B: fret 0 is the fifth of E
        let hl = fx.resolve(1, 0).unwrap();
        assert_eq!(hl.label.as_deref(), Some("5"));
        assert_eq!(hl.origin, HighlightOrigin::Rule { index: 0 });
        // G# on the G string
        assert_eq!(fx.resolve(2, 1).unwrap().label.as_deref(), Some("3"));
        assert!(fx.resolve(2, 0).is_none());
    }

    #[test]
    fn test_display_mode_none_has_no_label() {
        let mut fx = Fixture::new();
        fx.add(4, 0, "green", DisplayMode::None);
        let hl = fx.resolve(0, 12).unwrap();
        assert_eq!(hl.color.as_str(), "green");
        assert_eq!(hl.label, None);
    }

    #[test]
    fn test_suppression_hides_rule_match() {
        let mut fx = Fixture::new();
        fx.add(4, 1, "red", DisplayMode::NoteName);
        fx.overrides
            .restore(Coordinate::new(FretboardId::Main, 0, 0), OverrideEntry::Suppressed);
        assert!(fx.resolve(0, 0).is_none());
        assert!(fx.resolve(0, 12).is_some());
    }

    #[test]
    fn test_manual_highlight_without_binding() {
        let mut fx = Fixture::new();
        let at = Coordinate::new(FretboardId::Main, 3, 2);
        fx.overrides.restore(
            at,
            OverrideEntry::Manual(ManualHighlight {
                color: Color::new("orange"),
                display_mode: DisplayMode::ScaleDegree,
                bound_rule: None,
            }),
        );
        let hl = fx.resolve(3, 2).unwrap();
        assert_eq!(hl.label.as_deref(), Some(""));
        assert_eq!(hl.origin, HighlightOrigin::Manual);
    }

    #[test]
    fn test_manual_note_name_uses_absolute_pitch() {
        let mut fx = Fixture::new();
        fx.overrides.restore(
            Coordinate::new(FretboardId::Main, 3, 2),
            OverrideEntry::Manual(ManualHighlight {
                color: Color::new("orange"),
                display_mode: DisplayMode::NoteName,
                bound_rule: Some(4),
            }),
        );
        // D string, fret 2 = E
        assert_eq!(fx.resolve(3, 2).unwrap().label.as_deref(), Some("E"));
    }

    #[test]
    fn test_missing_string_resolves_to_nothing() {
        let mut fx = Fixture::new();
        fx.add(0, 5, "red", DisplayMode::None);
        assert!(fx.resolve(6, 0).is_none());
    }

    #[test]
    fn test_rule_only_resolution_ignores_overrides() {
        let mut fx = Fixture::new();
        fx.add(9, 4, "purple", DisplayMode::NoteName);
        fx.overrides
            .restore(Coordinate::new(FretboardId::Main, 4, 0), OverrideEntry::Suppressed);
        let resolver = Resolver::new(&fx.tuning, &fx.rules, &fx.overrides);
        assert_eq!(resolver.absolute_value(4, 0), Some(9));
        let hl = resolver.resolve_rules(FretboardId::Main, 9).unwrap();
        assert_eq!(hl.label.as_deref(), Some("A"));
        assert!(resolver.resolve_rules(FretboardId::Secondary, 9).is_none());
    }

    #[test]
    fn test_huge_frets_keep_their_pitch() {
        let mut fx = Fixture::new();
        fx.add(0, 5, "red", DisplayMode::NoteName);

        // B string: (11 + 4294967295) mod 12 = 2, D is in C major
        let top = fx.resolve(1, u32::MAX).unwrap();
        assert_eq!(top.label.as_deref(), Some("D"));
        // (11 + 2147483647) mod 12 = 6, F# is not
        assert!(fx.resolve(1, i32::MAX as u32).is_none());
        assert_eq!(fx.resolve(1, i32::MAX as u32 + 1).unwrap().label.as_deref(), Some("G"));
    }

    #[test]
    fn test_highlight_json_shape() {
        let hl = Highlight {
            color: Color::new("red"),
            display_mode: DisplayMode::ScaleDegree,
            label: Some("b3".to_string()),
            origin: HighlightOrigin::Rule { index: 2 },
        };
        assert_eq!(
            serde_json::to_string(&hl).unwrap(),
            r#"{"color":"red","displayMode":"scaleDegree","label":"b3","origin":{"type":"rule","index":2}}"#
        );
    }
}
