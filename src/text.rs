//! Plain-text rendering of resolved fretboard views, used by the CLI.
//!
//! Each view becomes a header line followed by one line per string: the open
//! note, then one cell per fret starting at the open string. A highlighted
//! cell shows its label, or the first letter of its color when the display
//! mode has no label. Ghost rows are prefixed with `~` and only show
//! rule-based highlights.

use crate::engine::FretboardEngine;
use crate::ghost::{ghost_rows_above, ghost_rows_below};
use crate::pitch::{note_name, PitchClass};
use crate::resolver::{above_open, Highlight};
use crate::rules::FretboardId;

const CELL_WIDTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOptions {
    pub frets: u32,
    pub ghost_above: usize,
    pub ghost_below: usize,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            frets: crate::engine::DEFAULT_FRETS,
            ghost_above: 0,
            ghost_below: 0,
        }
    }
}

fn cell(highlight: Option<&Highlight>) -> String {
    let text = match highlight {
        None => "-".to_string(),
        Some(h) => match &h.label {
            Some(label) if !label.is_empty() => label.clone(),
            Some(_) => "?".to_string(),
            None => h.color.as_str().chars().next().map(String::from).unwrap_or_default(),
        },
    };
    format!("{:^width$}", text, width = CELL_WIDTH)
}

fn row(prefix: &str, open: PitchClass, cells: impl Iterator<Item = String>) -> String {
    let mut line = format!("{}{:<6}|", prefix, note_name(open));
    for c in cells {
        line.push_str(&c);
        line.push('|');
    }
    line
}

fn ghost_row(engine: &FretboardEngine, fretboard: FretboardId, open: PitchClass, frets: u32) -> String {
    let resolver = engine.resolver();
    row(
        "~",
        open,
        (0..=frets).map(|fret| cell(resolver.resolve_rules(fretboard, above_open(open, fret)).as_ref())),
    )
}

/// Render one view, or `None` when it is switched off.
pub fn render_view(engine: &FretboardEngine, fretboard: FretboardId, options: &TextOptions) -> Option<String> {
    let grid = engine.resolve_view(fretboard, options.frets)?;

    let header = (0..=options.frets)
        .map(|fret| format!("{:^width$}", fret, width = CELL_WIDTH))
        .collect::<Vec<_>>()
        .join("|");
    let mut lines = vec![format!("Fretboard {}", u8::from(fretboard)), format!(" {:<6}|{}|", "", header)];

    for open in ghost_rows_above(engine.tuning(), options.ghost_above) {
        lines.push(ghost_row(engine, fretboard, open, options.frets));
    }
    for (open, cells) in engine.current_tuning().iter().zip(&grid) {
        lines.push(row(" ", *open, cells.iter().map(|h| cell(h.as_ref()))));
    }
    for open in ghost_rows_below(engine.tuning(), options.ghost_below) {
        lines.push(ghost_row(engine, fretboard, open, options.frets));
    }

    Some(lines.join("\n"))
}

/// Render every active view, separated by a blank line.
pub fn render_all(engine: &FretboardEngine, options: &TextOptions) -> String {
    FretboardId::ALL
        .iter()
        .filter_map(|&id| render_view(engine, id, options))
        .collect::<Vec<_>>()
        .join("\n\n")
}
