pub mod chunk;
pub mod engine;
pub mod error;
pub mod ghost;
pub mod overrides;
pub mod pitch;
pub mod resolver;
pub mod rules;
pub mod session;
pub mod text;
pub mod tuning;

pub use chunk::{Chunk, ChunkCatalog};
pub use engine::{FretboardEngine, ViewGrid, DEFAULT_FRETS, MAX_FRETS};
pub use error::*;
pub use overrides::{Coordinate, ManualHighlight, OverrideEntry, Selection, ToggleOutcome};
pub use pitch::PitchClass;
pub use resolver::{Highlight, HighlightOrigin, Resolver};
pub use rules::{Color, DisplayMode, FretboardId, HighlightRule, RuleSpec, RuleUpdate};
pub use session::SessionConfig;
pub use tuning::{Direction, NamedTunings, TuningState};

use text::TextOptions;

/// Render a YAML session as text.
/// This is the main entry point for the library.
pub fn render_session(source: &str) -> Result<String, FretboardError> {
    render_session_with_tunings(source, None)
}

/// Render a YAML session, resolving a named tuning against saved tunings as well as the presets
pub fn render_session_with_tunings(source: &str, saved: Option<&NamedTunings>) -> Result<String, FretboardError> {
    let session = SessionConfig::from_yaml(source)?;
    let engine = session.build_engine(saved)?;
    Ok(text::render_all(&engine, &text_options(&session)))
}

fn text_options(session: &SessionConfig) -> TextOptions {
    TextOptions {
        frets: session.frets,
        ghost_above: session.ghost_rows.above,
        ghost_below: session.ghost_rows.below,
    }
}
