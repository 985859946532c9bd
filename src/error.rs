//! # Error Types
//!
//! This module defines all error types for the fretboard engine.
//!
//! Every command that fails leaves the engine state exactly as it was, so a
//! caller can surface the error (e.g. in a dialog) and carry on.
//!
//! ## Error Types
//! - `InvalidTuning` - a replacement tuning with the wrong number of strings
//! - `UnknownChunk` / `UnknownChunkName` - a rule that references a missing chunk
//! - `RuleIndexOutOfRange` / `StringIndexOutOfRange` - edits on missing positions
//! - `InvalidNoteName` / `InvalidFretboard` / `UnknownTuning` - bad user input
//! - `ConfigError` - malformed session YAML or named-tuning JSON
//!
//! Lookups that simply find nothing (an override, a rule, a string) are not
//! errors; they return `None`.
//!
//! ## Usage
//! ```rust
//! use fretboard::{FretboardEngine, FretboardError};
//!
//! let mut engine = FretboardEngine::new();
//! match engine.set_tuning(&[4, 9, 2]) {
//!     Err(FretboardError::InvalidTuning { expected, actual }) => {
//!         assert_eq!((expected, actual), (6, 3));
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FretboardError {
    /// Replacement tuning length does not match the configured string count.
    ///
    /// # Example
    /// ```
    /// # use fretboard::FretboardError;
    /// let err = FretboardError::InvalidTuning { expected: 6, actual: 7 };
    /// assert_eq!(err.to_string(), "Invalid tuning: expected 6 strings, got 7");
    /// ```
    #[error("Invalid tuning: expected {expected} strings, got {actual}")]
    InvalidTuning { expected: usize, actual: usize },

    /// A rule referenced a chunk id that is not in the catalog.
    ///
    /// # Example
    /// ```
    /// # use fretboard::FretboardError;
    /// let err = FretboardError::UnknownChunk(42);
    /// assert_eq!(err.to_string(), "Unknown chunk id: 42");
    /// ```
    #[error("Unknown chunk id: {0}")]
    UnknownChunk(u32),

    /// A session file named a chunk that is not in the catalog.
    #[error("Unknown chunk name: {0}")]
    UnknownChunkName(String),

    #[error("Rule index {index} out of range ({len} rules)")]
    RuleIndexOutOfRange { index: usize, len: usize },

    #[error("String index {index} out of range ({len} strings)")]
    StringIndexOutOfRange { index: usize, len: usize },

    /// Note label that matches none of the twelve canonical names or their
    /// single-spelling aliases.
    #[error("Invalid note name: {0}")]
    InvalidNoteName(String),

    #[error("Invalid fretboard id: {0} (expected 1 or 2)")]
    InvalidFretboard(u8),

    #[error("Unknown tuning: {0}")]
    UnknownTuning(String),

    /// Session YAML or named-tuning JSON could not be deserialized.
    ///
    /// # Example
    /// ```
    /// # use fretboard::FretboardError;
    /// let err = FretboardError::ConfigError("missing field `rules`".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: missing field `rules`");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}
