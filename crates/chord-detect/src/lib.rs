//! Chord naming for a snapshot of held pitches.
//!
//! The pattern catalog is built once per process and shared read-only; the
//! matcher is a pure function of the pitch set it is handed.
//!
//! ```
//! use chord_detect::detect_chord;
//!
//! assert_eq!(detect_chord(&[60, 64, 67]), "C");
//! assert_eq!(detect_chord(&[64, 67, 72]), "C/E");
//! assert_eq!(detect_chord(&[60, 67]), "C5");
//! ```

pub mod catalog;
pub mod matcher;
pub mod pitch;

pub use catalog::{CatalogEntry, ChordCatalog, ChordName, ChordPattern, CompleteInterval, PATTERNS};
pub use matcher::{
    detect_chord, tension_symbol, ChordMatch, ChordMatcher, Detection, MatchKind,
    SINGLE_NOTE_LABEL, UNKNOWN_CHORD_LABEL,
};
pub use pitch::{display_name, parse_pitch, pitch_class, Pitch, PitchClass};

/// Errors from chord-detect operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid note: {0:?} (expected a number like 60 or a name like C#4)")]
    InvalidNote(String),
}

pub type Result<T> = std::result::Result<T, Error>;
