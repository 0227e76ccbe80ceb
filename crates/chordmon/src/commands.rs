//! CLI command implementations

use anyhow::{Context, Result};
use chord_detect::{
    display_name, parse_pitch, ChordCatalog, ChordMatcher, Detection, Pitch, PitchClass,
};
use chordconf::OutputFormat;
use serde::Serialize;

/// Parse note arguments, numbers or names, in the order given.
pub fn parse_notes(args: &[String]) -> Result<Vec<Pitch>> {
    args.iter()
        .map(|arg| parse_pitch(arg).with_context(|| format!("Cannot read note {:?}", arg)))
        .collect()
}

/// Everything `detect` can print.
#[derive(Debug, Clone, Serialize)]
pub struct DetectReport {
    /// Held notes, lowest first
    pub notes: Vec<String>,
    pub pitches: Vec<Pitch>,
    pub label: String,
    pub detection: Detection,
}

impl DetectReport {
    pub fn new(matcher: &ChordMatcher<'_>, pitches: &[Pitch]) -> Self {
        let mut held = pitches.to_vec();
        held.sort_unstable();
        held.dedup();

        let detection = matcher.detect(&held);
        Self {
            notes: held.iter().map(|&p| display_name(p)).collect(),
            pitches: held,
            label: detection.label(),
            detection,
        }
    }

    pub fn render(&self, format: OutputFormat, show_notes: bool) -> Result<String> {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize detection")
            }
            OutputFormat::Text if show_notes => {
                Ok(format!("Notes: {} | Chord: {}", self.notes.join(", "), self.label))
            }
            OutputFormat::Text => Ok(self.label.clone()),
        }
    }
}

/// Resolve a root filter given on the command line.
pub fn parse_root(name: &str) -> Result<PitchClass> {
    PitchClass::from_name(name.trim())
        .with_context(|| format!("Unknown root {:?} (expected a name like C, F# or Bb)", name))
}

/// One `name<TAB>intervals` line per catalog chord, root-major.
pub fn render_catalog(catalog: &ChordCatalog, root: Option<PitchClass>) -> String {
    let mut output = String::new();
    for (name, intervals) in catalog.expanded() {
        if root.is_some_and(|r| r != name.root) {
            continue;
        }
        output.push_str(&format!("{}\t{}\n", name, intervals));
    }
    output
}
