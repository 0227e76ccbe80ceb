use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, trace};

use crate::catalog::{ChordCatalog, CompleteInterval};
use crate::pitch::{pitch_class, Pitch, PitchClass};

/// Label returned when fewer than two distinct pitches are held.
pub const SINGLE_NOTE_LABEL: &str = "(single note)";

/// Label returned when nothing in the catalog explains the pitches.
pub const UNKNOWN_CHORD_LABEL: &str = "Unknown Chord";

/// Symbol for an interval left over after a base chord has been matched.
///
/// Intervals 1, 3 and 4 have no symbol and are dropped from the label.
pub fn tension_symbol(interval: u8) -> Option<&'static str> {
    match interval {
        2 => Some("(add9)"),
        9 => Some("(9)"),
        10 => Some("(♭9)"),
        11 => Some("(♯9)"),
        5 => Some("(11)"),
        6 => Some("(♯11)"),
        7 => Some("(♭13)"),
        8 => Some("(13)"),
        _ => None,
    }
}

/// Which rule produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Root plus perfect fifth and nothing else
    Power,
    /// Interval set is a catalog key
    Exact,
    /// A catalog chord is contained in the interval set
    Tension,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordMatch {
    pub root: PitchClass,
    pub quality: &'static str,
    pub kind: MatchKind,
    /// Intervals above the root not covered by the base chord, ascending.
    pub tensions: Vec<u8>,
    /// Pitch class of the lowest sounding pitch.
    pub bass: PitchClass,
}

impl ChordMatch {
    pub fn is_inversion(&self) -> bool {
        self.root != self.bass
    }

    pub fn label(&self) -> String {
        let mut label = format!("{}{}", self.root.name(), self.quality);
        for symbol in self.tensions.iter().filter_map(|&t| tension_symbol(t)) {
            label.push_str(symbol);
        }
        if self.is_inversion() {
            label.push('/');
            label.push_str(self.bass.name());
        }
        label
    }
}

/// Outcome of one detection call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Detection {
    SingleNote,
    Unknown,
    Chord(ChordMatch),
}

impl Detection {
    pub fn label(&self) -> String {
        match self {
            Detection::SingleNote => SINGLE_NOTE_LABEL.to_string(),
            Detection::Unknown => UNKNOWN_CHORD_LABEL.to_string(),
            Detection::Chord(chord) => chord.label(),
        }
    }

    pub fn chord(&self) -> Option<&ChordMatch> {
        match self {
            Detection::Chord(chord) => Some(chord),
            _ => None,
        }
    }
}

impl std::fmt::Display for Detection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Best tension candidate seen so far.
struct Candidate {
    root: PitchClass,
    quality: &'static str,
    base_size: usize,
    tensions: Vec<u8>,
}

/// Maps a snapshot of held pitches to a chord.
///
/// Roots are tried in ascending pitch-class order among the classes present.
/// A bare root-and-fifth returns a power chord at once; the first exact catalog
/// hit ends the search. Otherwise every catalog chord of three or more notes
/// that fits inside the interval set is a candidate, and the one explaining
/// the most notes wins, earliest first on ties.
#[derive(Debug, Clone, Copy)]
pub struct ChordMatcher<'a> {
    catalog: &'a ChordCatalog,
}

impl Default for ChordMatcher<'static> {
    fn default() -> Self {
        Self::new(ChordCatalog::global())
    }
}

impl<'a> ChordMatcher<'a> {
    pub fn new(catalog: &'a ChordCatalog) -> Self {
        Self { catalog }
    }

    pub fn detect(&self, pitches: &[Pitch]) -> Detection {
        let detection = self.classify(pitches);
        debug!(
            pitches = pitches.len(),
            label = %detection,
            kind = ?detection.chord().map(|c| c.kind),
            "chord detected"
        );
        detection
    }

    fn classify(&self, pitches: &[Pitch]) -> Detection {
        let distinct: BTreeSet<Pitch> = pitches.iter().copied().collect();
        let Some(&bass_pitch) = distinct.first() else {
            return Detection::SingleNote;
        };
        if distinct.len() < 2 {
            return Detection::SingleNote;
        }

        let bass = pitch_class(bass_pitch);
        let classes: BTreeSet<PitchClass> = distinct.iter().map(|&p| pitch_class(p)).collect();

        let mut best: Option<Candidate> = None;

        for &root in &classes {
            let intervals = CompleteInterval::from_unsorted(
                classes.iter().map(|pc| pc.interval_from(root)).collect(),
            );
            trace!(root = %root, intervals = %intervals, "trying root");

            if intervals.as_slice() == [0, 7] {
                return Detection::Chord(ChordMatch {
                    root,
                    quality: "5",
                    kind: MatchKind::Power,
                    tensions: Vec::new(),
                    bass,
                });
            }

            if let Some(entry) = self.catalog.lookup(intervals.as_slice()) {
                return Detection::Chord(ChordMatch {
                    root,
                    quality: entry.quality,
                    kind: MatchKind::Exact,
                    tensions: Vec::new(),
                    bass,
                });
            }

            for entry in self.catalog.entries() {
                if entry.intervals.len() < 3 || !entry.intervals.is_subset_of(&intervals) {
                    continue;
                }
                let base_size = entry.intervals.len();
                if best.as_ref().map_or(true, |b| base_size > b.base_size) {
                    best = Some(Candidate {
                        root,
                        quality: entry.quality,
                        base_size,
                        tensions: intervals.difference(&entry.intervals),
                    });
                }
            }
        }

        match best {
            Some(candidate) => Detection::Chord(ChordMatch {
                root: candidate.root,
                quality: candidate.quality,
                kind: MatchKind::Tension,
                tensions: candidate.tensions,
                bass,
            }),
            None => Detection::Unknown,
        }
    }
}

/// Detect against the process-wide catalog and render the label.
pub fn detect_chord(pitches: &[Pitch]) -> String {
    ChordMatcher::default().detect(pitches).label()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn detect(pitches: &[Pitch]) -> Detection {
        ChordMatcher::default().detect(pitches)
    }

    #[test]
    fn c_major_root_position() {
        let d = detect(&[60, 64, 67]);
        assert_eq!(
            d,
            Detection::Chord(ChordMatch {
                root: PitchClass::new(0),
                quality: "",
                kind: MatchKind::Exact,
                tensions: vec![],
                bass: PitchClass::new(0),
            })
        );
        assert_eq!(d.label(), "C");
    }

    #[test]
    fn duplicates_across_octaves_collapse() {
        assert_eq!(detect_chord(&[48, 60, 64, 67, 72]), "C");
        assert_eq!(detect_chord(&[60, 60, 64, 67]), "C");
    }

    #[test]
    fn unison_octave_is_unknown() {
        // Two distinct pitches, one pitch class
        assert_eq!(detect(&[60, 72]), Detection::Unknown);
    }

    #[test]
    fn repeated_single_pitch_is_single_note() {
        assert_eq!(detect(&[60, 60, 60]), Detection::SingleNote);
        assert_eq!(detect(&[]), Detection::SingleNote);
    }

    #[test]
    fn seventh_chords() {
        assert_eq!(detect_chord(&[67, 71, 74, 77]), "G7");
        assert_eq!(detect_chord(&[60, 64, 67, 71]), "CM7");
        assert_eq!(detect_chord(&[62, 65, 69, 72]), "Dm7");
        // B D F A is also D F A B; D is the lower pitch class and hits m6 first
        assert_eq!(detect_chord(&[71, 74, 77, 81]), "Dm6/B");
    }

    #[test]
    fn tension_over_dominant() {
        // C E G Bb D: no folded key, C7 explains four notes
        let d = detect(&[60, 64, 67, 70, 74]);
        let chord = d.chord().unwrap();
        assert_eq!(chord.kind, MatchKind::Tension);
        assert_eq!(chord.quality, "7");
        assert_eq!(chord.tensions, vec![2]);
        assert_eq!(d.label(), "C7(add9)");
    }

    #[test]
    fn tension_keeps_first_largest_candidate() {
        // C E G D: major triad and sus2 both fit; the triad is registered first
        assert_eq!(detect_chord(&[60, 62, 64, 67]), "C(add9)");
    }

    #[test]
    fn tension_across_roots_prefers_larger_base() {
        // C D E G A: C6 (root C) explains four notes
        assert_eq!(detect_chord(&[60, 62, 64, 67, 69]), "C6(add9)");
    }

    #[test]
    fn tension_tie_across_roots_keeps_lowest_root() {
        // D7sus4 (root D) and Am7 (root A) also explain four of C D E G A
        let d = detect(&[60, 62, 64, 67, 69]);
        assert_eq!(
            d,
            Detection::Chord(ChordMatch {
                root: PitchClass::new(0),
                quality: "6",
                kind: MatchKind::Tension,
                tensions: vec![2],
                bass: PitchClass::new(0),
            })
        );
    }

    #[test]
    fn exact_on_later_root_beats_earlier_tension() {
        // C Eb G Ab: Cm fits at root C, but G# C D# G is an exact M7
        let d = detect(&[60, 63, 67, 68]);
        let chord = d.chord().unwrap();
        assert_eq!(chord.kind, MatchKind::Exact);
        assert_eq!(chord.root, PitchClass::new(8));
        assert_eq!(d.label(), "G#M7/C");
        assert_eq!(detect_chord(&[60, 63, 67, 68]), "G#M7/C");
    }

    #[test]
    fn unlabelled_tensions_are_dropped() {
        // C Db E G: leftover semitone above the root has no symbol
        let d = detect(&[60, 61, 64, 67]);
        let chord = d.chord().unwrap();
        assert_eq!(chord.tensions, vec![1]);
        assert_eq!(d.label(), "C");
    }

    #[test]
    fn tension_gets_slash_bass() {
        // Bb in the bass under C E G D
        assert_eq!(detect_chord(&[58, 60, 62, 64, 67]), "C7(add9)/A#");
    }

    #[test]
    fn power_chord_inverted_keeps_lowest_root() {
        // G below C: C is still the lower pitch class, so C5 over G
        let d = detect(&[55, 60]);
        assert_eq!(d.chord().unwrap().kind, MatchKind::Power);
        assert_eq!(d.label(), "C5/G");
    }

    #[test]
    fn tension_symbols() {
        let table: Vec<_> = (0..12).map(tension_symbol).collect();
        assert_eq!(
            table,
            vec![
                None,
                None,
                Some("(add9)"),
                None,
                None,
                Some("(11)"),
                Some("(♯11)"),
                Some("(♭13)"),
                Some("(13)"),
                Some("(9)"),
                Some("(♭9)"),
                Some("(♯9)"),
            ]
        );
    }

    #[test]
    fn custom_catalog() {
        use crate::catalog::ChordPattern;
        let patterns = [ChordPattern {
            quality: "maj",
            offsets: &[4, 7],
        }];
        let catalog = ChordCatalog::build(&patterns);
        let matcher = ChordMatcher::new(&catalog);
        assert_eq!(matcher.detect(&[60, 64, 67]).label(), "Cmaj");
        assert_eq!(matcher.detect(&[60, 63, 67]), Detection::Unknown);
    }

    #[test]
    fn detection_serializes_tagged() {
        let json = serde_json::to_value(detect(&[64, 67, 72])).unwrap();
        assert_eq!(json["result"], "chord");
        assert_eq!(json["root"], 0);
        assert_eq!(json["bass"], 4);
        assert_eq!(json["kind"], "exact");
        assert_eq!(json["quality"], "");

        let json = serde_json::to_value(detect(&[60])).unwrap();
        assert_eq!(json["result"], "single_note");
    }
}
