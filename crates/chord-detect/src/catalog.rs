use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::pitch::PitchClass;

/// A named chord quality and its intervals above an implicit root.
#[derive(Debug, Clone, Copy)]
pub struct ChordPattern {
    pub quality: &'static str,
    pub offsets: &'static [u8],
}

const fn pattern(quality: &'static str, offsets: &'static [u8]) -> ChordPattern {
    ChordPattern { quality, offsets }
}

/// Hand-authored chord qualities, in registration order.
///
/// Tension chords keep their compound intervals (9th = 14, 11th = 17,
/// 13th = 21). Since the matcher folds everything into one octave, those
/// keys are never hit by an exact lookup.
pub static PATTERNS: &[ChordPattern] = &[
    // Triads
    pattern("", &[4, 7]),
    pattern("m", &[3, 7]),
    pattern("dim", &[3, 6]),
    pattern("aug", &[4, 8]),
    pattern("sus4", &[5, 7]),
    pattern("sus2", &[2, 7]),
    // Sixths and sevenths
    pattern("6", &[4, 7, 9]),
    pattern("m6", &[3, 7, 9]),
    pattern("M7", &[4, 7, 11]),
    pattern("m7", &[3, 7, 10]),
    pattern("7", &[4, 7, 10]),
    pattern("dim7", &[3, 6, 9]),
    pattern("m7-5", &[3, 6, 10]),
    pattern("aug7", &[4, 8, 10]),
    pattern("M7sus4", &[5, 7, 11]),
    pattern("7sus4", &[5, 7, 10]),
    // Tensions
    pattern("9", &[4, 7, 10, 14]),
    pattern("M9", &[4, 7, 11, 14]),
    pattern("m9", &[3, 7, 10, 14]),
    pattern("11", &[4, 7, 10, 14, 17]),
    pattern("M11", &[4, 7, 11, 14, 17]),
    pattern("m11", &[3, 7, 10, 14, 17]),
    pattern("13", &[4, 7, 10, 14, 17, 21]),
    pattern("M13", &[4, 7, 11, 14, 17, 21]),
    pattern("m13", &[3, 7, 10, 14, 17, 21]),
    // Altered dominants
    pattern("7(♭5)", &[4, 6, 10]),
    pattern("7(♯5)", &[4, 8, 10]),
    pattern("7(♭9)", &[4, 7, 10, 13]),
    pattern("7(♯9)", &[4, 7, 10, 15]),
    pattern("7(♭5,♭9)", &[4, 6, 10, 13]),
    // Other
    pattern("add9", &[4, 7, 14]),
    pattern("6/9", &[4, 7, 9, 14]),
    pattern("5", &[7]),
];

/// Root-relative interval set including the root itself, sorted and unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompleteInterval(Vec<u8>);

impl CompleteInterval {
    pub fn from_offsets(offsets: &[u8]) -> Self {
        let mut intervals = Vec::with_capacity(offsets.len() + 1);
        intervals.push(0);
        intervals.extend_from_slice(offsets);
        Self::from_unsorted(intervals)
    }

    pub fn from_unsorted(mut intervals: Vec<u8>) -> Self {
        intervals.sort_unstable();
        intervals.dedup();
        Self(intervals)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, interval: u8) -> bool {
        self.0.binary_search(&interval).is_ok()
    }

    pub fn is_subset_of(&self, other: &CompleteInterval) -> bool {
        self.0.iter().all(|&i| other.contains(i))
    }

    /// Intervals in `self` that are not in `base`, ascending.
    pub fn difference(&self, base: &CompleteInterval) -> Vec<u8> {
        self.0.iter().copied().filter(|&i| !base.contains(i)).collect()
    }
}

impl std::fmt::Display for CompleteInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "[{}]", parts.join(","))
    }
}

/// A chord quality placed on a concrete root, e.g. "F#m7".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChordName {
    pub root: PitchClass,
    pub quality: &'static str,
}

impl std::fmt::Display for ChordName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.root.name(), self.quality)
    }
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub intervals: CompleteInterval,
    pub quality: &'static str,
}

impl CatalogEntry {
    pub fn name(&self, root: PitchClass) -> ChordName {
        ChordName {
            root,
            quality: self.quality,
        }
    }
}

/// Lookup from interval set to chord quality.
///
/// Keys are root-relative, so one entry serves all twelve roots. Entries keep
/// the order in which their key was first registered; a later pattern with
/// the same key takes over the quality name (`aug7` and `7(♯5)` share
/// `[0,4,8,10]`, which therefore reads `7(♯5)`).
#[derive(Debug, Clone)]
pub struct ChordCatalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<CompleteInterval, usize>,
}

static GLOBAL: OnceLock<ChordCatalog> = OnceLock::new();

impl ChordCatalog {
    pub fn build(patterns: &[ChordPattern]) -> Self {
        let mut entries: Vec<CatalogEntry> = Vec::with_capacity(patterns.len());
        let mut index = HashMap::with_capacity(patterns.len());

        for pattern in patterns {
            let intervals = CompleteInterval::from_offsets(pattern.offsets);
            let existing = index.get(&intervals).copied();
            match existing {
                Some(slot) => {
                    let entry: &mut CatalogEntry = &mut entries[slot];
                    tracing::trace!(
                        intervals = %intervals,
                        replaced = entry.quality,
                        quality = pattern.quality,
                        "duplicate chord pattern"
                    );
                    entry.quality = pattern.quality;
                }
                None => {
                    index.insert(intervals.clone(), entries.len());
                    entries.push(CatalogEntry {
                        intervals,
                        quality: pattern.quality,
                    });
                }
            }
        }

        Self { entries, index }
    }

    /// Process-wide catalog over [`PATTERNS`], built on first use.
    pub fn global() -> &'static ChordCatalog {
        GLOBAL.get_or_init(|| Self::build(PATTERNS))
    }

    /// Exact key match.
    pub fn lookup(&self, intervals: &[u8]) -> Option<&CatalogEntry> {
        // Keys are stored normalised; an unsorted probe simply misses.
        let key = CompleteInterval(intervals.to_vec());
        self.index.get(&key).map(|&slot| &self.entries[slot])
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Every entry on every root: root-major, then registration order.
    pub fn expanded(&self) -> impl Iterator<Item = (ChordName, &CompleteInterval)> {
        PitchClass::all().flat_map(move |root| {
            self.entries
                .iter()
                .map(move |entry| (entry.name(root), &entry.intervals))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn complete_interval_adds_root_and_sorts() {
        let ci = CompleteInterval::from_offsets(&[7, 4, 7]);
        assert_eq!(ci.as_slice(), &[0, 4, 7]);
        assert_eq!(ci.to_string(), "[0,4,7]");
    }

    #[test]
    fn duplicate_keys_collapse() {
        let catalog = ChordCatalog::global();
        assert_eq!(PATTERNS.len(), 33);
        assert_eq!(catalog.len(), 32);

        let entry = catalog.lookup(&[0, 4, 8, 10]).unwrap();
        assert_eq!(entry.quality, "7(♯5)");

        // aug7 keeps its original slot, right after m7-5
        let qualities: Vec<_> = catalog.entries().map(|e| e.quality).collect();
        let pos = qualities.iter().position(|q| *q == "7(♯5)").unwrap();
        assert_eq!(qualities[pos - 1], "m7-5");
    }

    #[test]
    fn lookup_is_exact() {
        let catalog = ChordCatalog::global();
        assert_eq!(catalog.lookup(&[0, 4, 7]).unwrap().quality, "");
        assert_eq!(catalog.lookup(&[0, 3, 7, 10]).unwrap().quality, "m7");
        assert_eq!(catalog.lookup(&[0, 7]).unwrap().quality, "5");
        assert_eq!(catalog.lookup(&[0, 4, 7, 10, 14]).unwrap().quality, "9");
        assert!(catalog.lookup(&[0, 2, 4, 7, 10]).is_none());
        assert!(catalog.lookup(&[7, 4, 0]).is_none());
        assert!(catalog.lookup(&[]).is_none());
    }

    #[test]
    fn expansion_is_root_major() {
        let catalog = ChordCatalog::global();
        let expanded: Vec<_> = catalog.expanded().collect();
        assert_eq!(expanded.len(), 12 * catalog.len());

        assert_eq!(expanded[0].0.to_string(), "C");
        assert_eq!(expanded[1].0.to_string(), "Cm");
        assert_eq!(expanded[catalog.len()].0.to_string(), "C#");
        assert_eq!(expanded.last().unwrap().0.to_string(), "B5");
    }

    #[test]
    fn build_is_deterministic() {
        let a = ChordCatalog::build(PATTERNS);
        let b = ChordCatalog::build(PATTERNS);
        let a: Vec<_> = a.expanded().map(|(n, i)| (n.to_string(), i.clone())).collect();
        let b: Vec<_> = b.expanded().map(|(n, i)| (n.to_string(), i.clone())).collect();
        assert_eq!(a, b);
    }
}
