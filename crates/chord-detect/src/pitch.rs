use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Absolute note number. MIDI uses 0–127 but nothing here depends on that.
pub type Pitch = i32;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Pitch identity modulo 12 (C=0, C#=1, ... B=11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchClass(u8);

impl PitchClass {
    /// All twelve pitch classes in ascending order.
    pub fn all() -> impl Iterator<Item = PitchClass> {
        (0..12u8).map(PitchClass)
    }

    /// Wraps any integer into 0..=11.
    pub fn new(value: i32) -> Self {
        Self(value.rem_euclid(12) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Sharp spelling: "C", "C#", ... "B".
    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.0 as usize]
    }

    /// Interval in semitones from `root` up to `self`, folded into 0..=11.
    pub fn interval_from(self, root: PitchClass) -> u8 {
        (self.0 + 12 - root.0) % 12
    }

    /// Look up a pitch class by its name. Accepts sharps or flats.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let letter = chars.next()?;
        let base: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };
        let offset = match chars.as_str() {
            "" => 0,
            "#" | "♯" => 1,
            "b" | "♭" => -1,
            _ => return None,
        };
        Some(Self::new(base + offset))
    }
}

impl std::fmt::Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub fn pitch_class(pitch: Pitch) -> PitchClass {
    PitchClass::new(pitch)
}

/// Note name with octave, where middle C (60) is "C4".
pub fn display_name(pitch: Pitch) -> String {
    let octave = pitch.div_euclid(12) - 1;
    format!("{}{}", pitch_class(pitch).name(), octave)
}

/// Parse either a decimal note number ("60", "-3") or a note name with
/// octave ("C4", "F#3", "Bb2", "C-1").
pub fn parse_pitch(text: &str) -> Result<Pitch> {
    let text = text.trim();
    if let Ok(number) = text.parse::<Pitch>() {
        return Ok(number);
    }

    let invalid = || Error::InvalidNote(text.to_string());

    // Name is the letter plus an optional accidental; everything after is the octave.
    let split = text
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_ascii_digit() || *c == '-')
        .map(|(i, _)| i)
        .ok_or_else(invalid)?;
    let (name, octave) = text.split_at(split);

    let pc = PitchClass::from_name(name).ok_or_else(invalid)?;
    let octave: Pitch = octave.parse().map_err(|_| invalid())?;

    // Cb and B# cross the octave boundary.
    let letter_pc = PitchClass::from_name(&name[..1]).ok_or_else(invalid)?;
    let carry = match (letter_pc.value(), pc.value()) {
        (0, 11) => -1,
        (11, 0) => 1,
        _ => 0,
    };

    octave
        .checked_add(1 + carry)
        .and_then(|o| o.checked_mul(12))
        .and_then(|base| base.checked_add(pc.value() as Pitch))
        .ok_or_else(invalid)
}
