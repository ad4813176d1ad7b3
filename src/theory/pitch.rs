use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnnotateError;
use crate::theory::interval::{Direction, Interval};

/// Diatonic letter class, in scale order from C.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Steps above C within the octave (C = 0, B = 6).
    pub fn index(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    /// Semitones above C of the natural (unaltered) note.
    pub fn natural_semitones(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn from_index(index: i32) -> Letter {
        Letter::ALL[index.rem_euclid(7) as usize]
    }

    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

/// A spelled pitch: letter, chromatic alteration in semitones, and octave
/// (octave 4 starts on middle C).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub letter: Letter,
    pub alter: i32,
    pub octave: i32,
}

impl Pitch {
    pub fn new(letter: Letter, alter: i32, octave: i32) -> Self {
        Pitch {
            letter,
            alter,
            octave,
        }
    }

    /// Absolute semitone value, aligned with MIDI numbering (C4 = 60).
    pub fn chromatic_position(&self) -> i32 {
        (self.octave + 1) * 12 + self.letter.natural_semitones() + self.alter
    }

    /// Absolute diatonic step value; alteration is ignored.
    pub fn diatonic_position(&self) -> i32 {
        self.octave * 7 + self.letter.index()
    }

    /// Rebuild a pitch from its two absolute positions. The diatonic position
    /// fixes the letter and octave, the chromatic one the alteration.
    pub fn from_positions(diatonic: i32, chromatic: i32) -> Self {
        let natural = Pitch::new(Letter::from_index(diatonic), 0, diatonic.div_euclid(7));
        Pitch {
            alter: chromatic - natural.chromatic_position(),
            ..natural
        }
    }

    /// Same letter and alteration in any octave.
    pub fn same_class(&self, other: &Pitch) -> bool {
        self.letter == other.letter && self.alter == other.alter
    }

    /// Move this pitch by `interval`, keeping the spelling the interval implies.
    /// Intervals without a direction are applied upwards.
    pub fn transpose(&self, interval: &Interval) -> Pitch {
        let sign = match interval.direction {
            Some(Direction::Down) => -1,
            _ => 1,
        };
        let steps = interval.size as i32 - 1;
        Pitch::from_positions(
            self.diatonic_position() + sign * steps,
            self.chromatic_position() + sign * interval.semitones(),
        )
    }
}

/// Notational order: by letter position, then by alteration. Enharmonic
/// spellings are distinct and `G#4 < Ab4`.
impl Ord for Pitch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.diatonic_position()
            .cmp(&other.diatonic_position())
            .then(self.alter.cmp(&other.alter))
    }
}

impl PartialOrd for Pitch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_char())?;
        let accidental = if self.alter > 0 { "#" } else { "b" };
        for _ in 0..self.alter.unsigned_abs() {
            f.write_str(accidental)?;
        }
        write!(f, "{}", self.octave)
    }
}

impl FromStr for Pitch {
    type Err = AnnotateError;

    /// Parse pitch text such as `C4`, `Bb3`, `F##5`, `gx2` or `E` (octave 4).
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || AnnotateError::InvalidPitchText(text.to_string());
        let text = text.trim();
        let mut chars = text.chars();
        let letter = chars.next().and_then(Letter::from_char).ok_or_else(invalid)?;

        let rest = chars.as_str();
        let octave_start = rest
            .find(|c: char| c == '-' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (accidentals, octave_str) = rest.split_at(octave_start);

        let mut alter = 0;
        for c in accidentals.chars() {
            alter += match c {
                '#' => 1,
                'x' => 2,
                'b' => -1,
                _ => return Err(invalid()),
            };
        }

        let octave = if octave_str.is_empty() {
            4
        } else {
            octave_str.parse().map_err(|_| invalid())?
        };

        Ok(Pitch::new(letter, alter, octave))
    }
}
