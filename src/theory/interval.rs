use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnnotateError;
use crate::theory::pitch::Pitch;

/// Semitones spanned by the perfect or major interval of each simple size,
/// indexed by diatonic steps (unison = 0).
const REFERENCE_SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quality {
    /// Diminished `n` times (`d`, `dd`, ...).
    Diminished(u8),
    Minor,
    Perfect,
    Major,
    /// Augmented `n` times (`A`, `AA`, ...).
    Augmented(u8),
}

impl Quality {
    /// Quality of an interval whose chromatic span differs from the perfect or
    /// major reference of its size by `offset` semitones.
    fn from_offset(perfect_class: bool, offset: i32) -> Quality {
        let times = |n: i32| u8::try_from(n).unwrap_or(u8::MAX);
        match (perfect_class, offset) {
            (true, 0) => Quality::Perfect,
            (false, 0) => Quality::Major,
            (false, -1) => Quality::Minor,
            (_, n) if n > 0 => Quality::Augmented(times(n)),
            (true, n) => Quality::Diminished(times(-n)),
            (false, n) => Quality::Diminished(times(-n - 1)),
        }
    }

    /// Inverse of `from_offset`.
    fn offset(self, perfect_class: bool) -> i32 {
        match self {
            Quality::Perfect | Quality::Major => 0,
            Quality::Minor => -1,
            Quality::Augmented(n) => n as i32,
            Quality::Diminished(n) if perfect_class => -(n as i32),
            Quality::Diminished(n) => -(n as i32) - 1,
        }
    }

    fn fits_size(self, size: u32) -> bool {
        match self {
            Quality::Perfect => is_perfect_class(size),
            Quality::Major | Quality::Minor => !is_perfect_class(size),
            Quality::Diminished(_) | Quality::Augmented(_) => true,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Minor => f.write_str("m"),
            Quality::Perfect => f.write_str("P"),
            Quality::Major => f.write_str("M"),
            Quality::Diminished(n) => f.write_str(&"d".repeat(*n as usize)),
            Quality::Augmented(n) => f.write_str(&"A".repeat(*n as usize)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Unison,
}

fn is_perfect_class(size: u32) -> bool {
    matches!((size.max(1) - 1) % 7, 0 | 3 | 4)
}

fn reference_semitones(size: u32) -> i32 {
    let steps = size.max(1) - 1;
    REFERENCE_SEMITONES[(steps % 7) as usize] + 12 * (steps / 7) as i32
}

/// A harmonic interval: quality, generic size (1 = unison, 8 = octave,
/// 10 = tenth) and direction. Intervals parsed from text have no direction.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    pub quality: Quality,
    pub size: u32,
    pub direction: Option<Direction>,
}

/// Two simultaneous pitches with their roles named, so that an interval is
/// never computed with the arguments swapped by accident.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dyad {
    pub upper: Pitch,
    pub lower: Pitch,
}

impl Dyad {
    pub fn interval(&self) -> Interval {
        Interval::between(self.upper, self.lower)
    }
}

impl Interval {
    pub fn new(quality: Quality, size: u32) -> Self {
        Interval {
            quality,
            size,
            direction: None,
        }
    }

    /// Interval from `lower` to `upper`. If `upper` actually sits below
    /// `lower` the direction is `Down`; size and quality are the same either
    /// way round.
    pub fn between(upper: Pitch, lower: Pitch) -> Self {
        let mut steps = upper.diatonic_position() - lower.diatonic_position();
        let mut semitones = upper.chromatic_position() - lower.chromatic_position();

        let direction = match steps.cmp(&0).then(semitones.cmp(&0)) {
            std::cmp::Ordering::Greater => Direction::Up,
            std::cmp::Ordering::Less => Direction::Down,
            std::cmp::Ordering::Equal => Direction::Unison,
        };
        if direction == Direction::Down {
            steps = -steps;
            semitones = -semitones;
        }

        let size = steps.unsigned_abs() + 1;
        Interval {
            quality: Quality::from_offset(
                is_perfect_class(size),
                semitones - reference_semitones(size),
            ),
            size,
            direction: Some(direction),
        }
    }

    /// Chromatic span in semitones.
    pub fn semitones(&self) -> i32 {
        reference_semitones(self.size) + self.quality.offset(is_perfect_class(self.size))
    }

    /// Whole octaves spanned (0 for simple intervals, 1 for a tenth).
    pub fn octaves(&self) -> u32 {
        (self.size.max(1) - 1) / 7
    }

    /// Fold a compound interval into the octave: size `s` becomes
    /// `((s - 1) mod 7) + 1`. Quality and direction are kept.
    pub fn reduce_to_simple(&self) -> Interval {
        Interval {
            size: (self.size.max(1) - 1) % 7 + 1,
            ..*self
        }
    }
}

/// Canonical short form, e.g. `M3`, `P5`, `dd7`, `M10`.
impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quality, self.size)
    }
}

impl FromStr for Interval {
    type Err = AnnotateError;

    /// Accepts `M3`, `m6`, `P5`, `AA4`, `dd7`, ordinal forms such as `M3rd`,
    /// and the octave-prefixed compound form `1+M3` (a major tenth).
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let unknown = || AnnotateError::UnknownIntervalToken(text.to_string());
        let token = text.trim();

        let (octaves, token) = match token.split_once('+') {
            Some((octaves, rest)) => (octaves.parse::<u32>().map_err(|_| unknown())?, rest),
            None => (0, token),
        };

        let digits_start = token.find(|c: char| c.is_ascii_digit()).ok_or_else(unknown)?;
        let (quality_str, rest) = token.split_at(digits_start);
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (numeral, suffix) = rest.split_at(digits_end);

        if !matches!(suffix, "" | "st" | "nd" | "rd" | "th") {
            return Err(unknown());
        }

        let quality = match quality_str {
            "P" => Quality::Perfect,
            "M" => Quality::Major,
            "m" => Quality::Minor,
            s if !s.is_empty() && s.len() <= u8::MAX as usize && s.chars().all(|c| c == 'd') => {
                Quality::Diminished(s.len() as u8)
            }
            s if !s.is_empty() && s.len() <= u8::MAX as usize && s.chars().all(|c| c == 'A') => {
                Quality::Augmented(s.len() as u8)
            }
            _ => return Err(unknown()),
        };

        let size = numeral.parse::<u32>().map_err(|_| unknown())?;
        if size == 0 {
            return Err(unknown());
        }
        let size = size + 7 * octaves;
        if !quality.fits_size(size) {
            return Err(unknown());
        }

        Ok(Interval::new(quality, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(text: &str) -> Pitch {
        text.parse().unwrap()
    }

    fn between(upper: &str, lower: &str) -> Interval {
        Interval::between(p(upper), p(lower))
    }

    #[test]
    fn test_unison_of_identical_pitches() {
        for text in ["C4", "F#2", "Bbb6", "E-1"] {
            let i = between(text, text);
            assert_eq!(i.quality, Quality::Perfect);
            assert_eq!(i.size, 1);
            assert_eq!(i.direction, Some(Direction::Unison));
        }
    }

    #[test]
    fn test_simple_intervals_above_bass() {
        assert_eq!(between("G4", "C4").to_string(), "P5");
        assert_eq!(between("G4", "E4").to_string(), "m3");
        assert_eq!(between("F#4", "Eb4").to_string(), "A2");
        assert_eq!(between("B4", "D5").to_string(), "m3");
        assert_eq!(between("F4", "B3").to_string(), "d5");
        assert_eq!(between("B3", "F3").to_string(), "A4");
        assert_eq!(between("C5", "E4").to_string(), "m6");
        assert_eq!(between("C#4", "C4").to_string(), "A1");
    }

    #[test]
    fn test_compound_intervals() {
        assert_eq!(between("D6", "G2").to_string(), "P26");
        assert_eq!(between("E5", "C4").to_string(), "M10");
        assert_eq!(between("C5", "C4").to_string(), "P8");
        assert_eq!(between("C6", "C4").to_string(), "P15");
        assert_eq!(between("F#4", "C1").to_string(), "A25");
    }

    #[test]
    fn test_enharmonic_spellings_differ() {
        assert_eq!(between("C5", "B#4").to_string(), "d2");
        assert_eq!(between("Cbbb5", "B##4").size, 2);
        assert_eq!(between("Ab4", "C4").to_string(), "m6");
        assert_eq!(between("G#4", "C4").to_string(), "A5");
    }

    #[test]
    fn test_reversal_flips_direction_only() {
        let pairs = [
            ("G4", "C4"),
            ("Eb4", "F#4"),
            ("D5", "B4"),
            ("F#4", "C1"),
            ("C#4", "C4"),
            ("B#3", "C4"),
        ];
        for (a, b) in pairs {
            let up = between(a, b);
            let down = between(b, a);
            assert_eq!(up.quality, down.quality, "{} / {}", a, b);
            assert_eq!(up.size, down.size, "{} / {}", a, b);
            let flipped = match up.direction {
                Some(Direction::Up) => Some(Direction::Down),
                Some(Direction::Down) => Some(Direction::Up),
                other => other,
            };
            assert_eq!(down.direction, flipped, "{} / {}", a, b);
        }
    }

    #[test]
    fn test_melody_below_reference_is_down() {
        let dyad = Dyad {
            upper: p("E3"),
            lower: p("C4"),
        };
        let i = dyad.interval();
        assert_eq!(i.direction, Some(Direction::Down));
        assert_eq!(i.to_string(), "m6");
    }

    #[test]
    fn test_reduce_to_simple() {
        let tenth = Interval::new(Quality::Major, 10);
        assert_eq!(tenth.reduce_to_simple(), Interval::new(Quality::Major, 3));

        let octave = Interval::new(Quality::Perfect, 8);
        assert_eq!(octave.reduce_to_simple().size, 1);
        assert_eq!(octave.reduce_to_simple().quality, Quality::Perfect);

        assert_eq!(Interval::new(Quality::Perfect, 15).reduce_to_simple().size, 1);
        assert_eq!(Interval::new(Quality::Minor, 7).reduce_to_simple().size, 7);
        assert_eq!(Interval::new(Quality::Perfect, 1).reduce_to_simple().size, 1);
    }

    #[test]
    fn test_reduce_to_simple_is_idempotent() {
        for size in 1..=30 {
            let i = Interval::new(Quality::Augmented(1), size);
            let once = i.reduce_to_simple();
            assert_eq!(once.reduce_to_simple(), once);
        }
        let computed = between("D6", "G2");
        assert_eq!(
            computed.reduce_to_simple().reduce_to_simple(),
            computed.reduce_to_simple()
        );
        assert_eq!(computed.reduce_to_simple().direction, Some(Direction::Up));
    }

    #[test]
    fn test_canonical_tokens_roundtrip() {
        for token in ["P1", "m2", "M2", "m3", "M3", "P4", "P5", "m6", "M6", "m7", "M7"] {
            let parsed: Interval = token.parse().unwrap();
            assert_eq!(parsed.to_string(), token);
            assert_eq!(parsed.direction, None);
        }
    }

    #[test]
    fn test_parse_extended_forms() {
        let tenth: Interval = "1+M3".parse().unwrap();
        assert_eq!(tenth, Interval::new(Quality::Major, 10));
        assert_eq!(tenth.octaves(), 1);

        let third: Interval = "m3rd".parse().unwrap();
        assert_eq!(third, Interval::new(Quality::Minor, 3));

        let fourth: Interval = "AA4".parse().unwrap();
        assert_eq!(fourth.quality, Quality::Augmented(2));
        assert_eq!(fourth.to_string(), "AA4");

        let sixth: Interval = "dd6".parse().unwrap();
        assert_eq!(sixth.quality, Quality::Diminished(2));
    }

    #[test]
    fn test_parse_rejects_unknown_tokens() {
        for token in ["", "3", "X3", "M0", "P3", "M5", "m4", "Md3", "M3x", "q+M3", "mm3"] {
            assert!(token.parse::<Interval>().is_err(), "{}", token);
        }
    }

    #[test]
    fn test_semitones() {
        let cases = [
            ("P1", 0),
            ("m2", 1),
            ("M3", 4),
            ("P4", 5),
            ("A4", 6),
            ("d5", 6),
            ("m6", 8),
            ("d7", 9),
            ("P8", 12),
            ("M10", 16),
        ];
        for (token, semitones) in cases {
            let i: Interval = token.parse().unwrap();
            assert_eq!(i.semitones(), semitones, "{}", token);
        }
    }
}
