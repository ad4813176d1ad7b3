use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnnotateError;
use crate::theory::interval::{Interval, Quality};
use crate::theory::pitch::{Letter, Pitch};

const MAJOR_STEPS: [Quality; 7] = [
    Quality::Major,
    Quality::Major,
    Quality::Minor,
    Quality::Major,
    Quality::Major,
    Quality::Major,
    Quality::Minor,
];

const NATURAL_MINOR_STEPS: [Quality; 7] = [
    Quality::Major,
    Quality::Minor,
    Quality::Major,
    Quality::Major,
    Quality::Minor,
    Quality::Major,
    Quality::Major,
];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKind {
    Major,
    NaturalMinor,
    /// Natural minor with a raised seventh; the `m` in `Am`.
    HarmonicMinor,
}

impl ScaleKind {
    /// Seconds between consecutive degrees, tonic to octave.
    fn steps(self) -> [Interval; 7] {
        let qualities = match self {
            ScaleKind::Major => MAJOR_STEPS,
            ScaleKind::NaturalMinor | ScaleKind::HarmonicMinor => NATURAL_MINOR_STEPS,
        };
        let mut steps = qualities.map(|q| Interval::new(q, 2));
        if self == ScaleKind::HarmonicMinor {
            steps[5] = Interval::new(Quality::Augmented(1), 2);
            steps[6] = Interval::new(Quality::Minor, 2);
        }
        steps
    }
}

/// One octave of a scale, tonic to tonic, spelled by stacking seconds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Scale {
    pub tonic: Pitch,
    pub kind: ScaleKind,
    pub pitches: Vec<Pitch>,
}

impl Scale {
    pub fn new(tonic: Pitch, kind: ScaleKind) -> Self {
        let mut pitches = vec![tonic];
        for step in kind.steps() {
            let next = pitches[pitches.len() - 1].transpose(&step);
            pitches.push(next);
        }
        Scale {
            tonic,
            kind,
            pitches,
        }
    }

    /// Exact membership: spelling and octave must both match.
    pub fn contains(&self, pitch: &Pitch) -> bool {
        self.pitches.contains(pitch)
    }

    /// Membership in any octave, still respecting spelling (`Ab` is not `G#`).
    pub fn contains_class(&self, pitch: &Pitch) -> bool {
        self.pitches.iter().any(|p| p.same_class(pitch))
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.pitches.iter().map(Pitch::to_string).collect();
        f.write_str(&names.join(" "))
    }
}

impl FromStr for Scale {
    type Err = AnnotateError;

    /// Key names such as `CM`, `Am`, `F#M` or `Bbm`, built from octave 4. A
    /// lower-case `m` is harmonic minor.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let unknown = || AnnotateError::UnknownScale(text.to_string());
        let text = text.trim();
        let mut chars = text.chars();
        let letter = chars.next().and_then(Letter::from_char).ok_or_else(unknown)?;

        let rest = chars.as_str();
        let (alter, kind) = match rest {
            "M" => (0, ScaleKind::Major),
            "m" => (0, ScaleKind::HarmonicMinor),
            "#M" => (1, ScaleKind::Major),
            "#m" => (1, ScaleKind::HarmonicMinor),
            "bM" => (-1, ScaleKind::Major),
            "bm" => (-1, ScaleKind::HarmonicMinor),
            _ => return Err(unknown()),
        };

        Ok(Scale::new(Pitch::new(letter, alter, 4), kind))
    }
}
