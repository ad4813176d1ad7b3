use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::theory::interval::Interval;

/// Consonances of strict two-voice writing. The perfect fourth is absent.
const CONSONANT_TOKENS: [&str; 6] = ["P1", "m3", "M3", "P5", "m6", "M6"];

/// Dissonant interval classes; the quality of each token is ignored.
const DISSONANT_CLASS_TOKENS: [&str; 3] = ["M2", "P4", "M7"];

/// True iff `interval`, folded into the octave, has the quality and size of `target`.
pub fn equate_type(interval: &Interval, target: &Interval) -> bool {
    let simple = interval.reduce_to_simple();
    simple.quality == target.quality && simple.size == target.size
}

/// True iff `interval`, folded into the octave, has the size of `target`.
pub fn equate_class(interval: &Interval, target: &Interval) -> bool {
    interval.reduce_to_simple().size == target.size
}

/// Same quality and size with no octave folding (`M3` does not match `M10`).
pub fn equate_exact(interval: &Interval, target: &Interval) -> bool {
    interval.quality == target.quality && interval.size == target.size
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationScheme {
    /// Consonant iff the interval type matches a listed consonance.
    ConsonanceByType,
    /// Dissonant iff the interval class is a second, fourth or seventh.
    DissonanceByClass,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Consonant,
    Dissonant,
}

impl Verdict {
    /// Dissonances get the flagged rendering.
    pub fn is_flagged(self) -> bool {
        self == Verdict::Dissonant
    }
}

#[derive(Clone, Debug)]
pub struct Classifier {
    scheme: ClassificationScheme,
    targets: Vec<Interval>,
}

impl Classifier {
    pub fn new(scheme: ClassificationScheme) -> Result<Self> {
        let tokens: &[&str] = match scheme {
            ClassificationScheme::ConsonanceByType => &CONSONANT_TOKENS,
            ClassificationScheme::DissonanceByClass => &DISSONANT_CLASS_TOKENS,
        };
        let targets = tokens
            .iter()
            .map(|t| t.parse::<Interval>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Classifier { scheme, targets })
    }

    pub fn scheme(&self) -> ClassificationScheme {
        self.scheme
    }

    pub fn classify(&self, interval: &Interval) -> Verdict {
        match self.scheme {
            ClassificationScheme::ConsonanceByType => {
                if self.targets.iter().any(|t| equate_type(interval, t)) {
                    Verdict::Consonant
                } else {
                    Verdict::Dissonant
                }
            }
            ClassificationScheme::DissonanceByClass => {
                if self.targets.iter().any(|t| equate_class(interval, t)) {
                    Verdict::Dissonant
                } else {
                    Verdict::Consonant
                }
            }
        }
    }
}
