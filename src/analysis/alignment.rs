use serde::{Deserialize, Serialize};

use crate::score::types::NoteEvent;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentPolicy {
    /// Reference notes attacked with the melody note, or still sounding at
    /// its attack. Annotates the melody note.
    AttackSustain,
    /// Reference notes attacked anywhere in `[onset, onset + duration)` of the
    /// melody note. Annotates the reference note.
    OnsetContained,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Melody,
    Reference,
}

impl AlignmentPolicy {
    /// The side of a candidate pair that carries the annotation.
    pub fn annotated_role(self) -> Role {
        match self {
            AlignmentPolicy::AttackSustain => Role::Melody,
            AlignmentPolicy::OnsetContained => Role::Reference,
        }
    }

    /// Split a (melody, reference) pair into (annotated note, partner).
    pub fn assign<'n>(
        self,
        melody: &'n NoteEvent,
        reference: &'n NoteEvent,
    ) -> (&'n NoteEvent, &'n NoteEvent) {
        match self.annotated_role() {
            Role::Melody => (melody, reference),
            Role::Reference => (reference, melody),
        }
    }
}

/// Reference notes sounding against `melody` under `policy`, in onset order.
/// `reference` must be sorted by onset, as `ScoreStore::list_notes` returns it.
/// Rests never match.
pub fn sounding_against<'a>(
    melody: &NoteEvent,
    reference: &[&'a NoteEvent],
    policy: AlignmentPolicy,
) -> Vec<&'a NoteEvent> {
    let window: &[&'a NoteEvent] = match policy {
        AlignmentPolicy::AttackSustain => {
            let upto = reference.partition_point(|r| r.onset <= melody.onset);
            &reference[..upto]
        }
        AlignmentPolicy::OnsetContained => {
            let start = reference.partition_point(|r| r.onset < melody.onset);
            let end = reference.partition_point(|r| r.onset < melody.end());
            &reference[start..end.max(start)]
        }
    };

    window
        .iter()
        .copied()
        .filter(|r| !r.is_rest())
        .filter(|r| match policy {
            AlignmentPolicy::AttackSustain => r.onset == melody.onset || r.end() > melody.onset,
            AlignmentPolicy::OnsetContained => true,
        })
        .collect()
}
