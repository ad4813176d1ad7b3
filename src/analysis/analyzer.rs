use log::{debug, info, warn};
use serde::Serialize;

use crate::analysis::alignment::{sounding_against, AlignmentPolicy};
use crate::analysis::classifier::{ClassificationScheme, Classifier, Verdict};
use crate::error::{AnnotateError, Result};
use crate::score::store::ScoreStore;
use crate::score::types::{EventKind, NoteEvent, NoteId};
use crate::theory::interval::{Dyad, Interval};

/// One classified (note, interval) pair. `note_id` is the note that carries
/// the annotation and `partner_id` the note it was measured against.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Finding {
    pub work_id: String,
    pub policy: AlignmentPolicy,
    pub scheme: ClassificationScheme,
    pub note_id: NoteId,
    pub part_id: String,
    pub voice: String,
    pub partner_id: NoteId,
    pub interval: Interval,
    pub verdict: Verdict,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SkippedNote {
    pub note_id: NoteId,
    pub reason: String,
}

#[derive(Serialize, Clone, Debug, Default)]
pub struct Analysis {
    pub findings: Vec<Finding>,
    pub skipped: Vec<SkippedNote>,
}

impl Analysis {
    fn skip(&mut self, note: &NoteEvent, error: AnnotateError) {
        if self.skipped.iter().any(|s| s.note_id == note.id) {
            return;
        }
        warn!(
            "Skipping note {} (part {}, measure {}): {}",
            note.id, note.part_id, note.measure_number, error
        );
        self.skipped.push(SkippedNote {
            note_id: note.id,
            reason: error.to_string(),
        });
    }

    /// Fold another pass into this one.
    pub fn merge(&mut self, other: Analysis) {
        self.findings.extend(other.findings);
        for skipped in other.skipped {
            if !self.skipped.iter().any(|s| s.note_id == skipped.note_id) {
                self.skipped.push(skipped);
            }
        }
    }
}

/// Classify every interval the melody part forms against the reference part
/// under one alignment policy and one classification scheme.
///
/// Intervals are always measured with the melody note in the upper role,
/// whichever note the policy annotates. A note whose pitch cannot be resolved
/// is skipped and reported; the rest of the pass carries on.
pub fn analyze<S: ScoreStore + ?Sized>(
    store: &S,
    work: &str,
    melody_part: &str,
    reference_part: &str,
    policy: AlignmentPolicy,
    scheme: ClassificationScheme,
) -> Result<Analysis> {
    let classifier = Classifier::new(scheme)?;
    let melody = store.list_notes(work, Some(melody_part), Some(EventKind::Pitch))?;
    let reference = store.list_notes(work, Some(reference_part), Some(EventKind::Pitch))?;

    info!(
        "Analyzing {}: {} ({} notes) against {} ({} notes), {:?} / {:?}",
        work,
        melody_part,
        melody.len(),
        reference_part,
        reference.len(),
        policy,
        scheme
    );

    let mut analysis = Analysis::default();

    for m in &melody {
        let melody_pitch = match store.pitch_of(m) {
            Ok(pitch) => pitch,
            Err(e) => {
                analysis.skip(m, e);
                continue;
            }
        };

        for r in sounding_against(m, &reference, policy) {
            let reference_pitch = match store.pitch_of(r) {
                Ok(pitch) => pitch,
                Err(e) => {
                    analysis.skip(r, e);
                    continue;
                }
            };

            let interval = Dyad {
                upper: melody_pitch,
                lower: reference_pitch,
            }
            .interval();
            let verdict = classifier.classify(&interval);
            let (target, partner) = policy.assign(m, r);

            debug!(
                "note {} vs {}: {} {}{:?}",
                target.id,
                partner.id,
                interval,
                if verdict.is_flagged() { "! " } else { "" },
                verdict
            );

            analysis.findings.push(Finding {
                work_id: work.to_string(),
                policy,
                scheme,
                note_id: target.id,
                part_id: target.part_id.clone(),
                voice: target.voice.clone(),
                partner_id: partner.id,
                interval,
                verdict,
            });
        }
    }

    info!(
        "{:?} / {:?}: {} findings, {} skipped notes",
        policy,
        scheme,
        analysis.findings.len(),
        analysis.skipped.len()
    );

    Ok(analysis)
}
