use crate::error::{AnnotateError, Result};
use crate::score::types::{EventKind, NoteEvent, Score};
use crate::theory::pitch::Pitch;

/// Read access to the notes of one or more works.
pub trait ScoreStore {
    /// Notes of `work`, optionally restricted to a part and an event kind,
    /// ordered by onset and then by insertion order.
    fn list_notes(
        &self,
        work: &str,
        part: Option<&str>,
        kind: Option<EventKind>,
    ) -> Result<Vec<&NoteEvent>>;

    /// Pitch of a `pitch`-type note.
    fn pitch_of(&self, note: &NoteEvent) -> Result<Pitch>;
}

impl ScoreStore for Score {
    fn list_notes(
        &self,
        work: &str,
        part: Option<&str>,
        kind: Option<EventKind>,
    ) -> Result<Vec<&NoteEvent>> {
        if work != self.work_id {
            return Err(AnnotateError::UnknownWork(work.to_string()));
        }
        if let Some(part) = part {
            if self.part(part).is_none() {
                return Err(AnnotateError::UnknownPart(part.to_string()));
            }
        }

        let mut notes: Vec<&NoteEvent> = self
            .notes
            .iter()
            .filter(|n| part.map_or(true, |p| n.part_id == p))
            .filter(|n| kind.map_or(true, |k| n.kind == k))
            .collect();
        notes.sort_by(|a, b| a.onset.cmp(&b.onset).then(a.id.cmp(&b.id)));
        Ok(notes)
    }

    fn pitch_of(&self, note: &NoteEvent) -> Result<Pitch> {
        match (note.kind, note.pitch) {
            (EventKind::Pitch, Some(pitch)) => Ok(pitch),
            _ => Err(AnnotateError::MalformedPitch { note: note.id }),
        }
    }
}
