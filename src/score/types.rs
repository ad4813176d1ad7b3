use num_rational::Rational64;
use serde::{Deserialize, Serialize};

use crate::theory::pitch::Pitch;

/// Unique within a work; assigned in storage order.
pub type NoteId = u32;

/// Score time measured in quarter notes.
pub type Beats = Rational64;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Pitch,
    Rest,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NoteEvent {
    pub id: NoteId,
    pub part_id: String,
    pub voice: String,
    pub onset: Beats,
    pub duration: Beats,
    pub kind: EventKind,
    /// `None` for rests, and for pitched notes whose pitch could not be read.
    pub pitch: Option<Pitch>,
    pub measure_number: u32,
    /// Shares its onset with the preceding note of the same part.
    pub chord: bool,
}

impl NoteEvent {
    pub fn pitched(part_id: &str, onset: Beats, duration: Beats, pitch: Pitch) -> Self {
        NoteEvent {
            id: 0,
            part_id: part_id.to_string(),
            voice: "1".to_string(),
            onset,
            duration,
            kind: EventKind::Pitch,
            pitch: Some(pitch),
            measure_number: 0,
            chord: false,
        }
    }

    pub fn rest(part_id: &str, onset: Beats, duration: Beats) -> Self {
        NoteEvent {
            id: 0,
            part_id: part_id.to_string(),
            voice: "1".to_string(),
            onset,
            duration,
            kind: EventKind::Rest,
            pitch: None,
            measure_number: 0,
            chord: false,
        }
    }

    pub fn end(&self) -> Beats {
        self.onset + self.duration
    }

    pub fn is_rest(&self) -> bool {
        self.kind == EventKind::Rest
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Clef {
    Treble,
    Bass,
    Alto,
    Tenor,
    Percussion,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PartInfo {
    pub id: String,
    pub name: Option<String>,
    pub clef: Option<Clef>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    #[default]
    Major,
    Minor,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeySignature {
    pub fifths: i32,
    pub mode: KeyMode,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSignature {
    pub beats: u8,
    pub beat_type: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature {
            beats: 4,
            beat_type: 4,
        }
    }
}

/// A single work: its parts and every note and rest in them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Score {
    pub work_id: String,
    pub title: Option<String>,
    pub parts: Vec<PartInfo>,
    pub notes: Vec<NoteEvent>,
    pub key: KeySignature,
    pub time: TimeSignature,
    pub total_beats: Beats,
}

impl Score {
    pub fn new(work_id: &str) -> Self {
        Score {
            work_id: work_id.to_string(),
            title: None,
            parts: Vec::new(),
            notes: Vec::new(),
            key: KeySignature::default(),
            time: TimeSignature::default(),
            total_beats: Beats::from_integer(0),
        }
    }

    pub fn add_part(&mut self, id: &str, name: Option<&str>) {
        if self.part(id).is_none() {
            self.parts.push(PartInfo {
                id: id.to_string(),
                name: name.map(str::to_string),
                clef: None,
            });
        }
    }

    /// Append a note, assigning it the next id. Its part is registered if new.
    pub fn push(&mut self, mut note: NoteEvent) -> NoteId {
        let id = self.notes.len() as NoteId;
        note.id = id;
        self.add_part(&note.part_id, None);
        if note.end() > self.total_beats {
            self.total_beats = note.end();
        }
        self.notes.push(note);
        id
    }

    pub fn part(&self, id: &str) -> Option<&PartInfo> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn note(&self, id: NoteId) -> Option<&NoteEvent> {
        self.notes.iter().find(|n| n.id == id)
    }
}
