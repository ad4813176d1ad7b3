use thiserror::Error;

use crate::score::types::NoteId;

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Malformed score: {0}")]
    MalformedScore(String),
    #[error("Note {note} has no resolvable pitch")]
    MalformedPitch { note: NoteId },
    #[error("Invalid pitch text: {0}")]
    InvalidPitchText(String),
    #[error("Unknown interval token: {0}")]
    UnknownIntervalToken(String),
    #[error("Unknown scale: {0}")]
    UnknownScale(String),
    #[error("Unknown work: {0}")]
    UnknownWork(String),
    #[error("Unknown part: {0}")]
    UnknownPart(String),
    #[error("Unknown note: {0}")]
    UnknownNote(NoteId),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnnotateError>;
