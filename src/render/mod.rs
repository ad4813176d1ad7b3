pub mod annotation;
pub mod lilypond;
