// LilyPond output for annotated scores.
//
// Every part becomes a Staff and every MusicXML voice inside it a named Voice,
// written with absolute pitches. Annotations are sung against their voice
// through a `\lyricsto` Lyrics context, one syllable per attack, so they land
// directly under the note they describe. Chords count as one attack, and
// LilyPond treats tied continuations as melismata, so splitting a note at a
// barline does not shift the syllables that follow.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

use log::{debug, info, warn};

use crate::error::{AnnotateError, Result};
use crate::render::annotation::{Annotation, AnnotationKey, AnnotationTarget};
use crate::score::types::{Beats, Clef, KeyMode, KeySignature, NoteEvent, NoteId, Score, TimeSignature};
use crate::theory::pitch::{Letter, Pitch};

pub const LY_VERSION: &str = "2.24.0";

/// Expressible note values in quarter notes, largest first.
const DURATION_TABLE: [(i64, i64, &str); 13] = [
    (8, 1, "\\breve"),
    (6, 1, "1."),
    (4, 1, "1"),
    (3, 1, "2."),
    (2, 1, "2"),
    (3, 2, "4."),
    (1, 1, "4"),
    (3, 4, "8."),
    (1, 2, "8"),
    (3, 8, "16."),
    (1, 4, "16"),
    (1, 8, "32"),
    (1, 16, "64"),
];

/// Line of fifths starting from F, for key signatures.
const FIFTHS_FROM_F: [Letter; 7] = [
    Letter::F,
    Letter::C,
    Letter::G,
    Letter::D,
    Letter::A,
    Letter::E,
    Letter::B,
];

const VOICE_STYLES: [&str; 4] = ["\\voiceOne", "\\voiceTwo", "\\voiceThree", "\\voiceFour"];

fn pitch_name(letter: Letter, alter: i32) -> String {
    let mut name = letter.as_char().to_ascii_lowercase().to_string();
    let suffix = if alter > 0 { "is" } else { "es" };
    for _ in 0..alter.unsigned_abs() {
        name.push_str(suffix);
    }
    name
}

/// Absolute LilyPond pitch: `c` is C3, each `'` raises an octave and each `,`
/// lowers one.
pub fn pitch_to_ly(pitch: &Pitch) -> String {
    let mut ly = pitch_name(pitch.letter, pitch.alter);
    let marks = pitch.octave - 3;
    let mark = if marks > 0 { '\'' } else { ',' };
    for _ in 0..marks.unsigned_abs() {
        ly.push(mark);
    }
    ly
}

pub fn key_to_ly(key: &KeySignature) -> String {
    let position = match key.mode {
        KeyMode::Major => key.fifths + 1,
        KeyMode::Minor => key.fifths + 4,
    };
    let letter = FIFTHS_FROM_F[position.rem_euclid(7) as usize];
    let mode = match key.mode {
        KeyMode::Major => "major",
        KeyMode::Minor => "minor",
    };
    format!("\\key {} \\{}", pitch_name(letter, position.div_euclid(7)), mode)
}

/// Length of one bar in quarter notes; `None` for a degenerate signature.
fn bar_length(time: &TimeSignature) -> Option<Beats> {
    if time.beats == 0 || time.beat_type == 0 {
        return None;
    }
    Some(Beats::new(
        i64::from(time.beats) * 4,
        i64::from(time.beat_type),
    ))
}

/// Decompose a duration into LilyPond note values, largest first, meant to be
/// joined with ties. A duration the table cannot express exactly becomes a
/// single scaled quarter (`4*n/d`).
pub fn decompose_duration(duration: Beats) -> Vec<String> {
    let mut parts = Vec::new();
    let mut remaining = duration;
    for &(n, d, name) in &DURATION_TABLE {
        let value = Beats::new(n, d);
        while remaining >= value {
            parts.push(name.to_string());
            remaining -= value;
        }
    }
    if remaining > Beats::from_integer(0) {
        warn!(
            "Duration {} has no dotted note value, writing a scaled quarter",
            duration
        );
        return vec![format!("4*{}/{}", duration.numer(), duration.denom())];
    }
    parts
}

/// Split `[onset, onset + duration)` at every multiple of `bar`.
pub fn split_at_barlines(onset: Beats, duration: Beats, bar: Option<Beats>) -> Vec<Beats> {
    let bar = match bar {
        Some(bar) => bar,
        None => return vec![duration],
    };
    let mut fragments = Vec::new();
    let mut remaining = duration;
    let mut position = onset;
    while remaining > Beats::from_integer(0) {
        let bar_end = ((position / bar).floor() + Beats::from_integer(1)) * bar;
        let fragment = remaining.min(bar_end - position);
        fragments.push(fragment);
        remaining -= fragment;
        position += fragment;
    }
    fragments
}

fn clef_to_ly(clef: Clef) -> &'static str {
    match clef {
        Clef::Treble => "treble",
        Clef::Bass => "bass",
        Clef::Alto => "alto",
        Clef::Tenor => "tenor",
        Clef::Percussion => "percussion",
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// One attack (a note or chord) or a rest in a single voice.
#[derive(Debug)]
enum VoiceEvent<'s> {
    Chord {
        onset: Beats,
        duration: Beats,
        notes: Vec<&'s NoteEvent>,
    },
    Rest {
        onset: Beats,
        duration: Beats,
    },
}

impl VoiceEvent<'_> {
    fn onset(&self) -> Beats {
        match self {
            VoiceEvent::Chord { onset, .. } | VoiceEvent::Rest { onset, .. } => *onset,
        }
    }

    fn end(&self) -> Beats {
        match self {
            VoiceEvent::Chord { onset, duration, .. } | VoiceEvent::Rest { onset, duration } => {
                *onset + *duration
            }
        }
    }
}

/// Group one voice's notes (in onset order) into non-overlapping events.
/// Pitched notes without a readable pitch are written as rests.
fn collect_voice_events<'s>(notes: &[&'s NoteEvent]) -> Vec<VoiceEvent<'s>> {
    let mut events: Vec<VoiceEvent<'s>> = Vec::new();

    for &note in notes {
        if note.pitch.is_some() {
            if let Some(VoiceEvent::Chord {
                onset,
                duration,
                notes: members,
            }) = events.last_mut()
            {
                if *onset == note.onset {
                    if note.duration != *duration {
                        debug!(
                            "Chord note {} differs in length from its chord, using {}",
                            note.id, duration
                        );
                    }
                    members.push(note);
                    continue;
                }
            }
        }

        let cursor = events
            .last()
            .map(|e| e.end())
            .unwrap_or_else(|| Beats::from_integer(0));
        if note.onset < cursor {
            warn!(
                "Note {} overlaps the previous event in voice {} of part {}, not engraved",
                note.id, note.voice, note.part_id
            );
            continue;
        }

        if note.pitch.is_some() {
            events.push(VoiceEvent::Chord {
                onset: note.onset,
                duration: note.duration,
                notes: vec![note],
            });
        } else {
            events.push(VoiceEvent::Rest {
                onset: note.onset,
                duration: note.duration,
            });
        }
    }
    events
}

/// Append `body` once per note value of the span, optionally tied.
fn push_timed(out: &mut String, body: &str, onset: Beats, duration: Beats, bar: Option<Beats>, tie: bool) {
    let pieces: Vec<String> = split_at_barlines(onset, duration, bar)
        .into_iter()
        .flat_map(decompose_duration)
        .collect();
    for (i, piece) in pieces.iter().enumerate() {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "{}{}", body, piece);
        if tie && i + 1 < pieces.len() {
            out.push('~');
        }
    }
}

fn markup(annotations: &[&Annotation]) -> String {
    match annotations {
        [] => "\"\"".to_string(),
        [single] => format!("\\markup {{ \\tiny {} }}", single.text),
        several => {
            let lines: Vec<String> = several.iter().map(|a| format!("\\tiny {}", a.text)).collect();
            format!("\\markup \\column {{ {} }}", lines.join(" "))
        }
    }
}

/// A score being annotated, rendered to LilyPond source on demand.
pub struct LilypondDocument<'s> {
    score: &'s Score,
    annotations: BTreeMap<NoteId, BTreeMap<AnnotationKey, Annotation>>,
}

impl<'s> LilypondDocument<'s> {
    pub fn new(score: &'s Score) -> Self {
        LilypondDocument {
            score,
            annotations: BTreeMap::new(),
        }
    }

    /// Number of distinct annotations attached so far.
    pub fn annotation_count(&self) -> usize {
        self.annotations.values().map(BTreeMap::len).sum()
    }

    fn annotations_for(&self, note: NoteId) -> impl Iterator<Item = &Annotation> {
        self.annotations.get(&note).into_iter().flat_map(|m| m.values())
    }

    fn render_voice_music(&self, events: &[VoiceEvent], bar: Option<Beats>) -> String {
        let mut out = String::new();
        let mut cursor = Beats::from_integer(0);

        for event in events {
            if event.onset() > cursor {
                push_timed(&mut out, "s", cursor, event.onset() - cursor, bar, false);
            }
            match event {
                VoiceEvent::Chord { onset, duration, notes } => {
                    let pitches: Vec<String> = notes
                        .iter()
                        .filter_map(|n| n.pitch.as_ref())
                        .map(pitch_to_ly)
                        .collect();
                    let body = if pitches.len() == 1 {
                        pitches[0].clone()
                    } else {
                        format!("<{}>", pitches.join(" "))
                    };
                    push_timed(&mut out, &body, *onset, *duration, bar, true);
                }
                VoiceEvent::Rest { onset, duration } => {
                    push_timed(&mut out, "r", *onset, *duration, bar, false);
                }
            }
            cursor = event.end();
        }
        out
    }

    /// One syllable per attack; `None` when nothing in the voice is annotated.
    fn render_voice_lyrics(&self, events: &[VoiceEvent]) -> Option<String> {
        let mut syllables = Vec::new();
        let mut any = false;

        for event in events {
            if let VoiceEvent::Chord { notes, .. } = event {
                let attached: Vec<&Annotation> =
                    notes.iter().flat_map(|n| self.annotations_for(n.id)).collect();
                any |= !attached.is_empty();
                syllables.push(markup(&attached));
            }
        }

        if any {
            Some(syllables.join(" "))
        } else {
            None
        }
    }

    fn default_clef(notes: &[&NoteEvent]) -> Clef {
        let positions: Vec<i32> = notes
            .iter()
            .filter_map(|n| n.pitch.as_ref())
            .map(Pitch::chromatic_position)
            .collect();
        if positions.is_empty() {
            return Clef::Treble;
        }
        let mean = positions.iter().sum::<i32>() / positions.len() as i32;
        if mean < 60 {
            Clef::Bass
        } else {
            Clef::Treble
        }
    }

    /// Complete `.ly` source for the score and its annotations.
    pub fn to_lilypond(&self) -> String {
        let score = self.score;
        let bar = bar_length(&score.time);
        let mut ly = String::new();

        let _ = writeln!(ly, "\\version \"{}\"\n", LY_VERSION);

        let title = score.title.as_deref().unwrap_or(&score.work_id);
        let _ = writeln!(ly, "\\header {{\n  title = {}\n  tagline = ##f\n}}\n", quote(title));

        ly.push_str("global = {\n");
        let _ = writeln!(ly, "  {}", key_to_ly(&score.key));
        if bar.is_some() {
            let _ = writeln!(ly, "  \\time {}/{}", score.time.beats, score.time.beat_type);
        }
        ly.push_str("}\n\n");

        ly.push_str("\\score {\n  <<\n");

        for part in &score.parts {
            let mut notes: Vec<&NoteEvent> =
                score.notes.iter().filter(|n| n.part_id == part.id).collect();
            notes.sort_by(|a, b| a.onset.cmp(&b.onset).then(a.id.cmp(&b.id)));

            let mut voices: BTreeMap<&str, Vec<&NoteEvent>> = BTreeMap::new();
            for &note in &notes {
                voices.entry(note.voice.as_str()).or_default().push(note);
            }

            let clef = part.clef.unwrap_or_else(|| Self::default_clef(&notes));
            let _ = write!(ly, "    \\new Staff = {}", quote(&part.id));
            if let Some(name) = &part.name {
                let _ = write!(ly, " \\with {{ instrumentName = {} }}", quote(name));
            }
            let _ = writeln!(ly, " {{\n      \\clef {}\n      \\global\n      <<", clef_to_ly(clef));

            let mut lyrics = Vec::new();
            for (index, (voice, voice_notes)) in voices.iter().enumerate() {
                let events = collect_voice_events(voice_notes);
                let name = format!("{}-{}", part.id, voice);
                let style = if voices.len() > 1 {
                    VOICE_STYLES.get(index).map(|s| format!("{} ", s)).unwrap_or_default()
                } else {
                    String::new()
                };
                let _ = writeln!(
                    ly,
                    "        \\new Voice = {} {{ {}{} }}",
                    quote(&name),
                    style,
                    self.render_voice_music(&events, bar)
                );
                if let Some(text) = self.render_voice_lyrics(&events) {
                    lyrics.push((name, text));
                }
            }

            ly.push_str("      >>\n    }\n");
            for (name, text) in lyrics {
                let _ = writeln!(ly, "    \\new Lyrics \\lyricsto {} {{ {} }}", quote(&name), text);
            }
        }

        ly.push_str("  >>\n  \\layout { }\n}\n");
        ly
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render()?)?;
        info!(
            "Wrote {} with {} annotations to {}",
            self.score.work_id,
            self.annotation_count(),
            path.display()
        );
        Ok(())
    }
}

impl AnnotationTarget for LilypondDocument<'_> {
    fn attach(&mut self, annotation: Annotation) -> Result<()> {
        if annotation.work_id != self.score.work_id {
            return Err(AnnotateError::UnknownWork(annotation.work_id));
        }
        if self.score.note(annotation.note_id).is_none() {
            return Err(AnnotateError::UnknownNote(annotation.note_id));
        }
        self.annotations
            .entry(annotation.note_id)
            .or_default()
            .insert(annotation.key(), annotation);
        Ok(())
    }

    fn render(&self) -> Result<String> {
        Ok(self.to_lilypond())
    }
}
