use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{AnnotateError, Result};
use crate::score::types::{
    Beats, Clef, EventKind, KeyMode, KeySignature, NoteEvent, Score, TimeSignature,
};
use crate::theory::pitch::{Letter, Pitch};

fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| std::str::from_utf8(&a.value).ok().map(str::to_string))
}

fn clef_from(sign: &str, line: Option<u32>) -> Option<Clef> {
    match (sign, line) {
        ("G", _) => Some(Clef::Treble),
        ("F", _) => Some(Clef::Bass),
        ("C", Some(4)) => Some(Clef::Tenor),
        ("C", _) => Some(Clef::Alto),
        ("percussion", _) => Some(Clef::Percussion),
        _ => None,
    }
}

fn parse_divs(text: &str, what: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| AnnotateError::MalformedScore(format!("{} is not an integer: {}", what, text)))
}

/// Pitch fields of the `<note>` being read.
#[derive(Default)]
struct PitchFields {
    step: Option<String>,
    alter: i32,
    octave: Option<i32>,
    unreadable: bool,
}

impl PitchFields {
    fn resolve(&self) -> Option<Pitch> {
        if self.unreadable {
            return None;
        }
        let step = self.step.as_deref()?;
        let mut chars = step.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) => Letter::from_char(c)?,
            _ => return None,
        };
        Some(Pitch::new(letter, self.alter, self.octave?))
    }
}

/// Load a `score-partwise` MusicXML document.
///
/// Onsets are exact fractions of a quarter note. The returned notes are ordered
/// by onset, simultaneous notes keeping document order, and ids follow that
/// order. Grace notes and zero-length notes are dropped; a negative duration is
/// an error. A pitched note whose pitch cannot be read is kept without one.
///
/// The score carries a single key and time signature: the first of each in the
/// document. Later changes are ignored with a warning, so barlines after a
/// metre change are not placed where the source puts them.
pub fn parse_musicxml(xml: &str) -> Result<Score> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut current_tag: Option<&'static str> = None;

    // Score-level metadata
    let mut title: Option<String> = None;
    let mut part_names: Vec<(String, Option<String>)> = Vec::new();
    let mut key: Option<KeySignature> = None;
    let mut time: Option<TimeSignature> = None;

    // Part state
    let mut part_id: Option<String> = None;
    let mut divisions: i64 = 1;
    let mut cursor = Beats::from_integer(0);
    let mut last_onset = Beats::from_integer(0);
    let mut measure_number: u32 = 0;
    let mut clefs: Vec<(String, Clef)> = Vec::new();

    // Attribute blocks
    let mut key_fifths: Option<i32> = None;
    let mut key_mode = KeyMode::Major;
    let mut time_beats: Option<u8> = None;
    let mut time_beat_type: Option<u8> = None;
    let mut in_clef = false;
    let mut clef_sign: Option<String> = None;
    let mut clef_line: Option<u32> = None;

    // Cursor moves
    let mut in_backup = false;
    let mut in_forward = false;
    let mut move_divs: Option<i64> = None;

    // Note state
    let mut in_note = false;
    let mut note_is_rest = false;
    let mut note_is_chord = false;
    let mut note_is_grace = false;
    let mut note_duration: Option<i64> = None;
    let mut note_voice: Option<String> = None;
    let mut pitch = PitchFields::default();

    // Document order; sorted by onset once the whole document is read
    let mut collected: Vec<NoteEvent> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"score-part" => {
                    if let Some(id) = attribute(e, b"id") {
                        part_names.push((id, None));
                    }
                }
                b"part" => {
                    let id = attribute(e, b"id").ok_or_else(|| {
                        AnnotateError::MalformedScore("<part> without an id".to_string())
                    })?;
                    part_id = Some(id);
                    divisions = 1;
                    cursor = Beats::from_integer(0);
                    last_onset = cursor;
                    measure_number = 0;
                }
                b"measure" => {
                    measure_number = attribute(e, b"number")
                        .and_then(|n| n.parse::<u32>().ok())
                        .unwrap_or(measure_number + 1);
                }
                b"note" => {
                    in_note = true;
                    note_is_rest = false;
                    note_is_chord = false;
                    note_is_grace = false;
                    note_duration = None;
                    note_voice = None;
                    pitch = PitchFields::default();
                }
                b"rest" if in_note => note_is_rest = true,
                b"chord" if in_note => note_is_chord = true,
                b"grace" if in_note => note_is_grace = true,
                b"backup" => {
                    in_backup = true;
                    move_divs = None;
                }
                b"forward" => {
                    in_forward = true;
                    move_divs = None;
                }
                b"key" => {
                    key_fifths = None;
                    key_mode = KeyMode::Major;
                }
                b"time" => {
                    time_beats = None;
                    time_beat_type = None;
                }
                b"clef" => {
                    in_clef = true;
                    clef_sign = None;
                    clef_line = None;
                }
                b"part-name" => current_tag = Some("part-name"),
                b"work-title" => current_tag = Some("work-title"),
                b"movement-title" => current_tag = Some("movement-title"),
                b"divisions" => current_tag = Some("divisions"),
                b"fifths" => current_tag = Some("fifths"),
                b"mode" => current_tag = Some("mode"),
                b"beats" => current_tag = Some("beats"),
                b"beat-type" => current_tag = Some("beat-type"),
                b"sign" => current_tag = Some("sign"),
                b"line" => current_tag = Some("line"),
                b"duration" => current_tag = Some("duration"),
                b"voice" => current_tag = Some("voice"),
                b"step" => current_tag = Some("step"),
                b"alter" => current_tag = Some("alter"),
                b"octave" => current_tag = Some("octave"),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"score-part" => {
                    if let Some(id) = attribute(e, b"id") {
                        part_names.push((id, None));
                    }
                }
                b"rest" if in_note => note_is_rest = true,
                b"chord" if in_note => note_is_chord = true,
                b"grace" if in_note => note_is_grace = true,
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let Some(tag) = current_tag.take() {
                    let text = e.unescape()?;
                    let text = text.trim();
                    match tag {
                        "part-name" => {
                            if let Some(last) = part_names.last_mut() {
                                last.1 = Some(text.to_string());
                            }
                        }
                        "work-title" | "movement-title" => {
                            if title.is_none() && !text.is_empty() {
                                title = Some(text.to_string());
                            }
                        }
                        "divisions" => {
                            let v = parse_divs(text, "divisions")?;
                            if v <= 0 {
                                return Err(AnnotateError::MalformedScore(format!(
                                    "divisions must be positive, got {}",
                                    v
                                )));
                            }
                            divisions = v;
                        }
                        "fifths" => key_fifths = text.parse::<i32>().ok(),
                        "mode" => {
                            if text.eq_ignore_ascii_case("minor") {
                                key_mode = KeyMode::Minor;
                            }
                        }
                        "beats" => time_beats = text.parse::<u8>().ok(),
                        "beat-type" => time_beat_type = text.parse::<u8>().ok(),
                        "sign" if in_clef => clef_sign = Some(text.to_string()),
                        "line" if in_clef => clef_line = text.parse::<u32>().ok(),
                        "duration" => {
                            let v = parse_divs(text, "duration")?;
                            if in_backup || in_forward {
                                move_divs = Some(v);
                            } else if in_note {
                                note_duration = Some(v);
                            }
                        }
                        "voice" if in_note => note_voice = Some(text.to_string()),
                        "step" if in_note => pitch.step = Some(text.to_string()),
                        "alter" if in_note => match text.parse::<i32>() {
                            Ok(v) => pitch.alter = v,
                            Err(_) => pitch.unreadable = true,
                        },
                        "octave" if in_note => match text.parse::<i32>() {
                            Ok(v) => pitch.octave = Some(v),
                            Err(_) => pitch.unreadable = true,
                        },
                        _ => {}
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                current_tag = None;
                match e.name().as_ref() {
                    b"note" if in_note => {
                        in_note = false;
                        let part = part_id.clone().ok_or_else(|| {
                            AnnotateError::MalformedScore("<note> outside of a <part>".to_string())
                        })?;

                        if note_is_grace {
                            warn!(
                                "Dropping grace note in part {}, measure {}",
                                part, measure_number
                            );
                        } else {
                            let divs = note_duration.ok_or_else(|| {
                                AnnotateError::MalformedScore(format!(
                                    "note without <duration> in part {}, measure {}",
                                    part, measure_number
                                ))
                            })?;
                            if divs < 0 {
                                return Err(AnnotateError::MalformedScore(format!(
                                    "negative <duration> {} in part {}, measure {}",
                                    divs, part, measure_number
                                )));
                            }
                            let duration = Beats::new(divs, divisions);
                            let onset = if note_is_chord { last_onset } else { cursor };
                            if !note_is_chord {
                                last_onset = cursor;
                                cursor += duration;
                            }

                            if divs == 0 {
                                warn!(
                                    "Dropping zero-length note in part {}, measure {}",
                                    part, measure_number
                                );
                            } else {
                                let resolved = if note_is_rest { None } else { pitch.resolve() };
                                if !note_is_rest && resolved.is_none() {
                                    warn!(
                                        "Unreadable pitch in part {}, measure {} (step {:?})",
                                        part, measure_number, pitch.step
                                    );
                                }

                                collected.push(NoteEvent {
                                    id: 0,
                                    part_id: part,
                                    voice: note_voice.take().unwrap_or_else(|| "1".to_string()),
                                    onset,
                                    duration,
                                    kind: if note_is_rest {
                                        EventKind::Rest
                                    } else {
                                        EventKind::Pitch
                                    },
                                    pitch: resolved,
                                    measure_number,
                                    chord: note_is_chord,
                                });
                            }
                        }
                    }
                    b"backup" => {
                        in_backup = false;
                        let divs = move_divs.take().unwrap_or(0);
                        cursor -= Beats::new(divs, divisions);
                        if cursor < Beats::from_integer(0) {
                            return Err(AnnotateError::MalformedScore(format!(
                                "<backup> before the start of the part in measure {}",
                                measure_number
                            )));
                        }
                    }
                    b"forward" => {
                        in_forward = false;
                        let divs = move_divs.take().unwrap_or(0);
                        cursor += Beats::new(divs, divisions);
                    }
                    b"key" => {
                        if let Some(fifths) = key_fifths {
                            let found = KeySignature {
                                fifths,
                                mode: key_mode,
                            };
                            match key {
                                None => key = Some(found),
                                Some(first) if first != found => warn!(
                                    "Ignoring key change to {} fifths in measure {}",
                                    fifths, measure_number
                                ),
                                Some(_) => {}
                            }
                        }
                    }
                    b"time" => {
                        if let (Some(beats), Some(beat_type)) = (time_beats, time_beat_type) {
                            let found = TimeSignature { beats, beat_type };
                            match time {
                                None => time = Some(found),
                                Some(first) if first != found => warn!(
                                    "Ignoring time change to {}/{} in measure {}",
                                    beats, beat_type, measure_number
                                ),
                                Some(_) => {}
                            }
                        }
                    }
                    b"clef" => {
                        in_clef = false;
                        if let (Some(part), Some(sign)) = (part_id.as_ref(), clef_sign.as_deref()) {
                            match clef_from(sign, clef_line) {
                                Some(clef) if !clefs.iter().any(|(p, _)| p == part) => {
                                    clefs.push((part.clone(), clef));
                                }
                                Some(_) => {}
                                None => debug!("Ignoring clef sign {} in part {}", sign, part),
                            }
                        }
                    }
                    b"part" => part_id = None,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    let work_id = title.clone().unwrap_or_else(|| "untitled".to_string());
    let mut score = Score::new(&work_id);
    score.title = title;
    score.key = key.unwrap_or_default();
    score.time = time.unwrap_or_default();

    for (id, name) in &part_names {
        score.add_part(id, name.as_deref());
    }

    collected.sort_by(|a, b| a.onset.cmp(&b.onset));
    for note in collected {
        score.push(note);
    }

    for part in score.parts.iter_mut() {
        part.clef = clefs.iter().find(|(p, _)| *p == part.id).map(|(_, c)| *c);
    }

    debug!(
        "Loaded {}: {} parts, {} notes, {} quarters",
        score.work_id,
        score.parts.len(),
        score.notes.len(),
        score.total_beats
    );

    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::store::ScoreStore;

    fn b(n: i64) -> Beats {
        Beats::from_integer(n)
    }

    const DUET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 3.1 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise version="3.1">
  <work><work-title>Bicinium</work-title></work>
  <part-list>
    <score-part id="P1"><part-name>Cantus</part-name></score-part>
    <score-part id="P2"><part-name>Tenor</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <attributes>
        <divisions>2</divisions>
        <key><fifths>-1</fifths><mode>minor</mode></key>
        <time><beats>3</beats><beat-type>4</beat-type></time>
        <clef><sign>G</sign><line>2</line></clef>
      </attributes>
      <note><pitch><step>D</step><octave>5</octave></pitch><duration>4</duration><voice>1</voice><type>half</type></note>
      <note><pitch><step>B</step><alter>-1</alter><octave>4</octave></pitch><duration>1</duration><voice>1</voice><type>eighth</type></note>
      <note><pitch><step>A</step><octave>4</octave></pitch><duration>1</duration><voice>1</voice><type>eighth</type></note>
    </measure>
  </part>
  <part id="P2">
    <measure number="1">
      <attributes>
        <divisions>1</divisions>
        <clef><sign>C</sign><line>4</line></clef>
      </attributes>
      <note><pitch><step>D</step><octave>4</octave></pitch><duration>2</duration><voice>1</voice></note>
      <note><rest/><duration>1</duration><voice>1</voice></note>
    </measure>
  </part>
</score-partwise>"#;

    #[test]
    fn test_parse_two_part_score() {
        let score = parse_musicxml(DUET).unwrap();
        assert_eq!(score.work_id, "Bicinium");
        assert_eq!(score.title.as_deref(), Some("Bicinium"));
        assert_eq!(score.parts.len(), 2);
        assert_eq!(score.parts[0].name.as_deref(), Some("Cantus"));
        assert_eq!(score.parts[0].clef, Some(Clef::Treble));
        assert_eq!(score.parts[1].clef, Some(Clef::Tenor));
        assert_eq!(
            score.key,
            KeySignature {
                fifths: -1,
                mode: KeyMode::Minor
            }
        );
        assert_eq!(score.time, TimeSignature { beats: 3, beat_type: 4 });
        assert_eq!(score.notes.len(), 5);
        assert_eq!(score.total_beats, b(3));
    }

    #[test]
    fn test_notes_are_ordered_by_onset() {
        let score = parse_musicxml(DUET).unwrap();
        let summary: Vec<(String, Beats)> = score
            .notes
            .iter()
            .map(|n| (n.part_id.clone(), n.onset))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("P1".to_string(), b(0)),
                ("P2".to_string(), b(0)),
                ("P1".to_string(), b(2)),
                ("P2".to_string(), b(2)),
                ("P1".to_string(), Beats::new(5, 2)),
            ]
        );
        let ids: Vec<u32> = score.notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_spelled_pitches_and_divisions() {
        let score = parse_musicxml(DUET).unwrap();
        let melody = score.list_notes("Bicinium", Some("P1"), None).unwrap();
        let pitches: Vec<String> = melody
            .iter()
            .map(|n| n.pitch.map(|p| p.to_string()).unwrap_or_default())
            .collect();
        assert_eq!(pitches, vec!["D5", "Bb4", "A4"]);
        assert_eq!(melody[0].duration, b(2));
        assert_eq!(melody[1].duration, Beats::new(1, 2));

        let rests = score
            .list_notes("Bicinium", Some("P2"), Some(EventKind::Rest))
            .unwrap();
        assert_eq!(rests.len(), 1);
        assert_eq!(rests[0].onset, b(2));
        assert!(rests[0].pitch.is_none());
    }

    #[test]
    fn test_chords_voices_and_backup() {
        let xml = r#"<score-partwise>
  <part-list><score-part id="P1"><part-name>Organ</part-name></score-part></part-list>
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><octave>5</octave></pitch><duration>2</duration><voice>1</voice></note>
      <note><chord/><pitch><step>E</step><octave>5</octave></pitch><duration>2</duration><voice>1</voice></note>
      <note><pitch><step>D</step><octave>5</octave></pitch><duration>2</duration><voice>1</voice></note>
      <backup><duration>4</duration></backup>
      <note><pitch><step>G</step><octave>3</octave></pitch><duration>1</duration><voice>2</voice></note>
      <forward><duration>2</duration><voice>2</voice></forward>
      <note><pitch><step>F</step><alter>1</alter><octave>3</octave></pitch><duration>1</duration><voice>2</voice></note>
    </measure>
  </part>
</score-partwise>"#;

        let score = parse_musicxml(xml).unwrap();
        assert_eq!(score.work_id, "untitled");
        let found: Vec<(String, Beats, String, bool)> = score
            .notes
            .iter()
            .map(|n| {
                (
                    n.pitch.map(|p| p.to_string()).unwrap_or_default(),
                    n.onset,
                    n.voice.clone(),
                    n.chord,
                )
            })
            .collect();
        assert_eq!(
            found,
            vec![
                ("C5".to_string(), b(0), "1".to_string(), false),
                ("E5".to_string(), b(0), "1".to_string(), true),
                ("G3".to_string(), b(0), "2".to_string(), false),
                ("D5".to_string(), b(2), "1".to_string(), false),
                ("F#3".to_string(), b(3), "2".to_string(), false),
            ]
        );
        assert_eq!(score.total_beats, b(4));
    }

    #[test]
    fn test_grace_notes_are_dropped() {
        let xml = r#"<score-partwise>
  <part-list><score-part id="P1"/></part-list>
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><grace slash="yes"/><pitch><step>B</step><octave>4</octave></pitch><voice>1</voice></note>
      <note><pitch><step>C</step><octave>5</octave></pitch><duration>1</duration></note>
    </measure>
  </part>
</score-partwise>"#;
        let score = parse_musicxml(xml).unwrap();
        assert_eq!(score.notes.len(), 1);
        assert_eq!(score.notes[0].onset, b(0));
        assert_eq!(score.notes[0].voice, "1");
    }

    #[test]
    fn test_unreadable_pitch_is_kept_without_one() {
        let xml = r#"<score-partwise>
  <part-list><score-part id="P1"/></part-list>
  <part id="P1">
    <measure number="7">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>H</step><octave>4</octave></pitch><duration>1</duration></note>
      <note><pitch><step>C</step></pitch><duration>1</duration></note>
    </measure>
  </part>
</score-partwise>"#;
        let score = parse_musicxml(xml).unwrap();
        assert_eq!(score.notes.len(), 2);
        for note in &score.notes {
            assert_eq!(note.kind, EventKind::Pitch);
            assert!(note.pitch.is_none());
            assert_eq!(note.measure_number, 7);
            assert!(matches!(
                score.pitch_of(note),
                Err(AnnotateError::MalformedPitch { .. })
            ));
        }
    }

    #[test]
    fn test_fractional_duration_is_rejected() {
        let xml = r#"<score-partwise>
  <part-list><score-part id="P1"/></part-list>
  <part id="P1"><measure number="1">
    <note><pitch><step>C</step><octave>4</octave></pitch><duration>1.5</duration></note>
  </measure></part>
</score-partwise>"#;
        assert!(matches!(
            parse_musicxml(xml),
            Err(AnnotateError::MalformedScore(_))
        ));
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let xml = r#"<score-partwise>
  <part-list><score-part id="P1"/></part-list>
  <part id="P1"><measure number="1">
    <attributes><divisions>1</divisions></attributes>
    <note><pitch><step>C</step><octave>4</octave></pitch><duration>2</duration></note>
    <note><pitch><step>D</step><octave>4</octave></pitch><duration>-4</duration></note>
    <note><pitch><step>E</step><octave>4</octave></pitch><duration>1</duration></note>
  </measure></part>
</score-partwise>"#;
        assert!(matches!(
            parse_musicxml(xml),
            Err(AnnotateError::MalformedScore(_))
        ));
    }

    #[test]
    fn test_zero_duration_is_dropped_without_moving_the_cursor() {
        let xml = r#"<score-partwise>
  <part-list><score-part id="P1"/></part-list>
  <part id="P1"><measure number="1">
    <attributes><divisions>1</divisions></attributes>
    <note><pitch><step>C</step><octave>4</octave></pitch><duration>2</duration></note>
    <note><pitch><step>D</step><octave>4</octave></pitch><duration>0</duration></note>
    <note><pitch><step>E</step><octave>4</octave></pitch><duration>1</duration></note>
  </measure></part>
</score-partwise>"#;
        let score = parse_musicxml(xml).unwrap();
        let onsets: Vec<(String, Beats)> = score
            .notes
            .iter()
            .map(|n| (n.pitch.map(|p| p.to_string()).unwrap_or_default(), n.onset))
            .collect();
        assert_eq!(
            onsets,
            vec![("C4".to_string(), b(0)), ("E4".to_string(), b(2))]
        );
    }

    #[test]
    fn test_empty_title_and_part_name_do_not_capture_later_text() {
        let xml = r#"<score-partwise>
  <work><work-title></work-title></work>
  <identification><creator type="composer">J. S. Bach</creator></identification>
  <part-list>
    <score-part id="P1"><part-name></part-name><part-abbreviation>Vln.</part-abbreviation></score-part>
  </part-list>
  <part id="P1"><measure number="1">
    <attributes><divisions>1</divisions></attributes>
    <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
  </measure></part>
</score-partwise>"#;
        let score = parse_musicxml(xml).unwrap();
        assert_eq!(score.work_id, "untitled");
        assert_eq!(score.title, None);
        assert_eq!(score.parts[0].name, None);
    }

    #[test]
    fn test_first_key_and_time_signature_win() {
        let xml = r#"<score-partwise>
  <part-list><score-part id="P1"/></part-list>
  <part id="P1">
    <measure number="1">
      <attributes>
        <divisions>1</divisions>
        <key><fifths>2</fifths></key>
        <time><beats>3</beats><beat-type>4</beat-type></time>
      </attributes>
      <note><pitch><step>D</step><octave>4</octave></pitch><duration>3</duration></note>
    </measure>
    <measure number="2">
      <attributes>
        <key><fifths>-1</fifths></key>
        <time><beats>2</beats><beat-type>4</beat-type></time>
      </attributes>
      <note><pitch><step>F</step><octave>4</octave></pitch><duration>2</duration></note>
    </measure>
  </part>
</score-partwise>"#;
        let score = parse_musicxml(xml).unwrap();
        assert_eq!(score.key.fifths, 2);
        assert_eq!(score.time, TimeSignature { beats: 3, beat_type: 4 });
        assert_eq!(score.notes[1].measure_number, 2);
        assert_eq!(score.notes[1].onset, b(3));
    }

    #[test]
    fn test_invalid_xml() {
        let result = parse_musicxml("<score-partwise><part id=\"P1\"></measure></score-partwise>");
        assert!(matches!(result, Err(AnnotateError::Xml(_))));
    }
}
