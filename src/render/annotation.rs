use log::info;
use serde::Serialize;

use crate::analysis::alignment::AlignmentPolicy;
use crate::analysis::analyzer::{analyze, Analysis, Finding, SkippedNote};
use crate::analysis::classifier::ClassificationScheme;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::score::store::ScoreStore;
use crate::score::types::NoteId;

/// Identifies an annotation slot. Attaching twice under the same key
/// replaces the earlier annotation.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnnotationKey {
    pub note_id: NoteId,
    pub policy: AlignmentPolicy,
    pub scheme: ClassificationScheme,
    pub partner_id: NoteId,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Annotation {
    pub work_id: String,
    pub note_id: NoteId,
    pub voice: String,
    pub part_id: String,
    /// Canonical interval token, e.g. `m3`.
    pub label: String,
    /// `label`, prefixed with the flag marker when `styled`.
    pub text: String,
    pub styled: bool,
    pub policy: AlignmentPolicy,
    pub scheme: ClassificationScheme,
    pub partner_id: NoteId,
}

impl Annotation {
    pub fn from_finding(finding: &Finding, flag_marker: &str) -> Self {
        let label = finding.interval.to_string();
        let styled = finding.verdict.is_flagged();
        let text = if styled && !flag_marker.is_empty() {
            format!("{} {}", flag_marker, label)
        } else {
            label.clone()
        };

        Annotation {
            work_id: finding.work_id.clone(),
            note_id: finding.note_id,
            voice: finding.voice.clone(),
            part_id: finding.part_id.clone(),
            label,
            text,
            styled,
            policy: finding.policy,
            scheme: finding.scheme,
            partner_id: finding.partner_id,
        }
    }

    pub fn key(&self) -> AnnotationKey {
        AnnotationKey {
            note_id: self.note_id,
            policy: self.policy,
            scheme: self.scheme,
            partner_id: self.partner_id,
        }
    }
}

/// Where annotations end up: a document that can place text under a note and
/// produce the finished, annotated output.
pub trait AnnotationTarget {
    fn attach(&mut self, annotation: Annotation) -> Result<()>;
    fn render(&self) -> Result<String>;
}

/// Everything an annotation run produced.
#[derive(Serialize, Clone, Debug)]
pub struct AnnotationRun {
    pub work_id: String,
    pub annotations: Vec<Annotation>,
    pub skipped: Vec<SkippedNote>,
    pub rendered: String,
}

/// Run every configured pass over `work`, attach the results to `target`,
/// then render it once.
pub fn run<S, T>(store: &S, target: &mut T, work: &str, config: &AnalysisConfig) -> Result<AnnotationRun>
where
    S: ScoreStore + ?Sized,
    T: AnnotationTarget + ?Sized,
{
    config.validate()?;

    let mut analysis = Analysis::default();
    for pass in &config.passes {
        analysis.merge(analyze(
            store,
            work,
            &config.melody_part,
            &config.reference_part,
            pass.policy,
            pass.scheme,
        )?);
    }

    let annotations: Vec<Annotation> = analysis
        .findings
        .iter()
        .map(|f| Annotation::from_finding(f, &config.flag_marker))
        .collect();

    for annotation in &annotations {
        target.attach(annotation.clone())?;
    }
    let rendered = target.render()?;

    info!(
        "Annotated {} with {} annotations ({} flagged), {} notes skipped",
        work,
        annotations.len(),
        annotations.iter().filter(|a| a.styled).count(),
        analysis.skipped.len()
    );

    Ok(AnnotationRun {
        work_id: work.to_string(),
        annotations,
        skipped: analysis.skipped,
        rendered,
    })
}
