use serde::{Deserialize, Serialize};

use crate::analysis::alignment::AlignmentPolicy;
use crate::analysis::classifier::ClassificationScheme;
use crate::error::{AnnotateError, Result};

/// LilyPond markup prefixed to dissonant annotations by default.
pub const DEFAULT_FLAG_MARKER: &str = "\\with-color #red";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassConfig {
    pub policy: AlignmentPolicy,
    pub scheme: ClassificationScheme,
}

/// Settings for one annotation run over one work.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Work to analyze; the loaded score's own id when absent.
    pub work_id: Option<String>,
    pub melody_part: String,
    /// The accompaniment line every melody note is measured against.
    pub reference_part: String,
    pub passes: Vec<PassConfig>,
    pub flag_marker: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            work_id: None,
            melody_part: "P1".to_string(),
            reference_part: "P2".to_string(),
            passes: vec![
                PassConfig {
                    policy: AlignmentPolicy::AttackSustain,
                    scheme: ClassificationScheme::ConsonanceByType,
                },
                PassConfig {
                    policy: AlignmentPolicy::OnsetContained,
                    scheme: ClassificationScheme::DissonanceByClass,
                },
            ],
            flag_marker: DEFAULT_FLAG_MARKER.to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AnalysisConfig =
            serde_json::from_str(json).map_err(|e| AnnotateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.melody_part == self.reference_part {
            return Err(AnnotateError::Config(format!(
                "melody and reference part are both {}",
                self.melody_part
            )));
        }
        if self.passes.is_empty() {
            return Err(AnnotateError::Config("no analysis passes".to_string()));
        }
        Ok(())
    }

    pub fn work_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.work_id.as_deref().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_run_both_historical_passes() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.passes.len(), 2);
        assert_eq!(config.passes[0].policy, AlignmentPolicy::AttackSustain);
        assert_eq!(config.passes[1].scheme, ClassificationScheme::DissonanceByClass);
        assert_eq!(config.work_or("fallback"), "fallback");
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = AnalysisConfig::from_json(
            r#"{
                "work_id": "bicinium-3",
                "melody_part": "P2",
                "reference_part": "P1",
                "passes": [{"policy": "onset_contained", "scheme": "consonance_by_type"}]
            }"#,
        )
        .unwrap();
        assert_eq!(config.work_or("fallback"), "bicinium-3");
        assert_eq!(config.reference_part, "P1");
        assert_eq!(
            config.passes,
            vec![PassConfig {
                policy: AlignmentPolicy::OnsetContained,
                scheme: ClassificationScheme::ConsonanceByType,
            }]
        );
        assert_eq!(config.flag_marker, DEFAULT_FLAG_MARKER);
    }

    #[test]
    fn test_rejects_inconsistent_config() {
        assert!(matches!(
            AnalysisConfig::from_json(r#"{"melody_part": "P2"}"#),
            Err(AnnotateError::Config(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json(r#"{"passes": []}"#),
            Err(AnnotateError::Config(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json(r#"{"passes": [{"policy": "sideways"}]}"#),
            Err(AnnotateError::Config(_))
        ));
    }
}
