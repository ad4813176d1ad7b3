use wasm_bindgen::prelude::*;

pub mod analysis;
pub mod config;
pub mod error;
pub mod parser;
pub mod render;
pub mod score;
pub mod theory;

use config::AnalysisConfig;
use error::AnnotateError;
use render::annotation::AnnotationRun;
use render::lilypond::LilypondDocument;
use theory::interval::Interval;
use theory::pitch::Pitch;
use theory::scale::Scale;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn config_from_js(config_js: JsValue) -> Result<AnalysisConfig, JsValue> {
    let config = if config_js.is_null() || config_js.is_undefined() {
        AnalysisConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config_js)
            .map_err(|e| js_error(AnnotateError::Config(e.to_string())))?
    };
    config.validate().map_err(js_error)?;
    Ok(config)
}

/// Load MusicXML, run every configured pass and render the annotated score.
pub fn annotate_musicxml(xml: &str, config: &AnalysisConfig) -> error::Result<AnnotationRun> {
    let score = parser::musicxml::parse_musicxml(xml)?;
    let work = config.work_or(&score.work_id).to_string();
    let mut document = LilypondDocument::new(&score);
    render::annotation::run(&score, &mut document, &work, config)
}

#[wasm_bindgen]
pub fn parse_musicxml(xml: &str) -> Result<JsValue, JsValue> {
    let score = parser::musicxml::parse_musicxml(xml).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&score).map_err(js_error)
}

/// Annotations, skipped notes and rendered LilyPond for a MusicXML score.
/// `config_js` may be `null`/`undefined` for the default two passes.
#[wasm_bindgen]
pub fn analyze_intervals(xml: &str, config_js: JsValue) -> Result<JsValue, JsValue> {
    let config = config_from_js(config_js)?;
    let run = annotate_musicxml(xml, &config).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&run).map_err(js_error)
}

#[wasm_bindgen]
pub fn render_annotated_lilypond(xml: &str, config_js: JsValue) -> Result<String, JsValue> {
    let config = config_from_js(config_js)?;
    let run = annotate_musicxml(xml, &config).map_err(js_error)?;
    Ok(run.rendered)
}

/// Canonical interval token from `lower` up (or down) to `upper`, e.g. `"M3"`.
#[wasm_bindgen]
pub fn interval_between(upper: &str, lower: &str) -> Result<String, JsValue> {
    let upper: Pitch = upper.parse().map_err(js_error)?;
    let lower: Pitch = lower.parse().map_err(js_error)?;
    Ok(Interval::between(upper, lower).to_string())
}

#[wasm_bindgen]
pub fn transpose_pitch(pitch: &str, interval: &str) -> Result<String, JsValue> {
    let pitch: Pitch = pitch.parse().map_err(js_error)?;
    let interval: Interval = interval.parse().map_err(js_error)?;
    Ok(pitch.transpose(&interval).to_string())
}

/// Spelled pitches of a key such as `"Am"` (harmonic minor) or `"EbM"`.
#[wasm_bindgen]
pub fn scale_pitches(key: &str) -> Result<JsValue, JsValue> {
    let scale: Scale = key.parse().map_err(js_error)?;
    let names: Vec<String> = scale.pitches.iter().map(Pitch::to_string).collect();
    serde_wasm_bindgen::to_value(&names).map_err(js_error)
}
