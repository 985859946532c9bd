use fretboard::pitch::{note_name as pitch_note_name, pitch_class_of};
use fretboard::{Direction, FretboardEngine, FretboardError, FretboardId, RuleSpec, RuleUpdate, Selection, SessionConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct EngineError {
    message: String,
}

fn error_to_js(e: FretboardError) -> JsValue {
    let error = EngineError { message: e.to_string() };
    JsValue::from_str(&serde_json::to_string(&error).unwrap_or_else(|_| error.message.clone()))
}

fn input_to_js(e: serde_wasm_bindgen::Error) -> JsValue {
    error_to_js(FretboardError::ConfigError(e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| error_to_js(FretboardError::ConfigError(e.to_string())))
}

fn fretboard_id(id: u8) -> Result<FretboardId, JsValue> {
    FretboardId::try_from(id).map_err(error_to_js)
}

fn direction(up: bool) -> Direction {
    if up {
        Direction::Up
    } else {
        Direction::Down
    }
}

/// Canonical label for any integer pitch
#[wasm_bindgen]
pub fn note_name(value: i32) -> String {
    pitch_note_name(pitch_class_of(value)).to_string()
}

/// Engine handle owned by the page. Every method runs to completion on the UI thread.
#[wasm_bindgen]
pub struct Fretboard {
    engine: FretboardEngine,
}

#[wasm_bindgen]
impl Fretboard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Fretboard {
        Fretboard {
            engine: FretboardEngine::new(),
        }
    }

    /// Build from a YAML session document
    #[wasm_bindgen(js_name = fromSession)]
    pub fn from_session(source: &str) -> Result<Fretboard, JsValue> {
        let engine = SessionConfig::from_yaml(source)
            .and_then(|session| session.build_engine(None))
            .map_err(error_to_js)?;
        Ok(Fretboard { engine })
    }

    #[wasm_bindgen(js_name = bumpString)]
    pub fn bump_string(&mut self, string: usize, up: bool) -> Result<u8, JsValue> {
        self.engine
            .bump_string(string, direction(up))
            .map(|pc| pc.value())
            .map_err(error_to_js)
    }

    #[wasm_bindgen(js_name = setTuning)]
    pub fn set_tuning(&mut self, values: Vec<i32>) -> Result<(), JsValue> {
        self.engine.set_tuning(&values).map_err(error_to_js)
    }

    /// `spec` is `{ fretboard, root, chunkId, color?, displayMode? }`
    #[wasm_bindgen(js_name = addRule)]
    pub fn add_rule(&mut self, spec: JsValue) -> Result<usize, JsValue> {
        let spec: RuleSpec = serde_wasm_bindgen::from_value(spec).map_err(input_to_js)?;
        self.engine.add_rule(&spec).map_err(error_to_js)
    }

    #[wasm_bindgen(js_name = removeRule)]
    pub fn remove_rule(&mut self, index: usize) -> Result<(), JsValue> {
        self.engine.remove_rule(index).map(|_| ()).map_err(error_to_js)
    }

    #[wasm_bindgen(js_name = moveRule)]
    pub fn move_rule(&mut self, index: usize, up: bool) -> Result<bool, JsValue> {
        self.engine.move_rule(index, direction(up)).map_err(error_to_js)
    }

    /// `update` holds any subset of the rule fields
    #[wasm_bindgen(js_name = setRuleFields)]
    pub fn set_rule_fields(&mut self, index: usize, update: JsValue) -> Result<(), JsValue> {
        let update: RuleUpdate = serde_wasm_bindgen::from_value(update).map_err(input_to_js)?;
        self.engine.set_rule_fields(index, &update).map_err(error_to_js)
    }

    /// Returns `"cleared"`, `"suppressed"` or `"highlighted"` as JSON
    #[wasm_bindgen(js_name = toggleOverride)]
    pub fn toggle_override(
        &mut self,
        fretboard: u8,
        string: usize,
        fret: u32,
        selection: JsValue,
    ) -> Result<String, JsValue> {
        let selection: Selection = serde_wasm_bindgen::from_value(selection).map_err(input_to_js)?;
        let outcome = self
            .engine
            .toggle_override(fretboard_id(fretboard)?, string, fret, &selection)
            .map_err(error_to_js)?;
        to_json(&outcome)
    }

    #[wasm_bindgen(js_name = setFretboard2Active)]
    pub fn set_fretboard2_active(&mut self, active: bool) {
        self.engine.set_fretboard2_active(active);
    }

    /// Highlight at one fret as JSON, or `null`
    #[wasm_bindgen(js_name = resolveHighlight)]
    pub fn resolve_highlight(&self, fretboard: u8, string: usize, fret: u32) -> Result<String, JsValue> {
        to_json(&self.engine.resolve_highlight(fretboard_id(fretboard)?, string, fret))
    }

    /// Whole view as a JSON array of string rows, or `null` while the view is off
    #[wasm_bindgen(js_name = resolveView)]
    pub fn resolve_view(&self, fretboard: u8, frets: u32) -> Result<String, JsValue> {
        to_json(&self.engine.resolve_view(fretboard_id(fretboard)?, frets))
    }

    #[wasm_bindgen(js_name = currentTuning)]
    pub fn current_tuning(&self) -> Vec<u8> {
        self.engine.current_tuning().iter().map(|pc| pc.value()).collect()
    }

    pub fn rules(&self) -> Result<String, JsValue> {
        to_json(&self.engine.rules())
    }

    pub fn chunks(&self) -> Result<String, JsValue> {
        to_json(&self.engine.catalog().list_chunks())
    }
}

impl Default for Fretboard {
    fn default() -> Self {
        Self::new()
    }
}
