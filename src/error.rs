use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("cannot parse {0}")]
    Parse(String),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for MotionError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        MotionError::Js(message)
    }
}

pub type Result<T> = std::result::Result<T, MotionError>;
