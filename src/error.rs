// Error types for the page.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while wiring the page or relaying a chat turn.
///
/// The user only ever sees the `Display` text of these, prefixed with
/// `Error:` in the message log.
#[derive(Debug, Error)]
pub enum Error {
    /// The completion service answered with a non-success status
    #[error("Chatbot error: {status}")]
    Completion { status: u16 },

    /// The speech-synthesis service answered with a non-success status
    #[error("Google TTS error: {status} - {reason}")]
    Speech { status: u16, reason: String },

    #[error("Invalid OpenAI API key.")]
    InvalidKey,

    /// A completion response without any choices
    #[error("Chatbot returned no reply")]
    EmptyReply,

    #[error("No speech-synthesis API key configured")]
    MissingSpeechKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Audio playback failed: {0}")]
    Playback(String),

    /// A page element or browser API was missing or threw
    #[error("DOM error: {0}")]
    Dom(String),
}

impl Error {
    pub fn from_js(value: JsValue) -> Self {
        Error::Dom(describe_js(&value))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for JsValue {
    fn from(err: Error) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

// Exceptions thrown by the browser are usually strings or Error objects
pub(crate) fn describe_js(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    match js_sys::Reflect::get(value, &JsValue::from_str("message")) {
        Ok(message) => message.as_string().unwrap_or_else(|| format!("{:?}", value)),
        Err(_) => format!("{:?}", value),
    }
}
