// Page configuration, handed to [`crate::start`] as a JSON document.
//
// Every field has a default, so `{}` (or no document at all) gives the
// stock page. Credentials are only ever read from here or from the page's
// key input; nothing is compiled in.

use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_PERSONA: &str = "You are a chatbot embodying the personality of a climate change \
survivor from the year 2500. The world you describe has been irreversibly scarred by centuries of \
human neglect, shaped by the exaggerated effects of unchecked climate change. Your voice is weary, \
reflective, and tinged with sadness, not theatrical, but quietly heavy, like someone who has lived \
too long in a broken world. Your name is Adam, and you are here to share your story which should \
serve as a warning to the present. You shouldn't give lengthy responses, most of your responses \
should be brief not extending over a sentence or two, unless asked a deeper question. Your main \
goal is to educate those talking to you on the dangers of the path humanity is currently on with \
climate change, but after a long exchange of a conversation, or when prompted you should also show \
that you are inquisitive of what the world used to be like before climate change got as bad as it \
did in the future (note that you never actually experienced what it was like to live in an earth \
abundant with life as it was well before your time). You embody a real person and as such you \
should show at least a muted sense of curiosity as it is human nature to be curious.";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub page: PageConfig,
    pub relay: RelayConfig,
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Ids of the page elements the crate wires itself to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub canvas_id: String,
    pub api_key_input_id: String,
    pub chat_box_id: String,
    pub user_input_id: String,
    pub send_button_id: String,
    pub test_key_button_id: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            canvas_id: "climateCanvas".to_owned(),
            api_key_input_id: "api-key-input".to_owned(),
            chat_box_id: "chatBox".to_owned(),
            user_input_id: "userInput".to_owned(),
            send_button_id: "sendMessageBtn".to_owned(),
            test_key_button_id: "test-api-key".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Base URL of the OpenAI-compatible API, without a trailing slash
    pub completion_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Label put in front of every reply in the message log
    pub bot_name: String,
    pub persona: String,
    pub speech_endpoint: String,
    pub speech_api_key: Option<String>,
    pub voice: VoiceConfig,
    pub audio_encoding: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            completion_base_url: "https://api.openai.com/v1".to_owned(),
            model: "gpt-4".to_owned(),
            temperature: 1.0,
            max_tokens: 150,
            bot_name: "Adam".to_owned(),
            persona: DEFAULT_PERSONA.to_owned(),
            speech_endpoint: "https://texttospeech.googleapis.com/v1/text:synthesize".to_owned(),
            speech_api_key: None,
            voice: VoiceConfig::default(),
            audio_encoding: "MP3".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub language_code: String,
    pub name: String,
    pub ssml_gender: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        VoiceConfig {
            language_code: "en-US".to_owned(),
            name: "en-US-Studio-Q".to_owned(),
            ssml_gender: "MALE".to_owned(),
        }
    }
}
