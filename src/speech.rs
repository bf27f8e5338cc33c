// Google Cloud text-to-speech client and the audio it hands back

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{RelayConfig, VoiceConfig};
use crate::error::{Error, Result};
use crate::relay::SpeechService;

/// Base64 encoded audio plus its MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioClip {
    pub mime: String,
    pub base64: String,
}

impl AudioClip {
    pub fn new(mime: &str, base64: &str) -> Self {
        AudioClip {
            mime: mime.to_owned(),
            base64: base64.to_owned(),
        }
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.base64)
    }
}

fn mime_for(encoding: &str) -> &'static str {
    match encoding {
        "MP3" => "audio/mp3",
        "OGG_OPUS" => "audio/ogg",
        "LINEAR16" | "MULAW" | "ALAW" => "audio/wav",
        _ => "application/octet-stream",
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig<'a>,
}

#[derive(Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
    ssml_gender: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig<'a> {
    audio_encoding: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

#[derive(Debug, Clone)]
pub struct GoogleTtsClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    voice: VoiceConfig,
    audio_encoding: String,
}

impl GoogleTtsClient {
    pub fn new(config: &RelayConfig) -> Self {
        GoogleTtsClient {
            client: Client::new(),
            endpoint: config.speech_endpoint.clone(),
            api_key: config.speech_api_key.clone(),
            voice: config.voice.clone(),
            audio_encoding: config.audio_encoding.clone(),
        }
    }
}

#[async_trait(?Send)]
impl SpeechService for GoogleTtsClient {
    async fn synthesize(&self, text: &str) -> Result<AudioClip> {
        let api_key = self.api_key.as_deref().ok_or(Error::MissingSpeechKey)?;
        let body = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: &self.voice.language_code,
                name: &self.voice.name,
                ssml_gender: &self.voice.ssml_gender,
            },
            audio_config: AudioConfig {
                audio_encoding: &self.audio_encoding,
            },
        };

        log::debug!("POST {} ({} chars)", self.endpoint, text.len());
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Speech {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_owned(),
            });
        }

        let data: SynthesizeResponse = response.json().await?;
        Ok(AudioClip::new(mime_for(&self.audio_encoding), &data.audio_content))
    }
}
