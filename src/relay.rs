// The chat relay: one user turn goes to the completion service, the reply
// goes to speech synthesis, and the audio is played back.
//
// Every collaborator sits behind a trait so the flow can be driven without a
// browser. Failures are flattened into a single `Error: ...` log line.

use async_trait::async_trait;

use crate::config::RelayConfig;
use crate::error::Result;
use crate::speech::AudioClip;

pub const MISSING_KEY_ALERT: &str = "Please enter your OpenAI API key.";
pub const VALID_KEY_ALERT: &str = "OpenAI API key is valid!";

#[async_trait(?Send)]
pub trait CompletionService {
    /// Generates a reply to `utterance` spoken to the given persona.
    async fn complete(&self, persona: &str, utterance: &str, api_key: &str) -> Result<String>;

    /// Checks that `api_key` is accepted by the service.
    async fn verify_key(&self, api_key: &str) -> Result<()>;
}

#[async_trait(?Send)]
pub trait SpeechService {
    async fn synthesize(&self, text: &str) -> Result<AudioClip>;
}

#[async_trait(?Send)]
pub trait AudioPlayer {
    async fn play(&self, clip: &AudioClip) -> Result<()>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Bot,
    Error,
}

impl MessageKind {
    pub fn css_class(self) -> &'static str {
        match self {
            MessageKind::User => "user-message",
            MessageKind::Bot => "bot-message",
            MessageKind::Error => "error-message",
        }
    }
}

/// Append-only conversation display.
pub trait MessageLog {
    fn append(&self, line: &str, kind: MessageKind);
}

/// Blocking user-facing warning.
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// What a single `send` ended up doing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Blank input; nothing happened
    Ignored,
    /// No completion key; the user was alerted and nothing was sent
    CredentialMissing,
    Replied(String),
    Failed(String),
}

impl Outcome {
    /// Whether the page should clear its input field afterwards.
    pub fn clears_input(&self) -> bool {
        matches!(self, Outcome::Replied(_) | Outcome::Failed(_))
    }
}

pub struct ChatRelay {
    persona: String,
    bot_name: String,
    completion: Box<dyn CompletionService>,
    speech: Box<dyn SpeechService>,
    player: Box<dyn AudioPlayer>,
    log: Box<dyn MessageLog>,
    notifier: Box<dyn Notifier>,
}

impl ChatRelay {
    pub fn new(
        config: &RelayConfig,
        completion: Box<dyn CompletionService>,
        speech: Box<dyn SpeechService>,
        player: Box<dyn AudioPlayer>,
        log: Box<dyn MessageLog>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        ChatRelay {
            persona: config.persona.clone(),
            bot_name: config.bot_name.clone(),
            completion,
            speech,
            player,
            log,
            notifier,
        }
    }

    pub async fn send(&self, user_input: &str, completion_key: Option<&str>) -> Outcome {
        let utterance = user_input.trim();
        if utterance.is_empty() {
            return Outcome::Ignored;
        }

        self.log.append(&format!("You: {}", utterance), MessageKind::User);

        let api_key = match present(completion_key) {
            Some(key) => key,
            None => {
                self.notifier.alert(MISSING_KEY_ALERT);
                return Outcome::CredentialMissing;
            }
        };

        match self.converse(utterance, api_key).await {
            Ok(reply) => Outcome::Replied(reply),
            Err(err) => {
                log::error!("chat turn failed: {}", err);
                let message = err.to_string();
                self.log
                    .append(&format!("Error: {}", message), MessageKind::Error);
                Outcome::Failed(message)
            }
        }
    }

    async fn converse(&self, utterance: &str, api_key: &str) -> Result<String> {
        let reply = self
            .completion
            .complete(&self.persona, utterance, api_key)
            .await?;
        self.log
            .append(&format!("{}: {}", self.bot_name, reply), MessageKind::Bot);

        let clip = self.speech.synthesize(&reply).await?;
        if let Err(err) = self.player.play(&clip).await {
            log::error!("Error playing audio: {}", err);
        }
        Ok(reply)
    }

    /// Checks the completion key and reports the verdict with an alert.
    pub async fn verify_key(&self, completion_key: Option<&str>) -> bool {
        let api_key = match present(completion_key) {
            Some(key) => key,
            None => {
                self.notifier.alert(MISSING_KEY_ALERT);
                return false;
            }
        };

        match self.completion.verify_key(api_key).await {
            Ok(()) => {
                self.notifier.alert(VALID_KEY_ALERT);
                true
            }
            Err(err) => {
                log::warn!("key check failed: {}", err);
                self.notifier
                    .alert(&format!("Error validating OpenAI API key: {}", err));
                false
            }
        }
    }
}

fn present(key: Option<&str>) -> Option<&str> {
    key.map(str::trim).filter(|key| !key.is_empty())
}
