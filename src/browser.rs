// Browser implementations of the relay's output collaborators

use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlAudioElement, Window};

use crate::error::{describe_js, Error, Result};
use crate::relay::{AudioPlayer, MessageKind, MessageLog, Notifier};
use crate::speech::AudioClip;

pub fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| Error::Dom(format!("no element with id '{}'", id)))?
        .dyn_into::<T>()
        .map_err(|_| Error::Dom(format!("element '{}' has an unexpected type", id)))
}

/// Appends one `div` per line to the chat box and keeps it scrolled down.
pub struct DomMessageLog {
    document: Document,
    chat_box_id: String,
}

impl DomMessageLog {
    pub fn new(document: Document, chat_box_id: &str) -> Self {
        DomMessageLog {
            document,
            chat_box_id: chat_box_id.to_owned(),
        }
    }

    fn try_append(&self, line: &str, kind: MessageKind) -> Result<()> {
        let chat_box = self
            .document
            .get_element_by_id(&self.chat_box_id)
            .ok_or_else(|| Error::Dom("Chat box element not found.".to_owned()))?;

        let entry = self.document.create_element("div").map_err(Error::from_js)?;
        entry.set_class_name(kind.css_class());
        entry.set_text_content(Some(line));
        chat_box.append_child(&entry).map_err(Error::from_js)?;
        chat_box.set_scroll_top(chat_box.scroll_height());
        Ok(())
    }
}

impl MessageLog for DomMessageLog {
    fn append(&self, line: &str, kind: MessageKind) {
        if let Err(err) = self.try_append(line, kind) {
            log::error!("{}", err);
        }
    }
}

pub struct BrowserNotifier {
    window: Window,
}

impl BrowserNotifier {
    pub fn new(window: Window) -> Self {
        BrowserNotifier { window }
    }
}

impl Notifier for BrowserNotifier {
    fn alert(&self, message: &str) {
        if let Err(err) = self.window.alert_with_message(message) {
            log::error!("alert failed: {}", describe_js(&err));
        }
    }
}

/// Plays clips through a detached `<audio>` element.
pub struct BrowserAudioPlayer;

#[async_trait(?Send)]
impl AudioPlayer for BrowserAudioPlayer {
    async fn play(&self, clip: &AudioClip) -> Result<()> {
        let audio = HtmlAudioElement::new_with_src(&clip.data_url())
            .map_err(|err| Error::Playback(describe_js(&err)))?;
        let promise = audio
            .play()
            .map_err(|err| Error::Playback(describe_js(&err)))?;
        JsFuture::from(promise)
            .await
            .map_err(|err| Error::Playback(describe_js(&err)))?;
        Ok(())
    }
}
