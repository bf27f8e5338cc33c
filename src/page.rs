// Wires the animation and the chat relay to the DOM, and tears them down
// again on `stop()` or drop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlCanvasElement, HtmlElement, HtmlInputElement, Window};

use crate::animation::{Animation, CancelHandle};
use crate::browser::{element_by_id, BrowserAudioPlayer, BrowserNotifier, DomMessageLog};
use crate::completion::OpenAiClient;
use crate::config::AppConfig;
use crate::error::{describe_js, Error, Result};
use crate::relay::ChatRelay;
use crate::speech::GoogleTtsClient;
use crate::surface::{Bounds, CanvasSurface};
use crate::utils::Timer;

type SharedAnimation = Rc<RefCell<Animation<CanvasSurface>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

// Event listener registration that unhooks itself when dropped, so the
// browser never holds a function whose closure is gone.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut()>,
}

impl Listener {
    fn attach(target: &EventTarget, event: &'static str, callback: Closure<dyn FnMut()>) -> Result<Self> {
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(Error::from_js)?;
        Ok(Listener {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("removing {} listener failed: {}", self.event, describe_js(&err));
        }
    }
}

#[wasm_bindgen]
pub struct ClimatePage {
    window: Window,
    animation: SharedAnimation,
    cancel: CancelHandle,
    frame_callback: FrameCallback,
    pending_frame: Rc<Cell<Option<i32>>>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl ClimatePage {
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    pub fn frames(&self) -> f64 {
        self.animation.borrow().frames() as f64
    }

    pub fn particle_count(&self) -> usize {
        self.animation.borrow().field().particles().len()
    }

    /// Stops the animation loop and unhooks every page listener.
    pub fn stop(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        if let Some(id) = self.pending_frame.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {}", describe_js(&err));
            }
        }
        // breaks the closure's reference to itself
        self.frame_callback.borrow_mut().take();
        self.listeners.clear();
        log::info!("page stopped");
    }
}

impl Drop for ClimatePage {
    fn drop(&mut self) {
        self.stop();
    }
}

impl ClimatePage {
    pub fn mount(config: AppConfig) -> Result<ClimatePage> {
        let window = web_sys::window().ok_or_else(|| Error::Dom("no global window".to_owned()))?;
        let document = window
            .document()
            .ok_or_else(|| Error::Dom("window has no document".to_owned()))?;
        let page = &config.page;

        // Everything fallible about the page happens before anything is registered
        let canvas: HtmlCanvasElement = element_by_id(&document, &page.canvas_id)?;
        let user_input: HtmlInputElement = element_by_id(&document, &page.user_input_id)?;
        let key_input: HtmlInputElement = element_by_id(&document, &page.api_key_input_id)?;
        let send_button: HtmlElement = element_by_id(&document, &page.send_button_id)?;
        let test_key_button: HtmlElement = element_by_id(&document, &page.test_key_button_id)?;
        let bounds = viewport_bounds(&window)?;

        let surface = CanvasSurface::new(canvas)?;
        surface.set_size(bounds);
        let animation: SharedAnimation = Rc::new(RefCell::new(Animation::new(surface)));
        let cancel = animation.borrow().cancel_handle();

        let resize_callback = {
            let window = window.clone();
            let animation = animation.clone();
            Closure::wrap(Box::new(move || match viewport_bounds(&window) {
                Ok(bounds) => {
                    let mut animation = animation.borrow_mut();
                    animation.surface().set_size(bounds);
                    animation.resize(bounds);
                }
                Err(err) => log::warn!("resize ignored: {}", err),
            }) as Box<dyn FnMut()>)
        };

        let relay = Rc::new(ChatRelay::new(
            &config.relay,
            Box::new(OpenAiClient::new(&config.relay)),
            Box::new(GoogleTtsClient::new(&config.relay)),
            Box::new(BrowserAudioPlayer),
            Box::new(DomMessageLog::new(document.clone(), &page.chat_box_id)),
            Box::new(BrowserNotifier::new(window.clone())),
        ));

        let send_callback = {
            let relay = relay.clone();
            let key_input = key_input.clone();
            Closure::wrap(Box::new(move || {
                let relay = relay.clone();
                let user_input = user_input.clone();
                let text = user_input.value();
                let key = key_input.value();
                wasm_bindgen_futures::spawn_local(async move {
                    let outcome = relay.send(&text, Some(key.as_str())).await;
                    log::debug!("chat turn finished: {:?}", outcome);
                    if outcome.clears_input() {
                        user_input.set_value("");
                    }
                });
            }) as Box<dyn FnMut()>)
        };

        let test_key_callback = Closure::wrap(Box::new(move || {
            let relay = relay.clone();
            let key = key_input.value();
            wasm_bindgen_futures::spawn_local(async move {
                relay.verify_key(Some(key.as_str())).await;
            });
        }) as Box<dyn FnMut()>);

        // Dropping this on an early return detaches whatever was attached
        let listeners = vec![
            Listener::attach(&window, "resize", resize_callback)?,
            Listener::attach(&send_button, "click", send_callback)?,
            Listener::attach(&test_key_button, "click", test_key_callback)?,
        ];

        let pending_frame = Rc::new(Cell::new(None));
        let frame_callback = start_frame_loop(&window, animation.clone(), pending_frame.clone())?;
        log::info!("page mounted at {}x{}", bounds.width, bounds.height);

        Ok(ClimatePage {
            window,
            animation,
            cancel,
            frame_callback,
            pending_frame,
            listeners,
        })
    }
}

fn viewport_bounds(window: &Window) -> Result<Bounds> {
    let width = window.inner_width().map_err(Error::from_js)?.as_f64().unwrap_or(0.0);
    let height = window.inner_height().map_err(Error::from_js)?.as_f64().unwrap_or(0.0);
    Ok(Bounds::new(width, height))
}

fn request_frame(window: &Window, callback: &Closure<dyn FnMut()>) -> Result<i32> {
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(Error::from_js)
}

// The callback re-registers itself after every frame it draws. Once the
// animation reports it is cancelled it simply stops asking for more.
fn start_frame_loop(
    window: &Window,
    animation: SharedAnimation,
    pending: Rc<Cell<Option<i32>>>,
) -> Result<FrameCallback> {
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let next = callback.clone();
    let frame_window = window.clone();
    let frame_pending = pending.clone();

    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_pending.set(None);
        let keep_going = {
            let _timer = log::log_enabled!(log::Level::Trace).then(|| Timer::new("ClimatePage::frame"));
            animation.borrow_mut().frame()
        };
        if !keep_going {
            return;
        }
        if let Some(cb) = next.borrow().as_ref() {
            match request_frame(&frame_window, cb) {
                Ok(id) => frame_pending.set(Some(id)),
                Err(err) => log::error!("animation halted: {}", err),
            }
        }
    }) as Box<dyn FnMut()>));

    let requested = callback.borrow().as_ref().map(|cb| request_frame(window, cb));
    match requested {
        Some(Ok(id)) => pending.set(Some(id)),
        Some(Err(err)) => {
            callback.borrow_mut().take();
            return Err(err);
        }
        None => {}
    }
    Ok(callback)
}
