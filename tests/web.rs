// Test suite for the Web and headless browsers.

#![cfg(target_arch = "wasm32")]

extern crate wasm_bindgen_test;

use climate_survivor_web::animation::Animation;
use climate_survivor_web::browser::{element_by_id, DomMessageLog};
use climate_survivor_web::field::PARTICLE_COUNT;
use climate_survivor_web::relay::{MessageKind, MessageLog};
use climate_survivor_web::surface::{Bounds, CanvasSurface, Surface};
use climate_survivor_web::start;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, Event, HtmlCanvasElement, HtmlElement, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn canvas(width: u32, height: u32) -> HtmlCanvasElement {
    let canvas = document()
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(width);
    canvas.set_height(height);
    canvas
}

#[wasm_bindgen_test]
fn canvas_surface_reports_and_changes_its_size() {
    let surface = CanvasSurface::new(canvas(320, 200)).unwrap();
    assert_eq!(surface.bounds(), Bounds::new(320.0, 200.0));

    surface.set_size(Bounds::new(64.0, 48.0));
    assert_eq!(surface.bounds(), Bounds::new(64.0, 48.0));
}

#[wasm_bindgen_test]
fn animation_draws_frames_onto_a_canvas() {
    let mut animation = Animation::new(CanvasSurface::new(canvas(120, 80)).unwrap());

    assert!(animation.frame());
    assert!(animation.frame());
    assert_eq!(animation.frames(), 2);
    assert_eq!(animation.field().particles().len(), PARTICLE_COUNT);

    animation.cancel_handle().cancel();
    assert!(!animation.frame());
}

#[wasm_bindgen_test]
fn message_log_appends_classed_lines() {
    let doc = document();
    let chat_box = doc.create_element("div").unwrap();
    chat_box.set_id("web-test-chat-box");
    doc.body().unwrap().append_child(&chat_box).unwrap();

    let log = DomMessageLog::new(doc.clone(), "web-test-chat-box");
    log.append("You: hello", MessageKind::User);
    log.append("Error: Chatbot error: 401", MessageKind::Error);

    let chat_box: web_sys::HtmlElement = element_by_id(&doc, "web-test-chat-box").unwrap();
    assert_eq!(chat_box.child_element_count(), 2);
    let last = chat_box.last_element_child().unwrap();
    assert_eq!(last.class_name(), "error-message");
    assert_eq!(last.text_content().unwrap(), "Error: Chatbot error: 401");
}

#[wasm_bindgen_test]
fn message_log_without_chat_box_drops_the_line() {
    let log = DomMessageLog::new(document(), "no-such-chat-box");
    log.append("You: hello", MessageKind::User);
}

// The stock page markup, removed again when dropped
struct PageFixture {
    root: Element,
}

impl PageFixture {
    fn new(skip_id: Option<&str>) -> PageFixture {
        let doc = document();
        let root = doc.create_element("div").unwrap();
        for (tag, id) in [
            ("canvas", "climateCanvas"),
            ("input", "api-key-input"),
            ("div", "chatBox"),
            ("input", "userInput"),
            ("button", "sendMessageBtn"),
            ("button", "test-api-key"),
        ] {
            if skip_id == Some(id) {
                continue;
            }
            let el = doc.create_element(tag).unwrap();
            el.set_id(id);
            root.append_child(&el).unwrap();
        }
        doc.body().unwrap().append_child(&root).unwrap();
        PageFixture { root }
    }

    fn element<T: JsCast>(&self, id: &str) -> T {
        element_by_id(&document(), id).unwrap()
    }
}

impl Drop for PageFixture {
    fn drop(&mut self) {
        self.root.remove();
    }
}

async fn next_animation_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .request_animation_frame(&resolve)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn count_window_errors() -> (Rc<Cell<u32>>, Closure<dyn FnMut()>) {
    let errors = Rc::new(Cell::new(0));
    let counter = errors.clone();
    let callback = Closure::wrap(Box::new(move || counter.set(counter.get() + 1)) as Box<dyn FnMut()>);
    web_sys::window()
        .unwrap()
        .add_event_listener_with_callback("error", callback.as_ref().unchecked_ref())
        .unwrap();
    (errors, callback)
}

fn stop_counting_errors(callback: &Closure<dyn FnMut()>) {
    web_sys::window()
        .unwrap()
        .remove_event_listener_with_callback("error", callback.as_ref().unchecked_ref())
        .unwrap();
}

#[wasm_bindgen_test]
async fn mounted_page_animates_resizes_and_stops() {
    let fixture = PageFixture::new(None);
    let mut page = start(None).unwrap();
    assert!(page.is_running());

    next_animation_frame().await;
    next_animation_frame().await;
    assert!(page.frames() > 0.0);

    let canvas: HtmlCanvasElement = fixture.element("climateCanvas");
    canvas.set_width(1);
    canvas.set_height(1);
    web_sys::window()
        .unwrap()
        .dispatch_event(&Event::new("resize").unwrap())
        .unwrap();

    let window = web_sys::window().unwrap();
    let width = window.inner_width().unwrap().as_f64().unwrap() as u32;
    let height = window.inner_height().unwrap().as_f64().unwrap() as u32;
    assert_eq!((canvas.width(), canvas.height()), (width, height));
    assert_eq!(page.particle_count(), PARTICLE_COUNT);

    page.stop();
    assert!(!page.is_running());
    let frames = page.frames();
    next_animation_frame().await;
    next_animation_frame().await;
    assert_eq!(page.frames(), frames);

    // Listeners are gone: a resize no longer touches the canvas
    canvas.set_width(1);
    window.dispatch_event(&Event::new("resize").unwrap()).unwrap();
    assert_eq!(canvas.width(), 1);
}

#[wasm_bindgen_test]
async fn failed_turn_clears_the_input() {
    let fixture = PageFixture::new(None);
    let config = r#"{ "relay": { "completion_base_url": "http://127.0.0.1:9/v1" } }"#;
    let page = start(Some(config.to_owned())).unwrap();

    let key: HtmlInputElement = fixture.element("api-key-input");
    let input: HtmlInputElement = fixture.element("userInput");
    key.set_value("sk-test");
    input.set_value("is anyone left?");
    let send: HtmlElement = fixture.element("sendMessageBtn");
    send.click();

    for _ in 0..600 {
        if input.value().is_empty() {
            break;
        }
        next_animation_frame().await;
    }
    assert_eq!(input.value(), "");

    let chat_box: Element = fixture.element("chatBox");
    let last = chat_box.last_element_child().unwrap();
    assert_eq!(last.class_name(), "error-message");
    drop(page);
}

#[wasm_bindgen_test]
async fn blank_input_is_kept_and_logs_nothing() {
    let fixture = PageFixture::new(None);
    let page = start(None).unwrap();

    let input: HtmlInputElement = fixture.element("userInput");
    input.set_value("   ");
    let send: HtmlElement = fixture.element("sendMessageBtn");
    send.click();
    next_animation_frame().await;

    assert_eq!(input.value(), "   ");
    let chat_box: Element = fixture.element("chatBox");
    assert_eq!(chat_box.child_element_count(), 0);
    drop(page);
}

#[wasm_bindgen_test]
fn failed_mount_leaves_no_listeners_behind() {
    let fixture = PageFixture::new(Some("test-api-key"));
    assert!(start(None).is_err());

    let (errors, on_error) = count_window_errors();
    web_sys::window()
        .unwrap()
        .dispatch_event(&Event::new("resize").unwrap())
        .unwrap();
    fixture.element::<HtmlElement>("sendMessageBtn").click();
    stop_counting_errors(&on_error);

    assert_eq!(errors.get(), 0);
}

#[wasm_bindgen_test]
async fn dropping_the_page_without_stop_detaches_it() {
    let fixture = PageFixture::new(None);
    let page = start(None).unwrap();
    drop(page);

    let (errors, on_error) = count_window_errors();
    let canvas: HtmlCanvasElement = fixture.element("climateCanvas");
    canvas.set_width(1);
    web_sys::window()
        .unwrap()
        .dispatch_event(&Event::new("resize").unwrap())
        .unwrap();
    next_animation_frame().await;
    stop_counting_errors(&on_error);

    assert_eq!(errors.get(), 0);
    assert_eq!(canvas.width(), 1);
}
