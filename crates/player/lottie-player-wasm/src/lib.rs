//! wasm-bindgen surface of the Lottie/dotLottie player.
//!
//! `DotLottiePlayer` owns a [`Player`] driving a lottie-web item through
//! [`JsEngine`]. Engine callbacks, timers and control clicks all re-enter
//! through [`Shared::pump`], which drains queued work while no other call
//! holds the player.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::{Array, Function, Object, Promise};
use log::{debug, warn, LevelFilter};
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Blob, BlobPropertyBag, Element, Event, HtmlAnchorElement, HtmlInputElement, Url};

use lottie_bundle_core::{resolve_document, resolve_response};
use lottie_player_core::{
    AnimationSettings, Direction, PlayMode, Player, PlayerConfig, PlayerEvent, PlayerEventKind,
    ScheduledTask, SeekTarget, Segment, Snapshot, Source,
};

mod controls;
mod engine;
mod fetch;
pub mod logger;

use engine::{describe, Inbox, JsEngine};

type JsListener = (Option<PlayerEventKind>, Function);
type DomHandler = (Element, &'static str, Closure<dyn FnMut(Event)>);

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn js_error(err: JsValue) -> JsError {
    JsError::new(&describe(&err))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&swb::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("serialize error: {e}")))
}

fn create_div(document: &web_sys::Document, class: &str) -> Result<Element, JsError> {
    let div = document.create_element("div").map_err(js_error)?;
    div.set_class_name(class);
    Ok(div)
}

pub(crate) struct Shared {
    player: RefCell<Player<JsEngine>>,
    inbox: Inbox,
    outbox: Rc<RefCell<Vec<PlayerEvent>>>,
    listeners: RefCell<Vec<JsListener>>,
    animation: Element,
    controls: Element,
    controls_key: RefCell<Option<String>>,
    dragging: Cell<bool>,
    dom_handlers: RefCell<Vec<DomHandler>>,
}

impl Shared {
    fn with<R>(self: &Rc<Self>, f: impl FnOnce(&mut Player<JsEngine>) -> R) -> R {
        let out = f(&mut self.player.borrow_mut());
        self.pump();
        out
    }

    /// Drain engine events, hand deferred tasks to `setTimeout`, refresh the
    /// control bar and notify JS listeners. A no-op while the player is
    /// borrowed; the outer caller pumps on its way out.
    pub(crate) fn pump(self: &Rc<Self>) {
        loop {
            let (events, tasks) = {
                let Ok(mut player) = self.player.try_borrow_mut() else {
                    return;
                };
                let pending: Vec<_> = self.inbox.borrow_mut().drain(..).collect();
                for event in pending {
                    player.handle_engine_event(event);
                }
                let tasks = player.take_scheduled();
                let events: Vec<PlayerEvent> = self.outbox.borrow_mut().drain(..).collect();
                self.render_controls(&player);
                (events, tasks)
            };
            for task in tasks {
                self.set_timeout(task);
            }
            if events.is_empty() && self.inbox.borrow().is_empty() {
                return;
            }
            self.dispatch(&events);
        }
    }

    fn set_timeout(self: &Rc<Self>, task: ScheduledTask) {
        let delay = i32::try_from(task.delay_ms).unwrap_or(i32::MAX);
        let weak: Weak<Self> = Rc::downgrade(self);
        let callback = Closure::once_into_js(move || {
            if let Some(shared) = weak.upgrade() {
                match shared.player.try_borrow_mut() {
                    Ok(mut player) => player.run_scheduled(task),
                    Err(_) => {
                        // Busy in a synchronous call; retry on the next tick.
                        debug!("player: {:?} deferred, player busy", task.task);
                        shared.set_timeout(ScheduledTask { delay_ms: 0, ..task });
                        return;
                    }
                }
                shared.pump();
            }
        });
        let Some(window) = web_sys::window() else {
            warn!("player: no window to schedule on");
            return;
        };
        if let Err(e) = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            warn!("player: setTimeout failed: {}", describe(&e));
        }
    }

    fn render_controls(&self, player: &Player<JsEngine>) {
        let bar = player.controls();
        let key = controls::render_key(&bar);
        let mut last = self.controls_key.borrow_mut();
        if last.as_deref() != Some(key.as_str()) {
            self.controls.set_inner_html(&controls::render(&bar));
            *last = Some(key);
            return;
        }
        if !self.dragging.get() {
            let seeker = self
                .controls
                .query_selector(".seeker")
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
            if let Some(seeker) = seeker {
                seeker.set_value(&bar.seeker.round().to_string());
            }
        }
        if let Ok(Some(label)) = self.controls.query_selector(".frame") {
            label.set_text_content(Some(&bar.frame_label));
        }
    }

    fn dispatch(&self, events: &[PlayerEvent]) {
        let listeners = self.listeners.borrow().clone();
        for event in events {
            let payload = match to_js(event) {
                Ok(v) => v,
                Err(_) => {
                    warn!("player: could not serialize {} event", event.name());
                    continue;
                }
            };
            for (kind, f) in &listeners {
                if kind.map_or(true, |k| k == event.kind()) {
                    if let Err(e) = f.call1(&JsValue::NULL, &payload) {
                        warn!("player: {} listener threw: {}", event.name(), describe(&e));
                    }
                }
            }
        }
    }

    fn listen_dom(
        self: &Rc<Self>,
        target: &Element,
        name: &'static str,
        mut handler: impl FnMut(&Rc<Self>, Event) + 'static,
    ) -> Result<(), JsError> {
        let weak = Rc::downgrade(self);
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(shared) = weak.upgrade() {
                handler(&shared, event);
            }
        });
        target
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        self.dom_handlers
            .borrow_mut()
            .push((target.clone(), name, closure));
        Ok(())
    }

    fn wire_dom(self: &Rc<Self>, container: &Element) -> Result<(), JsError> {
        let controls = self.controls.clone();
        self.listen_dom(&controls, "click", |shared, event| {
            let action = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-action]").ok().flatten())
                .and_then(|el| el.get_attribute("data-action"));
            if let Some(action) = action {
                shared.control_action(&action);
            }
        })?;
        self.listen_dom(&controls, "input", |shared, event| {
            let value = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                .and_then(|input| input.value().parse::<f32>().ok());
            let Some(percent) = value else {
                return;
            };
            if !shared.dragging.replace(true) {
                shared.with(|p| p.seek_drag_start());
            }
            shared.with(|p| p.seek_drag(percent));
        })?;
        self.listen_dom(&controls, "change", |shared, _| {
            if shared.dragging.replace(false) {
                shared.with(|p| p.seek_drag_end());
            }
        })?;
        self.listen_dom(container, "mouseenter", |shared, _| {
            shared.with(|p| p.pointer_enter());
        })?;
        self.listen_dom(container, "mouseleave", |shared, _| {
            shared.with(|p| p.pointer_leave());
        })?;
        Ok(())
    }

    fn control_action(self: &Rc<Self>, action: &str) {
        let result = match action {
            "toggle-play" => Ok(self.with(|p| p.toggle_play())),
            "stop" => Ok(self.with(|p| p.stop())),
            "toggle-loop" => Ok(self.with(|p| p.toggle_looping())),
            "toggle-boomerang" => Ok(self.with(|p| p.toggle_boomerang())),
            "prev" => self.with(|p| p.prev()).map_err(|e| e.to_string()),
            "next" => self.with(|p| p.next()).map_err(|e| e.to_string()),
            "snapshot" => self.download_snapshot(None).map(|_| ()).map_err(|e| {
                let value: JsValue = e.into();
                describe(&value)
            }),
            other => {
                debug!("player: ignoring unknown control action '{other}'");
                Ok(())
            }
        };
        if let Err(message) = result {
            warn!("player: control '{action}' failed: {message}");
        }
    }

    fn download_snapshot(&self, name: Option<&str>) -> Result<Snapshot, JsError> {
        let snapshot = self
            .player
            .borrow()
            .snapshot(name)
            .map_err(|e| JsError::new(&e.to_string()))?;
        trigger_download(&snapshot)?;
        Ok(snapshot)
    }

    fn apply_background(&self, background: &str) {
        if let Err(e) = self
            .animation
            .set_attribute("style", &format!("background:{background}"))
        {
            debug!("player: background not applied: {}", describe(&e));
        }
    }

    async fn load(self: &Rc<Self>, source: Source) {
        let ticket = self.with(|p| p.begin_load(source.clone()));
        let result = match &source {
            Source::Url(url) => match fetch::fetch(url).await {
                Ok(response) => resolve_response(url, response),
                Err(e) => Err(e),
            },
            Source::Document(value) => Ok(resolve_document(value.clone())),
        };
        self.with(|p| p.complete_load(ticket, result));
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        for (target, name, closure) in self.dom_handlers.get_mut().drain(..) {
            let _ = target.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
    }
}

fn trigger_download(snapshot: &Snapshot) -> Result<(), JsError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsError::new("snapshot: no document"))?;
    let options = BlobPropertyBag::new();
    options.set_type(&snapshot.mime_type);
    let parts = Array::of1(&JsValue::from_str(&snapshot.data));
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(js_error)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(js_error)?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| JsError::new("snapshot: could not create anchor"))?;
    anchor.set_href(&url);
    anchor.set_download(&snapshot.file_name);
    anchor.click();
    Url::revoke_object_url(&url).map_err(js_error)
}

/// Unusable input becomes an empty document so it fails like any other
/// broken file, through the player's Error state.
fn source_from_js(src: JsValue) -> Source {
    if let Some(url) = src.as_string() {
        return Source::Url(url);
    }
    if jsvalue_is_undefined_or_null(&src) {
        warn!("player: load called without a source");
        return Source::Document(serde_json::Value::Null);
    }
    match swb::from_value(src) {
        Ok(value) => Source::Document(value),
        Err(e) => {
            warn!("player: animation data is not JSON: {e}");
            Source::Document(serde_json::Value::Null)
        }
    }
}

#[wasm_bindgen]
pub struct DotLottiePlayer {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl DotLottiePlayer {
    /// Mount a player into `container`.
    ///
    /// `load_animation` is lottie-web's `loadAnimation`. `config` is a JSON
    /// object of player options, or undefined/null for defaults:
    ///   new DotLottiePlayer(el, lottie.loadAnimation, { loop: true, controls: true })
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: Element,
        load_animation: Function,
        config: JsValue,
    ) -> Result<DotLottiePlayer, JsError> {
        console_error_panic_hook::set_once();
        if log::max_level() == LevelFilter::Off {
            logger::init(LevelFilter::Warn);
        }

        let cfg: PlayerConfig = if jsvalue_is_undefined_or_null(&config) {
            PlayerConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsError::new("no document to mount into"))?;
        let animation = create_div(&document, "animation")?;
        let controls_el = create_div(&document, "controls")?;
        if let Some(description) = &cfg.description {
            animation
                .set_attribute("aria-label", description)
                .map_err(js_error)?;
        }
        animation.set_attribute("role", "img").map_err(js_error)?;
        container.append_child(&animation).map_err(js_error)?;
        container.append_child(&controls_el).map_err(js_error)?;

        let background = cfg.background.clone();
        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
            let inbox = Inbox::default();
            let engine = JsEngine::new(load_animation, animation.clone(), inbox.clone(), weak.clone());
            let mut player = Player::new(engine, cfg);
            let outbox: Rc<RefCell<Vec<PlayerEvent>>> = Rc::default();
            let sink = outbox.clone();
            player.subscribe(None, Box::new(move |event: &PlayerEvent| {
                sink.borrow_mut().push(event.clone())
            }));
            Shared {
                player: RefCell::new(player),
                inbox,
                outbox,
                listeners: RefCell::new(Vec::new()),
                animation,
                controls: controls_el,
                controls_key: RefCell::new(None),
                dragging: Cell::new(false),
                dom_handlers: RefCell::new(Vec::new()),
            }
        });
        shared.apply_background(&background);
        shared.wire_dom(&container)?;
        shared.pump();
        Ok(DotLottiePlayer { shared })
    }

    /// Load a `.json`/`.lottie` URL or an animation object. The promise
    /// always resolves once loading settles; failures show up as the
    /// `"error"` state, `error()` and an `error` event.
    pub fn load(&self, src: JsValue) -> Promise {
        let shared = self.shared.clone();
        future_to_promise(async move {
            shared.load(source_from_js(src)).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Load the last source again. Resolves immediately before the first load.
    pub fn reload(&self) -> Promise {
        let shared = self.shared.clone();
        let source = shared.player.borrow().source().cloned();
        future_to_promise(async move {
            match source {
                Some(source) => shared.load(source).await,
                None => warn!("player: reload requested before any load"),
            }
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn play(&self) {
        self.shared.with(|p| p.play());
    }

    pub fn pause(&self) {
        self.shared.with(|p| p.pause());
    }

    pub fn stop(&self) {
        self.shared.with(|p| p.stop());
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&self) {
        self.shared.with(|p| p.toggle_play());
    }

    /// Seek to a frame number, or a string such as `"42"` or `"50%"`.
    pub fn seek(&self, value: JsValue) {
        if let Some(frame) = value.as_f64() {
            if frame.is_finite() && frame >= 0.0 {
                self.shared.with(|p| p.seek_to(SeekTarget::Frame(frame as f32)));
            }
        } else if let Some(text) = value.as_string() {
            self.shared.with(|p| p.seek(&text));
        }
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&self, speed: f32) {
        self.shared.with(|p| p.set_speed(speed));
    }

    #[wasm_bindgen(js_name = setDirection)]
    pub fn set_direction(&self, direction: i8) -> Result<(), JsError> {
        let direction = Direction::try_from(direction).map_err(|e| JsError::new(&e))?;
        self.shared.with(|p| p.set_direction(direction));
        Ok(())
    }

    #[wasm_bindgen(js_name = setLoop)]
    pub fn set_looping(&self, looping: bool) {
        self.shared.with(|p| p.set_looping(looping));
    }

    #[wasm_bindgen(js_name = toggleLoop)]
    pub fn toggle_looping(&self) {
        self.shared.with(|p| p.toggle_looping());
    }

    /// `"normal"` or `"bounce"`.
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&self, mode: &str) -> Result<(), JsError> {
        let mode: PlayMode =
            serde_json::from_value(serde_json::Value::String(mode.to_ascii_lowercase()))
                .map_err(|_| JsError::new(&format!("unknown mode '{mode}'")))?;
        self.shared.with(|p| p.set_mode(mode));
        Ok(())
    }

    #[wasm_bindgen(js_name = toggleBoomerang)]
    pub fn toggle_boomerang(&self) {
        self.shared.with(|p| p.toggle_boomerang());
    }

    #[wasm_bindgen(js_name = setCount)]
    pub fn set_count(&self, count: Option<u32>) {
        self.shared.with(|p| p.set_count(count));
    }

    #[wasm_bindgen(js_name = setIntermission)]
    pub fn set_intermission(&self, ms: u32) {
        self.shared.with(|p| p.set_intermission(ms));
    }

    #[wasm_bindgen(js_name = setSubframe)]
    pub fn set_subframe(&self, enabled: bool) {
        self.shared.with(|p| p.set_subframe(enabled));
    }

    /// `[start, end]`, or null to clear.
    #[wasm_bindgen(js_name = setSegment)]
    pub fn set_segment(&self, segment: JsValue) -> Result<(), JsError> {
        let segment: Option<Segment> = if jsvalue_is_undefined_or_null(&segment) {
            None
        } else {
            Some(swb::from_value(segment).map_err(|e| JsError::new(&format!("segment error: {e}")))?)
        };
        self.shared
            .with(|p| p.set_segment(segment))
            .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = setMultiAnimationSettings)]
    pub fn set_multi_animation_settings(&self, settings: JsValue) -> Result<(), JsError> {
        let settings: Vec<AnimationSettings> = if jsvalue_is_undefined_or_null(&settings) {
            Vec::new()
        } else {
            swb::from_value(settings)
                .map_err(|e| JsError::new(&format!("multiAnimationSettings error: {e}")))?
        };
        self.shared.with(|p| p.set_multi_animation_settings(settings));
        Ok(())
    }

    pub fn next(&self) -> Result<(), JsError> {
        self.shared
            .with(|p| p.next())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    pub fn prev(&self) -> Result<(), JsError> {
        self.shared
            .with(|p| p.prev())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Capture the current frame as SVG markup. With `download`, the browser
    /// also saves it as `<name>-<frame>.svg`.
    pub fn snapshot(&self, download: bool, name: Option<String>) -> Result<String, JsError> {
        let snapshot = if download {
            self.shared.download_snapshot(name.as_deref())?
        } else {
            self.shared
                .player
                .borrow()
                .snapshot(name.as_deref())
                .map_err(|e| JsError::new(&e.to_string()))?
        };
        Ok(snapshot.data)
    }

    /// Reflect an element attribute. `value` is null when it was removed.
    /// Returns false for attributes the player does not own, such as `src`.
    #[wasm_bindgen(js_name = setAttribute)]
    pub fn set_attribute(&self, name: &str, value: Option<String>) -> Result<bool, JsError> {
        let handled = self
            .shared
            .with(|p| p.apply_attribute(name, value.as_deref()))
            .map_err(|e| JsError::new(&e.to_string()))?;
        if handled && name.eq_ignore_ascii_case("background") {
            let background = self.shared.player.borrow().config().background.clone();
            self.shared.apply_background(&background);
        }
        Ok(handled)
    }

    /// Run a control bar action by its `data-action` name.
    #[wasm_bindgen(js_name = controlAction)]
    pub fn control_action(&self, action: &str) {
        self.shared.control_action(action);
    }

    pub fn destroy(&self) {
        self.shared.with(|p| p.destroy());
    }

    pub fn freeze(&self) {
        self.shared.with(|p| p.freeze());
    }

    pub fn unfreeze(&self) {
        self.shared.with(|p| p.unfreeze());
    }

    /// Host element was attached to the document.
    pub fn connected(&self) {
        self.shared.with(|p| p.connect());
    }

    /// Host element was removed from the document.
    pub fn disconnected(&self) {
        self.shared.with(|p| p.disconnect());
    }

    #[wasm_bindgen(js_name = setDocumentHidden)]
    pub fn set_document_hidden(&self, hidden: bool) {
        self.shared.with(|p| p.set_document_hidden(hidden));
    }

    #[wasm_bindgen(js_name = setIntersecting)]
    pub fn set_intersecting(&self, visible: bool) {
        self.shared.with(|p| p.set_intersecting(visible));
    }

    #[wasm_bindgen(js_name = pointerEnter)]
    pub fn pointer_enter(&self) {
        self.shared.with(|p| p.pointer_enter());
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&self) {
        self.shared.with(|p| p.pointer_leave());
    }

    /// Page scroll offset and viewport height, in CSS pixels.
    pub fn scroll(&self, scroll_y: f32, viewport_height: f32) {
        self.shared.with(|p| p.scroll(scroll_y, viewport_height));
    }

    /// Subscribe to an event by name (`"play"`, `"frame"`, ...) or `"*"`.
    #[wasm_bindgen(js_name = addEventListener)]
    pub fn add_event_listener(&self, name: &str, listener: Function) -> Result<(), JsError> {
        let kind = if name == "*" {
            None
        } else {
            Some(
                PlayerEventKind::from_name(name)
                    .ok_or_else(|| JsError::new(&format!("unknown event '{name}'")))?,
            )
        };
        self.shared.listeners.borrow_mut().push((kind, listener));
        Ok(())
    }

    #[wasm_bindgen(js_name = removeEventListener)]
    pub fn remove_event_listener(&self, name: &str, listener: Function) {
        let kind = if name == "*" {
            None
        } else {
            PlayerEventKind::from_name(name)
        };
        self.shared
            .listeners
            .borrow_mut()
            .retain(|(k, f)| !(*k == kind && Object::is(f, &listener)));
    }

    /// Current state name, e.g. `"playing"`.
    pub fn state(&self) -> String {
        self.shared.player.borrow().state().name().to_string()
    }

    #[wasm_bindgen(js_name = currentFrame)]
    pub fn current_frame(&self) -> f32 {
        self.shared.player.borrow().position()
    }

    #[wasm_bindgen(js_name = totalFrames)]
    pub fn total_frames(&self) -> f32 {
        self.shared.player.borrow().total_frames()
    }

    pub fn seeker(&self) -> f32 {
        self.shared.player.borrow().seeker()
    }

    #[wasm_bindgen(js_name = loopCount)]
    pub fn loop_count(&self) -> u32 {
        self.shared.player.borrow().loop_count()
    }

    #[wasm_bindgen(js_name = currentAnimation)]
    pub fn current_animation(&self) -> u32 {
        self.shared.player.borrow().current_animation() as u32
    }

    #[wasm_bindgen(js_name = isDotLottie)]
    pub fn is_dot_lottie(&self) -> bool {
        self.shared.player.borrow().is_dot_lottie()
    }

    /// Full playback state as a JSON object.
    pub fn playback(&self) -> Result<JsValue, JsError> {
        to_js(self.shared.player.borrow().playback())
    }

    /// The dotLottie manifest, synthesized for plain JSON; null before load.
    pub fn manifest(&self) -> Result<JsValue, JsError> {
        to_js(&self.shared.player.borrow().manifest())
    }

    pub fn config(&self) -> Result<JsValue, JsError> {
        to_js(self.shared.player.borrow().config())
    }

    /// Control bar model as JSON.
    pub fn controls(&self) -> Result<JsValue, JsError> {
        to_js(&self.shared.player.borrow().controls())
    }

    /// `{ message, status }` of the last failure, or null.
    pub fn error(&self) -> Result<JsValue, JsError> {
        to_js(&self.shared.player.borrow().error())
    }
}

#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
