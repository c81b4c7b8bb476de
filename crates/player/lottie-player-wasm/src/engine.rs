//! [`RenderEngine`] over a lottie-web style animation item.
//!
//! The host passes its `loadAnimation(params)` function; every engine call
//! goes through `js_sys::Reflect` on the returned item. Item events are
//! queued and the shared player is woken to drain them.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use js_sys::{Array, Function, Object, Reflect};
use log::{debug, warn};
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use lottie_player_core::{
    Direction, EngineError, EngineEvent, EngineParams, RenderEngine, Segment,
};

use crate::Shared;

pub(crate) type Inbox = Rc<RefCell<VecDeque<EngineEvent>>>;

const ITEM_EVENTS: [&str; 6] = [
    "enterFrame",
    "complete",
    "loopComplete",
    "data_ready",
    "DOMLoaded",
    "data_failed",
];

pub(crate) fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), EngineError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| EngineError::new(describe(&e)))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, EngineError> {
    value
        .serialize(&swb::Serializer::json_compatible())
        .map_err(|e| EngineError::new(e.to_string()))
}

fn to_event(name: &str, payload: &JsValue) -> Option<EngineEvent> {
    Some(match name {
        "enterFrame" => {
            let frame = Reflect::get(payload, &JsValue::from_str("currentTime"))
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            EngineEvent::EnterFrame {
                frame: frame as f32,
            }
        }
        "complete" => EngineEvent::Complete,
        "loopComplete" => EngineEvent::LoopComplete,
        "data_ready" => EngineEvent::DataReady,
        "DOMLoaded" => EngineEvent::DomLoaded,
        "data_failed" => EngineEvent::DataFailed,
        _ => return None,
    })
}

pub struct JsEngine {
    load_animation: Function,
    container: Element,
    item: Option<JsValue>,
    handlers: Vec<(&'static str, Closure<dyn FnMut(JsValue)>)>,
    inbox: Inbox,
    wake: Weak<Shared>,
}

impl JsEngine {
    pub(crate) fn new(
        load_animation: Function,
        container: Element,
        inbox: Inbox,
        wake: Weak<Shared>,
    ) -> Self {
        Self {
            load_animation,
            container,
            item: None,
            handlers: Vec::new(),
            inbox,
            wake,
        }
    }

    fn listen(&mut self, item: &JsValue) -> Result<(), EngineError> {
        let add: Function = Reflect::get(item, &JsValue::from_str("addEventListener"))
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or_else(|| EngineError::new("animation item has no addEventListener"))?;

        for name in ITEM_EVENTS {
            let inbox = self.inbox.clone();
            let wake = self.wake.clone();
            let handler = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
                if let Some(event) = to_event(name, &payload) {
                    inbox.borrow_mut().push_back(event);
                }
                if let Some(shared) = wake.upgrade() {
                    shared.pump();
                }
            });
            add.call2(item, &JsValue::from_str(name), handler.as_ref())
                .map_err(|e| EngineError::new(describe(&e)))?;
            self.handlers.push((name, handler));
        }
        Ok(())
    }

    /// Events the item fired before our listeners were attached.
    fn catch_up(&self, item: &JsValue) {
        let loaded = Reflect::get(item, &JsValue::from_str("isLoaded"))
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let has_data = Reflect::get(item, &JsValue::from_str("animationData"))
            .map(|v| v.is_object())
            .unwrap_or(false);
        let mut inbox = self.inbox.borrow_mut();
        if loaded || has_data {
            inbox.push_back(EngineEvent::DataReady);
        }
        if loaded {
            inbox.push_back(EngineEvent::DomLoaded);
        }
    }

    fn unlisten(&mut self) {
        let handlers = std::mem::take(&mut self.handlers);
        let Some(item) = &self.item else {
            return;
        };
        let remove = Reflect::get(item, &JsValue::from_str("removeEventListener"))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok());
        if let Some(remove) = remove {
            for (name, handler) in &handlers {
                if let Err(e) = remove.call2(item, &JsValue::from_str(name), handler.as_ref()) {
                    debug!("engine: removing {name} listener failed: {}", describe(&e));
                }
            }
        }
    }

    fn invoke(&self, method: &str, args: &[JsValue]) {
        let Some(item) = &self.item else {
            return;
        };
        let result = Reflect::get(item, &JsValue::from_str(method))
            .and_then(|f| f.dyn_into::<Function>())
            .and_then(|f| f.apply(item, &args.iter().collect::<Array>()));
        if let Err(e) = result {
            warn!("engine: {method} failed: {}", describe(&e));
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        let item = self.item.as_ref()?;
        Reflect::get(item, &JsValue::from_str(key)).ok()?.as_f64()
    }
}

impl Drop for JsEngine {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl RenderEngine for JsEngine {
    fn load(&mut self, params: EngineParams<'_>) -> Result<(), EngineError> {
        self.destroy();

        let opts = Object::new();
        set(&opts, "container", self.container.as_ref())?;
        set(&opts, "renderer", &JsValue::from_str(params.renderer.name()))?;
        set(&opts, "loop", &JsValue::from_bool(params.looping))?;
        set(&opts, "autoplay", &JsValue::from_bool(params.autoplay))?;
        set(&opts, "animationData", &to_js(params.document.as_value())?)?;
        set(&opts, "rendererSettings", &to_js(&params.renderer_settings)?)?;
        if let Some(segment) = params.initial_segment {
            set(&opts, "initialSegment", &to_js(&segment)?)?;
        }

        let item = self
            .load_animation
            .call1(&JsValue::UNDEFINED, &opts)
            .map_err(|e| EngineError::new(describe(&e)))?;
        if item.is_undefined() || item.is_null() {
            return Err(EngineError::new("loadAnimation returned nothing"));
        }
        if let Err(err) = self.listen(&item) {
            // Tear down whatever was mounted and attached so far.
            self.item = Some(item);
            self.destroy();
            return Err(err);
        }
        self.catch_up(&item);
        debug!("engine: animation item created ({})", params.renderer.name());
        self.item = Some(item);
        Ok(())
    }

    fn destroy(&mut self) {
        self.unlisten();
        self.invoke("destroy", &[]);
        self.item = None;
    }

    fn play(&mut self) {
        self.invoke("play", &[]);
    }

    fn pause(&mut self) {
        self.invoke("pause", &[]);
    }

    fn stop(&mut self) {
        self.invoke("stop", &[]);
    }

    fn go_to_and_stop(&mut self, value: f32, is_frame: bool) {
        self.invoke(
            "goToAndStop",
            &[JsValue::from_f64(value.into()), JsValue::from_bool(is_frame)],
        );
    }

    fn go_to_and_play(&mut self, value: f32, is_frame: bool) {
        self.invoke(
            "goToAndPlay",
            &[JsValue::from_f64(value.into()), JsValue::from_bool(is_frame)],
        );
    }

    fn set_speed(&mut self, speed: f32) {
        self.invoke("setSpeed", &[JsValue::from_f64(speed.into())]);
    }

    fn set_direction(&mut self, direction: Direction) {
        self.invoke("setDirection", &[JsValue::from(direction.as_i8())]);
    }

    fn set_loop(&mut self, looping: bool) {
        // A property on lottie-web items, not a method.
        if let Some(item) = &self.item {
            if let Err(e) = Reflect::set(item, &JsValue::from_str("loop"), &JsValue::from_bool(looping)) {
                warn!("engine: setting loop failed: {}", describe(&e));
            }
        }
    }

    fn set_subframe(&mut self, enabled: bool) {
        self.invoke("setSubframe", &[JsValue::from_bool(enabled)]);
    }

    fn play_segments(&mut self, segment: Segment, force: bool) {
        let pair = Array::of2(
            &JsValue::from_f64(segment.start.into()),
            &JsValue::from_f64(segment.end.into()),
        );
        self.invoke("playSegments", &[pair.into(), JsValue::from_bool(force)]);
    }

    fn current_frame(&self) -> f32 {
        self.number("currentFrame").unwrap_or(0.0) as f32
    }

    fn total_frames(&self) -> f32 {
        self.number("totalFrames").unwrap_or(0.0) as f32
    }

    fn direction(&self) -> Direction {
        match self.number("playDirection") {
            Some(d) if d < 0.0 => Direction::Backward,
            _ => Direction::Forward,
        }
    }

    fn snapshot_svg(&self) -> Option<String> {
        self.item.as_ref()?;
        self.container
            .query_selector("svg")
            .ok()
            .flatten()
            .map(|svg| svg.outer_html())
    }
}
