#![cfg(target_arch = "wasm32")]
use js_sys::{Function, Reflect, JSON};
use lottie_player_wasm::{abi_version, DotLottiePlayer};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

const SPINNER: &str = include_str!("../../../../fixtures/animations/spinner.json");

// Stand-in for lottie-web's loadAnimation: records calls on the item and
// reports itself as already loaded.
fn fake_load_animation() -> Function {
    Function::new_with_args(
        "params",
        r#"
        const data = params.animationData;
        const item = {
            calls: [],
            handlers: {},
            isLoaded: true,
            animationData: data,
            totalFrames: data.op - data.ip,
            currentFrame: 0,
            playDirection: 1,
            loop: params.loop,
            addEventListener(name, f) { (this.handlers[name] = this.handlers[name] || []).push(f); },
            removeEventListener(name, f) {
                this.handlers[name] = (this.handlers[name] || []).filter((g) => g !== f);
            },
            fire(name, payload) { (this.handlers[name] || []).forEach((f) => f(payload)); },
        };
        for (const m of ["play", "pause", "stop", "destroy", "goToAndStop", "goToAndPlay",
                         "setSpeed", "setDirection", "setSubframe", "playSegments"]) {
            item[m] = function (...args) { this.calls.push([m, ...args]); };
        }
        globalThis.__lottieItem = item;
        return item;
        "#,
    )
}

fn container() -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let el = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&el).unwrap();
    el
}

fn spinner() -> JsValue {
    JSON::parse(SPINNER).unwrap()
}

fn config(json: &str) -> JsValue {
    JSON::parse(json).unwrap()
}

// Method names the fake item recorded, comma separated.
fn item_calls() -> String {
    Function::new_no_args("return globalThis.__lottieItem.calls.map((c) => c[0]).join(',')")
        .call0(&JsValue::NULL)
        .unwrap()
        .as_string()
        .unwrap()
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults() {
    let player = DotLottiePlayer::new(container(), fake_load_animation(), JsValue::UNDEFINED);
    assert!(player.is_ok());
    assert_eq!(player.unwrap().state(), "loading");
}

#[wasm_bindgen_test]
fn rejects_bad_config() {
    let bad = config(r#"{ "speed": "fast" }"#);
    assert!(DotLottiePlayer::new(container(), fake_load_animation(), bad).is_err());
}

#[wasm_bindgen_test]
async fn load_object_then_play() {
    let player = DotLottiePlayer::new(container(), fake_load_animation(), JsValue::NULL).unwrap();
    JsFuture::from(player.load(spinner())).await.unwrap();
    assert_eq!(player.state(), "paused");
    assert_eq!(player.total_frames(), 60.0);

    player.play();
    assert_eq!(player.state(), "playing");
    player.pause();
    assert_eq!(player.state(), "paused");
}

#[wasm_bindgen_test]
async fn autoplay_starts_playing() {
    let cfg = config(r#"{ "autoplay": true, "loop": true }"#);
    let player = DotLottiePlayer::new(container(), fake_load_animation(), cfg).unwrap();
    JsFuture::from(player.load(spinner())).await.unwrap();
    assert_eq!(player.state(), "playing");
}

#[wasm_bindgen_test]
async fn broken_document_settles_into_error_state() {
    let player = DotLottiePlayer::new(container(), fake_load_animation(), JsValue::NULL).unwrap();
    let seen = js_sys::Array::new();
    let record = Function::new_with_args("seen, e", "seen.push(e.type)").bind1(&JsValue::NULL, &seen);
    player.add_event_listener("error", record).unwrap();

    let broken = config(r#"{ "v": "5.7.0", "fr": 30, "ip": 0, "op": 10 }"#);
    let result = JsFuture::from(player.load(broken)).await;
    assert!(result.is_ok());
    assert_eq!(player.state(), "error");
    assert_eq!(seen.length(), 1);

    let info: serde_json::Value = serde_wasm_bindgen::from_value(player.error().unwrap()).unwrap();
    assert_eq!(info["message"], "Broken or corrupted file");
    assert_eq!(info["status"], 400);
}

#[wasm_bindgen_test]
async fn missing_source_is_an_error_state_not_a_rejection() {
    let player = DotLottiePlayer::new(container(), fake_load_animation(), JsValue::NULL).unwrap();
    assert!(JsFuture::from(player.load(JsValue::UNDEFINED)).await.is_ok());
    assert_eq!(player.state(), "error");
}

#[wasm_bindgen_test]
async fn reload_before_load_resolves() {
    let player = DotLottiePlayer::new(container(), fake_load_animation(), JsValue::NULL).unwrap();
    assert!(JsFuture::from(player.reload()).await.is_ok());
    assert_eq!(player.state(), "loading");
}

#[wasm_bindgen_test]
async fn item_without_event_api_is_torn_down() {
    let load = Function::new_with_args(
        "params",
        "return { destroy() { globalThis.__itemDestroyed = true; } };",
    );
    let player = DotLottiePlayer::new(container(), load, JsValue::NULL).unwrap();
    JsFuture::from(player.load(spinner())).await.unwrap();
    assert_eq!(player.state(), "error");
    let destroyed = Reflect::get(&js_sys::global(), &JsValue::from_str("__itemDestroyed")).unwrap();
    assert_eq!(destroyed.as_bool(), Some(true));
}

#[wasm_bindgen_test]
async fn intermission_resumes_through_timer() {
    let cfg = config(r#"{ "loop": true, "intermission": 10 }"#);
    let player = DotLottiePlayer::new(container(), fake_load_animation(), cfg).unwrap();
    JsFuture::from(player.load(spinner())).await.unwrap();
    player.play();

    Function::new_no_args("globalThis.__lottieItem.calls = []; globalThis.__lottieItem.fire('complete')")
        .call0(&JsValue::NULL)
        .unwrap();
    assert_eq!(item_calls(), "goToAndStop");
    assert_eq!(player.loop_count(), 1);

    sleep(50).await;
    assert_eq!(item_calls(), "goToAndStop,play");
    assert_eq!(player.state(), "playing");
}

#[wasm_bindgen_test]
async fn listeners_receive_named_events() {
    let player = DotLottiePlayer::new(container(), fake_load_animation(), JsValue::NULL).unwrap();
    let seen = js_sys::Array::new();
    let record = Function::new_with_args("seen, e", "seen.push(e.type)").bind1(&JsValue::NULL, &seen);
    player.add_event_listener("*", record).unwrap();
    assert!(player.add_event_listener("nonsense", Function::new_no_args("")).is_err());

    JsFuture::from(player.load(spinner())).await.unwrap();
    player.play();
    let types: Vec<String> = seen.iter().filter_map(|v| v.as_string()).collect();
    assert!(types.contains(&"ready".to_string()), "{types:?}");
    assert!(types.contains(&"play".to_string()), "{types:?}");
}

#[wasm_bindgen_test]
async fn controls_render_and_route_clicks() {
    let el = container();
    let cfg = config(r#"{ "controls": true }"#);
    let player = DotLottiePlayer::new(el.clone(), fake_load_animation(), cfg).unwrap();
    JsFuture::from(player.load(spinner())).await.unwrap();

    let button = el
        .query_selector(r#"[data-action="toggle-play"]"#)
        .unwrap()
        .expect("play button rendered");
    assert_eq!(button.get_attribute("aria-label").as_deref(), Some("Play"));
    assert!(el.query_selector(".seeker").unwrap().is_some());

    player.control_action("toggle-play");
    assert_eq!(player.state(), "playing");
    let button = el
        .query_selector(r#"[data-action="toggle-play"]"#)
        .unwrap()
        .unwrap();
    assert_eq!(button.get_attribute("aria-label").as_deref(), Some("Pause"));
}

#[wasm_bindgen_test]
async fn seek_accepts_numbers_and_percentages() {
    let player = DotLottiePlayer::new(container(), fake_load_animation(), JsValue::NULL).unwrap();
    JsFuture::from(player.load(spinner())).await.unwrap();

    player.seek(JsValue::from_str("50%"));
    assert_eq!(player.current_frame(), 30.0);
    player.seek(JsValue::from_f64(12.0));
    assert_eq!(player.current_frame(), 12.0);
    assert_eq!(player.state(), "paused");
}

#[wasm_bindgen_test]
async fn destroy_is_terminal() {
    let player = DotLottiePlayer::new(container(), fake_load_animation(), JsValue::NULL).unwrap();
    JsFuture::from(player.load(spinner())).await.unwrap();
    player.destroy();
    assert_eq!(player.state(), "destroyed");
    player.play();
    assert_eq!(player.state(), "destroyed");
}

#[wasm_bindgen_test]
fn set_attribute_reports_ownership() {
    let player = DotLottiePlayer::new(container(), fake_load_animation(), JsValue::NULL).unwrap();
    assert_eq!(player.set_attribute("loop", Some("".into())).unwrap(), true);
    assert_eq!(player.set_attribute("src", Some("a.json".into())).unwrap(), false);
    assert!(player.set_attribute("speed", Some("fast".into())).is_err());
}
