//! Browser `fetch` transport.

use js_sys::Uint8Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use lottie_bundle_core::{BundleError, FetchResponse};

fn js_reason(err: JsValue) -> BundleError {
    BundleError::Io {
        reason: err
            .as_string()
            .or_else(|| js_sys::JSON::stringify(&err).ok().and_then(|s| s.as_string()))
            .unwrap_or_else(|| "fetch failed".to_string()),
    }
}

/// Fetch `url` with the window's `fetch`. Non-2xx answers come back as a
/// response carrying their status; only network failures are errors.
pub(crate) async fn fetch(url: &str) -> Result<FetchResponse, BundleError> {
    let window = web_sys::window().ok_or_else(|| BundleError::Io {
        reason: "no window".into(),
    })?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_reason)?
        .dyn_into()
        .map_err(js_reason)?;

    if !response.ok() {
        return Ok(FetchResponse::status(response.status(), response.status_text()));
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(js_reason)?)
        .await
        .map_err(js_reason)?;
    Ok(FetchResponse {
        status: response.status(),
        status_text: response.status_text(),
        body: Uint8Array::new(&buffer).to_vec(),
    })
}
