use crate::constants::{TOAST_DURATION_MS, TOAST_ID};
use crate::dom;
use crate::strings;
use js_sys::{Function, Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Cancelled,
    Copied,
}

fn navigator_method(navigator: &JsValue, path: &[&str]) -> Option<(JsValue, Function)> {
    let (method, owners) = path.split_last()?;
    let mut owner = navigator.clone();
    for key in owners {
        owner = Reflect::get(&owner, &JsValue::from_str(key)).ok()?;
        if owner.is_undefined() || owner.is_null() {
            return None;
        }
    }
    let f = Reflect::get(&owner, &JsValue::from_str(method))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    Some((owner, f))
}

async fn call_async(owner: &JsValue, f: &Function, arg: &JsValue) -> Result<JsValue, JsValue> {
    let promise: js_sys::Promise = f.call1(owner, arg)?.dyn_into()?;
    JsFuture::from(promise).await
}

/// Native share sheet when available, otherwise copy the page URL and show
/// a transient confirmation.
pub async fn share_page() -> anyhow::Result<ShareOutcome> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let url = window.location().href().map_err(dom::js_err)?;
    let navigator: JsValue = window.navigator().into();

    if let Some((owner, share)) = navigator_method(&navigator, &["share"]) {
        let data = Object::new();
        for (k, v) in [
            ("title", strings::TITLE),
            ("text", strings::SUBTITLE),
            ("url", url.as_str()),
        ] {
            Reflect::set(&data, &JsValue::from_str(k), &JsValue::from_str(v))
                .map_err(dom::js_err)?;
        }
        return match call_async(&owner, &share, &data).await {
            Ok(_) => Ok(ShareOutcome::Shared),
            Err(e) => {
                log::debug!("[share] cancelled or failed: {:?}", e);
                Ok(ShareOutcome::Cancelled)
            }
        };
    }

    let (owner, write) = navigator_method(&navigator, &["clipboard", "writeText"])
        .ok_or_else(|| anyhow::anyhow!("neither share nor clipboard available"))?;
    call_async(&owner, &write, &JsValue::from_str(&url))
        .await
        .map_err(|e| anyhow::anyhow!("clipboard write failed: {:?}", e))?;
    show_toast(&window);
    Ok(ShareOutcome::Copied)
}

fn show_toast(window: &web::Window) {
    let Some(document) = window.document() else {
        return;
    };
    dom::set_text(&document, TOAST_ID, strings::LINK_COPIED);
    dom::set_visible(&document, TOAST_ID, true);
    let hide = Closure::once(move || dom::set_visible(&document, TOAST_ID, false));
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        hide.as_ref().unchecked_ref(),
        TOAST_DURATION_MS,
    ) {
        log::warn!("[share] toast timer failed: {:?}", e);
    }
    hide.forget();
}
