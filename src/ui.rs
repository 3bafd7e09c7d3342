use crate::constants::*;
use crate::dom;
use crate::strings;
use crate::view::PlayerView;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Static text that never changes after load.
pub fn render_static(document: &web::Document) {
    dom::set_text(document, "title", strings::TITLE);
    dom::set_text(document, "subtitle", strings::SUBTITLE);
    dom::set_text(document, "live-badge", strings::LIVE);
    dom::set_text(document, "footer", strings::FOOTER);
    if let Some(el) = document.get_element_by_id(SHARE_BUTTON_ID) {
        _ = el.set_attribute("aria-label", strings::SHARE);
    }
    dom::set_visible(document, TOAST_ID, false);
}

pub fn render(document: &web::Document, view: &PlayerView) {
    if let Some(button) = document.get_element_by_id(PLAY_BUTTON_ID) {
        button.set_text_content(Some(view.button_label));
        _ = button.set_attribute("aria-label", view.button_label);
        if view.button_disabled {
            _ = button.set_attribute("disabled", "");
        } else {
            _ = button.remove_attribute("disabled");
        }
    }
    dom::set_class(document, PLAY_BUTTON_ID, "playing", view.show_glow);
    dom::set_class(document, PLAY_BUTTON_ID, "buffering", view.button_disabled);
    dom::set_class(document, MUTE_BUTTON_ID, "muted", view.show_muted_icon);

    if let Some(slider) = document
        .get_element_by_id(VOLUME_SLIDER_ID)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    {
        slider.set_value(&format!("{:.2}", view.slider_value));
    }

    match view.error_message() {
        Some(message) => {
            dom::set_text(document, ERROR_MESSAGE_ID, &message);
            dom::set_visible(document, ERROR_PANEL_ID, true);
            if view.show_troubleshoot {
                dom::set_text(document, TROUBLESHOOT_ID, strings::TROUBLESHOOT);
            }
            dom::set_visible(document, TROUBLESHOOT_ID, view.show_troubleshoot);
        }
        None => dom::set_visible(document, ERROR_PANEL_ID, false),
    }
}
