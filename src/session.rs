//! System media session (lock screen / hardware media keys).
//!
//! Accessed reflectively: `navigator.mediaSession` is missing in some
//! browsers and WebViews, in which case nothing is registered.

use crate::controller::SessionAction;
use crate::state::PlaybackState;
use js_sys::{Array, Function, Object, Reflect};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

const ACTIONS: [(&str, SessionAction); 3] = [
    ("play", SessionAction::Play),
    ("pause", SessionAction::Pause),
    ("stop", SessionAction::Stop),
];

pub struct NowPlaying<'a> {
    pub title: &'a str,
    pub artist: &'a str,
    pub artwork_url: &'a str,
    pub artwork_sizes: &'a str,
    pub artwork_type: &'a str,
}

pub struct MediaSession {
    session: JsValue,
    registered: Vec<&'static str>,
    _handlers: Vec<Closure<dyn FnMut()>>,
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

fn build_metadata(window: &web::Window, now: &NowPlaying) -> Result<JsValue, JsValue> {
    let ctor: Function = Reflect::get(window, &JsValue::from_str("MediaMetadata"))?.dyn_into()?;
    let artwork = Object::new();
    set(&artwork, "src", &JsValue::from_str(now.artwork_url))?;
    set(&artwork, "sizes", &JsValue::from_str(now.artwork_sizes))?;
    set(&artwork, "type", &JsValue::from_str(now.artwork_type))?;
    let init = Object::new();
    set(&init, "title", &JsValue::from_str(now.title))?;
    set(&init, "artist", &JsValue::from_str(now.artist))?;
    set(&init, "artwork", &Array::of1(&artwork))?;
    Reflect::construct(&ctor, &Array::of1(&init))
}

impl MediaSession {
    /// Publish metadata and route system controls to `on_action`.
    pub fn attach(now: &NowPlaying, on_action: impl Fn(SessionAction) + 'static) -> Option<Self> {
        let window = web::window()?;
        let session = Reflect::get(&window.navigator(), &JsValue::from_str("mediaSession")).ok()?;
        if session.is_undefined() || session.is_null() {
            log::info!("[session] media session unavailable");
            return None;
        }

        match build_metadata(&window, now) {
            Ok(meta) => {
                if let Err(e) = set(&session, "metadata", &meta) {
                    log::warn!("[session] metadata rejected: {:?}", e);
                }
            }
            Err(e) => log::warn!("[session] metadata unavailable: {:?}", e),
        }

        let on_action = Rc::new(on_action);
        let mut me = Self {
            session,
            registered: Vec::new(),
            _handlers: Vec::new(),
        };
        for (name, action) in ACTIONS {
            let cb = on_action.clone();
            let closure = Closure::wrap(Box::new(move || cb(action)) as Box<dyn FnMut()>);
            // `stop` is not supported everywhere.
            match me.set_action_handler(name, closure.as_ref()) {
                Ok(()) => {
                    me.registered.push(name);
                    me._handlers.push(closure);
                }
                Err(e) => log::warn!("[session] {} handler unsupported: {:?}", name, e),
            }
        }
        Some(me)
    }

    fn set_action_handler(&self, action: &str, handler: &JsValue) -> Result<(), JsValue> {
        let f: Function =
            Reflect::get(&self.session, &JsValue::from_str("setActionHandler"))?.dyn_into()?;
        f.call2(&self.session, &JsValue::from_str(action), handler)
            .map(|_| ())
    }

    pub fn sync_state(&self, state: PlaybackState) {
        if let Err(e) = set(
            &self.session,
            "playbackState",
            &JsValue::from_str(state.session_state()),
        ) {
            log::debug!("[session] playbackState rejected: {:?}", e);
        }
    }

    pub fn detach(self) {
        for name in &self.registered {
            _ = self.set_action_handler(name, &JsValue::NULL);
        }
    }
}
