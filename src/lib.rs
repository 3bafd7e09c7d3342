//! Live radio player: one streamed `<audio>` element, a five-state playback
//! controller and a canvas frequency visualizer.
//!
//! The controller, view model, visualizer geometry and cache policy are plain
//! Rust and build on any target. Browser bindings only build for wasm32.

pub mod cache;
pub mod config;
pub mod constants;
pub mod controller;
pub mod state;
pub mod strings;
pub mod view;
pub mod visualizer;

#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod session;
#[cfg(target_arch = "wasm32")]
mod share;
#[cfg(target_arch = "wasm32")]
mod ui;

#[cfg(target_arch = "wasm32")]
pub use web_entry::start;

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use crate::audio::WebMedia;
    use crate::config::PlayerConfig;
    use crate::constants::*;
    use crate::controller::Player;
    use crate::frame::{CanvasSurface, Visualizer};
    use crate::session::NowPlaying;
    use crate::{dom, events, strings, ui};
    use std::sync::atomic::{AtomicBool, Ordering};
    use wasm_bindgen::prelude::*;
    use web_sys as web;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        // The service worker loads the same module but has no window.
        if web::window().is_none() {
            return Ok(());
        }
        log::info!("radio-player starting");

        if let Err(e) = init() {
            log::error!("init error: {:?}", e);
        }
        Ok(())
    }

    fn load_config(document: &web::Document) -> PlayerConfig {
        PlayerConfig::default().with_overrides(
            dom::data_attribute(document, ROOT_ID, "data-stream-url").as_deref(),
            dom::data_attribute(document, ROOT_ID, "data-artwork-url").as_deref(),
            dom::data_attribute(document, ROOT_ID, "data-volume").as_deref(),
        )
    }

    fn init() -> anyhow::Result<()> {
        static STARTED: AtomicBool = AtomicBool::new(false);
        if STARTED.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;

        let config = load_config(&document);
        log::info!("[player] stream {}", config.stream_url);

        let canvas: web::HtmlCanvasElement = dom::element_by_id(&document, CANVAS_ID)?;
        let visualizer = Visualizer::new(CanvasSurface::new(canvas)?);
        let player = Player::new(WebMedia::new()?, config);

        ui::render_static(&document);
        let shell = events::Shell::new(document, player, visualizer);

        events::wire_media_events(&shell);
        events::wire_connectivity(&shell, &window);
        events::wire_controls(&shell);
        {
            let artwork_url = shell.player.borrow().config().artwork_url.clone();
            events::wire_session(
                &shell,
                &NowPlaying {
                    title: strings::TITLE,
                    artist: strings::SUBTITLE,
                    artwork_url: &artwork_url,
                    artwork_sizes: ALBUM_ART_SIZES,
                    artwork_type: ALBUM_ART_MIME,
                },
            );
        }
        events::wire_teardown(&shell, &window);

        let request = shell.player.borrow_mut().initialize();
        events::dispatch_play(&shell, request);
        shell.refresh();
        Ok(())
    }
}
