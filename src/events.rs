//! Wiring between browser events and the player.
//!
//! Every handler borrows the player, applies one operation, releases the
//! borrow and then refreshes the page, the visualizer and the media session.

use crate::audio::WebMedia;
use crate::constants::*;
use crate::controller::{MediaListener, PlayRequest, Player};
use crate::dom::{self, EventListener};
use crate::frame::Visualizer;
use crate::session::MediaSession;
use crate::share;
use crate::state::PlayRejection;
use crate::ui;
use crate::view::PlayerView;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

pub type WebPlayer = Player<WebMedia>;

pub struct Shell {
    pub document: web::Document,
    pub player: RefCell<WebPlayer>,
    pub visualizer: RefCell<Visualizer>,
    pub session: RefCell<Option<MediaSession>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl Shell {
    pub fn new(document: web::Document, player: WebPlayer, visualizer: Visualizer) -> Rc<Self> {
        Rc::new(Self {
            document,
            player: RefCell::new(player),
            visualizer: RefCell::new(visualizer),
            session: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Push the current player state out to the page, visualizer and session.
    /// Does nothing once torn down, so late promise outcomes cannot restart
    /// the frame loop.
    pub fn refresh(&self) {
        let (view, analyser) = {
            let player = self.player.borrow();
            if player.is_shut_down() {
                return;
            }
            let analyser = player.graph().map(|g| g.analyser().clone());
            (PlayerView::from_player(&player), analyser)
        };
        ui::render(&self.document, &view);
        self.visualizer
            .borrow_mut()
            .set_inputs(view.visualizer_active, analyser);
        if let Some(session) = self.session.borrow().as_ref() {
            session.sync_state(view.state);
        }
    }

    /// Detach listeners and session handlers, stop the frame loop and
    /// release the audio element and graph.
    pub fn teardown(&self) {
        if self.player.borrow().is_shut_down() {
            return;
        }
        // Listener closures hold `Rc<Shell>`; dropping them breaks the cycle.
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        drop(listeners);
        if let Some(session) = self.session.borrow_mut().take() {
            session.detach();
        }
        self.visualizer.borrow_mut().unmount();
        self.player.borrow_mut().shutdown();
        log::info!("[player] torn down");
    }

    fn keep(&self, listener: anyhow::Result<EventListener>) {
        match listener {
            Ok(l) => self.listeners.borrow_mut().push(l),
            Err(e) => log::error!("[player] listener registration failed: {:?}", e),
        }
    }
}

/// Run a play request on the element and report the promise outcome.
pub fn dispatch_play(shell: &Rc<Shell>, request: PlayRequest) {
    let promise = shell.player.borrow().backend().play();
    let shell = shell.clone();
    spawn_local(async move {
        let outcome = match promise {
            Ok(p) => JsFuture::from(p).await.map(|_| ()),
            Err(e) => Err(e),
        };
        {
            let mut player = shell.player.borrow_mut();
            if player.is_shut_down() {
                return;
            }
            match outcome {
                Ok(()) => player.on_play_resolved(request.origin),
                Err(e) => {
                    let rejection = rejection_from(&e);
                    player.on_play_rejected(request.origin, &rejection);
                }
            }
        }
        shell.refresh();
    });
}

fn rejection_from(e: &wasm_bindgen::JsValue) -> PlayRejection {
    let name = e
        .dyn_ref::<web::DomException>()
        .map(|d| d.name())
        .unwrap_or_default();
    let online = web::window()
        .map(|w| w.navigator().on_line())
        .unwrap_or(true);
    PlayRejection::new(name, online)
}

fn on_media(shell: &Rc<Shell>, event: &'static str, apply: fn(&mut WebPlayer)) {
    let target: web::EventTarget = shell.player.borrow().backend().element().clone().into();
    let sh = shell.clone();
    shell.keep(EventListener::new(&target, event, move |_| {
        apply(&mut sh.player.borrow_mut());
        sh.refresh();
    }));
}

fn on_window(shell: &Rc<Shell>, window: &web::Window, event: &'static str, apply: fn(&mut WebPlayer)) {
    let sh = shell.clone();
    shell.keep(EventListener::new(window, event, move |_| {
        apply(&mut sh.player.borrow_mut());
        sh.refresh();
    }));
}

pub fn wire_media_events(shell: &Rc<Shell>) {
    on_media(shell, "play", |p| p.on_play());
    on_media(shell, "pause", |p| p.on_pause());
    on_media(shell, "waiting", |p| p.on_waiting());
    on_media(shell, "playing", |p| p.on_playing());
    on_media(shell, "error", |p| {
        let code = p.backend().error_code();
        p.on_error(code);
    });
}

pub fn wire_connectivity(shell: &Rc<Shell>, window: &web::Window) {
    on_window(shell, window, "offline", |p| p.on_offline());
    on_window(shell, window, "online", |p| p.on_online());
}

pub fn wire_controls(shell: &Rc<Shell>) {
    let doc = shell.document.clone();

    let sh = shell.clone();
    shell.keep(dom::click_listener(&doc, PLAY_BUTTON_ID, move || {
        let request = sh.player.borrow_mut().toggle_play();
        if let Some(request) = request {
            dispatch_play(&sh, request);
        }
        sh.refresh();
    }));

    let sh = shell.clone();
    shell.keep(dom::click_listener(&doc, MUTE_BUTTON_ID, move || {
        sh.player.borrow_mut().toggle_mute();
        sh.refresh();
    }));

    shell.keep(dom::click_listener(&doc, SHARE_BUTTON_ID, || {
        spawn_local(async {
            match share::share_page().await {
                Ok(outcome) => log::debug!("[share] {:?}", outcome),
                Err(e) => log::error!("[share] {:?}", e),
            }
        });
    }));

    if let Some(slider) = doc.get_element_by_id(VOLUME_SLIDER_ID) {
        let sh = shell.clone();
        shell.keep(EventListener::new(&slider, "input", move |ev| {
            let value = ev
                .target()
                .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
                .and_then(|input| input.value().parse::<f64>().ok());
            if let Some(level) = value {
                sh.player.borrow_mut().set_volume(level);
                sh.refresh();
            }
        }));
    }
}

pub fn wire_session(shell: &Rc<Shell>, now: &crate::session::NowPlaying) {
    let weak = Rc::downgrade(shell);
    let session = MediaSession::attach(now, move |action| {
        let Some(sh) = weak.upgrade() else {
            return;
        };
        log::debug!("[session] {:?}", action);
        let request = sh.player.borrow_mut().handle_session_action(action);
        if let Some(request) = request {
            dispatch_play(&sh, request);
        }
        sh.refresh();
    });
    *shell.session.borrow_mut() = session;
}

/// Tear down on `pagehide`, unless the page is entering the back/forward
/// cache and may be shown again.
pub fn wire_teardown(shell: &Rc<Shell>, window: &web::Window) {
    let sh = shell.clone();
    shell.keep(EventListener::new(window, "pagehide", move |ev| {
        let persisted = ev
            .dyn_ref::<web::PageTransitionEvent>()
            .map(|e| e.persisted())
            .unwrap_or(false);
        if persisted {
            log::debug!("[player] page cached, keeping player alive");
            return;
        }
        sh.teardown();
    }));
}
