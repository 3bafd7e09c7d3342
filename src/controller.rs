//! Playback controller: the single owner of the audio element binding and
//! the derived `PlaybackState`.
//!
//! Browser specifics sit behind [`MediaBackend`] and [`AnalysisGraph`]. The
//! asynchronous `play()` promise is modelled as a [`PlayRequest`] returned to
//! the caller, which performs the play and reports the outcome back through
//! [`Player::on_play_resolved`] / [`Player::on_play_rejected`].

use crate::config::PlayerConfig;
use crate::constants::CACHE_BUST_PARAM;
use crate::state::{GraphError, MediaErrorKind, PlayRejection, PlaybackState, PlayerError};

/// A built source -> analyser -> output chain.
pub trait AnalysisGraph {
    /// Contexts created before a user gesture start out suspended.
    fn is_suspended(&self) -> bool;
    fn resume(&self);
    fn close(&self);
}

/// Platform binding for one audio element.
pub trait MediaBackend {
    type Graph: AnalysisGraph;

    fn source(&self) -> String;
    fn set_source(&mut self, url: &str);
    fn pause(&mut self);
    fn rewind(&mut self);
    fn set_output_volume(&mut self, level: f64);
    /// Milliseconds since the epoch, used for cache busting.
    fn now_ms(&self) -> f64;
    fn build_graph(&mut self) -> Result<Self::Graph, GraphError>;
    /// Stop the element and drop its source.
    fn release(&mut self);
}

/// Media element lifecycle callbacks.
pub trait MediaListener {
    fn on_play(&mut self);
    fn on_pause(&mut self);
    fn on_waiting(&mut self);
    fn on_playing(&mut self);
    /// `code` is `MediaError.code`, if the element exposed one.
    fn on_error(&mut self, code: Option<u16>);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayOrigin {
    Autoplay,
    User,
}

/// The caller must call `play()` on the element and report the outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayRequest {
    pub origin: PlayOrigin,
}

/// System media controls (lock screen, hardware keys).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionAction {
    Play,
    Pause,
    Stop,
}

pub struct Player<B: MediaBackend> {
    backend: B,
    config: PlayerConfig,
    state: PlaybackState,
    error: Option<PlayerError>,
    volume: f64,
    muted: bool,
    graph: Option<B::Graph>,
    /// Set by [`Player::shutdown`]. Every later operation is a no-op.
    shut_down: bool,
}

impl<B: MediaBackend> Player<B> {
    pub fn new(mut backend: B, config: PlayerConfig) -> Self {
        let volume = config.initial_volume.clamp(0.0, 1.0);
        backend.set_source(&config.stream_url);
        backend.set_output_volume(volume);
        Self {
            backend,
            config,
            state: PlaybackState::Idle,
            error: None,
            volume,
            muted: false,
            graph: None,
            shut_down: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn error(&self) -> Option<PlayerError> {
        self.error
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn effective_volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn graph(&self) -> Option<&B::Graph> {
        self.graph.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Attempt autoplay. The audio graph is deferred until playback is
    /// confirmed, since contexts are usually blocked before a gesture.
    pub fn initialize(&mut self) -> PlayRequest {
        self.bust_stream_cache();
        self.set_state(PlaybackState::Buffering);
        PlayRequest {
            origin: PlayOrigin::Autoplay,
        }
    }

    /// Play/pause button. Always runs inside a user gesture, so the audio
    /// graph is built (or resumed) first.
    pub fn toggle_play(&mut self) -> Option<PlayRequest> {
        if self.shut_down {
            return None;
        }
        self.setup_audio_graph();

        if self.state.is_active() {
            self.backend.pause();
            self.set_state(PlaybackState::Paused);
            return None;
        }

        self.set_state(PlaybackState::Buffering);
        self.bust_stream_cache();
        Some(PlayRequest {
            origin: PlayOrigin::User,
        })
    }

    pub fn on_play_resolved(&mut self, origin: PlayOrigin) {
        if self.shut_down {
            return;
        }
        if origin == PlayOrigin::Autoplay {
            self.setup_audio_graph();
        }
    }

    /// Releasing the element rejects a pending play with `AbortError`, so
    /// outcomes arriving after shutdown are dropped.
    pub fn on_play_rejected(&mut self, origin: PlayOrigin, rejection: &PlayRejection) {
        if self.shut_down {
            log::debug!("[player] ignoring play rejection after shutdown");
            return;
        }
        match origin {
            PlayOrigin::Autoplay => {
                log::info!(
                    "[player] autoplay prevented ({}); waiting for a user gesture",
                    rejection.name
                );
                if self.state == PlaybackState::Buffering {
                    self.set_state(PlaybackState::Idle);
                }
            }
            PlayOrigin::User => {
                log::error!("[player] playback failed: {}", rejection.name);
                self.fail(PlayerError::from_rejection(rejection));
            }
        }
    }

    pub fn set_volume(&mut self, level: f64) {
        if self.shut_down || !level.is_finite() {
            return;
        }
        self.volume = level.clamp(0.0, 1.0);
        self.apply_volume();
    }

    pub fn toggle_mute(&mut self) {
        if self.shut_down {
            return;
        }
        self.muted = !self.muted;
        self.apply_volume();
    }

    /// Build the source -> analyser -> output chain once. Failures leave
    /// playback untouched and only lose the visualization.
    pub fn setup_audio_graph(&mut self) {
        if self.shut_down {
            return;
        }
        if self.graph.is_none() {
            match self.backend.build_graph() {
                Ok(graph) => {
                    log::debug!("[graph] analyser chain connected");
                    self.graph = Some(graph);
                }
                Err(e) => {
                    log::warn!("[graph] setup failed, continuing without visualizer: {}", e);
                }
            }
        }
        if let Some(graph) = &self.graph {
            if graph.is_suspended() {
                graph.resume();
            }
        }
    }

    pub fn on_offline(&mut self) {
        if self.state == PlaybackState::Playing {
            self.fail(PlayerError::Offline);
        }
    }

    /// Only an offline error clears itself; every other error needs a retry.
    pub fn on_online(&mut self) {
        if self.state == PlaybackState::Error && self.error == Some(PlayerError::Offline) {
            self.set_state(PlaybackState::Idle);
        }
    }

    pub fn handle_session_action(&mut self, action: SessionAction) -> Option<PlayRequest> {
        if self.shut_down {
            return None;
        }
        match action {
            SessionAction::Play if !self.state.is_active() => self.toggle_play(),
            SessionAction::Pause if self.state.is_active() => self.toggle_play(),
            SessionAction::Play | SessionAction::Pause => None,
            SessionAction::Stop => {
                self.backend.pause();
                self.backend.rewind();
                if self.state.is_active() {
                    self.set_state(PlaybackState::Paused);
                }
                None
            }
        }
    }

    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.backend.release();
        if let Some(graph) = self.graph.take() {
            graph.close();
        }
    }

    fn apply_volume(&mut self) {
        let level = self.effective_volume();
        self.backend.set_output_volume(level);
    }

    fn bust_stream_cache(&mut self) {
        let now = self.backend.now_ms();
        if let Some(url) = cache_busted_url(&self.backend.source(), now) {
            self.backend.set_source(&url);
        }
    }

    fn set_state(&mut self, next: PlaybackState) {
        if self.shut_down {
            return;
        }
        if next != PlaybackState::Error {
            self.error = None;
        }
        if self.state != next {
            log::debug!("[player] {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn fail(&mut self, err: PlayerError) {
        if self.shut_down {
            return;
        }
        self.set_state(PlaybackState::Error);
        self.error = Some(err);
    }
}

impl<B: MediaBackend> MediaListener for Player<B> {
    fn on_play(&mut self) {
        self.set_state(PlaybackState::Playing);
    }

    fn on_pause(&mut self) {
        // A pause fired as a side effect of an error must not mask it.
        if self.state != PlaybackState::Error {
            self.set_state(PlaybackState::Paused);
        }
    }

    fn on_waiting(&mut self) {
        self.set_state(PlaybackState::Buffering);
    }

    fn on_playing(&mut self) {
        self.set_state(PlaybackState::Playing);
    }

    fn on_error(&mut self, code: Option<u16>) {
        let err = code
            .map(|c| PlayerError::from(MediaErrorKind::from_code(c)))
            .unwrap_or(PlayerError::General);
        log::error!("[player] media error (code {:?}): {}", code, err);
        self.fail(err);
    }
}

/// Append a timestamp query so the browser opens a fresh connection instead
/// of replaying a cached segment. `None` when the URL is empty or already
/// has a query.
pub fn cache_busted_url(url: &str, now_ms: f64) -> Option<String> {
    if url.is_empty() || url.contains('?') {
        return None;
    }
    Some(format!("{}?{}={}", url, CACHE_BUST_PARAM, now_ms.max(0.0) as u64))
}
