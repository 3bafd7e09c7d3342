// Host-side tests for the playback controller, driven through a mock media backend.

use radio_player::config::PlayerConfig;
use radio_player::controller::{
    AnalysisGraph, MediaBackend, MediaListener, PlayOrigin, PlayRequest, Player, SessionAction,
};
use radio_player::state::{GraphError, PlayRejection, PlaybackState, PlayerError};
use radio_player::view::PlayerView;
use std::cell::Cell;
use std::rc::Rc;

struct MockGraph {
    suspended: Cell<bool>,
    resumes: Rc<Cell<u32>>,
    closed: Rc<Cell<bool>>,
}

impl AnalysisGraph for MockGraph {
    fn is_suspended(&self) -> bool {
        self.suspended.get()
    }
    fn resume(&self) {
        self.suspended.set(false);
        self.resumes.set(self.resumes.get() + 1);
    }
    fn close(&self) {
        self.closed.set(true);
    }
}

#[derive(Default)]
struct MockBackend {
    src: String,
    volume: f64,
    pauses: u32,
    rewinds: u32,
    builds: u32,
    fail_graph: bool,
    start_suspended: bool,
    released: bool,
    now: f64,
    resumes: Rc<Cell<u32>>,
    closed: Rc<Cell<bool>>,
}

impl MediaBackend for MockBackend {
    type Graph = MockGraph;

    fn source(&self) -> String {
        self.src.clone()
    }
    fn set_source(&mut self, url: &str) {
        self.src = url.to_string();
    }
    fn pause(&mut self) {
        self.pauses += 1;
    }
    fn rewind(&mut self) {
        self.rewinds += 1;
    }
    fn set_output_volume(&mut self, level: f64) {
        self.volume = level;
    }
    fn now_ms(&self) -> f64 {
        self.now
    }
    fn build_graph(&mut self) -> Result<MockGraph, GraphError> {
        self.builds += 1;
        if self.fail_graph {
            return Err(GraphError::Source("cross-origin".into()));
        }
        Ok(MockGraph {
            suspended: Cell::new(self.start_suspended),
            resumes: self.resumes.clone(),
            closed: self.closed.clone(),
        })
    }
    fn release(&mut self) {
        self.released = true;
        self.src.clear();
    }
}

fn config() -> PlayerConfig {
    PlayerConfig {
        stream_url: "https://radio.example/live".into(),
        artwork_url: "https://img.example/a.jpg".into(),
        initial_volume: 0.8,
    }
}

fn player() -> Player<MockBackend> {
    Player::new(
        MockBackend {
            now: 1_700_000_000_000.0,
            ..Default::default()
        },
        config(),
    )
}

fn playing() -> Player<MockBackend> {
    let mut p = player();
    let req = p.toggle_play();
    assert!(req.is_some());
    p.on_playing();
    assert_eq!(p.state(), PlaybackState::Playing);
    p
}

#[test]
fn new_player_is_idle_with_stream_source() {
    let p = player();
    assert_eq!(p.state(), PlaybackState::Idle);
    assert_eq!(p.error(), None);
    assert_eq!(p.backend().src, "https://radio.example/live");
    assert_eq!(p.backend().volume, 0.8);
    assert!(p.graph().is_none());
}

#[test]
fn toggle_from_idle_buffers_then_plays() {
    let mut p = player();
    let req = p.toggle_play();
    assert_eq!(
        req,
        Some(PlayRequest {
            origin: PlayOrigin::User
        })
    );
    assert_eq!(p.state(), PlaybackState::Buffering);
    assert_eq!(
        p.backend().src,
        "https://radio.example/live?t=1700000000000"
    );

    p.on_play_resolved(PlayOrigin::User);
    assert_eq!(p.state(), PlaybackState::Buffering);
    p.on_playing();
    assert_eq!(p.state(), PlaybackState::Playing);
}

#[test]
fn cache_bust_applied_only_once() {
    let mut p = player();
    p.toggle_play();
    let first = p.backend().src.clone();
    p.toggle_play(); // pause
    p.backend_mut().now += 5000.0;
    p.toggle_play();
    assert_eq!(p.backend().src, first);
}

#[test]
fn toggle_while_playing_or_buffering_pauses() {
    let mut p = playing();
    assert_eq!(p.toggle_play(), None);
    assert_eq!(p.state(), PlaybackState::Paused);
    assert_eq!(p.backend().pauses, 1);

    let mut p = player();
    p.toggle_play();
    assert_eq!(p.state(), PlaybackState::Buffering);
    assert_eq!(p.toggle_play(), None);
    assert_eq!(p.state(), PlaybackState::Paused);

    assert!(p.toggle_play().is_some());
    assert_eq!(p.state(), PlaybackState::Buffering);
}

#[test]
fn waiting_event_rebuffers() {
    let mut p = playing();
    p.on_waiting();
    assert_eq!(p.state(), PlaybackState::Buffering);
    p.on_play();
    assert_eq!(p.state(), PlaybackState::Playing);
}

#[test]
fn pause_event_never_masks_error() {
    let mut p = playing();
    p.on_error(Some(2));
    assert_eq!(p.state(), PlaybackState::Error);
    p.on_pause();
    assert_eq!(p.state(), PlaybackState::Error);
    assert_eq!(p.error(), Some(PlayerError::Network));
}

#[test]
fn media_error_codes_are_classified() {
    for (code, expected) in [
        (Some(2), PlayerError::Network),
        (Some(3), PlayerError::Decode),
        (Some(4), PlayerError::SourceUnsupported),
        (Some(1), PlayerError::General),
        (None, PlayerError::General),
    ] {
        let mut p = playing();
        p.on_error(code);
        assert_eq!(p.state(), PlaybackState::Error);
        assert_eq!(p.error(), Some(expected));
    }
}

#[test]
fn not_allowed_rejection_is_autoplay_error_without_hint() {
    let mut p = player();
    p.toggle_play();
    p.on_play_rejected(PlayOrigin::User, &PlayRejection::new("NotAllowedError", true));
    assert_eq!(p.state(), PlaybackState::Error);
    assert_eq!(p.error(), Some(PlayerError::Autoplay));

    let view = PlayerView::from_player(&p);
    assert_eq!(
        view.error_message().as_deref(),
        Some(radio_player::strings::errors::AUTOPLAY)
    );
    assert!(!view.show_troubleshoot);
}

#[test]
fn other_rejections_show_hint() {
    for (name, online, expected) in [
        ("NotSupportedError", true, PlayerError::SourceUnsupported),
        ("AbortError", false, PlayerError::Offline),
        ("", true, PlayerError::General),
    ] {
        let mut p = player();
        p.toggle_play();
        p.on_play_rejected(PlayOrigin::User, &PlayRejection::new(name, online));
        assert_eq!(p.error(), Some(expected));
        assert!(PlayerView::from_player(&p).show_troubleshoot);
    }
}

#[test]
fn retry_clears_error() {
    let mut p = playing();
    p.on_error(Some(3));
    assert!(p.toggle_play().is_some());
    assert_eq!(p.state(), PlaybackState::Buffering);
    assert_eq!(p.error(), None);
}

#[test]
fn autoplay_rejection_returns_to_idle_silently() {
    let mut p = player();
    let req = p.initialize();
    assert_eq!(req.origin, PlayOrigin::Autoplay);
    assert_eq!(p.state(), PlaybackState::Buffering);
    assert!(p.backend().src.contains("?t="));

    p.on_play_rejected(PlayOrigin::Autoplay, &PlayRejection::new("NotAllowedError", true));
    assert_eq!(p.state(), PlaybackState::Idle);
    assert_eq!(p.error(), None);
    assert!(p.graph().is_none());
}

#[test]
fn autoplay_success_builds_graph() {
    let mut p = player();
    p.initialize();
    p.on_play_resolved(PlayOrigin::Autoplay);
    assert!(p.graph().is_some());
    assert_eq!(p.backend().builds, 1);
}

#[test]
fn graph_setup_is_idempotent_and_resumes() {
    let mut p = Player::new(
        MockBackend {
            start_suspended: true,
            ..Default::default()
        },
        config(),
    );
    p.setup_audio_graph();
    p.setup_audio_graph();
    p.toggle_play();
    assert_eq!(p.backend().builds, 1);
    assert_eq!(p.backend().resumes.get(), 1);
    assert!(!p.graph().map(|g| g.is_suspended()).unwrap_or(true));
}

#[test]
fn graph_failure_degrades_without_state_change() {
    let mut p = Player::new(
        MockBackend {
            fail_graph: true,
            ..Default::default()
        },
        config(),
    );
    let req = p.toggle_play();
    assert!(req.is_some());
    assert_eq!(p.state(), PlaybackState::Buffering);
    assert_eq!(p.error(), None);
    assert!(p.graph().is_none());
    p.on_playing();
    assert_eq!(p.state(), PlaybackState::Playing);
}

#[test]
fn volume_and_mute_law() {
    let mut p = player();
    p.set_volume(0.35);
    assert_eq!(p.effective_volume(), 0.35);
    p.toggle_mute();
    assert_eq!(p.effective_volume(), 0.0);
    assert_eq!(p.backend().volume, 0.0);
    assert_eq!(p.volume(), 0.35);
    p.toggle_mute();
    assert_eq!(p.effective_volume(), 0.35);
    assert_eq!(p.backend().volume, 0.35);
}

#[test]
fn volume_is_clamped_and_ignores_nan() {
    let mut p = player();
    p.set_volume(1.5);
    assert_eq!(p.volume(), 1.0);
    p.set_volume(-0.2);
    assert_eq!(p.volume(), 0.0);
    p.set_volume(f64::NAN);
    assert_eq!(p.volume(), 0.0);
}

#[test]
fn changing_volume_while_muted_keeps_silence() {
    let mut p = player();
    p.toggle_mute();
    p.set_volume(0.5);
    assert_eq!(p.backend().volume, 0.0);
    p.toggle_mute();
    assert_eq!(p.backend().volume, 0.5);
}

#[test]
fn offline_while_playing_then_online_recovers() {
    let mut p = playing();
    p.on_offline();
    assert_eq!(p.state(), PlaybackState::Error);
    assert_eq!(p.error(), Some(PlayerError::Offline));
    p.on_online();
    assert_eq!(p.state(), PlaybackState::Idle);
    assert_eq!(p.error(), None);
}

#[test]
fn offline_when_not_playing_is_ignored() {
    let mut p = player();
    p.on_offline();
    assert_eq!(p.state(), PlaybackState::Idle);

    p.toggle_play();
    p.on_offline();
    assert_eq!(p.state(), PlaybackState::Buffering);
}

#[test]
fn online_leaves_other_errors_alone() {
    let mut p = playing();
    p.on_error(Some(3));
    p.on_online();
    assert_eq!(p.state(), PlaybackState::Error);
    assert_eq!(p.error(), Some(PlayerError::Decode));
}

#[test]
fn offline_rejection_is_cleared_by_online() {
    let mut p = player();
    p.toggle_play();
    p.on_play_rejected(PlayOrigin::User, &PlayRejection::new("AbortError", false));
    p.on_online();
    assert_eq!(p.state(), PlaybackState::Idle);
}

#[test]
fn session_actions_mirror_buttons() {
    let mut p = player();
    assert!(p.handle_session_action(SessionAction::Pause).is_none());
    assert_eq!(p.state(), PlaybackState::Idle);

    let req = p.handle_session_action(SessionAction::Play);
    assert_eq!(req.map(|r| r.origin), Some(PlayOrigin::User));
    assert_eq!(p.state(), PlaybackState::Buffering);
    assert!(p.handle_session_action(SessionAction::Play).is_none());

    p.on_playing();
    assert!(p.handle_session_action(SessionAction::Pause).is_none());
    assert_eq!(p.state(), PlaybackState::Paused);

    p.toggle_play();
    p.on_playing();
    p.handle_session_action(SessionAction::Stop);
    assert_eq!(p.state(), PlaybackState::Paused);
    assert_eq!(p.backend().rewinds, 1);
}

#[test]
fn shutdown_releases_element_and_closes_graph() {
    let mut p = playing();
    assert!(p.graph().is_some());
    let closed = p.backend().closed.clone();
    p.shutdown();
    assert!(p.backend().released);
    assert!(closed.get());
    assert!(p.graph().is_none());
}

#[test]
fn arbitrary_event_sequences_keep_error_sticky_under_pause() {
    // Deterministic pseudo-random walk over every input the controller accepts.
    let mut p = player();
    let mut seed: u32 = 0x9E37_79B9;
    for _ in 0..2000 {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let before = p.state();
        match seed % 11 {
            0 => p.on_play(),
            1 => {
                p.on_pause();
                if before == PlaybackState::Error {
                    assert_eq!(p.state(), PlaybackState::Error);
                }
            }
            2 => p.on_waiting(),
            3 => p.on_playing(),
            4 => p.on_error(Some((seed % 5) as u16)),
            5 => p.on_offline(),
            6 => p.on_online(),
            7 => {
                p.toggle_play();
            }
            8 => p.on_play_rejected(PlayOrigin::User, &PlayRejection::new("NotAllowedError", true)),
            9 => p.toggle_mute(),
            _ => {
                p.handle_session_action(SessionAction::Stop);
            }
        }
        assert_eq!(p.error().is_some(), p.state() == PlaybackState::Error);
    }
}

#[test]
fn late_play_outcome_after_shutdown_is_dropped() {
    let mut p = player();
    assert!(p.toggle_play().is_some());
    assert_eq!(p.state(), PlaybackState::Buffering);
    p.shutdown();
    assert!(p.is_shut_down());

    // Releasing the element aborts the pending play.
    p.on_play_rejected(PlayOrigin::User, &PlayRejection::new("AbortError", true));
    assert_eq!(p.state(), PlaybackState::Buffering);
    assert_eq!(p.error(), None);

    assert_eq!(p.toggle_play(), None);
    assert_eq!(p.backend().src, "");
}

#[test]
fn every_operation_is_inert_after_shutdown() {
    let mut p = playing();
    let builds = p.backend().builds;
    p.shutdown();
    let pauses = p.backend().pauses;
    let volume = p.backend().volume;

    p.on_play_resolved(PlayOrigin::Autoplay);
    p.on_error(Some(2));
    p.on_pause();
    p.on_waiting();
    p.on_offline();
    p.set_volume(0.1);
    p.toggle_mute();
    p.setup_audio_graph();
    assert_eq!(p.handle_session_action(SessionAction::Play), None);
    p.handle_session_action(SessionAction::Stop);
    p.shutdown();

    assert_eq!(p.state(), PlaybackState::Playing);
    assert_eq!(p.error(), None);
    assert_eq!(p.backend().builds, builds);
    assert_eq!(p.backend().pauses, pauses);
    assert_eq!(p.backend().rewinds, 0);
    assert_eq!(p.backend().volume, volume);
    assert!(p.graph().is_none());
}
