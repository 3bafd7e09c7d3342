use crate::controller::{MediaBackend, Player};
use crate::state::{PlaybackState, PlayerError};
use crate::strings;

/// Everything the page needs to render the controls, derived from the player.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerView {
    pub state: PlaybackState,
    pub error: Option<PlayerError>,
    pub show_troubleshoot: bool,
    pub button_label: &'static str,
    pub button_disabled: bool,
    pub show_glow: bool,
    pub show_muted_icon: bool,
    pub slider_value: f64,
    pub visualizer_active: bool,
}

impl PlayerView {
    pub fn from_player<B: MediaBackend>(player: &Player<B>) -> Self {
        let state = player.state();
        let error = player.error();
        let button_label = match state {
            PlaybackState::Buffering => strings::BUFFERING,
            PlaybackState::Playing => strings::PAUSE,
            _ => strings::PLAY,
        };
        Self {
            state,
            error,
            show_troubleshoot: error.is_some_and(PlayerError::shows_troubleshoot_hint),
            button_label,
            button_disabled: state == PlaybackState::Buffering,
            show_glow: state == PlaybackState::Playing,
            show_muted_icon: player.is_muted() || player.volume() == 0.0,
            slider_value: player.effective_volume(),
            visualizer_active: state == PlaybackState::Playing,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }
}
