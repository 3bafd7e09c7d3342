use crate::constants::{ALBUM_ART_URL, DEFAULT_VOLUME, STREAM_URL};

/// Runtime settings for one player instance.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    pub stream_url: String,
    pub artwork_url: String,
    pub initial_volume: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            stream_url: STREAM_URL.to_string(),
            artwork_url: ALBUM_ART_URL.to_string(),
            initial_volume: DEFAULT_VOLUME,
        }
    }
}

impl PlayerConfig {
    /// Apply optional overrides (from `data-*` attributes on the host page).
    /// Empty strings and unparsable volumes are ignored.
    pub fn with_overrides(
        mut self,
        stream_url: Option<&str>,
        artwork_url: Option<&str>,
        volume: Option<&str>,
    ) -> Self {
        if let Some(url) = stream_url.map(str::trim).filter(|s| !s.is_empty()) {
            self.stream_url = url.to_string();
        }
        if let Some(url) = artwork_url.map(str::trim).filter(|s| !s.is_empty()) {
            self.artwork_url = url.to_string();
        }
        if let Some(raw) = volume {
            match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => self.initial_volume = v.clamp(0.0, 1.0),
                _ => log::warn!("[player] ignoring invalid volume override {:?}", raw),
            }
        }
        self
    }
}
