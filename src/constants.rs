/// Player and visualizer tuning constants.
///
/// Values describe intended look and behavior (bar geometry, opacity, timing)
/// and keep magic numbers out of the drawing and control code.

// Stream source and artwork
pub const STREAM_URL: &str = "https://stream.radiojar.com/8s5u5tpdtwzuv";
pub const STREAM_HOST: &str = "stream.radiojar.com";
pub const ALBUM_ART_URL: &str = "https://picsum.photos/id/1047/512/512";
pub const ALBUM_ART_SIZES: &str = "512x512";
pub const ALBUM_ART_MIME: &str = "image/jpeg";

// Query parameter appended to force a fresh stream connection
pub const CACHE_BUST_PARAM: &str = "t";

// Output level
pub const DEFAULT_VOLUME: f64 = 0.8;

// Analyser
pub const FFT_SIZE: u32 = 64; // yields 32 frequency bins
pub const ANALYSER_SMOOTHING: f64 = 0.8;
pub const VISIBLE_BINS: usize = 24; // low bins, voice-dominant range

// Bar geometry (CSS pixels, scaled by device pixel ratio)
pub const BAR_WIDTH: f64 = 4.0;
pub const BAR_GAP: f64 = 2.0;
pub const BAR_RADIUS: f64 = 4.0;
pub const BAR_MIN_HEIGHT: f64 = 4.0; // silent bins still show as a dot
pub const BAR_HEIGHT_SCALE: f64 = 0.8; // fraction of canvas height for a full-scale bin
pub const BAR_ACTIVE_ALPHA: f64 = 0.8;
pub const BAR_COLOR: &str = "rgb(251, 191, 36)";

// Idle breathing animation
pub const IDLE_BAR_COUNT: usize = 12;
pub const IDLE_BAR_HEIGHT: f64 = 8.0;
pub const IDLE_OPACITY: f64 = 0.2;
pub const IDLE_ALPHA_BASE: f64 = 0.1;
pub const IDLE_ALPHA_SWING: f64 = 0.15; // alpha spans base..base + 2 * swing
pub const IDLE_ANGULAR_SPEED: f64 = 2.0; // radians per second
pub const IDLE_PHASE_STEP: f64 = 0.5; // phase offset between neighbouring bars

// Share toast
pub const TOAST_DURATION_MS: i32 = 2000;

// DOM element ids
pub const ROOT_ID: &str = "app-root";
pub const CANVAS_ID: &str = "visualizer";
pub const PLAY_BUTTON_ID: &str = "play-button";
pub const MUTE_BUTTON_ID: &str = "mute-button";
pub const VOLUME_SLIDER_ID: &str = "volume-slider";
pub const SHARE_BUTTON_ID: &str = "share-button";
pub const ERROR_PANEL_ID: &str = "error-panel";
pub const ERROR_MESSAGE_ID: &str = "error-message";
pub const TROUBLESHOOT_ID: &str = "troubleshoot-hint";
pub const TOAST_ID: &str = "toast";
