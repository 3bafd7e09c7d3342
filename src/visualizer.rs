//! Frequency bar visualizer.
//!
//! Each animation frame is a pure function of the current time and the
//! analyser snapshot: resize the backing store if the displayed size moved,
//! clear, then paint either mirrored spectrum bars or the idle "breathing"
//! row. The web frontend supplies the canvas and analyser through
//! [`BarSurface`] and [`FrequencySource`] and drives [`VisualizerTask::tick`]
//! from `requestAnimationFrame`.

use crate::constants::*;
use std::cell::Cell;
use std::rc::Rc;

/// One rounded bar in backing-store pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub alpha: f64,
}

/// Read access to an analyser's byte frequency data.
pub trait FrequencySource {
    fn bin_count(&self) -> usize;
    fn fill_bytes(&self, out: &mut [u8]);
}

/// A canvas-like drawing target.
pub trait BarSurface {
    /// Displayed (CSS) size.
    fn css_size(&self) -> (f64, f64);
    fn device_pixel_ratio(&self) -> f64;
    fn backing_size(&self) -> (u32, u32);
    fn set_backing_size(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    fn fill_bar(&mut self, bar: &BarRect, color: &str);
}

/// Backing-store size for the displayed size, or `None` if it already matches.
pub fn backing_resize(current: (u32, u32), css: (f64, f64), dpr: f64) -> Option<(u32, u32)> {
    let target = (
        (css.0 * dpr).max(0.0) as u32,
        (css.1 * dpr).max(0.0) as u32,
    );
    if target == current {
        None
    } else {
        Some(target)
    }
}

/// Mirrored, center-symmetric bars for the lowest `VISIBLE_BINS` bins.
///
/// Bin 0 sits just right of center and is drawn once; every other bin gets a
/// right bar and its mirror on the left, so 24 bins yield 47 bars.
pub fn spectrum_bars(bins: &[u8], width: f64, height: f64, dpr: f64) -> Vec<BarRect> {
    let used = &bins[..bins.len().min(VISIBLE_BINS)];
    let bar_w = BAR_WIDTH * dpr;
    let gap = BAR_GAP * dpr;
    let pitch = bar_w + gap;
    let center_x = width / 2.0;
    let mut bars = Vec::with_capacity(used.len() * 2);

    for (index, &value) in used.iter().enumerate() {
        let h = (BAR_MIN_HEIGHT * dpr).max(value as f64 / 255.0 * height * BAR_HEIGHT_SCALE);
        let y = (height - h) / 2.0;
        let x_offset = index as f64 * pitch;
        let bar = BarRect {
            x: center_x + x_offset + gap / 2.0,
            y,
            width: bar_w,
            height: h,
            radius: BAR_RADIUS * dpr,
            alpha: BAR_ACTIVE_ALPHA,
        };
        bars.push(bar);
        if index > 0 {
            bars.push(BarRect {
                x: center_x - x_offset - gap / 2.0 - bar_w,
                ..bar
            });
        }
    }
    bars
}

/// Evenly spaced idle bars whose opacity oscillates, each bar phase-shifted.
pub fn idle_bars(time_sec: f64, width: f64, height: f64, dpr: f64) -> Vec<BarRect> {
    let pitch = (BAR_WIDTH + BAR_GAP) * dpr;
    let start_x = (width - IDLE_BAR_COUNT as f64 * pitch) / 2.0;
    let h = IDLE_BAR_HEIGHT * dpr;
    (0..IDLE_BAR_COUNT)
        .map(|i| {
            let phase = i as f64 * IDLE_PHASE_STEP;
            let wave = (time_sec * IDLE_ANGULAR_SPEED + phase).sin() + 1.0;
            BarRect {
                x: start_x + i as f64 * pitch,
                y: (height - h) / 2.0,
                width: BAR_WIDTH * dpr,
                height: h,
                radius: BAR_RADIUS * dpr,
                alpha: (IDLE_ALPHA_BASE + wave * IDLE_ALPHA_SWING) * IDLE_OPACITY,
            }
        })
        .collect()
}

/// Shared stop flag for a scheduled frame loop. Flipped synchronously on
/// teardown and checked before every frame.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Rc<Cell<bool>>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// When the frame loop must be restarted: on the first inputs, and whenever
/// the inputs change. After `unmount` nothing restarts it.
#[derive(Debug)]
pub struct LoopLifecycle<I> {
    inputs: Option<I>,
    running: bool,
    unmounted: bool,
}

impl<I> Default for LoopLifecycle<I> {
    fn default() -> Self {
        Self {
            inputs: None,
            running: false,
            unmounted: false,
        }
    }
}

impl<I: PartialEq> LoopLifecycle<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `next` and report whether a fresh loop should be started.
    /// The caller stops any running loop first.
    pub fn restart_for(&mut self, next: I) -> bool {
        if self.unmounted {
            return false;
        }
        if self.running && self.inputs.as_ref() == Some(&next) {
            return false;
        }
        self.inputs = Some(next);
        self.running = true;
        true
    }

    pub fn unmount(&mut self) {
        self.running = false;
        self.unmounted = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Frame drawn; schedule the next one.
    Continue,
    /// Cancelled; nothing drawn and nothing should be rescheduled.
    Stopped,
}

/// Per-mount render state: the inputs the loop was started with and a
/// reusable byte buffer for analyser snapshots.
pub struct VisualizerTask<F: FrequencySource> {
    is_playing: bool,
    analyser: Option<F>,
    bins: Vec<u8>,
    cancel: CancelFlag,
}

impl<F: FrequencySource> VisualizerTask<F> {
    pub fn new(is_playing: bool, analyser: Option<F>, cancel: CancelFlag) -> Self {
        let bins = analyser
            .as_ref()
            .map(|a| vec![0u8; a.bin_count()])
            .unwrap_or_default();
        Self {
            is_playing,
            analyser,
            bins,
            cancel,
        }
    }

    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    pub fn tick<S: BarSurface>(&mut self, surface: &mut S, time_sec: f64) -> TickOutcome {
        if self.cancel.is_cancelled() {
            return TickOutcome::Stopped;
        }

        let dpr = surface.device_pixel_ratio();
        if let Some((w, h)) = backing_resize(surface.backing_size(), surface.css_size(), dpr) {
            surface.set_backing_size(w, h);
        }
        let (w, h) = surface.backing_size();
        let (w, h) = (w as f64, h as f64);
        surface.clear();

        let bars = match (&self.analyser, self.is_playing) {
            (Some(analyser), true) => {
                let count = analyser.bin_count();
                if self.bins.len() != count {
                    self.bins.resize(count, 0);
                }
                analyser.fill_bytes(&mut self.bins);
                spectrum_bars(&self.bins, w, h, dpr)
            }
            _ => idle_bars(time_sec, w, h, dpr),
        };
        for bar in &bars {
            surface.fill_bar(bar, BAR_COLOR);
        }
        TickOutcome::Continue
    }
}
