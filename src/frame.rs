use crate::visualizer::{
    BarRect, BarSurface, CancelFlag, LoopLifecycle, TickOutcome, VisualizerTask,
};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// 2D canvas painter for the bar visualizer.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(crate::dom::js_err)?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("unexpected 2d context: {:?}", e))?;
        Ok(Self { canvas, ctx })
    }
}

impl BarSurface for CanvasSurface {
    fn css_size(&self) -> (f64, f64) {
        let rect = self.canvas.get_bounding_client_rect();
        (rect.width(), rect.height())
    }

    fn device_pixel_ratio(&self) -> f64 {
        web::window()
            .map(|w| w.device_pixel_ratio())
            .filter(|r| *r > 0.0)
            .unwrap_or(1.0)
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        let (w, h) = self.backing_size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn fill_bar(&mut self, bar: &BarRect, color: &str) {
        #[allow(deprecated)]
        self.ctx.set_fill_style(&JsValue::from_str(color));
        self.ctx.set_global_alpha(bar.alpha);
        self.ctx.begin_path();
        if rounded_rect_path(&self.ctx, bar).is_ok() {
            self.ctx.fill();
        }
    }
}

fn rounded_rect_path(ctx: &web::CanvasRenderingContext2d, bar: &BarRect) -> Result<(), JsValue> {
    let (x, y, w, h) = (bar.x, bar.y, bar.width, bar.height);
    let r = bar.radius.min(w / 2.0).min(h / 2.0).max(0.0);
    ctx.move_to(x + r, y);
    ctx.arc_to(x + w, y, x + w, y + h, r)?;
    ctx.arc_to(x + w, y + h, x, y + h, r)?;
    ctx.arc_to(x, y + h, x, y, r)?;
    ctx.arc_to(x, y, x + w, y, r)?;
    ctx.close_path();
    Ok(())
}

struct RunningLoop {
    cancel: CancelFlag,
    raf_id: Rc<Cell<Option<i32>>>,
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl RunningLoop {
    fn stop(self) {
        self.cancel.cancel();
        if let Some(id) = self.raf_id.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        // Dropping the closure breaks the self-reference that keeps it alive.
        self.tick.borrow_mut().take();
    }
}

/// Owns the canvas and restarts its frame loop whenever
/// `{is_playing, analyser}` changes. Unmounting is final.
pub struct Visualizer {
    surface: Rc<RefCell<CanvasSurface>>,
    lifecycle: LoopLifecycle<(bool, Option<web::AnalyserNode>)>,
    running: Option<RunningLoop>,
}

impl Visualizer {
    pub fn new(surface: CanvasSurface) -> Self {
        Self {
            surface: Rc::new(RefCell::new(surface)),
            lifecycle: LoopLifecycle::new(),
            running: None,
        }
    }

    pub fn set_inputs(&mut self, is_playing: bool, analyser: Option<web::AnalyserNode>) {
        if !self.lifecycle.restart_for((is_playing, analyser.clone())) {
            return;
        }
        self.stop_running();
        log::debug!(
            "[viz] restart playing={} analyser={}",
            is_playing,
            analyser.is_some()
        );
        self.running = Some(start_loop(self.surface.clone(), is_playing, analyser));
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
        self.stop_running();
    }

    fn stop_running(&mut self) {
        if let Some(running) = self.running.take() {
            running.stop();
        }
    }
}

fn start_loop(
    surface: Rc<RefCell<CanvasSurface>>,
    is_playing: bool,
    analyser: Option<web::AnalyserNode>,
) -> RunningLoop {
    let cancel = CancelFlag::new();
    let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

    let mut task = VisualizerTask::new(is_playing, analyser, cancel.clone());
    let started = Instant::now();
    let tick_clone = tick.clone();
    let raf_tick = raf_id.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        raf_tick.set(None);
        let t = started.elapsed().as_secs_f64();
        if task.tick(&mut *surface.borrow_mut(), t) == TickOutcome::Stopped {
            return;
        }
        raf_tick.set(request_frame(&tick_clone));
    }) as Box<dyn FnMut()>));
    raf_id.set(request_frame(&tick));

    RunningLoop {
        cancel,
        raf_id,
        tick,
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) -> Option<i32> {
    let window = web::window()?;
    let slot = tick.borrow();
    let closure = slot.as_ref()?;
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(e) => {
            log::error!("[viz] requestAnimationFrame failed: {:?}", e);
            None
        }
    }
}
