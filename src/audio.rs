use crate::constants::{ANALYSER_SMOOTHING, FFT_SIZE};
use crate::controller::{AnalysisGraph, MediaBackend};
use crate::state::GraphError;
use crate::visualizer::FrequencySource;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// The page's single `<audio>` element.
pub struct WebMedia {
    element: web::HtmlAudioElement,
}

impl WebMedia {
    /// Cross-origin mode must be set before any source, or the analyser is
    /// fed silence on remotely hosted streams.
    pub fn new() -> anyhow::Result<Self> {
        let element = web::HtmlAudioElement::new().map_err(crate::dom::js_err)?;
        element.set_cross_origin(Some("anonymous"));
        element.set_preload("auto");
        Ok(Self { element })
    }

    pub fn element(&self) -> &web::HtmlAudioElement {
        &self.element
    }

    pub fn play(&self) -> Result<js_sys::Promise, JsValue> {
        self.element.play()
    }

    pub fn error_code(&self) -> Option<u16> {
        self.element.error().map(|e| e.code())
    }
}

impl MediaBackend for WebMedia {
    type Graph = WebGraph;

    fn source(&self) -> String {
        self.element.src()
    }

    fn set_source(&mut self, url: &str) {
        self.element.set_src(url);
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            log::warn!("[player] pause failed: {:?}", e);
        }
    }

    fn rewind(&mut self) {
        self.element.set_current_time(0.0);
    }

    fn set_output_volume(&mut self, level: f64) {
        self.element.set_volume(level);
    }

    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn build_graph(&mut self) -> Result<WebGraph, GraphError> {
        let ctx = web::AudioContext::new().map_err(|e| GraphError::Context(format!("{:?}", e)))?;
        let analyser = match create_analyser(&ctx) {
            Ok(a) => a,
            Err(e) => {
                _ = ctx.close();
                return Err(e);
            }
        };
        let source = match ctx.create_media_element_source(&self.element) {
            Ok(s) => s,
            Err(e) => {
                _ = ctx.close();
                return Err(GraphError::Source(format!("{:?}", e)));
            }
        };
        // The element is captured by `source` from here on. If the chain
        // cannot reach the destination the element stays silent until reload.
        if let Err(e) = source
            .connect_with_audio_node(&analyser)
            .and_then(|_| analyser.connect_with_audio_node(&ctx.destination()))
        {
            _ = ctx.close();
            return Err(GraphError::Connect(format!("{:?}", e)));
        }
        Ok(WebGraph {
            ctx,
            analyser,
            _source: source,
        })
    }

    fn release(&mut self) {
        self.pause();
        self.element.set_src("");
    }
}

fn create_analyser(ctx: &web::AudioContext) -> Result<web::AnalyserNode, GraphError> {
    let analyser = ctx
        .create_analyser()
        .map_err(|e| GraphError::Context(format!("{:?}", e)))?;
    analyser.set_fft_size(FFT_SIZE);
    analyser.set_smoothing_time_constant(ANALYSER_SMOOTHING);
    Ok(analyser)
}

/// Context plus the source -> analyser -> destination chain built from it.
pub struct WebGraph {
    ctx: web::AudioContext,
    analyser: web::AnalyserNode,
    _source: web::MediaElementAudioSourceNode,
}

impl WebGraph {
    pub fn analyser(&self) -> &web::AnalyserNode {
        &self.analyser
    }
}

fn await_logged(label: &'static str, promise: Result<js_sys::Promise, JsValue>) {
    match promise {
        Ok(p) => spawn_local(async move {
            if let Err(e) = JsFuture::from(p).await {
                log::warn!("[graph] {} failed: {:?}", label, e);
            }
        }),
        Err(e) => log::warn!("[graph] {} failed: {:?}", label, e),
    }
}

impl AnalysisGraph for WebGraph {
    fn is_suspended(&self) -> bool {
        self.ctx.state() == web::AudioContextState::Suspended
    }

    fn resume(&self) {
        await_logged("resume", self.ctx.resume());
    }

    fn close(&self) {
        await_logged("close", self.ctx.close());
    }
}

impl FrequencySource for web::AnalyserNode {
    fn bin_count(&self) -> usize {
        self.frequency_bin_count() as usize
    }

    fn fill_bytes(&self, out: &mut [u8]) {
        self.get_byte_frequency_data(out);
    }
}
