//! Offline asset cache policy for the service worker.
//!
//! Cache-first for page assets, never for the live stream. The worker shell
//! asks these functions what to do; it owns no policy of its own.

use crate::constants::STREAM_HOST;
use wasm_bindgen::prelude::*;

pub const CACHE_NAME: &str = "radio-player-v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchRoute {
    /// Let the request hit the network untouched.
    Bypass,
    /// Serve from cache, fall back to network.
    CacheFirst,
}

#[derive(Clone, Debug)]
pub struct CachePolicy {
    pub cache_name: &'static str,
    pub precache: &'static [&'static str],
    pub stream_host: &'static str,
    pub allowed_origins: &'static [&'static str],
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            cache_name: CACHE_NAME,
            precache: &["./", "./index.html", "./manifest.json"],
            stream_host: STREAM_HOST,
            allowed_origins: &[
                "cdn.tailwindcss.com",
                "fonts.googleapis.com",
                "fonts.gstatic.com",
                "picsum.photos",
            ],
        }
    }
}

impl CachePolicy {
    /// `destination` is `Request.destination`. Media requests bypass the
    /// cache whatever their host, so a stream URL overridden from the page is
    /// never cached either.
    pub fn route(&self, url: &str, destination: &str) -> FetchRoute {
        if url.contains(self.stream_host) || matches!(destination, "audio" | "video") {
            FetchRoute::Bypass
        } else {
            FetchRoute::CacheFirst
        }
    }

    /// Whether a network response may be stored. Opaque CDN responses
    /// (status 0) are accepted.
    pub fn should_store(&self, url: &str, own_origin: &str, status: u16, kind: &str) -> bool {
        if status == 404 || kind == "error" {
            return false;
        }
        if self.route(url, "") == FetchRoute::Bypass {
            return false;
        }
        (!own_origin.is_empty() && url.starts_with(own_origin))
            || self.allowed_origins.iter().any(|o| url.contains(o))
    }

    /// Caches left over from previous versions.
    pub fn stale_caches<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        names
            .into_iter()
            .filter(|n| *n != self.cache_name)
            .map(str::to_string)
            .collect()
    }
}

// Service worker entry points.

#[wasm_bindgen]
pub fn sw_cache_name() -> String {
    CACHE_NAME.to_string()
}

#[wasm_bindgen]
pub fn sw_precache_urls() -> js_sys::Array {
    CachePolicy::default()
        .precache
        .iter()
        .map(|u| JsValue::from_str(u))
        .collect()
}

#[wasm_bindgen]
pub fn sw_should_bypass(url: &str, destination: &str) -> bool {
    CachePolicy::default().route(url, destination) == FetchRoute::Bypass
}

#[wasm_bindgen]
pub fn sw_should_store(url: &str, own_origin: &str, status: u16, kind: &str) -> bool {
    let store = CachePolicy::default().should_store(url, own_origin, status, kind);
    log::debug!("[cache] store {} -> {}", url, store);
    store
}

#[wasm_bindgen]
pub fn sw_is_stale(name: &str) -> bool {
    !CachePolicy::default().stale_caches([name]).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_is_never_cached() {
        let p = CachePolicy::default();
        let url = "https://stream.radiojar.com/8s5u5tpdtwzuv?t=1";
        assert_eq!(p.route(url, ""), FetchRoute::Bypass);
        assert!(!p.should_store(url, "https://stream.radiojar.com", 200, "cors"));
    }

    #[test]
    fn worker_purge_matches_policy() {
        assert!(!sw_is_stale(CACHE_NAME));
        assert!(sw_is_stale("radio-player-v0"));
    }
}
