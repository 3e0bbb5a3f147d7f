//! Page and per-surface configuration.
//!
//! The host page declares each rendering surface in a TOML file, the
//! client-side equivalent of per-element attributes. Example:
//!
//! ```toml
//! [page]
//! url = "http://localhost:8080/"
//!
//! [[surface]]
//! id = "emulator"
//! draw_url = "draw"
//! event_mask = 9247          # move | down | up | keydown | keyup | touchmove | clipboard
//! reconnect_interval_ms = 500
//! disable_context_menu = true
//! ```
//!
//! A surface without a resolvable `draw_url` is silently disabled: no
//! listeners, no connection attempt, no reported error. Everything else in
//! its entry is read once into an immutable [`SurfaceConfig`] that every
//! reconnect reuses unchanged.

use std::path::{Path, PathBuf};
use std::time::Duration;

use canvas_core::EventMask;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Default logical framebuffer size when a surface entry omits dimensions.
const DEFAULT_LOGICAL_WIDTH: u32 = 1024;
const DEFAULT_LOGICAL_HEIGHT: u32 = 768;

/// Error type for page-configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error reading page config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse page config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The declared page URL is not a valid absolute URL.
    #[error("invalid page URL {url:?}: {source}")]
    PageUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level page configuration read from disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageConfig {
    pub page: PageSection,
    /// One entry per rendering surface on the page.
    #[serde(default, rename = "surface")]
    pub surfaces: Vec<SurfaceEntry>,
}

/// The page the surfaces live on; relative draw URLs resolve against it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageSection {
    pub url: String,
}

impl PageConfig {
    /// Parses the declared page URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PageUrl`] when the declared URL is not a valid
    /// absolute URL. Unlike a missing per-surface `draw_url`, this is a real
    /// error: without a page URL no relative endpoint can resolve.
    pub fn page_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.page.url).map_err(|source| ConfigError::PageUrl {
            url: self.page.url.clone(),
            source,
        })
    }
}

/// Raw per-surface attributes as declared in the page file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SurfaceEntry {
    /// Surface identity; controllers are keyed by this.
    pub id: String,
    /// Draw endpoint. Absent or unresolvable ⇒ the surface is disabled.
    #[serde(default)]
    pub draw_url: Option<String>,
    /// Which event kinds to forward. Default 0: no input forwarding.
    #[serde(default)]
    pub event_mask: EventMask,
    /// Delay before reconnecting after a close. Default 0: no reconnect.
    #[serde(default)]
    pub reconnect_interval_ms: u64,
    /// Whether to suppress the context menu over the surface.
    #[serde(default)]
    pub disable_context_menu: bool,
    /// Logical framebuffer width.
    #[serde(default = "default_logical_width")]
    pub width: u32,
    /// Logical framebuffer height.
    #[serde(default = "default_logical_height")]
    pub height: u32,
}

fn default_logical_width() -> u32 {
    DEFAULT_LOGICAL_WIDTH
}

fn default_logical_height() -> u32 {
    DEFAULT_LOGICAL_HEIGHT
}

/// Loads a [`PageConfig`] from `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures and
/// [`ConfigError::Parse`] for malformed TOML.
pub fn load_page_config(path: &Path) -> Result<PageConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

// ── Resolved per-surface configuration ────────────────────────────────────────

/// Immutable configuration for one surface's connection controller.
///
/// Built once per surface; reconnects reuse the same value unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    /// Normalized draw endpoint (`ws` or `wss` scheme).
    pub endpoint: Url,
    /// Which event kinds get listeners.
    pub event_mask: EventMask,
    /// Zero disables reconnection entirely.
    pub reconnect_interval: Duration,
    /// Whether the context menu is suppressed over the surface.
    pub suppress_context_menu: bool,
}

impl SurfaceConfig {
    /// Resolves a raw [`SurfaceEntry`] against the page URL.
    ///
    /// Returns `None` when the entry has no `draw_url` or it cannot be
    /// resolved to a WebSocket endpoint; this is the deliberate silent-skip that
    /// disables the surface without reporting a failure.
    pub fn from_entry(entry: &SurfaceEntry, page_url: &Url) -> Option<SurfaceConfig> {
        let raw = entry.draw_url.as_deref()?;
        let endpoint = normalize_endpoint(raw, page_url)?;
        Some(SurfaceConfig {
            endpoint,
            event_mask: entry.event_mask,
            reconnect_interval: Duration::from_millis(entry.reconnect_interval_ms),
            suppress_context_menu: entry.disable_context_menu,
        })
    }
}

/// Normalizes a raw draw URL to an absolute WebSocket endpoint.
///
/// Absolute `ws://` / `wss://` URLs pass through unchanged. Anything else is
/// resolved against the page URL and its scheme is mapped `http → ws`,
/// `https → wss` (the scheme swap rewrites the `http` prefix, so `https`
/// becomes `wss` in one step). Unresolvable or non-HTTP inputs yield `None`.
pub fn normalize_endpoint(raw: &str, page_url: &Url) -> Option<Url> {
    if raw.starts_with("ws://") || raw.starts_with("wss://") {
        return Url::parse(raw).ok();
    }
    let resolved = page_url.join(raw).ok()?;
    match resolved.scheme() {
        "ws" | "wss" => Some(resolved),
        "http" | "https" => Url::parse(&resolved.as_str().replacen("http", "ws", 1)).ok(),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
