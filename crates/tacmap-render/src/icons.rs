//! Asynchronous rasterization of SVG icons.
//!
//! Every icon instance on screen owns a slot keyed by [`IconKey`]. Requesting a
//! slot with a new source or size bumps its generation and schedules a decode;
//! completions arrive over a channel and are applied in [`IconCache::poll`]
//! only when their generation still matches the slot.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use resvg::{tiny_skia, usvg};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use tacmap_core::ElementId;
use thiserror::Error;

/// Icon decode errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IconError {
    #[error("Unsupported icon source: {0}")]
    Unsupported(String),
    #[error("Invalid data URL: {0}")]
    DataUrl(String),
    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },
    #[error("Invalid SVG: {0}")]
    Svg(String),
    #[error("Invalid icon size {0}x{1}")]
    Size(u32, u32),
    #[error("Icon decoder panicked: {0}")]
    Panicked(String),
}

/// Identifies one icon instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKey {
    /// A user-placed operator or legend icon.
    Element(ElementId),
    /// A preset icon from a map's admin config.
    Preset { floor: i32, index: usize },
}

/// Decoded RGBA8 image, not premultiplied.
#[derive(Clone, PartialEq)]
pub struct RasterIcon {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for RasterIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterIcon")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl RasterIcon {
    pub(crate) fn from_pixmap(pixmap: &tiny_skia::Pixmap) -> Self {
        let rgba = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            rgba,
        }
    }

    /// Encode as a PNG file.
    pub fn to_png(&self) -> Result<Vec<u8>, png::EncodingError> {
        crate::raster::encode_png(self.width, self.height, &self.rgba)
    }

    /// `data:image/png;base64,...` for embedding in SVG.
    pub fn to_data_url(&self) -> Result<String, png::EncodingError> {
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(self.to_png()?)))
    }
}

/// Lifecycle of one icon instance.
#[derive(Debug, Clone, PartialEq)]
pub enum IconState {
    Loading,
    Ready(Arc<RasterIcon>),
    Error(String),
}

/// Turns an icon source into pixels.
pub trait IconDecoder: Send + Sync {
    fn decode(&self, source: &str, width: u32, height: u32) -> Result<RasterIcon, IconError>;
}

/// Decodes SVG markup, SVG data URLs and SVG files under an asset root.
#[derive(Clone)]
pub struct SvgDecoder {
    asset_root: Option<PathBuf>,
    fonts: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for SvgDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgDecoder").field("asset_root", &self.asset_root).finish_non_exhaustive()
    }
}

impl Default for SvgDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgDecoder {
    pub fn new() -> Self {
        Self {
            asset_root: None,
            fonts: crate::raster::system_fonts(),
        }
    }

    /// Resolve site-absolute paths such as `/icons/x.svg` against `root`.
    pub fn with_asset_root(root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: Some(root.into()),
            ..Self::new()
        }
    }

    fn options(&self) -> usvg::Options<'static> {
        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fonts);
        options.resources_dir = self.asset_root.clone();
        options
    }

    fn load_bytes(&self, source: &str) -> Result<Vec<u8>, IconError> {
        let trimmed = source.trim();
        if trimmed.starts_with('<') {
            return Ok(trimmed.as_bytes().to_vec());
        }
        if let Some(rest) = trimmed.strip_prefix("data:") {
            return decode_data_url(rest);
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Err(IconError::Unsupported(trimmed.to_string()));
        }
        let path = match &self.asset_root {
            Some(root) => root.join(trimmed.trim_start_matches('/')),
            None => PathBuf::from(trimmed),
        };
        std::fs::read(&path).map_err(|e| IconError::Io {
            path,
            message: e.to_string(),
        })
    }
}

impl IconDecoder for SvgDecoder {
    fn decode(&self, source: &str, width: u32, height: u32) -> Result<RasterIcon, IconError> {
        let data = self.load_bytes(source)?;
        let tree = usvg::Tree::from_data(&data, &self.options()).map_err(|e| IconError::Svg(e.to_string()))?;
        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or(IconError::Size(width, height))?;
        let size = tree.size();
        let transform = tiny_skia::Transform::from_scale(width as f32 / size.width(), height as f32 / size.height());
        resvg::render(&tree, transform, &mut pixmap.as_mut());
        Ok(RasterIcon::from_pixmap(&pixmap))
    }
}

/// Decode the part of a data URL after `data:`.
fn decode_data_url(rest: &str) -> Result<Vec<u8>, IconError> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| IconError::DataUrl("missing ','".to_string()))?;
    if !header.starts_with("image/svg+xml") {
        return Err(IconError::Unsupported(format!("data:{header}")));
    }
    if header.ends_with(";base64") {
        STANDARD
            .decode(payload.trim())
            .map_err(|e| IconError::DataUrl(e.to_string()))
    } else {
        percent_decode(payload)
    }
}

/// Decode `%XX` escapes. Anything but two hex digits after `%` is an error.
fn percent_decode(input: &str) -> Result<Vec<u8>, IconError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .ok_or_else(|| IconError::DataUrl("truncated escape".to_string()))?;
            let byte = match (hex_value(hex[0]), hex_value(hex[1])) {
                (Some(hi), Some(lo)) => (hi << 4) | lo,
                _ => {
                    let escape = String::from_utf8_lossy(hex);
                    return Err(IconError::DataUrl(format!("bad escape %{escape}")));
                }
            };
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

fn hex_value(digit: u8) -> Option<u8> {
    char::from(digit).to_digit(16).map(|d| d as u8)
}

/// Where decodes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// One worker thread per request.
    #[default]
    Threaded,
    /// Decode on the calling thread; results still arrive through `poll`.
    Inline,
}

struct Slot {
    source: String,
    size: (u32, u32),
    generation: u64,
    state: IconState,
}

struct Completion {
    key: IconKey,
    generation: u64,
    result: Result<RasterIcon, IconError>,
}

/// A request to keep one icon instance decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct IconRequest {
    pub key: IconKey,
    pub source: String,
    /// Size in screen pixels.
    pub width: f64,
    pub height: f64,
}

/// Per-instance icon states fed by background decodes.
pub struct IconCache {
    decoder: Arc<dyn IconDecoder>,
    mode: DecodeMode,
    slots: HashMap<IconKey, Slot>,
    next_generation: u64,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl IconCache {
    pub fn new(decoder: Arc<dyn IconDecoder>, mode: DecodeMode) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            decoder,
            mode,
            slots: HashMap::new(),
            next_generation: 0,
            tx,
            rx,
        }
    }

    /// Cache backed by [`SvgDecoder`] resolving paths under `asset_root`.
    pub fn with_assets(asset_root: &Path, mode: DecodeMode) -> Self {
        Self::new(Arc::new(SvgDecoder::with_asset_root(asset_root)), mode)
    }

    pub fn state(&self, key: &IconKey) -> Option<&IconState> {
        self.slots.get(key).map(|slot| &slot.state)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Make sure `key` is decoded from `source` at the given size.
    ///
    /// An unchanged request keeps the current state. A changed source or
    /// size restarts the slot in `Loading` with a fresh generation.
    pub fn ensure(&mut self, key: IconKey, source: &str, width: f64, height: f64) -> &IconState {
        let size = (pixel_size(width), pixel_size(height));
        let fresh = match self.slots.get(&key) {
            Some(slot) => slot.source != source || slot.size != size,
            None => true,
        };
        if fresh {
            self.next_generation += 1;
            let generation = self.next_generation;
            self.slots.insert(
                key,
                Slot {
                    source: source.to_string(),
                    size,
                    generation,
                    state: IconState::Loading,
                },
            );
            self.spawn(key, generation, source.to_string(), size);
        }
        match self.slots.get(&key) {
            Some(slot) => &slot.state,
            None => &IconState::Loading,
        }
    }

    /// Drop the slot for `key`; any decode still in flight is discarded.
    pub fn release(&mut self, key: &IconKey) -> bool {
        self.slots.remove(key).is_some()
    }

    /// Bring the cache in line with the instances currently on screen.
    pub fn sync(&mut self, requests: &[IconRequest]) {
        let live: HashSet<IconKey> = requests.iter().map(|r| r.key).collect();
        self.slots.retain(|key, _| live.contains(key));
        for request in requests {
            self.ensure(request.key, &request.source, request.width, request.height);
        }
    }

    /// Apply finished decodes. Returns how many slots changed state.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(done) = self.rx.try_recv() {
            if self.apply(done) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until no slot is `Loading`, for offline rendering.
    pub fn wait_idle(&mut self) {
        while self.slots.values().any(|slot| slot.state == IconState::Loading) {
            match self.rx.recv() {
                Ok(done) => {
                    self.apply(done);
                }
                Err(_) => return,
            }
        }
    }

    fn apply(&mut self, done: Completion) -> bool {
        let Some(slot) = self.slots.get_mut(&done.key) else {
            log::debug!("Discarding icon decode for released instance {:?}", done.key);
            return false;
        };
        if slot.generation != done.generation {
            log::debug!(
                "Discarding stale icon decode for {:?} (generation {} != {})",
                done.key,
                done.generation,
                slot.generation
            );
            return false;
        }
        slot.state = match done.result {
            Ok(icon) => IconState::Ready(Arc::new(icon)),
            Err(e) => {
                log::warn!("Failed to decode icon {:?}: {e}", done.key);
                IconState::Error(e.to_string())
            }
        };
        true
    }

    fn spawn(&self, key: IconKey, generation: u64, source: String, (width, height): (u32, u32)) {
        let decoder = Arc::clone(&self.decoder);
        let tx = self.tx.clone();
        let job = move || {
            // Every request reports back, so `wait_idle` cannot hang on a
            // decoder that panicked.
            let result = panic::catch_unwind(AssertUnwindSafe(|| decoder.decode(&source, width, height)))
                .unwrap_or_else(|payload| Err(IconError::Panicked(panic_message(payload.as_ref()))));
            // The cache may be gone; nothing to report to.
            let _ = tx.send(Completion { key, generation, result });
        };
        match self.mode {
            DecodeMode::Inline => job(),
            DecodeMode::Threaded => {
                std::thread::spawn(job);
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn pixel_size(size: f64) -> u32 {
    if size.is_finite() { size.round().clamp(1.0, 4096.0) as u32 } else { 1 }
}
