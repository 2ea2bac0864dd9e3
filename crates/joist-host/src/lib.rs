//! Host plumbing between documents on disk and live screens.
//!
//! A [`FileSource`] finds layout and style JSON, a [`LayoutCache`]
//! keeps parsed documents warm, the [`ReloadHub`] fans change events
//! out to screens, and a [`ViewModel`] ties one screen's name, state
//! and rebuild bookkeeping together.

#![allow(clippy::all)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::SystemTime;

use joist_schema::{
    Component, DocumentError, DocumentSource, EdgeInsets, Resolver, StateStore, StyleCache,
    decode_root, parse_document,
};
use joist_scene::{
    Axis, BuildContext, Fill, Modifier, RenderKind, RenderNode, Rgba, StackPrimitive,
    TextPrimitive, build_node,
};
use serde_json::Value;
use tracing::{debug, warn};

// -------------------------- FILE SOURCE --------------------------

/// Documents on disk: a bundle directory plus an optional cache of
/// downloaded copies.
///
/// Layouts live under `Layouts/{name}.json` and style fragments under
/// `Styles/{name}.json`, in both the bundle and the cache. Development
/// mode prefers the cache so freshly downloaded documents win; release
/// prefers the bundle and only falls back to the cache.
pub struct FileSource {
    layouts_dir: PathBuf,
    styles_dir: PathBuf,
    cache_dir: Option<PathBuf>,
    development: bool,
}

impl FileSource {
    pub fn new(bundle: impl AsRef<Path>) -> FileSource {
        let bundle = bundle.as_ref();
        FileSource {
            layouts_dir: bundle.join("Layouts"),
            styles_dir: bundle.join("Styles"),
            cache_dir: None,
            development: false,
        }
    }

    pub fn with_cache_dir(mut self, cache: impl Into<PathBuf>) -> FileSource {
        self.cache_dir = Some(cache.into());
        self
    }

    pub fn development(mut self, development: bool) -> FileSource {
        self.development = development;
        self
    }

    fn candidates(&self, subdir: &str, bundled: &Path, name: &str) -> Vec<PathBuf> {
        let file = format!("{name}.json");
        let bundled = bundled.join(&file);
        let cached = self.cache_dir.as_ref().map(|c| c.join(subdir).join(&file));
        match (cached, self.development) {
            (Some(cached), true) => vec![cached, bundled],
            (Some(cached), false) => vec![bundled, cached],
            (None, _) => vec![bundled],
        }
    }

    fn read_first(&self, candidates: &[PathBuf]) -> Option<String> {
        candidates.iter().find_map(|path| read_text(path))
    }

    fn stamp_first(&self, candidates: &[PathBuf]) -> Option<SystemTime> {
        candidates
            .iter()
            .find_map(|path| fs::metadata(path).ok().and_then(|meta| meta.modified().ok()))
    }
}

impl DocumentSource for FileSource {
    fn load_layout(&self, name: &str) -> Option<String> {
        self.read_first(&self.candidates("Layouts", &self.layouts_dir, name))
    }

    fn load_style(&self, name: &str) -> Option<String> {
        self.read_first(&self.candidates("Styles", &self.styles_dir, name))
    }

    fn layout_stamp(&self, name: &str) -> Option<SystemTime> {
        self.stamp_first(&self.candidates("Layouts", &self.layouts_dir, name))
    }

    fn style_stamp(&self, name: &str) -> Option<SystemTime> {
        self.stamp_first(&self.candidates("Styles", &self.styles_dir, name))
    }
}

fn read_text(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read document");
            None
        }
    }
}

// -------------------------- LAYOUT CACHE --------------------------

struct CacheEntry {
    document: Value,
    stamp: Option<SystemTime>,
}

/// Parsed layout documents by name. In development mode an entry is
/// revalidated against the source's modification stamp on every access,
/// so edits show up without restarting.
pub struct LayoutCache {
    entries: HashMap<String, CacheEntry>,
    development: bool,
}

impl LayoutCache {
    pub fn new(development: bool) -> LayoutCache {
        LayoutCache { entries: HashMap::new(), development }
    }

    /// The parsed document for `name`, loading and caching on miss.
    pub fn document(
        &mut self,
        name: &str,
        source: &dyn DocumentSource,
    ) -> Result<Value, DocumentError> {
        if self.development {
            let current = source.layout_stamp(name);
            if let Some(entry) = self.entries.get(name) {
                if entry.stamp != current {
                    debug!(name, "layout changed on disk, reloading");
                    self.entries.remove(name);
                }
            }
        }
        if let Some(entry) = self.entries.get(name) {
            return Ok(entry.document.clone());
        }

        let text = source
            .load_layout(name)
            .ok_or_else(|| DocumentError::Missing { name: name.to_string() })?;
        let document = parse_document(&text)?;
        let stamp = source.layout_stamp(name);
        self.entries.insert(name.to_string(), CacheEntry { document: document.clone(), stamp });
        Ok(document)
    }

    pub fn invalidate(&mut self, name: &str) {
        self.entries.remove(name);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// -------------------------- RELOAD HUB --------------------------

/// A document change noticed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadEvent {
    LayoutChanged(String),
    StyleChanged(String),
    /// Drop everything; used after bulk downloads.
    Full,
}

/// Fans reload events out to every subscribed screen. Senders whose
/// receiver went away are dropped on the next notify.
pub struct ReloadHub {
    senders: Vec<Sender<ReloadEvent>>,
}

impl ReloadHub {
    pub fn new() -> ReloadHub {
        ReloadHub { senders: Vec::new() }
    }

    pub fn subscribe(&mut self) -> Receiver<ReloadEvent> {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        rx
    }

    pub fn notify(&mut self, event: ReloadEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
        debug!(?event, subscribers = self.senders.len(), "reload event delivered");
    }

    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        ReloadHub::new()
    }
}

// -------------------------- VIEW MODEL --------------------------

/// Shared host services one or more screens draw from.
pub struct HostContext {
    source: Box<dyn DocumentSource>,
    layouts: LayoutCache,
    styles: StyleCache,
    base_font_size: f64,
}

impl HostContext {
    pub fn new(source: Box<dyn DocumentSource>, development: bool) -> HostContext {
        HostContext {
            source,
            layouts: LayoutCache::new(development),
            styles: StyleCache::new(development),
            base_font_size: 17.0,
        }
    }

    pub fn set_base_font_size(&mut self, size: f64) {
        self.base_font_size = size;
    }

    /// Loads, parses and style/include-resolves one layout document.
    pub fn resolved_layout(
        &mut self,
        name: &str,
        state: &StateStore,
    ) -> Result<Value, DocumentError> {
        let raw = self.layouts.document(name, self.source.as_ref())?;
        let mut resolver = Resolver::new(self.source.as_ref(), &mut self.styles);
        Ok(resolver.resolve(&raw, state))
    }

    /// Applies one reload event to the caches.
    pub fn apply(&mut self, event: &ReloadEvent) {
        match event {
            ReloadEvent::LayoutChanged(name) => self.layouts.invalidate(name),
            ReloadEvent::StyleChanged(name) => self.styles.invalidate(name),
            ReloadEvent::Full => {
                self.layouts.clear();
                self.styles.clear();
            }
        }
    }
}

/// One screen: a layout name, its state store and rebuild bookkeeping.
pub struct ViewModel {
    name: String,
    pub state: StateStore,
    needs_rebuild: bool,
    built_generation: u64,
    reload: Option<Receiver<ReloadEvent>>,
}

impl ViewModel {
    pub fn new(name: impl Into<String>) -> ViewModel {
        ViewModel {
            name: name.into(),
            state: StateStore::new(),
            needs_rebuild: true,
            built_generation: 0,
            reload: None,
        }
    }

    pub fn with_state(name: impl Into<String>, data: &serde_json::Map<String, Value>) -> ViewModel {
        let mut vm = ViewModel::new(name);
        vm.state = StateStore::from_json(data);
        vm
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscribe(&mut self, hub: &mut ReloadHub) {
        self.reload = Some(hub.subscribe());
    }

    /// Drains pending reload events into the host caches. Returns true
    /// when any of them forces this screen to rebuild.
    pub fn poll_reload(&mut self, host: &mut HostContext) -> bool {
        let Some(rx) = &self.reload else {
            return false;
        };
        let mut dirty = false;
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    host.apply(&event);
                    let ours = match &event {
                        ReloadEvent::LayoutChanged(name) => *name == self.name,
                        // Any style or bulk change may feed this screen.
                        ReloadEvent::StyleChanged(_) | ReloadEvent::Full => true,
                    };
                    if ours {
                        self.needs_rebuild = true;
                        dirty = true;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.reload = None;
                    break;
                }
            }
        }
        dirty
    }

    /// Whether the next frame needs a fresh render tree.
    pub fn is_dirty(&self) -> bool {
        self.needs_rebuild || self.state.generation() != self.built_generation
    }

    pub fn mark_dirty(&mut self) {
        self.needs_rebuild = true;
    }

    /// Builds the screen's render tree, or an error panel when the
    /// document is unusable.
    pub fn build(&mut self, host: &mut HostContext) -> RenderNode {
        let tree = match host.resolved_layout(&self.name, &self.state) {
            Ok(document) => match decode_root(&document) {
                Ok(component) => self.build_component(&component, host.base_font_size),
                Err(error) => error_panel(&error),
            },
            Err(error) => error_panel(&error),
        };
        self.needs_rebuild = false;
        self.built_generation = self.state.generation();
        tree
    }

    fn build_component(&self, component: &Component, base_font_size: f64) -> RenderNode {
        let ctx = BuildContext::new(&self.state).base_font_size(base_font_size);
        build_node(component, &ctx)
    }
}

/// Red-bordered panel shown in place of a broken screen, so a bad edit
/// during development is visible instead of a blank window.
pub fn error_panel(error: &DocumentError) -> RenderNode {
    let mut title = TextPrimitive::new("Layout Error", 20.0);
    title.color = Rgba::RED;
    let mut message = TextPrimitive::new(error.message(), 14.0);
    message.color = Rgba::BLACK;

    let mut children = vec![
        RenderNode::new(RenderKind::Text(title)),
        RenderNode::new(RenderKind::Text(message)),
    ];
    let preview = error.preview();
    if !preview.is_empty() {
        let mut excerpt = TextPrimitive::new(preview, 12.0);
        excerpt.color = Rgba { r: 0.4, g: 0.4, b: 0.4, a: 1.0 };
        children.push(RenderNode::new(RenderKind::Text(excerpt)));
    }

    let mut panel = RenderNode::new(RenderKind::Stack(StackPrimitive {
        axis: Some(Axis::Vertical),
        spacing: 8.0,
        tap_action: None,
        children,
    }));
    panel.modifiers.push(Modifier::Padding(EdgeInsets::all(16.0)));
    panel.modifiers.push(Modifier::Background(Fill::Solid(Rgba::WHITE)));
    panel.modifiers.push(Modifier::Border { width: 2.0, color: Rgba::RED });
    panel
}
