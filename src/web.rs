//! Browser bindings: `web-sys` implementations of the page capabilities and
//! the start-up wiring of the four components.

use crate::config::{ColorSource, SiteConfig};
use crate::dom::{DocumentRoot, PreferenceStore, RenderTarget, StyleTarget};
use crate::error::{PortfolioError, Result};
use crate::particles::{
    DrawSurface, FrameHandle, FrameScheduler, ParticleBackground, ParticleEnvironment, Rgba,
};
use crate::repos::{RepoListView, RepoLoadError, RepoShowcase};
use crate::reveal::{IntersectionEntry, RevealAnimator};
use crate::theme::ThemeController;
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::io;
use std::rc::Rc;
use tracing::{debug, error, info, warn, Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Storage, Window,
};

pub const CONFIG_SCRIPT_ID: &str = "portfolio-config";

/// Module scripts run after the document is parsed, so the page structure is
/// ready by the time this is called.
#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    init_console_logging();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let config = load_config(&document);

    // Each component fails on its own; none of them stops the others.
    if let Err(err) = start_particles(&window, &document, &config) {
        error!(error = ?err, "Particle background failed to start");
    }
    start_repos(&document, &config);
    if let Err(err) = start_reveal(&window, &document, &config) {
        error!(error = ?err, "Reveal animations failed to start");
    }
    if let Err(err) = start_theme(&window, &document, &config) {
        error!(error = ?err, "Theme toggle failed to start");
    }

    info!(username = %config.github_username, "Portfolio page initialized");
    Ok(())
}

/// Defaults, overridden by the inline `#portfolio-config` JSON when it parses.
pub fn load_config(document: &Document) -> SiteConfig {
    let Some(raw) = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|script| script.text_content())
    else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            warn!(%err, "Ignoring malformed page configuration");
            SiteConfig::default()
        }
    }
}

fn media_matches(window: &Window, query: &str) -> bool {
    window
        .match_media(query)
        .ok()
        .flatten()
        .map(|list| list.matches())
        .unwrap_or(false)
}

fn viewport_size(window: &Window) -> (f64, f64) {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width, height)
}

// ---- console logging ----

struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buffer);
        ConsoleMethod::for_level(self.level).write(&JsValue::from_str(text.trim_end()));
    }
}

/// Console function an event is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Debug,
}

impl ConsoleMethod {
    /// Trace events go to `console.debug` along with debug events.
    pub fn for_level(level: Level) -> Self {
        if level == Level::ERROR {
            ConsoleMethod::Error
        } else if level == Level::WARN {
            ConsoleMethod::Warn
        } else if level == Level::INFO {
            ConsoleMethod::Info
        } else {
            ConsoleMethod::Debug
        }
    }

    fn write(self, message: &JsValue) {
        match self {
            ConsoleMethod::Error => web_sys::console::error_1(message),
            ConsoleMethod::Warn => web_sys::console::warn_1(message),
            ConsoleMethod::Info => web_sys::console::info_1(message),
            ConsoleMethod::Debug => web_sys::console::debug_1(message),
        }
    }
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}

/// Route `tracing` output to the developer console. Safe to call more than once.
pub fn init_console_logging() {
    let _ = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .without_time()
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .try_init();
}

// ---- page capabilities ----

impl RenderTarget for Element {
    fn set_inner_html(&mut self, html: &str) {
        Element::set_inner_html(self, html);
    }
}

impl DocumentRoot for Element {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        if let Err(err) = Element::set_attribute(self, name, value) {
            warn!(name, error = ?err, "Could not set attribute");
        }
    }
}

impl StyleTarget for HtmlElement {
    fn set_style_property(&mut self, name: &str, value: &str) {
        if let Err(err) = self.style().set_property(name, value) {
            warn!(name, error = ?err, "Could not set style property");
        }
    }
}

/// `localStorage`, which may be missing in privacy modes and sandboxed frames.
pub struct LocalStorage(pub Option<Storage>);

impl LocalStorage {
    pub fn from_window(window: &Window) -> Self {
        LocalStorage(window.local_storage().ok().flatten())
    }
}

impl PreferenceStore for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.0.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let storage = self
            .0
            .as_ref()
            .ok_or_else(|| PortfolioError::StorageError("localStorage unavailable".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|err| PortfolioError::StorageError(format!("{err:?}")))
    }
}

struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }
}

impl DrawSurface for CanvasSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        self.ctx.begin_path();
        if self.ctx.arc(x, y, radius, 0.0, TAU).is_err() {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_string());
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba, line_width: f64) {
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.set_stroke_style_str(&color.to_string());
        self.ctx.set_line_width(line_width);
        self.ctx.stroke();
    }
}

// ---- particle background ----

type FrameCallback = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` bound to the loop's frame callback.
struct AnimationFrames<'a> {
    window: &'a Window,
    callback: &'a FrameCallback,
}

impl FrameScheduler for AnimationFrames<'_> {
    fn request_frame(&mut self) -> Result<FrameHandle> {
        self.window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(|err| PortfolioError::SchedulerError(format!("{err:?}")))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0) {
            debug!(error = ?err, "cancelAnimationFrame failed");
        }
    }
}

struct ParticleLoop {
    window: Window,
    background: RefCell<ParticleBackground<CanvasSurface>>,
    callback: RefCell<Option<FrameCallback>>,
}

impl ParticleLoop {
    fn with_frames(
        &self,
        f: impl FnOnce(&mut ParticleBackground<CanvasSurface>, &mut AnimationFrames<'_>),
    ) {
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        let mut frames = AnimationFrames {
            window: &self.window,
            callback,
        };
        f(&mut self.background.borrow_mut(), &mut frames);
    }
}

pub fn start_particles(
    window: &Window,
    document: &Document,
    config: &SiteConfig,
) -> std::result::Result<(), JsValue> {
    let options = &config.particles;
    let canvas = document
        .get_element_by_id(&config.dom.canvas)
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());

    let primary_color = match options.color {
        ColorSource::Themed { .. } => document
            .document_element()
            .and_then(|root| window.get_computed_style(&root).ok().flatten())
            .and_then(|style| style.get_property_value("--color-primary").ok()),
        ColorSource::Fixed { .. } => None,
    };
    let (width, height) = viewport_size(window);
    let env = ParticleEnvironment {
        width,
        height,
        prefers_reduced_motion: media_matches(window, "(prefers-reduced-motion: reduce)"),
        primary_color,
    };

    let observed_canvas = canvas.clone();
    let surface = canvas.and_then(CanvasSurface::new);
    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    let Some(background) = ParticleBackground::start(surface, &env, options, seed) else {
        return Ok(());
    };

    let particle_loop = Rc::new(ParticleLoop {
        window: window.clone(),
        background: RefCell::new(background),
        callback: RefCell::new(None),
    });
    let weak = Rc::downgrade(&particle_loop);
    *particle_loop.callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
        if let Some(particle_loop) = weak.upgrade() {
            particle_loop.with_frames(|background, frames| background.on_frame(frames));
        }
    }));

    {
        let particle_loop = particle_loop.clone();
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            let (width, height) = viewport_size(&particle_loop.window);
            particle_loop.background.borrow_mut().resize(width, height);
        });
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        on_resize.forget();
    }

    let mut observer = None;
    if options.pause_when_hidden {
        let on_visibility = {
            let particle_loop = particle_loop.clone();
            let document = document.clone();
            Closure::<dyn FnMut()>::new(move || {
                let hidden = document.hidden();
                particle_loop.with_frames(|background, frames| {
                    background.set_document_hidden(hidden, frames)
                });
            })
        };
        document.add_event_listener_with_callback(
            "visibilitychange",
            on_visibility.as_ref().unchecked_ref(),
        )?;
        on_visibility.forget();

        if let Some(canvas) = &observed_canvas {
            let on_intersect = {
                let particle_loop = particle_loop.clone();
                Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
                    for entry in entries.iter() {
                        let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                            continue;
                        };
                        let intersecting = entry.is_intersecting();
                        particle_loop.with_frames(|background, frames| {
                            background.set_canvas_intersecting(intersecting, frames)
                        });
                    }
                })
            };
            let canvas_observer = IntersectionObserver::new(on_intersect.as_ref().unchecked_ref())?;
            on_intersect.forget();
            canvas_observer.observe(canvas);
            observer = Some(canvas_observer);
        }
    }

    {
        let particle_loop = particle_loop.clone();
        let on_unload = Closure::<dyn FnMut()>::new(move || {
            particle_loop.with_frames(|background, frames| background.teardown(frames));
            if let Some(observer) = &observer {
                observer.disconnect();
            }
        });
        window.add_event_listener_with_callback("beforeunload", on_unload.as_ref().unchecked_ref())?;
        on_unload.forget();
    }

    particle_loop.with_frames(|background, frames| background.begin(frames));
    Ok(())
}

// ---- repositories ----

pub fn start_repos(document: &Document, config: &SiteConfig) {
    let Some(list) = document.get_element_by_id(&config.dom.repos_list) else {
        debug!("No repository list on the page");
        return;
    };
    let showcase = match RepoShowcase::from_config(config) {
        Ok(showcase) => showcase,
        Err(err) => {
            error!(%err, "Repository client could not be built");
            list.set_inner_html(&RepoListView::Failed(RepoLoadError::Unavailable).to_html());
            return;
        }
    };
    wasm_bindgen_futures::spawn_local(async move {
        showcase.render_into(Some(list)).await;
    });
}

// ---- reveal ----

pub fn start_reveal(
    window: &Window,
    document: &Document,
    config: &SiteConfig,
) -> std::result::Result<(), JsValue> {
    let options = config.reveal.clone();
    let observer = reveal_observer(RevealAnimator::new(options.clone()))?;

    // Give layout a moment to settle before the elements are collected.
    let selectors = options.selector_list();
    let document = document.clone();
    let observe_all = Closure::once_into_js(move || match document.query_selector_all(&selectors) {
        Ok(nodes) => {
            let mut observed = 0;
            for i in 0..nodes.length() {
                if let Some(element) = nodes.item(i).and_then(|node| node.dyn_into::<Element>().ok()) {
                    observer.observe(&element);
                    observed += 1;
                }
            }
            debug!(observed, "Reveal targets observed");
        }
        Err(err) => warn!(error = ?err, "Reveal selector query failed"),
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        observe_all.unchecked_ref(),
        options.start_delay_ms as i32,
    )?;
    Ok(())
}

/// Observer that reveals each intersecting element, configured with the
/// animator's threshold and bottom margin.
pub fn reveal_observer(animator: RevealAnimator) -> std::result::Result<IntersectionObserver, JsValue> {
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(animator.options().threshold));
    init.set_root_margin(&animator.options().root_margin());

    let on_intersect = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let Ok(mut target) = entry.target().dyn_into::<HtmlElement>() else {
                continue;
            };
            let observed = IntersectionEntry {
                is_intersecting: entry.is_intersecting(),
                ratio: entry.intersection_ratio(),
            };
            animator.handle_entry(&mut target, observed);
        }
    });
    let observer = IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)?;
    on_intersect.forget();
    Ok(observer)
}

// ---- theme ----

/// Apply the effective theme and hook up the toggle control, if the page has one.
pub fn start_theme(
    window: &Window,
    document: &Document,
    config: &SiteConfig,
) -> std::result::Result<(), JsValue> {
    let Some(root) = document.document_element() else {
        return Ok(());
    };
    let storage = LocalStorage::from_window(window);
    let prefers_dark = media_matches(window, "(prefers-color-scheme: dark)");
    let controller = Rc::new(RefCell::new(ThemeController::start(root, storage, prefers_dark)));

    let Some(toggle) = document.get_element_by_id(&config.dom.theme_toggle) else {
        debug!("No theme toggle on the page");
        return Ok(());
    };
    let on_click = Closure::<dyn FnMut()>::new(move || {
        controller.borrow_mut().toggle();
    });
    toggle.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}
