#![forbid(unsafe_code)]

//! Browser bindings: `window`/`history` platform, 2D canvas surface and the
//! JS-facing `CurtainPage`.

use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::time::Duration;

use curtain_core::capability::{DeviceSignals, EffectiveConnection};
use curtain_core::geometry::{Point, Viewport};
use curtain_core::platform::{ListenerId, Platform, ScrollPosition, ScrollRestoration};
use curtain_particles::{Mode, Rgba, Surface, Theme};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::config::ShellConfig;
use crate::shell::PageShell;

#[cfg(feature = "subscriber")]
pub use self::console::init_logging;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// [`Platform`] over the live browser window.
///
/// Scroll listeners pin the window to the top directly from the event
/// callback, so suppression works even between host repaints.
pub struct BrowserPlatform {
    window: Window,
    listeners: BTreeMap<ListenerId, Closure<dyn FnMut()>>,
    next_listener: u64,
}

impl BrowserPlatform {
    /// Bind to the global `window`, if there is one.
    pub fn new() -> Option<Self> {
        Some(Self {
            window: web_sys::window()?,
            listeners: BTreeMap::new(),
            next_listener: 0,
        })
    }

    /// The bound `window`.
    pub fn window(&self) -> &Window {
        &self.window
    }

    fn navigator_f64(&self, key: &str) -> Option<f64> {
        let nav = self.window.navigator();
        js_sys::Reflect::get(&nav, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_f64())
    }

    fn connection(&self) -> (EffectiveConnection, bool) {
        let nav = self.window.navigator();
        let Ok(conn) = js_sys::Reflect::get(&nav, &JsValue::from_str("connection")) else {
            return (EffectiveConnection::Unknown, false);
        };
        if conn.is_undefined() || conn.is_null() {
            return (EffectiveConnection::Unknown, false);
        }
        let effective = js_sys::Reflect::get(&conn, &JsValue::from_str("effectiveType"))
            .ok()
            .and_then(|v| v.as_string())
            .map_or(EffectiveConnection::Unknown, |s| EffectiveConnection::parse(&s));
        let save_data = js_sys::Reflect::get(&conn, &JsValue::from_str("saveData"))
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        (effective, save_data)
    }
}

impl Platform for BrowserPlatform {
    fn viewport(&self) -> Viewport {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(
            dim(self.window.inner_width()) as f32,
            dim(self.window.inner_height()) as f32,
        )
    }

    fn scroll_position(&self) -> ScrollPosition {
        ScrollPosition::new(
            self.window.scroll_x().unwrap_or(0.0) as f32,
            self.window.scroll_y().unwrap_or(0.0) as f32,
        )
    }

    fn set_scroll_position(&mut self, pos: ScrollPosition) {
        self.window
            .scroll_to_with_x_and_y(f64::from(pos.left), f64::from(pos.top));
    }

    fn set_scroll_restoration(&mut self, mode: ScrollRestoration) {
        let mode = match mode {
            ScrollRestoration::Auto => web_sys::ScrollRestoration::Auto,
            ScrollRestoration::Manual => web_sys::ScrollRestoration::Manual,
        };
        let applied = self
            .window
            .history()
            .and_then(|h| h.set_scroll_restoration(mode));
        if applied.is_err() {
            tracing::warn!("history scroll restoration unavailable");
        }
    }

    fn clear_location_hash(&mut self) {
        let location = self.window.location();
        let has_hash = location.hash().is_ok_and(|h| !h.is_empty());
        if !has_hash {
            return;
        }
        let Ok(path) = location.pathname() else {
            tracing::warn!("location pathname unavailable");
            return;
        };
        let replaced = self
            .window
            .history()
            .and_then(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(&path)));
        if replaced.is_err() {
            tracing::warn!("failed to strip location hash");
        }
    }

    fn add_scroll_listener(&mut self) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        let window = self.window.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        });
        if self
            .window
            .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::warn!(listener = id.0, "failed to attach scroll listener");
        }
        self.listeners.insert(id, closure);
        id
    }

    fn remove_scroll_listener(&mut self, id: ListenerId) {
        let Some(closure) = self.listeners.remove(&id) else {
            return;
        };
        if self
            .window
            .remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::warn!(listener = id.0, "failed to detach scroll listener");
        }
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|mq| mq.matches())
    }

    fn device_signals(&self) -> DeviceSignals {
        let (effective_connection, save_data) = self.connection();
        DeviceSignals {
            logical_processors: self
                .navigator_f64("hardwareConcurrency")
                .filter(|n| *n >= 1.0)
                .map(|n| n as u32),
            device_memory_gb: self.navigator_f64("deviceMemory").map(|gb| gb as f32),
            effective_connection,
            save_data,
            viewport_width: self.viewport().width,
            prefers_reduced_motion: self.prefers_reduced_motion(),
        }
    }
}

impl Drop for BrowserPlatform {
    fn drop(&mut self) {
        let ids: Vec<_> = self.listeners.keys().copied().collect();
        for id in ids {
            self.remove_scroll_listener(id);
        }
    }
}

/// [`Surface`] over a `<canvas>` 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire the 2D context. `None` when the browser refuses one.
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, viewport: Viewport) {
        self.canvas.set_width(viewport.width as u32);
        self.canvas.set_height(viewport.height as u32);
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        if self
            .ctx
            .arc(f64::from(center.x), f64::from(center.y), f64::from(radius), 0.0, TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(f64::from(width));
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(from.x), f64::from(from.y));
        self.ctx.line_to(f64::from(to.x), f64::from(to.y));
        self.ctx.stroke();
    }
}

fn timestamp(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}

/// JS-facing page controller.
///
/// Call `frame(timestamp)` from `requestAnimationFrame`; the first call starts
/// the boot.
#[wasm_bindgen]
pub struct CurtainPage {
    shell: PageShell<BrowserPlatform, CanvasSurface>,
    on_complete: Option<js_sys::Function>,
    started: bool,
}

#[wasm_bindgen]
impl CurtainPage {
    /// Create a page controller. `config` is an optional JSON document.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: Option<HtmlCanvasElement>, config: Option<String>) -> Result<CurtainPage, JsValue> {
        let config = ShellConfig::from_json(config.as_deref().unwrap_or(""))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let platform = BrowserPlatform::new().ok_or_else(|| JsValue::from_str("no window"))?;
        let surface = canvas.and_then(CanvasSurface::new);
        Ok(Self {
            shell: PageShell::new(&config, platform, surface),
            on_complete: None,
            started: false,
        })
    }

    /// Register a JS callback for boot completion. Replaces any earlier
    /// callback.
    ///
    /// The callback runs from a zero-delay task queued after the `frame`
    /// call that finished the boot, so it may call back into this page.
    #[wasm_bindgen(js_name = onBootComplete)]
    pub fn on_boot_complete(&mut self, callback: js_sys::Function) {
        self.on_complete = Some(callback);
    }

    /// Advance to the `requestAnimationFrame` timestamp (ms). Returns whether
    /// the overlay still needs painting.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        let now = timestamp(timestamp_ms);
        if !self.started {
            self.started = true;
            self.shell.init(now);
        }
        if self.shell.step(now).boot_completed {
            self.dispatch_boot_complete();
        }
        self.shell.overlay_visible()
    }

    /// Forward a window scroll event.
    pub fn scroll(&mut self) -> bool {
        self.shell.scroll_event()
    }

    /// Forward a window resize.
    pub fn resize(&mut self) {
        self.shell.resize();
    }

    /// Switch palette by name. Unknown names fall back to the defaults.
    #[wasm_bindgen(js_name = setPalette)]
    pub fn set_palette(&mut self, theme: &str, mode: &str) {
        let theme = theme.parse().unwrap_or_else(|err| {
            tracing::warn!(%err, "unknown theme");
            Theme::default()
        });
        let mode = mode.parse().unwrap_or_else(|err| {
            tracing::warn!(%err, "unknown mode");
            Mode::default()
        });
        self.shell.set_palette(theme, mode);
    }

    /// Re-evaluate particle gating, e.g. after a media-query change.
    pub fn reconfigure(&mut self) {
        self.shell.reconfigure();
    }

    pub fn phase(&self) -> String {
        self.shell.phase().to_string()
    }

    pub fn progress(&self) -> f32 {
        self.shell.boot().progress()
    }

    pub fn phrase(&self) -> Option<String> {
        self.shell.current_phrase().map(str::to_owned)
    }

    #[wasm_bindgen(js_name = phraseOpacity)]
    pub fn phrase_opacity(&self) -> f32 {
        self.shell.phrase_opacity()
    }

    #[wasm_bindgen(js_name = overlayOpacity)]
    pub fn overlay_opacity(&self) -> f32 {
        self.shell.overlay_opacity()
    }

    #[wasm_bindgen(js_name = contentOpacity)]
    pub fn content_opacity(&self) -> f32 {
        self.shell.content_opacity()
    }

    /// Explicit teardown for JS callers.
    pub fn destroy(&mut self) {
        self.shell.unmount();
    }
}

impl CurtainPage {
    fn dispatch_boot_complete(&mut self) {
        let Some(callback) = self.on_complete.take() else {
            return;
        };
        let queued = self
            .shell
            .platform()
            .window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&callback, 0);
        if queued.is_err() {
            tracing::warn!("failed to queue boot completion callback");
        }
    }
}

#[cfg(feature = "subscriber")]
mod console {
    use std::io;

    use curtain_core::logging::{self, LogConfig};
    use tracing_subscriber::fmt::MakeWriter;
    use wasm_bindgen::prelude::*;

    /// Install the global subscriber, writing each event to the browser
    /// console. `filter` defaults to the crate-wide directives.
    #[wasm_bindgen(js_name = initLogging)]
    pub fn init_logging(filter: Option<String>, json: bool) -> Result<(), JsValue> {
        let mut config = LogConfig::default();
        if let Some(filter) = filter {
            config = config.filter(filter);
        }
        if json {
            config = config.json();
        }
        logging::init_with_writer(&config, ConsoleWriter)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// One `console.log` call per formatted event.
    struct ConsoleWriter;

    impl<'a> MakeWriter<'a> for ConsoleWriter {
        type Writer = ConsoleLine;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleLine(Vec::new())
        }
    }

    struct ConsoleLine(Vec<u8>);

    impl io::Write for ConsoleLine {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleLine {
        fn drop(&mut self) {
            let line = String::from_utf8_lossy(&self.0);
            let line = line.trim_end();
            if !line.is_empty() {
                web_sys::console::log_1(&JsValue::from_str(line));
            }
        }
    }
}
