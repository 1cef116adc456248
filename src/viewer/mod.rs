//! WebAssembly binding that drives a rendered grid's DOM panes.
//!
//! `GridScroller` finds the panes under a root element by class name
//! (`{prefix}-content`, `-header`, `-body`, `-summary`) and wires them up:
//! - `scroll` listeners forwarding native offsets
//! - non-passive `wheel` listeners on overflow-hidden panes
//! - a `ResizeObserver` on the scroll owner and its table
//! - `requestAnimationFrame` frames for propagation
//!
//! Everything is released on `destroy()` or when the object is freed.

mod dom;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, HtmlElement, ResizeObserver, WheelEvent};

use self::dom::{read_f64, AnimationFrameScheduler, DomPane, DomRowLocator, FrameCallback};
use crate::engine::GridScroll;
use crate::error::GridError;
use crate::sync::{ScrollEvent, ScrollHandle, WheelDeltaMode, WheelInput};
use crate::types::{ColumnDescriptor, GridConfig, PaneId, ScrollRequest, StyleDecl, WheelPolicy};

/// Class prefix used when none is given.
const DEFAULT_PREFIX: &str = "rc-table";

struct ConsoleLogger;

static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&message),
            log::Level::Warn => web_sys::console::warn_1(&message),
            _ => web_sys::console::log_1(&message),
        }
    }

    fn flush(&self) {}
}

fn install_logger() {
    if log::set_logger(&CONSOLE_LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Warn);
    }
}

fn apply_decl(element: &HtmlElement, decl: &StyleDecl) {
    let style = element.style();
    for (name, value) in decl.css_properties() {
        let _ = style.set_property(name, &value);
    }
}

fn pane_class(id: PaneId) -> &'static str {
    match id {
        PaneId::Content => "content",
        PaneId::Header => "header",
        PaneId::Body => "body",
        PaneId::Footer => "summary",
    }
}

struct ViewerShared {
    grid: GridScroll,
    root: HtmlElement,
    prefix: String,
    on_scroll: RefCell<Option<Function>>,
}

impl ViewerShared {
    fn pane_element(&self, id: PaneId) -> Option<HtmlElement> {
        self.root
            .query_selector(&format!(".{}-{}", self.prefix, pane_class(id)))
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }

    fn run_frame(&self) {
        let event = self.grid.run_frame();
        self.apply_ping();
        if let Some(event) = event {
            self.emit(&event);
        }
    }

    /// Call the JS `onScroll` callback. The grid is not borrowed here, so the
    /// callback may call back into the scroller.
    fn emit(&self, event: &ScrollEvent) {
        let callback = self.on_scroll.borrow().clone();
        let Some(callback) = callback else {
            return;
        };
        match serde_wasm_bindgen::to_value(event) {
            Ok(value) => {
                let _ = callback.call1(&JsValue::NULL, &value);
            }
            Err(e) => log::warn!("failed to serialize scroll event: {e}"),
        }
    }

    fn apply_ping(&self) {
        let ping = self.grid.ping();
        let classes = self.root.class_list();
        let _ = classes.toggle_with_force(&format!("{}-ping-left", self.prefix), ping.left);
        let _ = classes.toggle_with_force(&format!("{}-ping-right", self.prefix), ping.right);
    }

    fn apply_styles(&self) {
        let styles = self.grid.styles();
        for id in [PaneId::Content, PaneId::Header, PaneId::Body] {
            let Some(element) = self.pane_element(id) else {
                continue;
            };
            apply_decl(&element, styles.for_pane(id));
            if let Ok(Some(table)) = element.query_selector("table") {
                if let Ok(table) = table.dyn_into::<HtmlElement>() {
                    apply_decl(&table, &styles.table);
                }
            }
        }
    }

    fn observe_sizes(&self) {
        let Some(owner) = self.pane_element(self.grid.scroll_owner()) else {
            return;
        };
        self.grid.observe_viewport(
            read_f64(&owner, "clientWidth"),
            read_f64(&owner, "clientHeight"),
        );
        self.grid.observe_content(
            read_f64(&owner, "scrollWidth"),
            read_f64(&owner, "scrollHeight"),
        );
        self.grid.observe_scrollbar(
            read_f64(&owner, "offsetWidth"),
            read_f64(&owner, "clientWidth"),
        );
    }
}

struct DomListener {
    target: HtmlElement,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl DomListener {
    fn remove(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Scroll synchronization for one rendered grid, exported to JavaScript.
#[wasm_bindgen]
pub struct GridScroller {
    shared: Rc<ViewerShared>,
    handle: ScrollHandle,
    frame_callback: FrameCallback,
    attached: Vec<PaneId>,
    listeners: Vec<DomListener>,
    resize_observer: Option<ResizeObserver>,
    #[allow(dead_code)] // Kept alive for the observer
    resize_closure: Option<Closure<dyn FnMut(js_sys::Array)>>,
}

#[wasm_bindgen]
impl GridScroller {
    /// Mount on a rendered grid.
    ///
    /// `config` is `{ columns, scroll, emptyText? }`.
    ///
    /// # Errors
    /// Returns an error if the configuration is malformed or invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(
        root: HtmlElement,
        config: JsValue,
        prefix: Option<String>,
    ) -> Result<GridScroller, JsValue> {
        console_error_panic_hook::set_once();
        install_logger();

        let config: GridConfig = serde_wasm_bindgen::from_value(config).map_err(GridError::from)?;
        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));
        let scheduler =
            AnimationFrameScheduler::new(Rc::clone(&frame_callback), Rc::clone(&pending));
        let (grid, handle) = GridScroll::mount(config, Box::new(scheduler))?;

        let shared = Rc::new(ViewerShared {
            grid,
            root,
            prefix: prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            on_scroll: RefCell::new(None),
        });

        // Install the frame callback before any pane can request a frame
        let weak = Rc::downgrade(&shared);
        let closure = Closure::wrap(Box::new(move |_timestamp: f64| {
            pending.set(None);
            if let Some(shared) = weak.upgrade() {
                shared.run_frame();
            }
        }) as Box<dyn FnMut(f64)>);
        *frame_callback.borrow_mut() = Some(closure);

        let mut scroller = GridScroller {
            shared,
            handle,
            frame_callback,
            attached: Vec::new(),
            listeners: Vec::new(),
            resize_observer: None,
            resize_closure: None,
        };
        scroller.attach_panes();
        scroller.observe_resize();
        scroller.shared.apply_styles();
        Ok(scroller)
    }

    /// Register panes rendered since the last call (e.g. a late summary row).
    #[wasm_bindgen(js_name = attachPanes)]
    pub fn attach_panes(&mut self) {
        let arrangement = self.shared.grid.arrangement();
        for (id, role) in arrangement.panes() {
            if self.attached.contains(&id) {
                continue;
            }
            let Some(element) = self.shared.pane_element(id) else {
                continue;
            };

            self.listen(&element, "scroll", false, {
                let weak = Rc::downgrade(&self.shared);
                let target = element.clone();
                move |_event: Event| {
                    if let Some(shared) = weak.upgrade() {
                        shared.grid.on_pane_scroll(
                            id,
                            read_f64(&target, "scrollLeft"),
                            read_f64(&target, "scrollTop"),
                        );
                    }
                }
            });

            if role.wheel != WheelPolicy::Native {
                self.listen(&element, "wheel", true, {
                    let weak = Rc::downgrade(&self.shared);
                    move |event: Event| {
                        let Some(shared) = weak.upgrade() else {
                            return;
                        };
                        let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                            return;
                        };
                        let input = WheelInput {
                            delta_x: wheel.delta_x(),
                            delta_y: wheel.delta_y(),
                            mode: WheelDeltaMode::from_dom(wheel.delta_mode()),
                        };
                        if shared.grid.on_wheel(id, input).is_consumed() {
                            wheel.prevent_default();
                        }
                    }
                });
            }

            if id == arrangement.scroll_owner() {
                self.shared.grid.set_rows(DomRowLocator::new(element.clone()));
            }
            self.shared
                .grid
                .register_pane_with_role(id, DomPane::new(element), role);
            self.attached.push(id);
        }
    }

    fn listen(
        &mut self,
        target: &HtmlElement,
        kind: &'static str,
        active: bool,
        handler: impl FnMut(Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let result = if active {
            // preventDefault must work, so the listener cannot be passive
            let options = AddEventListenerOptions::new();
            options.set_passive(false);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )
        } else {
            target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        };
        if result.is_err() {
            log::warn!("failed to add {kind} listener");
            return;
        }
        self.listeners.push(DomListener {
            target: target.clone(),
            kind,
            closure,
        });
    }

    fn observe_resize(&mut self) {
        let Some(owner) = self.shared.pane_element(self.shared.grid.scroll_owner()) else {
            log::warn!("scroll owner not found under the grid root");
            return;
        };
        let weak = Rc::downgrade(&self.shared);
        let closure = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            if let Some(shared) = weak.upgrade() {
                shared.observe_sizes();
            }
        }) as Box<dyn FnMut(js_sys::Array)>);
        let Ok(observer) = ResizeObserver::new(closure.as_ref().unchecked_ref()) else {
            log::warn!("ResizeObserver unavailable, falling back to one measurement");
            self.shared.observe_sizes();
            return;
        };
        observer.observe(&owner);
        if let Ok(Some(table)) = owner.query_selector("table") {
            observer.observe(&table);
        }
        self.resize_observer = Some(observer);
        self.resize_closure = Some(closure);
        self.shared.observe_sizes();
    }

    /// `scrollTo({ top?, left?, key?, index?, offset?, behavior? })`.
    ///
    /// # Errors
    /// Returns an error if the request cannot be deserialized.
    #[wasm_bindgen(js_name = scrollTo)]
    pub fn scroll_to(&self, request: JsValue) -> Result<JsValue, JsValue> {
        let request: ScrollRequest =
            serde_wasm_bindgen::from_value(request).map_err(GridError::from)?;
        let resolution = self.handle.scroll_to(&request);
        Ok(serde_wasm_bindgen::to_value(&resolution).map_err(GridError::from)?)
    }

    /// Set (or clear) the `onScroll` callback.
    #[wasm_bindgen(js_name = setOnScroll)]
    pub fn set_on_scroll(&self, callback: Option<Function>) {
        *self.shared.on_scroll.borrow_mut() = callback;
    }

    /// # Errors
    /// Returns an error if the columns are malformed or invalid.
    #[wasm_bindgen(js_name = setColumns)]
    pub fn set_columns(&self, columns: JsValue) -> Result<(), JsValue> {
        let columns: Vec<ColumnDescriptor> =
            serde_wasm_bindgen::from_value(columns).map_err(GridError::from)?;
        self.shared.grid.set_columns(columns)?;
        self.shared.apply_styles();
        Ok(())
    }

    #[wasm_bindgen(js_name = reportColumnWidth)]
    pub fn report_column_width(&self, key: &str, width: f64) -> bool {
        self.shared.grid.report_column_width(key, width)
    }

    /// Re-apply the pane and table styles (after the grid re-rendered).
    #[wasm_bindgen(js_name = applyStyles)]
    pub fn apply_styles(&self) {
        self.shared.apply_styles();
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn layout(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.shared.grid.layout()).map_err(GridError::from)?)
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn styles(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.shared.grid.styles()).map_err(GridError::from)?)
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn body(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.shared.grid.body()).map_err(GridError::from)?)
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn position(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.shared.grid.position()).map_err(GridError::from)?)
    }

    #[wasm_bindgen(js_name = headerGutter)]
    pub fn header_gutter(&self) -> f64 {
        self.shared.grid.header_gutter()
    }

    /// Release every listener and stop propagation.
    pub fn destroy(&mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.shared.grid.is_torn_down() {
            return;
        }
        self.shared.grid.teardown();
        for listener in self.listeners.drain(..) {
            listener.remove();
        }
        if let Some(observer) = self.resize_observer.take() {
            observer.disconnect();
        }
        self.resize_closure = None;
        self.frame_callback.borrow_mut().take();
        self.shared.on_scroll.borrow_mut().take();
        self.attached.clear();
    }
}

impl Drop for GridScroller {
    fn drop(&mut self) {
        self.release();
    }
}
