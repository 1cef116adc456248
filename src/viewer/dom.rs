//! DOM-backed implementations of the core's platform seams.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, ScrollToOptions};

use crate::layout::RowLocator;
use crate::sync::{FrameScheduler, ScrollCommand, ScrollPane};
use crate::types::ScrollBehavior;

pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

/// Read a numeric property without the integer rounding of the typed getters.
pub(crate) fn read_f64(element: &Element, name: &str) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0)
}

fn write_f64(element: &Element, name: &str, value: f64) {
    let _ = Reflect::set(
        element.as_ref(),
        &JsValue::from_str(name),
        &JsValue::from_f64(value),
    );
}

/// A scroll container element.
pub(crate) struct DomPane {
    element: HtmlElement,
}

impl DomPane {
    pub(crate) fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

impl ScrollPane for DomPane {
    fn scroll_left(&self) -> f64 {
        read_f64(&self.element, "scrollLeft")
    }

    fn scroll_top(&self) -> f64 {
        read_f64(&self.element, "scrollTop")
    }

    fn set_scroll_left(&mut self, left: f64) {
        write_f64(&self.element, "scrollLeft", left);
    }

    fn set_scroll_top(&mut self, top: f64) {
        write_f64(&self.element, "scrollTop", top);
    }

    fn scroll_to(&mut self, command: ScrollCommand) {
        let options = ScrollToOptions::new();
        if let Some(left) = command.left {
            options.set_left(left);
        }
        if let Some(top) = command.top {
            options.set_top(top);
        }
        options.set_behavior(match command.behavior {
            ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.element.scroll_to_with_scroll_to_options(&options);
    }
}

/// Rows rendered in the scroll owner, found by `data-row-key`.
pub(crate) struct DomRowLocator {
    owner: HtmlElement,
}

impl DomRowLocator {
    pub(crate) fn new(owner: HtmlElement) -> Self {
        Self { owner }
    }

    fn rows(&self) -> Vec<HtmlElement> {
        let Ok(list) = self.owner.query_selector_all("[data-row-key]") else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    }
}

impl RowLocator for DomRowLocator {
    fn len(&self) -> usize {
        self.owner
            .query_selector_all("[data-row-key]")
            .map_or(0, |list| list.length() as usize)
    }

    fn key_at(&self, index: usize) -> Option<String> {
        self.rows()
            .get(index)
            .and_then(|row| row.get_attribute("data-row-key"))
    }

    fn row_top(&self, key: &str) -> Option<f64> {
        self.rows()
            .into_iter()
            .find(|row| row.get_attribute("data-row-key").as_deref() == Some(key))
            .map(|row| f64::from(row.offset_top()))
    }
}

/// Frame callback installed once the grid exists.
pub(crate) type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Schedules frames with `requestAnimationFrame`.
pub(crate) struct AnimationFrameScheduler {
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl AnimationFrameScheduler {
    pub(crate) fn new(callback: FrameCallback, pending: Rc<Cell<Option<i32>>>) -> Self {
        Self { callback, pending }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) {
        if self.pending.get().is_some() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let slot = self.callback.borrow();
        let Some(callback) = slot.as_ref() else {
            log::debug!("frame requested before the frame callback was installed");
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => self.pending.set(Some(id)),
            Err(_) => self.pending.set(None),
        }
    }

    fn cancel_frame(&mut self) {
        if let (Some(window), Some(id)) = (web_sys::window(), self.pending.take()) {
            let _ = window.cancel_animation_frame(id);
        }
    }

    fn now_ms(&self) -> f64 {
        now_ms()
    }
}
