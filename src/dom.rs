//! The live page: [`Surface`] over `web-sys`, plus event listeners and an
//! animation-frame loop that clean up after themselves.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, error, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, NodeList, Window,
};

use crate::error::{MotionError, Result};
use crate::surface::{Rect, Surface};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

pub struct WebSurface {
    window: Window,
    document: Document,
}

impl WebSurface {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(MotionError::NoWindow)?;
        let document = window.document().ok_or(MotionError::NoDocument)?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The window `load` event has already fired.
    pub fn is_loaded(&self) -> bool {
        self.document.ready_state() == "complete"
    }

    /// Seconds on the same clock as `requestAnimationFrame` timestamps.
    pub fn now(&self) -> f64 {
        self.window
            .performance()
            .map_or(0.0, |performance| performance.now() / 1000.0)
    }

    fn computed(&self, node: &Element, property: &str) -> Option<String> {
        self.window
            .get_computed_style(node)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value(property).ok())
    }
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl Surface for WebSurface {
    type Node = Element;

    fn query_all(&self, selector: &str) -> Vec<Element> {
        match self.document.query_selector_all(selector) {
            Ok(list) => elements(list),
            Err(e) => {
                warn!("Bad selector {}: {:?}", selector, e);
                Vec::new()
            }
        }
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Vec<Element> {
        match scope.query_selector_all(selector) {
            Ok(list) => elements(list),
            Err(e) => {
                warn!("Bad selector {}: {:?}", selector, e);
                Vec::new()
            }
        }
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn viewport(&self) -> (f64, f64) {
        let size = |value: std::result::Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        (size(self.window.inner_width()), size(self.window.inner_height()))
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn document_height(&self) -> f64 {
        self.document
            .document_element()
            .map_or(0.0, |root| f64::from(root.scroll_height()))
    }

    fn scroll_to(&self, y: f64) {
        let x = self.window.scroll_x().unwrap_or(0.0);
        self.window.scroll_to_with_x_and_y(x, y);
    }

    fn computed_opacity(&self, node: &Element) -> f64 {
        self.computed(node, "opacity")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(1.0)
    }

    fn computed_transform(&self, node: &Element) -> String {
        self.computed(node, "transform")
            .unwrap_or_else(|| "none".to_string())
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        let Some(element) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(e) = element.style().set_property(property, value) {
            debug!("Cannot set {} to {}: {:?}", property, value, e);
        }
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn toggle_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().toggle(class);
    }

    fn field_value(&self, id: &str) -> Option<String> {
        let element = self.by_id(id)?;
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            Some(input.value())
        } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            Some(select.value())
        } else {
            element
                .dyn_ref::<HtmlTextAreaElement>()
                .map(HtmlTextAreaElement::value)
        }
    }

    fn open_url(&self, url: &str) {
        if let Err(e) = self.window.open_with_url_and_target(url, "_blank") {
            error!("Failed to open {}: {:?}", url, e);
        }
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .map_or(false, |query| query.matches())
    }
}

/// An event listener that is removed again when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self { target: target.clone(), event, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Calls back once per animation frame, with the frame time in seconds,
/// until dropped.
pub struct FrameLoop {
    window: Window,
    pending: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl FrameLoop {
    pub fn start<F>(window: &Window, mut on_frame: F) -> Result<Self>
    where
        F: FnMut(f64) + 'static,
    {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let next = Rc::clone(&callback);
        let next_pending = Rc::clone(&pending);
        let loop_window = window.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            next_pending.set(None);
            on_frame(timestamp / 1000.0);
            let Ok(next) = next.try_borrow() else {
                return;
            };
            if let Some(next) = next.as_ref() {
                match loop_window.request_animation_frame(next.as_ref().unchecked_ref()) {
                    Ok(id) => next_pending.set(Some(id)),
                    Err(e) => error!("Animation frame request failed: {:?}", e),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let first = match callback.borrow().as_ref() {
            Some(first) => window.request_animation_frame(first.as_ref().unchecked_ref())?,
            None => return Err(MotionError::Js("frame callback missing".to_string())),
        };
        pending.set(Some(first));

        Ok(Self { window: window.clone(), pending, callback })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to itself.
        if let Ok(mut callback) = self.callback.try_borrow_mut() {
            callback.take();
        }
    }
}
