#![forbid(unsafe_code)]

//! `Document` and `ViewportObserver` backed by the live browser DOM.

use std::cell::RefCell;
use std::rc::Rc;

use kinetype_core::{BoxSize, Document, ElementId, StyleProp, ViewportObserver};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, IntersectionObserver};

use crate::handles::HandleTable;

/// Element handles shared between the document and the viewport.
pub type SharedHandles = Rc<RefCell<HandleTable<Element>>>;

/// The page's `document`, addressed through interned handles.
pub struct WebDocument {
    document: web_sys::Document,
    handles: SharedHandles,
}

impl WebDocument {
    pub fn new(document: web_sys::Document, handles: SharedHandles) -> Self {
        Self { document, handles }
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        self.handles.borrow().get(id).cloned()
    }

    fn html_element(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn intern(&self, element: &Element) -> ElementId {
        self.handles.borrow_mut().intern(element)
    }
}

impl Document for WebDocument {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                warn!(selector, ?err, "selector rejected by host");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|idx| list.item(idx))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.intern(&el))
            .collect()
    }

    fn closest(&self, element: ElementId, selector: &str) -> Option<ElementId> {
        let found = self.element(element)?.closest(selector).ok()??;
        Some(self.intern(&found))
    }

    fn is_connected(&self, element: ElementId) -> bool {
        self.element(element).is_some_and(|el| el.is_connected())
    }

    fn inner_markup(&self, element: ElementId) -> Option<String> {
        self.element(element).map(|el| el.inner_html())
    }

    fn set_inner_markup(&mut self, element: ElementId, markup: &str) {
        if let Some(el) = self.element(element) {
            el.set_inner_html(markup);
        }
    }

    fn bounding_size(&self, element: ElementId) -> Option<BoxSize> {
        let rect = self.element(element)?.get_bounding_client_rect();
        Some(BoxSize::new(rect.width(), rect.height()))
    }

    fn style(&self, element: ElementId, prop: StyleProp) -> String {
        self.html_element(element)
            .and_then(|el| el.style().get_property_value(prop.css_name()).ok())
            .unwrap_or_default()
    }

    fn set_style(&mut self, element: ElementId, prop: StyleProp, value: &str) {
        let Some(el) = self.html_element(element) else {
            return;
        };
        let style = el.style();
        let result = if value.is_empty() {
            style.remove_property(prop.css_name()).map(drop)
        } else {
            style.set_property(prop.css_name(), value)
        };
        if let Err(err) = result {
            warn!(element = element.0, prop = prop.css_name(), ?err, "style write failed");
        }
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)?.get_attribute(name)
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let Some(el) = self.element(element) else {
            return;
        };
        if let Err(err) = el.set_attribute(name, value) {
            warn!(element = element.0, name, ?err, "attribute write failed");
        }
    }

    fn has_attribute(&self, element: ElementId, name: &str) -> bool {
        self.element(element).is_some_and(|el| el.has_attribute(name))
    }
}

/// Viewport reporting through one shared `IntersectionObserver`.
///
/// The observer's threshold is fixed at construction; per-element thresholds
/// passed to [`observe`](ViewportObserver::observe) are checked again by the
/// reveal strategy when reports arrive.
pub struct WebViewport {
    observer: Option<IntersectionObserver>,
    handles: SharedHandles,
}

impl WebViewport {
    pub fn new(handles: SharedHandles) -> Self {
        Self {
            observer: None,
            handles,
        }
    }

    pub fn connect(&mut self, observer: IntersectionObserver) {
        self.observer = Some(observer);
    }

    /// Stop all reporting.
    pub fn disconnect(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
    }
}

impl ViewportObserver for WebViewport {
    fn observe(&mut self, element: ElementId, _threshold: f64) {
        let Some(observer) = &self.observer else {
            warn!(element = element.0, "observe before viewport connected");
            return;
        };
        if let Some(el) = self.handles.borrow().get(element) {
            observer.observe(el);
        }
    }

    fn unobserve(&mut self, element: ElementId) {
        if let (Some(observer), Some(el)) = (&self.observer, self.handles.borrow().get(element)) {
            observer.unobserve(el);
        }
    }
}
