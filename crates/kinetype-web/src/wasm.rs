#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::{Array, Function};
use kinetype_core::event::{frame_timestamp, millis};
use kinetype_core::{ElementId, HostEvent, IntersectionEntry};
use kinetype_fx::{PageEffects, ScrambleHandle};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window};

use crate::error::{WebHostError, parse_options};
use crate::handles::HandleTable;
use crate::web_dom::{SharedHandles, WebDocument, WebViewport};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

impl From<WebHostError> for JsValue {
    fn from(err: WebHostError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

struct Host {
    page: PageEffects,
    doc: WebDocument,
    viewport: WebViewport,
}

struct Listener {
    target: Element,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Everything the JS callbacks reach through a `Weak`.
struct State {
    window: Window,
    handles: SharedHandles,
    host: RefCell<Host>,
    frame_id: Cell<Option<i32>>,
    frame_cb: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    observer_cb: RefCell<Option<Closure<dyn FnMut(Array, IntersectionObserver)>>>,
    listeners: RefCell<Vec<Listener>>,
    /// JS completion callbacks, run once the host borrow is released.
    completions: Rc<RefCell<Vec<Function>>>,
    issued: RefCell<Vec<ScrambleHandle>>,
}

impl State {
    fn dispatch(self: &Rc<Self>, event: HostEvent) {
        {
            let mut host = self.host.borrow_mut();
            let Host {
                page,
                doc,
                viewport,
            } = &mut *host;
            page.handle_event(doc, viewport, &event);
        }
        self.after_update();
    }

    fn after_update(self: &Rc<Self>) {
        let pending = std::mem::take(&mut *self.completions.borrow_mut());
        for callback in pending {
            if let Err(err) = callback.call0(&JsValue::NULL) {
                warn!(?err, "scramble completion callback threw");
            }
        }
        self.issued.borrow_mut().retain(|h| {
            self.host.borrow().page.scrambler().is_active(*h)
        });
        self.schedule_frame();
    }

    fn schedule_frame(&self) {
        if self.frame_id.get().is_some() || !self.host.borrow().page.wants_frame() {
            return;
        }
        let frame_cb = self.frame_cb.borrow();
        let Some(callback) = frame_cb.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => self.frame_id.set(Some(id)),
            Err(err) => warn!(?err, "requestAnimationFrame failed"),
        }
    }
}

/// Scramble-text effects for the current page.
///
/// ```js
/// const page = new KinetypePage(JSON.stringify({ hover_duration_ms: 300 }));
/// page.init();
/// page.scramble(document.querySelector("#status"), "Connected", 600);
/// ```
#[wasm_bindgen]
pub struct KinetypePage {
    state: Rc<State>,
}

#[wasm_bindgen]
impl KinetypePage {
    /// Build the page context from optional JSON options.
    ///
    /// The user's reduced-motion preference is honored, and without a fixed
    /// `seed` one is drawn from `Math.random`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<String>) -> Result<KinetypePage, JsValue> {
        let window = web_sys::window().ok_or(WebHostError::NoWindow)?;
        let document = window.document().ok_or(WebHostError::NoDocument)?;

        let mut config = parse_options(options.as_deref())?;
        if let Ok(Some(query)) = window.match_media(REDUCED_MOTION_QUERY) {
            config.reduced_motion |= query.matches();
        }
        if config.seed.is_none() {
            config.seed = Some((js_sys::Math::random() * 9_007_199_254_740_992.0) as u64);
        }
        let threshold = config.reveal_threshold;
        let page = PageEffects::new(config).map_err(WebHostError::from)?;

        let handles: SharedHandles = Rc::new(RefCell::new(HandleTable::new()));
        let state = Rc::new(State {
            window,
            handles: Rc::clone(&handles),
            host: RefCell::new(Host {
                page,
                doc: WebDocument::new(document, Rc::clone(&handles)),
                viewport: WebViewport::new(handles),
            }),
            frame_id: Cell::new(None),
            frame_cb: RefCell::new(None),
            observer_cb: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            completions: Rc::new(RefCell::new(Vec::new())),
            issued: RefCell::new(Vec::new()),
        });

        let weak = Rc::downgrade(&state);
        *state.frame_cb.borrow_mut() = Some(Closure::new(move |ts: f64| {
            if let Some(state) = weak.upgrade() {
                state.frame_id.set(None);
                state.dispatch(HostEvent::Frame(frame_timestamp(ts)));
            }
        }));

        let observer_cb = observer_callback(Rc::downgrade(&state));
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(observer_cb.as_ref().unchecked_ref(), &init)
                .map_err(|err| WebHostError::Js(format!("{err:?}")))?;
        state.host.borrow_mut().viewport.connect(observer);
        *state.observer_cb.borrow_mut() = Some(observer_cb);

        Ok(Self { state })
    }

    /// Tag, bind and arm the page, then mark it ready.
    pub fn init(&mut self) -> Result<(), JsValue> {
        let listeners = {
            let mut host = self.state.host.borrow_mut();
            let Host {
                page,
                doc,
                viewport,
            } = &mut *host;
            page.init(doc, viewport);
            page.hover_listeners()
        };

        for id in listeners {
            let Some(target) = self.state.handles.borrow().get(id).cloned() else {
                continue;
            };
            for (kind, make) in [
                ("mouseenter", HostEvent::PointerEnter as fn(ElementId) -> HostEvent),
                ("mouseleave", HostEvent::PointerLeave as fn(ElementId) -> HostEvent),
            ] {
                let weak = Rc::downgrade(&self.state);
                let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                    if let Some(state) = weak.upgrade() {
                        state.dispatch(make(id));
                    }
                });
                target
                    .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
                    .map_err(|err| WebHostError::Js(format!("{err:?}")))?;
                self.state.listeners.borrow_mut().push(Listener {
                    target: target.clone(),
                    kind,
                    callback,
                });
            }
        }
        self.state.after_update();
        Ok(())
    }

    /// Scramble `element` towards `text`. Returns a handle for [`cancel`](Self::cancel).
    pub fn scramble(
        &mut self,
        element: Element,
        text: String,
        duration_ms: Option<f64>,
        on_complete: Option<Function>,
    ) -> f64 {
        let id = self.state.handles.borrow_mut().intern(&element);
        let handle = {
            let mut host = self.state.host.borrow_mut();
            let mut options = host.page.options();
            if let Some(ms) = duration_ms.filter(|ms| ms.is_finite()) {
                options = options.duration(millis(ms));
            }
            if let Some(callback) = on_complete {
                let queue = Rc::clone(&self.state.completions);
                options = options.on_complete(move |_| queue.borrow_mut().push(callback));
            }
            let Host { page, doc, .. } = &mut *host;
            page.scramble(doc, id, &text, options)
        };
        self.state.issued.borrow_mut().push(handle);
        self.state.schedule_frame();
        handle.id() as f64
    }

    /// Cancel a running scramble. Returns false if it already finished.
    pub fn cancel(&mut self, handle: f64) -> bool {
        let found = self
            .state
            .issued
            .borrow()
            .iter()
            .copied()
            .find(|h| h.id() as f64 == handle);
        let Some(handle) = found else {
            return false;
        };
        let canceled = {
            let mut host = self.state.host.borrow_mut();
            let Host { page, doc, .. } = &mut *host;
            page.cancel(doc, handle)
        };
        self.state.after_update();
        canceled
    }

    #[wasm_bindgen(js_name = wantsFrame)]
    pub fn wants_frame(&self) -> bool {
        self.state.host.borrow().page.wants_frame()
    }

    /// Detach listeners and observers. The page keeps its current content.
    pub fn destroy(&mut self) {
        if let Some(id) = self.state.frame_id.take() {
            let _ = self.state.window.cancel_animation_frame(id);
        }
        self.state.host.borrow_mut().viewport.disconnect();
        for listener in self.state.listeners.borrow_mut().drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        self.state.frame_cb.borrow_mut().take();
        self.state.observer_cb.borrow_mut().take();
    }
}

fn observer_callback(weak: Weak<State>) -> Closure<dyn FnMut(Array, IntersectionObserver)> {
    Closure::new(move |entries: Array, _observer: IntersectionObserver| {
        let Some(state) = weak.upgrade() else {
            return;
        };
        for value in entries.iter() {
            let Ok(entry) = value.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let target = state.handles.borrow_mut().intern(&entry.target());
            state.dispatch(HostEvent::Intersection(IntersectionEntry {
                target,
                ratio: entry.intersection_ratio(),
                is_intersecting: entry.is_intersecting(),
            }));
        }
    })
}
