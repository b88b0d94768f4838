//! Wires the [`Controller`] to browser events. Dropping the [`Runtime`]
//! removes every listener and stops the frame loop.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, MouseEvent};

use crate::config::MotionConfig;
use crate::controller::{Controller, Overlay};
use crate::dom::{FrameLoop, Listener, WebSurface};
use crate::error::Result;

type Shared = Rc<RefCell<Controller<WebSurface>>>;

pub struct Runtime {
    _controller: Shared,
    _listeners: Vec<Listener>,
    _frames: FrameLoop,
    _entrance: Rc<RefCell<Option<Timeout>>>,
}

/// Listener that hands the event to the controller, skipping it if the
/// controller is already busy.
fn on<F>(target: &EventTarget, event: &'static str, controller: &Shared, mut handler: F) -> Result<Listener>
where
    F: FnMut(&mut Controller<WebSurface>, &Event) + 'static,
{
    let controller = Rc::clone(controller);
    Listener::new(target, event, move |e| match controller.try_borrow_mut() {
        Ok(mut controller) => handler(&mut controller, &e),
        Err(_) => debug!("Dropped {} event", event),
    })
}

fn client_position(event: &Event) -> Option<(f64, f64)> {
    event
        .dyn_ref::<MouseEvent>()
        .map(|e| (f64::from(e.client_x()), f64::from(e.client_y())))
}

/// Starts the hero entrance after the configured delay.
fn schedule_entrance(controller: &Shared, slot: &Rc<RefCell<Option<Timeout>>>, delay_ms: u32) {
    let controller = Rc::clone(controller);
    let timeout = Timeout::new(delay_ms, move || match controller.try_borrow_mut() {
        Ok(mut controller) => controller.loaded(),
        Err(_) => warn!("Controller busy, hero entrance skipped"),
    });
    *slot.borrow_mut() = Some(timeout);
}

impl Runtime {
    pub fn boot(config: MotionConfig, overlay: Overlay<Element>) -> Result<Self> {
        let surface = WebSurface::new()?;
        let window = surface.window().clone();
        let document = surface.document().clone();
        let already_loaded = surface.is_loaded();
        let delay_ms = config.loader_delay_ms;

        let controller: Shared = Rc::new(RefCell::new(Controller::new(surface, config, overlay)));
        let (bindings, cursor) = {
            let controller = controller.borrow();
            (controller.bindings(), controller.has_cursor())
        };
        let mut listeners = Vec::new();

        listeners.push(on(&document, "mousemove", &controller, |c, e| {
            if let Some((x, y)) = client_position(e) {
                c.pointer_moved(x, y);
            }
        })?);

        for node in &bindings.hover {
            listeners.push(on(node, "mouseenter", &controller, |c, _| c.hover(true))?);
            listeners.push(on(node, "mouseleave", &controller, |c, _| c.hover(false))?);
        }

        for node in &bindings.magnetic {
            let target = node.clone();
            listeners.push(on(node, "mousemove", &controller, move |c, e| {
                if let Some((x, y)) = client_position(e) {
                    c.magnetic_move(&target, x, y);
                }
            })?);
            let target = node.clone();
            listeners.push(on(node, "mouseleave", &controller, move |c, _| {
                c.magnetic_leave(&target)
            })?);
        }

        for node in &bindings.tilt {
            let target = node.clone();
            listeners.push(on(node, "mousemove", &controller, move |c, e| {
                if let Some((x, y)) = client_position(e) {
                    c.tilt_move(&target, x, y);
                }
            })?);
            let target = node.clone();
            listeners.push(on(node, "mouseleave", &controller, move |c, _| {
                c.tilt_leave(&target)
            })?);
        }

        if let Some(toggle) = &bindings.nav_toggle {
            listeners.push(on(toggle, "click", &controller, |c, _| c.toggle_menu())?);
        }
        for link in &bindings.menu_links {
            listeners.push(on(link, "click", &controller, |c, _| c.close_menu())?);
        }

        for anchor in &bindings.anchors {
            let link = anchor.clone();
            listeners.push(on(anchor, "click", &controller, move |c, e| {
                e.prevent_default();
                if let Some(href) = link.get_attribute("href") {
                    if !c.anchor_clicked(&href) {
                        debug!("No element for {}", href);
                    }
                }
            })?);
        }

        if let Some(form) = &bindings.form {
            listeners.push(on(form, "submit", &controller, |c, e| {
                e.prevent_default();
                c.submit_contact();
            })?);
        }

        listeners.push(on(&window, "resize", &controller, |c, _| {
            let now = c.surface().now();
            c.resized(now);
        })?);

        let entrance = Rc::new(RefCell::new(None));
        if already_loaded {
            schedule_entrance(&controller, &entrance, delay_ms);
        } else {
            let shared = Rc::clone(&controller);
            let slot = Rc::clone(&entrance);
            listeners.push(Listener::new(&window, "load", move |_| {
                match shared.try_borrow_mut() {
                    Ok(mut controller) => controller.page_loaded(),
                    Err(_) => warn!("Controller busy, scroll triggers not refreshed on load"),
                }
                schedule_entrance(&shared, &slot, delay_ms);
            })?);
        }

        let frames = {
            let controller = Rc::clone(&controller);
            FrameLoop::start(&window, move |now| {
                if let Ok(mut controller) = controller.try_borrow_mut() {
                    controller.frame(now);
                }
            })?
        };

        info!(
            "Motion layer ready with {} listeners, custom cursor: {}",
            listeners.len(),
            cursor
        );
        Ok(Self {
            _controller: controller,
            _listeners: listeners,
            _frames: frames,
            _entrance: entrance,
        })
    }
}
