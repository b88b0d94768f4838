//! Navigation bar state, the mobile menu and smooth in-page links.

use crate::motion::engine::VIEWPORT;
use crate::motion::{Anchor, Boundary, Easing, Engine, Mode, Prop, TriggerSpec, TweenVars};
use crate::surface::Surface;

pub const NAV_ID: &str = "nav";
pub const TOGGLE_ID: &str = "nav-toggle";
pub const MENU_ID: &str = "mobile-menu";
pub const MENU_LINKS: &str = ".mobile-menu-links a";
pub const ANCHORS: &str = "a[href^=\"#\"]";

const ACTIVE: &str = "active";
const SCROLLED: &str = "scrolled";

/// Marks the nav bar `scrolled` once the page is scrolled past `offset`.
pub fn register<S: Surface>(engine: &mut Engine<S::Node>, surface: &S, offset: f64) {
    let Some(nav) = surface.by_id(NAV_ID) else {
        return;
    };
    let spec = TriggerSpec::new(None)
        .start(Boundary::edges(Anchor::Top, Anchor::Pixels(-offset)))
        .end(Boundary::Absolute(99999.0))
        .toggle_class(nav, SCROLLED);
    engine.watch(surface, spec);
}

pub fn toggle_menu<S: Surface>(surface: &S) {
    for id in [MENU_ID, TOGGLE_ID] {
        if let Some(node) = surface.by_id(id) {
            surface.toggle_class(&node, ACTIVE);
        }
    }
}

pub fn close_menu<S: Surface>(surface: &S) {
    for id in [MENU_ID, TOGGLE_ID] {
        if let Some(node) = surface.by_id(id) {
            surface.remove_class(&node, ACTIVE);
        }
    }
}

/// Smoothly scrolls so the element `href` points at sits `offset` pixels
/// below the top of the viewport. Returns `false` when there is no such
/// element.
pub fn scroll_to_anchor<S: Surface>(
    engine: &mut Engine<S::Node>,
    surface: &S,
    href: &str,
    offset: f64,
) -> bool {
    let Some(id) = href.strip_prefix('#').filter(|id| !id.is_empty()) else {
        return false;
    };
    let Some(target) = surface.by_id(id) else {
        return false;
    };
    let (_, viewport_height) = surface.viewport();
    let max_scroll = (surface.document_height() - viewport_height).max(0.0);
    let y = (surface.rect(&target).top + surface.scroll_y() - offset).clamp(0.0, max_scroll);
    engine.animate(
        VIEWPORT,
        TweenVars::new()
            .set(Prop::ScrollY, y)
            .duration(1.2)
            .ease(Easing::power(3, Mode::InOut)),
    );
    true
}
