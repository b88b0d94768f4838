//! Thin bar along the top edge that fills as the page is scrolled.

use crate::motion::{Anchor, Boundary, Easing, Engine, Position, Prop, Timeline, TriggerSpec, TweenVars};
use crate::surface::Surface;

/// Inline style of the bar element.
pub const BAR_STYLE: &str = "position: fixed; top: 0; left: 0; width: 100%; height: 3px; \
    background: linear-gradient(90deg, #00E5FF, #00FFB3); z-index: 10000; \
    transform-origin: left; transform: scaleX(0); pointer-events: none;";

pub fn register<S: Surface>(engine: &mut Engine<S::Node>, surface: &S, bar: &S::Node) {
    let target = engine.target(surface, bar);
    engine.set(target, Prop::ScaleX, 0.0);
    let timeline = Timeline::new().to(
        &[target],
        TweenVars::new().set(Prop::ScaleX, 1.0).ease(Easing::LINEAR),
        Position::END,
    );
    let spec = TriggerSpec::new(None)
        .start(Boundary::edges(Anchor::Top, Anchor::Top))
        .end(Boundary::edges(Anchor::Bottom, Anchor::Bottom))
        .scrub(0.3);
    engine.play_on_scroll(surface, timeline, spec);
}
