//! Hover effects: buttons pulled toward the pointer and cards tilting under it.

use crate::motion::{Easing, Engine, Mode, Prop, TargetId, TweenVars};
use crate::surface::Rect;

pub const MAGNETIC: &str = ".hero-cta, .nav-cta, .pricing-card-cta, .cta-submit";
pub const TILT: &str = ".pricing-card, .experience-card";

const POWER2_OUT: Easing = Easing::power(2, Mode::Out);

/// Shifts a button by `strength` times the pointer's offset from its centre.
pub fn magnetic_pull<N: Clone + PartialEq>(
    engine: &mut Engine<N>,
    target: TargetId,
    rect: Rect,
    pointer: (f64, f64),
    strength: f64,
) {
    let (dx, dy) = rect.offset_from_center(pointer.0, pointer.1);
    engine.animate(
        target,
        TweenVars::new()
            .x(dx * strength)
            .y(dy * strength)
            .duration(0.3)
            .ease(POWER2_OUT),
    );
}

/// Springs the button back to its resting place.
pub fn magnetic_release<N: Clone + PartialEq>(
    engine: &mut Engine<N>,
    target: TargetId,
) {
    engine.animate(
        target,
        TweenVars::new()
            .x(0.0)
            .y(0.0)
            .duration(0.5)
            .ease(Easing::elastic_out(1.0, 0.5)),
    );
}

/// Tilts a card away from the pointer: the nearer edge sinks.
pub fn tilt<N: Clone + PartialEq>(
    engine: &mut Engine<N>,
    target: TargetId,
    rect: Rect,
    pointer: (f64, f64),
    divisor: f64,
    perspective: f64,
) {
    let (dx, dy) = rect.offset_from_center(pointer.0, pointer.1);
    let divisor = if divisor == 0.0 { 1.0 } else { divisor };
    engine.set(target, Prop::Perspective, perspective);
    engine.animate(
        target,
        TweenVars::new()
            .rotate_x(dy / divisor)
            .set(Prop::RotateY, -dx / divisor)
            .duration(0.3)
            .ease(POWER2_OUT),
    );
}

pub fn tilt_release<N: Clone + PartialEq>(engine: &mut Engine<N>, target: TargetId) {
    engine.animate(
        target,
        TweenVars::new()
            .rotate_x(0.0)
            .set(Prop::RotateY, 0.0)
            .duration(0.5)
            .ease(POWER2_OUT),
    );
}
