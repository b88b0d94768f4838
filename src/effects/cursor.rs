//! Custom cursor: a dot that tracks the pointer and a ring that trails it.

use crate::motion::{Engine, Prop, TargetId, TweenVars};
use crate::surface::Surface;

/// Hovering any of these puts the ring in its `hover` state.
pub const HOVER_TARGETS: &str = "a, button, .pricing-card, .experience-card";

const HOVER_CLASS: &str = "hover";
const DOT_LAG: f64 = 0.1;

#[derive(Debug)]
pub struct Cursor<N> {
    ring_node: N,
    ring: TargetId,
    dot: TargetId,
    pointer: (f64, f64),
    ring_pos: (f64, f64),
    smoothing: f64,
}

impl<N: Clone + PartialEq> Cursor<N> {
    pub fn new<S: Surface<Node = N>>(
        engine: &mut Engine<N>,
        surface: &S,
        ring: N,
        dot: N,
        smoothing: f64,
    ) -> Self {
        Self {
            ring: engine.target(surface, &ring),
            dot: engine.target(surface, &dot),
            ring_node: ring,
            pointer: (0.0, 0.0),
            ring_pos: (0.0, 0.0),
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    #[cfg(test)]
    pub fn ring_position(&self) -> (f64, f64) {
        self.ring_pos
    }

    pub fn pointer_moved(&mut self, engine: &mut Engine<N>, x: f64, y: f64) {
        self.pointer = (x, y);
        engine.animate(self.dot, TweenVars::new().x(x).y(y).duration(DOT_LAG));
    }

    /// Moves the ring a fixed fraction of the way to the pointer. Called once
    /// per animation frame.
    pub fn step(&mut self, engine: &mut Engine<N>) {
        let (px, py) = self.pointer;
        let (rx, ry) = self.ring_pos;
        let mut next = (
            rx + (px - rx) * self.smoothing,
            ry + (py - ry) * self.smoothing,
        );
        // Land on the pointer instead of creeping toward it forever.
        if (px - next.0).abs() < 0.01 && (py - next.1).abs() < 0.01 {
            next = (px, py);
        }
        if next == self.ring_pos {
            return;
        }
        self.ring_pos = next;
        engine.set(self.ring, Prop::X, next.0);
        engine.set(self.ring, Prop::Y, next.1);
    }

    pub fn hover<S: Surface<Node = N>>(&self, surface: &S, active: bool) {
        if active {
            surface.add_class(&self.ring_node, HOVER_CLASS);
        } else {
            surface.remove_class(&self.ring_node, HOVER_CLASS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeNode, FakeSurface};

    fn setup() -> (FakeSurface, Engine<usize>, Cursor<usize>, usize, usize) {
        let mut page = FakeSurface::new();
        let ring = page.add(&[".cursor"], FakeNode::new());
        let dot = page.add(&[".cursor-dot"], FakeNode::new());
        let mut engine = Engine::new();
        let cursor = Cursor::new(&mut engine, &page, ring, dot, 0.15);
        (page, engine, cursor, ring, dot)
    }

    #[test]
    fn ring_eases_toward_pointer() {
        let (page, mut engine, mut cursor, ring, _) = setup();
        cursor.pointer_moved(&mut engine, 100.0, 200.0);
        cursor.step(&mut engine);
        let (x, y) = cursor.ring_position();
        assert!((x - 15.0).abs() < 1e-9 && (y - 30.0).abs() < 1e-9);
        engine.frame(&page, 0.0);
        assert_eq!(
            page.style(ring, "transform").as_deref(),
            Some("translate3d(15px, 30px, 0px)")
        );

        for _ in 0..200 {
            cursor.step(&mut engine);
        }
        let (x, y) = cursor.ring_position();
        assert!((x - 100.0).abs() < 0.01 && (y - 200.0).abs() < 0.01);
    }

    #[test]
    fn dot_catches_up_within_a_tenth_of_a_second() {
        let (page, mut engine, mut cursor, _, dot) = setup();
        engine.frame(&page, 0.0);
        cursor.pointer_moved(&mut engine, 40.0, 60.0);
        engine.frame(&page, 0.05);
        engine.frame(&page, 0.12);
        assert_eq!(
            page.style(dot, "transform").as_deref(),
            Some("translate3d(40px, 60px, 0px)")
        );
    }

    #[test]
    fn hover_toggles_ring_class() {
        let (page, _, cursor, ring, _) = setup();
        cursor.hover(&page, true);
        assert!(page.has_class(ring, "hover"));
        cursor.hover(&page, false);
        assert!(!page.has_class(ring, "hover"));
    }
}
