//! Stat counters: pop in when first scrolled into view, then count up to
//! their `data-count`.

use log::warn;

use crate::motion::{
    Anchor, Boundary, Easing, Engine, Mode, Position, Prop, Signal, Timeline, TriggerSpec,
    TweenVars,
};
use crate::surface::Surface;

pub const STAT: &str = ".stat-number";
pub const COUNT_ATTRIBUTE: &str = "data-count";

/// Integer prefix of `raw` the way the browser's `parseInt` reads it:
/// leading whitespace, an optional sign, then digits up to the first
/// non-digit.
pub fn parse_count(raw: &str) -> Option<f64> {
    let raw = raw.trim_start();
    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'-') => (-1.0, &raw[1..]),
        Some(b'+') => (1.0, &raw[1..]),
        _ => (1.0, raw),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    rest[..digits].parse::<f64>().ok().map(|n| sign * n)
}

/// Registers every stat on the page; returns how many will count up.
pub fn register<S: Surface>(engine: &mut Engine<S::Node>, surface: &S) -> usize {
    let mut counting = 0;
    for stat in surface.query_all(STAT) {
        let target = engine.target(surface, &stat);
        let pop_in = Timeline::new().from_to(
            &[target],
            TweenVars::new().scale(0.5).opacity(0.0),
            TweenVars::new()
                .scale(1.0)
                .opacity(1.0)
                .duration(0.6)
                .ease(Easing::back_out(1.7)),
            Position::END,
        );
        let mut spec = TriggerSpec::new(Some(stat.clone()))
            .start(Boundary::edges(Anchor::Top, Anchor::Percent(85.0)))
            .once();

        let raw = surface.attribute(&stat, COUNT_ATTRIBUTE);
        match raw.as_deref().and_then(parse_count) {
            Some(to) => {
                spec = spec.on_enter(Signal::CountUp { target, to });
                counting += 1;
            }
            None => warn!("Stat without a numeric {}: {:?}", COUNT_ATTRIBUTE, raw),
        }
        engine.play_on_scroll(surface, pop_in, spec);
    }
    counting
}

/// Whole-number count from the current text to `to`.
pub fn count_up(to: f64) -> TweenVars {
    TweenVars::new()
        .set(Prop::Text, to)
        .duration(2.5)
        .snap(1.0)
        .ease(Easing::power(2, Mode::Out))
}
