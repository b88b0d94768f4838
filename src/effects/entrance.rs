use log::debug;

use crate::motion::{Easing, Engine, Mode, Position, Stagger, Timeline, TweenVars};
use crate::surface::Surface;

pub const LOADER: &str = ".loader";
pub const HERO_IMAGE: &str = ".hero-image";

/// Hides the preloader and plays the hero entrance.
pub fn start<S: Surface>(engine: &mut Engine<S::Node>, surface: &S) {
    for loader in surface.query_all(LOADER) {
        surface.add_class(&loader, "hidden");
    }

    let image = engine.select(surface, HERO_IMAGE);
    if !image.is_empty() {
        engine.play(Timeline::new().to(
            &image,
            TweenVars::new()
                .scale(1.0)
                .duration(2.0)
                .ease(Easing::power(2, Mode::Out)),
            Position::END,
        ));
    }

    let timeline = hero_timeline(engine, surface);
    debug!("Hero entrance runs for {:.2}s", timeline.duration());
    engine.play(timeline);
}

pub fn hero_timeline<S: Surface>(engine: &mut Engine<S::Node>, surface: &S) -> Timeline {
    let reveal = TweenVars::new().opacity(1.0).y(0.0);
    let tag = engine.select(surface, ".hero-tag");
    let lines = engine.select(surface, ".hero-title-line");
    let subtitle = engine.select(surface, ".hero-subtitle");
    let ctas = engine.select(surface, ".hero-cta-wrapper");
    let scroll_hint = engine.select(surface, ".hero-scroll");

    Timeline::defaults(1.2, Easing::power(4, Mode::Out))
        .to(&tag, reveal.clone().duration(0.8), Position::At(0.3))
        .to(
            &lines,
            reveal.clone().duration(1.4).stagger(Stagger::each(0.1)),
            Position::At(0.5),
        )
        .to(&subtitle, reveal.clone().duration(1.0), Position::At(1.0))
        .to(&ctas, reveal.duration(1.0), Position::At(1.2))
        .to(
            &scroll_hint,
            TweenVars::new().opacity(1.0).duration(0.8),
            Position::At(1.5),
        )
}
