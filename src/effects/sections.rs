//! Scroll-driven reveals and parallax for the page sections.

use log::debug;

use crate::motion::{
    Anchor, Boundary, Easing, Engine, Mode, Position, Prop, Stagger, TargetId, Timeline,
    ToggleActions, TriggerSpec, TweenVars,
};
use crate::surface::Surface;

const POWER2_OUT: Easing = Easing::power(2, Mode::Out);
const POWER3_OUT: Easing = Easing::power(3, Mode::Out);
const POWER4_OUT: Easing = Easing::power(4, Mode::Out);

const fn at(element: Anchor, viewport: Anchor) -> Boundary {
    Boundary::edges(element, viewport)
}

const TOP_80: Boundary = at(Anchor::Top, Anchor::Percent(80.0));
const TOP_TOP: Boundary = at(Anchor::Top, Anchor::Top);
const TOP_BOTTOM: Boundary = at(Anchor::Top, Anchor::Bottom);
const BOTTOM_TOP: Boundary = at(Anchor::Bottom, Anchor::Top);

pub fn register<S: Surface>(engine: &mut Engine<S::Node>, surface: &S) {
    hero(engine, surface);
    intro(
        engine,
        surface,
        ".experience-intro",
        at(Anchor::Bottom, Anchor::Percent(60.0)),
    );
    experience(engine, surface);
    intro(engine, surface, ".pricing-header", BOTTOM_TOP);
    pricing(engine, surface);
    cta(engine, surface);
    footer(engine, surface);
    debug!("Section triggers: {}", engine.trigger_ranges().len());
}

fn first<S: Surface>(surface: &S, selector: &str) -> Option<S::Node> {
    surface.query_all(selector).into_iter().next()
}

/// Registers `timeline` under `spec` unless it has nothing to animate.
fn on_scroll<S: Surface>(
    engine: &mut Engine<S::Node>,
    surface: &S,
    timeline: Timeline,
    spec: TriggerSpec<S::Node>,
) {
    if !timeline.is_empty() {
        engine.play_on_scroll(surface, timeline, spec);
    }
}

/// Linear tween whose playhead follows scroll progress.
fn scrubbed<S: Surface>(
    engine: &mut Engine<S::Node>,
    surface: &S,
    targets: &[TargetId],
    vars: TweenVars,
    spec: TriggerSpec<S::Node>,
) {
    let timeline = Timeline::new().to(targets, vars.ease(Easing::LINEAR), Position::END);
    on_scroll(engine, surface, timeline, spec);
}

fn hero<S: Surface>(engine: &mut Engine<S::Node>, surface: &S) {
    let Some(hero) = first(surface, ".hero") else {
        return;
    };
    let image = engine.select(surface, ".hero-image");
    scrubbed(
        engine,
        surface,
        &image,
        TweenVars::new().set(Prop::YPercent, 40.0),
        TriggerSpec::new(Some(hero.clone())).start(TOP_TOP).end(BOTTOM_TOP).scrub(1.0),
    );

    let content = engine.select(surface, ".hero-content");
    scrubbed(
        engine,
        surface,
        &content,
        TweenVars::new().opacity(0.0).y(-100.0),
        TriggerSpec::new(Some(hero))
            .start(at(Anchor::Center, Anchor::Center))
            .end(BOTTOM_TOP)
            .scrub(1.0),
    );
}

/// Tag, title lines and description of a section header.
fn intro<S: Surface>(engine: &mut Engine<S::Node>, surface: &S, scope: &str, end: Boundary) {
    let Some(section) = first(surface, scope) else {
        return;
    };
    let tag = engine.select(surface, &format!("{scope} .section-tag"));
    let lines = engine.select(surface, &format!("{scope} .title-line"));
    let description = engine.select(surface, &format!("{scope} .section-description"));

    let timeline = Timeline::new()
        .from(
            &tag,
            TweenVars::new().opacity(0.0).y(40.0).duration(0.8).ease(POWER3_OUT),
            Position::END,
        )
        .from(
            &lines,
            TweenVars::new()
                .opacity(0.0)
                .y(80.0)
                .rotate_x(-30.0)
                .duration(1.0)
                .stagger(Stagger::each(0.12))
                .ease(POWER4_OUT),
            Position::FromEnd(-0.4),
        )
        .from(
            &description,
            TweenVars::new().opacity(0.0).y(50.0).duration(0.8).ease(POWER3_OUT),
            Position::FromEnd(-0.5),
        );
    let spec = TriggerSpec::new(Some(section))
        .start(TOP_80)
        .end(end)
        .actions(ToggleActions::PLAY_THEN_REVERSE);
    on_scroll(engine, surface, timeline, spec);
}

/// Cards rise into place once their grid scrolls in; until then they keep
/// their resting style.
fn card_entrance() -> TweenVars {
    TweenVars::new()
        .opacity(0.0)
        .y(100.0)
        .rotate_x(10.0)
        .scale(0.95)
        .ease(POWER4_OUT)
        .immediate_render(false)
}

fn experience<S: Surface>(engine: &mut Engine<S::Node>, surface: &S) {
    if let Some(grid) = first(surface, ".experience-grid") {
        let cards = engine.select(surface, ".experience-card");
        let timeline = Timeline::new().from(
            &cards,
            card_entrance().duration(1.2).stagger(Stagger::each(0.2)),
            Position::END,
        );
        on_scroll(engine, surface, timeline, TriggerSpec::new(Some(grid)).start(TOP_80));
    }

    for image in surface.query_all(".experience-card-image img") {
        let target = engine.target(surface, &image);
        let reveal = Timeline::new().from_to(
            &[target],
            TweenVars::new().scale(1.3).opacity(0.7),
            TweenVars::new().scale(1.0).opacity(1.0).duration(1.5).ease(POWER2_OUT),
            Position::END,
        );
        on_scroll(
            engine,
            surface,
            reveal,
            TriggerSpec::new(Some(image.clone()))
                .start(at(Anchor::Top, Anchor::Percent(85.0)))
                .actions(ToggleActions::PLAY_THEN_REVERSE),
        );
        scrubbed(
            engine,
            surface,
            &[target],
            TweenVars::new().set(Prop::YPercent, -15.0),
            TriggerSpec::new(Some(image)).start(TOP_BOTTOM).end(BOTTOM_TOP).scrub(1.0),
        );
    }

    if let Some(stats) = first(surface, ".experience-stats") {
        let target = engine.target(surface, &stats);
        let glow = Timeline::new().to(
            &[target],
            TweenVars::new().set(Prop::Var("--glow-opacity".to_string()), 0.5),
            Position::END,
        );
        let spec = TriggerSpec::new(Some(stats))
            .start(TOP_80)
            .end(at(Anchor::Bottom, Anchor::Percent(20.0)))
            .actions(ToggleActions::WHILE_VISIBLE);
        on_scroll(engine, surface, glow, spec);
    }
}

fn pricing<S: Surface>(engine: &mut Engine<S::Node>, surface: &S) {
    let grid = first(surface, ".pricing-grid");
    let cards = surface.query_all(".pricing-card");

    if let Some(grid) = &grid {
        let targets: Vec<TargetId> = cards.iter().map(|card| engine.target(surface, card)).collect();
        let timeline = Timeline::new().from(
            &targets,
            card_entrance().duration(1.0).stagger(Stagger::from_center(0.15)),
            Position::END,
        );
        on_scroll(engine, surface, timeline, TriggerSpec::new(Some(grid.clone())).start(TOP_80));
    }

    for (index, card) in cards.into_iter().enumerate() {
        let features = engine.select_within(surface, &card, ".pricing-card-features li");
        let timeline = Timeline::new().from(
            &features,
            TweenVars::new()
                .opacity(0.0)
                .x(-30.0)
                .duration(0.5)
                .stagger(Stagger::each(0.08))
                .delay(0.4 + index as f64 * 0.1)
                .ease(POWER3_OUT)
                .immediate_render(false),
            Position::END,
        );
        let spec = TriggerSpec::new(Some(card)).start(at(Anchor::Top, Anchor::Percent(70.0)));
        on_scroll(engine, surface, timeline, spec);
    }

    if let Some(grid) = grid {
        let ctas = engine.select(surface, ".pricing-card-cta");
        let timeline = Timeline::new().from(
            &ctas,
            TweenVars::new()
                .opacity(0.0)
                .y(20.0)
                .duration(0.6)
                .stagger(Stagger::each(0.1))
                .delay(0.6)
                .ease(POWER3_OUT)
                .immediate_render(false),
            Position::END,
        );
        let spec = TriggerSpec::new(Some(grid)).start(at(Anchor::Top, Anchor::Percent(60.0)));
        on_scroll(engine, surface, timeline, spec);
    }
}

fn cta<S: Surface>(engine: &mut Engine<S::Node>, surface: &S) {
    if let Some(section) = first(surface, ".cta") {
        let background = engine.select(surface, ".cta-background img");
        scrubbed(
            engine,
            surface,
            &background,
            TweenVars::new().set(Prop::YPercent, 30.0),
            TriggerSpec::new(Some(section)).start(TOP_BOTTOM).end(BOTTOM_TOP).scrub(1.0),
        );
    }

    let Some(content) = first(surface, ".cta-content") else {
        return;
    };
    let lines = engine.select(surface, ".cta-title .title-line");
    let text = engine.select(surface, ".cta-text");
    let groups = engine.select(surface, ".form-group");
    let submit = engine.select(surface, ".cta-submit");

    let timeline = Timeline::new()
        .from(
            &lines,
            TweenVars::new()
                .opacity(0.0)
                .y(80.0)
                .rotate_x(-20.0)
                .duration(1.0)
                .stagger(Stagger::each(0.15))
                .ease(POWER4_OUT),
            Position::END,
        )
        .from(
            &text,
            TweenVars::new().opacity(0.0).y(40.0).duration(0.8).ease(POWER3_OUT),
            Position::FromEnd(-0.5),
        )
        .from(
            &groups,
            TweenVars::new()
                .opacity(0.0)
                .y(50.0)
                .duration(0.6)
                .stagger(Stagger::each(0.1))
                .ease(POWER3_OUT),
            Position::FromEnd(-0.3),
        )
        .from(
            &submit,
            TweenVars::new()
                .opacity(0.0)
                .y(30.0)
                .scale(0.9)
                .duration(0.6)
                .ease(Easing::back_out(1.7)),
            Position::FromEnd(-0.2),
        );
    let spec = TriggerSpec::new(Some(content))
        .start(TOP_80)
        .actions(ToggleActions::PLAY_THEN_REVERSE);
    on_scroll(engine, surface, timeline, spec);
}

fn footer<S: Surface>(engine: &mut Engine<S::Node>, surface: &S) {
    let Some(footer) = first(surface, ".footer") else {
        return;
    };
    let parts = engine.select(surface, ".footer-brand, .footer-contact, .footer-social");
    let timeline = Timeline::new().from(
        &parts,
        TweenVars::new()
            .opacity(0.0)
            .y(40.0)
            .duration(0.8)
            .stagger(Stagger::each(0.15))
            .ease(POWER3_OUT),
        Position::END,
    );
    let spec = TriggerSpec::new(Some(footer))
        .start(at(Anchor::Top, Anchor::Percent(95.0)))
        .actions(ToggleActions::PLAY_THEN_REVERSE);
    on_scroll(engine, surface, timeline, spec);
}
