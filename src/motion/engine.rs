use log::debug;

use super::props::{fmt, Matrix, Pose, PoseTable, Prop};
use super::timeline::{Position, Timeline};
use super::trigger::{Action, Crossing, ScrollTrigger, TriggerSpec};
use super::tween::TweenVars;
use super::{AnimationId, Signal, TargetId};
use crate::surface::Surface;

/// The window itself; animating [`Prop::ScrollY`] on it scrolls the page.
pub const VIEWPORT: TargetId = TargetId(0);

/// Longest frame gap fed to the animations, so a backgrounded tab does not
/// jump every tween to its end when it comes back.
const MAX_FRAME_GAP: f64 = 0.25;

#[derive(Debug)]
struct Slot {
    timeline: Timeline,
    /// Fire-and-forget tween, dropped once finished.
    transient: bool,
}

#[derive(Debug)]
pub struct Engine<N> {
    nodes: Vec<Option<N>>,
    poses: PoseTable,
    animations: Vec<Option<Slot>>,
    /// Emptied slots, reused by the next animation.
    free: Vec<usize>,
    triggers: Vec<ScrollTrigger<N>>,
    time_scale: f64,
    last_frame: Option<f64>,
}

impl<N: Clone + PartialEq> Default for Engine<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Clone + PartialEq> Engine<N> {
    pub fn new() -> Self {
        let mut poses = PoseTable::default();
        poses.ensure(VIEWPORT);
        Self {
            nodes: vec![None],
            poses,
            animations: Vec::new(),
            free: Vec::new(),
            triggers: Vec::new(),
            time_scale: 1.0,
            last_frame: None,
        }
    }

    /// Registers `node`, seeding its pose from the computed style. Calling
    /// again with the same node returns the same id.
    pub fn target<S: Surface<Node = N>>(&mut self, surface: &S, node: &N) -> TargetId {
        if let Some(id) = self.find(node) {
            return id;
        }
        let id = TargetId(self.nodes.len());
        let text = surface.text(node).trim().parse::<f64>().ok();
        let pose = Pose::seeded(
            surface.computed_opacity(node),
            Matrix::parse(&surface.computed_transform(node)),
            text,
        );
        self.nodes.push(Some(node.clone()));
        self.poses.insert(id, pose);
        id
    }

    /// Id of an already registered node.
    pub fn find(&self, node: &N) -> Option<TargetId> {
        self.nodes
            .iter()
            .position(|n| n.as_ref() == Some(node))
            .map(TargetId)
    }

    pub fn select<S: Surface<Node = N>>(&mut self, surface: &S, selector: &str) -> Vec<TargetId> {
        surface
            .query_all(selector)
            .iter()
            .map(|node| self.target(surface, node))
            .collect()
    }

    pub fn select_within<S: Surface<Node = N>>(
        &mut self,
        surface: &S,
        scope: &N,
        selector: &str,
    ) -> Vec<TargetId> {
        surface
            .query_within(scope, selector)
            .iter()
            .map(|node| self.target(surface, node))
            .collect()
    }

    #[cfg(test)]
    pub fn pose(&self, target: TargetId) -> Option<&Pose> {
        self.poses.pose(target)
    }

    #[cfg(test)]
    pub fn animation(&self, id: AnimationId) -> Option<&Timeline> {
        self.animations
            .get(id.0)
            .and_then(Option::as_ref)
            .map(|slot| &slot.timeline)
    }

    #[cfg(test)]
    pub fn live_animations(&self) -> usize {
        self.animations.iter().flatten().count()
    }

    pub fn trigger_ranges(&self) -> Vec<(f64, f64)> {
        self.triggers.iter().map(ScrollTrigger::range).collect()
    }

    #[cfg(test)]
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Speeds up (or slows down) every animation at once.
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.max(0.0);
    }

    /// Starts playing `timeline` right away.
    pub fn play(&mut self, timeline: Timeline) -> AnimationId {
        self.push(timeline, false)
    }

    /// Registers `timeline` under a scroll trigger. Without `scrub` it waits
    /// paused for the trigger's toggle actions.
    pub fn play_on_scroll<S: Surface<Node = N>>(
        &mut self,
        surface: &S,
        mut timeline: Timeline,
        spec: TriggerSpec<N>,
    ) -> AnimationId {
        match spec.scrub {
            Some(lag) => timeline.scrub(lag),
            None => timeline.pause(),
        }
        let id = self.push(timeline, false);
        self.add_trigger(surface, ScrollTrigger::new(spec, Some(id)));
        id
    }

    /// Registers a trigger that drives no animation, only classes and signals.
    pub fn watch<S: Surface<Node = N>>(&mut self, surface: &S, spec: TriggerSpec<N>) {
        self.add_trigger(surface, ScrollTrigger::new(spec, None));
    }

    /// Fire-and-forget tween of one target. Any earlier fire-and-forget tween
    /// of the same properties on that target is cut short.
    pub fn animate(&mut self, target: TargetId, vars: TweenVars) {
        let props = vars.props();
        for (index, entry) in self.animations.iter_mut().enumerate() {
            let emptied = match entry {
                Some(slot) if slot.transient => {
                    slot.timeline.drop_props(target, &props);
                    slot.timeline.is_empty()
                }
                _ => false,
            };
            if emptied {
                *entry = None;
                self.free.push(index);
            }
        }
        self.push(Timeline::new().to(&[target], vars, Position::END), true);
    }

    /// Sets a value immediately, outside any animation.
    pub fn set(&mut self, target: TargetId, prop: Prop, value: f64) {
        self.poses.set(target, &prop, value);
    }

    /// Re-measures every trigger against the current layout.
    pub fn refresh<S: Surface<Node = N>>(&mut self, surface: &S) {
        for trigger in &mut self.triggers {
            measure(surface, trigger);
        }
        debug!("Refreshed {} scroll triggers", self.triggers.len());
    }

    /// Advances everything to `now` (seconds), writes the changes to the
    /// page and returns the signals raised along the way.
    pub fn frame<S: Surface<Node = N>>(&mut self, surface: &S, now: f64) -> Vec<Signal> {
        let dt = self
            .last_frame
            .map_or(0.0, |last| (now - last).clamp(0.0, MAX_FRAME_GAP));
        self.last_frame = Some(now);
        let dt = dt * self.time_scale;

        let scroll = surface.scroll_y();
        self.poses.set_quiet(VIEWPORT, &Prop::ScrollY, scroll);

        let mut signals = Vec::new();
        self.update_triggers(surface, scroll, &mut signals);

        for slot in self.animations.iter_mut().flatten() {
            slot.timeline.advance(dt);
            slot.timeline.render(&mut self.poses, &mut signals);
        }
        for (index, entry) in self.animations.iter_mut().enumerate() {
            if entry
                .as_ref()
                .is_some_and(|slot| slot.transient && slot.timeline.is_finished())
            {
                *entry = None;
                self.free.push(index);
            }
        }

        self.flush(surface);
        signals
    }

    /// Writes pending property changes to the page.
    pub fn flush<S: Surface<Node = N>>(&mut self, surface: &S) {
        for (target, props) in self.poses.take_dirty() {
            let Some(pose) = self.poses.pose(target) else {
                continue;
            };
            let Some(node) = self.nodes.get(target.0).and_then(Option::as_ref) else {
                if props.contains(&Prop::ScrollY) {
                    surface.scroll_to(pose.get(&Prop::ScrollY));
                }
                continue;
            };
            if props.iter().any(Prop::is_transform) {
                surface.set_style(node, "transform", &pose.transform());
            }
            for prop in &props {
                match prop {
                    Prop::Opacity => surface.set_style(node, "opacity", &fmt(pose.get(prop))),
                    Prop::Var(name) => surface.set_style(node, name, &fmt(pose.get(prop))),
                    Prop::Text => surface.set_text(node, &fmt(pose.get(prop))),
                    _ => {}
                }
            }
        }
    }

    fn push(&mut self, mut timeline: Timeline, transient: bool) -> AnimationId {
        timeline.render_initial(&mut self.poses);
        let slot = Some(Slot { timeline, transient });
        match self.free.pop() {
            Some(index) => {
                self.animations[index] = slot;
                AnimationId(index)
            }
            None => {
                self.animations.push(slot);
                AnimationId(self.animations.len() - 1)
            }
        }
    }

    fn add_trigger<S: Surface<Node = N>>(&mut self, surface: &S, mut trigger: ScrollTrigger<N>) {
        measure(surface, &mut trigger);
        self.triggers.push(trigger);
    }

    fn update_triggers<S: Surface<Node = N>>(
        &mut self,
        surface: &S,
        scroll: f64,
        signals: &mut Vec<Signal>,
    ) {
        for trigger in &mut self.triggers {
            let crossings = trigger.update(scroll);
            let slot = trigger
                .animation
                .and_then(|id| self.animations.get_mut(id.0))
                .and_then(Option::as_mut);
            if let Some(slot) = slot {
                if slot.timeline.is_scrubbed() {
                    slot.timeline.set_scrub_progress(trigger.progress(scroll));
                } else {
                    for crossing in &crossings {
                        apply(&mut slot.timeline, trigger.spec.actions.for_crossing(*crossing));
                    }
                }
            }
            if crossings.is_empty() {
                continue;
            }
            if let Some((node, class)) = &trigger.spec.toggle_class {
                if trigger.is_active() {
                    surface.add_class(node, class);
                } else {
                    surface.remove_class(node, class);
                }
            }
            if crossings.contains(&Crossing::Enter) {
                signals.extend(trigger.spec.on_enter.clone());
                if trigger.spec.once {
                    trigger.kill();
                }
            }
        }
        self.triggers.retain(|trigger| !trigger.is_killed());
    }
}

fn measure<S: Surface>(surface: &S, trigger: &mut ScrollTrigger<S::Node>) {
    let (_, viewport_height) = surface.viewport();
    let (top, height) = match &trigger.spec.element {
        Some(node) => {
            let rect = surface.rect(node);
            (rect.top + surface.scroll_y(), rect.height)
        }
        None => (0.0, surface.document_height()),
    };
    trigger.measure(top, height, viewport_height);
}

fn apply(timeline: &mut Timeline, action: Action) {
    match action {
        Action::None => {}
        Action::Play => timeline.play(),
        Action::Pause => timeline.pause(),
        Action::Resume => timeline.resume(),
        Action::Reverse => timeline.reverse(),
        Action::Restart => timeline.restart(),
        Action::Reset => timeline.reset(),
        Action::Complete => timeline.complete(),
    }
}
