use std::str::FromStr;

use super::easing::Easing;
use super::props::{PoseTable, Prop};
use super::tween::{Defaults, Tween, TweenKind, TweenVars};
use super::{Signal, TargetId};
use crate::error::MotionError;

/// Where a tween is placed on its timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Seconds from the timeline's start.
    At(f64),
    /// Offset from the current end of the timeline (`"+=0.2"`, `"-=0.4"`).
    FromEnd(f64),
    /// Offset from the start of the most recently added tween (`"<"`).
    WithPrevious(f64),
}

impl Position {
    pub const END: Position = Position::FromEnd(0.0);
}

impl FromStr for Position {
    type Err = MotionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let number = |s: &str| {
            let s = s.trim();
            if s.is_empty() {
                return Ok(0.0);
            }
            s.parse::<f64>()
                .map_err(|_| MotionError::Parse(format!("timeline position `{}`", raw)))
        };
        if let Some(rest) = raw.strip_prefix("+=") {
            Ok(Position::FromEnd(number(rest)?))
        } else if let Some(rest) = raw.strip_prefix("-=") {
            Ok(Position::FromEnd(-number(rest)?))
        } else if let Some(rest) = raw.strip_prefix('<') {
            Ok(Position::WithPrevious(number(rest)?))
        } else {
            Ok(Position::At(number(raw)?))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Child {
    start: f64,
    tween: Tween,
    rendered_local: Option<f64>,
    completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Scrub {
    lag: f64,
    goal: f64,
}

/// An ordered group of tweens sharing one playhead.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    defaults: Defaults,
    children: Vec<Child>,
    last_start: f64,
    time: f64,
    paused: bool,
    reversed: bool,
    rendered_time: Option<f64>,
    force_render: bool,
    scrub: Option<Scrub>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::with_defaults(Defaults::default())
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: Defaults) -> Self {
        Self {
            defaults,
            children: Vec::new(),
            last_start: 0.0,
            time: 0.0,
            paused: false,
            reversed: false,
            rendered_time: None,
            force_render: false,
            scrub: None,
        }
    }

    pub fn defaults(duration: f64, ease: Easing) -> Self {
        Self::with_defaults(Defaults { duration, ease })
    }

    pub fn to(self, targets: &[TargetId], vars: TweenVars, at: Position) -> Self {
        self.add(TweenKind::To, targets, None, vars, at)
    }

    pub fn from(self, targets: &[TargetId], vars: TweenVars, at: Position) -> Self {
        self.add(TweenKind::From, targets, None, vars, at)
    }

    pub fn from_to(
        self,
        targets: &[TargetId],
        from: TweenVars,
        to: TweenVars,
        at: Position,
    ) -> Self {
        self.add(TweenKind::FromTo, targets, Some(from), to, at)
    }

    fn add(
        mut self,
        kind: TweenKind,
        targets: &[TargetId],
        from: Option<TweenVars>,
        vars: TweenVars,
        at: Position,
    ) -> Self {
        let base = match at {
            Position::At(t) => t,
            Position::FromEnd(offset) => self.duration() + offset,
            Position::WithPrevious(offset) => self.last_start + offset,
        }
        .max(0.0);
        self.last_start = base;
        for (offset, tween) in Tween::expand(kind, targets, from.as_ref(), &vars, &self.defaults) {
            self.children.push(Child {
                start: base + offset,
                tween,
                rendered_local: None,
                completed: false,
            });
        }
        self
    }

    pub fn duration(&self) -> f64 {
        self.children
            .iter()
            .map(|c| c.start + c.tween.total())
            .fold(0.0, f64::max)
    }

    #[cfg(test)]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[cfg(test)]
    pub fn progress(&self) -> f64 {
        let duration = self.duration();
        if duration <= 0.0 {
            1.0
        } else {
            self.time / duration
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Start offsets of the children, in insertion order.
    #[cfg(test)]
    pub fn starts(&self) -> Vec<f64> {
        self.children.iter().map(|c| c.start).collect()
    }

    pub fn play(&mut self) {
        self.paused = false;
        self.reversed = false;
    }

    pub fn reverse(&mut self) {
        self.paused = false;
        self.reversed = true;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn restart(&mut self) {
        self.seek(0.0);
        self.play();
    }

    pub fn reset(&mut self) {
        self.seek(0.0);
        self.pause();
    }

    pub fn complete(&mut self) {
        self.seek(self.duration());
        self.pause();
    }

    pub fn seek(&mut self, time: f64) {
        self.time = time.clamp(0.0, self.duration());
        self.force_render = true;
    }

    /// Hands the playhead over to scroll progress, catching up over `lag`
    /// seconds.
    pub fn scrub(&mut self, lag: f64) {
        self.paused = true;
        self.scrub = Some(Scrub { lag: lag.max(0.0), goal: self.time });
    }

    pub fn is_scrubbed(&self) -> bool {
        self.scrub.is_some()
    }

    pub fn set_scrub_progress(&mut self, progress: f64) {
        let goal = progress.clamp(0.0, 1.0) * self.duration();
        if let Some(scrub) = &mut self.scrub {
            scrub.goal = goal;
        }
    }

    pub fn advance(&mut self, dt: f64) {
        if let Some(scrub) = self.scrub {
            let gap = scrub.goal - self.time;
            if scrub.lag <= 0.0 || gap.abs() < 1e-4 {
                self.time = scrub.goal;
            } else {
                // Roughly 99% of the gap is closed after `lag` seconds.
                self.time += gap * (1.0 - (-dt * 5.0 / scrub.lag).exp());
            }
            return;
        }
        if self.paused {
            return;
        }
        self.time = if self.reversed {
            (self.time - dt).max(0.0)
        } else {
            (self.time + dt).min(self.duration())
        };
    }

    /// Renders tweens that want to show their start state before the
    /// timeline is played.
    pub fn render_initial(&mut self, poses: &mut PoseTable) {
        for child in &mut self.children {
            if child.tween.immediate_render {
                let target = child.tween.target;
                child.tween.resolve(|prop| poses.get(target, prop));
                for (prop, value) in child.tween.sample(child.tween.progress_at(0.0)) {
                    poses.set(target, &prop, value);
                }
                child.rendered_local = Some(0.0);
            }
        }
        self.rendered_time = Some(self.time);
    }

    /// Writes every child's values at the current playhead. Does nothing
    /// when the playhead has not moved since the last render.
    pub fn render(&mut self, poses: &mut PoseTable, signals: &mut Vec<Signal>) {
        if self.rendered_time == Some(self.time) && !self.force_render {
            return;
        }
        let forward = self.rendered_time.map_or(true, |last| self.time >= last);
        self.rendered_time = Some(self.time);
        self.force_render = false;

        for child in &mut self.children {
            let local = self.time - child.start;
            let total = child.tween.total();
            if local < 0.0 && !child.tween.is_resolved() && !child.tween.immediate_render {
                continue;
            }
            let local = local.clamp(0.0, total);
            if child.rendered_local == Some(local) {
                continue;
            }
            child.rendered_local = Some(local);

            let target = child.tween.target;
            child.tween.resolve(|prop| poses.get(target, prop));
            for (prop, value) in child.tween.sample(child.tween.progress_at(local)) {
                poses.set(target, &prop, value);
            }

            if local >= total {
                if forward && !child.completed {
                    child.completed = true;
                    signals.extend(child.tween.on_complete.clone());
                }
            } else {
                child.completed = false;
            }
        }
    }

    /// True once a forward-playing timeline has rendered its last frame.
    pub fn is_finished(&self) -> bool {
        !self.paused
            && !self.reversed
            && self.time >= self.duration()
            && self.rendered_time == Some(self.time)
    }

    /// Stops animating `props` on `target`; used when a newer tween takes
    /// over the same properties.
    pub fn drop_props(&mut self, target: TargetId, props: &[Prop]) {
        self.children
            .retain_mut(|child| child.tween.target != target || child.tween.drop_props(props));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::easing::Mode;
    use crate::motion::tween::Stagger;

    const A: TargetId = TargetId(1);
    const B: TargetId = TargetId(2);
    const C: TargetId = TargetId(3);

    #[test]
    fn parses_positions() {
        assert_eq!("0.3".parse::<Position>().unwrap(), Position::At(0.3));
        assert_eq!("-=0.4".parse::<Position>().unwrap(), Position::FromEnd(-0.4));
        assert_eq!("+=0.2".parse::<Position>().unwrap(), Position::FromEnd(0.2));
        assert_eq!("<".parse::<Position>().unwrap(), Position::WithPrevious(0.0));
        assert_eq!("<0.1".parse::<Position>().unwrap(), Position::WithPrevious(0.1));
        assert!("soon".parse::<Position>().is_err());
    }

    #[test]
    fn overlapping_sequence_layout() {
        let tl = Timeline::new()
            .from(&[A], TweenVars::new().opacity(0.0).duration(0.8), Position::END)
            .from(&[B, C], TweenVars::new().y(80.0).duration(1.0).stagger(Stagger::each(0.12)), "-=0.4".parse().unwrap())
            .from(&[A], TweenVars::new().y(50.0).duration(0.8), Position::FromEnd(-0.5));
        let starts = tl.starts();
        assert!((starts[1] - 0.4).abs() < 1e-9);
        assert!((starts[2] - 0.52).abs() < 1e-9);
        // previous end is 0.52 + 1.0
        assert!((starts[3] - 1.02).abs() < 1e-9);
        assert!((tl.duration() - 1.82).abs() < 1e-9);
    }

    #[test]
    fn absolute_positions_can_overlap() {
        let tl = Timeline::defaults(1.2, Easing::power(4, Mode::Out))
            .to(&[A], TweenVars::new().opacity(1.0).duration(0.8), Position::At(0.3))
            .to(&[B], TweenVars::new().opacity(1.0), Position::At(1.0));
        assert_eq!(tl.starts(), vec![0.3, 1.0]);
        assert!((tl.duration() - 2.2).abs() < 1e-9);
    }

    #[test]
    fn plays_forward_and_reverses_to_start() {
        let mut poses = PoseTable::default();
        poses.ensure(A);
        let mut signals = Vec::new();
        let mut tl = Timeline::new().from(&[A], TweenVars::new().y(40.0).duration(1.0), Position::END);
        tl.render_initial(&mut poses);
        assert_eq!(poses.get(A, &Prop::Y), 40.0);

        tl.advance(2.0);
        tl.render(&mut poses, &mut signals);
        assert_eq!(poses.get(A, &Prop::Y), 0.0);

        tl.reverse();
        tl.advance(2.0);
        tl.render(&mut poses, &mut signals);
        assert_eq!(poses.get(A, &Prop::Y), 40.0);
    }

    #[test]
    fn completion_signal_fires_once_going_forward() {
        let mut poses = PoseTable::default();
        poses.ensure(A);
        let mut signals = Vec::new();
        let url = Signal::OpenUrl("https://example.test".into());
        let mut tl = Timeline::new().to(
            &[A],
            TweenVars::new().scale(0.95).duration(0.1).yoyo().repeat(1).on_complete(url.clone()),
            Position::END,
        );
        for _ in 0..10 {
            tl.advance(0.05);
            tl.render(&mut poses, &mut signals);
        }
        assert_eq!(signals, vec![url]);
        assert!(tl.is_finished());
        assert_eq!(poses.get(A, &Prop::Scale), 1.0);
    }

    #[test]
    fn paused_timeline_does_not_render() {
        let mut poses = PoseTable::default();
        poses.ensure(A);
        let mut tl = Timeline::new().to(&[A], TweenVars::new().x(10.0), Position::END);
        tl.pause();
        tl.render_initial(&mut poses);
        tl.advance(1.0);
        tl.render(&mut poses, &mut Vec::new());
        assert_eq!(poses.get(A, &Prop::X), 0.0);
        assert!(poses.take_dirty().is_empty());
    }

    #[test]
    fn scrub_catches_up_with_lag() {
        let mut tl = Timeline::new().to(&[A], TweenVars::new().y(100.0).duration(1.0), Position::END);
        tl.scrub(1.0);
        tl.set_scrub_progress(1.0);
        tl.advance(0.1);
        assert!(tl.time() > 0.0 && tl.time() < 1.0);
        for _ in 0..30 {
            tl.advance(0.1);
        }
        assert!((tl.time() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn zero_lag_scrub_is_immediate() {
        let mut tl = Timeline::new().to(&[A], TweenVars::new().y(100.0).duration(2.0), Position::END);
        tl.scrub(0.0);
        tl.set_scrub_progress(0.25);
        tl.advance(0.0);
        assert_eq!(tl.time(), 0.5);
    }

    #[test]
    fn drop_props_removes_empty_children() {
        let mut tl = Timeline::new()
            .to(&[A], TweenVars::new().x(1.0), Position::END)
            .to(&[B], TweenVars::new().x(1.0), Position::END);
        tl.drop_props(A, &[Prop::X]);
        assert_eq!(tl.starts().len(), 1);
    }
}
