use super::easing::{Easing, Mode};
use super::props::Prop;
use super::{Signal, TargetId};

/// Duration and ease a tween falls back to when its vars leave them out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Defaults {
    pub duration: f64,
    pub ease: Easing,
}

impl Default for Defaults {
    fn default() -> Self {
        Self { duration: 0.5, ease: Easing::power(1, Mode::Out) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaggerFrom {
    Start,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stagger {
    pub each: f64,
    pub from: StaggerFrom,
}

impl Stagger {
    pub fn each(each: f64) -> Self {
        Self { each, from: StaggerFrom::Start }
    }

    pub fn from_center(each: f64) -> Self {
        Self { each, from: StaggerFrom::Center }
    }

    /// Start offset of each of `count` targets. The earliest target always
    /// starts at zero.
    pub fn offsets(&self, count: usize) -> Vec<f64> {
        if count == 0 {
            return Vec::new();
        }
        let last = (count - 1) as f64;
        let distances: Vec<f64> = (0..count)
            .map(|i| {
                let i = i as f64;
                match self.from {
                    StaggerFrom::Start => i,
                    StaggerFrom::Center => (i - last / 2.0).abs(),
                }
            })
            .collect();
        let min = distances.iter().copied().fold(f64::INFINITY, f64::min);
        distances.into_iter().map(|d| (d - min) * self.each).collect()
    }
}

/// Declarative description of a tween, built fluently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TweenVars {
    pub(crate) values: Vec<(Prop, f64)>,
    pub(crate) duration: Option<f64>,
    pub(crate) ease: Option<Easing>,
    pub(crate) delay: f64,
    pub(crate) stagger: Option<Stagger>,
    pub(crate) repeat: u32,
    pub(crate) yoyo: bool,
    pub(crate) snap: Option<f64>,
    pub(crate) immediate_render: Option<bool>,
    pub(crate) on_complete: Option<Signal>,
}

impl TweenVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, prop: Prop, value: f64) -> Self {
        self.values.retain(|(p, _)| *p != prop);
        self.values.push((prop, value));
        self
    }

    pub fn opacity(self, value: f64) -> Self {
        self.set(Prop::Opacity, value)
    }

    pub fn x(self, value: f64) -> Self {
        self.set(Prop::X, value)
    }

    pub fn y(self, value: f64) -> Self {
        self.set(Prop::Y, value)
    }

    pub fn scale(self, value: f64) -> Self {
        self.set(Prop::Scale, value)
    }

    pub fn rotate_x(self, value: f64) -> Self {
        self.set(Prop::RotateX, value)
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn ease(mut self, ease: Easing) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn delay(mut self, seconds: f64) -> Self {
        self.delay = seconds;
        self
    }

    pub fn stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = Some(stagger);
        self
    }

    pub fn repeat(mut self, times: u32) -> Self {
        self.repeat = times;
        self
    }

    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    /// Round every rendered value to a multiple of `increment`.
    pub fn snap(mut self, increment: f64) -> Self {
        self.snap = Some(increment);
        self
    }

    pub fn immediate_render(mut self, immediate: bool) -> Self {
        self.immediate_render = Some(immediate);
        self
    }

    pub fn on_complete(mut self, signal: Signal) -> Self {
        self.on_complete = Some(signal);
        self
    }

    pub fn props(&self) -> Vec<Prop> {
        self.values.iter().map(|(p, _)| p.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenKind {
    /// From the current value to the given one.
    To,
    /// From the given value to the current one.
    From,
    /// Between two given values.
    FromTo,
}

#[derive(Debug, Clone, PartialEq)]
struct Track {
    prop: Prop,
    from: Option<f64>,
    to: Option<f64>,
    resolved: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub target: TargetId,
    tracks: Vec<Track>,
    pub duration: f64,
    pub ease: Easing,
    pub repeat: u32,
    pub yoyo: bool,
    pub snap: Option<f64>,
    pub immediate_render: bool,
    pub on_complete: Option<Signal>,
}

impl Tween {
    /// Expands vars over `targets`, returning each tween with its start
    /// offset (delay plus stagger).
    pub fn expand(
        kind: TweenKind,
        targets: &[TargetId],
        from: Option<&TweenVars>,
        vars: &TweenVars,
        defaults: &Defaults,
    ) -> Vec<(f64, Tween)> {
        let offsets = match vars.stagger {
            Some(stagger) => stagger.offsets(targets.len()),
            None => vec![0.0; targets.len()],
        };
        let tracks: Vec<Track> = match kind {
            TweenKind::To => vars
                .values
                .iter()
                .map(|(prop, v)| Track::new(prop.clone(), None, Some(*v)))
                .collect(),
            TweenKind::From => vars
                .values
                .iter()
                .map(|(prop, v)| Track::new(prop.clone(), Some(*v), None))
                .collect(),
            TweenKind::FromTo => {
                let from = from.map(|f| f.values.as_slice()).unwrap_or_default();
                vars.values
                    .iter()
                    .map(|(prop, v)| {
                        let start = from.iter().find(|(p, _)| p == prop).map(|(_, s)| *s);
                        Track::new(prop.clone(), start, Some(*v))
                    })
                    .collect()
            }
        };
        let immediate = vars
            .immediate_render
            .unwrap_or(matches!(kind, TweenKind::From | TweenKind::FromTo));

        targets
            .iter()
            .zip(offsets)
            .map(|(target, offset)| {
                let tween = Tween {
                    target: *target,
                    tracks: tracks.clone(),
                    duration: vars.duration.unwrap_or(defaults.duration).max(0.0),
                    ease: vars.ease.unwrap_or(defaults.ease),
                    repeat: vars.repeat,
                    yoyo: vars.yoyo,
                    snap: vars.snap,
                    immediate_render: immediate,
                    on_complete: vars.on_complete.clone(),
                };
                (vars.delay + offset, tween)
            })
            .collect()
    }

    /// Active time including repeats.
    pub fn total(&self) -> f64 {
        self.duration * f64::from(self.repeat + 1)
    }

    /// Eased progress at `local` seconds after the tween's start.
    pub fn progress_at(&self, local: f64) -> f64 {
        if self.duration <= 0.0 {
            let ends_reversed = self.yoyo && self.repeat % 2 == 1;
            return if local >= 0.0 && !ends_reversed { 1.0 } else { 0.0 };
        }
        let local = local.clamp(0.0, self.total());
        let (cycle, within) = if local >= self.total() {
            (self.repeat, self.duration)
        } else {
            let cycle = (local / self.duration).floor();
            (cycle as u32, local - cycle * self.duration)
        };
        let mut linear = within / self.duration;
        if self.yoyo && cycle % 2 == 1 {
            linear = 1.0 - linear;
        }
        self.ease.apply(linear)
    }

    pub fn is_resolved(&self) -> bool {
        self.tracks.iter().all(|t| t.resolved.is_some())
    }

    /// Fills in open ends with the target's current values.
    pub fn resolve(&mut self, current: impl Fn(&Prop) -> f64) {
        for track in &mut self.tracks {
            if track.resolved.is_none() {
                let now = current(&track.prop);
                track.resolved = Some((track.from.unwrap_or(now), track.to.unwrap_or(now)));
            }
        }
    }

    /// Values at eased `progress`; only resolved tracks are sampled.
    pub fn sample(&self, progress: f64) -> Vec<(Prop, f64)> {
        self.tracks
            .iter()
            .filter_map(|track| {
                let (from, to) = track.resolved?;
                let mut value = from + (to - from) * progress;
                if let Some(snap) = self.snap.filter(|s| *s > 0.0) {
                    value = (value / snap).round() * snap;
                }
                Some((track.prop.clone(), value))
            })
            .collect()
    }

    #[cfg(test)]
    pub fn animates(&self, prop: &Prop) -> bool {
        self.tracks.iter().any(|t| t.prop == *prop)
    }

    /// Removes the given properties; returns `false` once nothing is left.
    pub fn drop_props(&mut self, props: &[Prop]) -> bool {
        self.tracks.retain(|t| !props.contains(&t.prop));
        !self.tracks.is_empty()
    }
}

impl Track {
    fn new(prop: Prop, from: Option<f64>, to: Option<f64>) -> Self {
        Self { prop, from, to, resolved: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(kind: TweenKind, vars: TweenVars) -> Tween {
        let mut tweens = Tween::expand(kind, &[TargetId(1)], None, &vars, &Defaults::default());
        tweens.remove(0).1
    }

    #[test]
    fn stagger_from_start_is_linear() {
        assert_eq!(Stagger::each(0.1).offsets(3), vec![0.0, 0.1, 0.2]);
    }

    #[test]
    fn stagger_from_center_fans_out() {
        let offsets = Stagger::from_center(0.15).offsets(3);
        assert_eq!(offsets, vec![0.15, 0.0, 0.15]);
        let even = Stagger::from_center(1.0).offsets(4);
        assert_eq!(even, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn stagger_and_delay_add_up() {
        let vars = TweenVars::new().opacity(1.0).delay(0.4).stagger(Stagger::each(0.08));
        let targets = [TargetId(1), TargetId(2), TargetId(3)];
        let offsets: Vec<f64> = Tween::expand(TweenKind::To, &targets, None, &vars, &Defaults::default())
            .into_iter()
            .map(|(offset, _)| offset)
            .collect();
        assert!((offsets[2] - 0.56).abs() < 1e-9);
        assert_eq!(offsets[0], 0.4);
    }

    #[test]
    fn from_tween_runs_toward_current_value() {
        let mut tween = single(TweenKind::From, TweenVars::new().opacity(0.0).y(40.0));
        assert!(tween.immediate_render);
        tween.resolve(|prop| prop.neutral());
        assert_eq!(tween.sample(0.0), vec![(Prop::Opacity, 0.0), (Prop::Y, 40.0)]);
        assert_eq!(tween.sample(1.0), vec![(Prop::Opacity, 1.0), (Prop::Y, 0.0)]);
    }

    #[test]
    fn from_to_uses_matching_start_values() {
        let from = TweenVars::new().scale(1.3).opacity(0.7);
        let to = TweenVars::new().scale(1.0).opacity(1.0);
        let mut tweens =
            Tween::expand(TweenKind::FromTo, &[TargetId(1)], Some(&from), &to, &Defaults::default());
        let (_, mut tween) = tweens.remove(0);
        tween.resolve(|_| 99.0);
        assert_eq!(tween.sample(0.0), vec![(Prop::Scale, 1.3), (Prop::Opacity, 0.7)]);
    }

    #[test]
    fn yoyo_with_one_repeat_returns_to_start() {
        let tween = single(
            TweenKind::To,
            TweenVars::new().scale(0.95).duration(0.1).yoyo().repeat(1),
        );
        assert!((tween.total() - 0.2).abs() < 1e-12);
        assert!(tween.progress_at(0.1 - 1e-9) > 0.99);
        assert_eq!(tween.progress_at(0.2), 0.0);
        assert_eq!(tween.progress_at(5.0), 0.0);
    }

    #[test]
    fn snap_rounds_sampled_values() {
        let mut tween = single(TweenKind::To, TweenVars::new().set(Prop::Text, 120.0).snap(1.0));
        tween.resolve(|_| 0.0);
        assert_eq!(tween.sample(0.333), vec![(Prop::Text, 40.0)]);
        assert_eq!(tween.sample(1.0), vec![(Prop::Text, 120.0)]);
    }

    #[test]
    fn zero_duration_jumps_to_end() {
        let tween = single(TweenKind::To, TweenVars::new().x(5.0).duration(0.0));
        assert_eq!(tween.progress_at(0.0), 1.0);
    }

    #[test]
    fn dropping_every_prop_empties_the_tween() {
        let mut tween = single(TweenKind::To, TweenVars::new().x(1.0).y(2.0));
        assert!(tween.drop_props(&[Prop::X]));
        assert!(!tween.animates(&Prop::X));
        assert!(!tween.drop_props(&[Prop::Y]));
    }
}
