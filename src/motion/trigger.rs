//! Scroll triggers: bind an animation to an element's position relative to
//! the viewport.

use std::str::FromStr;

use super::{AnimationId, Signal};
use crate::error::MotionError;

/// A point along an element or the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Top,
    Center,
    Bottom,
    Percent(f64),
    Pixels(f64),
}

impl Anchor {
    pub fn offset(&self, extent: f64) -> f64 {
        match *self {
            Anchor::Top => 0.0,
            Anchor::Center => extent / 2.0,
            Anchor::Bottom => extent,
            Anchor::Percent(p) => extent * p / 100.0,
            Anchor::Pixels(px) => px,
        }
    }
}

impl FromStr for Anchor {
    type Err = MotionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let bad = || MotionError::Parse(format!("scroll anchor `{}`", raw));
        match raw {
            "top" => Ok(Anchor::Top),
            "center" => Ok(Anchor::Center),
            "bottom" => Ok(Anchor::Bottom),
            _ => match raw.strip_suffix('%') {
                Some(p) => p.parse().map(Anchor::Percent).map_err(|_| bad()),
                None => raw
                    .trim_end_matches("px")
                    .parse()
                    .map(Anchor::Pixels)
                    .map_err(|_| bad()),
            },
        }
    }
}

/// Start or end of a trigger's active range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Boundary {
    /// The scroll position at which the element anchor meets the viewport
    /// anchor, written `"top 80%"`.
    Edges { element: Anchor, viewport: Anchor },
    /// A fixed scroll position.
    Absolute(f64),
}

impl Boundary {
    pub const fn edges(element: Anchor, viewport: Anchor) -> Self {
        Boundary::Edges { element, viewport }
    }

    /// Scroll position for an element spanning `top..top + height` in
    /// document coordinates.
    pub fn resolve(&self, top: f64, height: f64, viewport_height: f64) -> f64 {
        match *self {
            Boundary::Edges { element, viewport } => {
                top + element.offset(height) - viewport.offset(viewport_height)
            }
            Boundary::Absolute(position) => position,
        }
    }
}

impl FromStr for Boundary {
    type Err = MotionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(element), Some(viewport), None) => Ok(Boundary::Edges {
                element: element.parse()?,
                viewport: viewport.parse()?,
            }),
            (Some(position), None, None) => position
                .parse()
                .map(Boundary::Absolute)
                .map_err(|_| MotionError::Parse(format!("scroll boundary `{}`", raw))),
            _ => Err(MotionError::Parse(format!("scroll boundary `{}`", raw))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
}

impl FromStr for Action {
    type Err = MotionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(match raw {
            "none" => Action::None,
            "play" => Action::Play,
            "pause" => Action::Pause,
            "resume" => Action::Resume,
            "reverse" => Action::Reverse,
            "restart" => Action::Restart,
            "reset" => Action::Reset,
            "complete" => Action::Complete,
            _ => return Err(MotionError::Parse(format!("toggle action `{}`", raw))),
        })
    }
}

/// What happens to the animation at each crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleActions {
    pub on_enter: Action,
    pub on_leave: Action,
    pub on_enter_back: Action,
    pub on_leave_back: Action,
}

impl ToggleActions {
    pub const PLAY_ONCE: ToggleActions =
        ToggleActions::new(Action::Play, Action::None, Action::None, Action::None);
    pub const PLAY_THEN_REVERSE: ToggleActions =
        ToggleActions::new(Action::Play, Action::None, Action::None, Action::Reverse);
    pub const WHILE_VISIBLE: ToggleActions =
        ToggleActions::new(Action::Play, Action::Reverse, Action::Play, Action::Reverse);

    pub const fn new(
        on_enter: Action,
        on_leave: Action,
        on_enter_back: Action,
        on_leave_back: Action,
    ) -> Self {
        Self { on_enter, on_leave, on_enter_back, on_leave_back }
    }

    pub fn for_crossing(&self, crossing: Crossing) -> Action {
        match crossing {
            Crossing::Enter => self.on_enter,
            Crossing::Leave => self.on_leave,
            Crossing::EnterBack => self.on_enter_back,
            Crossing::LeaveBack => self.on_leave_back,
        }
    }
}

impl Default for ToggleActions {
    fn default() -> Self {
        Self::PLAY_ONCE
    }
}

impl FromStr for ToggleActions {
    type Err = MotionError;

    /// Four space-separated actions, e.g. `"play none none reverse"`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let actions = raw
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Action>, _>>()?;
        match actions.as_slice() {
            [enter, leave, enter_back, leave_back] => {
                Ok(ToggleActions::new(*enter, *leave, *enter_back, *leave_back))
            }
            _ => Err(MotionError::Parse(format!("toggle actions `{}`", raw))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    Enter,
    Leave,
    EnterBack,
    LeaveBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Before,
    Inside,
    After,
}

/// Declarative trigger configuration. `N` is the page's node type; `None`
/// for the element means the whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerSpec<N> {
    pub element: Option<N>,
    pub start: Boundary,
    pub end: Boundary,
    pub actions: ToggleActions,
    pub scrub: Option<f64>,
    pub once: bool,
    pub toggle_class: Option<(N, String)>,
    pub on_enter: Option<Signal>,
}

impl<N> TriggerSpec<N> {
    pub fn new(element: Option<N>) -> Self {
        Self {
            element,
            start: Boundary::edges(Anchor::Top, Anchor::Bottom),
            end: Boundary::edges(Anchor::Bottom, Anchor::Top),
            actions: ToggleActions::default(),
            scrub: None,
            once: false,
            toggle_class: None,
            on_enter: None,
        }
    }

    pub fn start(mut self, start: Boundary) -> Self {
        self.start = start;
        self
    }

    pub fn end(mut self, end: Boundary) -> Self {
        self.end = end;
        self
    }

    pub fn actions(mut self, actions: ToggleActions) -> Self {
        self.actions = actions;
        self
    }

    pub fn scrub(mut self, lag: f64) -> Self {
        self.scrub = Some(lag);
        self
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    pub fn toggle_class(mut self, node: N, class: &str) -> Self {
        self.toggle_class = Some((node, class.to_string()));
        self
    }

    pub fn on_enter(mut self, signal: Signal) -> Self {
        self.on_enter = Some(signal);
        self
    }
}

/// A registered trigger with its measured range.
#[derive(Debug, Clone)]
pub struct ScrollTrigger<N> {
    pub spec: TriggerSpec<N>,
    pub animation: Option<AnimationId>,
    start: f64,
    end: f64,
    region: Region,
    killed: bool,
}

impl<N> ScrollTrigger<N> {
    pub fn new(spec: TriggerSpec<N>, animation: Option<AnimationId>) -> Self {
        Self {
            spec,
            animation,
            start: 0.0,
            end: 0.0,
            region: Region::Before,
            killed: false,
        }
    }

    /// Recomputes the scroll range from the element's document position.
    pub fn measure(&mut self, top: f64, height: f64, viewport_height: f64) {
        self.start = self.spec.start.resolve(top, height, viewport_height);
        self.end = self.spec.end.resolve(top, height, viewport_height).max(self.start);
    }

    pub fn range(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    pub fn progress(&self, scroll: f64) -> f64 {
        if self.end <= self.start {
            return if scroll > self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }

    pub fn is_active(&self) -> bool {
        self.region == Region::Inside
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    pub fn kill(&mut self) {
        self.killed = true;
    }

    /// Moves to `scroll` and reports the crossings passed on the way, in
    /// order. Jumping over the whole range reports both edges.
    pub fn update(&mut self, scroll: f64) -> Vec<Crossing> {
        if self.killed {
            return Vec::new();
        }
        let next = if scroll <= self.start {
            Region::Before
        } else if scroll < self.end {
            Region::Inside
        } else {
            Region::After
        };
        let crossings = match (self.region, next) {
            (Region::Before, Region::Inside) => vec![Crossing::Enter],
            (Region::Before, Region::After) => vec![Crossing::Enter, Crossing::Leave],
            (Region::Inside, Region::After) => vec![Crossing::Leave],
            (Region::After, Region::Inside) => vec![Crossing::EnterBack],
            (Region::After, Region::Before) => vec![Crossing::EnterBack, Crossing::LeaveBack],
            (Region::Inside, Region::Before) => vec![Crossing::LeaveBack],
            _ => Vec::new(),
        };
        self.region = next;
        crossings
    }
}
