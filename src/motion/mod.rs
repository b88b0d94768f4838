//! Tweening, timelines and scroll triggers.
//!
//! The engine keeps one [`Pose`](props::Pose) per registered element, advances
//! every live [`Timeline`] once per animation frame and writes the properties
//! that changed back through a [`Surface`](crate::surface::Surface).

pub mod easing;
pub mod engine;
pub mod props;
pub mod timeline;
pub mod trigger;
pub mod tween;

pub use easing::{Easing, Mode};
pub use engine::Engine;
pub use props::Prop;
pub use timeline::{Position, Timeline};
pub use trigger::{Anchor, Boundary, ToggleActions, TriggerSpec};
pub use tween::{Stagger, TweenVars};

/// Handle to an element (or the viewport) registered with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationId(pub(crate) usize);

/// Side effects requested by animations, handed back to the controller
/// from [`Engine::frame`].
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Open a URL in a new browsing context.
    OpenUrl(String),
    /// Count the target's text up to a value.
    CountUp { target: TargetId, to: f64 },
}
