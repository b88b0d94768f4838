//! Animatable properties and their rendering to inline CSS.

use std::collections::{BTreeMap, BTreeSet};

use super::TargetId;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Prop {
    Opacity,
    /// Translation in pixels.
    X,
    Y,
    /// Translation as a percentage of the element's own size.
    XPercent,
    YPercent,
    /// Uniform scale, written to both axes.
    Scale,
    ScaleX,
    ScaleY,
    RotateX,
    RotateY,
    /// `perspective(...)` prefix of the transform, in pixels.
    Perspective,
    /// Numeric text content, e.g. a counter.
    Text,
    /// Document scroll position; only meaningful on the viewport target.
    ScrollY,
    /// A CSS custom property such as `--glow-opacity`.
    Var(String),
}

impl Prop {
    pub fn is_transform(&self) -> bool {
        matches!(
            self,
            Prop::X
                | Prop::Y
                | Prop::XPercent
                | Prop::YPercent
                | Prop::Scale
                | Prop::ScaleX
                | Prop::ScaleY
                | Prop::RotateX
                | Prop::RotateY
                | Prop::Perspective
        )
    }

    /// Value assumed when nothing was read from the element.
    pub fn neutral(&self) -> f64 {
        match self {
            Prop::Opacity | Prop::Scale | Prop::ScaleX | Prop::ScaleY => 1.0,
            _ => 0.0,
        }
    }
}

/// Translation and per-axis scale recovered from a computed `transform`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix { x: 0.0, y: 0.0, scale_x: 1.0, scale_y: 1.0 };

    /// Parses `none`, `matrix(a, b, c, d, tx, ty)` and `matrix3d(...)` as
    /// returned by `getComputedStyle`. Anything else is the identity.
    pub fn parse(raw: &str) -> Matrix {
        let raw = raw.trim();
        let (body, is_3d) = if let Some(rest) = raw.strip_prefix("matrix3d(") {
            (rest, true)
        } else if let Some(rest) = raw.strip_prefix("matrix(") {
            (rest, false)
        } else {
            return Matrix::IDENTITY;
        };
        let values: Vec<f64> = body
            .trim_end_matches(')')
            .split(',')
            .filter_map(|v| v.trim().parse().ok())
            .collect();

        match (is_3d, values.len()) {
            (false, 6) => Matrix {
                x: values[4],
                y: values[5],
                scale_x: values[0].hypot(values[1]),
                scale_y: values[2].hypot(values[3]),
            },
            (true, 16) => Matrix {
                x: values[12],
                y: values[13],
                scale_x: values[0].hypot(values[1]),
                scale_y: values[4].hypot(values[5]),
            },
            _ => Matrix::IDENTITY,
        }
    }
}

/// Last known value of every animated property of one target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    values: BTreeMap<Prop, f64>,
}

impl Pose {
    pub fn seeded(opacity: f64, matrix: Matrix, text: Option<f64>) -> Self {
        let mut pose = Pose::default();
        pose.values.insert(Prop::Opacity, opacity);
        pose.values.insert(Prop::X, matrix.x);
        pose.values.insert(Prop::Y, matrix.y);
        pose.values.insert(Prop::ScaleX, matrix.scale_x);
        pose.values.insert(Prop::ScaleY, matrix.scale_y);
        if let Some(text) = text {
            pose.values.insert(Prop::Text, text);
        }
        pose
    }

    pub fn get(&self, prop: &Prop) -> f64 {
        match prop {
            // Uniform scale reads back as the horizontal axis.
            Prop::Scale => self.values.get(&Prop::ScaleX).copied().unwrap_or(1.0),
            _ => self.values.get(prop).copied().unwrap_or_else(|| prop.neutral()),
        }
    }

    pub fn set(&mut self, prop: &Prop, value: f64) {
        match prop {
            Prop::Scale => {
                self.values.insert(Prop::ScaleX, value);
                self.values.insert(Prop::ScaleY, value);
            }
            _ => {
                self.values.insert(prop.clone(), value);
            }
        }
    }

    /// CSS `transform` for the current values, outermost first.
    pub fn transform(&self) -> String {
        let mut parts = Vec::new();
        let perspective = self.get(&Prop::Perspective);
        if perspective > 0.0 {
            parts.push(format!("perspective({}px)", fmt(perspective)));
        }
        let (xp, yp) = (self.get(&Prop::XPercent), self.get(&Prop::YPercent));
        if xp != 0.0 || yp != 0.0 {
            parts.push(format!("translate({}%, {}%)", fmt(xp), fmt(yp)));
        }
        parts.push(format!(
            "translate3d({}px, {}px, 0px)",
            fmt(self.get(&Prop::X)),
            fmt(self.get(&Prop::Y))
        ));
        let (rx, ry) = (self.get(&Prop::RotateX), self.get(&Prop::RotateY));
        if ry != 0.0 {
            parts.push(format!("rotateY({}deg)", fmt(ry)));
        }
        if rx != 0.0 {
            parts.push(format!("rotateX({}deg)", fmt(rx)));
        }
        let (sx, sy) = (self.get(&Prop::ScaleX), self.get(&Prop::ScaleY));
        if sx != 1.0 || sy != 1.0 {
            parts.push(format!("scale({}, {})", fmt(sx), fmt(sy)));
        }
        parts.join(" ")
    }
}

/// Poses of every registered target plus the properties changed since the
/// last flush.
#[derive(Debug, Clone, Default)]
pub struct PoseTable {
    poses: Vec<Pose>,
    dirty: BTreeMap<TargetId, BTreeSet<Prop>>,
}

impl PoseTable {
    /// Makes sure `target` has a pose, padding with neutral poses.
    pub fn ensure(&mut self, target: TargetId) {
        if self.poses.len() <= target.0 {
            self.poses.resize_with(target.0 + 1, Pose::default);
        }
    }

    pub fn insert(&mut self, target: TargetId, pose: Pose) {
        self.ensure(target);
        self.poses[target.0] = pose;
    }

    pub fn pose(&self, target: TargetId) -> Option<&Pose> {
        self.poses.get(target.0)
    }

    pub fn get(&self, target: TargetId, prop: &Prop) -> f64 {
        self.poses
            .get(target.0)
            .map_or_else(|| prop.neutral(), |pose| pose.get(prop))
    }

    pub fn set(&mut self, target: TargetId, prop: &Prop, value: f64) {
        self.set_quiet(target, prop, value);
        self.dirty.entry(target).or_default().insert(prop.clone());
    }

    /// Records a value read back from the page; it is not written out again.
    pub fn set_quiet(&mut self, target: TargetId, prop: &Prop, value: f64) {
        self.ensure(target);
        self.poses[target.0].set(prop, value);
    }

    pub fn take_dirty(&mut self) -> BTreeMap<TargetId, BTreeSet<Prop>> {
        std::mem::take(&mut self.dirty)
    }
}

/// Rounds to four decimals and drops trailing zeros, so `1.0` prints as `1`.
pub fn fmt(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}
