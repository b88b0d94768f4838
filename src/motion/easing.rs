use std::f64::consts::PI;
use std::str::FromStr;

use thiserror::Error;

/// Shape of an easing curve, expressed as its ease-in form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Linear,
    /// `powerN`: `t^(N+1)`, so power1 is quadratic and power4 quintic.
    Power(u8),
    Sine,
    /// Overshoot strength, 1.70158 by default.
    Back(f64),
    Elastic { amplitude: f64, period: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    In,
    Out,
    InOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Easing {
    pub curve: Curve,
    pub mode: Mode,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown easing curve `{0}`")]
pub struct ParseEasingError(pub String);

impl Easing {
    pub const LINEAR: Easing = Easing::new(Curve::Linear, Mode::Out);

    pub const fn new(curve: Curve, mode: Mode) -> Self {
        Self { curve, mode }
    }

    pub const fn power(n: u8, mode: Mode) -> Self {
        Self::new(Curve::Power(n), mode)
    }

    pub const fn back_out(overshoot: f64) -> Self {
        Self::new(Curve::Back(overshoot), Mode::Out)
    }

    pub const fn elastic_out(amplitude: f64, period: f64) -> Self {
        Self::new(Curve::Elastic { amplitude, period }, Mode::Out)
    }

    /// Map linear progress to eased progress. Endpoints are exact so a
    /// finished tween always lands on its end value.
    pub fn apply(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self.mode {
            Mode::In => self.curve.ease_in(t),
            Mode::Out => 1.0 - self.curve.ease_in(1.0 - t),
            Mode::InOut => {
                if t < 0.5 {
                    self.curve.ease_in(t * 2.0) / 2.0
                } else {
                    1.0 - self.curve.ease_in((1.0 - t) * 2.0) / 2.0
                }
            }
        }
    }
}

impl Default for Easing {
    /// Tweens without an explicit ease use power1.out.
    fn default() -> Self {
        Easing::power(1, Mode::Out)
    }
}

impl Curve {
    fn ease_in(&self, t: f64) -> f64 {
        match *self {
            Curve::Linear => t,
            Curve::Power(n) => t.powi(i32::from(n) + 1),
            Curve::Sine => 1.0 - (t * PI / 2.0).cos(),
            Curve::Back(s) => t * t * ((s + 1.0) * t - s),
            Curve::Elastic { amplitude, period } => 1.0 - elastic_out(1.0 - t, amplitude, period),
        }
    }
}

fn elastic_out(t: f64, amplitude: f64, period: f64) -> f64 {
    let amplitude = amplitude.max(1.0);
    let period = if period > 0.0 { period } else { 0.3 };
    let phase = period / (2.0 * PI) * (1.0 / amplitude).asin();
    amplitude * 2f64.powf(-10.0 * t) * ((t - phase) * (2.0 * PI) / period).sin() + 1.0
}

impl FromStr for Easing {
    type Err = ParseEasingError;

    /// Parses names such as `none`, `power3.inOut`, `back.out(1.7)` or
    /// `elastic.out(1, 0.5)`. A bare family name means its `.out` form.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let name = raw.trim();
        let err = || ParseEasingError(raw.to_string());

        let (head, args) = match name.find('(') {
            Some(open) => {
                let close = name[open..].find(')').map(|i| open + i).ok_or_else(err)?;
                let args = name[open + 1..close]
                    .split(',')
                    .map(|a| a.trim().parse::<f64>().map_err(|_| err()))
                    .collect::<Result<Vec<_>, _>>()?;
                (&name[..open], args)
            }
            None => (name, Vec::new()),
        };

        let (family, mode) = match head.split_once('.') {
            Some((family, "in")) => (family, Mode::In),
            Some((family, "out")) => (family, Mode::Out),
            Some((family, "inOut")) => (family, Mode::InOut),
            Some(_) => return Err(err()),
            None => (head, Mode::Out),
        };

        let curve = match family {
            "none" | "linear" => Curve::Linear,
            "power1" | "quad" => Curve::Power(1),
            "power2" | "cubic" => Curve::Power(2),
            "power3" | "quart" => Curve::Power(3),
            "power4" | "quint" | "strong" => Curve::Power(4),
            "sine" => Curve::Sine,
            "back" => Curve::Back(args.first().copied().unwrap_or(1.70158)),
            "elastic" => Curve::Elastic {
                amplitude: args.first().copied().unwrap_or(1.0),
                period: args.get(1).copied().unwrap_or(0.3),
            },
            _ => return Err(err()),
        };
        Ok(Easing::new(curve, mode))
    }
}
