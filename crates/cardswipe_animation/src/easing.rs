//! Easing presets

use serde::{Deserialize, Serialize};

/// Easing function type
///
/// Serialized in snake_case, e.g. `"ease_out_quad"` or
/// `{ cubic_bezier = [0.25, 0.1, 0.25, 1.0] }`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, x1, y1, x2, y2),
        }
    }
}

/// CSS-style cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1).
fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let p = BezierAxis::new(x1, x2).solve(f64::from(t));
    BezierAxis::new(y1, y2).at(p) as f32
}

/// One coordinate of a unit cubic bezier in power form, `((a p + b) p + c) p`
#[derive(Clone, Copy, Debug)]
struct BezierAxis {
    a: f64,
    b: f64,
    c: f64,
}

impl BezierAxis {
    fn new(c1: f32, c2: f32) -> Self {
        let (c1, c2) = (f64::from(c1), f64::from(c2));
        Self {
            a: 1.0 + 3.0 * (c1 - c2),
            b: 3.0 * (c2 - 2.0 * c1),
            c: 3.0 * c1,
        }
    }

    fn at(&self, p: f64) -> f64 {
        ((self.a * p + self.b) * p + self.c) * p
    }

    fn slope(&self, p: f64) -> f64 {
        (3.0 * self.a * p + 2.0 * self.b) * p + self.c
    }

    /// Parameter `p` in [0, 1] where this axis reaches `target`.
    ///
    /// Newton steps inside a shrinking bracket; a step that leaves the
    /// bracket or stalls on a flat slope is replaced by the midpoint.
    fn solve(&self, target: f64) -> f64 {
        const TOLERANCE: f64 = 1e-7;
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        let mut p = target;
        for _ in 0..32 {
            let err = self.at(p) - target;
            if err.abs() < TOLERANCE {
                break;
            }
            if err < 0.0 {
                lo = p;
            } else {
                hi = p;
            }
            let slope = self.slope(p);
            let next = p - err / slope;
            p = if slope.abs() > TOLERANCE && next > lo && next < hi {
                next
            } else {
                (lo + hi) * 0.5
            };
        }
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 8] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::CubicBezier(0.25, 0.1, 0.25, 1.0),
    ];

    #[test]
    fn test_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
        }
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::EaseOutQuad.apply(-3.0), 0.0);
        assert_eq!(Easing::EaseOutQuad.apply(4.0), 1.0);
    }

    #[test]
    fn test_ease_out_leads_linear() {
        assert!(Easing::EaseOutQuad.apply(0.3) > 0.3);
        assert!(Easing::EaseInQuad.apply(0.3) < 0.3);
    }

    #[test]
    fn test_bezier_matches_css_ease() {
        // `ease` is (0.25, 0.1, 0.25, 1.0); it reaches ~0.8024 at half time
        let ease = Easing::CubicBezier(0.25, 0.1, 0.25, 1.0);
        assert!((ease.apply(0.5) - 0.8024).abs() < 1e-3);
        let mut last = 0.0;
        for i in 1..=20 {
            let value = ease.apply(i as f32 / 20.0);
            assert!(value >= last);
            last = value;
        }
    }

    #[test]
    fn test_linear_bezier_is_identity() {
        let linear = Easing::CubicBezier(0.0, 0.0, 1.0, 1.0);
        for i in 1..10 {
            let t = i as f32 / 10.0;
            assert!((linear.apply(t) - t).abs() < 1e-4);
        }
    }
}
