//! Keyframe curves
//!
//! A curve maps a normalized rate in `[0, 1]` to an eased value. Curves are
//! either one of the [`Easing`] presets or a list of Hermite keyframes with
//! explicit tangents, the format animation tools export.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::easing::Easing;

/// Problems found while validating a keyframe curve
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    #[error("curve has no keyframes")]
    Empty,

    #[error("keyframe {index} has a non-finite component")]
    NonFinite { index: usize },

    #[error("keyframe {index} at time {time} does not come after time {previous}")]
    Unordered {
        index: usize,
        time: f32,
        previous: f32,
    },
}

/// A single key on a Hermite curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKeyframe {
    pub time: f32,
    pub value: f32,
    /// Slope arriving at this key
    #[serde(default)]
    pub in_tangent: f32,
    /// Slope leaving this key
    #[serde(default)]
    pub out_tangent: f32,
}

impl CurveKeyframe {
    pub const fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }
}

/// Piecewise cubic Hermite curve
///
/// Outside the first/last key the curve holds the end value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationCurve {
    keys: Vec<CurveKeyframe>,
}

impl AnimationCurve {
    /// Build a curve, rejecting empty or unordered key lists
    pub fn new(keys: Vec<CurveKeyframe>) -> Result<Self, CurveError> {
        let curve = Self { keys };
        curve.validate()?;
        Ok(curve)
    }

    /// The default swipe curve: fast start, settles with zero slope.
    ///
    /// Keys `(0, 0)` leaving at slope 2 and `(1, 1)` arriving flat, which
    /// works out to `1 - (1 - t)^2`.
    pub fn swipe_default() -> Self {
        Self {
            keys: vec![
                CurveKeyframe::new(0.0, 0.0, 0.0, 2.0),
                CurveKeyframe::new(1.0, 1.0, 0.0, 0.0),
            ],
        }
    }

    /// Straight line from `(0, 0)` to `(1, 1)`
    pub fn linear() -> Self {
        Self {
            keys: vec![
                CurveKeyframe::new(0.0, 0.0, 1.0, 1.0),
                CurveKeyframe::new(1.0, 1.0, 1.0, 1.0),
            ],
        }
    }

    pub fn keys(&self) -> &[CurveKeyframe] {
        &self.keys
    }

    pub fn validate(&self) -> Result<(), CurveError> {
        if self.keys.is_empty() {
            return Err(CurveError::Empty);
        }
        for (index, key) in self.keys.iter().enumerate() {
            let finite = key.time.is_finite()
                && key.value.is_finite()
                && key.in_tangent.is_finite()
                && key.out_tangent.is_finite();
            if !finite {
                return Err(CurveError::NonFinite { index });
            }
            if index > 0 {
                let previous = self.keys[index - 1].time;
                if key.time <= previous {
                    return Err(CurveError::Unordered {
                        index,
                        time: key.time,
                        previous,
                    });
                }
            }
        }
        Ok(())
    }

    /// Sample the curve at `time`
    pub fn evaluate(&self, time: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // First key strictly after `time`; the clamps above keep this in 1..len
        let next = self.keys.partition_point(|k| k.time <= time);
        let k0 = &self.keys[next - 1];
        let k1 = &self.keys[next];

        let dt = k1.time - k0.time;
        let s = (time - k0.time) / dt;
        hermite(k0.value, k0.out_tangent * dt, k1.value, k1.in_tangent * dt, s)
    }
}

impl Default for AnimationCurve {
    fn default() -> Self {
        Self::swipe_default()
    }
}

/// Cubic Hermite basis evaluated at `s` in `[0, 1]`
#[inline]
fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, s: f32) -> f32 {
    let s2 = s * s;
    let s3 = s2 * s;
    (2.0 * s3 - 3.0 * s2 + 1.0) * p0
        + (s3 - 2.0 * s2 + s) * m0
        + (-2.0 * s3 + 3.0 * s2) * p1
        + (s3 - s2) * m1
}

/// The curve used to shape card motion and back-card growth
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EaseCurve {
    Preset(Easing),
    Keyframes(AnimationCurve),
}

impl EaseCurve {
    pub fn evaluate(&self, rate: f32) -> f32 {
        match self {
            EaseCurve::Preset(easing) => easing.apply(rate),
            EaseCurve::Keyframes(curve) => curve.evaluate(rate),
        }
    }

    pub fn validate(&self) -> Result<(), CurveError> {
        match self {
            EaseCurve::Preset(_) => Ok(()),
            EaseCurve::Keyframes(curve) => curve.validate(),
        }
    }
}

impl Default for EaseCurve {
    fn default() -> Self {
        EaseCurve::Keyframes(AnimationCurve::swipe_default())
    }
}

impl From<Easing> for EaseCurve {
    fn from(easing: Easing) -> Self {
        EaseCurve::Preset(easing)
    }
}

impl From<AnimationCurve> for EaseCurve {
    fn from(curve: AnimationCurve) -> Self {
        EaseCurve::Keyframes(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_default_matches_ease_out_quad() {
        let curve = AnimationCurve::swipe_default();
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            let expected = Easing::EaseOutQuad.apply(t);
            assert!(
                (curve.evaluate(t) - expected).abs() < 1e-5,
                "t={t}: {} vs {expected}",
                curve.evaluate(t)
            );
        }
    }

    #[test]
    fn test_clamps_outside_keys() {
        let curve = AnimationCurve::swipe_default();
        assert_eq!(curve.evaluate(-1.0), 0.0);
        assert_eq!(curve.evaluate(3.0), 1.0);
    }

    #[test]
    fn test_linear_curve() {
        let curve = AnimationCurve::linear();
        assert!((curve.evaluate(0.25) - 0.25).abs() < 1e-6);
        assert!((curve.evaluate(0.8) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_three_key_curve_passes_through_keys() {
        let curve = AnimationCurve::new(vec![
            CurveKeyframe::new(0.0, 0.0, 0.0, 0.0),
            CurveKeyframe::new(0.5, 0.8, 0.0, 0.0),
            CurveKeyframe::new(1.0, 1.0, 0.0, 0.0),
        ])
        .unwrap();
        assert!((curve.evaluate(0.5) - 0.8).abs() < 1e-6);
        // Flat tangents give a smoothstep between keys
        assert!((curve.evaluate(0.25) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_validation() {
        assert_eq!(AnimationCurve::new(vec![]).unwrap_err(), CurveError::Empty);

        let err = AnimationCurve::new(vec![
            CurveKeyframe::new(0.5, 0.0, 0.0, 0.0),
            CurveKeyframe::new(0.5, 1.0, 0.0, 0.0),
        ])
        .unwrap_err();
        assert!(matches!(err, CurveError::Unordered { index: 1, .. }));

        let err = AnimationCurve::new(vec![CurveKeyframe::new(0.0, f32::NAN, 0.0, 0.0)])
            .unwrap_err();
        assert_eq!(err, CurveError::NonFinite { index: 0 });
    }

    #[test]
    fn test_single_key_is_constant() {
        let curve = AnimationCurve::new(vec![CurveKeyframe::new(0.3, 0.7, 0.0, 0.0)]).unwrap();
        assert_eq!(curve.evaluate(0.0), 0.7);
        assert_eq!(curve.evaluate(1.0), 0.7);
    }

    #[test]
    fn test_ease_curve_from_toml() {
        #[derive(Deserialize)]
        struct Holder {
            curve: EaseCurve,
        }

        let preset: Holder = toml::from_str(r#"curve = { preset = "ease_out_cubic" }"#).unwrap();
        assert_eq!(preset.curve, EaseCurve::Preset(Easing::EaseOutCubic));

        let keyed: Holder = toml::from_str(
            r#"
            [curve.keyframes]
            keys = [
                { time = 0.0, value = 0.0, out_tangent = 2.0 },
                { time = 1.0, value = 1.0 },
            ]
            "#,
        )
        .unwrap();
        assert_eq!(keyed.curve, EaseCurve::default());
    }
}
