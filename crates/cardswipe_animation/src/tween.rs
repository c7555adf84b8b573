//! Time-driven position tweens

use std::time::Duration;

use cardswipe_core::Vec2;

use crate::curve::EaseCurve;

/// Moves a position from `from` to `to` between two absolute timestamps.
///
/// The tween holds no running state besides its endpoints: sampling at a
/// given `now` is pure, so a superseded tween can simply be dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveAnimation {
    from: Vec2,
    to: Vec2,
    start: Duration,
    end: Duration,
}

impl MoveAnimation {
    pub fn new(from: Vec2, to: Vec2, start: Duration, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            end: start.saturating_add(duration),
        }
    }

    pub fn from(&self) -> Vec2 {
        self.from
    }

    pub fn to(&self) -> Vec2 {
        self.to
    }

    pub fn start(&self) -> Duration {
        self.start
    }

    pub fn end(&self) -> Duration {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Time left until `end`; zero once finished
    pub fn remaining(&self, now: Duration) -> Duration {
        self.end.saturating_sub(now)
    }

    /// True once `now` has reached the end timestamp
    pub fn is_finished(&self, now: Duration) -> bool {
        self.remaining(now).is_zero()
    }

    /// Linear progress in `[0, 1]`
    pub fn rate(&self, now: Duration) -> f32 {
        let duration = self.duration();
        if duration.is_zero() {
            return 1.0;
        }
        let left = self.remaining(now).as_secs_f64() / duration.as_secs_f64();
        (1.0 - left.clamp(0.0, 1.0)) as f32
    }

    /// Position at `now`, shaped by `curve`; exactly `to` once finished
    pub fn sample(&self, now: Duration, curve: &EaseCurve) -> Vec2 {
        if self.is_finished(now) {
            return self.to;
        }
        Vec2::lerp(self.from, self.to, curve.evaluate(self.rate(now)))
    }
}
