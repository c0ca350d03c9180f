use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ChartError, ChartResult};
use crate::foundation::math::FRACTION_EPS;

/// Duration the default cadence of 30 steps is calibrated against.
const REFERENCE_DURATION: Duration = Duration::from_millis(600);
const REFERENCE_STEPS: u128 = 30;
const MIN_STEPS: u32 = 6;

/// Pace of the fill-in animation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationOpts {
    /// Progress added per tick, in `(0, 1]`.
    pub step_size: f64,
    /// Time between ticks.
    #[serde(with = "duration_ms")]
    pub interval: Duration,
}

impl Default for AnimationOpts {
    fn default() -> Self {
        Self::from_duration(REFERENCE_DURATION)
    }
}

impl AnimationOpts {
    /// Validated options with an explicit step size.
    pub fn new(step_size: f64, interval: Duration) -> ChartResult<Self> {
        let opts = Self {
            step_size,
            interval,
        };
        opts.validate()?;
        Ok(opts)
    }

    /// Cadence for a total animation `duration`: at least 6 steps, 30 per 0.6 s, fractional
    /// step counts truncated.
    pub fn from_duration(duration: Duration) -> Self {
        let steps = duration.as_nanos() * REFERENCE_STEPS / REFERENCE_DURATION.as_nanos();
        let steps = u32::try_from(steps).unwrap_or(u32::MAX).max(MIN_STEPS);
        Self {
            step_size: 1.0 / f64::from(steps),
            interval: duration / steps,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.step_size.is_finite() || self.step_size <= 0.0 || self.step_size > 1.0 {
            return Err(ChartError::validation(format!(
                "step_size must be within (0, 1], got {}",
                self.step_size
            )));
        }
        if self.interval.is_zero() {
            return Err(ChartError::validation("tick interval must be > 0"));
        }
        Ok(())
    }

    /// Number of ticks from progress 0 to progress 1.
    pub fn total_ticks(&self) -> u32 {
        ((1.0 / self.step_size) - FRACTION_EPS).ceil().max(1.0) as u32
    }

    /// Progress after `ticks` ticks, snapped to exactly 1 at the end.
    pub(crate) fn progress_after(&self, ticks: u32) -> f64 {
        let p = f64::from(ticks) * self.step_size;
        if p >= 1.0 - FRACTION_EPS { 1.0 } else { p.max(0.0) }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/opts.rs"]
mod tests;
