//! Piecewise-constant entry rate.

use fw_core::Tick;

use crate::error::{SimError, SimResult};

/// `rate` agents per tick (fractional rates are rounded at random each
/// tick) for `ticks` ticks.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedSegment {
    pub rate:  f64,
    pub ticks: u64,
}

impl FeedSegment {
    pub fn new(rate: f64, ticks: u64) -> Self {
        Self { rate, ticks }
    }
}

/// Ordered feed segments.  Tick `t` falls in the first segment whose
/// cumulative end is at least `t`; past the last segment the schedule is
/// exhausted and the run ends.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedSchedule {
    segments: Vec<FeedSegment>,
}

impl FeedSchedule {
    pub fn new(segments: Vec<FeedSegment>) -> SimResult<Self> {
        for (index, seg) in segments.iter().enumerate() {
            if !(seg.rate.is_finite() && seg.rate >= 0.0) {
                return Err(SimError::InvalidFeed {
                    index,
                    reason: format!("rate must be a non-negative number, got {}", seg.rate),
                });
            }
        }
        Ok(Self { segments })
    }

    /// One segment of `rate` lasting `ticks`.
    pub fn constant(rate: f64, ticks: u64) -> SimResult<Self> {
        Self::new(vec![FeedSegment::new(rate, ticks)])
    }

    pub fn segments(&self) -> &[FeedSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.total_ticks() == 0
    }

    /// Last tick covered by the schedule.
    pub fn total_ticks(&self) -> u64 {
        self.segments.iter().fold(0u64, |acc, s| acc.saturating_add(s.ticks))
    }

    /// Entry rate at `now`, `None` once the schedule is exhausted.
    pub fn rate_at(&self, now: Tick) -> Option<f64> {
        let mut end = 0u64;
        for seg in &self.segments {
            end = end.saturating_add(seg.ticks);
            if now.0 <= end && seg.ticks > 0 {
                return Some(seg.rate);
            }
        }
        None
    }
}
