use std::time::Duration;

use crate::bounds::YearBounds;

/// A live recurring timer. `cancel` must be idempotent; no tick may fire
/// after it returns.
pub trait TickHandle {
    fn cancel(&mut self);
}

/// Creates recurring timers that deliver ticks back to the viewer.
pub trait Scheduler {
    type Handle: TickHandle;

    fn every(&mut self, period: Duration) -> Self::Handle;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Moved one year forward to the contained year.
    Advanced(i32),
    /// Was already at the upper bound; playback stopped.
    Finished,
    /// Not playing; nothing happened.
    Idle,
}

/// Play/pause state machine advancing the selected year once per tick.
///
/// The driver is `Playing` exactly while it holds a timer handle.
#[derive(Debug)]
pub struct PlaybackDriver<H> {
    timer: Option<H>,
    period: Duration,
}

impl<H: TickHandle> PlaybackDriver<H> {
    pub fn new(period: Duration) -> Self {
        Self {
            timer: None,
            period,
        }
    }

    pub fn state(&self) -> PlaybackState {
        if self.timer.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Stopped
        }
    }

    pub fn is_playing(&self) -> bool {
        self.timer.is_some()
    }

    /// Rewind to the lower bound and start the timer. Returns `false` (and
    /// does nothing) when already playing.
    pub fn start<S>(&mut self, scheduler: &mut S, bounds: YearBounds, year: &mut i32) -> bool
    where
        S: Scheduler<Handle = H>,
    {
        if self.is_playing() {
            return false;
        }
        *year = bounds.min;
        self.timer = Some(scheduler.every(self.period));
        tracing::debug!(from = bounds.min, to = bounds.max, "playback started");
        true
    }

    /// Cancel the timer. Returns whether playback was running.
    pub fn stop(&mut self) -> bool {
        match self.timer.take() {
            Some(mut timer) => {
                timer.cancel();
                tracing::debug!("playback stopped");
                true
            }
            None => false,
        }
    }

    pub fn tick(&mut self, bounds: YearBounds, year: &mut i32) -> TickOutcome {
        if !self.is_playing() {
            return TickOutcome::Idle;
        }
        if *year >= bounds.max {
            self.stop();
            return TickOutcome::Finished;
        }
        *year += 1;
        TickOutcome::Advanced(*year)
    }

    /// Stop if playing, then rewind to the lower bound.
    pub fn reset(&mut self, bounds: YearBounds, year: &mut i32) {
        self.stop();
        *year = bounds.min;
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{ManualHandle, ManualScheduler};
    use super::*;

    fn driver() -> PlaybackDriver<ManualHandle> {
        PlaybackDriver::new(Duration::from_millis(1500))
    }

    #[test]
    fn start_rewinds_and_schedules_once() {
        let mut scheduler = ManualScheduler::default();
        let mut playback = driver();
        let bounds = YearBounds::new(1998, 2006);
        let mut year = 2003;

        assert!(playback.start(&mut scheduler, bounds, &mut year));
        assert_eq!(year, 1998);
        assert_eq!(playback.state(), PlaybackState::Playing);
        assert_eq!(
            scheduler.last_period.get(),
            Some(Duration::from_millis(1500))
        );

        year = 2001;
        assert!(!playback.start(&mut scheduler, bounds, &mut year));
        assert_eq!(year, 2001);
        assert_eq!(scheduler.started.get(), 1);
    }

    #[test]
    fn reaches_max_after_span_ticks_then_stops() {
        let mut scheduler = ManualScheduler::default();
        let mut playback = driver();
        let bounds = YearBounds::new(1998, 2006);
        let mut year = 0;
        playback.start(&mut scheduler, bounds, &mut year);

        for expected in 1999..=2006 {
            assert_eq!(
                playback.tick(bounds, &mut year),
                TickOutcome::Advanced(expected)
            );
        }
        assert_eq!(year, bounds.max);
        assert_eq!(playback.tick(bounds, &mut year), TickOutcome::Finished);
        assert_eq!(playback.state(), PlaybackState::Stopped);
        assert_eq!(scheduler.live(), 0);

        assert_eq!(playback.tick(bounds, &mut year), TickOutcome::Idle);
        assert_eq!(year, 2006);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut scheduler = ManualScheduler::default();
        let mut playback = driver();
        let mut year = 0;
        playback.start(&mut scheduler, YearBounds::new(1980, 2030), &mut year);

        assert!(playback.stop());
        assert!(!playback.stop());
        assert_eq!(scheduler.cancelled.get(), 1);
        assert_eq!(
            playback.tick(YearBounds::new(1980, 2030), &mut year),
            TickOutcome::Idle
        );
        assert_eq!(year, 1980);
    }

    #[test]
    fn reset_stops_and_rewinds_in_either_state() {
        let mut scheduler = ManualScheduler::default();
        let mut playback = driver();
        let bounds = YearBounds::new(1998, 2006);
        let mut year = 2004;

        playback.reset(bounds, &mut year);
        assert_eq!(year, 1998);
        assert_eq!(scheduler.cancelled.get(), 0);

        playback.start(&mut scheduler, bounds, &mut year);
        playback.tick(bounds, &mut year);
        playback.tick(bounds, &mut year);
        playback.reset(bounds, &mut year);
        assert_eq!(year, 1998);
        assert_eq!(playback.state(), PlaybackState::Stopped);
        assert_eq!(scheduler.live(), 0);
    }

    #[test]
    fn single_year_range_finishes_after_one_step() {
        let mut scheduler = ManualScheduler::default();
        let mut playback = driver();
        let bounds = YearBounds::new(2000, 2001);
        let mut year = 0;
        playback.start(&mut scheduler, bounds, &mut year);
        assert_eq!(playback.tick(bounds, &mut year), TickOutcome::Advanced(2001));
        assert_eq!(playback.tick(bounds, &mut year), TickOutcome::Finished);
    }
}
