use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Interval;

use wayfarer_shared::{Scheduler, TickHandle};

/// Playback timer backed by `setInterval`.
pub struct IntervalHandle(Option<Interval>);

impl TickHandle for IntervalHandle {
    fn cancel(&mut self) {
        if let Some(interval) = self.0.take() {
            interval.cancel();
        }
    }
}

/// Each interval invokes `on_tick`, which routes the tick back into the viewer.
pub struct IntervalScheduler {
    on_tick: Rc<dyn Fn()>,
}

impl IntervalScheduler {
    pub fn new(on_tick: impl Fn() + 'static) -> Self {
        Self {
            on_tick: Rc::new(on_tick),
        }
    }
}

impl Scheduler for IntervalScheduler {
    type Handle = IntervalHandle;

    fn every(&mut self, period: Duration) -> IntervalHandle {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        let on_tick = Rc::clone(&self.on_tick);
        IntervalHandle(Some(Interval::new(millis, move || on_tick())))
    }
}
