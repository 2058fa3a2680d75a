//! Fixed-interval timer that runs a callback on every tick.
//!
//! Each tick's future is spawned as its own task, so a callback that outlasts
//! the period overlaps with the next one instead of delaying it.

use std::future::Future;

use tokio::{
    task::JoinHandle,
    time::{Instant, interval_at},
};
use tokio_stream::{StreamExt as _, wrappers::IntervalStream};

use crate::config::RefreshInterval;

/// Stops a timer started by [`schedule_periodic`]. Callbacks already running
/// are left to finish.
#[derive(Debug)]
pub struct CancellationHandle {
    task: JoinHandle<()>,
}

impl CancellationHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Calls `callback` every `period`, first one period from now, with no jitter or
/// backoff.
pub fn schedule_periodic<F, Fut>(period: RefreshInterval, callback: F) -> CancellationHandle
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let period = period.as_duration();
    let mut ticks = IntervalStream::new(interval_at(Instant::now() + period, period));

    let task = tokio::spawn(async move {
        while ticks.next().await.is_some() {
            tokio::spawn(callback());
        }
    });

    CancellationHandle { task }
}
