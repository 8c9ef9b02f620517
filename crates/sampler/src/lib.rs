//! Timer-driven producer of synthetic readings.
//!
//! [`Sampler`] owns the sample window; [`spawn_sampler`] hands it to a
//! periodic task and forwards every derived view over a channel.

pub mod clock;
pub mod scheduler;
pub mod source;

pub use clock::{Clock, SteppingClock, SystemClock};
pub use scheduler::{Scheduler, TaskHandle};
pub use source::{ReplaySource, UniformSource, ValueSource};

use dash_core::reading::round_to;
use dash_core::{DerivedView, Message, Reading, ReadingSchema, Result, SampleWindow};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, trace, warn};

/// Bounded window of readings plus the view derived from its last tick.
#[derive(Debug)]
pub struct Sampler {
    window:   SampleWindow,
    schema:   ReadingSchema,
    decimals: Option<u32>,
    source:   Box<dyn ValueSource>,
    clock:    Box<dyn Clock>,
    ticks:    u64,
    current:  Option<Arc<DerivedView>>,
}

impl Sampler {
    pub fn new(
        capacity: usize,
        schema: ReadingSchema,
        source: impl ValueSource + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            window:   SampleWindow::new(capacity),
            schema,
            decimals: None,
            source:   Box::new(source),
            clock:    Box::new(clock),
            ticks:    0,
            current:  None,
        }
    }

    /// Uniform values in `[min, max]` stamped with the system clock.
    pub fn uniform(capacity: usize, schema: ReadingSchema, min: f64, max: f64, seed: Option<u64>) -> Self {
        Self::new(capacity, schema, UniformSource::new(min, max, seed), SystemClock)
    }

    /// Round every generated value to `decimals` places.
    #[must_use]
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Produce one reading, append it and return the fresh view.
    ///
    /// A clock failure abandons the tick before anything is touched.
    pub fn tick(&mut self) -> Result<Arc<DerivedView>> {
        let timestamp = self.clock.now()?;
        let raw = self.source.next_value();
        let value = match self.decimals {
            Some(d) => round_to(raw, d),
            None    => raw,
        };

        let evicted = self.window.push(Reading::new(value, timestamp));
        self.ticks += 1;

        let view = Arc::new(DerivedView::build(&self.window, &self.schema, self.ticks)?);
        self.current = Some(Arc::clone(&view));

        trace!(
            tick = self.ticks,
            value,
            %timestamp,
            evicted = evicted.is_some(),
            "sampled"
        );
        Ok(view)
    }

    /// Most recent reading.
    pub fn latest(&self) -> Result<Reading> {
        self.window.latest()
    }

    /// View of the last tick, without ticking.
    pub fn view(&self) -> Result<Arc<DerivedView>> {
        self.current
            .as_ref()
            .map(Arc::clone)
            .ok_or(dash_core::DashError::EmptyBuffer)
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    pub fn schema(&self) -> &ReadingSchema {
        &self.schema
    }

    /// Successful ticks so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Hand `sampler` to a periodic task on `scheduler` and return the channel
/// its views (and tick failures) arrive on.
///
/// The producer never waits on consumers: when the channel is full the
/// update is dropped, since the next tick supersedes it anyway. The task
/// stops once the receiver is dropped.
pub fn spawn_sampler(
    scheduler: &mut Scheduler,
    mut sampler: Sampler,
    interval: Duration,
) -> Result<mpsc::Receiver<Message>> {
    let (tx, rx) = mpsc::channel(4);

    scheduler.register_periodic_task("sampler", interval, move || {
        let msg = match sampler.tick() {
            Ok(view) => Message::ViewUpdated(view),
            Err(e) => {
                warn!("Tick abandoned: {e}");
                Message::TickFailed(e.to_string())
            }
        };

        match tx.try_send(msg) {
            Ok(()) => ControlFlow::Continue(()),
            Err(TrySendError::Full(_)) => {
                debug!("Consumer is behind; dropping update");
                ControlFlow::Continue(())
            }
            Err(TrySendError::Closed(_)) => ControlFlow::Break(()),
        }
    })?;

    Ok(rx)
}
