//! Reference timer driver for hosts running on tokio
//!
//! The engine never reads a clock. This driver plays the host's part: it
//! dispatches `Tick` at the session's tick interval and delivers each
//! delayed event once its delay has elapsed since the owning state was
//! entered. Deadlines are keyed on `QuizEngine::transitions()`, so ticks
//! landing during answerFeedback do not push the feedback delay back.
//!
//! The driver subscribes to the engine and wakes on every handled event,
//! so a state the host enters directly (an `Answer`, say) is armed at once
//! rather than on the next tick.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::machine::{Event, QuizEngine, Scheduled};

/// Engine shared between the driver task and the host
pub type SharedEngine = Arc<Mutex<QuizEngine>>;

/// Wrap an engine for use with [`SessionDriver`]
pub fn shared(engine: QuizEngine) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}

/// Spawns the clock task for one engine
pub struct SessionDriver;

impl SessionDriver {
    /// Start driving `engine`. Must be called inside a tokio runtime.
    ///
    /// The task runs until [`DriverHandle::stop`] is called or the handle is dropped.
    pub fn spawn(engine: SharedEngine) -> DriverHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(run(engine, stop_rx));
        DriverHandle {
            stop: Some(stop_tx),
            task,
        }
    }
}

/// Handle to a running driver task
pub struct DriverHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl DriverHandle {
    /// Stop the clock and wait for the task to exit
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let _ = (&mut self.task).await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// A delayed event waiting for its deadline
#[derive(Debug, Clone, Copy)]
struct Armed {
    entry: u64,
    deadline: Instant,
    scheduled: Scheduled,
}

async fn run(engine: SharedEngine, mut stop: oneshot::Receiver<()>) {
    let wake = Arc::new(Notify::new());
    let (period, subscription) = {
        let mut engine = engine.lock();
        let signal = Arc::clone(&wake);
        let subscription = engine.subscribe(move |_| signal.notify_one());
        (engine.context().config.timing.tick_interval(), subscription)
    };
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut armed: Option<Armed> = None;
    // State entry whose delayed event was already delivered
    let mut fired: Option<u64> = None;

    debug!(period_ms = period.as_millis() as u64, "session driver started");

    loop {
        let (entry, scheduled) = {
            let engine = engine.lock();
            (engine.transitions(), engine.scheduled())
        };

        armed = match (armed, scheduled) {
            (Some(current), Some(_)) if current.entry == entry => Some(current),
            (_, Some(scheduled)) if fired != Some(entry) => Some(Armed {
                entry,
                deadline: Instant::now() + scheduled.delay,
                scheduled,
            }),
            _ => None,
        };

        let deadline = armed.map(|a| a.deadline);

        tokio::select! {
            _ = &mut stop => break,
            _ = wake.notified() => {}
            _ = ticker.tick() => {
                let transition = engine.lock().send(Event::Tick);
                trace!(handled = transition.handled, state = %transition.to, "tick");
            }
            _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(due) = armed.take() {
                    fired = Some(due.entry);
                    let transition = engine.lock().send(due.scheduled.event());
                    debug!(
                        kind = due.scheduled.kind.as_str(),
                        to = %transition.to,
                        "delayed transition delivered"
                    );
                }
            }
        }
    }

    engine.lock().unsubscribe(subscription);
    debug!("session driver stopped");
}
