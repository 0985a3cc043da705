//! Clock driver.
//!
//! [`TimerService`] is a background task that owns the [`TimerEngine`] and is
//! the only writer to it. Control commands arrive over a channel from any
//! number of [`TimerHandle`]s; ticks come from a one-second interval that only
//! exists while the engine is running. Both are handled by the same loop, so
//! every transition is applied whole before the next one starts, and a stop
//! (pause, completion, mode switch) drops the interval before anything else
//! is processed.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::error::{CoreError, Result};
use crate::observer::Subscribers;
use crate::timer::{Command, TimerEngine, TimerState};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const REQUEST_QUEUE: usize = 32;

enum Request {
    Apply {
        command: Command,
        reply: oneshot::Sender<TimerState>,
    },
    Snapshot {
        reply: oneshot::Sender<TimerState>,
    },
    Shutdown,
}

/// Cloneable control handle for a running [`TimerService`].
///
/// The service stops once every handle has been dropped.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    tx: mpsc::Sender<Request>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Request::Apply { command, .. } => f.debug_tuple("Apply").field(command).finish(),
            Request::Snapshot { .. } => f.write_str("Snapshot"),
            Request::Shutdown => f.write_str("Shutdown"),
        }
    }
}

impl TimerHandle {
    /// Apply `command` and return the state right after it.
    pub async fn send(&self, command: Command) -> Result<TimerState> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Apply { command, reply })
            .await
            .map_err(|_| CoreError::ServiceStopped)?;
        rx.await.map_err(|_| CoreError::ServiceStopped)
    }

    pub async fn snapshot(&self) -> Result<TimerState> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Snapshot { reply })
            .await
            .map_err(|_| CoreError::ServiceStopped)?;
        rx.await.map_err(|_| CoreError::ServiceStopped)
    }

    /// Stop the service even if other handles are still alive.
    pub async fn shutdown(&self) -> Result<()> {
        self.tx
            .send(Request::Shutdown)
            .await
            .map_err(|_| CoreError::ServiceStopped)
    }
}

pub struct TimerService {
    engine: TimerEngine,
    subscribers: Subscribers,
    rx: mpsc::Receiver<Request>,
    ticker: Option<Interval>,
}

impl TimerService {
    /// Spawn the service on the current tokio runtime.
    ///
    /// The join handle yields the engine back once all handles are dropped.
    pub fn spawn(
        engine: TimerEngine,
        subscribers: Subscribers,
    ) -> (TimerHandle, JoinHandle<TimerEngine>) {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE);
        let mut service = Self {
            engine,
            subscribers,
            rx,
            ticker: None,
        };
        service.sync_ticker();
        let task = tokio::spawn(service.run());
        (TimerHandle { tx }, task)
    }

    async fn run(mut self) -> TimerEngine {
        info!(
            mode = %self.engine.state().mode,
            subscribers = self.subscribers.len(),
            "timer service started"
        );
        loop {
            tokio::select! {
                request = self.rx.recv() => match request {
                    Some(Request::Shutdown) | None => break,
                    Some(request) => self.handle(request),
                },
                _ = next_tick(&mut self.ticker) => {
                    trace!("tick");
                    self.transition(Command::Tick);
                }
            }
        }
        info!("timer service stopped");
        self.engine
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::Apply { command, reply } => {
                debug!(?command, "applying command");
                self.transition(command);
                let _ = reply.send(self.engine.state().clone());
            }
            Request::Snapshot { reply } => {
                let _ = reply.send(self.engine.state().clone());
            }
            Request::Shutdown => {}
        }
    }

    fn transition(&mut self, command: Command) {
        let events = self.engine.apply(command);
        self.sync_ticker();
        self.subscribers.publish(&events, self.engine.state());
    }

    /// Keep exactly one interval alive while running and none otherwise.
    fn sync_ticker(&mut self) {
        match (self.engine.is_running(), self.ticker.is_some()) {
            (true, false) => {
                let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                self.ticker = Some(interval);
            }
            (false, true) => self.ticker = None,
            _ => {}
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use crate::timer::{Mode, Phase};
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Subscribers, Arc<Mutex<Vec<Event>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let subscribers = Subscribers::new().with(move |events: &[Event], _: &TimerState| {
            sink.lock().unwrap().extend_from_slice(events)
        });
        (subscribers, log)
    }

    fn engine_in(mode: Mode) -> TimerEngine {
        let mut engine = TimerEngine::new();
        engine.set_mode(mode);
        engine
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second_only_while_running() {
        let (handle, task) = TimerService::spawn(engine_in(Mode::Stopwatch), Subscribers::new());

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(handle.snapshot().await.unwrap().current_time, 0);

        handle.send(Command::Start).await.unwrap();
        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(handle.snapshot().await.unwrap().current_time, 3);

        let paused = handle.send(Command::Pause).await.unwrap();
        assert!(!paused.is_running);
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.snapshot().await.unwrap().current_time, 3);

        drop(handle);
        let engine = task.await.unwrap();
        assert_eq!(engine.state().current_time, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_waits_a_full_period_before_ticking() {
        let (handle, _task) = TimerService::spawn(engine_in(Mode::Stopwatch), Subscribers::new());
        handle.send(Command::Start).await.unwrap();
        time::sleep(Duration::from_millis(1500)).await;
        handle.send(Command::Pause).await.unwrap();
        handle.send(Command::Start).await.unwrap();
        time::sleep(Duration::from_millis(900)).await;
        assert_eq!(handle.snapshot().await.unwrap().current_time, 1);
        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(handle.snapshot().await.unwrap().current_time, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn mode_switch_stops_ticks_for_the_old_mode() {
        let (handle, _task) = TimerService::spawn(engine_in(Mode::Timer), Subscribers::new());
        handle.send(Command::Start).await.unwrap();
        time::sleep(Duration::from_millis(2500)).await;

        let state = handle
            .send(Command::SetMode { mode: Mode::Stopwatch })
            .await
            .unwrap();
        assert!(!state.is_running);
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(handle.snapshot().await.unwrap().current_time, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_completion_stops_the_driver() {
        let (subscribers, log) = recorder();
        let mut engine = TimerEngine::new();
        engine.apply(Command::SetDuration {
            hours: 0,
            minutes: 0,
            seconds: 3,
        });
        engine.set_mode(Mode::Timer);
        let (handle, _task) = TimerService::spawn(engine, subscribers);

        handle.send(Command::Start).await.unwrap();
        time::sleep(Duration::from_secs(10)).await;

        let state = handle.snapshot().await.unwrap();
        assert_eq!(state.current_time, 0);
        assert!(!state.is_running);

        let log = log.lock().unwrap();
        let ticks = log.iter().filter(|e| matches!(e, Event::Ticked { .. })).count();
        assert_eq!(ticks, 3);
        assert!(matches!(log.last(), Some(Event::TimerCompleted { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn pomodoro_phase_waits_for_explicit_start() {
        let mut engine = engine_in(Mode::Pomodoro);
        engine.set_pomodoro_settings(1, 1);
        let (handle, _task) = TimerService::spawn(engine, Subscribers::new());

        handle.send(Command::Start).await.unwrap();
        time::sleep(Duration::from_secs(90)).await;

        let state = handle.snapshot().await.unwrap();
        assert_eq!(state.phase, Phase::Break);
        assert_eq!(state.current_time, 60);
        assert!(!state.is_running);
        assert_eq!(state.completed_sessions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_returns_the_engine_while_handles_remain() {
        let (handle, task) = TimerService::spawn(engine_in(Mode::Stopwatch), Subscribers::new());
        let other = handle.clone();
        handle.send(Command::Start).await.unwrap();
        time::sleep(Duration::from_millis(2500)).await;

        handle.shutdown().await.unwrap();
        let engine = task.await.unwrap();
        assert_eq!(engine.state().current_time, 2);
        assert!(matches!(other.snapshot().await, Err(CoreError::ServiceStopped)));
    }

    #[tokio::test]
    async fn handle_errors_once_service_is_gone() {
        let (handle, task) = TimerService::spawn(TimerEngine::new(), Subscribers::new());
        task.abort();
        let _ = task.await;
        assert!(matches!(
            handle.snapshot().await,
            Err(CoreError::ServiceStopped)
        ));
    }
}
