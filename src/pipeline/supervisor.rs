//! Pipeline supervisor: reacts to room events, gates the first qualifying
//! track, and owns stage lifetime until the session closes.
//!
//! The supervisor runs as its own event loop thread fed by a channel of
//! [`RoomEvent`]s, so the room adapter's callbacks stay short and
//! non-blocking. Exactly one pipeline session is ever created per
//! supervisor: the first subscribed track of the configured kind wins, and
//! every later qualifying track is observed but ignored.

use crate::defaults;
use crate::pipeline::cancel::{CancelHandle, cancel_pair};
use crate::pipeline::consumer::{Consumer, ConsumerExit};
use crate::pipeline::handoff::handoff;
use crate::pipeline::producer::{Producer, ProducerExit};
use crate::pipeline::report::{ErrorReporter, LogReporter};
use crate::pipeline::stats::{PipelineStats, StatsSnapshot};
use crate::pipeline::transform::FrameTransform;
use crate::room::events::{RoomEvent, TrackKind};
use crate::room::sink::FrameSink;
use crate::room::source::TrackStreams;
use crossbeam_channel::{Receiver, Sender, bounded, select};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const PRODUCER: &str = "producer";
const CONSUMER: &str = "consumer";

/// Lifecycle of a supervised pipeline session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// No track claimed yet.
    Idle,
    /// Producer and consumer are running.
    Active,
    /// One stage has stopped; the other is winding down.
    Draining,
    /// Both stages are confirmed stopped. Terminal.
    Closed,
}

/// Atomically shared state cell, readable from the handle.
struct SharedState(AtomicU8);

impl SharedState {
    fn new() -> Self {
        Self(AtomicU8::new(SupervisorState::Idle as u8))
    }

    fn load(&self) -> SupervisorState {
        match self.0.load(Ordering::SeqCst) {
            0 => SupervisorState::Idle,
            1 => SupervisorState::Active,
            2 => SupervisorState::Draining,
            _ => SupervisorState::Closed,
        }
    }

    fn store(&self, state: SupervisorState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }
}

/// Configuration for the supervisor.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Track kind that qualifies for the pipeline.
    pub track_kind: TrackKind,
    /// Hand-off queue capacity.
    pub queue_capacity: usize,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            track_kind: TrackKind::Video,
            queue_capacity: defaults::QUEUE_CAPACITY,
        }
    }
}

/// Completion notification from one stage thread.
#[derive(Debug, Clone, Copy)]
enum StageExit {
    Producer(ProducerExit),
    Consumer(ConsumerExit),
}

/// What woke the supervisor loop.
enum Wake {
    Room(RoomEvent),
    Stage(StageExit),
}

/// One outstanding stage task.
struct StageTask {
    name: &'static str,
    cancel: CancelHandle,
    handle: JoinHandle<()>,
}

/// Registry of outstanding stage tasks for one session.
///
/// Scoped to the supervisor instance and torn down deterministically when
/// the session closes; an entry is removed when the stage's completion is
/// observed.
#[derive(Default)]
struct TaskRegistry {
    tasks: Vec<StageTask>,
}

impl TaskRegistry {
    fn register(&mut self, name: &'static str, cancel: CancelHandle, handle: JoinHandle<()>) {
        self.tasks.push(StageTask {
            name,
            cancel,
            handle,
        });
    }

    fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Requests cancellation of one task, if still registered.
    fn cancel(&self, name: &str) {
        if let Some(task) = self.tasks.iter().find(|t| t.name == name) {
            task.cancel.cancel();
        }
    }

    /// Requests cancellation of every registered task.
    fn cancel_all(&self) {
        for task in &self.tasks {
            task.cancel.cancel();
        }
    }

    /// Removes a task whose completion has been observed, joining its
    /// thread to surface panics.
    fn complete(&mut self, name: &str) {
        if let Some(pos) = self.tasks.iter().position(|t| t.name == name) {
            let task = self.tasks.remove(pos);
            if let Err(panic_info) = task.handle.join() {
                log::error!("{} stage panicked: {}", task.name, panic_message(&panic_info));
            }
        }
    }

    /// Joins all remaining tasks, detaching stragglers after the deadline.
    fn join_all(&mut self, deadline: Duration, poll_interval: Duration) {
        let end = Instant::now() + deadline;
        loop {
            let mut remaining = Vec::new();
            for task in self.tasks.drain(..) {
                if task.handle.is_finished() {
                    if let Err(panic_info) = task.handle.join() {
                        log::error!(
                            "{} stage panicked: {}",
                            task.name,
                            panic_message(&panic_info)
                        );
                    }
                } else {
                    remaining.push(task);
                }
            }
            self.tasks = remaining;

            if self.tasks.is_empty() {
                break;
            }
            if Instant::now() >= end {
                log::warn!(
                    "shutdown timeout: {} stage task(s) still running, detaching",
                    self.tasks.len()
                );
                // Dropping the handles detaches the threads; they die with
                // the process.
                self.tasks.clear();
                break;
            }
            thread::sleep(poll_interval);
        }
    }
}

fn panic_message(panic_info: &Box<dyn std::any::Any + Send>) -> String {
    panic_info
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic_info.downcast_ref::<String>().map(|s| s.as_str()))
        .unwrap_or("unknown panic")
        .to_string()
}

/// Builds supervised pipelines.
pub struct Supervisor {
    config: SupervisorConfig,
    reporter: Arc<dyn ErrorReporter>,
}

impl Supervisor {
    /// Creates a supervisor with the default error reporter.
    pub fn new(config: SupervisorConfig) -> Self {
        Self {
            config,
            reporter: Arc::new(LogReporter),
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Starts the supervisor event loop.
    ///
    /// `streams` opens the frame stream once a qualifying track is claimed;
    /// `transform` and `sink` move into the single pipeline session the
    /// supervisor will ever create.
    pub fn start(
        self,
        streams: Box<dyn TrackStreams>,
        transform: Box<dyn FrameTransform>,
        sink: Box<dyn FrameSink>,
    ) -> SupervisorHandle {
        let (event_tx, event_rx) = bounded(defaults::EVENT_BUFFER);
        // One message per stage over the session lifetime.
        let (exit_tx, exit_rx) = bounded(2);
        let stats = Arc::new(PipelineStats::default());
        let state = Arc::new(SharedState::new());

        let event_loop = SupervisorLoop {
            config: self.config,
            reporter: self.reporter,
            stats: stats.clone(),
            state: state.clone(),
            streams,
            parts: Some((transform, sink)),
            claimed: None,
            registry: TaskRegistry::default(),
            event_rx,
            exit_tx,
            exit_rx,
        };
        let thread = thread::spawn(move || event_loop.run());

        SupervisorHandle {
            event_tx,
            state,
            stats,
            thread: Some(thread),
        }
    }
}

/// Handle to a running supervisor.
pub struct SupervisorHandle {
    event_tx: Sender<RoomEvent>,
    state: Arc<SharedState>,
    stats: Arc<PipelineStats>,
    thread: Option<JoinHandle<()>>,
}

impl SupervisorHandle {
    /// Delivers a room event. Never blocks the caller; events beyond the
    /// channel backlog are dropped with a warning.
    pub fn deliver(&self, event: RoomEvent) {
        if self.event_tx.try_send(event).is_err() {
            log::warn!("room event dropped: supervisor not accepting events");
        }
    }

    /// Current supervisor state.
    pub fn state(&self) -> SupervisorState {
        self.state.load()
    }

    /// Shared session counters.
    pub fn stats(&self) -> Arc<PipelineStats> {
        self.stats.clone()
    }

    /// Waits until the supervisor reaches `Closed`, up to `timeout`.
    /// Returns true if it closed in time.
    pub fn wait_closed(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state.load() != SupervisorState::Closed {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
        true
    }

    /// Signals disconnect, joins the supervisor, and returns the final
    /// counters. Remaining stage tasks are cancelled as part of the close.
    pub fn shutdown(mut self) -> StatsSnapshot {
        self.deliver(RoomEvent::Disconnected);
        if let Some(handle) = self.thread.take() {
            // The close path itself may wait up to the stage join deadline.
            let deadline = Instant::now() + defaults::SHUTDOWN_JOIN_DEADLINE * 3;
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(defaults::SHUTDOWN_POLL_INTERVAL);
            }
            if handle.is_finished() {
                if let Err(panic_info) = handle.join() {
                    log::error!("supervisor thread panicked: {}", panic_message(&panic_info));
                }
            } else {
                log::warn!("shutdown timeout: supervisor still running, detaching");
            }
        }
        self.stats.snapshot()
    }
}

/// The supervisor's event loop state, owned by its thread.
struct SupervisorLoop {
    config: SupervisorConfig,
    reporter: Arc<dyn ErrorReporter>,
    stats: Arc<PipelineStats>,
    state: Arc<SharedState>,
    streams: Box<dyn TrackStreams>,
    /// Transform and sink for the one session this supervisor may create.
    /// Taken on claim; the emptied option doubles as the claimed flag for
    /// pipeline construction.
    parts: Option<(Box<dyn FrameTransform>, Box<dyn FrameSink>)>,
    /// Sid of the claimed track.
    claimed: Option<String>,
    registry: TaskRegistry,
    event_rx: Receiver<RoomEvent>,
    exit_tx: Sender<StageExit>,
    exit_rx: Receiver<StageExit>,
}

impl SupervisorLoop {
    fn run(mut self) {
        log::debug!(
            "supervisor start (kind={}, queue capacity {})",
            self.config.track_kind,
            self.config.queue_capacity
        );
        loop {
            let wake = select! {
                recv(self.event_rx) -> msg => match msg {
                    Ok(event) => Wake::Room(event),
                    // Handle dropped without an explicit disconnect.
                    Err(_) => Wake::Room(RoomEvent::Disconnected),
                },
                recv(self.exit_rx) -> msg => match msg {
                    Ok(exit) => Wake::Stage(exit),
                    // Unreachable: this loop owns a sender clone.
                    Err(_) => Wake::Room(RoomEvent::Disconnected),
                },
            };
            match wake {
                Wake::Room(event) => self.on_room_event(event),
                Wake::Stage(exit) => self.on_stage_exit(exit),
            }
            if self.state.load() == SupervisorState::Closed {
                break;
            }
        }
        log::debug!("supervisor end");
    }

    fn on_room_event(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::TrackSubscribed { sid, kind } => {
                log::info!("track subscribed: {} ({})", sid, kind);
                if kind != self.config.track_kind {
                    return;
                }
                if self.state.load() != SupervisorState::Idle {
                    // First-wins: later qualifying tracks are not an error,
                    // they are simply not processed.
                    log::debug!("ignoring additional {} track {}", kind, sid);
                    return;
                }
                self.claim(sid);
            }
            RoomEvent::TrackUnsubscribed { sid } => {
                // Observed for the logs; the pipeline keeps running until
                // its source reports end of stream or the session ends.
                log::info!("track unsubscribed: {}", sid);
            }
            RoomEvent::Disconnected => {
                log::info!("session disconnected");
                self.close();
            }
        }
    }

    /// Claims `sid` as the session's input track and spawns both stages.
    fn claim(&mut self, sid: String) {
        let Some((transform, sink)) = self.parts.take() else {
            return;
        };
        let source = match self.streams.open(&sid) {
            Ok(source) => source,
            Err(e) => {
                // The track could not be opened, so it never counts as
                // claimed; a later qualifying track may still win.
                log::error!("{}", e);
                self.parts = Some((transform, sink));
                return;
            }
        };
        log::info!(
            "{} is the first received {} track",
            sid,
            self.config.track_kind
        );

        let (queue_tx, queue_rx) = handoff(self.config.queue_capacity);
        let (producer_cancel, producer_signal) = cancel_pair();
        let (consumer_cancel, consumer_signal) = cancel_pair();

        let producer = Producer::new(source, queue_tx, self.stats.clone(), producer_signal);
        let consumer = Consumer::new(
            queue_rx,
            transform,
            sink,
            self.stats.clone(),
            consumer_signal,
            self.reporter.clone(),
        );

        let exit_tx = self.exit_tx.clone();
        let producer_handle = thread::spawn(move || {
            let exit = producer.run();
            if exit_tx.send(StageExit::Producer(exit)).is_err() {
                // Supervisor already gone.
            }
        });
        let exit_tx = self.exit_tx.clone();
        let consumer_handle = thread::spawn(move || {
            let exit = consumer.run();
            if exit_tx.send(StageExit::Consumer(exit)).is_err() {
                // Supervisor already gone.
            }
        });

        self.registry
            .register(PRODUCER, producer_cancel, producer_handle);
        self.registry
            .register(CONSUMER, consumer_cancel, consumer_handle);
        self.claimed = Some(sid);
        self.stats.record_session();
        self.state.store(SupervisorState::Active);
    }

    fn on_stage_exit(&mut self, exit: StageExit) {
        match exit {
            StageExit::Producer(reason) => {
                self.registry.complete(PRODUCER);
                if self.state.load() == SupervisorState::Active {
                    // Fast teardown over full drain: the consumer is
                    // cancelled right away, so a frame still queued here
                    // may never be delivered.
                    log::info!("producer finished ({:?}); cancelling consumer", reason);
                    self.state.store(SupervisorState::Draining);
                    self.registry.cancel(CONSUMER);
                }
            }
            StageExit::Consumer(reason) => {
                self.registry.complete(CONSUMER);
                log::info!("consumer finished ({:?})", reason);
                if self.state.load() == SupervisorState::Active {
                    // Consumer went first; the producer has nowhere left to
                    // deliver.
                    self.state.store(SupervisorState::Draining);
                    self.registry.cancel(PRODUCER);
                }
            }
        }
        if self.claimed.is_some()
            && self.registry.is_empty()
            && self.state.load() != SupervisorState::Closed
        {
            self.close();
        }
    }

    /// Cancels and joins everything outstanding, then enters `Closed`.
    fn close(&mut self) {
        self.registry.cancel_all();
        self.registry.join_all(
            defaults::SHUTDOWN_JOIN_DEADLINE,
            defaults::SHUTDOWN_POLL_INTERVAL,
        );
        self.state.store(SupervisorState::Closed);
        log::info!("pipeline closed");
    }
}
