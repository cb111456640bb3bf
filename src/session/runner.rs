//! Session controller: camera lifecycle, frame pump and render tick.
//!
//! [`SessionController`] owns the exercise engine and is its only mutator.
//! It responds to [`SessionCommand`]s received over a `tokio::sync::mpsc`
//! channel.
//!
//! # Flow
//!
//! ```text
//! SessionCommand::Start
//!   └─▶ Camera::acquire                       [CameraRequested]
//!         ├─ Err → keep Ready, no stats       [CameraFailed]
//!         └─ Ok  → Exercise::start, spawn pump [Running]
//!
//! frame pump task (owns camera + detector)
//!   loop: next_frame → detect → HandEvent ──mpsc──▶ controller
//!
//! render tick (interval, render_fps)
//!   └─▶ drain HandEvents in order → classify → Exercise::update
//!         ├─ Outcome → StatRecord → spawned StatsReporter::report
//!         └─ terminal phase → stop pump       [Finished]
//!
//! SessionCommand::Stop
//!   └─▶ stop pump, release camera, Exercise::stop [Stopped]
//! ```
//!
//! The pump awaits each detection before grabbing the next frame, so at most
//! one inference is in flight and a slow consumer back-pressures the camera.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

use crate::config::{AppConfig, SubjectConfig};
use crate::exercise::{Exercise, Outcome};
use crate::gesture::{GestureClassifier, GestureFacts};
use crate::i18n::Translator;
use crate::landmarks::{Camera, DetectorError, HandDetector, HandFrame};
use crate::stats::{StatRecord, StatsReporter};

use super::state::{
    lock_state, new_shared_state, Controls, SessionState, SessionStatus, SharedState,
};

/// Detections buffered between two render ticks.
const EVENT_BUFFER: usize = 64;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// User commands (the Start / Restart / Stop buttons).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    /// Reset the engine; keeps the camera if already running.
    Restart,
    Stop,
}

/// Frame pump → controller.
#[derive(Debug)]
pub enum HandEvent {
    /// One processed frame; `hand` is `None` when no hand was found.
    Detected {
        hand: Option<HandFrame>,
        at: Instant,
    },
    Failed(DetectorError),
    /// The camera produced no more frames.
    Ended,
}

// ---------------------------------------------------------------------------
// Frame pump
// ---------------------------------------------------------------------------

struct Pump<C, D> {
    stop_tx: oneshot::Sender<()>,
    events: mpsc::Receiver<HandEvent>,
    handle: JoinHandle<(C, D)>,
}

/// Grab → detect → send, one frame at a time, until stopped, the stream
/// ends, detection fails or the controller hangs up.  Always releases the
/// camera and hands both devices back.
async fn pump_frames<C: Camera, D: HandDetector>(
    mut camera: C,
    detector: D,
    tx: mpsc::Sender<HandEvent>,
    mut stop: oneshot::Receiver<()>,
) -> (C, D) {
    loop {
        let frame = tokio::select! {
            biased;
            _ = &mut stop => break,
            frame = camera.next_frame() => frame,
        };
        let Some(frame) = frame else {
            let _ = tx.send(HandEvent::Ended).await;
            break;
        };

        let detected = tokio::select! {
            biased;
            _ = &mut stop => break,
            result = detector.detect(&frame) => result,
        };
        let (event, fatal) = match detected {
            Ok(hand) => (
                HandEvent::Detected {
                    hand,
                    at: Instant::now(),
                },
                false,
            ),
            Err(e) => (HandEvent::Failed(e), true),
        };
        if tx.send(event).await.is_err() || fatal {
            break;
        }
    }

    camera.release();
    (camera, detector)
}

/// Poll `state` every `poll` until the session has run and stopped, then
/// return a snapshot.  A controller that has not picked up `Start` yet is
/// still `Idle` and keeps the wait going.
pub async fn settled(state: &SharedState, poll: Duration) -> SessionState {
    loop {
        {
            let st = lock_state(state);
            if st.status.is_settled() {
                return st.clone();
            }
        }
        tokio::time::sleep(poll).await;
    }
}

// ---------------------------------------------------------------------------
// SessionController
// ---------------------------------------------------------------------------

/// Drives one exercise over a camera + detector pair.
///
/// Create with [`SessionController::new`], keep a handle from
/// [`state`](Self::state) for rendering, then spawn [`run`](Self::run).
///
/// ```rust,no_run
/// use std::time::Duration;
/// use therahand::config::AppConfig;
/// use therahand::exercise::{Exercise, ExerciseKind};
/// use therahand::landmarks::{replay, Recording};
/// use therahand::session::{SessionCommand, SessionController};
/// use therahand::stats::DisabledReporter;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let exercise = Exercise::from_config(ExerciseKind::Catch, &config, None);
/// let (camera, detector) = replay(Recording::default(), Duration::from_millis(33));
///
/// let controller = SessionController::new(
///     &config,
///     exercise,
///     camera,
///     detector,
///     std::sync::Arc::new(DisabledReporter),
/// );
/// let state = controller.state();
///
/// let (tx, rx) = tokio::sync::mpsc::channel(8);
/// tokio::spawn(controller.run(rx));
/// tx.send(SessionCommand::Start).await.unwrap();
/// # let _ = state;
/// # }
/// ```
pub struct SessionController<C, D> {
    state: SharedState,
    exercise: Exercise,
    classifier: GestureClassifier,
    reporter: Arc<dyn StatsReporter>,
    subject: SubjectConfig,
    translator: Translator,
    tick: Duration,
    /// Devices while the pump is not running.
    devices: Option<(C, D)>,
    pump: Option<Pump<C, D>>,
    latest: Option<GestureFacts>,
    reports: JoinSet<()>,
}

impl<C, D> SessionController<C, D>
where
    C: Camera + 'static,
    D: HandDetector + 'static,
{
    pub fn new(
        config: &AppConfig,
        exercise: Exercise,
        camera: C,
        detector: D,
        reporter: Arc<dyn StatsReporter>,
    ) -> Self {
        let classifier = GestureClassifier::new(&config.canvas, exercise.kind().pointer_anchor());
        let fps = config.session.render_fps.max(1);
        Self {
            state: new_shared_state(exercise.clone()),
            exercise,
            classifier,
            reporter,
            subject: config.subject.clone(),
            translator: Translator::empty(),
            tick: Duration::from_secs(1) / fps,
            devices: Some((camera, detector)),
            pump: None,
            latest: None,
            reports: JoinSet::new(),
        }
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self.set_status(SessionStatus::Idle, None);
        self
    }

    /// Handle for readers (renderer, CLI).
    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run until `commands` is closed, then stop the session and wait for
    /// in-flight stats reports.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) {
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
                _ = ticker.tick(), if self.pump.is_some() => self.on_tick().await,
            }
        }

        log::info!("session: command channel closed, shutting down");
        if self.pump.is_some() {
            self.stop(SessionStatus::Stopped).await;
        }
        while self.reports.join_next().await.is_some() {}
    }

    async fn handle(&mut self, command: SessionCommand) {
        log::debug!("session: {command:?}");
        match command {
            SessionCommand::Start => self.start().await,
            SessionCommand::Restart => {
                if self.pump.is_some() {
                    self.exercise.start(Instant::now());
                    self.latest = None;
                    self.publish();
                } else {
                    self.start().await;
                }
            }
            SessionCommand::Stop => self.stop(SessionStatus::Stopped).await,
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    async fn start(&mut self) {
        if self.pump.is_some() {
            log::debug!("session: already running");
            return;
        }
        let Some((mut camera, detector)) = self.devices.take() else {
            log::error!("session: camera and detector were lost");
            return;
        };

        self.set_status(SessionStatus::CameraRequested, None);
        if let Err(e) = camera.acquire().await {
            log::error!("session: {e}");
            camera.release();
            self.devices = Some((camera, detector));
            self.set_status(SessionStatus::CameraFailed, Some(e.to_string()));
            return;
        }

        self.exercise.start(Instant::now());
        self.latest = None;

        let (tx, events) = mpsc::channel(EVENT_BUFFER);
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(pump_frames(camera, detector, tx, stop_rx));
        self.pump = Some(Pump {
            stop_tx,
            events,
            handle,
        });

        log::info!("session: {} started", self.exercise.kind());
        self.set_status(SessionStatus::Running, None);
    }

    /// Stop the pump (if any), get the devices back, leave the playthrough.
    async fn stop(&mut self, status: SessionStatus) {
        self.halt_pump().await;
        if let Some(outcome) = self.exercise.stop(Instant::now()) {
            self.emit(outcome);
        }
        self.set_status(status, None);
    }

    async fn halt_pump(&mut self) {
        let Some(Pump {
            stop_tx,
            events,
            handle,
        }) = self.pump.take()
        else {
            return;
        };

        // Unblock a pump waiting on a full channel, then signal it.
        drop(events);
        let _ = stop_tx.send(());

        match handle.await {
            Ok(devices) => self.devices = Some(devices),
            Err(e) => log::error!("session: frame pump task failed: {e}"),
        }
    }

    // -----------------------------------------------------------------------
    // Render tick
    // -----------------------------------------------------------------------

    async fn on_tick(&mut self) {
        let mut fresh = false;

        loop {
            let Some(pump) = self.pump.as_mut() else {
                return;
            };
            match pump.events.try_recv() {
                Ok(HandEvent::Detected { hand, at }) => {
                    fresh = true;
                    self.latest = self.classifier.classify(hand.as_ref());
                    if self.apply(at).await {
                        return;
                    }
                }
                Ok(HandEvent::Failed(e)) => {
                    log::error!("session: {e}");
                    self.halt_pump().await;
                    if let Some(outcome) = self.exercise.stop(Instant::now()) {
                        self.emit(outcome);
                    }
                    self.set_status(SessionStatus::DetectorFailed, Some(e.to_string()));
                    return;
                }
                Ok(HandEvent::Ended) | Err(TryRecvError::Disconnected) => {
                    log::info!("session: camera stream ended");
                    self.stop(SessionStatus::StreamEnded).await;
                    return;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        // No new detection: stale facts keep timers and holds ticking.
        if !fresh && self.apply(Instant::now()).await {
            return;
        }
        self.publish();
    }

    /// Feed the latest facts to the engine.  `true` when the playthrough
    /// ended and the session was finished.
    async fn apply(&mut self, now: Instant) -> bool {
        if let Some(outcome) = self.exercise.update(self.latest.as_ref(), now) {
            self.emit(outcome);
        }
        if !self.exercise.phase().is_terminal() {
            return false;
        }
        self.halt_pump().await;
        log::info!(
            "session: {} finished ({})",
            self.exercise.kind(),
            self.exercise.phase().label()
        );
        self.set_status(SessionStatus::Finished, None);
        true
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Hand a record to the reporter on its own task.
    fn emit(&mut self, outcome: Outcome) {
        let record = StatRecord::new(&self.subject, self.exercise.kind(), outcome);
        log::info!("session: result {record}");
        lock_state(&self.state).last_record = Some(record.clone());

        let reporter = Arc::clone(&self.reporter);
        self.reports.spawn(async move {
            if let Err(e) = reporter.report(&record).await {
                log::warn!("session: stats report failed: {e}");
            }
        });
    }

    fn camera_active(&self) -> bool {
        self.pump.is_some() || self.devices.as_ref().is_some_and(|(c, _)| c.is_active())
    }

    fn publish(&self) {
        let mut st = lock_state(&self.state);
        st.exercise = self.exercise.clone();
        st.facts = self.latest;
        st.camera_active = self.camera_active();
    }

    fn set_status(&self, status: SessionStatus, error: Option<String>) {
        let text = match &error {
            Some(e) => format!("{} ({e})", self.translator.tr(status.key(), &[])),
            None => self.translator.tr(status.key(), &[]),
        };
        {
            let mut st = lock_state(&self.state);
            st.status = status;
            st.status_text = text;
            st.error_message = error;
            st.controls = Controls::for_status(status);
        }
        self.publish();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
