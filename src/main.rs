//! Application entry point: replay a recorded landmark session through one
//! exercise.
//!
//! # Startup sequence
//!
//! 1. Parse command-line arguments.
//! 2. Initialise logging.
//! 3. Load [`AppConfig`] (explicit path or the platform default) and apply
//!    CLI overrides.
//! 4. Load the landmark recording and split it into a replay camera +
//!    detector.
//! 5. Build the stats reporter and translator from config.
//! 6. Create the tokio runtime (multi-thread, 2 workers).
//! 7. Spawn the [`SessionController`], send `Start` and poll the shared
//!    state until the session has started and stopped again.
//! 8. Log the result and shut the controller down (flushes stats reports).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;

use therahand::config::{AppConfig, AppPaths};
use therahand::exercise::{Exercise, ExerciseKind};
use therahand::i18n::Translator;
use therahand::landmarks::{replay, Recording};
use therahand::session::{settled, SessionCommand, SessionController, SessionState, SessionStatus};
use therahand::stats::{reporter_from_config, ResultTag};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Parser)]
#[command(name = "therahand", version, about = "Replay a recorded hand session through a therapy exercise")]
struct Args {
    /// Settings file (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// catch, drag_place, sliding_puzzle, gesture_match (or exercise_1..4).
    #[arg(long, short)]
    exercise: Option<ExerciseKind>,

    /// Landmark recording (`.jsonl`, one frame per line).  A bare file name
    /// is also looked up in the data dir's `recordings/`.
    #[arg(long, short)]
    recording: PathBuf,

    /// Replay speed in frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    #[arg(long)]
    username: Option<String>,

    #[arg(long)]
    age: Option<u32>,

    /// Translation table (`key → template` JSON).
    #[arg(long)]
    locale: Option<PathBuf>,

    /// Fixes entity placement and shuffles.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("TheraHand starting up");

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };
    if let Some(username) = args.username {
        config.subject.username = username;
    }
    if let Some(age) = args.age {
        config.subject.age = age;
    }
    if let Some(locale) = args.locale {
        config.session.locale_file = Some(locale);
    }
    let kind = args.exercise.unwrap_or(config.exercise);

    let recording_path = AppPaths::new().resolve_recording(&args.recording);
    let recording = Recording::load(&recording_path)
        .with_context(|| format!("failed to read {}", recording_path.display()))?;
    log::info!(
        "Recording loaded: {} frames from {}",
        recording.len(),
        recording_path.display()
    );
    let (camera, detector) = replay(recording, Duration::from_secs(1) / args.fps.max(1));

    let reporter = reporter_from_config(&config.stats);
    let translator = Translator::load_or_empty(&config.locale_file());

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(async move {
        let exercise = Exercise::from_config(kind, &config, args.seed);
        let controller = SessionController::new(&config, exercise, camera, detector, reporter)
            .with_translator(translator.clone());
        let state = controller.state();

        let (command_tx, command_rx) = mpsc::channel(8);
        let session = tokio::spawn(controller.run(command_rx));
        command_tx
            .send(SessionCommand::Start)
            .await
            .context("session task exited early")?;

        log::info!("Playing {kind} as {}", config.subject.username);
        let done = settled(&state, POLL_INTERVAL).await;
        summarize(&translator, &done);

        drop(command_tx);
        session.await.context("session task panicked")?;
        Ok(())
    })
}

/// Log the final status and, when a record was emitted, the result line.
fn summarize(translator: &Translator, st: &SessionState) {
    if st.status != SessionStatus::Finished {
        log::warn!("Session ended: {}", st.status_text);
    }
    let Some(record) = &st.last_record else {
        return;
    };

    let key = match record.result {
        ResultTag::Win => "result_win",
        ResultTag::Lose => "result_lose",
        ResultTag::Completed => "result_completed",
        ResultTag::Exit => "result_exit",
    };
    log::info!(
        "{} ({record})",
        translator.tr(
            key,
            &[("score", &record.score), ("time", &record.time_seconds)]
        )
    );
}
