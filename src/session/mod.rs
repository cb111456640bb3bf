//! Camera session around one exercise.
//!
//! # Architecture
//!
//! ```text
//! SessionCommand (mpsc)
//!        │
//!        ▼
//! SessionController::run()  ← async tokio task, sole writer of the engine
//!        │
//!        ├─ Start   → acquire camera, start engine, spawn frame pump
//!        ├─ Restart → reset engine (camera kept)
//!        └─ Stop    → stop pump, release camera, leave playthrough
//!
//! frame pump task ──HandEvent (mpsc)──▶ render tick ──▶ Exercise::update
//!
//! SharedState (Arc<Mutex<SessionState>>) ←─── read by the presentation layer
//! ```

pub mod runner;
pub mod state;

pub use runner::{settled, HandEvent, SessionCommand, SessionController};
pub use state::{
    lock_state, new_shared_state, Controls, SessionState, SessionStatus, SharedState,
};
