//! Autoplay
//!
//! Two states:
//!
//! ```text
//!          autoplay on
//!   Idle ───────────────▶ Playing ──┐ every cadence:
//!    ▲                       │      │   r ← r + step (wrap to min past max)
//!    └───── autoplay off ────┘ ◀────┘   re-run pipeline
//! ```
//!
//! The loop is cooperative: it owns the session, drains queued input
//! between ticks and sleeps on a [`Clock`], so tests run it on virtual
//! time. Persistence is computed on tokio's blocking pool, and input that
//! arrives during a computation is applied before the next frame.

mod clock;
mod driver;

pub use clock::{Clock, ManualClock, TokioClock};
pub use driver::{AnimationDriver, PlaybackState, RunSummary};
