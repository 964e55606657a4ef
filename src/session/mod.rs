//! Viewer Session
//!
//! A [`Session`] owns one cloud, one radius and one dimension selection, and
//! turns them into a [`Frame`] on demand:
//!
//! ```text
//! Source ──load──▶ PointCloud ─┬─ project(cloud, r) ─────────────▶ primitives
//!                              └─ compute(cloud, 2r) ─▶ filter ──▶ diagrams, plot
//! ```
//!
//! Sessions share nothing. Input arrives as [`Input`] messages applied by
//! whoever owns the session, normally the animation driver.

mod frame;
mod input;
mod state;

pub use frame::{DiagramSummary, Frame, Notice};
pub use input::Input;
pub use state::{DiagramJob, Session};
