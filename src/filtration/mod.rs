//! Filtration Parameter
//!
//! The ball radius `r` is the single scalar the user scrubs. It is owned by
//! the session and read by every stage of the pipeline within a tick. The
//! persistence engine turns it into the Vietoris-Rips distance threshold
//! `2r`; the growth projector draws balls of radius `r`.

mod parameter;

pub use parameter::{FiltrationParameter, RadiusBounds};
