//! Confetti - Common Types & Logic
//!
//! Particle physics, the per-frame animation session and the launcher that
//! coalesces bursts into one running animation. Everything here is host
//! agnostic; the browser front end lives in `confetti-client`.

pub mod core;
pub mod launcher;
pub mod paint;
pub mod scheduler;

pub use anyhow::Result;
pub use launcher::Launcher;
