//! Generation strategies
//!
//! One strategy per mode family: structured chat, image synthesis,
//! long-running video synthesis, two-stage image edit, and speech. Every
//! strategy is a failure boundary - no error crosses into the
//! orchestrator; failures become error-flagged envelopes (speech degrades
//! to `None` instead, since it wraps no envelope).

pub mod chat;
pub mod edit;
pub mod image;
pub mod speech;
pub mod video;

pub use video::{PollBudget, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL};

#[cfg(test)]
pub(crate) mod mock;

#[cfg(test)]
mod tests;
