//! Movement, reward and garden core of a gamified focus timer.
//!
//! Finished focus sessions are validated, converted into steps that walk a
//! monk across a fog-covered map, and occasionally rewarded with loot that
//! can be arranged in a tile garden. All state lives in one
//! [`ProgressDocument`], owned and mutated by a [`FocusEngine`].

pub mod data;
pub mod engine;
pub mod garden;
pub mod journey;
pub mod map;
pub mod progress;
pub mod reward;
pub mod session;

pub use engine::{FocusEngine, SessionReport};
pub use progress::{ProgressDocument, ProgressError, ProgressStore};
