//! Core sea-anemone feeding simulation library.
//!
//! Main components:
//! - [`anemone`] — the tentacle array built on a disk, and the consumption test.
//! - [`food`] — drifting food particles and the food collection.
//! - [`phases`] — the motion and consumption phases of a single step.
//! - [`simulation`] — the step / run loop tying everything together.
//! - [`config`] — run parameters with per-key defaults.
//! - [`point_cloud`] — `.xyz` listing of the anemone geometry.
//! - [`rng`] — seeded random number generation.
//! - [`error`] — error types shared by the crate.
//! - [`types`] — vector aliases and validation helpers.

pub mod anemone;
pub mod config;
pub mod error;
pub mod food;
pub mod phases;
pub mod point_cloud;
pub mod rng;
pub mod simulation;
pub mod types;
