//! # Narrative Engine
//!
//! The core state machines behind a branching visual-novel story
//! interleaved with knowledge-quiz checkpoints. The engine is stepped by
//! exactly one [`SessionController::tick`] per display frame; nothing here
//! blocks, allocates after startup, or talks to hardware.
//!
//! ## Core Components
//!
//! - **input**: input snapshots and the per-tick rising-edge detector
//! - **navigator**: scene graph traversal with typewriter text reveal
//! - **quiz**: quiz session engine (categories, scoring, pass/fail)
//! - **controller**: the outer Title/Story/Quiz/Ending phase machine
//!
//! ## Design Philosophy
//!
//! - **Tick-Driven**: every operation completes within one tick; waiting
//!   for input is simply returning unchanged until the next tick
//! - **Signal-Coupled**: the navigator and quiz engine never call each
//!   other; the controller reads their completion signals and routes
//! - **Crash-Free**: out-of-range ids and invalid-phase requests are
//!   silent no-ops or degrade to an ending, never a panic

pub mod controller;
pub mod input;
pub mod navigator;
pub mod quiz;

pub use controller::*;
pub use input::*;
pub use navigator::*;
pub use quiz::*;
