//! Application-level orchestration utilities.
//!
//! This module owns request lifecycle control (spawning backend calls, error-hide timers)
//! and post-render processing such as auto-save. UI/CLI layers call into this module to
//! keep responsibilities separated.

mod controller;
mod post_process;

pub use controller::{run_controller, ApiCommand};
pub use post_process::{process_logo_ready, ProcessedLogo};
