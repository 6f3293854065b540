pub mod cli;
pub mod client;
pub mod controller;
pub mod error;
pub mod image;
pub mod logging;
pub mod model;
pub mod orchestrator;
pub mod storage;
#[cfg(feature = "tui")]
pub mod tui;
