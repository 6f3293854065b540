//! View state and the pure reducer behind every user workflow.
//!
//! Handlers take the current [`ViewState`] and one [`Msg`], mutate the state and return the
//! [`Effect`]s to run. Nothing here touches the terminal or the network.

mod loading;
mod state;
mod update;

pub use loading::{ControlState, LoadingControls};
pub use state::{Field, GeneratorForm, Section, ViewState};
pub use update::{update, Effect, Intent, Msg};
