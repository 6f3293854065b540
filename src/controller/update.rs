use super::state::{Field, Section, ViewState};
use crate::error::{OpError, ValidationError};
use crate::model::{
    ApiRequest, ControllerEvent, GenerateRequest, Generation, Operation, RefineRequest,
};
use tracing::{debug, warn};

/// User-level intents, independent of the key or control that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Generate,
    Refine,
    NewLogo,
}

/// Input to [`update`].
#[derive(Debug)]
pub enum Msg {
    Intent(Intent),
    Settled {
        op: Operation,
        outcome: Result<Box<Generation>, OpError>,
    },
    ErrorTimerElapsed,
}

impl From<Intent> for Msg {
    fn from(i: Intent) -> Self {
        Msg::Intent(i)
    }
}

impl From<ControllerEvent> for Msg {
    fn from(ev: ControllerEvent) -> Self {
        match ev {
            ControllerEvent::Settled { op, outcome } => Msg::Settled { op, outcome },
            ControllerEvent::ErrorTimerElapsed => Msg::ErrorTimerElapsed,
        }
    }
}

/// Side effects requested by [`update`], executed by the orchestrator or the terminal layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue a backend call. Exactly one `Settled` message must follow.
    Request(ApiRequest),
    /// Hide the error area after the configured delay.
    ScheduleErrorHide,
    /// A new logo was rendered (used for auto-save).
    LogoReady,
    ScrollResultIntoView,
    ScrollToTop,
}

/// Apply one message to the view state and return the effects it asks for.
pub fn update(state: &mut ViewState, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::Intent(Intent::Generate) => begin_generate(state),
        Msg::Intent(Intent::Refine) => begin_refine(state),
        Msg::Intent(Intent::NewLogo) => new_logo(state),
        Msg::Settled { op, outcome } => settle(state, op, outcome),
        Msg::ErrorTimerElapsed => {
            // Not tied to a particular message: a stale timer also hides a newer one.
            state.error = None;
            Vec::new()
        }
    }
}

fn show_error(state: &mut ViewState, message: String) -> Vec<Effect> {
    state.error = Some(message);
    vec![Effect::ScheduleErrorHide]
}

fn begin_generate(state: &mut ViewState) -> Vec<Effect> {
    if state.loading.is_busy(Operation::Generate) {
        return Vec::new();
    }
    let company_name = state.form.company_name.trim();
    if company_name.is_empty() {
        return show_error(state, ValidationError::EmptyCompanyName.to_string());
    }
    let req = GenerateRequest {
        company_name: company_name.to_string(),
        style: state.form.style.clone(),
        custom_prompt: state.form.custom_prompt.clone(),
    };

    state.loading.acquire(Operation::Generate);
    state.error = None;
    debug!(company = %req.company_name, style = %req.style, "generate requested");
    vec![Effect::Request(ApiRequest::Generate(req))]
}

fn begin_refine(state: &mut ViewState) -> Vec<Effect> {
    if state.loading.is_busy(Operation::Refine) {
        return Vec::new();
    }
    let refinement = state.refinement.trim();
    if refinement.is_empty() {
        return show_error(state, ValidationError::EmptyRefinement.to_string());
    }
    let req = RefineRequest {
        original_prompt: state.current_prompt.clone(),
        refinement: refinement.to_string(),
        seed: state.current_seed.clone(),
    };

    state.loading.acquire(Operation::Refine);
    state.error = None;
    debug!(refinement = %req.refinement, seed = ?req.seed, "refine requested");
    vec![Effect::Request(ApiRequest::Refine(req))]
}

fn new_logo(state: &mut ViewState) -> Vec<Effect> {
    state.section = Section::Generator;
    state.focus = Field::CompanyName;
    state.refinement.clear();
    state.current_prompt.clear();
    state.current_seed = None;
    state.logo = None;
    vec![Effect::ScrollToTop]
}

fn settle(state: &mut ViewState, op: Operation, outcome: Result<Box<Generation>, OpError>) -> Vec<Effect> {
    // Release first so the control recovers regardless of the outcome.
    state.loading.release(op);

    let generation = match outcome {
        Ok(g) => *g,
        Err(e) => {
            warn!(op = op.endpoint(), error = %e, "operation failed");
            return show_error(state, e.user_message(op));
        }
    };

    state.current_prompt = generation.prompt;
    state.current_seed = Some(generation.seed);
    state.logo = Some(generation.logo);

    match op {
        Operation::Generate => {
            state.section = Section::Result;
            state.focus = Field::Refinement;
            vec![Effect::LogoReady]
        }
        Operation::Refine => {
            state.refinement.clear();
            vec![Effect::LogoReady, Effect::ScrollResultIntoView]
        }
    }
}
