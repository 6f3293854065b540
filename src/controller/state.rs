use super::loading::LoadingControls;
use crate::image::RenderedLogo;
use crate::model::{Seed, STYLE_PRESETS};
use std::path::PathBuf;

/// Which of the two sections is visible. Exactly one is shown at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Generator,
    Result,
}

/// Input field receiving keystrokes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Field {
    #[default]
    CompanyName,
    Style,
    CustomPrompt,
    Refinement,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorForm {
    pub company_name: String,
    /// Style key sent verbatim to the backend.
    pub style: String,
    pub custom_prompt: String,
}

impl GeneratorForm {
    /// Step through the preset list. A custom style not in the list restarts from the first preset.
    pub fn cycle_style(&mut self, forward: bool) {
        let n = STYLE_PRESETS.len();
        let next = match STYLE_PRESETS.iter().position(|(k, _)| *k == self.style) {
            Some(i) if forward => (i + 1) % n,
            Some(i) => (i + n - 1) % n,
            None => 0,
        };
        self.style = STYLE_PRESETS[next].0.to_string();
    }
}

/// Everything the controller knows about the current session.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub section: Section,
    pub focus: Field,
    pub form: GeneratorForm,
    pub refinement: String,

    /// Prompt echoed by the backend; baseline for the next refinement.
    pub current_prompt: String,
    /// Set iff a generate or refine succeeded since the last reset.
    pub current_seed: Option<Seed>,
    pub logo: Option<RenderedLogo>,

    /// Transient error message area.
    pub error: Option<String>,
    /// Non-error status line (saved paths, clipboard).
    pub info: String,
    pub loading: LoadingControls,
    pub last_saved: Option<PathBuf>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: GeneratorForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    /// Fields reachable with Tab in the visible section.
    fn focus_order(&self) -> &'static [Field] {
        match self.section {
            Section::Generator => &[Field::CompanyName, Field::Style, Field::CustomPrompt],
            Section::Result => &[Field::Refinement],
        }
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let n = order.len();
        self.focus = match order.iter().position(|f| *f == self.focus) {
            Some(i) if forward => order[(i + 1) % n],
            Some(i) => order[(i + n - 1) % n],
            None => order[0],
        };
    }

    /// Text buffer of the focused field. The style field is a selector, not free text.
    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::CompanyName => Some(&mut self.form.company_name),
            Field::CustomPrompt => Some(&mut self.form.custom_prompt),
            Field::Refinement => Some(&mut self.refinement),
            Field::Style => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(buf) = self.focused_text_mut() {
            buf.push(c);
        }
    }

    pub fn insert_str(&mut self, s: &str) {
        if let Some(buf) = self.focused_text_mut() {
            buf.push_str(s);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(buf) = self.focused_text_mut() {
            buf.pop();
        }
    }
}
