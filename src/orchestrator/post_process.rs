//! Post-render processing: auto-save of freshly rendered logos.

use crate::controller::ViewState;
use crate::model::AppConfig;
use crate::storage;
use tracing::warn;

/// Result of processing a new logo, ready for presentation layers.
pub struct ProcessedLogo {
    pub saved_path: Option<std::path::PathBuf>,
    pub message: Option<String>,
}

/// Save the currently shown logo if auto-save is enabled.
pub fn process_logo_ready(cfg: &AppConfig, state: &ViewState) -> ProcessedLogo {
    let Some(logo) = state.logo.as_ref() else {
        return ProcessedLogo {
            saved_path: None,
            message: None,
        };
    };
    if !cfg.auto_save {
        return ProcessedLogo {
            saved_path: None,
            message: None,
        };
    }

    match storage::save_logo(
        &cfg.save_dir,
        &state.current_prompt,
        state.current_seed.as_ref(),
        logo,
    ) {
        Ok(path) => ProcessedLogo {
            message: Some(format!("Saved: {}", path.display())),
            saved_path: Some(path),
        },
        Err(e) => {
            warn!("auto-save failed: {e:#}");
            ProcessedLogo {
                saved_path: None,
                message: Some(format!("Auto-save failed: {e:#}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{sample_png, RenderedLogo};
    use crate::model::Seed;
    use bytes::Bytes;
    use std::time::Duration;

    fn cfg(dir: &std::path::Path, auto_save: bool) -> AppConfig {
        AppConfig {
            base_url: "http://localhost".into(),
            user_agent: "test".into(),
            error_timeout: Duration::from_secs(5),
            save_dir: dir.to_path_buf(),
            auto_save,
        }
    }

    fn state_with_logo() -> ViewState {
        let mut s = ViewState::new();
        s.current_prompt = "logo for Acme".into();
        s.current_seed = Some(Seed::from(42));
        s.logo = Some(RenderedLogo::from_png(Bytes::from(sample_png(2, 2))).unwrap());
        s
    }

    #[test]
    fn saves_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let processed = process_logo_ready(&cfg(dir.path(), true), &state_with_logo());
        let path = processed.saved_path.expect("saved");
        assert!(path.exists());
        assert!(processed.message.unwrap().starts_with("Saved: "));
    }

    #[test]
    fn skips_when_disabled_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        let processed = process_logo_ready(&cfg(dir.path(), false), &state_with_logo());
        assert!(processed.saved_path.is_none() && processed.message.is_none());
        let processed = process_logo_ready(&cfg(dir.path(), true), &ViewState::new());
        assert!(processed.saved_path.is_none());
    }
}
