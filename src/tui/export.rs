use crate::controller::ViewState;
use crate::model::AppConfig;
use anyhow::Result;
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

// Clipboard manager channel, started on first use.
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

/// Save the shown logo regardless of the auto-save setting and report where it went.
pub fn save_and_show_path(cfg: &AppConfig, state: &mut ViewState) {
    let Some(logo) = state.logo.as_ref() else {
        state.info = "Nothing to save yet".into();
        return;
    };
    match crate::storage::save_logo(
        &cfg.save_dir,
        &state.current_prompt,
        state.current_seed.as_ref(),
        logo,
    ) {
        Ok(path) => {
            state.info = format!("Saved: {} (Ctrl-Y to copy path)", path.display());
            state.last_saved = Some(path);
        }
        Err(e) => {
            state.info = format!("Save failed: {e:#}");
        }
    }
}

/// Copy the last saved path, if any, and describe the outcome in `state.info`.
pub fn copy_last_saved(state: &mut ViewState) {
    let Some(path) = state.last_saved.as_ref() else {
        state.info = "No saved logo yet. Save one first (Ctrl-S)".into();
        return;
    };
    let path = path.display().to_string();
    state.info = match copy_to_clipboard(&path) {
        Ok(()) => format!("✓ Copied to clipboard: {}", shorten(&path, 60)),
        Err(e) => format!("Clipboard copy failed: {e:#}"),
    };
}

fn shorten(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{head}...")
}

/// Each clipboard instance is kept alive for a while after `set_text` so that
/// clipboard managers on Linux get a chance to read it.
fn init_clipboard_manager() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();
        std::thread::spawn(move || {
            for text in rx {
                if let Ok(mut clipboard) = arboard::Clipboard::new() {
                    if clipboard.set_text(&text).is_ok() {
                        std::thread::sleep(Duration::from_secs(2));
                    }
                }
            }
        });
        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Failed to initialize clipboard manager"))
}

/// Queue `text` for the clipboard without blocking the UI thread.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let sender = init_clipboard_manager()?;
    sender
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("Clipboard manager channel closed"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{sample_png, RenderedLogo};
    use bytes::Bytes;

    fn cfg(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            base_url: "http://127.0.0.1:5000".into(),
            user_agent: "test".into(),
            error_timeout: Duration::from_secs(5),
            save_dir: dir.to_path_buf(),
            auto_save: false,
        }
    }

    #[test]
    fn save_without_logo_reports_nothing_to_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = ViewState::new();
        save_and_show_path(&cfg(dir.path()), &mut state);
        assert_eq!(state.info, "Nothing to save yet");
        assert!(state.last_saved.is_none());
    }

    #[test]
    fn save_ignores_auto_save_setting() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = ViewState::new();
        state.current_prompt = "logo for Acme".into();
        state.logo = Some(RenderedLogo::from_png(Bytes::from(sample_png(4, 4))).unwrap());
        save_and_show_path(&cfg(dir.path()), &mut state);

        let saved = state.last_saved.clone().unwrap();
        assert!(saved.starts_with(dir.path()));
        assert!(state.info.starts_with("Saved: "));
    }

    #[test]
    fn shorten_keeps_short_paths() {
        assert_eq!(shorten("/tmp/a.png", 60), "/tmp/a.png");
        assert_eq!(shorten("abcdefghij", 6), "abc...");
    }
}
