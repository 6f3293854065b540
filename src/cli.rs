use crate::client::LogoClient;
use crate::controller::{update, Effect, GeneratorForm, Intent, Msg, ViewState};
use crate::model::AppConfig;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::collections::VecDeque;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "logo-studio",
    version,
    about = "Generate and iteratively refine logos from a terminal"
)]
pub struct Cli {
    /// Base URL of the logo generation backend
    #[arg(long, env = "LOGO_STUDIO_URL", default_value = "http://127.0.0.1:5000")]
    pub base_url: String,

    /// Run once and print a JSON summary (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Run once and print a text summary (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Company name (pre-fills the form in the TUI)
    #[arg(long)]
    pub name: Option<String>,

    /// Style key, e.g. minimalist, modern, tech
    #[arg(long, default_value = "")]
    pub style: String,

    /// Free-text additions to the generation prompt
    #[arg(long, default_value = "")]
    pub prompt: String,

    /// Refinement to apply after generation; repeat to refine several times (text/JSON only)
    #[arg(long = "refine", value_name = "TEXT")]
    pub refine: Vec<String>,

    /// Write the final PNG to this path (text/JSON only)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory for saved logos
    #[arg(long, env = "LOGO_STUDIO_SAVE_DIR")]
    pub save_dir: Option<PathBuf>,

    /// Save every rendered logo. Use --auto-save true or --auto-save false
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub auto_save: bool,

    /// How long error messages stay visible
    #[arg(long, default_value = "5s")]
    pub error_timeout: humantime::Duration,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn is_headless(&self) -> bool {
        self.json || self.text || cfg!(not(feature = "tui"))
    }
}

/// Build an `AppConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> AppConfig {
    AppConfig {
        base_url: args.base_url.clone(),
        user_agent: format!("logo-studio/{}", env!("CARGO_PKG_VERSION")),
        error_timeout: Duration::from(args.error_timeout),
        save_dir: args
            .save_dir
            .clone()
            .unwrap_or_else(crate::storage::default_save_dir),
        auto_save: args.auto_save,
    }
}

/// Pre-filled generator form from CLI arguments.
pub fn initial_form(args: &Cli) -> GeneratorForm {
    GeneratorForm {
        company_name: args.name.clone().unwrap_or_default(),
        style: args.style.clone(),
        custom_prompt: args.prompt.clone(),
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if args.json && args.text {
        return Err(anyhow::anyhow!("--json and --text are mutually exclusive"));
    }

    if !args.is_headless() {
        if !args.refine.is_empty() || args.output.is_some() {
            return Err(anyhow::anyhow!(
                "--refine and --output need --text or --json"
            ));
        }
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
    }

    tokio::select! {
        res = run_headless(args) => res,
        _ = tokio::signal::ctrl_c() => Err(anyhow::anyhow!("interrupted")),
    }
}

/// Drive one intent through the reducer, executing request effects inline.
/// Returns the error message the UI would have shown, if any.
pub async fn run_intent(client: &LogoClient, state: &mut ViewState, intent: Intent) -> Option<String> {
    let mut queue: VecDeque<Msg> = VecDeque::from([Msg::from(intent)]);
    while let Some(msg) = queue.pop_front() {
        for effect in update(state, msg) {
            if let Effect::Request(req) = effect {
                let outcome = client.execute(&req).await.map(Box::new);
                queue.push_back(Msg::Settled {
                    op: req.operation(),
                    outcome,
                });
            }
        }
    }
    state.error.take()
}

#[derive(Debug, Serialize)]
struct HeadlessSummary<'a> {
    prompt: &'a str,
    seed: Option<&'a crate::model::Seed>,
    width: u32,
    height: u32,
    refinements: usize,
    output: Option<String>,
    saved_path: Option<String>,
}

async fn run_headless(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let client = LogoClient::new(&cfg)?;
    let (out_tx, out_handle) = spawn_output_writer();
    let mut state = ViewState::with_form(initial_form(&args));

    let res: Result<()> = async {
        if args.text {
            let _ = out_tx.send(OutputLine::Stderr(format!(
                "Generating logo via {}…",
                client.base_url()
            )));
        }
        if let Some(message) = run_intent(&client, &mut state, Intent::Generate).await {
            anyhow::bail!(message);
        }
        if args.text {
            let _ = out_tx.send(OutputLine::Stdout(format!("Prompt: {}", state.current_prompt)));
            if let Some(seed) = state.current_seed.as_ref() {
                let _ = out_tx.send(OutputLine::Stdout(format!("Seed: {seed}")));
            }
        }

        for (i, refinement) in args.refine.iter().enumerate() {
            state.refinement = refinement.clone();
            if args.text {
                let _ = out_tx.send(OutputLine::Stderr(format!(
                    "Refining ({}/{}): {refinement}",
                    i + 1,
                    args.refine.len()
                )));
            }
            if let Some(message) = run_intent(&client, &mut state, Intent::Refine).await {
                anyhow::bail!(message);
            }
            if args.text {
                let _ = out_tx.send(OutputLine::Stdout(format!("Prompt: {}", state.current_prompt)));
                if let Some(seed) = state.current_seed.as_ref() {
                    let _ = out_tx.send(OutputLine::Stdout(format!("Seed: {seed}")));
                }
            }
        }

        let logo = state
            .logo
            .as_ref()
            .context("backend returned no logo")?;

        if let Some(p) = args.output.as_deref() {
            crate::storage::write_png(p, logo)?;
        }
        let saved = if cfg.auto_save {
            Some(crate::storage::save_logo(
                &cfg.save_dir,
                &state.current_prompt,
                state.current_seed.as_ref(),
                logo,
            )?)
        } else {
            None
        };

        if args.json {
            let summary = HeadlessSummary {
                prompt: &state.current_prompt,
                seed: state.current_seed.as_ref(),
                width: logo.width,
                height: logo.height,
                refinements: args.refine.len(),
                output: args.output.as_ref().map(|p| p.display().to_string()),
                saved_path: saved.as_ref().map(|p| p.display().to_string()),
            };
            let _ = out_tx.send(OutputLine::Stdout(serde_json::to_string_pretty(&summary)?));
        } else {
            let _ = out_tx.send(OutputLine::Stdout(format!(
                "Image: {}x{} PNG ({} bytes)",
                logo.width,
                logo.height,
                logo.png.len()
            )));
            if let Some(p) = args.output.as_deref() {
                let _ = out_tx.send(OutputLine::Stderr(format!("Wrote: {}", p.display())));
            }
            if let Some(p) = saved.as_ref() {
                let _ = out_tx.send(OutputLine::Stderr(format!("Saved: {}", p.display())));
            }
        }
        Ok(())
    }
    .await;

    drop(out_tx);
    let _ = out_handle.await;
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_backend() {
        let args = Cli::parse_from(["logo-studio"]);
        let cfg = build_config(&args);
        assert_eq!(cfg.error_timeout, Duration::from_secs(5));
        assert!(!cfg.auto_save);
        assert!(args.refine.is_empty());
    }

    #[test]
    fn form_is_prefilled_from_flags() {
        let args = Cli::parse_from([
            "logo-studio",
            "--name",
            "Acme",
            "--style",
            "minimal",
            "--refine",
            "make it blue",
            "--refine",
            "bolder",
        ]);
        let form = initial_form(&args);
        assert_eq!(form.company_name, "Acme");
        assert_eq!(form.style, "minimal");
        assert_eq!(form.custom_prompt, "");
        assert_eq!(args.refine, vec!["make it blue", "bolder"]);
    }
}
