mod export;
mod help;
pub mod keymap;
mod state;
mod view;

use crate::cli::{build_config, initial_form, Cli};
use crate::client::LogoClient;
use crate::controller::{update, Effect, Field, GeneratorForm, Msg, ViewState};
use crate::error::OpError;
use crate::model::{AppConfig, ControllerEvent};
use crate::orchestrator::{self, process_logo_ready, ApiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use keymap::Action;
use ratatui::{backend::CrosstermBackend, Terminal};
use state::{Scroll, TuiState};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

const SCROLL_STEP: i32 = 5;

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let client = LogoClient::new(&cfg)?;

    let (event_tx, event_rx) = mpsc::unbounded_channel::<ControllerEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<ApiCommand>();

    // The terminal loop does blocking I/O, so it gets its own thread.
    let ui_cfg = cfg.clone();
    let form = initial_form(&args);
    let ui_handle = std::thread::spawn(move || run_threaded(ui_cfg, form, event_rx, cmd_tx));

    info!(base_url = %client.base_url(), "starting interactive session");
    let res = orchestrator::run_controller(client, cfg.error_timeout, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
pub fn run_threaded(
    cfg: AppConfig,
    form: GeneratorForm,
    mut event_rx: UnboundedReceiver<ControllerEvent>,
    cmd_tx: UnboundedSender<ApiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste).ok();
    // Lets terminals that support it report Ctrl+Enter distinctly; others fall back to Ctrl+J.
    let enhanced = execute!(
        stdout,
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
    )
    .is_ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut state = TuiState::new(ViewState::with_form(form));
    state.view.info = "F1 for help".into();

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            dispatch(&cfg, &mut state, &cmd_tx, Msg::from(ev));
        }

        if last_tick.elapsed() >= tick_rate {
            state.spinner_frame = state.spinner_frame.wrapping_add(1);
            terminal.draw(|f| view::draw(f, &mut state, &cfg)).ok();
            last_tick = Instant::now();
        }

        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(k)) if k.kind == KeyEventKind::Press => {
                    let Some(action) = keymap::map_key(state.view.section, state.view.focus, k)
                    else {
                        continue;
                    };
                    if action == Action::Quit {
                        let _ = cmd_tx.send(ApiCommand::Quit);
                        break Ok(());
                    }
                    handle_action(&cfg, &mut state, &cmd_tx, action);
                }
                Ok(Event::Paste(text)) => {
                    let text = if state.view.focus == Field::CompanyName {
                        text.replace(['\r', '\n'], " ")
                    } else {
                        text.replace("\r\n", "\n")
                    };
                    state.view.insert_str(&text);
                }
                _ => {}
            }
        }
    };

    let mut stdout = io::stdout();
    if enhanced {
        execute!(stdout, PopKeyboardEnhancementFlags).ok();
    }
    disable_raw_mode().ok();
    execute!(stdout, DisableBracketedPaste, LeaveAlternateScreen).ok();
    res
}

fn handle_action(
    cfg: &AppConfig,
    state: &mut TuiState,
    cmd_tx: &UnboundedSender<ApiCommand>,
    action: Action,
) {
    if state.show_help && action != Action::ToggleHelp {
        state.show_help = false;
        return;
    }
    match action {
        Action::Intent(intent) => dispatch(cfg, state, cmd_tx, Msg::from(intent)),
        Action::Quit => {}
        Action::ToggleHelp => state.show_help = !state.show_help,
        Action::Insert(c) => state.view.insert_char(c),
        Action::Newline => state.view.insert_char('\n'),
        Action::Backspace => state.view.backspace(),
        Action::FocusNext => state.view.cycle_focus(true),
        Action::FocusPrev => state.view.cycle_focus(false),
        Action::StyleNext => state.view.form.cycle_style(true),
        Action::StylePrev => state.view.form.cycle_style(false),
        Action::ScrollUp => state.scroll_by(-SCROLL_STEP),
        Action::ScrollDown => state.scroll_by(SCROLL_STEP),
        Action::Save => export::save_and_show_path(cfg, &mut state.view),
        Action::CopyPath => export::copy_last_saved(&mut state.view),
    }
}

/// Feed one message through the reducer and carry out the effects it returns.
fn dispatch(cfg: &AppConfig, state: &mut TuiState, cmd_tx: &UnboundedSender<ApiCommand>, msg: Msg) {
    for effect in update(&mut state.view, msg) {
        match effect {
            Effect::Request(req) => {
                let op = req.operation();
                if cmd_tx.send(ApiCommand::Run(req)).is_err() {
                    warn!(?op, "request controller is gone");
                    dispatch(
                        cfg,
                        state,
                        cmd_tx,
                        Msg::Settled {
                            op,
                            outcome: Err(OpError::Transport("request controller stopped".into())),
                        },
                    );
                }
            }
            Effect::ScheduleErrorHide => {
                let _ = cmd_tx.send(ApiCommand::ScheduleErrorHide);
            }
            Effect::LogoReady => {
                state.invalidate_thumbnail();
                let processed = process_logo_ready(cfg, &state.view);
                if let Some(path) = processed.saved_path {
                    state.view.last_saved = Some(path);
                }
                if let Some(message) = processed.message {
                    state.view.info = message;
                }
            }
            Effect::ScrollResultIntoView => state.scroll = Scroll::CenterImage,
            Effect::ScrollToTop => {
                state.scroll = Scroll::Top;
                state.invalidate_thumbnail();
            }
        }
    }
}
