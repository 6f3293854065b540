//! Request lifecycle controller.
//!
//! Runs backend calls and error-hide timers requested by the presentation layer and posts
//! their results back as [`ControllerEvent`]s.

use crate::client::LogoClient;
use crate::error::OpError;
use crate::model::{ApiRequest, ControllerEvent, Generation, Operation};
use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tokio::time::Duration;
use tracing::{debug, warn};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub enum ApiCommand {
    Run(ApiRequest),
    ScheduleErrorHide,
    Quit,
}

/// Posts exactly one `Settled` event for its operation: the real outcome via
/// [`SettleGuard::settle`], or a failure from `Drop` if the call never finished.
struct SettleGuard {
    op: Operation,
    event_tx: UnboundedSender<ControllerEvent>,
    settled: bool,
}

impl SettleGuard {
    fn new(op: Operation, event_tx: UnboundedSender<ControllerEvent>) -> Self {
        Self {
            op,
            event_tx,
            settled: false,
        }
    }

    fn settle(mut self, outcome: Result<Generation, OpError>) {
        self.settled = true;
        let _ = self.event_tx.send(ControllerEvent::Settled {
            op: self.op,
            outcome: outcome.map(Box::new),
        });
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if !self.settled {
            let _ = self.event_tx.send(ControllerEvent::Settled {
                op: self.op,
                outcome: Err(OpError::Transport("request was interrupted".into())),
            });
        }
    }
}

async fn run_call(client: LogoClient, req: ApiRequest, event_tx: UnboundedSender<ControllerEvent>) {
    let guard = SettleGuard::new(req.operation(), event_tx);
    let outcome = client.execute(&req).await;
    guard.settle(outcome);
}

/// Execute UI commands until `Quit` (or until every sender is gone).
///
/// Calls are independent: nothing is deduplicated or cancelled, and results are posted in
/// completion order. Pending work is aborted on exit.
pub async fn run_controller(
    client: LogoClient,
    error_timeout: Duration,
    event_tx: UnboundedSender<ControllerEvent>,
    mut cmd_rx: UnboundedReceiver<ApiCommand>,
) -> Result<()> {
    let mut tasks: JoinSet<()> = JoinSet::new();

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(ApiCommand::Run(req)) => {
                        debug!(op = req.operation().endpoint(), "starting call");
                        tasks.spawn(run_call(client.clone(), req, event_tx.clone()));
                    }
                    Some(ApiCommand::ScheduleErrorHide) => {
                        let tx = event_tx.clone();
                        tasks.spawn(async move {
                            tokio::time::sleep(error_timeout).await;
                            let _ = tx.send(ControllerEvent::ErrorTimerElapsed);
                        });
                    }
                    Some(ApiCommand::Quit) | None => break,
                }
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    if e.is_panic() {
                        warn!("controller task panicked: {e}");
                    }
                }
            }
        }
    }

    debug!(pending = tasks.len(), "controller stopping");
    tasks.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn dropped_guard_reports_interruption() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        drop(SettleGuard::new(Operation::Refine, tx));
        match rx.recv().await {
            Some(ControllerEvent::Settled {
                op: Operation::Refine,
                outcome: Err(OpError::Transport(_)),
            }) => {}
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn error_hide_fires_after_timeout() {
        let cfg = crate::model::AppConfig {
            base_url: "http://127.0.0.1:9".into(),
            user_agent: "test".into(),
            error_timeout: Duration::from_secs(5),
            save_dir: std::env::temp_dir(),
            auto_save: false,
        };
        let client = LogoClient::new(&cfg).unwrap();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_controller(client, cfg.error_timeout, event_tx, cmd_rx));

        cmd_tx.send(ApiCommand::ScheduleErrorHide).unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(event_rx.try_recv().is_err());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(matches!(
            event_rx.recv().await,
            Some(ControllerEvent::ErrorTimerElapsed)
        ));

        cmd_tx.send(ApiCommand::Quit).unwrap();
        handle.await.unwrap().unwrap();
    }
}
