use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::error::DashboardError;
use crate::refresh::{self, RefreshOutcome};
use crate::state::{Delta, ProviderCommand};
use crate::stats_api::StatsApi;

/// Spawns the worker that owns all network I/O. It loads the stats once,
/// then serves commands until the command channel closes.
pub fn spawn_provider(
    api: Box<dyn StatsApi + Send>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        load_stats(api.as_ref(), &tx);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Refresh => {
                    let guard = RefreshGuard::new(&tx);
                    let outcome = refresh::run_refresh(api.as_ref());
                    guard.finish(outcome);
                }
                ProviderCommand::Reload => load_stats(api.as_ref(), &tx),
            }
        }
        tracing::debug!("provider command channel closed");
    })
}

fn load_stats(api: &dyn StatsApi, tx: &Sender<Delta>) {
    match api.fetch_stats() {
        Ok(records) => {
            let _ = tx.send(Delta::StoreLoaded(records));
        }
        Err(err) => {
            tracing::warn!(%err, "stats load failed");
            let _ = tx.send(Delta::LoadFailed(err));
        }
    }
}

/// Guarantees exactly one `RefreshFinished` per refresh, even when the
/// refresh round unwinds.
struct RefreshGuard<'a> {
    tx: &'a Sender<Delta>,
    done: bool,
}

impl<'a> RefreshGuard<'a> {
    fn new(tx: &'a Sender<Delta>) -> Self {
        Self { tx, done: false }
    }

    fn finish(mut self, outcome: RefreshOutcome) {
        self.done = true;
        let _ = self.tx.send(Delta::RefreshFinished(outcome));
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let error = DashboardError::RefreshRequest("refresh aborted".to_string());
        let _ = self
            .tx
            .send(Delta::RefreshFinished(RefreshOutcome::failed(error)));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn dropped_guard_reports_failure() {
        let (tx, rx) = mpsc::channel();
        {
            let _guard = RefreshGuard::new(&tx);
        }
        match rx.try_recv() {
            Ok(Delta::RefreshFinished(RefreshOutcome::Failed { error, .. })) => {
                assert!(error.is_network());
            }
            other => panic!("unexpected delta: {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn finished_guard_sends_once() {
        let (tx, rx) = mpsc::channel();
        RefreshGuard::new(&tx).finish(RefreshOutcome::Unchanged { timestamp: None });
        assert!(matches!(
            rx.try_recv(),
            Ok(Delta::RefreshFinished(RefreshOutcome::Unchanged { .. }))
        ));
        assert!(rx.try_recv().is_err());
    }
}
