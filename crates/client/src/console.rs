//! Polling subscriber that reports state changes on the log.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use tetris_runtime::{GameSnapshot, RuntimeError, SubscriberHandles};

/// Polls the game state every `poll` until its handles are revoked.
///
/// Returns the number of distinct revisions it observed.
pub fn spawn(handles: SubscriberHandles, poll: Duration) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll);
        let mut last_revision = None;
        let mut observed = 0;

        loop {
            ticker.tick().await;
            let snapshot = match handles.snapshot() {
                Ok(snapshot) => snapshot,
                Err(RuntimeError::Revoked { .. }) => break,
                Err(error) => {
                    debug!(%error, "poll failed");
                    continue;
                }
            };
            if last_revision == Some(snapshot.revision) {
                continue;
            }
            last_revision = Some(snapshot.revision);
            observed += 1;
            report(&snapshot);
        }

        debug!(subscriber = %handles.id(), observed, "console subscriber revoked");
        observed
    })
}

fn report(snapshot: &GameSnapshot) {
    let shape = snapshot
        .shape
        .map(|kind| kind.to_string())
        .unwrap_or_else(|| "-".to_owned());
    let bottom = snapshot
        .positions
        .as_deref()
        .and_then(|positions| positions.iter().map(|point| point.y).max());
    info!(
        revision = snapshot.revision,
        %shape,
        occupied = snapshot.occupied_cells(),
        bottom_row = ?bottom,
        "state changed"
    );
}
