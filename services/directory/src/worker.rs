//! Outbox worker loop.

use std::time::Duration;

use chrono::Utc;

use crate::state::AppState;
use crate::usecase::outbox::OutboxDispatcher;
use crate::usecase::sync::SyncProfileUseCase;

/// Poll the outbox forever, dispatching due events. Runs as a background
/// task next to the HTTP server; a drain error is logged and the next tick
/// retries.
pub async fn run_outbox_worker(state: AppState, poll_interval: Duration) {
    let dispatcher = OutboxDispatcher {
        outbox: state.outbox_repo(),
        sync: SyncProfileUseCase {
            memberships: state.membership_repo(),
            member_records: state.member_record_repo(),
            sermons: state.sermon_repo(),
        },
        stats: state.stats_repo(),
    };

    let mut ticker = tokio::time::interval(poll_interval);
    loop {
        ticker.tick().await;
        match dispatcher.drain(Utc::now()).await {
            Ok(outcome) if outcome.processed > 0 || outcome.failed > 0 => {
                tracing::debug!(
                    processed = outcome.processed,
                    failed = outcome.failed,
                    "outbox drain pass"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "outbox drain failed");
            }
        }
    }
}
