//! Background resubmission of backlogged entries.
//!
//! When connectivity returns, the handler drains the backlog synchronously
//! and hands the snapshot to [`spawn_replay`]. Replay runs detached: the
//! toggle request returns immediately and never reflects replay results.
//!
//! Replay is at-most-once. Each record is submitted exactly once; a record
//! whose resubmission is rejected, times out, or fails in transport is
//! logged and dropped, never re-buffered. The chaincode's `uniqueId`
//! deduplication makes an already-committed resubmission land as a
//! rejection rather than a double-count.

use std::sync::Arc;

use station_gateway::{ChaincodeCall, InvokeOutcome, LedgerGateway};
use tokio::task::{JoinHandle, JoinSet};

use crate::backlog::BacklogRecord;

/// Tally of a finished replay run, by terminal result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Entries the ledger committed.
    pub committed: usize,
    /// Entries the network rejected (including `uniqueId` duplicates).
    pub rejected: usize,
    /// Entries whose commit confirmation never arrived.
    pub timed_out: usize,
    /// Entries that produced no outcome at all (transport or decode error).
    pub failed: usize,
}

impl ReplayStats {
    /// Total number of records the run attempted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.committed + self.rejected + self.timed_out + self.failed
    }
}

/// Resubmits the drained records on a detached task.
///
/// Records are submitted concurrently; completion order does not matter
/// because each entry carries its own idempotency token. The returned handle
/// resolves to the run's [`ReplayStats`] — tests await it, the reconnect
/// handler drops it.
pub fn spawn_replay(
    gateway: Arc<dyn LedgerGateway>,
    records: Vec<BacklogRecord>,
) -> JoinHandle<ReplayStats> {
    tokio::spawn(async move {
        let total = records.len();
        tracing::info!(total, "replaying backlogged entries");

        let mut submissions = JoinSet::new();
        for record in records {
            let gateway = Arc::clone(&gateway);
            submissions.spawn(async move {
                let user_id = record.entry.user_id.clone();
                let unique_id = record.entry.unique_id.clone();
                let queued_at = record.queued_at;

                let result = gateway.invoke(ChaincodeCall::record(&record.entry)).await;
                match &result {
                    Ok(outcome @ InvokeOutcome::Committed { tx_id }) => {
                        tracing::info!(
                            %user_id,
                            %unique_id,
                            %tx_id,
                            %queued_at,
                            outcome = outcome.label(),
                            "replayed backlogged entry"
                        );
                    }
                    Ok(outcome) => {
                        tracing::warn!(
                            %user_id,
                            %unique_id,
                            %queued_at,
                            %outcome,
                            "backlogged entry not committed; dropping"
                        );
                    }
                    Err(err) => {
                        tracing::error!(
                            %user_id,
                            %unique_id,
                            %queued_at,
                            error = %err,
                            "failed to replay backlogged entry; dropping"
                        );
                    }
                }
                result
            });
        }

        let mut stats = ReplayStats::default();
        while let Some(joined) = submissions.join_next().await {
            match joined {
                Ok(Ok(InvokeOutcome::Committed { .. })) => stats.committed += 1,
                Ok(Ok(InvokeOutcome::Rejected { .. })) => stats.rejected += 1,
                Ok(Ok(InvokeOutcome::TimedOut)) => stats.timed_out += 1,
                Ok(Err(_)) => stats.failed += 1,
                Err(join_err) => {
                    tracing::error!(error = %join_err, "replay submission task panicked");
                    stats.failed += 1;
                }
            }
        }

        tracing::info!(
            total,
            committed = stats.committed,
            rejected = stats.rejected,
            timed_out = stats.timed_out,
            failed = stats.failed,
            "replay finished"
        );
        stats
    })
}
