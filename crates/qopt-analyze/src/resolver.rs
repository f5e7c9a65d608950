//! # The Statistics Resolver State Machine
//!
//! A single-tasked, event-driven actor. It issues at most one outbound
//! request at a time, suspends on its mailbox between request and response,
//! and fulfills its completion slot exactly once before terminating.
//!
//! ```text
//! AwaitingTableLookup ──lookup error──────────────────────────▶ Failed
//!        │  round-1 response
//!        ├─ non-serverless, aggregator known ──▶ AwaitingAggregatorScan
//!        └─ otherwise (round-2 lookup issued) ─▶ AwaitingDomainLookup
//!
//! AwaitingDomainLookup ──no aggregator / lookup error─────────▶ Failed
//!        └─ aggregator found ──▶ scan sent, slot completed (no wait)
//!
//! AwaitingAggregatorScan ──scan response──▶ Succeeded
//!                        ──anything else──▶ Failed
//! ```
//!
//! On the round-2 path the scan request is sent and the slot is completed
//! with success immediately, without awaiting the scan response that the
//! round-1 path does wait for. The asymmetry is deliberate and covered by
//! tests: callers on that path learn "the refresh was handed to the
//! aggregator's domain", not "the scan finished".

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::error::ResolveError;
use crate::message::{
    DirectoryService, LookupRound, NavigateKey, NavigateRequest, NavigateResult, NavigateStatus,
    PathId, ResolverEvent, ScanRequest, ScanTransport,
};

/// Outcome delivered through the completion slot.
pub type ResolveOutcome = Result<(), ResolveError>;

enum State {
    AwaitingTableLookup,
    AwaitingDomainLookup,
    AwaitingAggregatorScan,
}

/// Resolves a table path to its domain's statistics-aggregator tablet and
/// requests a statistics-refresh scan. See the module docs for the state
/// machine; [`resolve_and_scan`] is the usual entry point.
pub struct StatisticsResolver {
    table_path: String,
    directory: Arc<dyn DirectoryService>,
    transport: Arc<dyn ScanTransport>,
    mailbox: mpsc::UnboundedReceiver<ResolverEvent>,
    reply_addr: mpsc::UnboundedSender<ResolverEvent>,
    /// Single-assignment completion slot. `None` once fulfilled.
    slot: Option<oneshot::Sender<ResolveOutcome>>,
    state: State,
    /// Resolved identity of the table, known after round 1 succeeds.
    path_id: Option<PathId>,
}

impl StatisticsResolver {
    /// Spawn the resolver task for `table_path` and return the receiving end
    /// of its completion slot.
    pub fn spawn(
        table_path: String,
        directory: Arc<dyn DirectoryService>,
        transport: Arc<dyn ScanTransport>,
    ) -> oneshot::Receiver<ResolveOutcome> {
        let (slot, outcome) = oneshot::channel();
        let (reply_addr, mailbox) = mpsc::unbounded_channel();
        let resolver = Self {
            table_path,
            directory,
            transport,
            mailbox,
            reply_addr,
            slot: Some(slot),
            state: State::AwaitingTableLookup,
            path_id: None,
        };
        tokio::spawn(resolver.run());
        outcome
    }

    async fn run(mut self) {
        debug!(table_path = %self.table_path, "starting statistics resolution");
        self.directory.navigate(NavigateRequest {
            key: NavigateKey::Path(self.table_path.clone()),
            round: LookupRound::Table,
            reply: self.reply_addr.clone(),
        });

        while let Some(event) = self.mailbox.recv().await {
            self.handle(event);
            if self.slot.is_none() {
                // Terminal: the slot is fulfilled and no further messages
                // are processed. Dropping the mailbox makes late senders
                // observe a closed channel.
                return;
            }
        }
    }

    fn handle(&mut self, event: ResolverEvent) {
        match event {
            ResolverEvent::Navigated {
                round: LookupRound::Table,
                result,
            } if matches!(self.state, State::AwaitingTableLookup) => self.on_table_resolved(result),
            ResolverEvent::Navigated {
                round: LookupRound::Domain,
                result,
            } if matches!(self.state, State::AwaitingDomainLookup) => self.on_domain_resolved(result),
            ResolverEvent::ScanResponse if matches!(self.state, State::AwaitingAggregatorScan) => {
                debug!(table_path = %self.table_path, "statistics scan acknowledged");
                self.complete(Ok(()));
            }
            other => self.on_unexpected(other),
        }
    }

    /// Round-1 response: the table resolved to its owning domain.
    fn on_table_resolved(&mut self, result: NavigateResult) {
        if result.status != NavigateStatus::Ok {
            self.complete(Err(ResolveError::unavailable(format!(
                "can't get statistics aggregator id: {}",
                result.status
            ))));
            return;
        }

        self.path_id = Some(result.path_id);
        let domain = result.domain;

        if !domain.is_serverless {
            if let Some(tablet_id) = domain.aggregator_id {
                self.send_scan(tablet_id);
                self.state = State::AwaitingAggregatorScan;
                return;
            }
            // Aggregator not yet known: resolve the domain by its own identity.
            self.navigate_domain(domain.domain_key);
        } else {
            // Serverless domains resolve through the domain hosting their
            // resources, never their own identity.
            self.navigate_domain(domain.resources_domain_key);
        }
    }

    fn navigate_domain(&mut self, key: PathId) {
        self.directory.navigate(NavigateRequest {
            key: NavigateKey::Id(key),
            round: LookupRound::Domain,
            reply: self.reply_addr.clone(),
        });
        self.state = State::AwaitingDomainLookup;
    }

    /// Round-2 response: a domain resolved by identity.
    fn on_domain_resolved(&mut self, result: NavigateResult) {
        if result.status != NavigateStatus::Ok {
            self.complete(Err(ResolveError::unavailable(format!(
                "can't get statistics aggregator id: {}",
                result.status
            ))));
            return;
        }

        match result.domain.aggregator_id {
            Some(tablet_id) => {
                // Send-no-wait: the refresh request is handed off and the
                // slot completes without awaiting the scan response.
                self.send_scan(tablet_id);
                self.complete(Ok(()));
            }
            None => {
                self.complete(Err(ResolveError::unavailable(
                    "can't get statistics aggregator id",
                )));
            }
        }
    }

    fn send_scan(&mut self, tablet_id: u64) {
        let Some(path_id) = self.path_id else {
            // Unreachable by construction: round 1 records the path id
            // before any scan can be requested.
            self.complete(Err(ResolveError::protocol_violation(
                "scan requested before table resolution",
            )));
            return;
        };
        debug!(table_path = %self.table_path, tablet_id, "sending statistics scan request");
        self.transport.send_scan(ScanRequest {
            tablet_id,
            path_id,
            track_delivery: true,
            reply: self.reply_addr.clone(),
        });
    }

    fn on_unexpected(&mut self, event: ResolverEvent) {
        error!(
            table_path = %self.table_path,
            ?event,
            "statistics resolver received an event outside the expected state"
        );
        self.complete(Err(ResolveError::protocol_violation(format!(
            "unexpected event: {event:?}"
        ))));
    }

    fn complete(&mut self, outcome: ResolveOutcome) {
        if let Some(slot) = self.slot.take() {
            // The caller may have dropped the receiving end; that is its
            // prerogative and not an error here.
            let _ = slot.send(outcome);
        }
    }
}

/// Resolve `table_path` to its statistics-aggregator tablet and trigger a
/// statistics-refresh scan. Completes exactly once, with `Ok(())` or a typed
/// [`ResolveError`]; never retries internally.
pub async fn resolve_and_scan(
    table_path: impl Into<String>,
    directory: Arc<dyn DirectoryService>,
    transport: Arc<dyn ScanTransport>,
) -> ResolveOutcome {
    let outcome = StatisticsResolver::spawn(table_path.into(), directory, transport);
    outcome.await.unwrap_or_else(|_| {
        Err(ResolveError::protocol_violation(
            "resolver terminated without completing",
        ))
    })
}
