//! # Resolver Boundary Messages
//!
//! All communication at the resolver's boundary is asynchronous and
//! message-based. Outbound requests (`NavigateRequest`, `ScanRequest`) carry
//! a reply sender addressing the resolver's own mailbox; responses and
//! transport notifications come back only as [`ResolverEvent`]s through that
//! mailbox, never as direct return values. This keeps the state machine
//! single-threaded and makes the collaborators trivially replaceable by
//! scripted doubles in tests.

use std::fmt;
use tokio::sync::mpsc;

/// Resolved identity of a table or domain in the metadata directory:
/// the owning schemeshard plus a local id within it. Opaque to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathId {
    pub owner_id: u64,
    pub local_id: u64,
}

impl PathId {
    pub fn new(owner_id: u64, local_id: u64) -> Self {
        Self { owner_id, local_id }
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.owner_id, self.local_id)
    }
}

/// Descriptor of the domain owning a resolved path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainInfo {
    /// A serverless domain borrows compute/storage from another domain and
    /// never hosts its own statistics aggregator.
    pub is_serverless: bool,
    /// Tablet id of the domain's statistics aggregator, when already known.
    pub aggregator_id: Option<u64>,
    /// Identity of the domain itself.
    pub domain_key: PathId,
    /// Identity of the domain hosting this domain's resources. Equals
    /// `domain_key` for non-serverless domains.
    pub resources_domain_key: PathId,
}

/// Which of the two sequential directory lookups a request or response
/// belongs to. Both rounds use the same lookup primitive, so every message is
/// tagged to disambiguate which in-flight request a response answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupRound {
    /// Round 1: resolve the table itself, by path.
    Table,
    /// Round 2: resolve a domain, by identity.
    Domain,
}

/// Lookup key for a directory navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigateKey {
    /// By path, used for the round-1 table lookup.
    Path(String),
    /// By resolved identity, used for the round-2 domain lookup.
    Id(PathId),
}

/// Status returned by the metadata directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateStatus {
    Ok,
    PathNotFound,
    Unavailable,
}

impl fmt::Display for NavigateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigateStatus::Ok => write!(f, "Ok"),
            NavigateStatus::PathNotFound => write!(f, "PathNotFound"),
            NavigateStatus::Unavailable => write!(f, "Unavailable"),
        }
    }
}

/// Outbound directory lookup.
#[derive(Debug, Clone)]
pub struct NavigateRequest {
    pub key: NavigateKey,
    pub round: LookupRound,
    /// Where the directory posts the matching [`ResolverEvent::Navigated`].
    pub reply: mpsc::UnboundedSender<ResolverEvent>,
}

/// Payload of a directory lookup response. `path_id` and `domain` are only
/// meaningful when `status` is `Ok`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigateResult {
    pub status: NavigateStatus,
    pub path_id: PathId,
    pub domain: DomainInfo,
}

/// Outbound statistics-refresh request to an aggregator tablet.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Tablet id of the statistics aggregator to scan.
    pub tablet_id: u64,
    /// Resolved identity of the table whose statistics should be refreshed.
    pub path_id: PathId,
    /// Ask the transport for delivery tracking: an undeliverable request
    /// must come back as [`ResolverEvent::Undelivered`].
    pub track_delivery: bool,
    /// Where the transport posts the scan response or delivery failure.
    pub reply: mpsc::UnboundedSender<ResolverEvent>,
}

/// Inbound mailbox message for the resolver.
#[derive(Debug, Clone)]
pub enum ResolverEvent {
    /// Directory lookup response, tagged with the round it answers.
    Navigated {
        round: LookupRound,
        result: NavigateResult,
    },
    /// The aggregator tablet acknowledged the scan request.
    ScanResponse,
    /// The transport could not deliver the scan request.
    Undelivered { tablet_id: u64 },
}

/// Asynchronous lookup interface of the distributed metadata directory.
///
/// `navigate` is fire-and-forget: implementations answer by sending a
/// [`ResolverEvent::Navigated`] to `request.reply`, echoing the request's
/// round tag.
pub trait DirectoryService: Send + Sync + 'static {
    fn navigate(&self, request: NavigateRequest);
}

/// Asynchronous transport towards aggregator tablets.
///
/// `send_scan` is fire-and-forget: the scan response (or a delivery-failure
/// notification, when tracking was requested) arrives via `request.reply`.
pub trait ScanTransport: Send + Sync + 'static {
    fn send_scan(&self, request: ScanRequest);
}
