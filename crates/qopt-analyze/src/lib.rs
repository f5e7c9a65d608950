//! # qopt-analyze: Statistics-Refresh Resolution
//!
//! This crate implements the distributed side of cost-based optimization
//! support: given a table path, find the tablet acting as statistics
//! aggregator for the table's domain and ask it to (re)scan the table so that
//! fresh cardinality estimates become available to the optimizer.
//!
//! ## Resolution Protocol
//!
//! The metadata directory is navigated in up to two rounds:
//!
//! 1. **Round 1** resolves the table by path. If the table's domain is not
//!    serverless and already names its statistics aggregator, the scan
//!    request goes out immediately.
//! 2. **Round 2** resolves a domain by identity -- the table's own domain
//!    when it is non-serverless but did not name an aggregator, or the domain
//!    hosting its shared resources when it is serverless.
//!
//! The resolver is a single-tasked, message-driven state machine
//! ([`resolver::StatisticsResolver`]). It suspends between sending a request
//! and receiving the matching response, completes a single-assignment result
//! slot exactly once, and terminates immediately afterward. There are no
//! internal retries: every failure is terminal for the attempt and retry
//! policy belongs to the caller.
//!
//! ## Module Overview
//!
//! - **`message`**: Wire-shaped request/response/event types and the
//!   `DirectoryService` / `ScanTransport` traits at the component boundary.
//! - **`resolver`**: The state machine and the `resolve_and_scan` entry point.
//! - **`error`**: The failure taxonomy (`Unavailable` vs. `ProtocolViolation`).

pub mod error;
pub mod message;
pub mod resolver;

pub use error::ResolveError;
pub use message::{
    DirectoryService, DomainInfo, LookupRound, NavigateKey, NavigateRequest, NavigateResult,
    NavigateStatus, PathId, ResolverEvent, ScanRequest, ScanTransport,
};
pub use resolver::{resolve_and_scan, ResolveOutcome, StatisticsResolver};
