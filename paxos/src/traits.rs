//! Role traits forming the remote call surface of a node.
//!
//! One node implements all four capabilities; the address book holds
//! them as separate object-safe handles so a transport collaborator can
//! substitute remote stubs per role. Transport-level failures (timeouts,
//! connection errors) must surface as the no-response outcome — `None`
//! from [`Acceptor::prepare`] — and never as errors.

use async_trait::async_trait;
use error_stack::Report;

use crate::error::WriteError;
use crate::operation::Operation;
use crate::proposal::ProposalId;

/// Outcome of a prepare request that reached a responsive acceptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrepareReply {
    /// Promise granted: the acceptor recorded the id for the key.
    Promised,
    /// A higher-sequence proposal is already promised for the key.
    Rejected,
}

/// Phase 1 and phase 2 handling.
#[async_trait]
pub trait Acceptor: Send + Sync {
    /// Ask for a promise on `operation`'s key. `None` is the
    /// no-response outcome: the acceptor is inside its outage window or
    /// the call never reached it.
    async fn prepare(&self, id: ProposalId, operation: &Operation) -> Option<PrepareReply>;

    /// Request acceptance of a prepared proposal. An acceptance is
    /// announced to every learner; an inconsistent or outaged acceptor
    /// ignores the call without an observable effect.
    async fn accept(&self, id: ProposalId, operation: &Operation);
}

/// Acknowledgement counting and decision application.
#[async_trait]
pub trait Learner: Send + Sync {
    /// Record that an acceptor accepted `(id, operation)`. The
    /// operation is applied to the local store exactly once, on the
    /// call that brings the count to quorum.
    async fn learn(&self, id: ProposalId, operation: &Operation);
}

/// Drives one full prepare/accept round.
#[async_trait]
pub trait Proposer: Send + Sync {
    /// Run the round for `(id, operation)`. No value is returned; the
    /// decision is observed through the learner role.
    async fn propose(&self, id: ProposalId, operation: Operation);
}

/// Client-facing key-value API.
///
/// Writes replicate through consensus and block until their round
/// completes. Reads answer from local state without consensus and may
/// be stale relative to in-flight decisions.
#[async_trait]
pub trait KeyValue: Send + Sync {
    /// Insert or update a key. Returns a status line on success.
    ///
    /// # Errors
    /// Fails when the write's proposal did not reach a decision.
    async fn put(&self, key: &str, value: &str) -> Result<String, Report<WriteError>>;

    /// Remove a key. Deleting an absent key still decides successfully.
    ///
    /// # Errors
    /// Fails when the write's proposal did not reach a decision.
    async fn delete(&self, key: &str) -> Result<String, Report<WriteError>>;

    /// Local read of a key's value.
    async fn get(&self, key: &str) -> Option<String>;

    /// Local membership check.
    async fn contains_key(&self, key: &str) -> bool;
}
