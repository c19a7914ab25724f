//! Per-key promise bookkeeping for the acceptor role.
//!
//! Pure state transitions, no I/O: the [`Node`](crate::node::Node)
//! wraps this table in a lock and consults the outage window before
//! touching it.

use std::collections::HashMap;

use crate::operation::Operation;
use crate::proposal::ProposalId;
use crate::traits::PrepareReply;

/// Highest promise recorded for one key, together with the operation
/// that carried it.
#[derive(Clone, Debug)]
pub struct Promise {
    pub id: ProposalId,
    pub operation: Operation,
}

/// Per-key promise table.
///
/// Entries appear lazily on the first prepare for a key and are never
/// removed; a stored promise's sequence never decreases.
#[derive(Debug, Default)]
pub struct AcceptorTable {
    entries: HashMap<String, Promise>,
}

impl AcceptorTable {
    /// Phase 1 transition: record `(id, operation)` as the key's new
    /// promise unless a strictly higher-sequence promise is already
    /// held.
    pub fn prepare(&mut self, id: ProposalId, operation: &Operation) -> PrepareReply {
        if let Some(held) = self.entries.get(&operation.key) {
            if held.id.outranks(&id) {
                return PrepareReply::Rejected;
            }
        }
        self.entries.insert(
            operation.key.clone(),
            Promise {
                id,
                operation: operation.clone(),
            },
        );
        PrepareReply::Promised
    }

    /// `true` when accepting `id` is consistent with the key's recorded
    /// promise (stored sequence not above the incoming one).
    ///
    /// A key with no entry yields `false`: the accept is skipped as a
    /// defensive no-op. This cannot normally occur, since the prepare
    /// of the same round creates the entry first.
    #[must_use]
    pub fn permits_accept(&self, id: ProposalId, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|held| !held.id.outranks(&id))
    }

    /// Current promise for a key, if any.
    #[must_use]
    pub fn promise(&self, key: &str) -> Option<&Promise> {
        self.entries.get(key)
    }
}
