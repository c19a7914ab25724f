//! Proposal identifiers and their generation.

use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;

/// Node identity within the cluster, assigned densely from zero at
/// bootstrap.
pub type NodeId = usize;

/// Identifier ordering competing proposals for a key.
///
/// Combines the originating node with a millisecond clock reading.
/// The comparison the protocol actually applies ([`outranks`]) looks at
/// `sequence` alone and ignores the node tag, so ids minted by two
/// different nodes in the same clock tick compare equal and neither
/// outranks the other. That tie-break gap is part of the protocol's
/// observable behavior and is kept as-is; `Ord` is deliberately not
/// implemented so nothing can compare ids any other way by accident.
///
/// [`outranks`]: ProposalId::outranks
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalId {
    node: NodeId,
    sequence: u64,
}

impl ProposalId {
    /// Assemble an id from raw parts.
    #[must_use]
    pub fn new(node: NodeId, sequence: u64) -> Self {
        Self { node, sequence }
    }

    /// Originating node tag.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Clock-derived sequence component.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// `true` when this id supersedes `other` under the protocol's
    /// sequence-only comparison.
    #[must_use]
    pub fn outranks(&self, other: &ProposalId) -> bool {
        self.sequence > other.sequence
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.sequence)
    }
}

/// Mints one node's proposal ids.
///
/// Sequences are strictly increasing across calls even when the clock
/// stands still between them: a reading that has not moved past the
/// previous sequence is bumped by one.
#[derive(Debug)]
pub struct IdGenerator {
    node: NodeId,
    last: Mutex<u64>,
}

impl IdGenerator {
    #[must_use]
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            last: Mutex::new(0),
        }
    }

    /// Next id for this node, one clock read per call.
    pub fn next(&self, clock: &impl Clock) -> ProposalId {
        let mut last = self.last.lock().unwrap();
        let sequence = clock.now_millis().max(*last + 1);
        *last = sequence;
        ProposalId::new(self.node, sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn renders_as_node_and_sequence() {
        assert_eq!(ProposalId::new(3, 1700000000000).to_string(), "3:1700000000000");
    }

    #[test]
    fn higher_sequence_outranks() {
        let low = ProposalId::new(0, 10);
        let high = ProposalId::new(4, 11);
        assert!(high.outranks(&low));
        assert!(!low.outranks(&high));
    }

    #[test]
    fn same_tick_collision_outranks_neither_way() {
        // Two nodes proposing in the same millisecond: the node tag is
        // ignored by the comparison, so the ids are mutual non-superseders.
        let a = ProposalId::new(0, 42);
        let b = ProposalId::new(1, 42);
        assert!(!a.outranks(&b));
        assert!(!b.outranks(&a));
        assert_ne!(a, b);
    }

    #[test]
    fn sequences_are_strictly_increasing_on_a_stalled_clock() {
        let clock = ManualClock::new(100);
        let ids = IdGenerator::new(2);
        let first = ids.next(&clock);
        let second = ids.next(&clock);
        let third = ids.next(&clock);
        assert_eq!(first.sequence(), 100);
        assert_eq!(second.sequence(), 101);
        assert_eq!(third.sequence(), 102);
    }

    #[test]
    fn generator_follows_a_moving_clock() {
        let clock = ManualClock::new(100);
        let ids = IdGenerator::new(0);
        assert_eq!(ids.next(&clock).sequence(), 100);
        clock.set(500);
        assert_eq!(ids.next(&clock).sequence(), 500);
    }
}
