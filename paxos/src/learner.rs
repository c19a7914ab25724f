//! Acknowledgement counting and decide-once bookkeeping for the
//! learner role.

use std::collections::HashMap;

use crate::proposal::ProposalId;

#[derive(Clone, Copy, Debug)]
struct LearnEntry {
    acks: usize,
    decided: bool,
}

/// Per-proposal-id acknowledgement table.
///
/// The first acknowledgement for an id creates its entry at a count of
/// one; the quorum threshold is evaluated on subsequent calls only.
/// Entries are never removed, so replayed acknowledgements after a
/// decision keep counting without re-deciding.
#[derive(Debug)]
pub struct LearnerTable {
    entries: HashMap<ProposalId, LearnEntry>,
    threshold: usize,
}

impl LearnerTable {
    /// Table deciding at `threshold` acknowledgements.
    #[must_use]
    pub fn new(threshold: usize) -> Self {
        Self {
            entries: HashMap::new(),
            threshold,
        }
    }

    /// Record one acknowledgement for `id`.
    ///
    /// Returns `true` exactly once per id: on the call that brings an
    /// undecided entry to the threshold. The caller must then apply the
    /// operation.
    pub fn acknowledge(&mut self, id: ProposalId) -> bool {
        match self.entries.get_mut(&id) {
            None => {
                self.entries.insert(id, LearnEntry { acks: 1, decided: false });
                false
            }
            Some(entry) => {
                entry.acks += 1;
                if entry.acks >= self.threshold && !entry.decided {
                    entry.decided = true;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Whether `id` reached a decision.
    #[must_use]
    pub fn is_decided(&self, id: ProposalId) -> bool {
        self.entries.get(&id).is_some_and(|entry| entry.decided)
    }

    /// Acknowledgements observed for `id`.
    #[must_use]
    pub fn acks(&self, id: ProposalId) -> usize {
        self.entries.get(&id).map_or(0, |entry| entry.acks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_acknowledgement_only_creates_the_entry() {
        let mut table = LearnerTable::new(1);
        let id = ProposalId::new(0, 1);
        // Threshold one, but the creating call does not evaluate it.
        assert!(!table.acknowledge(id));
        assert_eq!(table.acks(id), 1);
        assert!(!table.is_decided(id));
    }

    #[test]
    fn decides_exactly_at_the_threshold() {
        let mut table = LearnerTable::new(3);
        let id = ProposalId::new(0, 1);
        assert!(!table.acknowledge(id));
        assert!(!table.acknowledge(id));
        assert!(table.acknowledge(id));
        assert!(table.is_decided(id));
    }

    #[test]
    fn never_decides_twice() {
        let mut table = LearnerTable::new(2);
        let id = ProposalId::new(1, 7);
        table.acknowledge(id);
        assert!(table.acknowledge(id));
        assert!(!table.acknowledge(id));
        assert!(!table.acknowledge(id));
        assert_eq!(table.acks(id), 4);
        assert!(table.is_decided(id));
    }

    #[test]
    fn ids_are_tracked_independently() {
        let mut table = LearnerTable::new(2);
        let a = ProposalId::new(0, 1);
        let b = ProposalId::new(1, 1);
        table.acknowledge(a);
        table.acknowledge(b);
        assert!(table.acknowledge(a));
        assert!(!table.is_decided(b));
    }
}
