//! Quorum arithmetic shared by the prepare tally and the learn threshold.

use crate::traits::PrepareReply;

/// Minimum number of responsive acceptors (or learner acknowledgements)
/// needed to decide an operation: `ceil(N/2)` for a cluster of `N`.
///
/// Note that for even `N` this is exactly half, not a strict majority;
/// the formula is fixed by the protocol and kept verbatim.
#[must_use]
pub fn majority(cluster_size: usize) -> usize {
    cluster_size.div_ceil(2)
}

/// Number of peers whose prepare response granted a promise.
///
/// `None` entries are peers that never answered; they count toward
/// neither side of the tally.
#[must_use]
pub fn granted(replies: &[Option<PrepareReply>]) -> usize {
    replies
        .iter()
        .flatten()
        .filter(|reply| **reply == PrepareReply::Promised)
        .count()
}
