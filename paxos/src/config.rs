//! Node configuration.

use std::time::Duration;

/// Cluster-wide constants a node needs at construction time.
#[derive(Clone, Copy, Debug)]
pub struct NodeConfig {
    /// Total number of nodes in the cluster, fixed for the process
    /// lifetime. Quorum is `ceil(cluster_size / 2)`.
    pub cluster_size: usize,
    /// Fixed length of a self-imposed outage window.
    pub outage: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            cluster_size: 5,
            outage: Duration::from_secs(100),
        }
    }
}

impl NodeConfig {
    /// Defaults with the given cluster size.
    #[must_use]
    pub fn new(cluster_size: usize) -> Self {
        Self {
            cluster_size,
            ..Self::default()
        }
    }

    /// Override the outage window length.
    #[must_use]
    pub fn with_outage(mut self, outage: Duration) -> Self {
        self.outage = outage;
        self
    }
}
