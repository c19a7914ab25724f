//! In-process cluster bootstrap.
//!
//! Instantiates N nodes with ids `0..N-1` and hands every node the
//! complete address book — every node can reach every node's acceptor
//! and learner roles, its own included — before any client traffic.
//! The wiring is static for the process lifetime.

use std::fmt;
use std::sync::Arc;

use error_stack::Report;
use tracing::info;

use quorumkv_paxos::{Acceptor, AddressBook, Learner, Node, NodeConfig, SystemClock};

/// Marker error for cluster construction failures.
#[derive(Debug)]
pub struct ClusterError;

impl fmt::Display for ClusterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cluster bootstrap failed")
    }
}

impl core::error::Error for ClusterError {}

/// A fully wired in-process cluster.
pub struct LocalCluster {
    nodes: Vec<Arc<Node<SystemClock>>>,
}

impl LocalCluster {
    /// Build and wire `config.cluster_size` nodes.
    ///
    /// # Errors
    /// Fails on a zero-size cluster.
    pub fn start(config: NodeConfig) -> Result<Self, Report<ClusterError>> {
        if config.cluster_size == 0 {
            return Err(
                Report::new(ClusterError).attach_printable("cluster size must be at least 1")
            );
        }

        let nodes: Vec<Arc<Node<SystemClock>>> = (0..config.cluster_size)
            .map(|id| Arc::new(Node::new(id, config, SystemClock)))
            .collect();

        for node in &nodes {
            node.connect(AddressBook {
                acceptors: nodes
                    .iter()
                    .map(|peer| Arc::clone(peer) as Arc<dyn Acceptor>)
                    .collect(),
                learners: nodes
                    .iter()
                    .map(|peer| Arc::clone(peer) as Arc<dyn Learner>)
                    .collect(),
            });
        }

        info!(nodes = nodes.len(), "cluster wired");
        Ok(Self { nodes })
    }

    /// All nodes, in id order.
    #[must_use]
    pub fn nodes(&self) -> &[Arc<Node<SystemClock>>] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorumkv_paxos::KeyValue;

    #[test]
    fn zero_size_cluster_is_rejected() {
        assert!(LocalCluster::start(NodeConfig::new(0)).is_err());
    }

    #[tokio::test]
    async fn wired_cluster_replicates_a_write() {
        let cluster = LocalCluster::start(NodeConfig::new(5)).expect("bootstrap");
        cluster.nodes()[0].put("k", "v").await.expect("put decides");
        for node in cluster.nodes() {
            assert_eq!(node.get("k").await.as_deref(), Some("v"));
        }
    }
}
