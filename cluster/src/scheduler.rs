//! Random failure injection.
//!
//! A background task that, after an initial delay and then at a fixed
//! period, picks a uniformly random node and forces it into its outage
//! window. The node recovers on its own once the window elapses; the
//! scheduler never brings anything back up.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tracing::warn;

use quorumkv_paxos::{Clock, Node};

/// Timing and seeding for the failure scheduler.
#[derive(Clone, Copy, Debug)]
pub struct SchedulerConfig {
    /// Delay before the first forced outage.
    pub initial_delay: Duration,
    /// Interval between forced outages.
    pub period: Duration,
    /// Seed for victim selection; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(10),
            period: Duration::from_secs(100),
            seed: None,
        }
    }
}

/// Spawn the scheduler over the given nodes. Abort the returned handle
/// to stop it.
pub fn spawn<C: Clock>(nodes: Vec<Arc<Node<C>>>, config: SchedulerConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        if nodes.is_empty() {
            return;
        }
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        tokio::time::sleep(config.initial_delay).await;
        loop {
            let victim = rng.random_range(0..nodes.len());
            warn!(node = victim, "forcing outage window");
            nodes[victim].mark_down();
            tokio::time::sleep(config.period).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorumkv_paxos::{ManualClock, NodeConfig};

    fn nodes(n: usize) -> Vec<Arc<Node<ManualClock>>> {
        let clock = ManualClock::new(0);
        (0..n)
            .map(|id| Arc::new(Node::new(id, NodeConfig::new(n), clock.clone())))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn first_outage_lands_after_the_initial_delay() {
        let nodes = nodes(5);
        let handle = spawn(
            nodes.clone(),
            SchedulerConfig {
                initial_delay: Duration::from_secs(10),
                period: Duration::from_secs(100),
                seed: Some(7),
            },
        );

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(nodes.iter().filter(|node| node.is_down()).count(), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(nodes.iter().filter(|node| node.is_down()).count(), 1);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn outages_repeat_each_period() {
        let nodes = nodes(5);
        let handle = spawn(
            nodes.clone(),
            SchedulerConfig {
                initial_delay: Duration::from_secs(1),
                period: Duration::from_secs(5),
                seed: Some(42),
            },
        );

        // Nodes never auto-recover here: their clock is manual and
        // stands still, so every forced outage stays visible.
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(nodes.iter().any(|node| node.is_down()));

        handle.abort();
    }
}
