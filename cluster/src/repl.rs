//! Interactive command front end.
//!
//! Parses the client grammar — `PUT <key> <value>`, `GET <key>`,
//! `DELETE <key>`, case-insensitive `EXIT` — and dispatches each
//! command to a randomly chosen node, so traffic spreads across
//! replicas. Malformed input (wrong token count) is rejected here and
//! never reaches a node.

use std::sync::Arc;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use quorumkv_paxos::{KeyValue, Node, SystemClock};

use crate::bootstrap::LocalCluster;

/// A parsed client command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Put { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Exit,
}

impl Command {
    /// Parse one input line.
    ///
    /// # Errors
    /// Returns a client-facing message for empty, unknown or
    /// wrong-arity input.
    pub fn parse(line: &str) -> Result<Self, String> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [] => Err("empty command".to_string()),
            [word] if word.eq_ignore_ascii_case("exit") => Ok(Self::Exit),
            ["PUT", key, value] => Ok(Self::Put {
                key: (*key).to_string(),
                value: (*value).to_string(),
            }),
            ["GET", key] => Ok(Self::Get {
                key: (*key).to_string(),
            }),
            ["DELETE", key] => Ok(Self::Delete {
                key: (*key).to_string(),
            }),
            ["PUT", ..] => Err("PUT operation failed due to malformed input".to_string()),
            ["GET", ..] => Err("GET operation failed due to malformed input".to_string()),
            ["DELETE", ..] => Err("DELETE operation failed due to malformed input".to_string()),
            _ => Err("operation failed due to malformed input".to_string()),
        }
    }
}

/// REPL state: the cluster plus the RNG picking a node per command.
pub struct ReplContext {
    cluster: LocalCluster,
    rng: StdRng,
}

impl ReplContext {
    #[must_use]
    pub fn new(cluster: LocalCluster, rng: StdRng) -> Self {
        Self { cluster, rng }
    }

    fn pick_node(&mut self) -> Arc<Node<SystemClock>> {
        let index = self.rng.random_range(0..self.cluster.len());
        Arc::clone(&self.cluster.nodes()[index])
    }

    /// Execute one parsed command. `Exit` is the caller's concern and
    /// produces empty output here.
    ///
    /// # Errors
    /// Returns the rendered failure of a write that reached no
    /// decision.
    pub async fn execute(&mut self, command: Command) -> Result<String, String> {
        let node = self.pick_node();
        debug!(node = node.id(), ?command, "dispatch");
        match command {
            Command::Put { key, value } => node
                .put(&key, &value)
                .await
                .map_err(|report| report.to_string()),
            Command::Get { key } => Ok(match node.get(&key).await {
                Some(value) => value,
                None => format!("No entry exists for key - {key}"),
            }),
            Command::Delete { key } => node
                .delete(&key)
                .await
                .map_err(|report| report.to_string()),
            Command::Exit => Ok(String::new()),
        }
    }

    /// Warm-up writes `key0 value0` through `key9 value9`.
    pub async fn prepopulate(&mut self) {
        info!("pre-populating the store");
        for i in 0..10 {
            let command = Command::Put {
                key: format!("key{i}"),
                value: format!("value{i}"),
            };
            match self.execute(command).await {
                Ok(status) => info!(%status, "pre-population write"),
                Err(error) => info!(%error, "pre-population write failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorumkv_paxos::NodeConfig;
    use rand::SeedableRng;

    #[test]
    fn parses_the_client_grammar() {
        assert_eq!(
            Command::parse("PUT key0 value0"),
            Ok(Command::Put {
                key: "key0".to_string(),
                value: "value0".to_string(),
            })
        );
        assert_eq!(
            Command::parse("GET key0"),
            Ok(Command::Get {
                key: "key0".to_string(),
            })
        );
        assert_eq!(
            Command::parse("DELETE key0"),
            Ok(Command::Delete {
                key: "key0".to_string(),
            })
        );
    }

    #[test]
    fn exit_is_case_insensitive() {
        assert_eq!(Command::parse("EXIT"), Ok(Command::Exit));
        assert_eq!(Command::parse("exit"), Ok(Command::Exit));
        assert_eq!(Command::parse("Exit"), Ok(Command::Exit));
    }

    #[test]
    fn wrong_token_counts_are_rejected() {
        assert!(Command::parse("PUT key0").is_err());
        assert!(Command::parse("PUT key0 value0 extra").is_err());
        assert!(Command::parse("GET").is_err());
        assert!(Command::parse("GET key0 extra").is_err());
        assert!(Command::parse("DELETE").is_err());
        assert!(Command::parse("").is_err());
        assert!(Command::parse("FROB key0").is_err());
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert!(Command::parse("put key0 value0").is_err());
        assert!(Command::parse("get key0").is_err());
    }

    #[tokio::test]
    async fn dispatches_against_the_cluster() {
        let cluster = LocalCluster::start(NodeConfig::new(5)).expect("bootstrap");
        let mut context = ReplContext::new(cluster, StdRng::seed_from_u64(1));

        let status = context
            .execute(Command::Put {
                key: "key0".to_string(),
                value: "value0".to_string(),
            })
            .await
            .expect("put decides");
        assert!(status.contains("PUT operation successful"));

        let value = context
            .execute(Command::Get {
                key: "key0".to_string(),
            })
            .await
            .expect("get is infallible");
        assert_eq!(value, "value0");

        context
            .execute(Command::Delete {
                key: "key0".to_string(),
            })
            .await
            .expect("delete decides");

        let missing = context
            .execute(Command::Get {
                key: "key0".to_string(),
            })
            .await
            .expect("get is infallible");
        assert_eq!(missing, "No entry exists for key - key0");
    }
}
