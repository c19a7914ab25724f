//! A cluster node: proposer, acceptor and learner in one entity, plus
//! the client-facing key-value API.

use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use error_stack::Report;
use tracing::{debug, instrument, trace, warn};

use crate::acceptor::AcceptorTable;
use crate::availability::Availability;
use crate::clock::{Clock, SystemClock};
use crate::config::NodeConfig;
use crate::error::WriteError;
use crate::learner::LearnerTable;
use crate::operation::Operation;
use crate::proposal::{IdGenerator, NodeId, ProposalId};
use crate::quorum::{granted, majority};
use crate::store::Store;
use crate::traits::{Acceptor, KeyValue, Learner, PrepareReply, Proposer};

/// Read-only peer handles, assembled once at cluster startup.
///
/// Every node's book lists every node in the cluster — itself included —
/// in node-id order, one handle per role.
pub struct AddressBook {
    pub acceptors: Vec<Arc<dyn Acceptor>>,
    pub learners: Vec<Arc<dyn Learner>>,
}

/// One replica of the store.
///
/// Each capability's state lives in its own field behind its own lock:
/// the promise table, the acknowledgement table, the outage flag and
/// the store never share a guard. Client writes are additionally
/// serialized per node by an async gate that the protocol handlers do
/// not take, so a node driving a round against itself cannot deadlock.
pub struct Node<C: Clock = SystemClock> {
    id: NodeId,
    config: NodeConfig,
    clock: C,
    ids: IdGenerator,
    peers: OnceLock<AddressBook>,
    write_gate: tokio::sync::Mutex<()>,
    acceptor: Mutex<AcceptorTable>,
    learner: Mutex<LearnerTable>,
    availability: Mutex<Availability>,
    store: Store,
}

impl<C: Clock> Node<C> {
    #[must_use]
    pub fn new(id: NodeId, config: NodeConfig, clock: C) -> Self {
        Self {
            id,
            config,
            clock,
            ids: IdGenerator::new(id),
            peers: OnceLock::new(),
            write_gate: tokio::sync::Mutex::new(()),
            acceptor: Mutex::new(AcceptorTable::default()),
            learner: Mutex::new(LearnerTable::new(majority(config.cluster_size))),
            availability: Mutex::new(Availability::default()),
            store: Store::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Install the cluster address book. The bootstrap calls this once
    /// per node before any client traffic; later calls are ignored.
    pub fn connect(&self, peers: AddressBook) {
        let _ = self.peers.set(peers);
    }

    /// # Panics
    /// Panics if the address book was never installed; wiring completes
    /// at startup, before any call that reaches here.
    fn peers(&self) -> &AddressBook {
        self.peers.get().expect("address book installed at startup")
    }

    /// Force this node into its outage window.
    pub fn mark_down(&self) {
        warn!(node = self.id, "entering outage window");
        self.availability.lock().unwrap().mark_down(&self.clock);
    }

    /// Probe the outage window, lazily clearing it once it has elapsed.
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.availability
            .lock()
            .unwrap()
            .is_down(&self.clock, self.config.outage)
    }

    /// Whether a proposal id reached a decision on this node.
    #[must_use]
    pub fn is_decided(&self, id: ProposalId) -> bool {
        self.learner.lock().unwrap().is_decided(id)
    }

    /// Drive one client write through a full round and report whether
    /// this node observed the decision before the round returned.
    async fn run_round(&self, operation: Operation) -> Result<(), Report<WriteError>> {
        let _gate = self.write_gate.lock().await;
        let id = self.ids.next(&self.clock);
        self.propose(id, operation.clone()).await;
        if self.is_decided(id) {
            Ok(())
        } else {
            Err(Report::new(WriteError)
                .attach_printable(format!("operation: {operation}"))
                .attach_printable(format!("proposal: {id}")))
        }
    }
}

#[async_trait]
impl<C: Clock> Proposer for Node<C> {
    #[instrument(skip_all, fields(node = self.id, id = %id))]
    async fn propose(&self, id: ProposalId, operation: Operation) {
        let peers = self.peers();
        let cluster_size = peers.acceptors.len();

        // Phase 1: fan the prepare out to every acceptor. The calls are
        // independent remote invocations; a peer in its outage window
        // shows up as None and simply does not participate.
        let mut replies = Vec::with_capacity(cluster_size);
        for acceptor in &peers.acceptors {
            replies.push(acceptor.prepare(id, &operation).await);
        }

        let promised = granted(&replies);
        let needed = majority(cluster_size);
        if promised < needed {
            warn!(promised, needed, %operation, "prepare round fell short of quorum");
            return;
        }
        debug!(promised, needed, "prepare quorum reached");

        // Phase 2: best-effort broadcast to every peer that answered at
        // all — rejecting peers included. Their own promise check
        // decides whether the accept takes effect.
        for (acceptor, reply) in peers.acceptors.iter().zip(&replies) {
            if reply.is_some() {
                acceptor.accept(id, &operation).await;
            }
        }
    }
}

#[async_trait]
impl<C: Clock> Acceptor for Node<C> {
    async fn prepare(&self, id: ProposalId, operation: &Operation) -> Option<PrepareReply> {
        if self.is_down() {
            trace!(node = self.id, %id, "prepare unanswered: outage window");
            return None;
        }
        let reply = self.acceptor.lock().unwrap().prepare(id, operation);
        trace!(node = self.id, %id, key = %operation.key, ?reply, "prepare");
        Some(reply)
    }

    async fn accept(&self, id: ProposalId, operation: &Operation) {
        if self.is_down() {
            trace!(node = self.id, %id, "accept ignored: outage window");
            return;
        }
        if !self
            .acceptor
            .lock()
            .unwrap()
            .permits_accept(id, &operation.key)
        {
            trace!(node = self.id, %id, key = %operation.key, "accept skipped: no consistent promise");
            return;
        }
        // Announce the acceptance to every learner, self included.
        for learner in &self.peers().learners {
            learner.learn(id, operation).await;
        }
    }
}

#[async_trait]
impl<C: Clock> Learner for Node<C> {
    async fn learn(&self, id: ProposalId, operation: &Operation) {
        let decide = self.learner.lock().unwrap().acknowledge(id);
        if decide {
            self.store.apply(operation);
            debug!(node = self.id, %id, %operation, "decision applied");
        }
    }
}

#[async_trait]
impl<C: Clock> KeyValue for Node<C> {
    async fn put(&self, key: &str, value: &str) -> Result<String, Report<WriteError>> {
        self.run_round(Operation::put(key, value)).await?;
        Ok(format!(
            "PUT operation successful for key - {key} with value - {value}"
        ))
    }

    async fn delete(&self, key: &str) -> Result<String, Report<WriteError>> {
        self.run_round(Operation::delete(key)).await?;
        Ok(format!("DELETE operation successful for key - {key}"))
    }

    async fn get(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }

    async fn contains_key(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }
}
