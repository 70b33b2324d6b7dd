//! Nullable chain: an in-memory voting contract.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use votechain_chain::{
    ChainClient, ChainError, ContractCall, ElectionContract, Receipt, ReceiptStatus, TxHandle,
};
use votechain_types::{Bucket, Clock, ElectionId, Timestamp, TxHash, WalletAddress};

use crate::clock::NullClock;

/// Creator recorded for elections inserted directly by tests.
pub const DEFAULT_CREATOR: &str = "0xa2f3000000000000000000000000000000039fb0";

/// An election as the in-memory contract stores it.
#[derive(Clone, Debug)]
pub struct StoredElection {
    pub title: String,
    pub description: String,
    pub start_time: u64,
    pub end_time: u64,
    pub creator: WalletAddress,
    pub candidates: Vec<(String, u64)>,
}

impl StoredElection {
    pub fn new(title: &str, start_time: u64, end_time: u64, candidates: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            description: String::new(),
            start_time,
            end_time,
            creator: WalletAddress::parse(DEFAULT_CREATOR).expect("constant address is valid"),
            candidates: candidates.iter().map(|n| (n.to_string(), 0)).collect(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// How `wait_for_receipt` behaves for submitted transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReceiptMode {
    /// Apply the transaction and return a success receipt.
    #[default]
    Confirm,
    /// Return a reverted receipt without applying anything.
    Revert,
    /// Never produce a receipt.
    Stall,
}

struct PendingTx {
    from: WalletAddress,
    call: ContractCall,
}

#[derive(Default)]
struct ChainState {
    elections: BTreeMap<u64, StoredElection>,
    next_id: u64,
    list_order: HashMap<Bucket, Vec<ElectionId>>,
    pending: HashMap<TxHash, PendingTx>,
    next_tx: u64,
    block_number: u64,
    receipt_mode: ReceiptMode,
    read_log: Vec<ContractCall>,
    read_delays: HashMap<String, VecDeque<Duration>>,
    election_delays: HashMap<u64, Duration>,
    read_failures: HashMap<String, String>,
    election_failures: HashMap<u64, String>,
}

/// An in-memory voting contract.
///
/// Buckets are derived from the shared [`NullClock`] the same way the real
/// contract derives them from block time. Reads take their snapshot when the
/// call is made and then sleep for any configured delay, so a delayed read
/// returns the state as of the moment it was issued.
pub struct NullChain {
    clock: Arc<NullClock>,
    state: Mutex<ChainState>,
}

impl NullChain {
    pub fn new(clock: Arc<NullClock>) -> Self {
        Self {
            clock,
            state: Mutex::new(ChainState {
                next_id: 1,
                ..ChainState::default()
            }),
        }
    }

    pub fn clock(&self) -> &Arc<NullClock> {
        &self.clock
    }

    /// Store an election and return the id the contract assigned.
    pub fn insert(&self, election: StoredElection) -> ElectionId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state.elections.insert(id, election);
        ElectionId::new(id)
    }

    pub fn set_votes(&self, id: ElectionId, candidate: usize, votes: u64) {
        let mut state = self.state.lock().unwrap();
        if let Some(c) = state
            .elections
            .get_mut(&id.as_u64())
            .and_then(|e| e.candidates.get_mut(candidate))
        {
            c.1 = votes;
        }
    }

    pub fn election(&self, id: ElectionId) -> Option<StoredElection> {
        self.state.lock().unwrap().elections.get(&id.as_u64()).cloned()
    }

    pub fn election_count(&self) -> usize {
        self.state.lock().unwrap().elections.len()
    }

    /// Ids the contract would list for `bucket` right now.
    pub fn ids_in(&self, bucket: Bucket) -> Vec<ElectionId> {
        let state = self.state.lock().unwrap();
        Self::bucket_ids(&state, bucket, self.clock.now())
    }

    /// Force the order `bucket` is listed in, instead of ascending id.
    pub fn set_list_order(&self, bucket: Bucket, ids: Vec<ElectionId>) {
        self.state.lock().unwrap().list_order.insert(bucket, ids);
    }

    /// Delay the next read of `function` by `delay`. Queued per function.
    pub fn delay_next_read(&self, function: &str, delay: Duration) {
        self.state
            .lock()
            .unwrap()
            .read_delays
            .entry(function.to_string())
            .or_default()
            .push_back(delay);
    }

    /// Delay every detail read for `id`.
    pub fn delay_election(&self, id: ElectionId, delay: Duration) {
        self.state
            .lock()
            .unwrap()
            .election_delays
            .insert(id.as_u64(), delay);
    }

    /// Make every read of `function` fail with a node error.
    pub fn fail_reads(&self, function: &str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .read_failures
            .insert(function.to_string(), message.to_string());
    }

    /// Make every detail read for `id` fail with a node error.
    pub fn fail_election(&self, id: ElectionId, message: &str) {
        self.state
            .lock()
            .unwrap()
            .election_failures
            .insert(id.as_u64(), message.to_string());
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock().unwrap();
        state.read_failures.clear();
        state.election_failures.clear();
    }

    pub fn set_receipt_mode(&self, mode: ReceiptMode) {
        self.state.lock().unwrap().receipt_mode = mode;
    }

    /// Number of reads of `function` so far.
    pub fn read_count(&self, function: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .read_log
            .iter()
            .filter(|c| c.function == function)
            .count()
    }

    pub fn reads(&self) -> Vec<ContractCall> {
        self.state.lock().unwrap().read_log.clone()
    }

    /// Accept a signed call for inclusion; applied when its receipt is awaited.
    pub fn enqueue(&self, from: WalletAddress, call: ContractCall) -> TxHandle {
        let mut state = self.state.lock().unwrap();
        state.next_tx += 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&state.next_tx.to_be_bytes());
        let hash = TxHash::new(bytes);
        state.pending.insert(hash, PendingTx { from, call });
        TxHandle::new(hash)
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().unwrap().pending.len()
    }

    fn bucket_ids(state: &ChainState, bucket: Bucket, now: Timestamp) -> Vec<ElectionId> {
        if let Some(order) = state.list_order.get(&bucket) {
            return order.clone();
        }
        let now = now.as_secs();
        state
            .elections
            .iter()
            .filter(|(_, e)| match bucket {
                Bucket::Active => e.start_time <= now && now < e.end_time,
                Bucket::Upcoming => now < e.start_time,
                Bucket::Past => now >= e.end_time,
            })
            .map(|(id, _)| ElectionId::new(*id))
            .collect()
    }

    fn id_arg(call: &ContractCall) -> Result<u64, ChainError> {
        call.args
            .first()
            .and_then(Value::as_u64)
            .ok_or_else(|| ChainError::Node(format!("{}: missing election id", call.function)))
    }

    /// Evaluate a read against the current state.
    fn evaluate(&self, state: &ChainState, call: &ContractCall) -> (Result<Value, ChainError>, Duration) {
        let mut delay = Duration::ZERO;
        if let Some(msg) = state.read_failures.get(&call.function) {
            return (Err(ChainError::Node(msg.clone())), delay);
        }

        let listed = match call.function.as_str() {
            ElectionContract::GET_ACTIVE_ELECTIONS => Some(Bucket::Active),
            ElectionContract::GET_UPCOMING_ELECTIONS => Some(Bucket::Upcoming),
            ElectionContract::GET_PAST_ELECTIONS => Some(Bucket::Past),
            _ => None,
        };
        if let Some(bucket) = listed {
            let ids: Vec<u64> = Self::bucket_ids(state, bucket, self.clock.now())
                .iter()
                .map(ElectionId::as_u64)
                .collect();
            return (Ok(json!(ids)), delay);
        }

        let id = match Self::id_arg(call) {
            Ok(id) => id,
            Err(e) => return (Err(e), delay),
        };
        if let Some(d) = state.election_delays.get(&id) {
            delay = *d;
        }
        if let Some(msg) = state.election_failures.get(&id) {
            return (Err(ChainError::Node(msg.clone())), delay);
        }
        let Some(election) = state.elections.get(&id) else {
            return (
                Err(ChainError::Node(format!("election {id} does not exist"))),
                delay,
            );
        };

        let value = match call.function.as_str() {
            ElectionContract::GET_ELECTION => json!({
                "id": id,
                "title": election.title,
                "description": election.description,
                "startTime": election.start_time,
                "endTime": election.end_time,
                "creator": election.creator.as_str(),
            }),
            ElectionContract::GET_CANDIDATES => {
                let names: Vec<&str> = election.candidates.iter().map(|c| c.0.as_str()).collect();
                let counts: Vec<u64> = election.candidates.iter().map(|c| c.1).collect();
                json!([names, counts])
            }
            other => {
                return (
                    Err(ChainError::Node(format!("unknown function {other}"))),
                    delay,
                )
            }
        };
        (Ok(value), delay)
    }

    /// Execute a confirmed transaction. `false` means the contract reverted.
    fn apply(state: &mut ChainState, tx: PendingTx) -> bool {
        let args = &tx.call.args;
        match tx.call.function.as_str() {
            ElectionContract::VOTE => {
                let (Some(id), Some(index)) = (
                    args.first().and_then(Value::as_u64),
                    args.get(1).and_then(Value::as_u64),
                ) else {
                    return false;
                };
                match state
                    .elections
                    .get_mut(&id)
                    .and_then(|e| e.candidates.get_mut(index as usize))
                {
                    Some(candidate) => {
                        candidate.1 += 1;
                        true
                    }
                    None => false,
                }
            }
            ElectionContract::CREATE_ELECTION => {
                let parsed = (
                    args.first().and_then(Value::as_str),
                    args.get(1).and_then(Value::as_str),
                    args.get(2).and_then(Value::as_u64),
                    args.get(3).and_then(Value::as_u64),
                    args.get(4).and_then(Value::as_array),
                );
                let (Some(title), Some(description), Some(start), Some(end), Some(names)) = parsed
                else {
                    return false;
                };
                if start >= end {
                    return false;
                }
                let id = state.next_id;
                state.next_id += 1;
                state.elections.insert(
                    id,
                    StoredElection {
                        title: title.to_string(),
                        description: description.to_string(),
                        start_time: start,
                        end_time: end,
                        creator: tx.from,
                        candidates: names
                            .iter()
                            .filter_map(Value::as_str)
                            .map(|n| (n.to_string(), 0))
                            .collect(),
                    },
                );
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl ChainClient for NullChain {
    async fn read(&self, call: ContractCall) -> Result<Value, ChainError> {
        let (result, delay) = {
            let mut state = self.state.lock().unwrap();
            state.read_log.push(call.clone());
            let (result, mut delay) = self.evaluate(&state, &call);
            if let Some(queued) = state
                .read_delays
                .get_mut(&call.function)
                .and_then(VecDeque::pop_front)
            {
                delay += queued;
            }
            (result, delay)
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn wait_for_receipt(&self, handle: &TxHandle) -> Result<Receipt, ChainError> {
        let receipt = {
            let mut state = self.state.lock().unwrap();
            let mode = state.receipt_mode;
            match mode {
                ReceiptMode::Stall => None,
                mode => {
                    let tx = state
                        .pending
                        .remove(&handle.hash)
                        .ok_or_else(|| ChainError::Node(format!("unknown transaction {}", handle.hash)))?;
                    let applied = mode == ReceiptMode::Confirm && Self::apply(&mut state, tx);
                    state.block_number += 1;
                    Some(Receipt {
                        tx_hash: handle.hash,
                        block_number: state.block_number,
                        status: if applied {
                            ReceiptStatus::Success
                        } else {
                            ReceiptStatus::Reverted
                        },
                    })
                }
            }
        };
        match receipt {
            Some(receipt) => Ok(receipt),
            None => std::future::pending().await,
        }
    }
}
