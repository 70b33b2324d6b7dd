//! Headless dashboard state.
//!
//! The view model owns everything a dashboard renders: the three bucket
//! lists, the selected election and candidate, which modal is open, and the
//! creation form. Rendering layers read it through the query methods and
//! drive it through the operations; none of them hold a lock across an await.
//!
//! Each bucket keeps the sequence number of the last fetch issued for it. A
//! fetch only writes its result if its number is still the latest when it
//! completes, so overlapping refreshes resolve last-issued-wins.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use votechain_chain::Receipt;
use votechain_elections::{BucketRefresher, Election, ElectionRepository, ElectionStatus, FetchError};
use votechain_types::{Bucket, Clock, ElectionId, Timestamp, WalletAddress};
use votechain_utils::{format_duration, Notifier};
use votechain_wallet::{WalletError, WalletSession};

use crate::error::{ValidationError, WorkflowError};
use crate::form::{ElectionForm, FormField};
use crate::submission::SubmissionKind;
use crate::workflow::VotingWorkflow;

/// Which modal is open. At most one at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Modal {
    #[default]
    Closed,
    ElectionDetails,
    ConfirmVote,
    CreateElection,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectedCandidate {
    pub index: usize,
    pub name: String,
}

/// Result of a bucket refresh that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched list replaced the displayed one.
    Applied,
    /// A newer fetch was issued meanwhile; this result was dropped.
    Superseded,
    /// `sync_bucket` found the listed ids unchanged and fetched nothing.
    Unchanged,
}

/// One row of a bucket list, ready to display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ElectionCard {
    pub id: ElectionId,
    pub title: String,
    pub description: String,
    pub status: &'static str,
    pub time_label: String,
}

impl ElectionCard {
    pub fn new(election: &Election, now: Timestamp) -> Self {
        let status = election.status_at(now);
        let time_label = match status {
            ElectionStatus::Pending => {
                format!("starts in {}", format_duration(now.until(election.start_time)))
            }
            ElectionStatus::Active => {
                format!("ends in {}", format_duration(now.until(election.end_time)))
            }
            ElectionStatus::Ended => {
                format!("ended {} ago", format_duration(election.end_time.elapsed_since(now)))
            }
        };
        Self {
            id: election.id,
            title: election.title.clone(),
            description: election.description.clone(),
            status: status.label(),
            time_label,
        }
    }
}

#[derive(Default)]
struct BucketSlot {
    elections: Vec<Election>,
    issued: u64,
}

#[derive(Default)]
struct DashboardState {
    buckets: HashMap<Bucket, BucketSlot>,
    selected: Option<ElectionId>,
    candidate: Option<SelectedCandidate>,
    modal: Modal,
    form: ElectionForm,
    form_error: Option<ValidationError>,
    connected: Option<WalletAddress>,
}

impl DashboardState {
    fn slot_mut(&mut self, bucket: Bucket) -> &mut BucketSlot {
        self.buckets.entry(bucket).or_default()
    }

    fn find(&self, id: ElectionId) -> Option<&Election> {
        self.buckets
            .values()
            .flat_map(|slot| slot.elections.iter())
            .find(|e| e.id == id)
    }

    fn reset_selection(&mut self) {
        self.selected = None;
        self.candidate = None;
    }
}

pub struct DashboardViewModel {
    repository: ElectionRepository,
    workflow: Arc<VotingWorkflow>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<DashboardState>,
}

impl DashboardViewModel {
    pub fn new(
        repository: ElectionRepository,
        workflow: Arc<VotingWorkflow>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repository,
            workflow,
            clock,
            notifier,
            state: RwLock::new(DashboardState::default()),
        }
    }

    // ── Loading ────────────────────────────────────────────────────────

    /// Load all three buckets concurrently. Failures are notified per bucket.
    pub async fn mount(&self) {
        let (active, upcoming, past) = tokio::join!(
            self.refresh_bucket(Bucket::Active),
            self.refresh_bucket(Bucket::Upcoming),
            self.refresh_bucket(Bucket::Past),
        );
        for (bucket, result) in [
            (Bucket::Active, active),
            (Bucket::Upcoming, upcoming),
            (Bucket::Past, past),
        ] {
            if let Err(e) = result {
                self.notifier
                    .notify_error(&format!("Could not load {bucket} elections: {e}"));
            }
        }
    }

    /// Re-read `bucket` and display the result unless a newer fetch was
    /// issued in the meantime.
    ///
    /// A superseded fetch is dropped whether it succeeded or failed. A
    /// current failure leaves the displayed list as it was.
    pub async fn refresh_bucket(&self, bucket: Bucket) -> Result<RefreshOutcome, FetchError> {
        let seq = {
            let mut state = self.state.write().await;
            let slot = state.slot_mut(bucket);
            slot.issued += 1;
            slot.issued
        };

        let result = self.repository.fetch_bucket(bucket).await;

        let mut state = self.state.write().await;
        let slot = state.slot_mut(bucket);
        if slot.issued != seq {
            tracing::warn!(%bucket, seq, latest = slot.issued, "dropping superseded fetch");
            return Ok(RefreshOutcome::Superseded);
        }
        let elections = result?;
        tracing::debug!(%bucket, seq, count = elections.len(), "bucket refreshed");
        slot.elections = elections;
        Ok(RefreshOutcome::Applied)
    }

    /// Re-list the ids of `bucket` and refresh only if they differ from
    /// the displayed ones.
    pub async fn sync_bucket(&self, bucket: Bucket) -> Result<RefreshOutcome, FetchError> {
        let listed = self.repository.list_ids(bucket).await?;
        let shown: Vec<ElectionId> = self.bucket(bucket).await.iter().map(|e| e.id).collect();
        if listed == shown {
            return Ok(RefreshOutcome::Unchanged);
        }
        tracing::debug!(%bucket, "election ids changed");
        self.refresh_bucket(bucket).await
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub async fn bucket(&self, bucket: Bucket) -> Vec<Election> {
        self.state
            .read()
            .await
            .buckets
            .get(&bucket)
            .map(|slot| slot.elections.clone())
            .unwrap_or_default()
    }

    pub async fn election(&self, id: ElectionId) -> Option<Election> {
        self.state.read().await.find(id).cloned()
    }

    /// Status of a displayed election, against the clock at call time.
    pub async fn status_of(&self, id: ElectionId) -> Option<ElectionStatus> {
        let election = self.election(id).await?;
        Some(election.status_at(self.clock.now()))
    }

    pub async fn cards(&self, bucket: Bucket) -> Vec<ElectionCard> {
        let now = self.clock.now();
        self.bucket(bucket)
            .await
            .iter()
            .map(|e| ElectionCard::new(e, now))
            .collect()
    }

    pub async fn modal(&self) -> Modal {
        self.state.read().await.modal
    }

    pub async fn selected_election(&self) -> Option<Election> {
        let state = self.state.read().await;
        state.selected.and_then(|id| state.find(id).cloned())
    }

    pub async fn selected_candidate(&self) -> Option<SelectedCandidate> {
        self.state.read().await.candidate.clone()
    }

    pub async fn form(&self) -> ElectionForm {
        self.state.read().await.form.clone()
    }

    pub async fn form_error(&self) -> Option<ValidationError> {
        self.state.read().await.form_error.clone()
    }

    pub fn is_loading(&self, kind: SubmissionKind) -> bool {
        self.workflow.is_loading(kind)
    }

    // ── Voting ─────────────────────────────────────────────────────────

    /// Open the details modal for a displayed election.
    ///
    /// Returns `None` and changes nothing if the election is not displayed.
    pub async fn open_election(&self, id: ElectionId) -> Option<Election> {
        let mut state = self.state.write().await;
        let election = state.find(id).cloned()?;
        state.selected = Some(id);
        state.candidate = None;
        state.modal = Modal::ElectionDetails;
        Some(election)
    }

    pub async fn close_modal(&self) {
        let mut state = self.state.write().await;
        state.modal = Modal::Closed;
        state.reset_selection();
        state.form_error = None;
    }

    /// Choose a candidate of the open election and ask for confirmation.
    pub async fn pick_candidate(&self, index: usize) -> Result<SelectedCandidate, ValidationError> {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        let id = state.selected.ok_or(ValidationError::MissingElection)?;
        let election = state.find(id).ok_or(ValidationError::MissingElection)?;

        let status = election.status_at(now);
        if !status.accepts_votes() {
            return Err(ValidationError::VotingClosed(status.label()));
        }
        let candidate = election
            .candidate(index)
            .ok_or(ValidationError::MissingCandidate)?;
        let picked = SelectedCandidate {
            index,
            name: candidate.name.clone(),
        };
        state.candidate = Some(picked.clone());
        state.modal = Modal::ConfirmVote;
        Ok(picked)
    }

    /// Back out of the confirmation to the details modal.
    pub async fn cancel_vote(&self) {
        let mut state = self.state.write().await;
        state.candidate = None;
        if state.modal == Modal::ConfirmVote {
            state.modal = Modal::ElectionDetails;
        }
    }

    /// Submit the selected vote. On success the confirmation closes unless
    /// the user has since opened something else; on failure it stays open
    /// with the same selection.
    pub async fn confirm_vote(&self) -> Result<Receipt, WorkflowError> {
        let (election, candidate) = {
            let state = self.state.read().await;
            (state.selected, state.candidate.as_ref().map(|c| c.index))
        };

        let receipt = self.workflow.submit_vote(election, candidate, self).await?;

        // The user may have moved on while the vote was confirming.
        let mut state = self.state.write().await;
        if state.modal == Modal::ConfirmVote && state.selected == election {
            state.modal = Modal::Closed;
            state.reset_selection();
        }
        Ok(receipt)
    }

    // ── Creating ───────────────────────────────────────────────────────

    /// Open the creation modal, closing anything else that is open.
    pub async fn open_create_election(&self) {
        let mut state = self.state.write().await;
        state.reset_selection();
        state.form_error = None;
        state.modal = Modal::CreateElection;
    }

    pub async fn update_form(&self, field: FormField, value: impl Into<String>) {
        let mut state = self.state.write().await;
        state.form.set(field, value);
        state.form_error = None;
    }

    /// Submit the form. A validation failure is kept as the inline form
    /// error; success clears the form and closes the modal, provided the
    /// modal still shows the submitted values.
    pub async fn submit_new_election(&self) -> Result<Receipt, WorkflowError> {
        let form = self.form().await;

        match self.workflow.submit_new_election(&form, self).await {
            Ok(receipt) => {
                let mut state = self.state.write().await;
                if state.modal == Modal::CreateElection && state.form == form {
                    state.form.clear();
                    state.form_error = None;
                    state.modal = Modal::Closed;
                }
                Ok(receipt)
            }
            Err(WorkflowError::Validation(e)) => {
                self.state.write().await.form_error = Some(e.clone());
                Err(e.into())
            }
            Err(e) => Err(e),
        }
    }

    // ── Wallet ─────────────────────────────────────────────────────────

    pub async fn launch(&self, session: &WalletSession) -> Result<WalletAddress, WalletError> {
        match session.launch().await {
            Ok(address) => {
                self.state.write().await.connected = Some(address.clone());
                Ok(address)
            }
            Err(e) => {
                tracing::warn!(error = %e, "wallet launch failed");
                self.notifier
                    .notify_error(&format!("Could not connect wallet: {e}"));
                Err(e)
            }
        }
    }

    pub async fn disconnect(&self, session: &WalletSession) {
        session.disconnect().await;
        self.state.write().await.connected = None;
    }

    /// Abbreviated connected address, e.g. `0xa2f3...9fb0`.
    pub async fn connected_as(&self) -> Option<String> {
        self.state.read().await.connected.as_ref().map(WalletAddress::short)
    }
}

#[async_trait]
impl BucketRefresher for DashboardViewModel {
    async fn refresh(&self, bucket: Bucket) -> Result<(), FetchError> {
        self.refresh_bucket(bucket).await.map(|_| ())
    }
}
