//! Vote and election-creation submission pipeline.
//!
//! Both operations run the same sequence:
//! validate → submit via the wallet → await confirmation (bounded) →
//! refresh the active bucket → notify.
//!
//! Validation failures never reach the wallet. Any later failure is reported
//! through the [`Notifier`] with the underlying message and skips the refresh.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use votechain_chain::{ChainClient, ContractCall, ElectionContract, Receipt};
use votechain_elections::BucketRefresher;
use votechain_types::{Bucket, ElectionId};
use votechain_utils::Notifier;
use votechain_wallet::WalletSigner;

use crate::error::{ConfirmationError, SubmissionError, ValidationError, WorkflowError};
use crate::form::ElectionForm;
use crate::submission::{PendingSubmission, SubmissionKind, SubmissionPayload, SubmissionStatus};

pub struct VotingWorkflow {
    signer: Arc<dyn WalletSigner>,
    chain: Arc<dyn ChainClient>,
    notifier: Arc<dyn Notifier>,
    confirmation_timeout: Duration,
    in_flight: Mutex<HashMap<SubmissionKind, PendingSubmission>>,
}

/// Holds the in-flight slot for one kind; frees it on drop, including when
/// the submitting future is dropped half way.
struct InFlightSlot<'a> {
    workflow: &'a VotingWorkflow,
    kind: SubmissionKind,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.workflow.slots().remove(&self.kind);
    }
}

impl InFlightSlot<'_> {
    fn update(&self, f: impl FnOnce(&mut PendingSubmission)) {
        if let Some(pending) = self.workflow.slots().get_mut(&self.kind) {
            f(pending);
        }
    }
}

impl VotingWorkflow {
    pub fn new(
        signer: Arc<dyn WalletSigner>,
        chain: Arc<dyn ChainClient>,
        notifier: Arc<dyn Notifier>,
        confirmation_timeout: Duration,
    ) -> Self {
        Self {
            signer,
            chain,
            notifier,
            confirmation_timeout,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a submission of `kind` is in flight.
    pub fn is_loading(&self, kind: SubmissionKind) -> bool {
        self.slots().contains_key(&kind)
    }

    /// Snapshot of the in-flight submission of `kind`, if any.
    pub fn pending(&self, kind: SubmissionKind) -> Option<PendingSubmission> {
        self.slots().get(&kind).cloned()
    }

    /// Cast a vote for `candidate_index` in `election_id`.
    ///
    /// Both must be resolved; otherwise this fails with a
    /// [`ValidationError`] before touching the wallet.
    pub async fn submit_vote(
        &self,
        election_id: Option<ElectionId>,
        candidate_index: Option<usize>,
        refresher: &dyn BucketRefresher,
    ) -> Result<Receipt, WorkflowError> {
        let election_id = election_id.ok_or(ValidationError::MissingElection)?;
        let candidate_index = candidate_index.ok_or(ValidationError::MissingCandidate)?;

        let payload = SubmissionPayload::Vote {
            election_id,
            candidate_index,
        };
        let call = ElectionContract::vote_call(election_id, candidate_index);
        let success = format!("Vote in election {election_id} confirmed");
        self.run(payload, call, success, "Vote failed", refresher)
            .await
    }

    /// Create an election from the form's values.
    pub async fn submit_new_election(
        &self,
        form: &ElectionForm,
        refresher: &dyn BucketRefresher,
    ) -> Result<Receipt, WorkflowError> {
        let new = form.validate()?;
        let call = ElectionContract::create_election_call(
            &new.title,
            &new.description,
            new.start_time,
            new.end_time,
            &new.candidate_names,
        );
        let success = format!("Election \"{}\" created", new.title);
        self.run(
            SubmissionPayload::CreateElection(new),
            call,
            success,
            "Election creation failed",
            refresher,
        )
        .await
    }

    async fn run(
        &self,
        payload: SubmissionPayload,
        call: ContractCall,
        success: String,
        failure: &str,
        refresher: &dyn BucketRefresher,
    ) -> Result<Receipt, WorkflowError> {
        let slot = self.claim(payload)?;

        let receipt = match self.submit_and_confirm(&slot, call).await {
            Ok(receipt) => receipt,
            Err(e) => {
                slot.update(|p| p.status = SubmissionStatus::Failed);
                tracing::warn!(kind = %slot.kind, error = %e, "submission failed");
                self.notifier.notify_error(&format!("{failure}: {e}"));
                return Err(e);
            }
        };
        slot.update(|p| p.status = SubmissionStatus::Succeeded);

        // The transaction is final at this point; a failed re-read is
        // reported on its own and does not undo the success.
        if let Err(e) = refresher.refresh(Bucket::Active).await {
            tracing::warn!(error = %e, "refresh after confirmation failed");
            self.notifier
                .notify_error(&format!("Could not refresh active elections: {e}"));
        }
        self.notifier.notify_success(&success);
        Ok(receipt)
    }

    async fn submit_and_confirm(
        &self,
        slot: &InFlightSlot<'_>,
        call: ContractCall,
    ) -> Result<Receipt, WorkflowError> {
        let handle = self
            .signer
            .submit(call)
            .await
            .map_err(SubmissionError::from)?;
        tracing::info!(kind = %slot.kind, hash = %handle.hash, "transaction submitted");
        slot.update(|p| {
            p.status = SubmissionStatus::Confirming;
            p.tx_hash = Some(handle.hash);
        });

        let receipt = tokio::time::timeout(
            self.confirmation_timeout,
            self.chain.wait_for_receipt(&handle),
        )
        .await
        .map_err(|_| ConfirmationError::Timeout(self.confirmation_timeout.as_secs()))?
        .map_err(ConfirmationError::from)?;

        if !receipt.succeeded() {
            return Err(ConfirmationError::Reverted(receipt.tx_hash).into());
        }
        tracing::info!(
            kind = %slot.kind,
            hash = %receipt.tx_hash,
            block = receipt.block_number,
            "transaction confirmed"
        );
        Ok(receipt)
    }

    fn claim(&self, payload: SubmissionPayload) -> Result<InFlightSlot<'_>, WorkflowError> {
        let kind = payload.kind();
        let mut slots = self.slots();
        if slots.contains_key(&kind) {
            tracing::debug!(%kind, "submission already in flight");
            return Err(WorkflowError::AlreadyInFlight(kind));
        }
        slots.insert(kind, PendingSubmission::new(payload));
        Ok(InFlightSlot {
            workflow: self,
            kind,
        })
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<SubmissionKind, PendingSubmission>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use votechain_chain::ReceiptStatus;
    use votechain_elections::FetchError;
    use votechain_nullables::{NullChain, NullClock, NullNotifier, NullSigner, ReceiptMode, StoredElection};
    use votechain_types::WalletAddress;

    const NOW: u64 = 1_746_000_000;

    #[derive(Default)]
    struct CountingRefresher {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl BucketRefresher for CountingRefresher {
        async fn refresh(&self, bucket: Bucket) -> Result<(), FetchError> {
            assert_eq!(bucket, Bucket::Active);
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(FetchError::Chain(votechain_chain::ChainError::Transport(
                    "connection reset".into(),
                )))
            } else {
                Ok(())
            }
        }
    }

    struct Fixture {
        chain: Arc<NullChain>,
        signer: Arc<NullSigner>,
        notifier: Arc<NullNotifier>,
        workflow: Arc<VotingWorkflow>,
    }

    fn fixture() -> Fixture {
        let chain = Arc::new(NullChain::new(Arc::new(NullClock::new(NOW))));
        let voter = WalletAddress::parse("0x00000000000000000000000000000000000000aa").unwrap();
        let signer = Arc::new(NullSigner::new(chain.clone(), voter));
        let notifier = Arc::new(NullNotifier::new());
        let workflow = Arc::new(VotingWorkflow::new(
            signer.clone(),
            chain.clone(),
            notifier.clone(),
            Duration::from_secs(120),
        ));
        Fixture {
            chain,
            signer,
            notifier,
            workflow,
        }
    }

    #[tokio::test]
    async fn vote_confirms_refreshes_and_notifies_once() {
        let f = fixture();
        let id = f
            .chain
            .insert(StoredElection::new("Board", NOW - 10, NOW + 10, &["Alice", "Bob"]));
        let refresher = CountingRefresher::default();

        let receipt = f
            .workflow
            .submit_vote(Some(id), Some(1), &refresher)
            .await
            .unwrap();

        assert_eq!(receipt.status, ReceiptStatus::Success);
        assert_eq!(f.signer.submitted(), vec![ElectionContract::vote_call(id, 1)]);
        assert_eq!(f.chain.election(id).unwrap().candidates[1].1, 1);
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.notifier.successes().len(), 1);
        assert!(f.notifier.errors().is_empty());
        assert!(!f.workflow.is_loading(SubmissionKind::Vote));
    }

    #[tokio::test]
    async fn missing_selection_never_reaches_wallet() {
        let f = fixture();
        let refresher = CountingRefresher::default();

        let err = f.workflow.submit_vote(None, Some(0), &refresher).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(ValidationError::MissingElection)));

        let err = f
            .workflow
            .submit_vote(Some(ElectionId::new(1)), None, &refresher)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(ValidationError::MissingCandidate)));

        assert_eq!(f.signer.submit_count(), 0);
        assert!(f.notifier.all().is_empty());
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejection_is_notified_with_wallet_message() {
        let f = fixture();
        f.signer.reject_with("User rejected the request");
        let refresher = CountingRefresher::default();

        let err = f
            .workflow
            .submit_vote(Some(ElectionId::new(5)), Some(1), &refresher)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Submission(_)));
        let errors = f.notifier.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("User rejected the request"));
        assert!(f.notifier.successes().is_empty());
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 0);
        assert!(!f.workflow.is_loading(SubmissionKind::Vote));
    }

    #[tokio::test]
    async fn reverted_receipt_is_a_confirmation_failure() {
        let f = fixture();
        f.chain.set_receipt_mode(ReceiptMode::Revert);
        let id = f.chain.insert(StoredElection::new("e", NOW - 1, NOW + 1, &["A"]));
        let refresher = CountingRefresher::default();

        let err = f
            .workflow
            .submit_vote(Some(id), Some(0), &refresher)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Confirmation(ConfirmationError::Reverted(_))
        ));
        assert_eq!(f.notifier.errors().len(), 1);
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_confirmation_times_out() {
        let f = fixture();
        f.chain.set_receipt_mode(ReceiptMode::Stall);
        let id = f.chain.insert(StoredElection::new("e", NOW - 1, NOW + 1, &["A"]));
        let refresher = CountingRefresher::default();

        let err = f
            .workflow
            .submit_vote(Some(id), Some(0), &refresher)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Confirmation(ConfirmationError::Timeout(120))
        ));
        assert!(f.notifier.errors()[0].contains("120s"));
        assert!(!f.workflow.is_loading(SubmissionKind::Vote));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_success() {
        let f = fixture();
        let id = f.chain.insert(StoredElection::new("e", NOW - 1, NOW + 1, &["A"]));
        let refresher = CountingRefresher {
            fail: true,
            ..CountingRefresher::default()
        };

        assert!(f
            .workflow
            .submit_vote(Some(id), Some(0), &refresher)
            .await
            .is_ok());
        assert_eq!(f.notifier.successes().len(), 1);
        assert_eq!(f.notifier.errors().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn second_vote_while_first_in_flight_is_refused() {
        let f = fixture();
        f.signer.set_delay(Duration::from_secs(5));
        let id = f.chain.insert(StoredElection::new("e", NOW - 1, NOW + 1, &["A", "B"]));

        let first = {
            let workflow = f.workflow.clone();
            tokio::spawn(async move {
                let refresher = CountingRefresher::default();
                workflow.submit_vote(Some(id), Some(0), &refresher).await
            })
        };
        tokio::task::yield_now().await;
        assert!(f.workflow.is_loading(SubmissionKind::Vote));
        assert_eq!(
            f.workflow.pending(SubmissionKind::Vote).unwrap().status,
            SubmissionStatus::Submitting
        );
        assert!(!f.workflow.is_loading(SubmissionKind::CreateElection));

        let refresher = CountingRefresher::default();
        let err = f
            .workflow
            .submit_vote(Some(id), Some(1), &refresher)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyInFlight(SubmissionKind::Vote)));
        assert!(!err.is_notifiable());

        assert!(first.await.unwrap().is_ok());
        assert_eq!(f.signer.submit_count(), 1);
        assert_eq!(f.notifier.all().len(), 1);
        assert!(!f.workflow.is_loading(SubmissionKind::Vote));
    }

    #[tokio::test]
    async fn invalid_form_is_not_submitted() {
        let f = fixture();
        let form = ElectionForm {
            title: "Board Election".into(),
            description: "Yearly".into(),
            start_time: "2025-05-01T00:00".into(),
            end_time: "2025-05-10T00:00".into(),
            candidates: "Alice, , Bob".into(),
        };
        let refresher = CountingRefresher::default();

        let err = f
            .workflow
            .submit_new_election(&form, &refresher)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Validation(ValidationError::EmptyCandidateName { position: 2 })
        ));
        assert_eq!(f.signer.submit_count(), 0);
        assert!(f.notifier.all().is_empty());
    }
}
