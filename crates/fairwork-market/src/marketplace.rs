use crate::error::Result;
use crate::escrow::EscrowGate;
use crate::listing::{Listing, ListingDraft, ListingStore};
use crate::submission::{Submission, SubmissionBook};
use fairwork_wallet::{BalanceOracle, TransferEngine, WalletDirectory};
use std::sync::Arc;

/// Service facade for the marketplace. Every caller — HTTP handler, CLI,
/// internal flow — goes through these typed functions directly.
pub struct Marketplace {
    listings: Arc<ListingStore>,
    submissions: SubmissionBook,
    escrow: EscrowGate,
}

impl Marketplace {
    pub fn new(
        directory: Arc<WalletDirectory>,
        oracle: Arc<BalanceOracle>,
        engine: Arc<TransferEngine>,
    ) -> Self {
        let listings = Arc::new(ListingStore::new());
        let escrow = EscrowGate::new(directory, oracle, engine, listings.clone());
        Self {
            listings,
            submissions: SubmissionBook::new(),
            escrow,
        }
    }

    /// Post a listing; rewarded drafts pass through the escrow gate first.
    pub async fn post_listing(&self, owner_id: &str, draft: ListingDraft) -> Result<Listing> {
        self.escrow.post_listing(owner_id, draft).await
    }

    pub async fn get_listing(&self, id: u64) -> Result<Listing> {
        self.listings.get(id).await
    }

    pub async fn recent_listings(&self, limit: usize) -> Vec<Listing> {
        self.listings.recent(limit).await
    }

    /// Worker applies to a listing. The client identity comes from the
    /// listing row, not from the caller.
    pub async fn apply(
        &self,
        worker_id: &str,
        worker_username: &str,
        listing_id: u64,
    ) -> Result<Submission> {
        let listing = self.listings.get(listing_id).await?;
        self.submissions
            .apply(worker_id, worker_username, listing_id, &listing.owner_id)
            .await
    }

    pub async fn get_submission(&self, id: u64) -> Result<Submission> {
        self.submissions.get(id).await
    }

    pub async fn client_decision(&self, submission_id: u64, accept: bool) -> Result<Submission> {
        self.submissions.client_decision(submission_id, accept).await
    }

    pub async fn worker_submit(
        &self,
        submission_id: u64,
        link: &str,
        notes: Option<String>,
    ) -> Result<Submission> {
        self.submissions.worker_submit(submission_id, link, notes).await
    }

    pub async fn mark_reward_claimed(&self, submission_id: u64) -> Result<Submission> {
        self.submissions.mark_reward_claimed(submission_id).await
    }

    pub async fn submissions_for_worker(&self, worker_id: &str) -> Vec<Submission> {
        self.submissions.for_worker(worker_id).await
    }

    pub async fn submissions_for_client(&self, client_id: &str) -> Vec<Submission> {
        self.submissions.for_client(client_id).await
    }
}
