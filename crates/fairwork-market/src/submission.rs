use crate::error::{MarketError, Result};
use crate::lifecycle::LifecycleState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Worker progress through a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionStatus {
    /// Worker applied, awaiting the client's screening decision
    Applied,
    /// Client accepted the application; work underway
    InProgress,
    /// Worker submitted results, awaiting review
    Submitted,
    /// Client approved the results
    Approved,
    /// Client rejected at screening or review
    Rejected,
}

impl LifecycleState for SubmissionStatus {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    fn can_transition_to(&self, next: &Self) -> bool {
        use SubmissionStatus::*;
        match (self, next) {
            // From Applied: the client screens the application
            (Applied, InProgress) => true,
            (Applied, Rejected) => true,

            // From InProgress: only the worker's submission moves it
            (InProgress, Submitted) => true,

            // From Submitted: the client reviews the work
            (Submitted, Approved) => true,
            (Submitted, Rejected) => true,

            // Terminal states cannot transition
            (Approved, _) | (Rejected, _) => false,

            // All other transitions are invalid
            _ => false,
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStatus::Applied => write!(f, "applied"),
            SubmissionStatus::InProgress => write!(f, "in-progress"),
            SubmissionStatus::Submitted => write!(f, "submitted"),
            SubmissionStatus::Approved => write!(f, "approved"),
            SubmissionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A worker's claim on a listing and its review lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: u64,
    pub worker_id: String,
    pub worker_username: String,
    pub listing_id: u64,
    pub client_id: String,
    pub status: SubmissionStatus,
    /// Required once status reaches Submitted.
    pub submission_link: Option<String>,
    pub notes: Option<String>,
    /// Independent of `status`; may only flip true while Approved.
    pub reward_claimed: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission store and state machine.
///
/// Every status write is a conditional update: the transition is
/// re-validated against the stored status under the write lock, so two
/// racing writers cannot both win — the loser sees `InvalidTransition`.
pub struct SubmissionBook {
    submissions: Arc<RwLock<HashMap<u64, Submission>>>,
    next_id: AtomicU64,
}

impl Default for SubmissionBook {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionBook {
    pub fn new() -> Self {
        Self {
            submissions: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a submission in Applied.
    ///
    /// A worker may re-apply to a listing only when every prior submission
    /// of theirs for it is Rejected.
    pub async fn apply(
        &self,
        worker_id: &str,
        worker_username: &str,
        listing_id: u64,
        client_id: &str,
    ) -> Result<Submission> {
        if worker_id.trim().is_empty() {
            return Err(MarketError::Validation("worker_id is required".to_string()));
        }

        let mut submissions = self.submissions.write().await;

        let active = submissions.values().find(|s| {
            s.worker_id == worker_id
                && s.listing_id == listing_id
                && s.status != SubmissionStatus::Rejected
        });
        if let Some(existing) = active {
            return Err(MarketError::Conflict(format!(
                "worker {} already has submission {} ({}) for listing {}",
                worker_id, existing.id, existing.status, listing_id
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let submission = Submission {
            id,
            worker_id: worker_id.to_string(),
            worker_username: worker_username.to_string(),
            listing_id,
            client_id: client_id.to_string(),
            status: SubmissionStatus::Applied,
            submission_link: None,
            notes: None,
            reward_claimed: false,
            approved_at: None,
            created_at: now,
            updated_at: now,
        };
        submissions.insert(id, submission.clone());

        info!(
            submission_id = id,
            worker_id = %worker_id,
            listing_id = listing_id,
            "📝 Worker applied to listing"
        );

        Ok(submission)
    }

    pub async fn get(&self, id: u64) -> Result<Submission> {
        let submissions = self.submissions.read().await;
        submissions
            .get(&id)
            .cloned()
            .ok_or_else(|| MarketError::NotFound(format!("submission {}", id)))
    }

    /// Conditional status update: validates `from -> to` against the stored
    /// status under the write lock and applies `mutate` only if it holds.
    async fn transition<F>(
        &self,
        id: u64,
        expected_from: &[SubmissionStatus],
        to: SubmissionStatus,
        mutate: F,
    ) -> Result<Submission>
    where
        F: FnOnce(&mut Submission),
    {
        let mut submissions = self.submissions.write().await;
        let submission = submissions
            .get_mut(&id)
            .ok_or_else(|| MarketError::NotFound(format!("submission {}", id)))?;

        let current = submission.status;
        if !expected_from.contains(&current) || !current.can_transition_to(&to) {
            warn!(
                submission_id = id,
                from = %current,
                to = %to,
                "⚠️ Rejected illegal status transition"
            );
            return Err(MarketError::InvalidTransition {
                from: current.to_string(),
                to: to.to_string(),
            });
        }

        submission.status = to;
        submission.updated_at = Utc::now();
        mutate(submission);

        info!(
            submission_id = id,
            from = %current,
            to = %to,
            "🔄 Submission status changed"
        );

        Ok(submission.clone())
    }

    /// Client decision on an application (Applied) or on submitted work
    /// (Submitted). Any other current status is an illegal transition.
    pub async fn client_decision(&self, id: u64, accept: bool) -> Result<Submission> {
        let current = self.get(id).await?.status;

        let to = match (current, accept) {
            (SubmissionStatus::Applied, true) => SubmissionStatus::InProgress,
            (SubmissionStatus::Applied, false) => SubmissionStatus::Rejected,
            (SubmissionStatus::Submitted, true) => SubmissionStatus::Approved,
            (SubmissionStatus::Submitted, false) => SubmissionStatus::Rejected,
            (other, _) => {
                return Err(MarketError::InvalidTransition {
                    from: other.to_string(),
                    to: if accept { "accepted" } else { "rejected" }.to_string(),
                })
            }
        };

        // The stored status may have moved since the read above; the
        // conditional update re-checks it.
        self.transition(id, &[current], to, |submission| {
            if to == SubmissionStatus::Approved {
                submission.approved_at = Some(Utc::now());
            }
        })
        .await
    }

    /// Worker submits results; legal only while InProgress.
    pub async fn worker_submit(
        &self,
        id: u64,
        link: &str,
        notes: Option<String>,
    ) -> Result<Submission> {
        if link.trim().is_empty() {
            return Err(MarketError::Validation(
                "submission link is required".to_string(),
            ));
        }

        let link = link.to_string();
        self.transition(
            id,
            &[SubmissionStatus::InProgress],
            SubmissionStatus::Submitted,
            move |submission| {
                submission.submission_link = Some(link);
                submission.notes = notes;
            },
        )
        .await
    }

    /// Flip the reward-claimed flag; legal only while Approved, idempotent
    /// once set.
    pub async fn mark_reward_claimed(&self, id: u64) -> Result<Submission> {
        let mut submissions = self.submissions.write().await;
        let submission = submissions
            .get_mut(&id)
            .ok_or_else(|| MarketError::NotFound(format!("submission {}", id)))?;

        if submission.status != SubmissionStatus::Approved {
            return Err(MarketError::InvalidTransition {
                from: submission.status.to_string(),
                to: "reward-claimed".to_string(),
            });
        }

        if !submission.reward_claimed {
            submission.reward_claimed = true;
            submission.updated_at = Utc::now();
            info!(
                submission_id = id,
                worker_id = %submission.worker_id,
                "🎯 Reward marked claimed"
            );
        }

        Ok(submission.clone())
    }

    pub async fn for_worker(&self, worker_id: &str) -> Vec<Submission> {
        let submissions = self.submissions.read().await;
        let mut result: Vec<Submission> = submissions
            .values()
            .filter(|s| s.worker_id == worker_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result
    }

    pub async fn for_client(&self, client_id: &str) -> Vec<Submission> {
        let submissions = self.submissions.read().await;
        let mut result: Vec<Submission> = submissions
            .values()
            .filter(|s| s.client_id == client_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result
    }
}
