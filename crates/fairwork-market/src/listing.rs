use crate::error::{MarketError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Caller-supplied listing metadata, before validation and escrow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    /// Reference to the uploaded file; the bytes live elsewhere.
    pub filename: String,
    pub file_size: u64,
    /// Dataset/file kind as reported by the uploader (e.g. "csv").
    pub kind: String,
    /// Reward in display units; 0 means unrewarded.
    #[serde(default)]
    pub reward: f64,
    pub deadline: Option<DateTime<Utc>>,
}

impl ListingDraft {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(MarketError::Validation("title is required".to_string()));
        }
        if self.filename.trim().is_empty() {
            return Err(MarketError::Validation("filename is required".to_string()));
        }
        if self.reward < 0.0 || !self.reward.is_finite() {
            return Err(MarketError::Validation(format!(
                "reward must be a non-negative number, got {}",
                self.reward
            )));
        }
        Ok(())
    }
}

/// A posted unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub filename: String,
    pub file_size: u64,
    pub kind: String,
    pub reward: f64,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// In-memory listing store with recency-ordered reads.
pub struct ListingStore {
    listings: Arc<RwLock<HashMap<u64, Listing>>>,
    next_id: AtomicU64,
}

impl Default for ListingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingStore {
    pub fn new() -> Self {
        Self {
            listings: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Persist a validated draft as a listing. Only the escrow gate calls
    /// this; rewarded drafts must already have their escrow transfer
    /// confirmed.
    pub(crate) async fn insert(&self, owner_id: &str, draft: ListingDraft) -> Listing {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let listing = Listing {
            id,
            owner_id: owner_id.to_string(),
            title: draft.title,
            description: draft.description,
            filename: draft.filename,
            file_size: draft.file_size,
            kind: draft.kind,
            reward: draft.reward,
            deadline: draft.deadline,
            created_at: Utc::now(),
        };

        let mut listings = self.listings.write().await;
        listings.insert(id, listing.clone());

        info!(
            listing_id = id,
            owner_id = %listing.owner_id,
            title = %listing.title,
            reward = listing.reward,
            "📋 Listing created"
        );

        listing
    }

    pub async fn get(&self, id: u64) -> Result<Listing> {
        let listings = self.listings.read().await;
        listings
            .get(&id)
            .cloned()
            .ok_or_else(|| MarketError::NotFound(format!("listing {}", id)))
    }

    /// Most recent listings first, up to `limit`.
    pub async fn recent(&self, limit: usize) -> Vec<Listing> {
        let listings = self.listings.read().await;
        let mut all: Vec<Listing> = listings.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        all.truncate(limit);
        all
    }
}
