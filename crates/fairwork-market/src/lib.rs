//! Marketplace layer: listings, reward escrow, and the submission
//! lifecycle.
//!
//! Value never moves from here directly — the escrow gate delegates to the
//! wallet crate's transfer engine and only persists a listing once the
//! escrow transfer has a SUCCESS audit row behind it.

pub mod error;
pub mod escrow;
pub mod lifecycle;
pub mod listing;
pub mod marketplace;
pub mod submission;

pub use error::{MarketError, Result};
pub use escrow::EscrowGate;
pub use lifecycle::LifecycleState;
pub use listing::{Listing, ListingDraft, ListingStore};
pub use marketplace::Marketplace;
pub use submission::{Submission, SubmissionBook, SubmissionStatus};
