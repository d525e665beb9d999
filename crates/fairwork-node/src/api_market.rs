use crate::api_wallet::{wallet_error_response, ErrorResponse};
use crate::node::FairworkNode;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use fairwork_market::{ListingDraft, MarketError};
use serde::Deserialize;
use std::sync::Arc;

fn market_error_response(e: MarketError) -> Response {
    let status = match &e {
        MarketError::Validation(_) => StatusCode::BAD_REQUEST,
        MarketError::NotFound(_) => StatusCode::NOT_FOUND,
        MarketError::Conflict(_) => StatusCode::CONFLICT,
        MarketError::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
        MarketError::InvalidTransition { .. } => StatusCode::CONFLICT,
        MarketError::Ledger(_) => StatusCode::BAD_GATEWAY,
        MarketError::Wallet(inner) => return wallet_error_response(inner.clone()),
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct CreateListingRequest {
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub filename: String,
    pub file_size: u64,
    pub kind: String,
    #[serde(default)]
    pub reward: f64,
    pub deadline: Option<DateTime<Utc>>,
}

pub async fn create_listing(
    State(node): State<Arc<FairworkNode>>,
    Json(req): Json<CreateListingRequest>,
) -> Response {
    let draft = ListingDraft {
        title: req.title,
        description: req.description,
        filename: req.filename,
        file_size: req.file_size,
        kind: req.kind,
        reward: req.reward,
        deadline: req.deadline,
    };

    match node.market.post_listing(&req.owner_id, draft).await {
        Ok(listing) => (StatusCode::CREATED, Json(listing)).into_response(),
        Err(e) => market_error_response(e),
    }
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

pub async fn list_listings(
    State(node): State<Arc<FairworkNode>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let listings = node.market.recent_listings(query.limit.unwrap_or(50)).await;
    (StatusCode::OK, Json(listings)).into_response()
}

pub async fn get_listing(
    State(node): State<Arc<FairworkNode>>,
    Path(id): Path<u64>,
) -> Response {
    match node.market.get_listing(id).await {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => market_error_response(e),
    }
}

#[derive(Deserialize)]
pub struct ApplyRequest {
    pub worker_id: String,
    pub worker_username: String,
    pub listing_id: u64,
}

pub async fn apply(
    State(node): State<Arc<FairworkNode>>,
    Json(req): Json<ApplyRequest>,
) -> Response {
    match node
        .market
        .apply(&req.worker_id, &req.worker_username, req.listing_id)
        .await
    {
        Ok(submission) => (StatusCode::CREATED, Json(submission)).into_response(),
        Err(e) => market_error_response(e),
    }
}

#[derive(Deserialize)]
pub struct DecisionRequest {
    pub accept: bool,
}

pub async fn client_decision(
    State(node): State<Arc<FairworkNode>>,
    Path(id): Path<u64>,
    Json(req): Json<DecisionRequest>,
) -> Response {
    match node.market.client_decision(id, req.accept).await {
        Ok(submission) => (StatusCode::OK, Json(submission)).into_response(),
        Err(e) => market_error_response(e),
    }
}

#[derive(Deserialize)]
pub struct SubmitWorkRequest {
    pub link: String,
    pub notes: Option<String>,
}

pub async fn submit_work(
    State(node): State<Arc<FairworkNode>>,
    Path(id): Path<u64>,
    Json(req): Json<SubmitWorkRequest>,
) -> Response {
    match node.market.worker_submit(id, &req.link, req.notes).await {
        Ok(submission) => (StatusCode::OK, Json(submission)).into_response(),
        Err(e) => market_error_response(e),
    }
}

pub async fn claim_reward(
    State(node): State<Arc<FairworkNode>>,
    Path(id): Path<u64>,
) -> Response {
    match node.market.mark_reward_claimed(id).await {
        Ok(submission) => (StatusCode::OK, Json(submission)).into_response(),
        Err(e) => market_error_response(e),
    }
}

pub async fn submissions_by_worker(
    State(node): State<Arc<FairworkNode>>,
    Path(worker_id): Path<String>,
) -> Response {
    let submissions = node.market.submissions_for_worker(&worker_id).await;
    (StatusCode::OK, Json(submissions)).into_response()
}

pub async fn submissions_by_client(
    State(node): State<Arc<FairworkNode>>,
    Path(client_id): Path<String>,
) -> Response {
    let submissions = node.market.submissions_for_client(&client_id).await;
    (StatusCode::OK, Json(submissions)).into_response()
}
