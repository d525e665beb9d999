use crate::node::FairworkNode;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use fairwork_types::{TokenAmount, UserRole, WalletAddress};
use fairwork_wallet::WalletError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn wallet_error_response(e: WalletError) -> Response {
    let status = match &e {
        WalletError::Validation(_) => StatusCode::BAD_REQUEST,
        WalletError::NotFound(_) => StatusCode::NOT_FOUND,
        WalletError::Conflict(_) => StatusCode::CONFLICT,
        WalletError::KeyMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        WalletError::LedgerSubmission(_) => StatusCode::BAD_GATEWAY,
        WalletError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

fn bad_address(e: impl std::fmt::Display) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: format!("Invalid address: {}", e),
        }),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct CreateWalletRequest {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

pub async fn create_wallet(
    State(node): State<Arc<FairworkNode>>,
    Json(req): Json<CreateWalletRequest>,
) -> Response {
    match node
        .directory
        .create_wallet(&req.user_id, &req.username, &req.email, req.role)
        .await
    {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(e) => wallet_error_response(e),
    }
}

pub async fn get_wallet(
    State(node): State<Arc<FairworkNode>>,
    Path(user_id): Path<String>,
) -> Response {
    match node.directory.get_wallet(&user_id).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => wallet_error_response(e),
    }
}

pub async fn get_balance(
    State(node): State<Arc<FairworkNode>>,
    Path(address_hex): Path<String>,
) -> Response {
    let address = match WalletAddress::from_hex(&address_hex) {
        Ok(address) => address,
        Err(e) => return bad_address(e),
    };

    match node.oracle.report(&address).await {
        Some(report) => (StatusCode::OK, Json(report)).into_response(),
        None => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: "balance unavailable".to_string(),
            }),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
pub struct TransferRequest {
    pub user_id: String,
    pub receiver: String,
    /// Amount in display units
    pub amount: f64,
}

pub async fn transfer(
    State(node): State<Arc<FairworkNode>>,
    Json(req): Json<TransferRequest>,
) -> Response {
    let receiver = match WalletAddress::from_hex(&req.receiver) {
        Ok(address) => address,
        Err(e) => return bad_address(e),
    };

    match node
        .engine
        .transfer(&req.user_id, receiver, TokenAmount::from_display(req.amount))
        .await
    {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(e) => wallet_error_response(e),
    }
}

#[derive(Deserialize)]
pub struct RewardRequest {
    pub receiver: String,
    /// Amount in display units
    pub amount: f64,
    pub reason: String,
}

pub async fn grant_reward(
    State(node): State<Arc<FairworkNode>>,
    Json(req): Json<RewardRequest>,
) -> Response {
    let receiver = match WalletAddress::from_hex(&req.receiver) {
        Ok(address) => address,
        Err(e) => return bad_address(e),
    };

    match node
        .engine
        .reward_transfer(receiver, TokenAmount::from_display(req.amount), &req.reason)
        .await
    {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(e) => wallet_error_response(e),
    }
}

pub async fn transaction_history(
    State(node): State<Arc<FairworkNode>>,
    Path(user_id): Path<String>,
) -> Response {
    match node.transactions_for_user(&user_id).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

pub async fn reward_history(
    State(node): State<Arc<FairworkNode>>,
    Path(user_id): Path<String>,
) -> Response {
    match node.rewards_for_user(&user_id).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
pub struct FaucetRequest {
    pub address: String,
    /// Amount in display units
    pub amount: f64,
}

pub async fn faucet(
    State(node): State<Arc<FairworkNode>>,
    Json(req): Json<FaucetRequest>,
) -> Response {
    let address = match WalletAddress::from_hex(&req.address) {
        Ok(address) => address,
        Err(e) => return bad_address(e),
    };

    match node.faucet(address, req.amount).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "credited": req.amount })))
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
