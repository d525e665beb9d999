use crate::node::FairworkNode;
use crate::{api_market, api_wallet};
use anyhow::Result;
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub fn build_router(node: Arc<FairworkNode>) -> Router {
    Router::new()
        .route("/health", get(health))
        // Wallet surface
        .route("/v1/wallet", post(api_wallet::create_wallet))
        .route("/v1/wallet/:user_id", get(api_wallet::get_wallet))
        .route("/v1/balance/:address", get(api_wallet::get_balance))
        .route("/v1/transfer", post(api_wallet::transfer))
        .route("/v1/reward", post(api_wallet::grant_reward))
        .route(
            "/v1/wallet/:user_id/transactions",
            get(api_wallet::transaction_history),
        )
        .route(
            "/v1/wallet/:user_id/rewards",
            get(api_wallet::reward_history),
        )
        .route("/v1/faucet", post(api_wallet::faucet))
        // Marketplace surface
        .route(
            "/v1/listings",
            get(api_market::list_listings).post(api_market::create_listing),
        )
        .route("/v1/listings/:id", get(api_market::get_listing))
        .route("/v1/submissions", post(api_market::apply))
        .route(
            "/v1/submissions/:id/decision",
            post(api_market::client_decision),
        )
        .route("/v1/submissions/:id/work", post(api_market::submit_work))
        .route("/v1/submissions/:id/claim", post(api_market::claim_reward))
        .route(
            "/v1/workers/:worker_id/submissions",
            get(api_market::submissions_by_worker),
        )
        .route(
            "/v1/clients/:client_id/submissions",
            get(api_market::submissions_by_client),
        )
        .with_state(node)
}

pub async fn serve(node: Arc<FairworkNode>) -> Result<()> {
    let addr = format!("{}:{}", node.config.api.host, node.config.api.port);
    let app = build_router(node);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "📡 API server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
