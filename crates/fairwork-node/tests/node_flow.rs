//! Full-stack flow over an assembled node: onboarding, funding, rewarded
//! listing, worker lifecycle, reward grant, and audit queries.

use fairwork_market::{ListingDraft, SubmissionStatus};
use fairwork_node::{config::NodeConfig, node::FairworkNode};
use fairwork_types::{TokenAmount, UserRole};
use fairwork_wallet::AuditStatus;

fn draft(reward: f64) -> ListingDraft {
    ListingDraft {
        title: "Bias check on churn model output".to_string(),
        description: "Compare false-positive rates across cohorts".to_string(),
        filename: "churn.parquet".to_string(),
        file_size: 1 << 20,
        kind: "parquet".to_string(),
        reward,
        deadline: None,
    }
}

#[tokio::test]
async fn full_marketplace_flow() {
    let node = FairworkNode::new(NodeConfig::default()).unwrap();

    // Onboard a company and a researcher.
    let company = node
        .directory
        .create_wallet("acme", "acme", "ops@acme.io", UserRole::Company)
        .await
        .unwrap();
    let researcher = node
        .directory
        .create_wallet("jo", "jo", "jo@lab.org", UserRole::Researcher)
        .await
        .unwrap();

    node.faucet(company.address, 20.0).await.unwrap();

    // Rewarded listing goes through escrow.
    let listing = node.market.post_listing("acme", draft(8.0)).await.unwrap();
    let escrow_rows = node.transactions_for_user("acme").await.unwrap();
    assert_eq!(escrow_rows.len(), 1);
    assert_eq!(escrow_rows[0].status, AuditStatus::Success);
    assert_eq!(escrow_rows[0].amount, TokenAmount::from_display(8.0));

    let report = node.oracle.report(&company.address).await.unwrap();
    assert_eq!(report.balance_display, 12.0);

    // Worker lifecycle to approval.
    let submission = node.market.apply("jo", "jo", listing.id).await.unwrap();
    node.market
        .client_decision(submission.id, true)
        .await
        .unwrap();
    node.market
        .worker_submit(submission.id, "http://example/analysis", None)
        .await
        .unwrap();
    let approved = node
        .market
        .client_decision(submission.id, true)
        .await
        .unwrap();
    assert_eq!(approved.status, SubmissionStatus::Approved);

    // Platform grants the reward and the worker claims the flag.
    node.engine
        .reward_transfer(
            researcher.address,
            TokenAmount::from_display(8.0),
            &format!("listing {} bounty", listing.id),
        )
        .await
        .unwrap();
    let claimed = node.market.mark_reward_claimed(submission.id).await.unwrap();
    assert!(claimed.reward_claimed);

    let rewards = node.rewards_for_user("jo").await.unwrap();
    assert_eq!(rewards.len(), 1);
    assert_eq!(rewards[0].status, AuditStatus::Success);

    let report = node.oracle.report(&researcher.address).await.unwrap();
    assert_eq!(report.balance_display, 8.0);
}

#[tokio::test]
async fn balance_report_units_agree() {
    let node = FairworkNode::new(NodeConfig::default()).unwrap();
    let wallet = node
        .directory
        .create_wallet("acme", "acme", "ops@acme.io", UserRole::Company)
        .await
        .unwrap();

    node.faucet(wallet.address, 3.14159265).await.unwrap();

    let report = node.oracle.report(&wallet.address).await.unwrap();
    let expected = report.balance_base as f64 / 100_000_000f64;
    assert!((report.balance_display - expected).abs() < 1e-12);
}
