//! HTTP round-trips against a gateway bound to a local port.

use std::sync::Arc;
use std::time::Duration;

use balance_ledger::account::{AccountStore, MemoryAccountStore};
use balance_ledger::auth::{JwtService, Role};
use balance_ledger::balance_reset::{BalanceResetJob, ResetEngine, ResetJobConfig, ResetJobHandle};
use balance_ledger::cache::{CacheInvalidator, ProfileCache};
use balance_ledger::gateway::build_router;
use balance_ledger::gateway::state::AppState;
use balance_ledger::transfer::TransferEngine;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestGateway {
    base: String,
    store: MemoryAccountStore,
    jwt: Arc<JwtService>,
    reset_job: Arc<ResetJobHandle>,
    client: reqwest::Client,
}

impl TestGateway {
    async fn start() -> Self {
        let store = MemoryAccountStore::new();
        let shared: Arc<dyn AccountStore> = Arc::new(store.clone());
        let profiles = Arc::new(ProfileCache::default());
        let invalidator: Arc<dyn CacheInvalidator> = profiles.clone();

        let transfers = Arc::new(TransferEngine::new(shared.clone(), invalidator.clone()));
        let reset_engine = Arc::new(ResetEngine::new(shared.clone(), invalidator));
        let reset_job = Arc::new(
            BalanceResetJob::new(
                reset_engine,
                ResetJobConfig {
                    interval: Duration::from_secs(600),
                    scheduled: false,
                },
            )
            .spawn(),
        );
        let jwt = Arc::new(JwtService::new("gateway-test-secret", 3600));

        let state = AppState::new(shared, transfers, profiles, jwt.clone(), reset_job.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(Arc::new(state)))
                .await
                .unwrap();
        });

        Self {
            base: format!("http://{}/api/v1", addr),
            store,
            jwt,
            reset_job,
            client: reqwest::Client::new(),
        }
    }

    fn token(&self, account_id: Uuid, role: Role) -> String {
        self.jwt.issue(account_id, "tester", role).unwrap()
    }

    async fn post_transfer(&self, token: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(format!("{}/accounts/transfer", self.base))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

#[tokio::test]
async fn health_is_public() {
    let gw = TestGateway::start().await;
    let resp = gw
        .client
        .get(format!("{}/health", gw.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], 0);
    assert!(body["data"]["timestamp_ms"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn profile_requires_token() {
    let gw = TestGateway::start().await;
    let resp = gw
        .client
        .get(format!("{}/accounts/profile", gw.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let resp = gw
        .client
        .get(format!("{}/accounts/profile", gw.base))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn profile_returns_callers_balance() {
    let gw = TestGateway::start().await;
    let me = gw.store.create_account(Uuid::new_v4(), "42.10").id;

    let resp = gw
        .client
        .get(format!("{}/accounts/profile", gw.base))
        .bearer_auth(gw.token(me, Role::User))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["login"], "tester");
    assert_eq!(body["data"]["account"]["balance"], "42.10");

    let stranger = gw.token(Uuid::new_v4(), Role::User);
    let resp = gw
        .client
        .get(format!("{}/accounts/profile", gw.base))
        .bearer_auth(stranger)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn transfer_requires_admin_role() {
    let gw = TestGateway::start().await;
    let a = gw.store.create_account(Uuid::new_v4(), "10.00").id;
    let b = gw.store.create_account(Uuid::new_v4(), "0.00").id;

    let (status, body) = gw
        .post_transfer(
            &gw.token(a, Role::User),
            json!({"from_account_id": a, "to_account_id": b, "amount": "1.00"}),
        )
        .await;
    assert_eq!(status, 403);
    assert_eq!(body["code"], 2003);
    assert_eq!(gw.store.snapshot(a).unwrap().balance, "10.00");
}

#[tokio::test]
async fn admin_transfer_moves_funds() {
    let gw = TestGateway::start().await;
    let admin = gw.token(Uuid::new_v4(), Role::Admin);
    let a = gw.store.create_account(Uuid::new_v4(), "10.00").id;
    let b = gw.store.create_account(Uuid::new_v4(), "0.00").id;

    let (status, body) = gw
        .post_transfer(
            &admin,
            json!({"from_account_id": a, "to_account_id": b, "amount": 2.5}),
        )
        .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["data"]["amount"], "2.50");
    assert_eq!(gw.store.snapshot(a).unwrap().balance, "7.50");
    assert_eq!(gw.store.snapshot(b).unwrap().balance, "2.50");
}

#[tokio::test]
async fn transfer_business_errors_map_to_status() {
    let gw = TestGateway::start().await;
    let admin = gw.token(Uuid::new_v4(), Role::Admin);
    let a = gw.store.create_account(Uuid::new_v4(), "1.00").id;
    let b = gw.store.create_account(Uuid::new_v4(), "0.00").id;

    let (status, body) = gw
        .post_transfer(
            &admin,
            json!({"from_account_id": a, "to_account_id": b, "amount": "5.00"}),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], 1002);

    let (status, body) = gw
        .post_transfer(
            &admin,
            json!({"from_account_id": a, "to_account_id": a, "amount": "0.10"}),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], 1003);

    let (status, body) = gw
        .post_transfer(
            &admin,
            json!({"from_account_id": a, "to_account_id": Uuid::new_v4(), "amount": "0.10"}),
        )
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["code"], 4001);

    assert_eq!(gw.store.snapshot(a).unwrap().balance, "1.00");
}

#[tokio::test]
async fn transfer_rejects_malformed_amounts() {
    let gw = TestGateway::start().await;
    let admin = gw.token(Uuid::new_v4(), Role::Admin);
    let a = gw.store.create_account(Uuid::new_v4(), "10.00").id;
    let b = gw.store.create_account(Uuid::new_v4(), "0.00").id;

    for amount in [json!("1.005"), json!("0"), json!("-1"), json!("abc"), json!(0.001)] {
        let (status, body) = gw
            .post_transfer(
                &admin,
                json!({"from_account_id": a, "to_account_id": b, "amount": amount}),
            )
            .await;
        assert_eq!(status, 400, "amount {amount} should be rejected");
        assert_eq!(body["code"], 1001);
    }
    assert_eq!(gw.store.snapshot(a).unwrap().balance, "10.00");
}

#[tokio::test]
async fn balance_reset_is_queued() {
    let gw = TestGateway::start().await;
    let admin = gw.token(Uuid::new_v4(), Role::Admin);
    let a = gw.store.create_account(Uuid::new_v4(), "3.30").id;

    let resp = gw
        .client
        .post(format!("{}/balance-reset", gw.base))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["queued"], true);

    let mut waited = 0;
    while gw.reset_job.completed_runs() == 0 && waited < 100 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        waited += 1;
    }
    assert_eq!(gw.reset_job.completed_runs(), 1);
    assert_eq!(gw.store.snapshot(a).unwrap().balance, "0.00");
}
