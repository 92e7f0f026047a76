use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};
use stockroom_auth::{JwtClaims, PrincipalId};
use stockroom_infra::AppConfig;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory storage, ephemeral port.
        let config = AppConfig {
            jwt_secret: JWT_SECRET.to_string(),
            jwt_secret_is_default: false,
            ..AppConfig::default()
        };
        let app = stockroom_api::app::build_app(&config)
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(principal: PrincipalId) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: principal,
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn decimal(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().unwrap(),
        other => other.as_f64().unwrap(),
    }
}

async fn create_tomatoes(client: &reqwest::Client, srv: &TestServer, token: &str) -> String {
    let res = client
        .post(srv.url("/inventory/items"))
        .bearer_auth(token)
        .json(&json!({
            "name": "Tomate",
            "category": "vegetais",
            "quantity": 10,
            "unit": "kg",
            "min_stock": 20,
            "cost_per_unit": 5,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["item"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/whoami")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(srv.url("/inventory/items"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn principal_is_derived_from_token() {
    let srv = TestServer::spawn().await;
    let principal = PrincipalId::new();
    let token = mint_jwt(principal);

    let res = reqwest::Client::new()
        .get(srv.url("/whoami"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["principal_id"].as_str().unwrap(), principal.to_string());
}

#[tokio::test]
async fn waste_movement_updates_stock_and_raises_alerts() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(PrincipalId::new());
    let client = reqwest::Client::new();
    let id = create_tomatoes(&client, &srv, &token).await;

    let res = client
        .post(srv.url("/stock-movements"))
        .bearer_auth(&token)
        .json(&json!({
            "item_id": id,
            "type": "desperdicio",
            "quantity": 3,
            "reason": "Vencido",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(decimal(&body["new_quantity"]), 7.0);
    assert_eq!(decimal(&body["movement"]["cost"]), 15.0);
    let kinds: Vec<&str> = body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["low_stock", "waste"]);

    let res = client
        .get(srv.url(&format!("/inventory/items/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let item: Value = res.json().await.unwrap();
    assert_eq!(decimal(&item["quantity"]), 7.0);
    assert_eq!(item["status"], "low");

    let res = client
        .get(srv.url(&format!("/stock-movements?item_id={id}&type=desperdicio")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let movements: Value = res.json().await.unwrap();
    assert_eq!(movements.as_array().unwrap().len(), 1);
    assert_eq!(movements[0]["item_name"], "Tomate");
}

#[tokio::test]
async fn rejected_movements_leave_stock_untouched() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(PrincipalId::new());
    let client = reqwest::Client::new();
    let id = create_tomatoes(&client, &srv, &token).await;

    let res = client
        .post(srv.url("/stock-movements"))
        .bearer_auth(&token)
        .json(&json!({ "item_id": id, "type": "saida", "quantity": 11 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");

    let res = client
        .post(srv.url("/stock-movements"))
        .bearer_auth(&token)
        .json(&json!({ "item_id": id, "type": "refund", "quantity": "abc" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert!(body["fields"].as_array().unwrap().len() >= 2);

    let res = client
        .post(srv.url("/stock-movements"))
        .bearer_auth(&token)
        .json(&json!({ "item_id": "not-a-uuid", "type": "saida", "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(srv.url(&format!("/inventory/items/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let item: Value = res.json().await.unwrap();
    assert_eq!(decimal(&item["quantity"]), 10.0);
}

#[tokio::test]
async fn item_lifecycle_errors_map_to_status_codes() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(PrincipalId::new());
    let client = reqwest::Client::new();
    let id = create_tomatoes(&client, &srv, &token).await;

    let res = client
        .post(srv.url("/inventory/items"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "  tomate ",
            "category": "vegetais",
            "quantity": 1,
            "unit": "kg",
            "min_stock": 0,
            "cost_per_unit": 1,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let missing = uuid::Uuid::now_v7();
    let res = client
        .get(srv.url(&format!("/inventory/items/{missing}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(srv.url(&format!("/inventory/items/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // History survives the delete.
    let res = client
        .get(srv.url(&format!("/stock-movements?item_id={id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let movements: Value = res.json().await.unwrap();
    assert_eq!(movements.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn notifications_can_be_marked_and_cleared() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(PrincipalId::new());
    let client = reqwest::Client::new();
    // Opening stock below the minimum raises one low-stock alert.
    create_tomatoes(&client, &srv, &token).await;

    let res = client
        .get(srv.url("/notifications?unread=true"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let page: Value = res.json().await.unwrap();
    assert_eq!(page["unread_count"], 1);

    let res = client
        .patch(srv.url("/notifications"))
        .bearer_auth(&token)
        .json(&json!({ "id": "all", "read": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(srv.url("/notifications?id=all"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["deleted"], 1);

    let res = client
        .patch(srv.url("/notifications"))
        .bearer_auth(&token)
        .json(&json!({ "id": uuid::Uuid::now_v7().to_string() }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn settings_are_validated_and_charts_cover_six_months() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(PrincipalId::new());
    let client = reqwest::Client::new();

    let res = client
        .patch(srv.url("/settings"))
        .bearer_auth(&token)
        .json(&json!({ "waste_safe_threshold": 500 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .patch(srv.url("/settings"))
        .bearer_auth(&token)
        .json(&json!({ "waste_safe_threshold": 50 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let settings: Value = res.json().await.unwrap();
    assert_eq!(decimal(&settings["waste_safe_threshold"]), 50.0);
    assert_eq!(decimal(&settings["waste_critical_threshold"]), 300.0);

    for path in ["/charts/inventory", "/charts/waste"] {
        let res = client
            .get(srv.url(path))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let series: Value = res.json().await.unwrap();
        assert_eq!(series.as_array().unwrap().len(), 6);
    }

    for path in ["/stats", "/reports/summary", "/activity", "/system/config"] {
        let res = client
            .get(srv.url(path))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{path}");
    }
}
