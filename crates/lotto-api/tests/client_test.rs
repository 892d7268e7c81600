#![allow(clippy::unwrap_used)]
// Integration tests for `LottoClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lotto_api::models::{CreateBidRequest, SlotStatus, SlotType};
use lotto_api::{Error, LottoClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, LottoClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = LottoClient::new(&base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

fn user_json() -> serde_json::Value {
    json!({
        "id": "u-1",
        "role": "AGENT",
        "firstName": "Aisyah",
        "lastName": "Rahman",
        "phone": "0123456789",
        "isApproved": true,
        "commissionPct": "5.00"
    })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "phone": "0123456789", "password": "hunter22" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "access_token=abc; Path=/; HttpOnly")
                .set_body_json(json!({
                    "message": "Login successful",
                    "deviceId": "dev-9",
                    "user": user_json()
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter22".to_string().into();
    let resp = client.login("0123456789", &secret).await.unwrap();

    assert_eq!(resp.device_id.as_deref(), Some("dev-9"));
    assert_eq!(resp.user.first_name, "Aisyah");
    assert_eq!(resp.user.commission_pct, Some(5.0));
}

#[tokio::test]
async fn test_login_failure_does_not_refresh() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid credentials",
            "error": "Unauthorized",
            "statusCode": 401
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("0123456789", &secret).await;

    match result {
        Err(Error::Authentication { message }) => assert_eq!(message, "Invalid credentials"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

// ── Session refresh ─────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_request_refreshes_and_retries_once() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/wallet/balance"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/wallet/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalBalance": "250.00",
            "availableBalance": 200,
            "commissionEarned": "12.5",
            "reservedWinning": null
        })))
        .with_priority(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let balance = client.wallet_balance().await.unwrap();
    assert!((balance.total_balance - 250.0).abs() < f64::EPSILON);
    assert!((balance.commission_earned - 12.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_failed_refresh_is_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.my_profile().await;
    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
}

#[tokio::test]
async fn test_second_unauthorized_is_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/bids/my"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.my_bids(1, 50).await;
    assert!(matches!(result, Err(Error::SessionExpired)));
}

// ── Slots ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_slots_grouped_by_date() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/slots/grouped"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "2026-10-17": [
                {
                    "id": "s-1",
                    "uniqueSlotId": "LD-20261017-1200",
                    "type": "LD",
                    "status": "OPEN",
                    "slotTime": "2026-10-17T04:00:00.000Z",
                    "slotTimeFormatted": "12:00",
                    "windowCloseAt": "2026-10-17T03:45:00.000Z",
                    "settingsJson": { "bidPrize": "2", "winningPrize": 1000 }
                },
                {
                    "id": "s-2",
                    "type": "JP",
                    "status": "CLOSED",
                    "slotTimeFormatted": "00:15",
                    "settingsJson": {}
                }
            ]
        })))
        .mount(&server)
        .await;

    let grouped = client.slots_grouped_by_date().await.unwrap();
    let day = &grouped["2026-10-17"];

    assert_eq!(day.len(), 2);
    assert_eq!(day[0].slot_type, SlotType::LuckyDraw);
    assert_eq!(day[0].status, SlotStatus::Open);
    assert_eq!(day[0].settings_json.bid_prize, Some(2.0));
    assert_eq!(day[1].slot_type, SlotType::Jackpot);
    assert_eq!(day[1].settings_json.bid_prize, None);
    assert!(day[1].window_close_at.is_none());
}

// ── Bids ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_jackpot_bid_sends_combination() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/bids/create"))
        .and(body_json(json!({
            "customerName": "Ali",
            "customerPhone": "0198765432",
            "slotId": "s-2",
            "jpNumbers": [1, 2, 3, 4, 5, 6]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "b-77",
            "customerName": "Ali",
            "customerPhone": "0198765432",
            "slotId": "s-2",
            "jpNumbers": [1, 2, 3, 4, 5, 6],
            "createdAt": "2026-10-17T02:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let req = CreateBidRequest {
        customer_name: "Ali".into(),
        customer_phone: "0198765432".into(),
        slot_id: "s-2".into(),
        number: None,
        count: None,
        jp_numbers: Some([1, 2, 3, 4, 5, 6]),
        note: None,
    };
    let bid = client.create_bid(&req).await.unwrap();

    assert_eq!(bid.id, "b-77");
    assert_eq!(bid.jp_numbers, Some(vec![1, 2, 3, 4, 5, 6]));
}

#[tokio::test]
async fn test_create_bid_rejection_surfaces_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/bids/create"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": ["count must not be greater than 80"],
            "error": "Bad Request",
            "statusCode": 400
        })))
        .mount(&server)
        .await;

    let req = CreateBidRequest {
        customer_name: "Ali".into(),
        customer_phone: "0198765432".into(),
        slot_id: "s-1".into(),
        number: Some(7),
        count: Some(81),
        jp_numbers: None,
        note: None,
    };

    match client.create_bid(&req).await {
        Err(Error::Api {
            status,
            message,
            code,
        }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "count must not be greater than 80");
            assert_eq!(code.as_deref(), Some("Bad Request"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_my_bids_sends_paging() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/bids/my"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "total": 11,
            "page": 2,
            "pageSize": 10
        })))
        .mount(&server)
        .await;

    let page = client.my_bids(2, 10).await.unwrap();
    assert_eq!(page.total, 11);
    assert!(page.items.is_empty());
}

// ── Results ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_results_by_date() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/results/by-date"))
        .and(query_param("date", "2026-10-16"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "date": "2026-10-16",
            "LD": [{
                "slotId": "s-1",
                "uniqueSlotId": "LD-20261016-2000",
                "type": "LD",
                "date": "2026-10-16",
                "time": "8:00PM",
                "winningNumber": 7
            }],
            "JP": []
        })))
        .mount(&server)
        .await;

    let results = client.results_by_date(Some("2026-10-16")).await.unwrap();
    assert_eq!(results.lucky_draw.len(), 1);
    assert_eq!(results.lucky_draw[0].winning_number, Some(7));
    assert!(results.jackpot.is_empty());
}

#[tokio::test]
async fn test_missing_slot_result_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/results/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Result not found",
            "statusCode": 404
        })))
        .mount(&server)
        .await;

    let err = client.result_for_slot("nope").await.unwrap_err();
    assert!(err.is_not_found());
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_revoke_device() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/auth/devices/dev-3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.revoke_device("dev-3").await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let result = client.list_devices().await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>gateway</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
