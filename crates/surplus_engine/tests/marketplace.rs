use std::time::Duration;

use surplus_core::Coordinates;
use surplus_engine::{
    FetchRequest, MarketplaceClient, MarketplaceSettings, OfferSource, SourceError,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(timeout: Duration) -> FetchRequest {
    FetchRequest {
        coordinates: Coordinates {
            lat: 52.2297,
            lng: 21.0122,
        },
        radius_km: 3.0,
        timeout,
    }
}

fn client(server: &MockServer, token: &str) -> MarketplaceClient {
    MarketplaceClient::new(MarketplaceSettings::new(server.uri(), token)).expect("client")
}

fn item(id: &str, store: &str, minor_units: i64) -> serde_json::Value {
    serde_json::json!({
        "item": {
            "item_id": id,
            "price_including_taxes": { "code": "PLN", "minor_units": minor_units }
        },
        "store": { "store_name": store },
        "items_available": 3,
        "pickup_interval": { "start": "2026-10-14T17:00:00Z", "end": "2026-10-14T17:45:00Z" },
        "distance": 0.8
    })
}

#[tokio::test]
async fn fetch_posts_the_search_and_decodes_offers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/item/v8/"))
        .and(header("authorization", "Bearer secret-token"))
        .and(body_partial_json(serde_json::json!({
            "origin": { "latitude": 52.2297, "longitude": 21.0122 },
            "radius": 3.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [item("11", "Green Bakery", 1299), { "item": {} }, item("12", "Corner Cafe", 800)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetched = client(&server, "secret-token")
        .fetch(&request(Duration::from_secs(5)))
        .await
        .expect("fetch ok");

    let vendors: Vec<_> = fetched.offers.iter().map(|o| o.vendor_name.as_str()).collect();
    assert_eq!(vendors, vec!["Green Bakery", "Corner Cafe"]);
    assert_eq!(fetched.skipped, 1);
    assert_eq!(fetched.offers[0].price_decimal(), 12.99);
    assert_eq!(fetched.offers[0].quantity_available, 3);
}

#[tokio::test]
async fn rejected_credentials_are_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server, "expired")
        .fetch(&request(Duration::from_secs(5)))
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Unauthenticated(_)), "{err:?}");
    assert!(err.is_fatal());
}

#[tokio::test]
async fn missing_token_fails_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server, "  ")
        .fetch(&request(Duration::from_secs(5)))
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Unauthenticated(_)), "{err:?}");
}

#[tokio::test]
async fn too_many_requests_carries_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "90"))
        .mount(&server)
        .await;

    let err = client(&server, "tok")
        .fetch(&request(Duration::from_secs(5)))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SourceError::RateLimited {
            retry_after: Some(Duration::from_secs(90))
        }
    );
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn server_errors_keep_their_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server, "tok")
        .fetch(&request(Duration::from_secs(5)))
        .await
        .unwrap_err();
    assert_eq!(err, SourceError::Server { status: 503 });
}

#[tokio::test]
async fn garbage_body_is_an_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server, "tok")
        .fetch(&request(Duration::from_secs(5)))
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn slow_marketplace_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "items": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client(&server, "tok")
        .fetch(&request(Duration::from_millis(200)))
        .await
        .unwrap_err();
    assert_eq!(err, SourceError::Timeout);
}
