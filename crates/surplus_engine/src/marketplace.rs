use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Serialize;
use surplus_logging::watch_debug;

use crate::decode::decode_offers;
use crate::{FetchRequest, FetchedOffers, OfferSource, SourceError};

const ITEMS_PATH: &str = "/api/item/v8/";

#[derive(Debug, Clone)]
pub struct MarketplaceSettings {
    pub base_url: String,
    pub access_token: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub page_size: u32,
}

impl MarketplaceSettings {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            user_agent: format!("surplus_watch/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout: Duration::from_secs(10),
            page_size: 100,
        }
    }
}

#[derive(Debug, Serialize)]
struct Origin {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize)]
struct ItemsQuery {
    origin: Origin,
    radius: f64,
    favorites_only: bool,
    with_stock_only: bool,
    page: u32,
    page_size: u32,
}

/// reqwest-backed [`OfferSource`] for the marketplace items endpoint.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    settings: MarketplaceSettings,
    client: reqwest::Client,
}

impl MarketplaceClient {
    pub fn new(settings: MarketplaceSettings) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| SourceError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn items_url(&self) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), ITEMS_PATH)
    }
}

#[async_trait::async_trait]
impl OfferSource for MarketplaceClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedOffers, SourceError> {
        if self.settings.access_token.trim().is_empty() {
            return Err(SourceError::Unauthenticated(
                "no access token configured".to_string(),
            ));
        }

        let query = ItemsQuery {
            origin: Origin {
                latitude: request.coordinates.lat,
                longitude: request.coordinates.lng,
            },
            radius: request.radius_km,
            favorites_only: false,
            with_stock_only: true,
            page: 1,
            page_size: self.settings.page_size,
        };
        let body = serde_json::to_vec(&query)
            .map_err(|err| SourceError::InvalidResponse(err.to_string()))?;

        let response = self
            .client
            .post(self.items_url())
            .timeout(request.timeout)
            .header(AUTHORIZATION, format!("Bearer {}", self.settings.access_token))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status(status, response.headers()));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        watch_debug!("Marketplace returned {} bytes", bytes.len());
        decode_offers(&bytes)
    }
}

fn map_status(status: StatusCode, headers: &reqwest::header::HeaderMap) -> SourceError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            SourceError::Unauthenticated(status.to_string())
        }
        StatusCode::TOO_MANY_REQUESTS => SourceError::RateLimited {
            retry_after: headers
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_secs),
        },
        status if status.is_server_error() => SourceError::Server {
            status: status.as_u16(),
        },
        status => SourceError::InvalidResponse(format!("unexpected status {status}")),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        return SourceError::Timeout;
    }
    SourceError::Network(err.to_string())
}
