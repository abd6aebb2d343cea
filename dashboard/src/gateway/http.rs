//! HTTP gateway to the NDVI backend

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::service::NdviGateway;
use super::types::{GatewayError, OverlayDescription, PixelQueryResult, TimeSeriesResult};
use crate::catalog::AreaOfInterest;
use crate::config::Config;
use crate::geo::LatLng;

/// A 2xx body is either the expected payload or an error envelope. The
/// envelope is tried first so `{"error": ...}` never parses as a payload.
#[derive(Deserialize)]
#[serde(untagged)]
enum ApiPayload<T> {
    Error { error: String },
    Ok(T),
}

/// reqwest-backed gateway with a bounded per-request timeout
pub struct HttpNdviGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNdviGateway {
    /// Create a new gateway from configuration
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let base_url = config.api_base_url.trim_end_matches('/').to_string();

        info!("Initialized NDVI gateway for backend: {}", base_url);

        Ok(Self { client, base_url })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, GatewayError> {
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        match response.json::<ApiPayload<T>>().await? {
            ApiPayload::Error { error } => Err(GatewayError::Backend(error)),
            ApiPayload::Ok(value) => Ok(value),
        }
    }
}

#[async_trait]
impl NdviGateway for HttpNdviGateway {
    async fn get_overlay(&self, area: AreaOfInterest) -> Result<OverlayDescription, GatewayError> {
        self.get_json(format!("{}/aoi/{}", self.base_url, area.id()))
            .await
    }

    async fn get_pixel_stats(&self, point: LatLng) -> Result<PixelQueryResult, GatewayError> {
        self.get_json(format!(
            "{}/stats/{}/{}",
            self.base_url, point.lat, point.lng
        ))
        .await
    }

    async fn get_time_series(&self, point: LatLng) -> Result<TimeSeriesResult, GatewayError> {
        self.get_json(format!(
            "{}/time-series/{}/{}",
            self.base_url, point.lat, point.lng
        ))
        .await
    }
}
