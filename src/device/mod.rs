//! P-Box TX volume API client
//!
//! `POST http://{address}/api/aoip/volume-tx` with a bearer token. The
//! device answers with a small JSON object; a nonzero `status` means the
//! request was refused, and `{status: 27, code: "OutOfRange"}` is the
//! device's way of saying the level is outside what it accepts.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::PluginConfig;

/// Vendor status code for a level outside the accepted range
pub const STATUS_OUT_OF_RANGE: i64 = 27;
const CODE_OUT_OF_RANGE: &str = "OutOfRange";

/// Failure taxonomy for a volume update
#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("device address or token not configured")]
    MissingDevice,
    #[error("device rejected level as out of range")]
    OutOfRange,
    #[error("device returned status {status} ({})", .code.as_deref().unwrap_or("no code"))]
    Device { status: i64, code: Option<String> },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One TX channel entry in the request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelVolume {
    #[serde(rename = "tx-no")]
    pub tx_no: u8,
    pub db: i32,
    #[serde(rename = "tx-mute")]
    pub tx_mute: bool,
}

/// Request body for `/api/aoip/volume-tx`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRequest {
    pub volumes: Vec<ChannelVolume>,
}

impl VolumeRequest {
    /// Same unmuted level on both TX channels
    pub fn stereo(db: i32) -> Self {
        Self {
            volumes: (0..2)
                .map(|tx_no| ChannelVolume {
                    tx_no,
                    db,
                    tx_mute: false,
                })
                .collect(),
        }
    }
}

/// Response body. Both fields are optional; `{}` is a success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeviceResponse {
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub code: Option<String>,
}

impl DeviceResponse {
    /// Parse a raw body. Blank bodies are treated as `{}`.
    pub fn parse(body: &str) -> Result<Self, VolumeError> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(body)?)
    }

    pub fn into_result(self) -> Result<(), VolumeError> {
        match self.status {
            Some(STATUS_OUT_OF_RANGE) if self.code.as_deref() == Some(CODE_OUT_OF_RANGE) => {
                Err(VolumeError::OutOfRange)
            }
            Some(status) if status != 0 => Err(VolumeError::Device {
                status,
                code: self.code,
            }),
            _ => Ok(()),
        }
    }
}

/// Anything that can apply a level to a device
#[async_trait]
pub trait VolumeSink: Send + Sync {
    async fn set_volume(&self, address: &str, token: &str, db: i32) -> Result<(), VolumeError>;
}

/// HTTP client for the device API
pub struct VolumeClient {
    client: Client,
    config: PluginConfig,
}

impl VolumeClient {
    pub fn new(config: &PluginConfig) -> Result<Self, VolumeError> {
        let mut builder = Client::builder().user_agent(concat!(
            "pbox-txgain/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl VolumeSink for VolumeClient {
    async fn set_volume(&self, address: &str, token: &str, db: i32) -> Result<(), VolumeError> {
        let url = self.config.volume_url(address);
        debug!("POST {} db={}", url, db);

        let response = self
            .client
            .post(&url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/json;charset=utf-8",
            )
            .bearer_auth(token)
            .body(serde_json::to_vec(&VolumeRequest::stereo(db))?)
            .send()
            .await?;

        let http_status = response.status();
        let body = response.text().await?;
        debug!("{} -> {} {}", url, http_status, body);

        DeviceResponse::parse(&body)?.into_result()
    }
}
