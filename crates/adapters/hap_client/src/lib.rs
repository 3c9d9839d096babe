//! # garage-bridge-adapter-hap
//!
//! Remote registry backed by a Homebridge instance running in insecure mode,
//! spoken to with HAP JSON over plain HTTP.
//!
//! - `GET /accessories` lists services ([`parser`] maps UUIDs to names)
//! - `PUT /characteristics` writes a value
//! - the monitor polls `GET /accessories` and reports changed services
//!
//! Every request carries the accessory's pin in the `Authorization` header.

pub mod config;
pub mod error;
mod monitor;
pub mod parser;

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use tokio::sync::mpsc;

use garage_bridge_app::ports::RemoteRegistry;
use garage_bridge_app::ports::remote::ServiceUpdates;
use garage_bridge_domain::characteristic::CharacteristicValue;
use garage_bridge_domain::error::{GarageError, NotFoundError};
use garage_bridge_domain::remote::RemoteService;

pub use config::HapConfig;
pub use error::HapError;

const MONITOR_BUFFER: usize = 32;

#[derive(Serialize)]
struct CharacteristicWrite<'a> {
    aid: u64,
    iid: u64,
    value: &'a CharacteristicValue,
}

#[derive(Serialize)]
struct WriteBody<'a> {
    characteristics: [CharacteristicWrite<'a>; 1],
}

/// Check that `pin` looks like `031-45-154`.
///
/// # Errors
///
/// Returns [`HapError::InvalidPin`] otherwise.
pub fn validate_pin(pin: &str) -> Result<(), HapError> {
    let groups: Vec<&str> = pin.split('-').collect();
    let valid = matches!(groups.as_slice(), [a, b, c] if a.len() == 3 && b.len() == 2 && c.len() == 3)
        && groups
            .iter()
            .all(|group| group.bytes().all(|b| b.is_ascii_digit()));

    if valid {
        Ok(())
    } else {
        Err(HapError::InvalidPin(pin.to_string()))
    }
}

/// HTTP client for one Homebridge instance, authenticated with one pin.
#[derive(Debug, Clone)]
pub struct HapClient {
    http: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
}

impl HapClient {
    /// Build a client for `config.url` using `pin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pin or URL is malformed or the HTTP client
    /// cannot be built.
    pub fn new(config: &HapConfig, pin: &str) -> Result<Self, HapError> {
        validate_pin(pin)?;
        reqwest::Url::parse(&config.url).map_err(|_| HapError::InvalidUrl(config.url.clone()))?;

        let mut auth = HeaderValue::from_str(pin).map_err(HapError::Header)?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn fetch_services(&self) -> Result<Vec<RemoteService>, HapError> {
        let response = self.http.get(self.endpoint("accessories")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HapError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        parser::parse_accessories(&body).map_err(HapError::PayloadParse)
    }

    async fn write(&self, aid: u64, iid: u64, value: &CharacteristicValue) -> Result<(), HapError> {
        let body = WriteBody {
            characteristics: [CharacteristicWrite { aid, iid, value }],
        };
        let response = self
            .http
            .put(self.endpoint("characteristics"))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        // 204 on success, 207 multi-status when the accessory rejected the value
        if status == reqwest::StatusCode::NO_CONTENT || status == reqwest::StatusCode::OK {
            Ok(())
        } else {
            Err(HapError::Status(status.as_u16()))
        }
    }
}

impl RemoteRegistry for HapClient {
    async fn list_services(&self) -> Result<Vec<RemoteService>, GarageError> {
        Ok(self.fetch_services().await?)
    }

    async fn set_characteristic(
        &self,
        service: &RemoteService,
        characteristic: &str,
        value: CharacteristicValue,
    ) -> Result<(), GarageError> {
        let target = service
            .characteristic(characteristic)
            .ok_or_else(|| NotFoundError {
                entity: "Characteristic",
                id: format!("{}/{characteristic}", service.service_name),
            })?;

        tracing::debug!(
            service = %service.service_name,
            characteristic,
            aid = service.aid,
            iid = target.iid,
            %value,
            "writing characteristic"
        );
        Ok(self.write(service.aid, target.iid, &value).await?)
    }

    async fn monitor(&self) -> Result<mpsc::Receiver<ServiceUpdates>, GarageError> {
        let baseline = self.fetch_services().await?;
        let (tx, rx) = mpsc::channel(MONITOR_BUFFER);
        tokio::spawn(monitor::run(self.clone(), self.poll_interval, baseline, tx));
        tracing::info!(url = %self.base_url, interval = ?self.poll_interval, "HAP monitor started");
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_well_formed_pin() {
        assert!(validate_pin("031-45-154").is_ok());
    }

    #[test]
    fn should_reject_malformed_pins() {
        for pin in ["", "03145154", "031-45-15", "031-4a-154", "031-45-154-1", "0314-5-154"] {
            assert!(
                matches!(validate_pin(pin), Err(HapError::InvalidPin(_))),
                "{pin} should be rejected"
            );
        }
    }

    #[test]
    fn should_reject_invalid_url() {
        let config = HapConfig {
            url: "not a url".to_string(),
            ..HapConfig::default()
        };
        let err = HapClient::new(&config, "031-45-154").unwrap_err();
        assert!(matches!(err, HapError::InvalidUrl(_)));
    }

    #[test]
    fn should_build_endpoints_without_double_slash() {
        let config = HapConfig {
            url: "http://homebridge.local:51826/".to_string(),
            ..HapConfig::default()
        };
        let client = HapClient::new(&config, "031-45-154").unwrap();
        assert_eq!(
            client.endpoint("accessories"),
            "http://homebridge.local:51826/accessories"
        );
    }

    #[test]
    fn should_serialize_write_body() {
        let value = CharacteristicValue::Int(1);
        let body = WriteBody {
            characteristics: [CharacteristicWrite {
                aid: 2,
                iid: 10,
                value: &value,
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"characteristics": [{"aid": 2, "iid": 10, "value": 1}]})
        );
    }

    #[tokio::test]
    async fn should_report_unreachable_hub_as_remote_error() {
        let config = HapConfig {
            url: "http://127.0.0.1:9".to_string(),
            request_timeout_ms: 500,
            ..HapConfig::default()
        };
        let client = HapClient::new(&config, "031-45-154").unwrap();
        let err = client.list_services().await.unwrap_err();
        assert!(matches!(err, GarageError::Remote(_)));
    }
}
