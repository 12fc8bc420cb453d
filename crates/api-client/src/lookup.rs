//! Postal code lookup client.
//!
//! The service answers `GET /pincode/{code}` with a JSON list. Only the first entry matters:
//!
//! ```json
//! [{"Message": "...", "Status": "Success",
//!   "PostOffice": [{"Name": "Fort", "District": "Mumbai", "State": "Maharashtra"}]}]
//! ```
//!
//! On an unknown code `Status` is `"Error"` and `PostOffice` is `null`.

use async_trait::async_trait;
use medireg_core::{AddressLookup, AddressLookupService, GatewayConfig, GatewayError, GatewayResult};
use serde::Deserialize;
use std::sync::Arc;

use crate::{build_client, transport};

const SUCCESS_STATUS: &str = "Success";

#[derive(Debug, Deserialize)]
pub struct LookupEntry {
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "PostOffice", default)]
    pub post_office: Option<Vec<PostOffice>>,
}

#[derive(Debug, Deserialize)]
pub struct PostOffice {
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "State")]
    pub state: String,
}

/// Reduces a decoded response to a lookup result.
pub fn interpret(entries: &[LookupEntry]) -> AddressLookup {
    let Some(entry) = entries.first() else {
        return AddressLookup::NotFound;
    };
    if entry.status != SUCCESS_STATUS {
        return AddressLookup::NotFound;
    }
    match entry.post_office.as_deref().and_then(<[PostOffice]>::first) {
        Some(office) => AddressLookup::Found {
            district: office.district.clone(),
            state: office.state.clone(),
        },
        None => AddressLookup::NotFound,
    }
}

#[derive(Clone, Debug)]
pub struct PostalLookupClient {
    client: reqwest::Client,
    cfg: Arc<GatewayConfig>,
}

impl PostalLookupClient {
    pub fn new(cfg: Arc<GatewayConfig>) -> GatewayResult<Self> {
        Ok(Self {
            client: build_client()?,
            cfg,
        })
    }
}

#[async_trait]
impl AddressLookupService for PostalLookupClient {
    async fn lookup(&self, postal_code: &str) -> GatewayResult<AddressLookup> {
        let url = self.cfg.lookup_url(postal_code);
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        let entries: Vec<LookupEntry> =
            serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(interpret(&entries))
    }
}
