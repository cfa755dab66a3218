use crate::domain::model::{AvailabilityRequest, Provider, ProviderReply, Slot};
use crate::domain::ports::ProviderClient;
use crate::utils::error::{CheckError, QueryError, QueryResult, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://ontopo.co.il/api";

/// OnTopo addresses restaurants by an 8-digit numeric slug and answers with
/// availability grouped by seating area.
pub struct OntopoClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl OntopoClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CheckError::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }

    async fn search_at(
        &self,
        request: &AvailabilityRequest,
        time: &str,
    ) -> QueryResult<(Vec<Slot>, Value)> {
        let url = format!("{}/availability/searchAvailability", self.base_url);
        let body = json!({
            "slug": request.restaurant.id,
            "locale": "en",
            "criteria": {
                "date": request.date,
                "time": time,
                "size": request.party_size.to_string(),
            },
        });

        tracing::debug!(slug = %request.restaurant.id, time, "querying OnTopo");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| QueryError::from_reqwest(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Protocol(format!(
                "OnTopo returned HTTP {}",
                status.as_u16()
            )));
        }

        // An empty or malformed payload is a legitimate "nothing offered"
        // answer from this provider, not a transport failure.
        let payload: Value = response.json().await.unwrap_or(Value::Null);
        Ok((Self::slots_from_payload(&payload, time), payload))
    }

    fn slots_from_payload(payload: &Value, time: &str) -> Vec<Slot> {
        let Some(areas) = payload.get("areas").and_then(Value::as_array) else {
            return Vec::new();
        };
        let mut slots = Vec::new();
        for area in areas {
            let name = area
                .get("name")
                .or_else(|| area.get("id"))
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            let options: Vec<String> = area
                .get("options")
                .and_then(Value::as_array)
                .map(|options| {
                    options
                        .iter()
                        .filter(|o| o.get("method").and_then(Value::as_str) != Some("disabled"))
                        .filter_map(|o| o.get("time").and_then(Value::as_str))
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            if !options.is_empty() {
                slots.push(Slot {
                    time: time.to_string(),
                    area: name.to_string(),
                    options,
                });
            }
        }
        slots
    }
}

#[async_trait]
impl ProviderClient for OntopoClient {
    fn provider(&self) -> Provider {
        Provider::OnTopo
    }

    async fn query(&self, request: &AvailabilityRequest) -> QueryResult<ProviderReply> {
        let mut slots = Vec::new();
        let mut raw = serde_json::Map::new();
        for time in &request.times {
            let (mut found, payload) = self.search_at(request, time).await?;
            slots.append(&mut found);
            raw.insert(time.clone(), payload);
        }
        Ok(ProviderReply {
            slots,
            raw: Some(Value::Object(raw)),
        })
    }
}
