use crate::domain::model::{AvailabilityRequest, Provider, ProviderReply, Slot};
use crate::domain::ports::ProviderClient;
use crate::utils::error::{CheckError, QueryError, QueryResult, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://tgm-api.tabit.cloud";

/// Tabit addresses restaurants by a 24-character hex organization id and
/// takes an ISO-style datetime instead of split date/time fields.
pub struct TabitClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct TabitAvailability {
    #[serde(default)]
    availability: Vec<TabitAreaAvailability>,
}

#[derive(Debug, Deserialize)]
struct TabitAreaAvailability {
    area_name: String,
    #[serde(default)]
    slots: Vec<String>,
}

impl TabitClient {
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

    fn date_time(date: &str, time: &str) -> QueryResult<String> {
        let date = NaiveDate::parse_from_str(date, "%Y%m%d")
            .map_err(|e| QueryError::Protocol(format!("unusable date '{}': {}", date, e)))?;
        let time = NaiveTime::parse_from_str(time, "%H%M")
            .map_err(|e| QueryError::Protocol(format!("unusable time '{}': {}", time, e)))?;
        Ok(format!(
            "{}T{}:00",
            date.format("%Y-%m-%d"),
            time.format("%H:%M")
        ))
    }

    async fn check_at(
        &self,
        request: &AvailabilityRequest,
        time: &str,
    ) -> QueryResult<(Vec<Slot>, Value)> {
        let url = format!("{}/rsv/booking/check-availability", self.base_url);
        let body = json!({
            "organization": request.restaurant.id,
            "seats_count": request.party_size,
            "date_time": Self::date_time(&request.date, time)?,
        });

        tracing::debug!(organization = %request.restaurant.id, time, "querying Tabit");
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
                "Tabit returned HTTP {}",
                status.as_u16()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| QueryError::from_reqwest(e, self.timeout_secs))?;
        let parsed: TabitAvailability = serde_json::from_value(payload.clone())
            .map_err(|e| QueryError::Protocol(format!("unexpected Tabit payload: {}", e)))?;

        let slots = parsed
            .availability
            .into_iter()
            .filter(|area| !area.slots.is_empty())
            .map(|area| Slot {
                time: time.to_string(),
                area: area.area_name,
                options: area.slots,
            })
            .collect();
        Ok((slots, payload))
    }
}

#[async_trait]
impl ProviderClient for TabitClient {
    fn provider(&self) -> Provider {
        Provider::Tabit
    }

    async fn query(&self, request: &AvailabilityRequest) -> QueryResult<ProviderReply> {
        let mut slots = Vec::new();
        let mut raw = serde_json::Map::new();
        for time in &request.times {
            let (mut found, payload) = self.check_at(request, time).await?;
            slots.append(&mut found);
            raw.insert(time.clone(), payload);
        }
        Ok(ProviderReply {
            slots,
            raw: Some(Value::Object(raw)),
        })
    }
}
