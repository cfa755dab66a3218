use crate::utils::error::{CheckError, Result};
use crate::utils::validation;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OnTopo,
    Tabit,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OnTopo, Provider::Tabit];

    /// Stable machine tag attached to every result.
    pub fn tag(&self) -> &'static str {
        match self {
            Provider::OnTopo => "ontopo",
            Provider::Tabit => "tabit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provider::OnTopo => "OnTopo",
            Provider::Tabit => "Tabit",
        }
    }

    pub fn parse(value: &str) -> Option<Provider> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ontopo" => Some(Provider::OnTopo),
            "tabit" => Some(Provider::Tabit),
            _ => None,
        }
    }

    /// Whether `id` has this provider's identifier shape: an 8-digit slug
    /// for OnTopo, a 24-character lowercase hex organization id for Tabit.
    pub fn id_matches(&self, id: &str) -> bool {
        match self {
            Provider::OnTopo => id.len() == 8 && id.bytes().all(|b| b.is_ascii_digit()),
            Provider::Tabit => {
                id.len() == 24 && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
            }
        }
    }

    pub fn id_shape_hint(&self) -> &'static str {
        match self {
            Provider::OnTopo => "an 8-digit number",
            Provider::Tabit => "a 24-character lowercase hex string",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub name: String,
    pub provider: Provider,
    pub id: String,
}

/// The date/time/party-size tuple shared by every restaurant in a run.
/// Construction re-validates defensively even though the CLI layer already
/// rejected malformed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTemplate {
    date: String,
    times: Vec<String>,
    party_size: u32,
}

impl RequestTemplate {
    pub fn new(date: impl Into<String>, times: Vec<String>, party_size: u32) -> Result<Self> {
        let date = date.into();
        validation::validate_date(&date)?;
        if times.is_empty() {
            return Err(CheckError::validation("At least one time is required"));
        }
        let mut deduped: Vec<String> = Vec::with_capacity(times.len());
        for time in times {
            validation::validate_time(&time)?;
            if !deduped.contains(&time) {
                deduped.push(time);
            }
        }
        validation::validate_party_size(party_size)?;
        Ok(Self {
            date,
            times: deduped,
            party_size,
        })
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn times(&self) -> &[String] {
        &self.times
    }

    pub fn party_size(&self) -> u32 {
        self.party_size
    }

    pub fn for_restaurant(&self, restaurant: &RestaurantRecord) -> AvailabilityRequest {
        AvailabilityRequest {
            restaurant: restaurant.clone(),
            date: self.date.clone(),
            times: self.times.clone(),
            party_size: self.party_size,
        }
    }

    /// Single-time request, one dispatcher task's worth of work.
    pub fn for_restaurant_at(
        &self,
        restaurant: &RestaurantRecord,
        time: &str,
    ) -> AvailabilityRequest {
        AvailabilityRequest {
            restaurant: restaurant.clone(),
            date: self.date.clone(),
            times: vec![time.to_string()],
            party_size: self.party_size,
        }
    }
}

/// One normalized availability query, ready for a provider adapter.
#[derive(Debug, Clone)]
pub struct AvailabilityRequest {
    pub restaurant: RestaurantRecord,
    pub date: String,
    pub times: Vec<String>,
    pub party_size: u32,
}

/// One offered seating area at one requested time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Requested time this slot answers, HHMM.
    pub time: String,
    pub area: String,
    /// Concrete times the provider offered within the area.
    pub options: Vec<String>,
}

/// Normalized adapter reply for one request. Empty `slots` means the
/// provider was reachable but offered nothing, which is a business outcome
/// and not an error.
#[derive(Debug, Clone, Default)]
pub struct ProviderReply {
    pub slots: Vec<Slot>,
    pub raw: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Slots(Vec<Slot>),
    NoAvailability,
    ProviderError(String),
}

impl Outcome {
    pub fn is_available(&self) -> bool {
        matches!(self, Outcome::Slots(_))
    }
}

/// What the dispatcher hands back for one restaurant. Immutable once built;
/// owned by the aggregated report.
#[derive(Debug, Clone)]
pub struct AvailabilityResult {
    pub restaurant: RestaurantRecord,
    pub outcome: Outcome,
    /// Opaque provider payloads keyed by requested time, for raw output.
    pub raw: Option<serde_json::Value>,
}
