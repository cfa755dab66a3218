use crate::domain::model::{AvailabilityResult, Outcome, Slot};
use crate::utils::error::Result;
use serde::Serialize;

const NO_SLOTS: &[Slot] = &[];

/// Per-restaurant outcomes in directory iteration order, regardless of
/// which worker finished first.
#[derive(Debug)]
pub struct BatchReport {
    pub results: Vec<AvailabilityResult>,
}

#[derive(Serialize)]
struct ResultRecord<'a> {
    name: &'a str,
    provider: &'a str,
    id: &'a str,
    slots: &'a [Slot],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl BatchReport {
    /// Whether any restaurant in the batch had an open slot. Feeds the
    /// caller's exit-status decision, which stays 0 either way.
    pub fn any_available(&self) -> bool {
        self.results.iter().any(|r| r.outcome.is_available())
    }

    /// Machine output: one uniform record per restaurant, input order.
    pub fn to_json(&self) -> Result<String> {
        let records: Vec<ResultRecord<'_>> = self
            .results
            .iter()
            .map(|result| {
                let (slots, error) = match &result.outcome {
                    Outcome::Slots(slots) => (slots.as_slice(), None),
                    Outcome::NoAvailability => (NO_SLOTS, None),
                    Outcome::ProviderError(message) => (NO_SLOTS, Some(message.as_str())),
                };
                ResultRecord {
                    name: &result.restaurant.name,
                    provider: result.restaurant.provider.tag(),
                    id: &result.restaurant.id,
                    slots,
                    error,
                }
            })
            .collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Line-oriented human report grouped by outcome.
    pub fn to_summary(&self) -> String {
        let mut available = Vec::new();
        let mut unavailable = Vec::new();
        let mut errored = Vec::new();
        for result in &self.results {
            match &result.outcome {
                Outcome::Slots(slots) => available.push(format!(
                    "  ✅ {} — {}",
                    result.restaurant.name,
                    describe_slots(slots)
                )),
                Outcome::NoAvailability => {
                    unavailable.push(format!("  · {}", result.restaurant.name))
                }
                Outcome::ProviderError(message) => errored.push(format!(
                    "  ❌ {} — {}",
                    result.restaurant.name, message
                )),
            }
        }

        let mut lines = vec![format!("Batch check: {} restaurants", self.results.len())];
        if !available.is_empty() {
            lines.push(format!("Available ({}):", available.len()));
            lines.extend(available);
        }
        if !unavailable.is_empty() {
            lines.push(format!("No availability ({}):", unavailable.len()));
            lines.extend(unavailable);
        }
        if !errored.is_empty() {
            lines.push(format!("Errors ({}):", errored.len()));
            lines.extend(errored);
        }
        lines.join("\n")
    }
}

fn describe_slots(slots: &[Slot]) -> String {
    slots
        .iter()
        .map(|slot| format!("{}: {} [{}]", slot.time, slot.area, slot.options.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Detail rendering for a single-restaurant run.
pub fn render_single(result: &AvailabilityResult, date: &str) -> String {
    let head = format!(
        "{} ({} {}) on {}",
        result.restaurant.name,
        result.restaurant.provider.tag(),
        result.restaurant.id,
        date
    );
    match &result.outcome {
        Outcome::Slots(slots) => {
            let mut lines = vec![format!("{}:", head)];
            for slot in slots {
                lines.push(format!(
                    "  {} — {}: {}",
                    slot.time,
                    slot.area,
                    slot.options.join(", ")
                ));
            }
            lines.join("\n")
        }
        Outcome::NoAvailability => format!("{}: no availability", head),
        Outcome::ProviderError(message) => format!("{}: Error — {}", head, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Provider, RestaurantRecord};

    fn result(name: &str, provider: Provider, id: &str, outcome: Outcome) -> AvailabilityResult {
        AvailabilityResult {
            restaurant: RestaurantRecord {
                name: name.to_string(),
                provider,
                id: id.to_string(),
            },
            outcome,
            raw: None,
        }
    }

    fn sample_report() -> BatchReport {
        BatchReport {
            results: vec![
                result(
                    "Shila",
                    Provider::OnTopo,
                    "69127207",
                    Outcome::Slots(vec![Slot {
                        time: "1900".to_string(),
                        area: "Bar".to_string(),
                        options: vec!["19:00".to_string(), "19:15".to_string()],
                    }]),
                ),
                result("Habasta", Provider::OnTopo, "41523399", Outcome::NoAvailability),
                result(
                    "DOK",
                    Provider::Tabit,
                    "5f3e8a1b9c2d4e6f8a0b1c2d",
                    Outcome::ProviderError("Request timed out after 30s".to_string()),
                ),
            ],
        }
    }

    #[test]
    fn test_json_keeps_order_and_provider_tags() {
        let json = sample_report().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let records = parsed.as_array().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["name"], "Shila");
        assert_eq!(records[0]["provider"], "ontopo");
        assert_eq!(records[0]["slots"][0]["area"], "Bar");
        assert!(records[0].get("error").is_none());

        assert_eq!(records[1]["provider"], "ontopo");
        assert_eq!(records[1]["slots"].as_array().unwrap().len(), 0);

        assert_eq!(records[2]["provider"], "tabit");
        assert_eq!(records[2]["error"], "Request timed out after 30s");
    }

    #[test]
    fn test_summary_leads_with_batch_count_and_groups() {
        let summary = sample_report().to_summary();
        let mut lines = summary.lines();
        assert_eq!(lines.next().unwrap(), "Batch check: 3 restaurants");
        assert!(summary.contains("Available (1):"));
        assert!(summary.contains("No availability (1):"));
        assert!(summary.contains("Errors (1):"));
        assert!(summary.contains("Shila"));
        assert!(summary.contains("Request timed out"));
    }

    #[test]
    fn test_any_available() {
        assert!(sample_report().any_available());
        let report = BatchReport {
            results: vec![result(
                "Habasta",
                Provider::OnTopo,
                "41523399",
                Outcome::NoAvailability,
            )],
        };
        assert!(!report.any_available());
    }

    #[test]
    fn test_render_single_mentions_error() {
        let rendered = render_single(
            &result(
                "DOK",
                Provider::Tabit,
                "5f3e8a1b9c2d4e6f8a0b1c2d",
                Outcome::ProviderError("Network error: boom".to_string()),
            ),
            "20260201",
        );
        assert!(rendered.contains("Error"));
        assert!(rendered.contains("DOK"));
    }
}
