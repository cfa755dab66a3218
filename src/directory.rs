use crate::domain::model::{Provider, RestaurantRecord};
use crate::utils::error::{CheckError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::io;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    provider: String,
    #[serde(default)]
    id: String,
}

/// In-memory restaurant directory. Loaded once at startup, immutable for
/// the run, safe for concurrent reads by the worker pool.
#[derive(Debug, Clone)]
pub struct Directory {
    records: Vec<RestaurantRecord>,
}

impl Directory {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| CheckError::Load {
            problems: vec![format!("cannot open {}: {}", path.display(), e)],
        })?;
        Self::from_reader(file)
    }

    /// Validation runs over the whole source before anything is accepted,
    /// so one run surfaces every data problem at once.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut problems = Vec::new();
        for required in ["name", "provider", "id"] {
            if !headers.iter().any(|h| h == required) {
                problems.push(format!("missing required column '{}'", required));
            }
        }
        if !problems.is_empty() {
            return Err(CheckError::Load { problems });
        }

        let mut records = Vec::new();
        let mut seen_names: HashSet<String> = HashSet::new();
        let mut seen_ids: HashSet<(Provider, String)> = HashSet::new();

        // Header is line 1; data rows start at 2.
        for (idx, row) in csv_reader.deserialize::<RawRow>().enumerate() {
            let line = idx + 2;
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    problems.push(format!("row {}: {}", line, e));
                    continue;
                }
            };
            if row.name.trim().is_empty() {
                problems.push(format!("row {}: missing name", line));
                continue;
            }
            let provider = match Provider::parse(&row.provider) {
                Some(provider) => provider,
                None if row.provider.trim().is_empty() => {
                    problems.push(format!("row {} ({}): missing provider", line, row.name));
                    continue;
                }
                None => {
                    problems.push(format!(
                        "row {} ({}): unknown provider '{}' (expected ontopo or tabit)",
                        line, row.name, row.provider
                    ));
                    continue;
                }
            };
            if row.id.trim().is_empty() {
                problems.push(format!("row {} ({}): missing id", line, row.name));
                continue;
            }
            if !provider.id_matches(&row.id) {
                problems.push(format!(
                    "row {} ({}): {} id '{}' is not {}",
                    line,
                    row.name,
                    provider.label(),
                    row.id,
                    provider.id_shape_hint()
                ));
                continue;
            }
            if !seen_names.insert(row.name.to_lowercase()) {
                problems.push(format!(
                    "row {}: duplicate restaurant name '{}'",
                    line, row.name
                ));
                continue;
            }
            if !seen_ids.insert((provider, row.id.clone())) {
                problems.push(format!(
                    "row {} ({}): duplicate {} id '{}'",
                    line,
                    row.name,
                    provider.label(),
                    row.id
                ));
                continue;
            }
            records.push(RestaurantRecord {
                name: row.name,
                provider,
                id: row.id,
            });
        }

        if !problems.is_empty() {
            return Err(CheckError::Load { problems });
        }
        Ok(Self { records })
    }

    pub fn find_by_exact_id(&self, provider: Provider, id: &str) -> Option<&RestaurantRecord> {
        self.records
            .iter()
            .find(|r| r.provider == provider && r.id == id)
    }

    /// Case-insensitive fuzzy lookup: equality, or substring containment in
    /// either direction. With several matches the shortest stored name wins
    /// as the most specific. Never errors.
    pub fn find_by_name(&self, query: &str) -> Option<&RestaurantRecord> {
        self.best_name_match(query, None)
    }

    pub fn find_by_name_for(&self, query: &str, provider: Provider) -> Option<&RestaurantRecord> {
        self.best_name_match(query, Some(provider))
    }

    fn best_name_match(&self, query: &str, provider: Option<Provider>) -> Option<&RestaurantRecord> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.records
            .iter()
            .filter(|r| provider.map_or(true, |p| r.provider == p))
            .filter(|r| {
                let name = r.name.to_lowercase();
                name == query || name.contains(&query) || query.contains(&name)
            })
            .min_by_key(|r| r.name.len())
    }

    /// All records in source order.
    pub fn list_all(&self) -> &[RestaurantRecord] {
        &self.records
    }

    /// Batch selection, optionally scoped to one provider, in source order.
    pub fn records_for(&self, provider: Option<Provider>) -> Vec<RestaurantRecord> {
        self.records
            .iter()
            .filter(|r| provider.map_or(true, |p| r.provider == p))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
