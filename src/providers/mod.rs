pub mod ontopo;
pub mod tabit;

pub use ontopo::OntopoClient;
pub use tabit::TabitClient;

use crate::domain::model::Provider;
use crate::domain::ports::{ClientRouter, ProviderClient};
use crate::utils::error::Result;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub ontopo_base_url: String,
    pub tabit_base_url: String,
    /// Per-query bound; on expiry the adapter fails with a timeout the
    /// dispatcher records as a provider error for that restaurant.
    pub timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            ontopo_base_url: ontopo::DEFAULT_BASE_URL.to_string(),
            tabit_base_url: tabit::DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// One concrete client per provider. Adding a provider means a new client
/// plus one `client_for` arm; the dispatcher stays unchanged.
pub struct ProviderSet {
    ontopo: OntopoClient,
    tabit: TabitClient,
}

impl ProviderSet {
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        Ok(Self {
            ontopo: OntopoClient::new(&settings.ontopo_base_url, settings.timeout)?,
            tabit: TabitClient::new(&settings.tabit_base_url, settings.timeout)?,
        })
    }
}

impl ClientRouter for ProviderSet {
    fn client_for(&self, provider: Provider) -> &dyn ProviderClient {
        match provider {
            Provider::OnTopo => &self.ontopo,
            Provider::Tabit => &self.tabit,
        }
    }
}
