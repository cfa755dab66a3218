use crate::domain::model::{AvailabilityRequest, Provider, ProviderReply};
use crate::utils::error::QueryResult;
use async_trait::async_trait;

/// Common capability of every booking platform adapter.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Run one availability query: one upstream request per distinct time in
    /// the request, merged into a single reply. `Ok` with empty slots means
    /// "reachable, no tables"; transport and protocol failures come back as
    /// `QueryError`.
    async fn query(&self, request: &AvailabilityRequest) -> QueryResult<ProviderReply>;
}

/// Maps a provider tag to its concrete client. The dispatcher only ever
/// talks to this seam, so new providers do not touch it.
pub trait ClientRouter: Send + Sync {
    fn client_for(&self, provider: Provider) -> &dyn ProviderClient;
}
