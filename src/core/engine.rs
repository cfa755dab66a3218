use crate::core::dispatcher::BatchDispatcher;
use crate::core::report::BatchReport;
use crate::directory::Directory;
use crate::domain::model::{Provider, RequestTemplate, RestaurantRecord};
use crate::domain::ports::ClientRouter;
use crate::utils::error::{CheckError, Result};

/// Ties the directory, the provider clients and the dispatcher together.
/// Single-restaurant mode is the degenerate case of the same batch engine
/// with one record and one worker.
pub struct CheckEngine<R: ClientRouter> {
    directory: Directory,
    dispatcher: BatchDispatcher<R>,
}

impl<R: ClientRouter> CheckEngine<R> {
    pub fn new(directory: Directory, router: R) -> Self {
        Self {
            directory,
            dispatcher: BatchDispatcher::new(router),
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Turn a CLI reference (raw provider id or fuzzy name) into a record.
    /// A query that already has a provider's id shape is used directly; the
    /// directory does not have to know every id.
    pub fn resolve(&self, query: &str, provider: Option<Provider>) -> Result<RestaurantRecord> {
        let candidates = match provider {
            Some(provider) => vec![provider],
            None => Provider::ALL.to_vec(),
        };
        for candidate in candidates {
            if candidate.id_matches(query) {
                if let Some(record) = self.directory.find_by_exact_id(candidate, query) {
                    return Ok(record.clone());
                }
                return Ok(RestaurantRecord {
                    name: query.to_string(),
                    provider: candidate,
                    id: query.to_string(),
                });
            }
        }

        let found = match provider {
            Some(provider) => self.directory.find_by_name_for(query, provider),
            None => self.directory.find_by_name(query),
        };
        found.cloned().ok_or_else(|| match provider {
            Some(provider) => CheckError::validation(format!(
                "No {} restaurant matching '{}'",
                provider.label(),
                query
            )),
            None => CheckError::validation(format!("No restaurant matching '{}'", query)),
        })
    }

    pub async fn run_single(
        &self,
        query: &str,
        provider: Option<Provider>,
        template: &RequestTemplate,
    ) -> Result<BatchReport> {
        let record = self.resolve(query, provider)?;
        tracing::info!(
            restaurant = %record.name,
            provider = %record.provider,
            date = template.date(),
            "checking availability"
        );
        self.dispatcher.run(&[record], template, 1).await
    }

    pub async fn run_batch(
        &self,
        template: &RequestTemplate,
        provider: Option<Provider>,
        max_workers: usize,
    ) -> Result<BatchReport> {
        let selection = self.directory.records_for(provider);
        tracing::info!(
            restaurants = selection.len(),
            workers = max_workers,
            date = template.date(),
            "starting batch check"
        );
        self.dispatcher.run(&selection, template, max_workers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AvailabilityRequest, ProviderReply};
    use crate::domain::ports::ProviderClient;
    use crate::utils::error::QueryResult;
    use async_trait::async_trait;

    struct StubClient(Provider);

    #[async_trait]
    impl ProviderClient for StubClient {
        fn provider(&self) -> Provider {
            self.0
        }

        async fn query(&self, _request: &AvailabilityRequest) -> QueryResult<ProviderReply> {
            Ok(ProviderReply::default())
        }
    }

    struct StubRouter {
        ontopo: StubClient,
        tabit: StubClient,
    }

    impl StubRouter {
        fn new() -> Self {
            Self {
                ontopo: StubClient(Provider::OnTopo),
                tabit: StubClient(Provider::Tabit),
            }
        }
    }

    impl ClientRouter for StubRouter {
        fn client_for(&self, provider: Provider) -> &dyn ProviderClient {
            match provider {
                Provider::OnTopo => &self.ontopo,
                Provider::Tabit => &self.tabit,
            }
        }
    }

    fn engine() -> CheckEngine<StubRouter> {
        let csv = "\
name,provider,id
Shila,ontopo,69127207
DOK,tabit,5f3e8a1b9c2d4e6f8a0b1c2d
";
        let directory = Directory::from_reader(csv.as_bytes()).unwrap();
        CheckEngine::new(directory, StubRouter::new())
    }

    #[test]
    fn test_resolve_known_id_uses_directory_record() {
        let record = engine().resolve("69127207", None).unwrap();
        assert_eq!(record.name, "Shila");
    }

    #[test]
    fn test_resolve_unknown_id_builds_ad_hoc_record() {
        let record = engine().resolve("99999999", None).unwrap();
        assert_eq!(record.provider, Provider::OnTopo);
        assert_eq!(record.name, "99999999");
        assert_eq!(record.id, "99999999");
    }

    #[test]
    fn test_resolve_by_fuzzy_name() {
        let record = engine().resolve("dok", Some(Provider::Tabit)).unwrap();
        assert_eq!(record.id, "5f3e8a1b9c2d4e6f8a0b1c2d");
    }

    #[test]
    fn test_resolve_unknown_name_message_contract() {
        let err = engine()
            .resolve("NonExistentRestaurant12345", Some(Provider::Tabit))
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("No Tabit restaurant matching 'NonExistentRestaurant12345'"));

        let err = engine().resolve("NonExistentRestaurant12345", None).unwrap_err();
        assert!(err.to_string().contains("No restaurant matching"));
    }

    #[tokio::test]
    async fn test_run_single_is_one_entry_report() {
        let engine = engine();
        let template =
            RequestTemplate::new("20260201", vec!["1900".to_string()], 2).unwrap();
        let report = engine.run_single("shila", None, &template).await.unwrap();
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].restaurant.name, "Shila");
    }

    #[tokio::test]
    async fn test_run_batch_scoped_to_provider() {
        let engine = engine();
        let template =
            RequestTemplate::new("20260201", vec!["1900".to_string()], 2).unwrap();
        let report = engine
            .run_batch(&template, Some(Provider::Tabit), 10)
            .await
            .unwrap();
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].restaurant.provider, Provider::Tabit);
    }

    #[tokio::test]
    async fn test_run_batch_empty_selection_is_fatal() {
        let csv = "name,provider,id\nShila,ontopo,69127207\n";
        let directory = Directory::from_reader(csv.as_bytes()).unwrap();
        let engine = CheckEngine::new(directory, StubRouter::new());
        let template =
            RequestTemplate::new("20260201", vec!["1900".to_string()], 2).unwrap();
        let err = engine
            .run_batch(&template, Some(Provider::Tabit), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::EmptyBatch));
    }
}
