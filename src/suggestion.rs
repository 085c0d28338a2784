use crate::{
    config::SuggestionConfig,
    models::{Credential, SuggestionCategory, SuggestionOutcome},
    traits::SuggestionSource,
};
use futures::future::join_all;

/// One-shot keyword lookups. Never returns an error: failures come back as
/// [`SuggestionOutcome::Failed`].
pub struct SuggestionFetcher<S> {
    source: S,
    config: SuggestionConfig,
}

impl<S: SuggestionSource> SuggestionFetcher<S> {
    pub fn new(source: S, config: SuggestionConfig) -> Self {
        Self { source, config }
    }

    pub async fn fetch(
        &self,
        keyword: &str,
        category: SuggestionCategory,
        credential: Option<&Credential>,
    ) -> SuggestionOutcome {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return SuggestionOutcome::failed(category, keyword, "keyword is empty");
        }
        let credential = match credential {
            Some(credential) if !credential.is_blank() => credential,
            _ => return SuggestionOutcome::failed(category, keyword, "API key is not set"),
        };

        match self.source.suggest(credential, keyword, category).await {
            Ok(mut suggestions) => {
                suggestions.truncate(self.config.limit);
                log::debug!(
                    "Got {} {} suggestions for \"{}\"",
                    suggestions.len(),
                    category,
                    keyword
                );
                SuggestionOutcome::Suggestions(suggestions)
            }
            Err(e) => {
                log::error!("Error fetching {} suggestions: {}", category, e);
                SuggestionOutcome::failed(category, keyword, e.to_string())
            }
        }
    }

    /// What an option picker should show for the current search box: the
    /// category defaults when it is empty, otherwise the lookup result.
    pub async fn options_for(
        &self,
        keyword: &str,
        category: SuggestionCategory,
        credential: Option<&Credential>,
    ) -> Vec<String> {
        if keyword.trim().is_empty() {
            return category.default_options();
        }
        self.fetch(keyword, category, credential)
            .await
            .into_options(keyword.trim())
    }

    /// Runs independent lookups concurrently; outcomes keep the input order.
    pub async fn fetch_many(
        &self,
        queries: &[(&str, SuggestionCategory)],
        credential: Option<&Credential>,
    ) -> Vec<SuggestionOutcome> {
        join_all(
            queries
                .iter()
                .map(|(keyword, category)| self.fetch(keyword, *category, credential)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, StudioError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FixedSource {
        answer: Vec<String>,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(answer: &[&str]) -> Self {
            Self {
                answer: answer.iter().map(|s| s.to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SuggestionSource for FixedSource {
        async fn suggest(
            &self,
            _credential: &Credential,
            keyword: &str,
            category: SuggestionCategory,
        ) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .answer
                .iter()
                .map(|s| format!("{} {} ({})", s, keyword, category))
                .collect())
        }
    }

    struct TimingOutSource;

    #[async_trait]
    impl SuggestionSource for TimingOutSource {
        async fn suggest(
            &self,
            _credential: &Credential,
            _keyword: &str,
            _category: SuggestionCategory,
        ) -> Result<Vec<String>> {
            Err(StudioError::Timeout(Duration::from_secs(30)))
        }
    }

    fn key() -> Credential {
        Credential::new("test-key")
    }

    #[tokio::test]
    async fn timeout_degrades_to_one_placeholder() {
        let fetcher = SuggestionFetcher::new(TimingOutSource, SuggestionConfig::default());

        let outcome = fetcher
            .fetch("duduk", SuggestionCategory::Pose, Some(&key()))
            .await;

        assert!(outcome.is_failure());
        let rendered = outcome.into_suggestions();
        assert_eq!(rendered.len(), 1);
        assert!(rendered[0].contains("Gagal"));
        assert!(rendered[0].contains("duduk"));
    }

    #[tokio::test]
    async fn keeps_service_order_and_caps_at_limit() {
        let source = FixedSource::new(&["a", "b", "c", "d", "e", "f", "g"]);
        let fetcher = SuggestionFetcher::new(source, SuggestionConfig::default());

        let items = fetcher
            .fetch("senyum", SuggestionCategory::Expression, Some(&key()))
            .await
            .into_suggestions();

        assert_eq!(items.len(), 5);
        assert_eq!(items[0], "a senyum (ekspresi)");
        assert_eq!(items[4], "e senyum (ekspresi)");
    }

    #[tokio::test]
    async fn missing_credential_is_reported_without_calling_out() {
        let fetcher = SuggestionFetcher::new(FixedSource::new(&["a"]), SuggestionConfig::default());

        let outcome = fetcher.fetch("duduk", SuggestionCategory::Pose, None).await;

        match outcome {
            SuggestionOutcome::Failed { reason, .. } => assert!(reason.contains("API key")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(fetcher.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_search_box_shows_defaults() {
        let fetcher = SuggestionFetcher::new(FixedSource::new(&["a"]), SuggestionConfig::default());

        let options = fetcher
            .options_for("   ", SuggestionCategory::Expression, Some(&key()))
            .await;

        assert_eq!(options, SuggestionCategory::Expression.default_options());
        assert_eq!(fetcher.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetch_many_returns_outcomes_in_query_order() {
        let fetcher = SuggestionFetcher::new(FixedSource::new(&["x"]), SuggestionConfig::default());

        let outcomes = fetcher
            .fetch_many(
                &[
                    ("duduk", SuggestionCategory::Pose),
                    ("senyum", SuggestionCategory::Expression),
                ],
                Some(&key()),
            )
            .await;

        assert_eq!(
            outcomes,
            vec![
                SuggestionOutcome::Suggestions(vec!["x duduk (pose)".to_string()]),
                SuggestionOutcome::Suggestions(vec!["x senyum (ekspresi)".to_string()]),
            ]
        );
    }
}
