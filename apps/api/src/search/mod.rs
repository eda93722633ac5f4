//! Job search fan-out — turns the model's job-title suggestions into a bounded
//! list of listings by issuing one web search per title.
//!
//! The backend is pluggable (`WebSearch`); `AppState` holds an
//! `Arc<dyn WebSearch>`, production uses `TavilyClient`.

pub mod tavily;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use tavily::TavilyClient;

/// At most this many suggested titles are searched.
pub const MAX_TITLES: usize = 3;
/// At most this many listings are returned across all titles.
pub const MAX_LISTINGS: usize = 10;
/// Results requested from the backend per title.
pub const RESULTS_PER_TITLE: u32 = 5;

const LISTING_SOURCE: &str = "Web";
const UNKNOWN_COMPANY: &str = "Unknown";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API returned status {status}")]
    Api { status: u16 },

    #[error("could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One raw search result. Both fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchHit {
    pub title: Option<String>,
    pub url: Option<String>,
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    /// False when the backend cannot be called at all (e.g. no API key).
    fn is_configured(&self) -> bool {
        true
    }

    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, SearchError>;
}

/// A job opportunity assembled from a search hit plus the title searched for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub url: Option<String>,
    pub source: String,
}

impl JobListing {
    fn from_hit(title: &str, hit: SearchHit) -> Self {
        Self {
            title: title.to_string(),
            company: hit.title.unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            url: hit.url,
            source: LISTING_SOURCE.to_string(),
        }
    }
}

/// What happened to a single title's search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TitleOutcome {
    Found { results: usize },
    Disabled,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleSearch {
    pub title: String,
    pub outcome: TitleOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobSearchReport {
    pub titles: Vec<TitleSearch>,
    pub listings: Vec<JobListing>,
}

impl JobSearchReport {
    pub fn is_disabled(&self) -> bool {
        !self.titles.is_empty()
            && self
                .titles
                .iter()
                .all(|t| t.outcome == TitleOutcome::Disabled)
    }
}

/// Splits raw model output into searchable titles: trimmed, nonempty, first three.
pub fn parse_titles(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .take(MAX_TITLES)
        .map(str::to_string)
        .collect()
}

pub fn build_query(title: &str) -> String {
    format!("latest {title} jobs site:linkedin.com OR site:indeed.com")
}

/// Searches each title in turn, pausing `interval` between calls.
///
/// A failed call contributes no listings and does not affect other titles.
/// Nothing is called when the backend is not configured.
pub async fn search_jobs(
    raw_titles: &str,
    backend: &dyn WebSearch,
    interval: Duration,
) -> JobSearchReport {
    let titles = parse_titles(raw_titles);
    let mut report = JobSearchReport::default();

    if !backend.is_configured() {
        info!("Job search disabled; skipping {} titles", titles.len());
        report.titles = titles
            .into_iter()
            .map(|title| TitleSearch {
                title,
                outcome: TitleOutcome::Disabled,
            })
            .collect();
        return report;
    }

    for (i, title) in titles.into_iter().enumerate() {
        if i > 0 && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }

        let query = build_query(&title);
        debug!("Searching: {query}");

        let outcome = match backend.search(&query, RESULTS_PER_TITLE).await {
            Ok(hits) => {
                let results = hits.len();
                report
                    .listings
                    .extend(hits.into_iter().map(|hit| JobListing::from_hit(&title, hit)));
                TitleOutcome::Found { results }
            }
            Err(SearchError::MissingApiKey) => TitleOutcome::Disabled,
            Err(e) => {
                warn!("Job search for '{title}' failed: {e}");
                TitleOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        report.titles.push(TitleSearch { title, outcome });
    }

    report.listings.truncate(MAX_LISTINGS);
    info!(
        "Job search finished: {} titles, {} listings",
        report.titles.len(),
        report.listings.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted backend: pops one response per call and records every query.
    struct FakeSearch {
        configured: bool,
        responses: Mutex<Vec<Result<Vec<SearchHit>, SearchError>>>,
        queries: Mutex<Vec<String>>,
    }

    impl FakeSearch {
        fn new(responses: Vec<Result<Vec<SearchHit>, SearchError>>) -> Self {
            Self {
                configured: true,
                responses: Mutex::new(responses.into_iter().rev().collect()),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn unconfigured() -> Self {
            Self {
                configured: false,
                ..Self::new(vec![])
            }
        }

        fn calls(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl WebSearch for FakeSearch {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn search(
            &self,
            query: &str,
            max_results: u32,
        ) -> Result<Vec<SearchHit>, SearchError> {
            assert_eq!(max_results, RESULTS_PER_TITLE);
            self.queries.lock().unwrap().push(query.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(vec![]))
        }
    }

    fn hits(n: usize) -> Vec<SearchHit> {
        (0..n)
            .map(|i| SearchHit {
                title: Some(format!("Company {i}")),
                url: Some(format!("https://example.com/jobs/{i}")),
            })
            .collect()
    }

    #[test]
    fn test_parse_titles_trims_drops_blanks_and_caps_at_three() {
        let raw = "  Backend Engineer \n\n\tData Engineer\n   \nSRE\nPlatform Engineer\n";
        assert_eq!(
            parse_titles(raw),
            vec!["Backend Engineer", "Data Engineer", "SRE"]
        );
    }

    #[test]
    fn test_parse_titles_of_blank_text_is_empty() {
        assert!(parse_titles("").is_empty());
        assert!(parse_titles("\n  \n").is_empty());
    }

    #[test]
    fn test_build_query_uses_fixed_template() {
        assert_eq!(
            build_query("Rust Developer"),
            "latest Rust Developer jobs site:linkedin.com OR site:indeed.com"
        );
    }

    #[test]
    fn test_listing_defaults_company_to_unknown() {
        let listing = JobListing::from_hit("SRE", SearchHit::default());
        assert_eq!(listing.company, "Unknown");
        assert_eq!(listing.url, None);
        assert_eq!(listing.source, "Web");
        assert_eq!(listing.title, "SRE");
    }

    #[test]
    fn test_listing_keeps_blank_company_when_title_present() {
        let hit = SearchHit {
            title: Some(String::new()),
            url: Some("https://example.com".to_string()),
        };
        let listing = JobListing::from_hit("SRE", hit);
        assert_eq!(listing.company, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_at_most_three_calls_and_ten_listings() {
        let backend = FakeSearch::new(vec![Ok(hits(5)), Ok(hits(5)), Ok(hits(5)), Ok(hits(5))]);
        let report = search_jobs("A\nB\nC\nD\nE", &backend, Duration::from_millis(500)).await;

        assert_eq!(backend.calls(), 3);
        assert_eq!(report.titles.len(), 3);
        assert_eq!(report.listings.len(), MAX_LISTINGS);
        // Truncation keeps the earliest titles' listings.
        assert!(report.listings[..5].iter().all(|l| l.title == "A"));
        assert!(report.listings[5..].iter().all(|l| l.title == "B"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_queries_follow_title_order() {
        let backend = FakeSearch::new(vec![]);
        search_jobs("Data Analyst\nML Engineer", &backend, Duration::from_millis(500)).await;

        let queries = backend.queries.lock().unwrap().clone();
        assert_eq!(
            queries,
            vec![
                "latest Data Analyst jobs site:linkedin.com OR site:indeed.com",
                "latest ML Engineer jobs site:linkedin.com OR site:indeed.com",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unconfigured_backend_returns_nothing_and_makes_no_calls() {
        let backend = FakeSearch::unconfigured();
        let report = search_jobs("A\nB\nC", &backend, Duration::from_millis(500)).await;

        assert_eq!(backend.calls(), 0);
        assert!(report.listings.is_empty());
        assert!(report.is_disabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_key_error_marks_title_disabled() {
        let backend = FakeSearch::new(vec![Err(SearchError::MissingApiKey)]);
        let report = search_jobs("A", &backend, Duration::ZERO).await;

        assert!(report.listings.is_empty());
        assert_eq!(report.titles[0].outcome, TitleOutcome::Disabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_title_does_not_affect_others() {
        let backend = FakeSearch::new(vec![
            Ok(hits(2)),
            Err(SearchError::Api { status: 500 }),
            Ok(hits(1)),
        ]);
        let report = search_jobs("A\nB\nC", &backend, Duration::from_millis(500)).await;

        assert_eq!(report.listings.len(), 3);
        assert!(report.listings.iter().all(|l| l.title != "B"));
        assert_eq!(report.titles[0].outcome, TitleOutcome::Found { results: 2 });
        assert!(matches!(
            report.titles[1].outcome,
            TitleOutcome::Failed { .. }
        ));
        assert_eq!(report.titles[2].outcome, TitleOutcome::Found { results: 1 });
        assert!(!report.is_disabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_separates_consecutive_calls() {
        let backend = FakeSearch::new(vec![]);
        let start = tokio::time::Instant::now();
        search_jobs("A\nB\nC", &backend, Duration::from_millis(500)).await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1000), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(1100), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_titles_means_no_calls() {
        let backend = FakeSearch::new(vec![Ok(hits(5))]);
        let report = search_jobs("\n\n", &backend, Duration::from_millis(500)).await;

        assert_eq!(backend.calls(), 0);
        assert_eq!(report, JobSearchReport::default());
        assert!(!report.is_disabled());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let value = serde_json::to_value(TitleOutcome::Found { results: 4 }).unwrap();
        assert_eq!(value["status"], "found");
        assert_eq!(value["results"], 4);

        let value = serde_json::to_value(TitleOutcome::Disabled).unwrap();
        assert_eq!(value["status"], "disabled");
    }
}
