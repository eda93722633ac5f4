use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::search::{SearchError, SearchHit, WebSearch};

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";
const SEARCH_DEPTH: &str = "basic";
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
    search_depth: &'a str,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// Tavily web-search client. Without an API key every call returns
/// `SearchError::MissingApiKey` and nothing goes over the wire.
#[derive(Clone)]
pub struct TavilyClient {
    client: Client,
    api_key: Option<String>,
}

impl TavilyClient {
    pub fn new(api_key: Option<String>) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder().timeout(SEARCH_TIMEOUT).build()?,
            api_key,
        })
    }
}

#[async_trait]
impl WebSearch for TavilyClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, SearchError> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::MissingApiKey)?;

        let response = self
            .client
            .post(TAVILY_SEARCH_URL)
            .json(&TavilyRequest {
                api_key,
                query,
                max_results,
                search_depth: SEARCH_DEPTH,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_results(&body)
    }
}

fn parse_results(body: &str) -> Result<Vec<SearchHit>, SearchError> {
    let parsed: TavilyResponse = serde_json::from_str(body)?;
    Ok(parsed.results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = TavilyClient::new(None).unwrap();
        assert!(!client.is_configured());

        let result = client.search("latest SRE jobs", 5).await;
        assert!(matches!(result, Err(SearchError::MissingApiKey)));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(TavilyRequest {
            api_key: "tvly-123",
            query: "latest SRE jobs site:linkedin.com OR site:indeed.com",
            max_results: 5,
            search_depth: SEARCH_DEPTH,
        })
        .unwrap();

        assert_eq!(body["api_key"], "tvly-123");
        assert_eq!(body["max_results"], 5);
        assert_eq!(body["search_depth"], "basic");
        assert_eq!(body.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_parse_results_reads_title_and_url() {
        let body = r#"{
            "query": "latest SRE jobs",
            "results": [
                {"title": "SRE - Acme | LinkedIn", "url": "https://linkedin.com/jobs/1", "content": "...", "score": 0.91},
                {"url": "https://indeed.com/viewjob?jk=2"}
            ],
            "response_time": 1.2
        }"#;
        let hits = parse_results(body).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title.as_deref(), Some("SRE - Acme | LinkedIn"));
        assert_eq!(hits[1].title, None);
        assert_eq!(hits[1].url.as_deref(), Some("https://indeed.com/viewjob?jk=2"));
    }

    #[test]
    fn test_missing_results_is_empty() {
        assert!(parse_results(r#"{"detail": "rate limited"}"#).unwrap().is_empty());
    }

    #[test]
    fn test_non_json_body_is_a_decode_error() {
        assert!(matches!(
            parse_results("<html>502</html>"),
            Err(SearchError::Decode(_))
        ));
    }
}
