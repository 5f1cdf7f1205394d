use async_trait::async_trait;
use pricewatch_core::news::entity::Headline;
use pricewatch_core::news::error::NewsError;
use pricewatch_core::news::port::NewsProvider;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const EVERYTHING_ENDPOINT: &str = "https://newsapi.org/v2/everything";

/// NewsAPI 单页最多返回的条数
const MAX_PAGE_SIZE: usize = 100;

const MISSING_TITLE: &str = "Title not available";
const MISSING_DESCRIPTION: &str = "Description not available";

/// # Summary
/// A news provider backed by the NewsAPI `/v2/everything` endpoint.
///
/// # Invariants
/// * `api_key` must be a valid NewsAPI key; an empty key fails fast without a request.
/// * Results keep NewsAPI's relevancy order.
pub struct NewsApiProvider {
    /// The NewsAPI key, sent as `X-Api-Key`.
    api_key: String,
    /// The HTTP client used for requests.
    client: Client,
}

/// # Summary
/// Response envelope of NewsAPI. Errors come back as `status = "error"` with a `message`.
#[derive(Deserialize, Debug)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
    message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
}

impl NewsApiProvider {
    /// # Summary
    /// Creates a new `NewsApiProvider`.
    ///
    /// # Arguments
    /// * `api_key` - The NewsAPI key.
    ///
    /// # Returns
    /// * A new instance, or `NewsError::Network` if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, NewsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NewsError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            client,
        })
    }
}

/// # Summary
/// Converts a NewsAPI payload into at most `max_results` headlines.
///
/// # Logic
/// 1. Rejects `status = "error"` payloads as platform errors.
/// 2. Keeps article order; missing titles or descriptions get placeholders.
fn into_headlines(response: NewsApiResponse, max_results: usize) -> Result<Vec<Headline>, NewsError> {
    if response.status != "ok" {
        return Err(NewsError::Platform(
            response
                .message
                .unwrap_or_else(|| format!("status {}", response.status)),
        ));
    }

    Ok(response
        .articles
        .into_iter()
        .take(max_results)
        .map(|article| {
            Headline::new(
                article.title.unwrap_or_else(|| MISSING_TITLE.to_string()),
                article
                    .description
                    .unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
            )
        })
        .collect())
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    /// # Summary
    /// Searches English articles whose title mentions `query`, sorted by relevancy.
    ///
    /// # Logic
    /// 1. Sends a GET request with `qInTitle`, `language=en`, `sortBy=relevancy` and `pageSize`.
    /// 2. Non-success statuses are reported with the response body.
    /// 3. Parses and truncates the article list.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Headline>, NewsError> {
        if self.api_key.trim().is_empty() {
            return Err(NewsError::Platform("NewsAPI key is not configured".into()));
        }
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let page_size = max_results.min(MAX_PAGE_SIZE).to_string();
        debug!("NewsAPI search qInTitle={query} pageSize={page_size}");

        let response = self
            .client
            .get(EVERYTHING_ENDPOINT)
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("qInTitle", query),
                ("language", "en"),
                ("sortBy", "relevancy"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| NewsError::Network(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(NewsError::Platform(format!(
                "NewsAPI error ({status}): {error_text}"
            )));
        }

        let payload: NewsApiResponse = response
            .json()
            .await
            .map_err(|e| NewsError::Parse(e.without_url().to_string()))?;

        into_headlines(payload, max_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_headlines_keeps_order_and_limit() {
        let json = r#"{
            "status": "ok",
            "totalResults": 3,
            "articles": [
                { "source": { "name": "Reuters" }, "title": "Tesla rallies", "description": "Shares jump 10%." },
                { "source": { "name": "CNBC" }, "title": "Tesla deliveries", "description": null },
                { "source": { "name": "AP" }, "title": "Third story", "description": "Not included." }
            ]
        }"#;
        let response: NewsApiResponse = serde_json::from_str(json).unwrap();
        let headlines = into_headlines(response, 2).unwrap();
        assert_eq!(
            headlines,
            vec![
                Headline::new("Tesla rallies", "Shares jump 10%."),
                Headline::new("Tesla deliveries", MISSING_DESCRIPTION),
            ]
        );
    }

    #[test]
    fn test_error_status_is_platform_error() {
        let json = r#"{ "status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid." }"#;
        let response: NewsApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            into_headlines(response, 3),
            Err(NewsError::Platform("Your API key is invalid.".into()))
        );
    }

    #[tokio::test]
    async fn test_empty_key_fails_without_request() {
        let _ = rustls::crypto::ring::default_provider().install_default();
        let provider = NewsApiProvider::new("").unwrap();
        let result = provider.search("Tesla Inc", 3).await;
        assert!(matches!(result, Err(NewsError::Platform(_))));
    }
}
