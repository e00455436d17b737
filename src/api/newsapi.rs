use crate::config::NewsApiConfig;
use crate::error::NewsError;
use crate::types::newsapi::{EverythingParams, HeadlinesParams, NewsApiEnvelope};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Thin client over the NewsAPI REST endpoints.
///
/// Every call is a single GET authenticated with the `apiKey` query
/// parameter and bounded by the configured timeout. No retries.
#[derive(Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Arc<str>,
}

impl NewsApiClient {
    pub fn new(cfg: &NewsApiConfig) -> Result<Self, NewsError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("culture-news/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.timeout_secs));
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: cfg.base_url.clone(),
            api_key: Arc::from(cfg.api_key.as_str()),
        })
    }

    /// `GET {base}/top-headlines`
    pub async fn top_headlines(
        &self,
        category: &str,
        language: &str,
        country: &str,
        page_size: u32,
    ) -> Result<NewsApiEnvelope, NewsError> {
        let params = HeadlinesParams {
            api_key: &self.api_key,
            category,
            language,
            country,
            page_size,
        };
        self.get("top-headlines", &params).await
    }

    /// `GET {base}/everything`, newest first.
    pub async fn everything(
        &self,
        q: &str,
        language: &str,
        page_size: u32,
    ) -> Result<NewsApiEnvelope, NewsError> {
        let params = EverythingParams {
            api_key: &self.api_key,
            q,
            language,
            page_size,
            sort_by: "publishedAt",
        };
        self.get("everything", &params).await
    }

    async fn get<Q: Serialize>(
        &self,
        endpoint: &str,
        params: &Q,
    ) -> Result<NewsApiEnvelope, NewsError> {
        let url = self.endpoint(endpoint)?;
        debug!(%url, "NewsAPI request");
        let resp = self.http.get(url).query(params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            // NewsAPI reports key/quota problems as an error envelope on 4xx
            let body = resp.text().await.unwrap_or_default();
            if let Ok(envelope) = serde_json::from_str::<NewsApiEnvelope>(&body)
                && !envelope.is_ok()
            {
                return envelope.into_result();
            }
            return Err(NewsError::UpstreamStatus(status));
        }

        let envelope: NewsApiEnvelope = resp.json().await?;
        envelope.into_result()
    }

    fn endpoint(&self, name: &str) -> Result<Url, NewsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| NewsError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NewsApiClient {
        let cfg = NewsApiConfig {
            api_key: "test-key".to_string(),
            base_url: Url::parse(&server.uri()).unwrap(),
            ..Default::default()
        };
        NewsApiClient::new(&cfg).unwrap()
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let cfg = NewsApiConfig::default();
        let client = NewsApiClient::new(&cfg).unwrap();
        assert_eq!(
            client.endpoint("everything").unwrap().as_str(),
            "https://newsapi.org/v2/everything"
        );
    }

    #[tokio::test]
    async fn top_headlines_sends_key_and_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .and(query_param("apiKey", "test-key"))
            .and(query_param("category", "entertainment"))
            .and(query_param("country", "us"))
            .and(query_param("pageSize", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "totalResults": 1,
                "articles": [{"source": {"name": "AP"}, "url": "https://ap.org/1", "title": "x"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let env = client_for(&server)
            .top_headlines("entertainment", "en", "us", 20)
            .await
            .unwrap();
        assert_eq!(env.articles.len(), 1);
    }

    #[tokio::test]
    async fn everything_sorts_by_published_at() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/everything"))
            .and(query_param("q", "film OR movie"))
            .and(query_param("sortBy", "publishedAt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok", "totalResults": 0, "articles": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let env = client_for(&server)
            .everything("film OR movie", "en", 30)
            .await
            .unwrap();
        assert!(env.articles.is_empty());
    }

    #[tokio::test]
    async fn error_envelope_on_401_surfaces_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status": "error", "code": "apiKeyInvalid", "message": "bad key"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .everything("art", "en", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::NewsApi { ref code, .. } if code == "apiKeyInvalid"));
    }

    #[tokio::test]
    async fn server_error_without_envelope_is_upstream_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .top_headlines("entertainment", "en", "us", 20)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NewsError::UpstreamStatus(StatusCode::INTERNAL_SERVER_ERROR)
        ));
    }
}
