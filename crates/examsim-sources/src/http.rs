//! HTTP question bank source.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use examsim_core::bank::parse_bank_str;
use examsim_core::model::QuestionRecord;
use examsim_core::traits::BankSource;

use crate::error::SourceError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches a JSON bank with a GET request.
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            url: url.to_string(),
            client,
            timeout,
        })
    }

    async fn fetch_text(&self) -> Result<String, SourceError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout)
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(SourceError::NotFound(self.url.clone()));
        }
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Http { status, message });
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("failed to read body: {e}")))
    }
}

#[async_trait]
impl BankSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> anyhow::Result<Vec<QuestionRecord>> {
        let body = match self.fetch_text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(transient = e.is_transient(), "bank request failed: {e}");
                return Err(e.into());
            }
        };
        let records = parse_bank_str(&body).map_err(SourceError::from_parse)?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examsim_core::ExamError;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bank_json() -> serde_json::Value {
        serde_json::json!([
            {
                "question": "Which service offers object storage?",
                "options": ["EC2", "S3", "RDS"],
                "correctAnswer": [1],
                "multiple": false
            },
            {
                "question": "Pick the compute services",
                "options": ["EC2", "S3", "Lambda"],
                "correctAnswer": [0, 2],
                "multiple": true
            }
        ])
    }

    #[tokio::test]
    async fn successful_fetch() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/questions.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bank_json()))
            .mount(&server)
            .await;

        let source = HttpSource::new(&format!("{}/questions.json", server.uri())).unwrap();
        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].correct_answer, vec![0, 2]);
    }

    #[tokio::test]
    async fn not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = HttpSource::new(&format!("{}/missing.json", server.uri())).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn server_error_carries_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let source = HttpSource::new(&server.uri()).unwrap();
        let err = source.fetch().await.unwrap_err();
        let source_err = err.downcast_ref::<SourceError>().unwrap();
        assert!(matches!(source_err, SourceError::Http { status: 503, .. }));
        assert!(source_err.is_transient());
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(bank_json())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let source = HttpSource::with_timeout(&server.uri(), Duration::from_millis(200)).unwrap();
        let err = source.fetch().await.unwrap_err();
        let source_err = err.downcast_ref::<SourceError>().unwrap();
        assert!(matches!(source_err, SourceError::Timeout(t) if *t == Duration::from_millis(200)));
        assert!(source_err.is_transient());
        assert_eq!(source_err.to_string(), "request timed out after 200ms");
    }

    #[tokio::test]
    async fn malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let source = HttpSource::new(&server.uri()).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[tokio::test]
    async fn fetch_bank_maps_to_bank_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = HttpSource::new(&server.uri()).unwrap();
        let err = examsim_core::traits::fetch_bank(&source).await.unwrap_err();
        assert!(matches!(err, ExamError::BankUnavailable(_)));
    }
}
