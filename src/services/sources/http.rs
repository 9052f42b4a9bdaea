use std::time::Duration;

use reqwest::Client as HttpClient;

use super::{
    parse_datasets, DatasetSource, Datasets, LoadError, RawArtifacts, CATALOG_ARTIFACT,
    CONTENT_ARTIFACT, CORRELATION_ARTIFACT, POPULAR_ARTIFACT,
};

/// Fetches the artifacts from a remote base URL
///
/// Each artifact is expected at `{base_url}/{artifact file name}`, which is
/// how the exported JSON files are laid out when served statically.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http_client: HttpClient,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LoadError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| LoadError::Http {
                artifact: "client",
                source,
            })?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, artifact: &str) -> String {
        format!("{}/{}", self.base_url, artifact)
    }

    async fn fetch(&self, artifact: &'static str) -> Result<Vec<u8>, LoadError> {
        let url = self.url(artifact);
        tracing::debug!(url = %url, "Fetching artifact");

        let to_error = |source| LoadError::Http { artifact, source };
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(to_error)?;

        let bytes = response.bytes().await.map_err(to_error)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl DatasetSource for HttpSource {
    async fn load(&self) -> Result<Datasets, LoadError> {
        let (catalog, popular, correlation, content) = tokio::try_join!(
            self.fetch(CATALOG_ARTIFACT),
            self.fetch(POPULAR_ARTIFACT),
            self.fetch(CORRELATION_ARTIFACT),
            self.fetch(CONTENT_ARTIFACT),
        )?;

        let raw = RawArtifacts {
            catalog,
            popular,
            correlation,
            content,
        };

        parse_datasets(&raw)
    }

    fn describe(&self) -> String {
        format!("url {}", self.base_url)
    }
}
