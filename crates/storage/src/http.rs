use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::repository::{DocumentSource, StorageError};

/// Document source reading static files below an HTTP base URL.
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    /// Create a source for `base_url`. A trailing slash is added when missing so
    /// relative paths resolve below it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::FetchFailed` if the URL cannot be parsed or cannot be a base.
    pub fn new(base_url: &str) -> Result<Self, StorageError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base = Url::parse(&normalized)
            .map_err(|err| StorageError::fetch_failed(base_url, err))?;
        if base.cannot_be_a_base() || base.host_str().is_none() {
            return Err(StorageError::fetch_failed(base_url, "not a base URL"));
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, path: &str) -> Result<Url, StorageError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| StorageError::fetch_failed(self.fallback_location(path), err))
    }

    fn fallback_location(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn read(&self, path: &str) -> Result<String, StorageError> {
        let url = self.url_for(path)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| StorageError::fetch_failed(url.as_str(), err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::fetch_failed(
                url.as_str(),
                format!("HTTP {}", status.as_u16()),
            ));
        }

        response
            .text()
            .await
            .map_err(|err| StorageError::fetch_failed(url.as_str(), err))
    }

    fn locate(&self, path: &str) -> String {
        self.url_for(path)
            .map_or_else(|_| self.fallback_location(path), |url| url.to_string())
    }
}
