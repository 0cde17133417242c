use async_trait::async_trait;

use crate::error::LoadError;

/// Goodbooks-10k (Kaggle) mirrored on GitHub.
pub const GOODBOOKS_URL: &str =
    "https://raw.githubusercontent.com/zygmuntz/goodbooks-10k/master/books.csv";

/// Where a remote list gets its raw delimited text from.
///
/// Futures are not required to be `Send`: loading runs on the UI's single-threaded loop.
#[async_trait(?Send)]
pub trait DatasetSource {
    async fn fetch(&self) -> Result<String, LoadError>;
}

/// Fetches a dataset with an HTTP GET.
#[cfg(feature = "http")]
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn goodbooks() -> Self {
        Self::new(GOODBOOKS_URL)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "http")]
#[async_trait(?Send)]
impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<String, LoadError> {
        vdebug!(url = %self.url, "HttpSource::fetch");
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}
