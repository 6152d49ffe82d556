use reqwest::Url;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::config::SiteConfig;
use crate::error::ScrapeError;

/// Blocking GET access to the election site.
pub trait SiteClient {
    fn get_text(&self, url: &Url) -> Result<String, ScrapeError>;
    fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, ScrapeError>;
}

#[derive(Clone)]
pub struct HttpSiteClient {
    client: Client,
}

impl HttpSiteClient {
    pub fn new(config: &SiteConfig) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|err| ScrapeError::Http(err.to_string()))?,
        );
        // reqwest's blocking client defaults to a 30s timeout; `None` here
        // means wait indefinitely unless the config sets one.
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ScrapeError::Http(err.to_string()))?;
        Ok(Self { client })
    }

    fn get(&self, url: &Url) -> Result<Response, ScrapeError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|err| ScrapeError::Http(err.to_string()))?;
        if !response.status().is_success() {
            return Err(ScrapeError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

impl SiteClient for HttpSiteClient {
    fn get_text(&self, url: &Url) -> Result<String, ScrapeError> {
        self.get(url)?
            .text()
            .map_err(|err| ScrapeError::Http(err.to_string()))
    }

    fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, ScrapeError> {
        let bytes = self
            .get(url)?
            .bytes()
            .map_err(|err| ScrapeError::Http(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}
