use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use slog::{debug, warn, Logger};

use crate::AmedasError;

/// Anything that can hand back the HTML of a portal page.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, AmedasError>;
}

/// Fixed pause taken before every request. Not adaptive and never skipped,
/// which keeps the tool at one request per interval against the portal.
#[derive(Debug, Clone, Copy)]
pub struct RequestThrottle {
    interval: Duration,
}

impl RequestThrottle {
    pub fn new(interval: Duration) -> Self {
        RequestThrottle { interval }
    }

    /// Fails on negative, NaN or out of range values instead of panicking.
    pub fn from_secs_f64(seconds: f64) -> Result<Self, AmedasError> {
        Duration::try_from_secs_f64(seconds)
            .map(Self::new)
            .map_err(|_| AmedasError::InvalidInterval(seconds))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn wait(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

pub struct HtmlFetcher {
    logger: Logger,
    client: Client,
    throttle: RequestThrottle,
}

impl HtmlFetcher {
    pub fn new(logger: Logger, throttle: RequestThrottle) -> HtmlFetcher {
        Self {
            logger,
            client: Client::new(),
            throttle,
        }
    }
}

#[async_trait]
impl PageSource for HtmlFetcher {
    /// GET with default headers, no retries and no explicit timeout. The body
    /// is read as UTF-8 whatever charset the server declares.
    async fn fetch(&self, url: &str) -> Result<String, AmedasError> {
        self.throttle.wait().await;

        debug!(self.logger, "requesting: {}", url);
        let fetch_error = |source| AmedasError::Fetch {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(fetch_error)?;
        if !response.status().is_success() {
            warn!(
                self.logger,
                "portal answered {} for {}",
                response.status(),
                url
            );
        }
        let body = response.bytes().await.map_err(fetch_error)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
