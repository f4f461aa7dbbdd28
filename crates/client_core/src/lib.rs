use std::{num::NonZeroU32, time::Duration};

use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::Category,
    protocol::{CatalogItem, PersonItem, ResultsEnvelope},
};
use tracing::debug;
use url::Url;

pub mod controller;
pub mod error;
pub mod projector;
pub mod view_state;

pub use controller::{AggregationController, ControllerEvent, SearchOutcome};
pub use error::{FetchError, FetchErrorKind};
pub use view_state::{CatalogLists, LoadErrors, LoadPhase, SearchState, SearchStatus, ViewState};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One page of a popular list. People have their own record shape.
#[derive(Debug, Clone, PartialEq)]
pub enum PopularResults {
    Titles(Vec<CatalogItem>),
    People(Vec<PersonItem>),
}

/// Read-only access to the remote catalog.
///
/// Implementations never panic or propagate transport errors out of band:
/// every failure is reported as a [`FetchError`] value. No retries and no
/// caching happen at this layer.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_popular(
        &self,
        category: Category,
        page: NonZeroU32,
    ) -> Result<PopularResults, FetchError>;

    async fn search(&self, query: &str, page: NonZeroU32) -> Result<Vec<CatalogItem>, FetchError>;
}

pub struct HttpCatalogClient {
    http: Client,
    base_url: Url,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let parsed = Url::parse(base_url.trim())
            .with_context(|| format!("invalid catalog api base url '{base_url}'"))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            bail!("catalog api base url must be an http(s) url, got '{base_url}'");
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build catalog http client")?;
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in the constructor: the base url can always take path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_results<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, FetchError> {
        debug!(%url, ?query, "catalog: GET");
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                code: status.as_u16(),
                cause: status.canonical_reason().map(str::to_string),
            });
        }

        let body = response.bytes().await?;
        let envelope: ResultsEnvelope<T> = serde_json::from_slice(&body)?;
        Ok(envelope.into_results())
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn fetch_popular(
        &self,
        category: Category,
        page: NonZeroU32,
    ) -> Result<PopularResults, FetchError> {
        let url = self.endpoint(&["popular", category.path_segment()]);
        let page = page.to_string();
        let query = [("page", page.as_str())];
        match category {
            Category::Movies | Category::Tv => self
                .get_results::<CatalogItem>(url, &query)
                .await
                .map(PopularResults::Titles),
            Category::People => self
                .get_results::<PersonItem>(url, &query)
                .await
                .map(PopularResults::People),
        }
    }

    async fn search(&self, query: &str, page: NonZeroU32) -> Result<Vec<CatalogItem>, FetchError> {
        let url = self.endpoint(&["search", "movies"]);
        let page = page.to_string();
        self.get_results(url, &[("query", query), ("page", page.as_str())])
            .await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
