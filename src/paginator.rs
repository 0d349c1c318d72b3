//! Draining paginated collections by following `rel="next"` links.

use std::collections::HashSet;

use derive_more::Debug;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::{ApiConfig, MissingLink};
use crate::http::HttpError;
use crate::link::{self, LinkError};
use crate::world::World;

/// All items of a paginated collection, in page order and then in within-page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCollection {
    /// The items
    pub items: Vec<Value>,
    /// The number of pages the items were received in
    pub pages: usize,
}

/// The pagination metadata can't be trusted.
#[derive(Error, Debug)]
pub enum PaginationError {
    /// The `Link` header is not well-formed
    #[error("Link header of {url} is not valid")]
    Link {
        /// the page with the invalid header
        url: Url,
        /// the parsing error
        #[source]
        source: LinkError,
    },
    /// The next link's target is not a valid URL
    #[error("next page link `{target}` of {url} is not a valid URL")]
    Target {
        /// the page containing the link
        url: Url,
        /// the link target as given
        target: String,
        /// the URL parsing error
        #[source]
        source: url::ParseError,
    },
    /// A successful response without a `Link` header, see [MissingLink::Error]
    #[error("{url} has no Link header; the collection may be incomplete")]
    MissingLink {
        /// the page without a header
        url: Url,
    },
    /// A next link leads back to a page that was already received
    #[error("next page link of {url} leads back to already received page {target}")]
    Cycle {
        /// the page containing the link
        url: Url,
        /// the already received page
        target: Url,
    },
    /// The page limit was exceeded
    #[error("more than {limit} pages; giving up")]
    TooManyPages {
        /// the configured limit
        limit: usize,
    },
}

/// A page of a collection could not be retrieved. Failures of later pages are not distinguished
/// from failures of the first page: a partially received collection is never returned.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request failed
    #[error("request for {url} failed")]
    Network {
        /// the requested page
        url: Url,
        /// the transport error
        #[source]
        source: HttpError,
    },
    /// The server answered with an unsuccessful status
    #[error("request for {url} failed with status {status}")]
    Status {
        /// the requested page
        url: Url,
        /// the response status
        status: StatusCode,
    },
    /// The page is not a JSON array
    #[error("response for {url} is not a JSON array")]
    Json {
        /// the requested page
        url: Url,
        /// the parsing error
        #[source]
        source: serde_json::Error,
    },
    /// The pagination metadata can't be trusted
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

impl FetchError {
    /// The status code, if the server answered unsuccessfully.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Follows the next links of a paginated collection until there are none left.
#[derive(Debug)]
pub struct Paginator<'a, W: World + ?Sized> {
    #[debug(skip)]
    world: &'a W,
    max_pages: usize,
    missing_link: MissingLink,
}

impl<'a, W: World + ?Sized> Paginator<'a, W> {
    /// Creates a paginator with the given limits.
    pub fn new(world: &'a W, max_pages: usize, missing_link: MissingLink) -> Self {
        Self {
            world,
            max_pages,
            missing_link,
        }
    }

    /// Creates a paginator configured by the `[api]` section.
    pub fn from_config(world: &'a W, config: &ApiConfig) -> Self {
        Self::new(world, config.max_pages.get(), config.missing_link)
    }

    /// Requests `start` and every page reachable from it through next links, and concatenates the
    /// pages' items. Pages are requested strictly one after another.
    pub async fn drain(&self, start: Url) -> Result<ResourceCollection, FetchError> {
        let mut collection = ResourceCollection::default();
        let mut visited = HashSet::new();
        let mut current = Some(start);

        while let Some(url) = current.take() {
            if collection.pages == self.max_pages {
                return Err(PaginationError::TooManyPages {
                    limit: self.max_pages,
                }
                .into());
            }

            let response = self
                .world
                .get(&url)
                .await
                .map_err(|source| FetchError::Network {
                    url: url.clone(),
                    source,
                })?;
            if !response.status.is_success() {
                return Err(FetchError::Status {
                    url,
                    status: response.status,
                });
            }

            let items: Vec<Value> =
                serde_json::from_slice(&response.body).map_err(|source| FetchError::Json {
                    url: url.clone(),
                    source,
                })?;
            collection.pages += 1;
            tracing::debug!(%url, items = items.len(), page = collection.pages, "received page");
            collection.items.extend(items);

            let next = match response.link.as_deref() {
                Some(header) => link::find_next(header).map_err(|source| PaginationError::Link {
                    url: url.clone(),
                    source,
                })?,
                None => match self.missing_link {
                    MissingLink::Error => {
                        return Err(PaginationError::MissingLink { url }.into());
                    }
                    MissingLink::Complete => None,
                },
            };

            if let Some(target) = next {
                let next = url.join(target).map_err(|source| PaginationError::Target {
                    url: url.clone(),
                    target: target.to_string(),
                    source,
                })?;
                if visited.contains(&next) || next == url {
                    return Err(PaginationError::Cycle { url, target: next }.into());
                }
                current = Some(next);
            }
            visited.insert(url);
        }

        Ok(collection)
    }
}
