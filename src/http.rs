//! The parts of an HTTP exchange the export cares about

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, InvalidHeaderValue, LINK, ToStrError};
use thiserror::Error;

/// A fully received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The response status
    pub status: StatusCode,
    /// The raw value of the `Link` header, if the response has one
    pub link: Option<String>,
    /// The response body
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a response without a `Link` header.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            link: None,
            body: body.into(),
        }
    }

    /// Creates a `200 OK` response without a `Link` header.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Sets the `Link` header.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Combines all `Link` header fields of a response into one list. A link list may be split across
/// several fields, and the next link can be in any of them.
pub fn link_header(headers: &HeaderMap) -> Result<Option<String>, ToStrError> {
    let fields = headers
        .get_all(LINK)
        .iter()
        .map(|value| value.to_str())
        .collect::<Result<Vec<_>, _>>()?;
    if fields.is_empty() {
        return Ok(None);
    }
    Ok(Some(fields.join(", ")))
}

/// An HTTP request could not be completed.
#[derive(Error, Debug)]
pub enum HttpError {
    /// A network or protocol error
    #[error("network I/O error")]
    Network(#[from] reqwest::Error),
    /// The response had a header that is not visible ASCII
    #[error("response header is not valid text")]
    Header(#[from] ToStrError),
    /// The credentials can't be sent as a header
    #[error("credentials contain characters not allowed in a header")]
    Credentials(#[from] InvalidHeaderValue),
}

/// Result type alias that defaults error to [enum@HttpError].
pub type Result<T, E = HttpError> = std::result::Result<T, E>;
