//! Error types for the overall course-outline API

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::aggregate::DeliveryError;
use crate::http::HttpError;
use crate::paginator::FetchError;
use crate::{config, target};

/// A run of the tool failed. Unavailable resource kinds are not errors; they are represented in
/// the exported outline.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration could not be read
    #[error(transparent)]
    Config(#[from] config::Error),
    /// The HTTP client could not be set up
    #[error("HTTP client could not be set up")]
    Client(#[from] HttpError),
    /// The course to export could not be determined
    #[error(transparent)]
    Target(#[from] target::Error),
    /// The course list could not be retrieved
    #[error("courses could not be listed")]
    Courses(#[from] FetchError),
    /// The outline service did not produce an outline
    #[error("course outline could not be generated")]
    Delivery(#[from] DeliveryError),
    /// The outline could not be saved
    #[error("course outline could not be saved to {path}")]
    Output {
        /// the file that was written
        path: PathBuf,
        /// the I/O error
        #[source]
        source: io::Error,
    },
}

/// Result type alias that defaults error to [enum@Error].
pub type Result<T, E = Error> = std::result::Result<T, E>;
