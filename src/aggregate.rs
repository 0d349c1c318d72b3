//! Combining all resource kinds of a course and submitting them to the outline service.

use itertools::{Either, Itertools};
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::config::ApiConfig;
use crate::http::HttpError;
use crate::log;
use crate::resource::{self, ResourceKind, ResourceResult};
use crate::target::CourseTarget;
use crate::utils::join_segments;
use crate::world::World;

/// All resource kinds of a course. Every kind is always present, either with its data or with its
/// fallback marker.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CourseAggregate {
    /// The course's numeric ID
    pub course_id: u64,
    /// The course's modules
    pub modules: ResourceResult,
    /// The course's assignments
    pub assignments: ResourceResult,
    /// The course's quizzes
    pub quizzes: ResourceResult,
    /// The course's files
    pub files: ResourceResult,
}

impl CourseAggregate {
    /// The result for the given kind.
    pub fn get(&self, kind: ResourceKind) -> &ResourceResult {
        match kind {
            ResourceKind::Modules => &self.modules,
            ResourceKind::Assignments => &self.assignments,
            ResourceKind::Quizzes => &self.quizzes,
            ResourceKind::Files => &self.files,
        }
    }

    /// All kinds with their results.
    pub fn results(&self) -> impl Iterator<Item = (ResourceKind, &ResourceResult)> {
        ResourceKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }
}

/// Fetches all resource kinds of the course. The kinds are independent of each other: the failure
/// of one never affects the others. With `config.concurrent`, they are fetched concurrently;
/// otherwise one after another. The result is the same either way.
pub async fn aggregate<W: World + ?Sized>(
    world: &W,
    target: &CourseTarget,
    config: &ApiConfig,
) -> CourseAggregate {
    let fetch = |kind| resource::fetch(world, kind, target, config);

    let (modules, assignments, quizzes, files) = if config.concurrent {
        futures::join!(
            fetch(ResourceKind::Modules),
            fetch(ResourceKind::Assignments),
            fetch(ResourceKind::Quizzes),
            fetch(ResourceKind::Files)
        )
    } else {
        (
            fetch(ResourceKind::Modules).await,
            fetch(ResourceKind::Assignments).await,
            fetch(ResourceKind::Quizzes).await,
            fetch(ResourceKind::Files).await,
        )
    };

    let aggregate = CourseAggregate {
        course_id: target.course_id,
        modules,
        assignments,
        quizzes,
        files,
    };

    let (available, missing): (Vec<_>, Vec<_>) =
        aggregate
            .results()
            .partition_map(|(kind, result)| match result {
                ResourceResult::Data(_) => Either::Left(kind),
                ResourceResult::Fallback(_) => Either::Right(kind),
            });
    let mut l = world.log();
    if missing.is_empty() {
        log!(l, "[{}] all {} resource kinds retrieved", target.course_id, available.len());
    } else {
        log!(
            l,
            "[{}] {} of {} resource kinds retrieved; unavailable: {}",
            target.course_id,
            available.len(),
            ResourceKind::ALL.len(),
            missing.iter().join(", "),
        );
    }

    aggregate
}

/// The course outline could not be generated
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The request to the outline service failed
    #[error("request to outline service at {url} failed")]
    Network {
        /// the service endpoint
        url: Url,
        /// the transport error
        #[source]
        source: HttpError,
    },
    /// The outline service answered with an unsuccessful status
    #[error("outline service at {url} failed with status {status}: {body}")]
    Status {
        /// the service endpoint
        url: Url,
        /// the response status
        status: StatusCode,
        /// the response body, verbatim
        body: String,
    },
    /// The request or response body is not valid JSON
    #[error("outline service at {url} did not return valid JSON")]
    Json {
        /// the service endpoint
        url: Url,
        /// the parsing error
        #[source]
        source: serde_json::Error,
    },
    /// The configured service URL can't have a path
    #[error("{0} can't be used as the outline service URL")]
    NotABase(Url),
}

/// The outline generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineService {
    base: Url,
}

impl OutlineService {
    /// Creates a client for the service at the given base URL.
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// The URL of one of the service's endpoints.
    pub fn endpoint(&self, name: &str) -> Result<Url, DeliveryError> {
        join_segments(&self.base, [name]).ok_or_else(|| DeliveryError::NotABase(self.base.clone()))
    }

    /// Submits the aggregate and returns the generated outline. The request is made exactly once;
    /// any failure is returned as is.
    pub async fn generate<W: World + ?Sized>(
        &self,
        world: &W,
        aggregate: &CourseAggregate,
    ) -> Result<serde_json::Value, DeliveryError> {
        let url = self.endpoint("generate-course-outline")?;
        let body = serde_json::to_vec(aggregate).map_err(|source| DeliveryError::Json {
            url: url.clone(),
            source,
        })?;

        let response = world
            .post_json(&url, &body)
            .await
            .map_err(|source| DeliveryError::Network {
                url: url.clone(),
                source,
            })?;
        if !response.status.is_success() {
            return Err(DeliveryError::Status {
                body: response.text(),
                url,
                status: response.status,
            });
        }

        serde_json::from_slice(&response.body).map_err(|source| DeliveryError::Json { url, source })
    }
}
