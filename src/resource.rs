//! The kinds of course content that are exported, and fetching them with failures isolated per
//! kind.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::config::ApiConfig;
use crate::log;
use crate::paginator::Paginator;
use crate::reporting::indented_chain;
use crate::target::CourseTarget;
use crate::world::World;

/// A collection of course content that can be retrieved per course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// The course's modules
    Modules,
    /// The course's assignments
    Assignments,
    /// The course's quizzes
    Quizzes,
    /// The course's files
    Files,
}

impl ResourceKind {
    /// All resource kinds, in the order they appear in a course aggregate.
    pub const ALL: [Self; 4] = [Self::Modules, Self::Assignments, Self::Quizzes, Self::Files];

    /// The kind's name, which is also its path segment in the API and its key in the aggregate.
    pub fn name(self) -> &'static str {
        match self {
            Self::Modules => "modules",
            Self::Assignments => "assignments",
            Self::Quizzes => "quizzes",
            Self::Files => "files",
        }
    }

    /// The marker used in place of the kind's data when it can't be retrieved.
    pub fn fallback(self) -> &'static str {
        match self {
            Self::Modules => "Modules do not exist for this course",
            Self::Assignments => "Assignments do not exist for this course",
            Self::Quizzes => "Quizzes do not exist for this course",
            Self::Files => "Files do not exist for this course",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The outcome of fetching one resource kind. Either way, it is sent on as a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceResult {
    /// The complete collection, serialized as a JSON array
    Data(String),
    /// The collection could not be retrieved; contains the kind's fallback marker
    Fallback(&'static str),
}

impl ResourceResult {
    /// The value as sent to the outline service.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Data(json) => json,
            Self::Fallback(marker) => marker,
        }
    }

    /// Whether this is a fallback marker.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

impl Serialize for ResourceResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Retrieves all pages of one kind of the course's content. This never fails: if the content is
/// not available (which includes courses that don't use that kind of content) or any page can't
/// be retrieved, the kind's fallback marker is returned instead and the reason is logged.
pub async fn fetch<W: World + ?Sized>(
    world: &W,
    kind: ResourceKind,
    target: &CourseTarget,
    config: &ApiConfig,
) -> ResourceResult {
    let mut l = world.log();
    let id = target.course_id;
    let url = target.collection_url(kind.name(), config.per_page.get());

    let collection = match Paginator::from_config(world, config).drain(url).await {
        Ok(collection) => collection,
        Err(error) => {
            log!(l, "[{id}] {kind} unavailable: {}", indented_chain(&error));
            return ResourceResult::Fallback(kind.fallback());
        }
    };

    match serde_json::to_string(&collection.items) {
        Ok(json) => {
            log!(
                l,
                "[{id}] {kind}: {} items on {} pages",
                collection.items.len(),
                collection.pages,
            );
            ResourceResult::Data(json)
        }
        Err(error) => {
            log!(l, "[{id}] {kind} could not be serialized: {error}");
            ResourceResult::Fallback(kind.fallback())
        }
    }
}
