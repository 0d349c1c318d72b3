//! Listing the courses visible to the current user

use serde::Deserialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::paginator::{FetchError, Paginator};
use crate::target::ApiBase;
use crate::world::World;

/// The fields of a course listing entry that are shown; everything else is ignored.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CourseSummary {
    /// The course's numeric ID
    pub id: u64,
    /// The course's name; missing for courses the user can't access any more
    #[serde(default)]
    pub name: Option<String>,
    /// The course's short code
    #[serde(default)]
    pub course_code: Option<String>,
}

/// Retrieves all courses of the current user. Entries that don't look like courses are skipped.
pub async fn list<W: World + ?Sized>(
    world: &W,
    base: &ApiBase,
    config: &ApiConfig,
) -> Result<Vec<CourseSummary>, FetchError> {
    let mut url = base.endpoint(["courses"]);
    url.query_pairs_mut()
        .append_pair("per_page", &config.per_page.to_string());

    let collection = Paginator::from_config(world, config).drain(url).await?;
    let courses = collection
        .items
        .into_iter()
        .filter_map(|item: Value| serde_json::from_value(item).ok())
        .collect();
    Ok(courses)
}
