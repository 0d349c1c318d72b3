//! Identifying the course to export

use std::fmt;

use thiserror::Error;
use url::Url;

use crate::utils::join_segments;

/// The base URL of an LMS instance, e.g. `https://canvas.example.edu`. Guaranteed to be usable as
/// a base for API paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(Url);

impl ApiBase {
    /// Wraps a base URL; fails for URLs that can't have a path.
    pub fn new(url: Url) -> Result<Self> {
        if url.cannot_be_a_base() {
            return Err(Error::NotABase(url));
        }
        Ok(Self(url))
    }

    /// The URL of an API endpoint, `{base}/api/v1/{segments...}`.
    pub fn endpoint<I>(&self, segments: I) -> Url
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let segments = ["api", "v1"]
            .into_iter()
            .map(str::to_string)
            .chain(segments.into_iter().map(|s| s.as_ref().to_string()));
        join_segments(&self.0, segments).expect("API base was checked to be usable as a base")
    }

    /// The base URL
    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A course on a specific LMS instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseTarget {
    /// where the LMS API is located
    pub base: ApiBase,
    /// the course's numeric ID
    pub course_id: u64,
}

impl CourseTarget {
    /// Creates a target from its parts.
    pub fn new(base: ApiBase, course_id: u64) -> Self {
        Self { base, course_id }
    }

    /// Determines the course from a command line value: either a numeric course ID, which
    /// requires an explicit API base, or the URL of a page of the course, from which the LMS host
    /// and course ID are taken. An explicit API base takes precedence over the page's host.
    pub fn resolve(course: &str, api_base: Option<&Url>) -> Result<Self> {
        let course = course.trim();
        if let Ok(course_id) = course.parse() {
            let base = api_base.ok_or(Error::MissingBase)?;
            return Ok(Self::new(ApiBase::new(base.clone())?, course_id));
        }

        let page = Url::parse(course).map_err(|_| Error::InvalidCourse(course.to_string()))?;
        let target = Self::from_page_url(&page)?;
        match api_base {
            Some(base) => Ok(Self::new(ApiBase::new(base.clone())?, target.course_id)),
            None => Ok(target),
        }
    }

    /// Extracts the LMS origin and course ID from the URL of a course page, such as
    /// `https://canvas.example.edu/courses/12345/modules`.
    pub fn from_page_url(page: &Url) -> Result<Self> {
        if !matches!(page.scheme(), "http" | "https") || page.host().is_none() {
            return Err(Error::NotACoursePage(page.clone()));
        }

        let course_id = page
            .path_segments()
            .into_iter()
            .flatten()
            .skip_while(|segment| *segment != "courses")
            .nth(1)
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| Error::NotACoursePage(page.clone()))?;

        let mut base = page.clone();
        base.set_path("");
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self::new(ApiBase::new(base)?, course_id))
    }

    /// The first page of one of the course's collections, `{base}/api/v1/courses/{id}/{segment}`,
    /// requesting `per_page` items per page.
    pub fn collection_url(&self, segment: &str, per_page: u32) -> Url {
        let mut url = self
            .base
            .endpoint(["courses", &self.course_id.to_string(), segment]);
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string());
        url
    }
}

/// The course to export can't be determined
#[derive(Error, Debug)]
pub enum Error {
    /// The LMS base URL is needed but was not given
    #[error("the LMS base URL is required (--api-base, LMS_API_BASE, or `api.base`)")]
    MissingBase,
    /// The value is neither a number nor a URL
    #[error("`{0}` is neither a course ID nor a course URL")]
    InvalidCourse(String),
    /// The URL does not lead to a course
    #[error("{0} is not the URL of a course page")]
    NotACoursePage(Url),
    /// The URL can't be used as an API base
    #[error("{0} can't be used as the LMS base URL")]
    NotABase(Url),
}

/// Result type alias that defaults error to [enum@Error].
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn course_page_url() {
        let target = CourseTarget::resolve(
            "https://canvas.example.edu/courses/12345/modules?foo=bar#x",
            None,
        )
        .unwrap();
        assert_eq!(target.course_id, 12345);
        assert_eq!(target.base.url().as_str(), "https://canvas.example.edu/");
    }

    #[test]
    fn course_id_requires_base() {
        assert!(matches!(
            CourseTarget::resolve("12345", None),
            Err(Error::MissingBase)
        ));

        let base = url("https://canvas.example.edu");
        let target = CourseTarget::resolve("12345", Some(&base)).unwrap();
        assert_eq!(target.course_id, 12345);
    }

    #[test]
    fn explicit_base_overrides_page_host() {
        let base = url("http://localhost:3000");
        let target =
            CourseTarget::resolve("https://canvas.example.edu/courses/7", Some(&base)).unwrap();
        assert_eq!(target.base.url().as_str(), "http://localhost:3000/");
        assert_eq!(target.course_id, 7);
    }

    #[test]
    fn not_a_course() {
        assert!(matches!(
            CourseTarget::resolve("https://canvas.example.edu/profile", None),
            Err(Error::NotACoursePage(_))
        ));
        assert!(matches!(
            CourseTarget::resolve("https://canvas.example.edu/courses/abc", None),
            Err(Error::NotACoursePage(_))
        ));
        assert!(matches!(
            CourseTarget::resolve("intro to rust", None),
            Err(Error::InvalidCourse(_))
        ));
        assert!(matches!(
            ApiBase::new(url("mailto:someone@example.edu")),
            Err(Error::NotABase(_))
        ));
    }

    #[test]
    fn collection_urls() {
        let base = ApiBase::new(url("https://canvas.example.edu/")).unwrap();
        let target = CourseTarget::new(base, 12345);
        assert_eq!(
            target.collection_url("modules", 100).as_str(),
            "https://canvas.example.edu/api/v1/courses/12345/modules?per_page=100"
        );
        assert_eq!(
            target.base.endpoint(["courses"]).as_str(),
            "https://canvas.example.edu/api/v1/courses"
        );
    }
}
