use url::Url;

/// Appends path segments to a base URL. An empty trailing segment (from a trailing slash) is
/// replaced; the base's query and fragment are dropped.
///
/// Returns `None` if the base URL can't have a path, e.g. `mailto:` URLs.
pub fn join_segments<I>(base: &Url, segments: I) -> Option<Url>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
    Some(url)
}
