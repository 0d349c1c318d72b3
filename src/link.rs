//! Parsing of `Link` response headers (RFC 8288), as used for pagination:
//!
//! ```text
//! Link: <https://lms.example.edu/api/v1/courses/1/modules?page=2>; rel="next",
//!       <https://lms.example.edu/api/v1/courses/1/modules?page=5>; rel="last"
//! ```

use thiserror::Error;

/// A single link of a `Link` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link<'a> {
    /// The link target as written between `<` and `>`; possibly relative
    pub target: &'a str,
    /// The value of the (first) `rel` parameter, possibly containing several relation types
    /// separated by whitespace
    pub rel: Option<&'a str>,
}

impl Link<'_> {
    /// Whether this link has the given relation type. Relation types are compared
    /// case-insensitively.
    pub fn has_rel(&self, relation: &str) -> bool {
        self.rel
            .into_iter()
            .flat_map(str::split_whitespace)
            .any(|rel| rel.eq_ignore_ascii_case(relation))
    }
}

/// The `Link` header is not well-formed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// A link must start with a `<`-delimited target
    #[error("expected `<` at position {position} of Link header")]
    ExpectedTarget {
        /// byte offset into the header value
        position: usize,
    },
    /// The closing `>` of a target is missing
    #[error("link target starting at position {position} is not terminated by `>`")]
    UnterminatedTarget {
        /// byte offset into the header value
        position: usize,
    },
    /// The closing `"` of a parameter value is missing
    #[error("quoted parameter value starting at position {position} is not terminated")]
    UnterminatedQuote {
        /// byte offset into the header value
        position: usize,
    },
    /// Something other than a parameter or the next link follows a link
    #[error("unexpected `{found}` at position {position} of Link header")]
    Unexpected {
        /// byte offset into the header value
        position: usize,
        /// the offending character
        found: char,
    },
}

/// Parses all links in a `Link` header value.
pub fn parse(header: &str) -> Result<Vec<Link<'_>>, LinkError> {
    fn skip_separators(s: &str) -> &str {
        s.trim_start_matches(|c: char| c == ',' || c.is_whitespace())
    }

    let position = |rest: &str| header.len() - rest.len();

    let mut links = Vec::new();
    let mut rest = skip_separators(header);
    while !rest.is_empty() {
        let Some(after) = rest.strip_prefix('<') else {
            return Err(LinkError::ExpectedTarget {
                position: position(rest),
            });
        };
        let end = after.find('>').ok_or(LinkError::UnterminatedTarget {
            position: position(rest),
        })?;
        let target = after[..end].trim();
        rest = &after[end + 1..];

        let mut rel = None;
        loop {
            rest = rest.trim_start();
            if let Some(after) = rest.strip_prefix(';') {
                let input = after.trim_start();
                let (name, value, after) = parse_param(input, position(input))?;
                // only the first occurrence of `rel` counts
                if rel.is_none() && name.eq_ignore_ascii_case("rel") {
                    rel = Some(value);
                }
                rest = after;
            } else if rest.is_empty() || rest.starts_with(',') {
                break;
            } else {
                let found = rest.chars().next().unwrap_or_default();
                return Err(LinkError::Unexpected {
                    position: position(rest),
                    found,
                });
            }
        }

        links.push(Link { target, rel });
        rest = skip_separators(rest);
    }

    Ok(links)
}

/// Parses `name`, `name=token` or `name="quoted"`, returning name, value and the remaining input.
/// `offset` is the position of `input` in the whole header, for error reporting.
fn parse_param(input: &str, offset: usize) -> Result<(&str, &str, &str), LinkError> {
    let is_delimiter = |c: char| c == ';' || c == ',' || c == '=' || c.is_whitespace();
    let name_end = input.find(is_delimiter).unwrap_or(input.len());
    let name = &input[..name_end];
    let rest = input[name_end..].trim_start();

    let Some(rest) = rest.strip_prefix('=') else {
        return Ok((name, "", rest));
    };
    let rest = rest.trim_start();

    if let Some(quoted) = rest.strip_prefix('"') {
        let end = quoted.find('"').ok_or(LinkError::UnterminatedQuote {
            position: offset + (input.len() - rest.len()),
        })?;
        Ok((name, &quoted[..end], &quoted[end + 1..]))
    } else {
        let end = rest
            .find(|c: char| c == ';' || c == ',' || c.is_whitespace())
            .unwrap_or(rest.len());
        Ok((name, &rest[..end], &rest[end..]))
    }
}

/// Returns the target of the link with relation type `next`, if there is one.
pub fn find_next(header: &str) -> Result<Option<&str>, LinkError> {
    let next = parse(header)?
        .into_iter()
        .find(|link| link.has_rel("next"))
        .map(|link| link.target);
    Ok(next)
}
