//! The caller's authenticated identity, attached to every LMS request.

use derive_more::Debug;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue, InvalidHeaderValue};

use crate::args::CliArguments;

/// Credentials of an already established session. The export never obtains or refreshes these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// No credentials; only public courses are accessible
    #[default]
    Anonymous,
    /// An API access token
    Bearer(#[debug(skip)] String),
    /// A browser session cookie, `name=value`
    Cookie(#[debug(skip)] String),
}

impl Credentials {
    /// Picks the credentials given on the command line; a token takes precedence over a cookie.
    pub fn from_args(args: &CliArguments) -> Self {
        match (&args.token, &args.session_cookie) {
            (Some(token), _) => Self::Bearer(token.clone()),
            (None, Some(cookie)) => Self::Cookie(cookie.clone()),
            (None, None) => Self::Anonymous,
        }
    }

    /// The API token, if these credentials are token-based.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Bearer(token) => Some(token),
            _ => None,
        }
    }

    /// The headers that carry these credentials.
    pub fn headers(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        match self {
            Self::Anonymous => {}
            Self::Bearer(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Self::Cookie(cookie) => {
                let mut value = HeaderValue::from_str(cookie)?;
                value.set_sensitive(true);
                headers.insert(COOKIE, value);
            }
        }
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(args: &[&str]) -> CliArguments {
        CliArguments::parse_from(args)
    }

    #[test]
    fn token_takes_precedence() {
        let args = args(&[
            "course-outline",
            "--token",
            "abc",
            "--session-cookie",
            "canvas_session=xyz",
            "courses",
        ]);
        let credentials = Credentials::from_args(&args);
        assert_eq!(credentials.token(), Some("abc"));

        let headers = credentials.headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert!(!headers.contains_key(COOKIE));
    }

    #[test]
    fn cookie_session() {
        let args = args(&[
            "course-outline",
            "--session-cookie",
            "canvas_session=xyz",
            "courses",
        ]);
        let credentials = Credentials::from_args(&args);
        assert_eq!(credentials.token(), None);
        assert_eq!(credentials.headers().unwrap()[COOKIE], "canvas_session=xyz");
    }

    #[test]
    fn secrets_are_not_debug_printed() {
        let credentials = Credentials::Bearer("secret".to_string());
        assert!(!format!("{credentials:?}").contains("secret"));
    }

    #[test]
    fn invalid_header_is_rejected() {
        let credentials = Credentials::Cookie("a\nb".to_string());
        assert!(credentials.headers().is_err());
    }
}
