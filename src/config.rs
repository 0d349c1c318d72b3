//! Configuration file types

use std::num::{NonZeroU32, NonZeroUsize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tokio::fs;
use url::Url;

pub use error::*;

/// The complete configuration, usually read from a TOML file. Every setting has a default, so an
/// empty file (or no file) is valid.
#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How the LMS API is accessed
    pub api: ApiConfig,
    /// Where the course aggregate is sent
    pub outline: OutlineConfig,
    /// Where the generated outline is saved
    pub output: OutputConfig,
}

/// The `[api]` section
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the LMS, e.g. `https://canvas.example.edu`
    pub base: Option<Url>,
    /// Number of items requested per page
    pub per_page: NonZeroU32,
    /// Pagination is aborted after this many pages of a single resource
    pub max_pages: NonZeroUsize,
    /// What a successful page without a `Link` header means
    pub missing_link: MissingLink,
    /// Whether the four resource kinds are fetched concurrently
    pub concurrent: bool,
    /// Timeout for each HTTP request, in seconds; `0` disables it
    pub timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base: None,
            per_page: NonZeroU32::new(100).expect("nonzero"),
            max_pages: NonZeroUsize::new(1000).expect("nonzero"),
            missing_link: MissingLink::default(),
            concurrent: true,
            timeout: 60,
        }
    }
}

impl ApiConfig {
    /// The configured request timeout
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }
}

/// Policy for a successful page response that carries no `Link` header at all.
#[derive(Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MissingLink {
    /// The collection can't be known to be complete; the fetch fails.
    #[default]
    Error,
    /// The page is treated as the last one.
    Complete,
}

/// The `[outline]` section
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutlineConfig {
    /// Base URL of the outline generation service
    pub service: Url,
    /// Whether the API token is forwarded to the service's `/save-token` endpoint before an export
    pub save_token: bool,
    /// How long, in seconds, a finished export still waits for the token to be forwarded
    pub save_token_timeout: u64,
}

impl OutlineConfig {
    /// The configured grace period for the token notification
    pub fn save_token_timeout(&self) -> Duration {
        Duration::from_secs(self.save_token_timeout)
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            service: Url::parse("http://localhost:8000").expect("default URL is valid"),
            save_token: true,
            save_token_timeout: 5,
        }
    }
}

/// The `[output]` section
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory the outline file is saved to
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: ".".into() }
    }
}

impl Config {
    /// Parses the contents of a configuration file.
    pub fn parse(content: &str) -> Result<Self> {
        let config = toml::from_str(content)?;
        Ok(config)
    }

    /// Reads the given configuration file.
    pub async fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = fs::read_to_string(path).await?;
        let config = Self::parse(&config)?;
        Ok(config)
    }
}

mod error {
    use std::io;

    use thiserror::Error;

    /// Errors that can occur when reading the configuration
    #[derive(Error, Debug)]
    pub enum Error {
        /// An I/O error occurred reading the configuration file
        #[error("configuration file could not be read")]
        Io(#[from] io::Error),
        /// The file is not valid configuration
        #[error("configuration file is not valid")]
        Invalid(#[from] toml::de::Error),
    }

    /// Result type alias that defaults error to [enum@Error].
    pub type Result<T, E = Error> = std::result::Result<T, E>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.per_page.get(), 100);
        assert_eq!(config.api.max_pages.get(), 1000);
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.outline.save_token_timeout(), Duration::from_secs(5));
        assert_eq!(config.api.missing_link, MissingLink::Error);
        assert!(config.api.concurrent);
        assert_eq!(config.outline.service.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn full_config() {
        let config = Config::parse(
            r#"
            [api]
            base = "https://canvas.example.edu"
            per-page = 50
            max-pages = 10
            missing-link = "complete"
            concurrent = false
            timeout = 30

            [outline]
            service = "https://outline.example.com/v1/"
            save-token = false
            save-token-timeout = 1

            [output]
            dir = "outlines"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.api.base.as_ref().map(Url::as_str),
            Some("https://canvas.example.edu/")
        );
        assert_eq!(config.api.per_page.get(), 50);
        assert_eq!(config.api.max_pages.get(), 10);
        assert_eq!(config.api.missing_link, MissingLink::Complete);
        assert!(!config.api.concurrent);
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(30)));
        assert!(!config.outline.save_token);
        assert_eq!(config.outline.save_token_timeout(), Duration::from_secs(1));
        assert_eq!(config.output.dir, PathBuf::from("outlines"));
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = Config::parse("[api]\ntimeout = 0").unwrap();
        assert_eq!(config.api.timeout(), None);
    }

    #[test]
    fn zero_page_settings_are_rejected() {
        for content in ["[api]\nper-page = 0", "[api]\nmax-pages = 0"] {
            let error = Config::parse(content).unwrap_err();
            assert!(matches!(error, Error::Invalid(_)), "{content} was accepted");
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = Config::parse("[api]\npage-size = 3").unwrap_err();
        assert!(matches!(error, Error::Invalid(_)));
    }
}
