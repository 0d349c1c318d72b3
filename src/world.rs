//! Abstracts an execution environment the export can run in.
//! The world mediates access to the network, the file system, and the configuration, and carries
//! the caller's session credentials so that every request is made on the caller's behalf.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use clap::Parser;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::args::CliArguments;
use crate::config::{self, Config};
use crate::error::Result;
use crate::http::{self, HttpError, Response};
use crate::reporting::Log;
use crate::session::Credentials;

/// The context for executing an export.
#[cfg_attr(feature = "test", mockall::automock(type Logger = crate::test_utils::VecLog;))]
#[async_trait]
pub trait World: Send + Sync + 'static {
    /// The Logger type used by this world
    type Logger: Log;

    /// The arguments given to the invocation
    fn arguments(&self) -> &CliArguments;

    /// The log to which to write progress updates and errors.
    /// This method returns an owned value; usually it will actually be a _handle_ to the actual
    /// logger.
    fn log(&self) -> Self::Logger;

    /// Reads the configuration. Without a configuration file, the defaults are used.
    async fn read_config(&self) -> config::Result<Config>;

    /// Issues an authenticated `GET` request and receives the complete response. Non-success
    /// statuses are not errors at this level.
    async fn get(&self, url: &Url) -> http::Result<Response>;

    /// Issues an authenticated `POST` request with a JSON body and receives the complete response.
    async fn post_json(&self, url: &Url, body: &[u8]) -> http::Result<Response>;

    /// Writes a file, creating parent directories as necessary.
    async fn write_output(&self, location: &Path, content: &[u8]) -> io::Result<()>;
}

/// The default context, accessing the real web and filesystem.
pub struct DefaultWorld {
    arguments: CliArguments,
    config: Config,
    client: reqwest::Client,
}

impl DefaultWorld {
    /// Creates the default world from the process' command line.
    pub async fn new() -> Result<Self> {
        Self::from_arguments(CliArguments::parse()).await
    }

    /// Creates the default world for the given arguments: reads the configuration file, if any,
    /// and configures the HTTP client with the caller's credentials and the configured timeout.
    pub async fn from_arguments(arguments: CliArguments) -> Result<Self> {
        let config = match &arguments.config {
            Some(path) => Config::read(path).await?,
            None => Config::default(),
        };

        let credentials = Credentials::from_args(&arguments);
        let mut client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(credentials.headers().map_err(HttpError::from)?);
        if let Some(timeout) = config.api.timeout() {
            client = client.timeout(timeout);
        }
        let client = client.build().map_err(HttpError::from)?;

        Ok(Self {
            arguments,
            config,
            client,
        })
    }

    async fn receive(response: reqwest::Response) -> http::Result<Response> {
        let status = response.status();
        let link = http::link_header(response.headers())?;
        let body = response.bytes().await?.to_vec();
        Ok(Response { status, link, body })
    }
}

#[async_trait]
impl World for DefaultWorld {
    type Logger = io::Stderr;

    fn arguments(&self) -> &CliArguments {
        &self.arguments
    }

    fn log(&self) -> Self::Logger {
        io::stderr()
    }

    async fn read_config(&self) -> config::Result<Config> {
        Ok(self.config.clone())
    }

    async fn get(&self, url: &Url) -> http::Result<Response> {
        let response = self.client.get(url.clone()).send().await?;
        Self::receive(response).await
    }

    async fn post_json(&self, url: &Url, body: &[u8]) -> http::Result<Response> {
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .send()
            .await?;
        Self::receive(response).await
    }

    async fn write_output(&self, location: &Path, content: &[u8]) -> io::Result<()> {
        if let Some(parent) = location.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = fs::File::create(&location).await?;
        file.write_all(content).await?;
        file.flush().await?;
        Ok(())
    }
}
