//! Command line arguments

use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

/// course-outline args
#[derive(Debug, Clone, Parser)]
#[command(name = "course-outline", version)]
pub struct CliArguments {
    /// Configuration file; all settings have defaults, so the file is optional
    #[clap(long, value_name = "FILE", env = "COURSE_OUTLINE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// API access token, sent as a bearer token with every LMS request
    #[clap(long, value_name = "TOKEN", env = "LMS_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Session cookie (`name=value`) of an already logged-in browser session, sent with every LMS
    /// request. Ignored if a token is given.
    #[clap(long, value_name = "COOKIE", env = "LMS_SESSION_COOKIE", hide_env_values = true, global = true)]
    pub session_cookie: Option<String>,

    /// The action to perform
    #[command(subcommand)]
    pub command: Command,
}

/// The actions this tool can perform
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Exports a course's content and saves the generated outline
    Export(ExportArguments),
    /// Lists the courses visible to the current user
    Courses(CoursesArguments),
}

/// Arguments of the `export` command
#[derive(Debug, Clone, Args)]
pub struct ExportArguments {
    /// Numeric course ID, or the URL of any page of the course
    /// (e.g. `https://canvas.example.edu/courses/12345/modules`)
    #[clap(value_name = "COURSE")]
    pub course: String,

    /// Base URL of the LMS; not needed when COURSE is a URL
    #[clap(long, value_name = "URL", env = "LMS_API_BASE")]
    pub api_base: Option<Url>,

    /// Base URL of the outline generation service
    #[clap(long, value_name = "URL")]
    pub outline_service: Option<Url>,

    /// Directory the outline file is saved to
    #[clap(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of items requested per page
    #[clap(long, value_name = "N")]
    pub per_page: Option<NonZeroU32>,

    /// Fetch the resource kinds one after another instead of concurrently
    #[clap(long)]
    pub sequential: bool,
}

/// Arguments of the `courses` command
#[derive(Debug, Clone, Args)]
pub struct CoursesArguments {
    /// Base URL of the LMS
    #[clap(long, value_name = "URL", env = "LMS_API_BASE")]
    pub api_base: Option<Url>,
}
