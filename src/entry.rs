//! Contains the executable's entry point

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::aggregate::{self, OutlineService};
use crate::args::{Command, CoursesArguments, ExportArguments};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::reporting::indented_chain;
use crate::session::Credentials;
use crate::target::{self, ApiBase, CourseTarget};
use crate::world::{DefaultWorld, World};
use crate::{courses, delivery, log, notify};

/// Entry point; reads the command line arguments and configuration, then executes the requested
/// command.
#[tokio::main]
pub async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let result = async {
        let world = DefaultWorld::new().await?;
        run(world).await
    }
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {}", indented_chain(&error));
            ExitCode::FAILURE
        }
    }
}

/// Executes the command given in the world's arguments.
pub async fn run<W: World>(world: W) -> Result<()> {
    let world = Arc::new(world);
    let config = world.read_config().await?;

    match world.arguments().command.clone() {
        Command::Export(args) => export(&world, config, &args).await,
        Command::Courses(args) => list_courses(&*world, config, &args).await,
    }
}

async fn export<W: World>(world: &Arc<W>, mut config: Config, args: &ExportArguments) -> Result<()> {
    if let Some(per_page) = args.per_page {
        config.api.per_page = per_page;
    }
    if args.sequential {
        config.api.concurrent = false;
    }
    if let Some(service) = &args.outline_service {
        config.outline.service = service.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }

    let api_base = args.api_base.as_ref().or(config.api.base.as_ref());
    let target = CourseTarget::resolve(&args.course, api_base)?;
    let service = OutlineService::new(config.outline.service.clone());

    let credentials = Credentials::from_args(world.arguments());
    let notification = match credentials.token() {
        Some(token) if config.outline.save_token => Some(notify::save_token(
            Arc::clone(world),
            service.clone(),
            token.to_string(),
        )),
        _ => None,
    };

    let result = async {
        let mut l = world.log();
        let id = target.course_id;

        log!(l, "[{id}] exporting course from {}...", target.base);
        let aggregate = aggregate::aggregate(&**world, &target, &config.api).await;

        log!(l, "[{id}] generating outline...");
        let outline = service.generate(&**world, &aggregate).await?;

        let path = delivery::outline_path(&config.output.dir, id);
        delivery::save(&**world, &path, &outline)
            .await
            .map_err(|source| Error::Output {
                path: path.clone(),
                source,
            })?;
        log!(l, "[{id}] outline saved to {}", path.display());

        Ok::<_, Error>(())
    }
    .await;

    if let Some(notification) = notification {
        notification
            .finish(config.outline.save_token_timeout())
            .await;
    }

    result
}

async fn list_courses<W: World>(world: &W, config: Config, args: &CoursesArguments) -> Result<()> {
    let base = args
        .api_base
        .as_ref()
        .or(config.api.base.as_ref())
        .ok_or(target::Error::MissingBase)?;
    let base = ApiBase::new(base.clone())?;

    let courses = courses::list(world, &base, &config.api).await?;

    let mut l = world.log();
    for course in &courses {
        log!(
            l,
            "{}\t{}\t{}",
            course.id,
            course.course_code.as_deref().unwrap_or("-"),
            course.name.as_deref().unwrap_or("-"),
        );
    }
    log!(l, "{} courses", courses.len());

    Ok(())
}
