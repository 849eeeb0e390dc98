//! readme-collage - refresh a README with the latest Last.fm album collage.

mod adapters;
mod cassette;
mod cli;
mod collage;
mod config;
mod context;
mod error;
mod fetch;
mod media;
mod output;
mod ports;
mod template;

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::ReadmeError;
use crate::output::{EmbedMode, ImageTarget};
use crate::ports::FetchRequest;
use crate::template::TemplateData;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(env.as_deref(), cli.verbose))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(output) => println!("{} updated successfully", output.display()),
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

/// `RUST_LOG` (or `info`), with `--verbose` adding `debug` on top.
fn log_filter(env: Option<&str>, verbose: bool) -> EnvFilter {
    let filter = env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    if verbose {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

async fn run(cli: Cli) -> Result<PathBuf, ReadmeError> {
    // Load config, then layer CLI flags on top
    let config_path = config::discover_config_path(cli.config.as_deref());
    let mut config = Config::load(&config_path).map_err(ReadmeError::Config)?;

    if let Some(ref embed) = cli.embed {
        config.embed = embed.parse::<EmbedMode>().map_err(ReadmeError::InvalidArgument)?;
    }
    if let Some(ref url) = cli.url {
        config.source.url = Some(url.clone());
    }
    if let Some(ref template) = cli.template {
        config.paths.template = PathBuf::from(template);
    }
    if let Some(ref output) = cli.output {
        config.paths.output = PathBuf::from(output);
    }
    config.validate().map_err(ReadmeError::Config)?;

    let url = collage::resolve_url(&config.source, &config.collage)?;
    let request = FetchRequest {
        url: url.to_string(),
        user_agent: config.source.user_agent.clone(),
        timeout: config.source.request_timeout(),
    };

    // Create context based on mode (live / recording / replaying)
    let replay_path = std::env::var("COLLAGE_REPLAY").ok().filter(|p| !p.is_empty());
    let is_recording = std::env::var("COLLAGE_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        info!(cassette = %cassette_path, "replaying");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        info!("recording mode enabled");
        let (ctx, session) = ServiceContext::recording();
        (ctx, Some(session))
    } else {
        (ServiceContext::live(), None)
    };

    info!(url = %request.url, embed = %config.embed, "fetching collage");
    let fetched = fetch::fetch_image(ctx.source.as_ref(), &request, config.source.deadline()).await;

    drop(ctx);
    if let Some(session) = recording_session {
        let path = session.finish()?;
        info!(path = %path.display(), "cassette saved");
    }
    let image = fetched.map_err(|e| e.in_stage("Failed to fetch image"))?;

    let kind = media::validate(&image.data, &image.mime_type)
        .map_err(|e| e.in_stage("Failed to validate image"))?;

    let target = ImageTarget { dir: &config.paths.image_dir, name: &config.paths.image_name };
    let reference = output::materialize(&image, kind, config.embed, &target)
        .map_err(|e| e.in_stage("Failed to save image"))?;

    let timestamp = template::build_timestamp();
    let document = template::render_file(
        &config.paths.template,
        &TemplateData { image_url: &reference, build_timestamp: &timestamp },
    )
    .map_err(|e| e.in_stage("Failed to generate markdown"))?;

    output::write_document(&config.paths.output, &document)
        .map_err(|e| e.in_stage("Failed to write README.md"))?;
    Ok(config.paths.output)
}
