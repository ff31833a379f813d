use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use docver_tool::{
    config::schema_json,
    ctx::AppContext,
    preview::RenderOptions,
    scan::ScanOptions,
};
use log::LevelFilter;

/// Manage version manifests for multi-version documentation.
#[derive(Parser, Debug)]
#[command(name = "docver", version, about)]
struct Cli {
    /// Configuration file, defaults to `.docver.toml` in the working directory.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Working directory.
    #[arg(short = 'C', long, global = true)]
    workdir: Option<PathBuf>,
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a versions.json manifest for the documentation's version selector.
    Scan {
        /// Directory to process.
        dir: Option<PathBuf>,
        /// Output file.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Point `stable` at the newest release.
        #[arg(long)]
        link_stable: bool,
    },
    /// Print the version picker and banner as HTML.
    Render {
        /// Base URL of the published documentation.
        #[arg(long)]
        base_url: Option<String>,
        /// Version the banner is rendered for.
        #[arg(long)]
        current: Option<String>,
        /// Use a local manifest instead of fetching `{base_url}/versions.json`.
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Write the HTML to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fetch the published manifest and report problems.
    Check {
        /// Base URL of the published documentation.
        #[arg(long)]
        base_url: Option<String>,
        /// Version to classify against the manifest.
        #[arg(long)]
        current: Option<String>,
        /// Fail on warnings.
        #[arg(long)]
        strict: bool,
    },
    /// Print the JSON Schema of the configuration file.
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let workspace = match cli.workdir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let mut ctx = AppContext::new(workspace);
    // The schema is what a broken config file gets fixed with.
    if !matches!(cli.command, Command::Schema) {
        ctx.prepare_config(cli.config).await?;
    }

    match cli.command {
        Command::Scan {
            dir,
            output,
            link_stable,
        } => {
            ctx.scan(&ScanOptions {
                dir,
                output,
                link_stable,
            })?;
        }
        Command::Render {
            base_url,
            current,
            manifest,
            output,
        } => {
            let html = ctx
                .render_preview(&RenderOptions {
                    base_url,
                    current,
                    manifest,
                })
                .await?;
            match output {
                Some(path) => {
                    let path = ctx.resolve(path);
                    tokio::fs::write(&path, html)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                }
                None => println!("{html}"),
            }
        }
        Command::Check {
            base_url,
            current,
            strict,
        } => {
            ctx.check(base_url.as_deref(), current.as_deref(), strict)
                .await?;
        }
        Command::Schema => println!("{}", schema_json()?),
    }

    Ok(())
}
