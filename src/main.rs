//! buildparts CLI
//!
//! Entry point for the `buildparts` command-line tool.

use anyhow::{anyhow, Context, Result};
use buildparts::bundler::{Bundler, DryRunBundler};
use buildparts::{assemble, select, BuildRequest, Environment, Layout, Mode};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "buildparts")]
#[command(about = "Compose bundler configuration from environment-selected fragments", version)]
struct Cli {
    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble and print the resolved configuration
    Resolve {
        #[command(flatten)]
        args: AssembleArgs,

        /// Write the resolved configuration to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print a single value by dot-separated path (e.g. devServer.port)
        #[arg(long)]
        field: Option<String>,
    },

    /// Show the transform steps the bundler would run for each file
    Plan {
        #[command(flatten)]
        args: AssembleArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Files to plan, relative to the project root
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List the fragments selected for the mode
    Parts {
        #[command(flatten)]
        args: AssembleArgs,
    },
}

#[derive(Args)]
struct AssembleArgs {
    /// Build mode: "production", anything else is development
    /// (default: $BUILDPARTS_MODE, then $NODE_ENV)
    #[arg(long)]
    mode: Option<String>,

    /// Dev-server host (default: $HOST, then localhost)
    #[arg(long)]
    host: Option<String>,

    /// Dev-server port (default: $PORT, then 8080)
    #[arg(long)]
    port: Option<u16>,

    /// Source directory
    #[arg(long, default_value = "src")]
    src: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist")]
    dist: PathBuf,

    /// Title of the generated HTML page
    #[arg(long)]
    title: Option<String>,

    /// Fragment file (.toml or .json) merged after the selected parts; repeatable
    #[arg(long = "fragment", short = 'f')]
    fragments: Vec<PathBuf>,
}

impl AssembleArgs {
    /// Combine flags with the process environment. Flags win.
    fn into_request(self) -> Result<BuildRequest> {
        let env = Environment::from_process();

        let mode = self
            .mode
            .as_deref()
            .map(Mode::from_token)
            .unwrap_or(env.mode);
        let ambient = env
            .ambient(mode, self.host, self.port)
            .context("Failed reading environment")?;

        let defaults = Layout::default();
        let layout = Layout {
            src_dir: self.src,
            dist_dir: self.dist,
            title: self.title.or(defaults.title.clone()),
            ..defaults
        };

        Ok(BuildRequest {
            mode,
            ambient,
            layout,
            fragment_files: self.fragments,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --verbose forces DEBUG; otherwise RUST_LOG applies, falling back to WARN.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::builder()
            .with_default_directive(Level::WARN.into())
            .from_env_lossy()
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Resolve {
            args,
            output,
            field,
        } => run_resolve(args, output, field),
        Commands::Plan { args, json, files } => run_plan(args, json, files),
        Commands::Parts { args } => run_parts(args),
    }
}

fn run_resolve(args: AssembleArgs, output: Option<PathBuf>, field: Option<String>) -> Result<()> {
    let request = args.into_request()?;
    let resolved = assemble(&request).context("Configuration assembly failed")?;

    if let Some(path) = field {
        let value = resolved
            .get(&path)
            .ok_or_else(|| anyhow!("No value at '{}'", path))?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match output {
        Some(path) => {
            resolved
                .write_to_file(&path)
                .with_context(|| format!("Failed writing {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", resolved.to_json()?),
    }

    Ok(())
}

fn run_plan(args: AssembleArgs, json: bool, files: Vec<PathBuf>) -> Result<()> {
    let request = args.into_request()?;
    let resolved = assemble(&request).context("Configuration assembly failed")?;

    let report = DryRunBundler::new(files)
        .bundle(&resolved.config)
        .context("Bundler rejected the configuration")?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_human());
    }

    Ok(())
}

fn run_parts(args: AssembleArgs) -> Result<()> {
    let request = args.into_request()?;
    let fragments = select(request.mode, &request.ambient, &request.layout)
        .context("Fragment construction failed")?;

    println!("mode: {}", request.mode);
    for fragment in &fragments {
        println!(
            "  {:<20} {}",
            fragment.source,
            fragment.settings.present_fields().join(", ")
        );
    }
    for path in &request.fragment_files {
        println!("  {:<20} (file)", path.display());
    }

    Ok(())
}
