mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use mystage_core::config::ConfigLoader;

#[derive(Debug, Parser)]
#[command(
    name = "mystage",
    version,
    about = "Stage an Obsidian vault as a MyST Jupyter Book source tree"
)]
struct Cli {
    /// Path to config file (default: ~/.config/mystage/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Copy the vault into the staging directory, rewrite embeds, and write myst.yml
    Build(BuildArgs),

    /// Resolve every embed without writing anything and report problems
    Check(CheckArgs),

    /// Print the resolved configuration
    Doctor,
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Source vault directory (a synced or mounted bucket)
    pub source: PathBuf,

    /// Staging directory (overrides staging.dir from config)
    #[arg(long)]
    pub staging: Option<PathBuf>,

    /// Book name used for the title (default: source folder name)
    #[arg(long)]
    pub name: Option<String>,

    /// Keep the existing staging directory instead of removing it first
    #[arg(long)]
    pub no_clean: bool,

    /// Exit with status 2 if any embed is unresolved or any file failed
    #[arg(long)]
    pub strict: bool,

    /// Print every staged file
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Source vault directory
    pub source: PathBuf,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with status 2 if any embed is unresolved or any file failed
    #[arg(long)]
    pub strict: bool,
}

fn main() {
    let cli = Cli::parse();

    let rc = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(rc) => rc,
        Err(e) => {
            if matches!(cli.command, Commands::Doctor) {
                cmd::doctor::report_failure(cli.config.as_deref(), &e);
            }
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    logging::init(&rc);
    match rc.source_file {
        Some(ref path) => tracing::debug!("Loaded config from {}", path.display()),
        None => tracing::debug!("No config file found, using built-in defaults"),
    }

    let code = match cli.command {
        Commands::Build(args) => cmd::build::run(&rc, args),
        Commands::Check(args) => cmd::check::run(&rc, args),
        Commands::Doctor => cmd::doctor::run(cli.config.as_deref(), &rc),
    };

    logging::flush();
    std::process::exit(code);
}
