mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, specialist::SpecialistSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "conductor",
    about = "Deterministic specialist routing for AI coding agents",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .conductor/ or .git/)
    #[arg(long, global = true, env = "CONDUCTOR_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize conductor in the current project
    Init,

    /// Classify a request without routing it
    Classify {
        /// Request text
        text: String,
    },

    /// Route a request: classify, select specialists, synthesize the command
    Route {
        /// Request text
        text: String,

        /// Force the routing target: single_agent or swarm
        #[arg(long)]
        tool: Option<String>,

        /// Execute the synthesized command instead of just printing it
        #[arg(long)]
        exec: bool,
    },

    /// Resolve an @path#section reference and print the fragment
    Resolve {
        /// Reference token, e.g. @patterns/general.md#working-agreements
        reference: String,
    },

    /// Inspect specialists
    Specialist {
        #[command(subcommand)]
        subcommand: SpecialistSubcommand,
    },

    /// Validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Classify { text } => cmd::classify::run(&root, &text, cli.json),
        Commands::Route { text, tool, exec } => {
            cmd::route::run(&root, &text, tool.as_deref(), exec, cli.json)
        }
        Commands::Resolve { reference } => cmd::resolve::run(&root, &reference, cli.json),
        Commands::Specialist { subcommand } => cmd::specialist::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
