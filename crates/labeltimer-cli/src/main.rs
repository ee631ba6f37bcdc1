use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "labeltimer", version, about = "Label Timer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project management
    Project {
        #[command(subcommand)]
        action: commands::project::ProjectAction,
    },
    /// Activity log of the active project
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Labels of the active project
    Label {
        #[command(subcommand)]
        action: commands::label::LabelAction,
    },
    /// Export the active project's labels as CSV
    Export {
        /// Output directory (defaults to the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Dashboard summary
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run an interactive timer session
    Run(commands::run::RunArgs),
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("LABELTIMER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Project { action } => commands::project::run(action),
        Commands::Log { action } => commands::log::run(action),
        Commands::Label { action } => commands::label::run(action),
        Commands::Export { out } => commands::export::run(out),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { json } => commands::stats::run(json),
        Commands::Run(args) => commands::run::run(args),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "labeltimer", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
