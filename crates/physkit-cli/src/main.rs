//! physkit CLI: MPM simulation runs and OBJ mesh utilities.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

mod commands;

#[derive(Parser)]
#[command(name = "physkit")]
#[command(version, about = "physkit: material point simulation and surface mesh tools")]
struct Cli {
    /// Log debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an MPM simulation from a config file.
    Simulate {
        /// Path to simulation config (TOML).
        #[arg(short, long, default_value = "simulation.toml")]
        config: PathBuf,

        /// Write lifecycle events as JSON lines to this file.
        #[arg(short, long)]
        events: Option<PathBuf>,
    },

    /// Read an OBJ mesh and write it back out.
    Convert {
        /// Input `.obj` file.
        input: PathBuf,

        /// Output `.obj` file; the `.mtl` companion is written next to it.
        output: PathBuf,

        /// Recompute area-weighted vertex normals.
        #[arg(short, long)]
        normals: bool,
    },

    /// Print statistics of an OBJ mesh or a checkpoint file.
    Inspect {
        /// Path to `.obj` mesh or checkpoint.
        path: PathBuf,
    },

    /// Validate a mesh or simulation config.
    Validate {
        /// Path to `.obj` mesh or `.toml` config.
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Simulate { config, events } => commands::simulate(&config, events.as_deref()),
        Commands::Convert {
            input,
            output,
            normals,
        } => commands::convert(&input, &output, normals),
        Commands::Inspect { path } => commands::inspect(&path),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
