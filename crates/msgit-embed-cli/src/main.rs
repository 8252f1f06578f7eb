//! msgit-embed CLI - round-trip, inspect and verify embedding container files

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use msgit_embed_cli::commands;
use msgit_embed_cli::commands::roundtrip::{DEFAULT_EXTENSION, DEFAULT_OUT_DIR};

/// msgit-embed - MSGit embedding container tool
#[derive(Parser)]
#[command(name = "msgit-embed")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a container, re-encode it, decode the copy and verify it
    Roundtrip {
        /// Path to the input container file
        input: String,

        /// Directory for the re-encoded file
        #[arg(long, default_value = DEFAULT_OUT_DIR)]
        out_dir: String,

        /// Extension of the re-encoded file
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the header and first record summary of a container file
    Inspect {
        /// Path to the container file
        input: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Decode two container files and list every difference between them
    Verify {
        /// Path to the reference file
        a: String,

        /// Path to the file compared against the reference
        b: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Roundtrip {
            input,
            out_dir,
            extension,
            json,
        } => commands::roundtrip::run(&input, &out_dir, &extension, json),
        Commands::Inspect { input, json } => commands::inspect::run(&input, json),
        Commands::Verify { a, b, json } => commands::verify::run(&a, &b, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
