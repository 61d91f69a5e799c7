// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Build tasks for pipevet development.
//!
//! Usage:
//!   cargo xtask generate-shims
//!   cargo xtask generate-shims --check

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod generate_shims;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "pipevet development tasks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the fixture crate's generated_shims.rs
    GenerateShims {
        /// Output file (default: libs/pipevet-testpipeline/src/generated_shims.rs)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Fail instead of writing when the file is out of date
        #[arg(long)]
        check: bool,
    },
}

fn main() -> Result<()> {
    pipevet::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::GenerateShims { output, check } => generate_shims::run(output, check)?,
    }

    Ok(())
}

/// Get the workspace root directory.
pub fn workspace_root() -> Result<PathBuf> {
    let output = std::process::Command::new("cargo")
        .args(["locate-project", "--workspace", "--message-format=plain"])
        .output()
        .context("Failed to run cargo locate-project")?;

    let path = String::from_utf8(output.stdout)
        .context("Invalid UTF-8 in cargo output")?
        .trim()
        .to_string();

    PathBuf::from(path)
        .parent()
        .map(|p| p.to_path_buf())
        .context("Failed to get workspace root")
}
