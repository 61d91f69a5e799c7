// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Regenerate the fixture crate's checked-in direct-call shims.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::workspace_root;

const DEFAULT_OUTPUT: &str = "libs/pipevet-testpipeline/src/generated_shims.rs";

pub fn run(output: Option<PathBuf>, check: bool) -> Result<()> {
    let output = match output {
        Some(path) => path,
        None => workspace_root()?.join(DEFAULT_OUTPUT),
    };

    let code = pipevet_testpipeline::generate_code(pipevet_testpipeline::PACKAGE)
        .context("Failed to generate fixture shims")?;

    if check {
        return check_current(&output, &code);
    }

    pipevet::write_output(&output, &code)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn check_current(output: &Path, code: &str) -> Result<()> {
    let existing = fs::read_to_string(output)
        .with_context(|| format!("Failed to read {}", output.display()))?;
    if existing != code {
        anyhow::bail!(
            "{} is stale; run `cargo xtask generate-shims`",
            output.display()
        );
    }
    println!("{} is up to date", output.display());
    Ok(())
}
