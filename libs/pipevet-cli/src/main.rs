// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! pipevet CLI
//!
//! Build-rule helper: renders the generator program for one pipeline. The
//! rule compiles that program against the pipeline's crate and runs it to
//! produce the crate's direct-call shims.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "pipevet")]
#[command(author, version, about = "Render a pipevet shim generator program", long_about = None)]
struct Cli {
    /// Output .rs file for the generator program
    #[arg(long, value_name = "PATH")]
    output: PathBuf,

    /// Template data as JSON: {"pipeline_import_path", "construct_pipeline", "go_package"}
    #[arg(long = "template_json", value_name = "JSON")]
    template_json: String,
}

fn main() -> Result<()> {
    pipevet::init_logging();
    let cli = Cli::parse();
    run(cli).context("error generating code")
}

fn run(cli: Cli) -> Result<()> {
    if cli.output.as_os_str().is_empty() {
        anyhow::bail!("must specify --output");
    }
    if cli.template_json.is_empty() {
        anyhow::bail!("must specify --template_json");
    }

    let data = pipevet::TemplateData::from_json(&cli.template_json)
        .context("failed to parse template JSON")?;
    tracing::debug!(
        "Rendering generator for {}::{} (crate '{}')",
        data.pipeline_import_path,
        data.construct_pipeline,
        data.package
    );

    let program = pipevet::render_generator_program(&data)?;
    pipevet::write_output(&cli.output, &program)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(output: PathBuf, template_json: &str) -> Cli {
        Cli {
            output,
            template_json: template_json.to_string(),
        }
    }

    #[test]
    fn test_writes_generator_program() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("main.rs");
        run(cli(
            output.clone(),
            r#"{"pipeline_import_path":"app::pipelines","construct_pipeline":"construct_pipeline","go_package":"app"}"#,
        ))
        .unwrap();

        let program = std::fs::read_to_string(output).unwrap();
        assert!(program.contains("app::pipelines::construct_pipeline"));
    }

    #[test]
    fn test_missing_flags() {
        let err = run(cli(PathBuf::new(), "{}")).unwrap_err();
        assert_eq!(err.to_string(), "must specify --output");

        let err = run(cli(PathBuf::from("main.rs"), "")).unwrap_err();
        assert_eq!(err.to_string(), "must specify --template_json");
    }

    #[test]
    fn test_bad_template_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("main.rs");
        let err = run(cli(output.clone(), r#"{"construct_pipeline":"build"}"#)).unwrap_err();
        assert!(format!("{err:#}").contains("pipeline_import_path is empty"));
        assert!(!output.exists());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
