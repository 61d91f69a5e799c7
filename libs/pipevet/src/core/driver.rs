// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Build-time driver: template data, the generator program, and the entry
//! points that generator binaries call.
//!
//! A build rule runs `pipevet --output main.rs --template_json '{..}'` to get
//! a generator program, compiles it against the crate that defines the
//! pipeline, and runs it to produce that crate's shim module.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, VetError};
use crate::core::graph::Pipeline;
use crate::core::registry::PipelineRegistry;
use crate::core::shim::GENERATED_HEADER;
use crate::core::vet::evaluate;

/// Parameters of one generator program, passed as `--template_json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateData {
    /// Rust path of the module defining the pipeline constructor.
    pub pipeline_import_path: String,
    /// Name of the constructor function in that module.
    pub construct_pipeline: String,
    /// Crate the generated shims are compiled into.
    #[serde(rename = "go_package", alias = "package")]
    pub package: String,
}

impl TemplateData {
    pub fn from_json(json: &str) -> Result<Self> {
        let data: TemplateData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<()> {
        if self.construct_pipeline.is_empty() {
            return Err(bad_template("construct_pipeline is empty"));
        }
        if self.pipeline_import_path.is_empty() {
            return Err(bad_template("pipeline_import_path is empty"));
        }
        if self.package.is_empty() {
            return Err(bad_template("go_package is empty"));
        }
        if !is_identifier(&self.construct_pipeline) {
            return Err(bad_template(&format!(
                "construct_pipeline '{}' is not an identifier",
                self.construct_pipeline
            )));
        }
        if !self.pipeline_import_path.split("::").all(is_identifier) {
            return Err(bad_template(&format!(
                "pipeline_import_path '{}' is not a Rust path",
                self.pipeline_import_path
            )));
        }
        if !is_identifier(&self.package.replace('-', "_")) {
            return Err(bad_template(&format!(
                "go_package '{}' is not a crate name",
                self.package
            )));
        }
        Ok(())
    }
}

fn bad_template(problem: &str) -> VetError {
    VetError::Configuration(format!("{problem} - bad --template_json argument"))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && text != "_"
}

/// Source of a generator program's `main.rs` for `data`.
pub fn render_generator_program(data: &TemplateData) -> Result<String> {
    data.validate()?;
    Ok(format!(
        r#"{GENERATED_HEADER}
//
// Generator program for {import_path}::{construct}. Run it with
// `--output <path>` to write the direct-call shims for crate `{package}`.

fn main() -> ::std::result::Result<(), ::pipevet::anyhow::Error> {{
    ::pipevet::generator_main({package:?}, {import_path}::{construct})
}}
"#,
        import_path = data.pipeline_import_path,
        construct = data.construct_pipeline,
        package = data.package,
    ))
}

/// Construct a pipeline, evaluate it against the global tables, and
/// generate the shim module for `package`.
pub fn generate_code<F>(construct: F, package: &str) -> Result<String>
where
    F: FnOnce() -> anyhow::Result<Pipeline>,
{
    let pipeline = construct().map_err(|source| VetError::Construction {
        context: std::any::type_name::<F>().to_string(),
        source,
    })?;
    evaluate(&pipeline)?.generate_to_string(package)
}

/// Like [`generate_code`], with the constructor looked up in `registry` by
/// `data.pipeline_import_path`.
pub fn generate_from_registry(registry: &PipelineRegistry, data: &TemplateData) -> Result<String> {
    data.validate()?;
    let registered =
        registry
            .find(&data.pipeline_import_path)
            .ok_or_else(|| VetError::UnknownPipeline {
                import_path: data.pipeline_import_path.clone(),
            })?;
    let pipeline = registered.pipeline()?;
    evaluate(&pipeline)?.generate_to_string(&data.package)
}

/// Write `text` to `path` through a temporary file in the same directory,
/// so an interrupted run never leaves partial output behind.
pub fn write_output(path: &Path, text: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(text.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))?;
    }

    tracing::info!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// Install the stderr log subscriber used by all pipevet binaries.
/// `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(about = "Write direct-call shims for one pipeline")]
struct GeneratorArgs {
    /// Output .rs file with code that makes the pipeline performant
    #[arg(long)]
    output: PathBuf,
}

#[derive(Parser, Debug)]
#[command(about = "Write direct-call shims for a registered pipeline")]
struct RegistryArgs {
    /// Output .rs file with code that makes the pipeline performant
    #[arg(long)]
    output: PathBuf,

    /// Template data as JSON
    #[arg(long = "template_json")]
    template_json: String,
}

fn require_output(output: &Path) -> anyhow::Result<()> {
    if output.as_os_str().is_empty() {
        anyhow::bail!("must specify --output");
    }
    Ok(())
}

/// Entry point of a generated generator program.
pub fn generator_main<F>(package: &str, construct: F) -> anyhow::Result<()>
where
    F: FnOnce() -> anyhow::Result<Pipeline>,
{
    init_logging();
    let args = GeneratorArgs::parse();
    require_output(&args.output)?;

    let code = generate_code(construct, package).context("error generating code")?;
    write_output(&args.output, &code)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}

/// Entry point of a hand-written generator binary that serves every
/// pipeline in `registry`.
pub fn registry_main(registry: PipelineRegistry) -> anyhow::Result<()> {
    init_logging();
    let args = RegistryArgs::parse();
    require_output(&args.output)?;
    if args.template_json.is_empty() {
        anyhow::bail!("must specify --template_json");
    }

    let data = TemplateData::from_json(&args.template_json)
        .context("failed to parse template JSON")?;
    let code = generate_from_registry(&registry, &data).context("error generating code")?;
    write_output(&args.output, &code)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> TemplateData {
        TemplateData {
            pipeline_import_path: "app::pipelines".to_string(),
            construct_pipeline: "construct_pipeline".to_string(),
            package: "app".to_string(),
        }
    }

    #[test]
    fn test_from_json_accepts_both_package_keys() {
        let a = TemplateData::from_json(
            r#"{"pipeline_import_path":"app::pipelines","construct_pipeline":"construct_pipeline","go_package":"app"}"#,
        )
        .unwrap();
        let b = TemplateData::from_json(
            r#"{"pipeline_import_path":"app::pipelines","construct_pipeline":"construct_pipeline","package":"app"}"#,
        )
        .unwrap();
        assert_eq!(a, data());
        assert_eq!(b, data());
    }

    #[test]
    fn test_validation_order() {
        let err = TemplateData::from_json("{}").unwrap_err();
        assert!(err.to_string().contains("construct_pipeline is empty"));

        let err = TemplateData::from_json(r#"{"construct_pipeline":"build"}"#).unwrap_err();
        assert!(err.to_string().contains("pipeline_import_path is empty"));

        let err = TemplateData::from_json(
            r#"{"construct_pipeline":"build","pipeline_import_path":"app"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("go_package is empty"));
    }

    #[test]
    fn test_rejects_malformed_fields() {
        let mut bad = data();
        bad.pipeline_import_path = "app/pipelines".to_string();
        assert!(matches!(bad.validate(), Err(VetError::Configuration(_))));

        let mut bad = data();
        bad.construct_pipeline = "app::build".to_string();
        assert!(bad.validate().is_err());

        let mut ok = data();
        ok.package = "my-app".to_string();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            TemplateData::from_json("not json"),
            Err(VetError::Json(_))
        ));
    }

    #[test]
    fn test_render_generator_program() {
        let program = render_generator_program(&data()).unwrap();
        assert!(program.starts_with(GENERATED_HEADER));
        assert!(program.contains(
            "::pipevet::generator_main(\"app\", app::pipelines::construct_pipeline)"
        ));
        assert!(program.contains("fn main()"));
    }

    #[test]
    fn test_generate_code_wraps_construction_errors() {
        let err = generate_code(|| anyhow::bail!("boom"), "app").unwrap_err();
        assert!(matches!(err, VetError::Construction { .. }));
        assert!(err.to_string().contains("pipeline construction for code generator failed"));
    }

    #[test]
    fn test_generate_from_registry_unknown_path() {
        let registry = PipelineRegistry::new();
        let err = generate_from_registry(&registry, &data()).unwrap_err();
        assert!(matches!(err, VetError::UnknownPipeline { .. }));
    }

    #[test]
    fn test_generate_from_registry_empty_pipeline() {
        let mut registry = PipelineRegistry::new();
        registry.register("app::pipelines", || Ok(Pipeline::new()));
        let code = generate_from_registry(&registry, &data()).unwrap();
        assert!(code.contains("// shims: 0"));
    }

    #[test]
    fn test_write_output_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shims.rs");
        std::fs::write(&path, "old").unwrap();

        write_output(&path, "new contents").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new contents");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_output_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("shims.rs");
        assert!(matches!(write_output(&path, "x"), Err(VetError::Io(_))));
        assert!(!path.exists());
    }
}
