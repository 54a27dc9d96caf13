use crate::candidate::{PathTemplate, TemplateKind};
use crate::config::resolve_config;
use crate::edm::{load_model, parse_document, DocumentFormat, EdmModel};
use crate::error::{ModelError, ValidationIssue};
use crate::explorer::{ApiDescription, ApiExplorer};
use crate::generator::{CandidateSource, CustomRouteRegistry, EdmTemplateGenerator, TemplateOptions};
use crate::router::{load_controller_table, ControllerTable};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Command-line interface for the EDM route explorer
#[derive(Parser)]
#[command(name = "edm-explorer", version)]
#[command(about = "Discover and describe the routes an EDM service exposes", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify candidate routes and print the API descriptions
    Describe {
        /// Resource model document (YAML or JSON)
        #[arg(short, long)]
        model: PathBuf,

        /// Controller action table (YAML or JSON)
        #[arg(short, long)]
        controllers: PathBuf,

        /// Explorer configuration; auto-detected next to the model if omitted
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print every candidate template without verification
    Templates {
        #[arg(short, long)]
        model: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Validate a model document and, optionally, a controller table
    Validate {
        #[arg(short, long)]
        model: PathBuf,

        #[arg(short, long)]
        controllers: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Execute a parsed command, writing its output to `out`.
///
/// Returns `Ok(false)` when the command ran but found problems (validation
/// issues), so the caller can pick a non-zero exit code.
///
/// # Errors
///
/// Returns an error if a document cannot be read or parsed, or if
/// generation fails.
pub fn run_cli(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Describe {
            model,
            controllers,
            config,
            format,
        } => {
            let config = resolve_config(config.as_deref(), model)?;
            let edm = Arc::new(load_model(model)?);
            let table = load_controller_table(controllers)?;
            let explorer = ApiExplorer::from_documents(edm, &table, config)
                .context("failed to configure the explorer")?;
            let descriptions = explorer.generate().context("route discovery failed")?;
            match format {
                OutputFormat::Table => write_description_table(out, &descriptions)?,
                other => write_structured(out, *other, descriptions.as_slice())?,
            }
            Ok(true)
        }
        Commands::Templates {
            model,
            config,
            format,
        } => {
            let config = resolve_config(config.as_deref(), model)?;
            let edm = Arc::new(load_model(model)?);
            let mut candidates =
                EdmTemplateGenerator::new(Arc::clone(&edm), TemplateOptions::from(&config)).candidates()?;
            if !config.custom_routes.is_empty() {
                candidates.extend(
                    CustomRouteRegistry::new(
                        edm,
                        config.custom_routes.clone(),
                        &config.route_prefix,
                        &config.route_name,
                    )
                    .candidates()?,
                );
            }
            match format {
                OutputFormat::Table => write_template_table(out, &candidates)?,
                other => {
                    let rows: Vec<TemplateRow<'_>> = candidates.iter().map(TemplateRow::from).collect();
                    write_structured(out, *other, &rows)?;
                }
            }
            Ok(true)
        }
        Commands::Validate { model, controllers } => {
            let mut issues = validate_document::<EdmModel>(model, |m| m.validate())?;
            if let Some(path) = controllers {
                issues.extend(validate_document::<ControllerTable>(path, |t| t.validate())?);
            }
            if issues.is_empty() {
                writeln!(out, "No issues found")?;
                return Ok(true);
            }
            writeln!(out, "{} issue(s) found:", issues.len())?;
            for issue in &issues {
                writeln!(out, "  {issue}")?;
            }
            Ok(false)
        }
    }
}

fn validate_document<T>(
    path: &Path,
    validate: impl Fn(&T) -> Result<(), ModelError>,
) -> anyhow::Result<Vec<ValidationIssue>>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document: T = parse_document(&content, DocumentFormat::from_path(path))
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(validate(&document).err().map(|e| e.issues).unwrap_or_default())
}

#[derive(Serialize)]
struct TemplateRow<'a> {
    template: &'a str,
    group: &'a str,
    kind: TemplateKind,
    methods: Vec<&'a str>,
}

impl<'a> From<&'a PathTemplate> for TemplateRow<'a> {
    fn from(t: &'a PathTemplate) -> Self {
        Self {
            template: &t.template,
            group: &t.group,
            kind: t.kind,
            methods: t.methods().map(|m| m.as_str()).collect(),
        }
    }
}

fn write_structured<T: Serialize + ?Sized>(
    out: &mut dyn Write,
    format: OutputFormat,
    value: &T,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Yaml => write!(out, "{}", serde_yaml::to_string(value)?)?,
        _ => writeln!(out, "{}", serde_json::to_string_pretty(value)?)?,
    }
    Ok(())
}

fn write_description_table(out: &mut dyn Write, descriptions: &[ApiDescription]) -> anyhow::Result<()> {
    for d in descriptions {
        let params: Vec<String> = d
            .parameters
            .iter()
            .filter(|p| !p.name.starts_with('$'))
            .map(|p| format!("{}:{}", p.name, p.type_name))
            .collect();
        writeln!(
            out,
            "{:<7} {:<60} {:<28} [{}] -> {}",
            d.method.as_str(),
            d.relative_path,
            d.action.id(),
            params.join(", "),
            d.response.effective_type().unwrap_or("()")
        )?;
    }
    writeln!(out, "{} route(s)", descriptions.len())?;
    Ok(())
}

fn write_template_table(out: &mut dyn Write, candidates: &[PathTemplate]) -> anyhow::Result<()> {
    for t in candidates {
        let methods: Vec<&str> = t.methods().map(|m| m.as_str()).collect();
        writeln!(out, "{:<24} {:<60} {}", methods.join(","), t.template, t.group)?;
    }
    writeln!(out, "{} template(s)", candidates.len())?;
    Ok(())
}
