//! Command definitions and dispatch.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use trawl_application::{ExchangeSource, ExportOpenApi, ExportOpenApiInput, MergeDocuments};
use trawl_domain::{ExportFormat, ExportResult, GenerationOptions, SpecVersion};
use trawl_infrastructure::{
    DocumentFile, HarArchive, JsonRecordFile, SerdeDocumentSerializer, load_options, write_export,
};

#[derive(Debug, Parser)]
#[command(name = "trawl")]
#[command(about = "Generate OpenAPI documents from captured HTTP traffic")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a document from captured records
    Generate(GenerateArgs),
    /// Merge two documents; the first wins on conflicts
    Merge(MergeArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Record files (JSON arrays of records, or HAR archives)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Read every input as a HAR archive
    #[arg(long)]
    har: bool,
    /// Options file (JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    format: ExportFormat,
    /// Output file or directory; stdout when omitted
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Document title
    #[arg(long)]
    title: Option<String>,
    /// Document version
    #[arg(long = "api-version")]
    api_version: Option<String>,
    /// Fixed server URL ("auto" derives servers from the records)
    #[arg(long)]
    server_url: Option<String>,
    /// Leave examples out of the document
    #[arg(long)]
    no_examples: bool,
    /// Keep concrete paths instead of templating ids
    #[arg(long)]
    raw_paths: bool,
    /// Rendered version (openapi3 or swagger2)
    #[arg(long)]
    target: Option<SpecVersion>,
}

#[derive(Debug, Args)]
struct MergeArgs {
    /// Preferred document
    first: PathBuf,
    /// Document filling in what the first lacks
    second: PathBuf,
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    format: ExportFormat,
    /// Output file or directory; stdout when omitted
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// Runs the parsed command.
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Generate(args) => generate(args),
        Command::Merge(args) => merge(&args),
    }
}

fn generate(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = options(&args)?;
    let sources: Vec<Box<dyn ExchangeSource>> = args
        .inputs
        .iter()
        .map(|path| source(path, args.har))
        .collect();

    let use_case = ExportOpenApi::new(SerdeDocumentSerializer::new());
    let output = use_case.execute(
        &sources,
        &ExportOpenApiInput {
            options,
            format: args.format,
        },
    )?;

    if output.result.record_count == 0 {
        warn!("No records made it into the document");
    }
    emit(&output.result, args.out.as_deref())
}

fn merge(args: &MergeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let use_case = MergeDocuments::new(SerdeDocumentSerializer::new());
    let output = use_case.execute(
        &DocumentFile::new(&args.first),
        &DocumentFile::new(&args.second),
        args.format,
    )?;
    info!(paths = output.document.paths.len(), "Merged documents");
    emit(&output.result, args.out.as_deref())
}

/// Options file first, then flags on top.
fn options(args: &GenerateArgs) -> Result<GenerationOptions, Box<dyn std::error::Error>> {
    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => GenerationOptions::default(),
    };

    if let Some(title) = &args.title {
        options.title.clone_from(title);
    }
    if let Some(version) = &args.api_version {
        options.version.clone_from(version);
    }
    if let Some(url) = &args.server_url {
        options.server_url = Some(url.clone());
    }
    if args.no_examples {
        options.include_examples = false;
    }
    if args.raw_paths {
        options.parameterize_urls = false;
    }
    if let Some(target) = args.target {
        options.target = target;
    }
    Ok(options)
}

fn source(path: &Path, force_har: bool) -> Box<dyn ExchangeSource> {
    let is_har = force_har
        || path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("har"));
    if is_har {
        Box::new(HarArchive::new(path))
    } else {
        Box::new(JsonRecordFile::new(path))
    }
}

fn emit(result: &ExportResult, out: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    for warning in &result.warnings {
        warn!(
            source = warning.source.as_deref().unwrap_or("-"),
            severity = ?warning.severity,
            "{}",
            warning.message
        );
    }

    match out {
        Some(target) => {
            let path = write_export(result, target)?;
            info!(path = %path.display(), "Done");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(result.content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
