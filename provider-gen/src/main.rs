//! Provider Code Generator
//!
//! Generates provider scaffolds and model capability registries from the
//! models.dev catalog.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use provider_gen::errors::GeneratorError;
use provider_gen::pipeline::{
    DEFAULT_PROVIDERS_DIR, GenerationMode, GenerationOptions, GenerationSummary, ProviderSelector,
    run,
};
use provider_gen::project::find_project_root;
use provider_gen::source::{
    CatalogSource, DEFAULT_CATALOG_API_URL, DEFAULT_CATALOG_GIT_URL, materialize,
};
use tracing::{error, info};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Provider code generator - turns the models.dev catalog into Rust provider modules
#[derive(Parser, Debug)]
#[command(name = "provider-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Report what would be written without touching any file
    #[arg(long, global = true)]
    dry_run: bool,

    /// Run rustfmt over the written files
    #[arg(long, global = true)]
    format: bool,

    /// Project root [default: nearest ancestor containing Cargo.toml]
    #[arg(long, value_name = "DIR", global = true)]
    output_root: Option<PathBuf>,

    /// Provider module directory, relative to the project root
    #[arg(long, value_name = "DIR", default_value = DEFAULT_PROVIDERS_DIR, global = true)]
    providers_dir: PathBuf,

    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Where the catalog comes from. Defaults to the models.dev API.
#[derive(Args, Debug)]
#[group(multiple = false)]
struct SourceArgs {
    /// Read a local catalog directory or JSON document
    #[arg(long, value_name = "PATH")]
    catalog_dir: Option<PathBuf>,

    /// Shallow-clone the catalog repository
    #[arg(
        long,
        value_name = "URL",
        num_args = 0..=1,
        default_missing_value = DEFAULT_CATALOG_GIT_URL
    )]
    catalog_git: Option<String>,

    /// Fetch the catalog JSON document
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
}

impl SourceArgs {
    fn into_source(self) -> CatalogSource {
        if let Some(path) = self.catalog_dir {
            CatalogSource::Local(path)
        } else if let Some(url) = self.catalog_git {
            CatalogSource::Git { url }
        } else {
            CatalogSource::Api {
                url: self.api_url.unwrap_or_else(|| DEFAULT_CATALOG_API_URL.to_string()),
            }
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate capabilities.rs for one provider or all providers
    Capabilities {
        /// Provider id (e.g. "openai", "deepseek"); omit for all providers
        #[arg(value_name = "PROVIDER", conflicts_with = "all")]
        provider: Option<String>,

        /// Generate for every provider in the catalog
        #[arg(long)]
        all: bool,

        /// Catalog folder to read when it differs from the provider id
        #[arg(long, value_name = "NAME", requires = "provider")]
        folder: Option<String>,

        /// Provider struct name to import in the registry (e.g. "DeepSeek")
        #[arg(long, value_name = "NAME", requires = "provider")]
        struct_name: Option<String>,
    },

    /// Generate mod.rs for OpenAI-compatible providers
    OpenaiCompatible {
        /// Provider id (e.g. "deepseek"); omit for all compatible providers
        #[arg(value_name = "PROVIDER", conflicts_with = "all")]
        provider: Option<String>,

        /// Generate for every OpenAI-compatible provider in the catalog
        #[arg(long)]
        all: bool,

        /// Also generate capabilities.rs
        #[arg(short = 'c', long)]
        with_capabilities: bool,
    },
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,provider_gen=info".to_string(),
            2 => "info,provider_gen=debug".to_string(),
            _ => "debug,provider_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

fn provider_selector(provider: Option<String>, all: bool) -> ProviderSelector {
    match provider {
        Some(id) if !all => ProviderSelector::One(id),
        _ => ProviderSelector::All,
    }
}

async fn execute(cli: Cli) -> Result<GenerationSummary, GeneratorError> {
    let output_root = match cli.output_root {
        Some(root) => root,
        None => {
            let cwd = std::env::current_dir().map_err(|source| GeneratorError::Io {
                path: PathBuf::from("."),
                source,
            })?;
            find_project_root(&cwd)?
        }
    };

    let mut options = GenerationOptions::new(output_root);
    options.providers_dir = cli.providers_dir;
    options.dry_run = cli.dry_run;
    options.format = cli.format;

    let (selector, mode) = match cli.command {
        Commands::Capabilities {
            provider,
            all,
            folder,
            struct_name,
        } => {
            options.folder = folder;
            options.struct_name = struct_name;
            (provider_selector(provider, all), GenerationMode::Capabilities)
        }
        Commands::OpenaiCompatible {
            provider,
            all,
            with_capabilities,
        } => {
            options.with_capabilities = with_capabilities;
            (provider_selector(provider, all), GenerationMode::OpenAiCompatible)
        }
    };

    info!("Output root: {}", options.output_root.display());
    if options.dry_run {
        info!("Dry run mode - no files will be written");
    }

    // The clone, if any, lives until the run finishes.
    let materialized = materialize(&cli.source.into_source()).await?;
    if let Some(checkout) = materialized.checkout_path() {
        info!("Catalog checkout: {}", checkout.display());
    }
    run(materialized.catalog(), &selector, mode, &options)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    match execute(cli).await {
        Ok(summary) => {
            summary.print();
            if summary.has_failures() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
