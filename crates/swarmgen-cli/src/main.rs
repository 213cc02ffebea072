//! swarmgen CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use swarmgen_core::{
    Config, GenerationMode, Generator, OpenApiContext, SpecReference, extract,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swarmgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate a zipped Thorntail JAX-RS project from an OpenAPI spec
    Generate {
        /// Path or URL to the OpenAPI document (YAML or JSON)
        ///
        /// Can be a local file path or an HTTP/HTTPS URL
        /// Example: --spec path/to/beer-api.yaml
        /// Example: --spec https://example.com/openapi.json
        #[arg(long)]
        spec: Option<String>,
        /// Archive to write (default: <artifactId>.zip)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Which files to generate
        #[arg(long, value_enum)]
        mode: Option<GenerationMode>,
        /// Maven group id
        #[arg(long)]
        group_id: Option<String>,
        /// Maven artifact id
        #[arg(long)]
        artifact_id: Option<String>,
        /// Java base package (e.g. io.openapi.simple)
        #[arg(long)]
        base_package: Option<String>,
        /// Organization prefix used for derived identifiers (e.g. com.acme)
        #[arg(long)]
        organization: Option<String>,
        /// Render a pre-serialized generation model instead of extracting one
        #[arg(long)]
        model: Option<PathBuf>,
        /// Config file (default: $SWARMGEN_CONFIG, ./swarmgen.yaml, ~/.swarmgen/config.yaml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Fail on constructs that would otherwise become placeholders
        #[arg(long)]
        strict: bool,
    },
    /// Dump the generation model of an OpenAPI spec as JSON
    Extract {
        /// Path or URL to the OpenAPI document (YAML or JSON)
        #[arg(long)]
        spec: String,
        /// File to write (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Load the explicit or discovered config file, or defaults.
async fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => Config::discover(),
    };
    match path {
        Some(path) => {
            tracing::debug!("Using config file {}", path.display());
            Config::from_file(&path)
                .await
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            spec,
            output,
            mode,
            group_id,
            artifact_id,
            base_package,
            organization,
            model,
            config,
            strict,
        } => {
            let mut config = load_config(config.as_deref()).await?;

            // Flags win over file values
            if spec.is_some() {
                config.spec_location = spec;
            }
            if let Some(output) = output {
                config.output_path = Some(output.to_string_lossy().to_string());
            }
            if let Some(mode) = mode {
                config.mode = mode;
            }
            config.group_id = group_id.or(config.group_id);
            config.artifact_id = artifact_id.or(config.artifact_id);
            config.base_package = base_package.or(config.base_package);
            config.organization = organization.or(config.organization);
            if let Some(model) = model {
                config.model_path = Some(model.to_string_lossy().to_string());
            }
            config.strict |= strict;

            let spec_location = config
                .spec_location
                .clone()
                .context("No specification given: pass --spec or set spec_location in the config")?;

            let generator = Generator::from_config(config)
                .await
                .context("Failed to initialize generator")?;
            let config = generator.config();

            let output = generator
                .generate(&SpecReference::location(&spec_location), None, config.mode)
                .await
                .with_context(|| format!("Failed to generate project from {}", spec_location))?;

            for diagnostic in &output.diagnostics {
                eprintln!("warning: {}", diagnostic);
            }

            let archive_path = config
                .output_path
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(format!("{}.zip", output.settings.artifact_id)));
            output
                .write_to(&archive_path)
                .with_context(|| format!("Failed to write {}", archive_path.display()))?;

            println!(
                "✅ Generated {} files ({} mode) in: {}",
                output.files.len(),
                config.mode,
                archive_path.display()
            );
        }
        Commands::Extract { spec, output } => {
            let document = OpenApiContext::load(&SpecReference::location(&spec))
                .await
                .with_context(|| format!("Failed to load OpenAPI document {}", spec))?;
            let model = extract(&document).context("Failed to extract generation model")?;
            let json = model.to_json()?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, format!("{}\n", json))
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!(
                        "✅ Extracted {} resources and {} data types to: {}",
                        model.resources.len(),
                        model.data_types.len(),
                        path.display()
                    );
                }
                None => println!("{}", json),
            }
        }
    }
    Ok(())
}
