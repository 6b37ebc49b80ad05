use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tsconfig_types_core::{parse, print, transform, InjectedProperty, PipelineOptions, SourceFile};

#[derive(Parser)]
#[command(name = "tsconfig-types")]
#[command(about = "Clean up TypeScript declarations generated from the tsconfig JSON Schema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the rewrite pipeline over a generated declaration file
    Transform {
        /// Input declaration file
        input: PathBuf,

        /// Output declaration file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON config file with pipeline options (kebab-case keys)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Name given to the root type alias
        #[arg(long)]
        root_name: Option<String>,

        /// Alias to treat as the root (defaults to the first type alias)
        #[arg(long)]
        root_alias: Option<String>,

        /// Inject an optional string-literal property, as Interface.property=literal
        #[arg(long, value_parser = parse_injected_property)]
        inject_property: Option<InjectedProperty>,

        /// Turn every union under the root alias into an intersection
        #[arg(long)]
        merge_root_unions: bool,
    },

    /// Print the syntax tree of a declaration file as JSON
    Inspect {
        /// Input declaration file
        input: PathBuf,

        /// Output JSON file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show the tree after the default pipeline has run
        #[arg(long)]
        transformed: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

fn parse_injected_property(spec: &str) -> Result<InjectedProperty, String> {
    InjectedProperty::parse_spec(spec)
        .ok_or_else(|| format!("expected Interface.property=literal, got `{spec}`"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the declarations
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Transform {
            input,
            output,
            config,
            root_name,
            root_alias,
            inject_property,
            merge_root_unions,
        } => {
            let mut options = match &config {
                Some(path) => load_options(path)?,
                None => PipelineOptions::default(),
            };
            // Flags override the config file
            if let Some(name) = root_name {
                options.root_name = name;
            }
            if root_alias.is_some() {
                options.root_alias = root_alias;
            }
            if inject_property.is_some() {
                options.inject_property = inject_property;
            }
            if merge_root_unions {
                options.merge_root_unions = true;
            }

            let file = read_declarations(&input)?;
            let result = transform(&file, &options)
                .map_err(|e| anyhow::Error::from(e).context("Transform failed"))?;

            write_text(&print(&result), output.as_ref())?;
        }
        Commands::Inspect {
            input,
            output,
            transformed,
            format,
        } => {
            let mut file = read_declarations(&input)?;
            if transformed {
                file = transform(&file, &PipelineOptions::default())
                    .map_err(|e| anyhow::Error::from(e).context("Transform failed"))?;
            }

            write_json(&file, output.as_ref(), format)?;
        }
    }

    Ok(())
}

fn load_options(path: &Path) -> Result<PipelineOptions> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to open config file: {}", path.display()))?;
    PipelineOptions::from_json(&json)
        .with_context(|| format!("Failed to parse config from: {}", path.display()))
}

fn read_declarations(path: &Path) -> Result<SourceFile> {
    let src = fs::read_to_string(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let file = parse(&src)
        .with_context(|| format!("Failed to parse declarations from: {}", path.display()))?;
    tracing::debug!(statements = file.statements.len(), "parsed {}", path.display());
    Ok(file)
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };
    Ok(writer)
}

fn write_text(text: &str, path: Option<&PathBuf>) -> Result<()> {
    let mut writer = open_output(path)?;
    writer
        .write_all(text.as_bytes())
        .context("Failed to write declarations")?;
    writer.flush().context("Failed to flush output")?;
    Ok(())
}

fn write_json<T: serde::Serialize>(
    val: &T,
    path: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut writer = open_output(path)?;

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
