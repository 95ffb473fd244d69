use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use thumbprint::config::Config;
use thumbprint::digest::HashAlgorithm;
use thumbprint::error::ThumbprintError;
use thumbprint::output::OutputFormat;
use thumbprint::{StampRunOptions, VerifyOptions};

#[derive(Parser)]
#[command(
    name = "thumbprint",
    about = "Source-integrity thumbprints for compiled templates",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify recorded thumbprints against the current sources
    Verify {
        /// Path to the template tree
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Manifest file path
        #[arg(long, short = 'm')]
        manifest: Option<PathBuf>,

        /// Output format (console, json, sarif)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Fail items that carry no thumbprints
        #[arg(long)]
        strict: bool,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Record thumbprints for every template and write the manifest
    Stamp {
        /// Path to the template tree
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Manifest file path
        #[arg(long, short = 'm')]
        manifest: Option<PathBuf>,

        /// Hash algorithm (sha256, sha384, sha512, blake3)
        #[arg(long, short = 'a', env = "THUMBPRINT_ALGORITHM")]
        algorithm: Option<String>,
    },

    /// List supported hash algorithms
    ListAlgorithms {
        /// Output format (table, json)
        #[arg(long, short = 'f', default_value = "table")]
        format: String,
    },

    /// Generate a starter .thumbprint.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Verify {
            path,
            config,
            manifest,
            format,
            strict,
            output,
        } => cmd_verify(path, config, manifest, format, strict, output),
        Commands::Stamp {
            path,
            config,
            manifest,
            algorithm,
        } => cmd_stamp(path, config, manifest, algorithm),
        Commands::ListAlgorithms { format } => cmd_list_algorithms(format),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn cmd_verify(
    path: PathBuf,
    config: Option<PathBuf>,
    manifest: Option<PathBuf>,
    format_str: String,
    strict: bool,
    output_path: Option<PathBuf>,
) -> Result<i32, ThumbprintError> {
    let format = OutputFormat::from_str_lenient(&format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    });

    let options = VerifyOptions {
        config_path: config,
        manifest_path: manifest,
        strict,
    };

    let report = thumbprint::verify(&path, &options)?;
    let rendered = thumbprint::render_report(&report, format)?;

    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    // Exit code: 0 = pass, 1 = stale or tampered sources
    Ok(if report.verdict.pass { 0 } else { 1 })
}

fn cmd_stamp(
    path: PathBuf,
    config: Option<PathBuf>,
    manifest: Option<PathBuf>,
    algorithm: Option<String>,
) -> Result<i32, ThumbprintError> {
    let options = StampRunOptions {
        config_path: config,
        manifest_path: manifest,
        algorithm,
    };

    let (registry, manifest_path) = thumbprint::stamp(&path, &options)?;
    println!(
        "Stamped {} item(s) into {}",
        registry.len(),
        manifest_path.display()
    );

    Ok(0)
}

fn cmd_list_algorithms(format_str: String) -> Result<i32, ThumbprintError> {
    match format_str.as_str() {
        "json" => {
            let names: Vec<&str> = HashAlgorithm::ALL.iter().map(|a| a.name()).collect();
            let json = serde_json::to_string_pretty(&names)?;
            println!("{}", json);
        }
        _ => {
            println!("{:<10} DIGEST BYTES", "NAME");
            println!("{}", "-".repeat(24));
            for algorithm in HashAlgorithm::ALL {
                println!("{:<10} {}", algorithm.name(), algorithm.output_len());
            }
        }
    }

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, ThumbprintError> {
    let path = PathBuf::from(".thumbprint.toml");

    if path.exists() && !force {
        eprintln!(".thumbprint.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .thumbprint.toml");

    Ok(0)
}
