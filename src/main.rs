use anyhow::Result;
use clap::{Parser, Subcommand};
use factbook::config::{AppConfig, DEFAULT_CONFIG_FILE, load_config};
use factbook::dispatch::{FIELDS, ParseMode};
use factbook::inspect::{InspectOptions, run_inspection};
use factbook::pipeline::{FieldQuery, batch_field, extract_country_file, parse_country_field};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "factbook", about = "Structured data from World Factbook field text")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Parse {
        #[arg(long)]
        country: String,
        #[arg(long)]
        section: String,
        #[arg(long)]
        field: String,
        #[arg(long, default_value_t = false)]
        original: bool,
    },
    Country {
        #[arg(long)]
        country: String,
    },
    Batch {
        #[arg(long)]
        section: String,
        #[arg(long)]
        field: String,
        #[arg(long, default_value_t = false)]
        original: bool,
    },
    Inspect {
        #[arg(long)]
        section: String,
        #[arg(long)]
        field: String,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        countries: Option<String>,
    },
    Fields,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    init_tracing(&config)?;

    match cli.command {
        Commands::Parse {
            country,
            section,
            field,
            original,
        } => {
            let query = FieldQuery {
                section,
                field,
                mode: mode(original),
            };
            let result = parse_country_field(&config, &country, &query)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Country { country } => {
            let result = extract_country_file(&config, &country)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Batch {
            section,
            field,
            original,
        } => {
            let query = FieldQuery {
                section,
                field,
                mode: mode(original),
            };
            let results = batch_field(&config, &query)?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Inspect {
            section,
            field,
            limit,
            countries,
        } => {
            let mut options = InspectOptions::from_config(&config, &section, &field);
            if let Some(limit) = limit {
                options.sample_limit = limit;
            }
            if let Some(countries) = countries {
                options.country_glob = countries;
            }
            let report = run_inspection(&config, &options)?;
            for line in &report.lines {
                info!("{line}");
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Fields => {
            for spec in FIELDS {
                println!("{}\t{}\t{}", spec.section, spec.field, spec.shape.name());
            }
        }
    }

    Ok(())
}

fn mode(original: bool) -> ParseMode {
    if original {
        ParseMode::Original
    } else {
        ParseMode::Parsed
    }
}

fn init_tracing(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.filter.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    Ok(())
}
