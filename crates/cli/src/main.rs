use anyhow::{Context, Result};
use cabinet_core::config::Config;
use cabinet_core::fetch::SparqlClient;
use cabinet_core::query::{self, ResponseFormat};
use cabinet_core::db::Record;
use cabinet_core::{db, mapper, Membership, Position};
use serde::Serialize;
use clap::{Parser, Subcommand};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cabinet")]
#[command(about = "Wikidata cabinet membership scraper", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides config)
    #[arg(long, global = true)]
    database: Option<String>,

    /// Table to write (overrides config)
    #[arg(long, global = true)]
    table: Option<String>,

    /// Response format requested from the endpoint: json or csv
    #[arg(long, global = true)]
    format: Option<ResponseFormat>,

    /// Verbose logging and print every mapped record
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Holders of positions under a cabinet position class
    Cabinet {
        /// Position class QID, e.g. Q1939555
        position: String,

        /// Jurisdiction QID (defaults to the position)
        #[arg(long)]
        jurisdiction: Option<String>,

        /// Unique key column; repeat for a compound key
        #[arg(long = "key", default_value = "id")]
        keys: Vec<String>,
    },
    /// All positions held by the given people
    People {
        /// Person QIDs
        people: Vec<String>,

        /// File with one person QID per line
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
    /// Print the stored table as JSON lines
    Show {
        /// The table was written by a `people` run
        #[arg(long)]
        people: bool,
    },
    /// Export canonical JSON Schemas
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Export JSON Schema files for canonical types
    Export {
        /// Output directory (default: ./schemas)
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut config = Config::load(cli.config.as_deref()).context("loading config")?;
    if let Some(database) = cli.database {
        config.database = database;
    }
    if let Some(table) = cli.table {
        config.table = table;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Cabinet {
            position,
            jurisdiction,
            keys,
        } => run_cabinet(&config, &position, jurisdiction.as_deref(), &keys, cli.debug),
        Commands::People { people, from_file } => {
            run_people(&config, people, from_file.as_deref(), cli.debug)
        }
        Commands::Show { people } => {
            if people {
                show::<Position>(&config)
            } else {
                show::<Membership>(&config)
            }
        }
        Commands::Schema { command } => match command {
            SchemaCommands::Export { out_dir } => schema_export(out_dir),
        },
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run_cabinet(
    config: &Config,
    position: &str,
    jurisdiction: Option<&str>,
    keys: &[String],
    debug: bool,
) -> Result<()> {
    let sparql = query::cabinet_query(position, jurisdiction)?;
    let client = SparqlClient::from_config(config)?;
    let rows = client.fetch(&sparql, config.format)?;
    info!(position, rows = rows.len(), "fetched cabinet memberships");

    let memberships = mapper::map_rows(&rows);
    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
    save(config, &keys, &memberships, debug)
}

fn run_people(
    config: &Config,
    mut people: Vec<String>,
    from_file: Option<&Path>,
    debug: bool,
) -> Result<()> {
    if let Some(path) = from_file {
        let listing = fs::read_to_string(path)
            .with_context(|| format!("reading people from {}", path.display()))?;
        people.extend(
            listing
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    anyhow::ensure!(!people.is_empty(), "no people given");

    let client = SparqlClient::from_config(config)?;
    let mut positions = Vec::new();
    for wanted in people.chunks(config.batch_size) {
        let wanted: Vec<&str> = wanted.iter().map(String::as_str).collect();
        let sparql = query::people_query(&wanted)?;
        let rows = client.fetch(&sparql, config.format)?;
        debug!(people = wanted.len(), rows = rows.len(), "fetched batch");
        positions.extend(mapper::map_position_rows(&rows));
    }
    info!(people = people.len(), positions = positions.len(), "fetched positions");

    save(config, &["id", "position", "start_date"], &positions, debug)
}

fn save<R: Record + Serialize>(
    config: &Config,
    keys: &[&str],
    records: &[R],
    debug: bool,
) -> Result<()> {
    if debug {
        for r in records {
            println!("{}", serde_json::to_string(r)?);
        }
    }
    let mut conn = db::open(&config.database)
        .with_context(|| format!("opening {}", config.database))?;
    db::replace_table(&mut conn, &config.table, keys, records)?;
    Ok(())
}

fn show<R: Record + Serialize>(config: &Config) -> Result<()> {
    let conn = db::open(&config.database)
        .with_context(|| format!("opening {}", config.database))?;
    for r in db::load_table::<R>(&conn, &config.table)? {
        println!("{}", serde_json::to_string(&r)?);
    }
    Ok(())
}

fn schema_export(out_dir: PathBuf) -> Result<()> {
    fs::create_dir_all(&out_dir)?;

    let membership_schema = schema_for!(Membership);
    let membership_json = serde_json::to_string_pretty(&membership_schema)?;
    fs::write(out_dir.join("Membership.schema.json"), membership_json)?;

    let position_schema = schema_for!(Position);
    let position_json = serde_json::to_string_pretty(&position_schema)?;
    fs::write(out_dir.join("Position.schema.json"), position_json)?;

    println!("Exported schemas to {}", out_dir.display());
    Ok(())
}
