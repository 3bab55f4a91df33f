use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use tle_ingest::config::AppConfig;
use tle_ingest::db::Database;
use tle_ingest::ingest::IngestCoordinator;
use tle_ingest::logging::{init_logging, OperationTimer};
use tle_ingest::models::FieldPolicy;
use tle_ingest::service::{load_manifest, IngestService};
use tle_ingest::tle::TleParser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file layered over config/default and config/local
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database path (overrides configuration and DATABASE_URL)
    #[arg(short, long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and its tables
    Init,
    /// Ingest every source listed in a manifest
    Ingest {
        /// CSV manifest with columns name,url[,file]
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Directory holding downloaded TLE files
        #[arg(short, long)]
        tle_dir: Option<PathBuf>,

        /// Reject records with malformed fields instead of zero-filling them
        #[arg(long)]
        strict: bool,

        /// Reject records whose line checksum does not match
        #[arg(long)]
        verify_checksum: bool,
    },
    /// Show row counts of the store
    Stats,
    /// Show the stored orbit history of one satellite
    History {
        /// SATCAT catalog number
        #[arg(short = 'n', long)]
        catalog_number: u32,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load_from(cli.config.as_deref())?;
    let database_url = cli.database.clone().unwrap_or_else(|| config.get_database_url());
    config.database.path = database_url;

    // Initialize logging; the guard flushes the log file on exit
    let _guard = init_logging(&config.logging)?;

    info!("Starting tle-ingest");

    // Initialize database with configuration
    let db = Database::with_config(&config.database)
        .with_context(|| format!("Failed to open database {}", config.database.path))?;

    // Process command
    match cli.command {
        Commands::Init => info!(path = %config.database.path, "Database initialized"),
        Commands::Ingest { manifest, tle_dir, strict, verify_checksum } => {
            if strict {
                config.parsing.field_policy = FieldPolicy::Strict.as_str().to_string();
            }
            config.parsing.verify_checksum |= verify_checksum;
            let manifest = manifest.unwrap_or_else(|| PathBuf::from(&config.sources.manifest_path));
            let tle_dir = tle_dir.unwrap_or_else(|| PathBuf::from(&config.sources.tle_directory));
            run_ingest(&config, db, &manifest, tle_dir).await?;
        }
        Commands::Stats => show_stats(&db)?,
        Commands::History { catalog_number, json } => show_history(&db, catalog_number, json)?,
    }

    Ok(())
}

async fn run_ingest(config: &AppConfig, db: Database, manifest: &Path, tle_dir: PathBuf) -> Result<()> {
    let timer = OperationTimer::new("ingest_run");

    let manifest = load_manifest(manifest)
        .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;
    let entries = manifest.entries;
    let parser = TleParser::new(config.parse_options()?)?;
    let coordinator = IngestCoordinator::new(db, parser, config.central_body()?);
    let service = IngestService::new(coordinator, tle_dir);

    let summary = service.run(&entries).await;
    let totals = summary.totals();
    timer.finish();

    println!(
        "Sources: {} ingested, {} unchanged, {} failed; {} orbit snapshots written",
        totals.ingested, totals.unchanged, totals.failed, totals.orbits_inserted
    );

    for (name, err) in summary.failures() {
        error!(constellation = name, error = %err, "Failed source");
    }
    for row in &manifest.invalid_rows {
        error!(line = row.line, error = %row.error, "Invalid manifest row");
    }

    let invalid_rows = manifest.invalid_rows.len();
    if totals.failed > 0 || invalid_rows > 0 {
        return Err(anyhow::anyhow!(
            "{} of {} sources failed, {} manifest rows unreadable",
            totals.failed,
            entries.len(),
            invalid_rows
        ));
    }

    Ok(())
}

fn show_stats(db: &Database) -> Result<()> {
    let stats = db.get_stats()?;
    println!("Constellations: {}", stats.constellations);
    println!("Satellites:     {}", stats.satellites);
    println!("Orbits:         {}", stats.orbits);
    println!("Source files:   {}", stats.source_files);
    Ok(())
}

fn show_history(db: &Database, catalog_number: u32, json: bool) -> Result<()> {
    let Some(satellite) = db.get_satellite(catalog_number)? else {
        return Err(anyhow::anyhow!("Satellite not found: {}", catalog_number));
    };
    let history = db.get_orbit_history(catalog_number)?;
    info!(catalog_number, snapshots = history.len(), "Loaded orbit history");

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    println!("Satellite {} (constellation {})", satellite.catalog_number, satellite.constellation_id);
    println!("{:<26} {:>10} {:>10} {:>12} {:>10}", "epoch", "incl_deg", "raan_deg", "altitude_km", "period_s");
    for orbit in history {
        println!(
            "{:<26} {:>10.4} {:>10.4} {:>12.2} {:>10.2}",
            orbit.epoch.format("%Y-%m-%d %H:%M:%S%.3f"),
            orbit.inclination_deg,
            orbit.raan_deg,
            orbit.altitude_km,
            orbit.period_s
        );
    }
    Ok(())
}
