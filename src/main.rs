use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tracing::Level;

use tripdiary::{Diary, DiaryConfig, config::DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "tripdiary")]
#[command(about = "Inspect a trip diary file and its offline place lookup")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: Utf8PathBuf,

    /// Diary file to use instead of the configured one
    #[arg(short, long)]
    data_file: Option<Utf8PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Name the place nearest to a coordinate
    Locate {
        #[arg(allow_hyphen_values = true)]
        latitude: f64,
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
    },
    /// Load the diary and report what was recovered
    Check,
    /// Print the loaded diary as JSON
    Export,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let mut config = DiaryConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load configuration: {}", args.config))?;
    if let Some(data_file) = args.data_file {
        config.data_file = data_file;
    }

    let diary = Diary::open(&config);

    match args.command {
        Command::Locate {
            latitude,
            longitude,
        } => {
            println!("📍 {}", diary.resolve_location(latitude, longitude));
        }
        Command::Check => check(&diary)?,
        Command::Export => {
            let trips = diary
                .load()
                .with_context(|| format!("Failed to load diary: {}", diary.data_file()))?;
            println!("{}", serde_json::to_string_pretty(&trips)?);
        }
    }

    Ok(())
}

fn check(diary: &Diary) -> Result<()> {
    let loaded = diary
        .load_with_diagnostics()
        .with_context(|| format!("Failed to load diary: {}", diary.data_file()))?;

    println!("📔 {}", diary.data_file());
    for trip in &loaded.trips {
        match &trip.album {
            Some(_) => println!("   - {} ({} photo(s))", trip.name(), trip.photo_count()),
            None => println!("   - {} (no album)", trip.name()),
        }
    }

    if !loaded.diagnostics.is_empty() {
        println!("\n⚠️  Skipped records:");
        for diagnostic in &loaded.diagnostics {
            println!("   - {diagnostic}");
        }
    }

    println!("\n🎉 Summary:");
    println!("   Trips: {}", loaded.trips.len());
    println!("   Photos: {}", loaded.photo_count());
    println!("   Skipped records: {}", loaded.diagnostics.len());

    Ok(())
}
