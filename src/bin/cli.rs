//! DDR exporter CLI
//!
//! Reads the play data of a logged-in e-amusement session and writes a
//! BATCH-MANUAL JSON for Kamaitachi.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ddr_exporter::{
    error::{AppError, Result},
    models::{Config, ExportRequest, GameVersion, PlayType},
    pipeline::{ConsoleReporter, Exporter, RunGuard},
    services::HttpFetcher,
    storage::{ExportSink, HttpImportApi, KamaitachiSink, LocalStorage},
    utils::log as status,
};

/// ddr-exporter - DDR play data to BATCH-MANUAL
#[derive(Parser, Debug)]
#[command(
    name = "ddr-exporter",
    version,
    about = "Export DDR e-amusement scores as a Kamaitachi BATCH-MANUAL JSON"
)]
struct Cli {
    /// Directory holding config.toml; exports are written here
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export every recorded score of one play type
    Export {
        /// Game version (A20 or A3)
        #[arg(short, long, required_unless_present = "from_url")]
        game_version: Option<GameVersion>,

        /// Any play data page URL; the game version is detected from it
        #[arg(long, conflicts_with = "game_version")]
        from_url: Option<String>,

        /// Play type (SP or DP)
        #[arg(short, long, default_value = "SP")]
        playtype: PlayType,

        /// Output file (default: {storage_dir}/{export.file_name})
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Import into Kamaitachi (needs kamaitachi.api_key) instead of writing a file
        #[arg(short, long, conflicts_with = "output")]
        upload: bool,
    },

    /// Validate the configuration file
    Validate,

    /// List known game versions and their listing pages
    Sites,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
    status::init(level);
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let mut config = Config::load_or_default(&config_path);
    log::info!("Loaded configuration from {}", cli.storage_dir.display());

    match cli.command {
        Command::Export {
            game_version,
            from_url,
            playtype,
            output,
            upload,
        } => {
            let game_version = match (game_version, from_url) {
                (Some(version), _) => version,
                (None, Some(url)) => GameVersion::detect(&url, &config.sites).ok_or_else(|| {
                    AppError::config(format!("Cannot tell the game version from {url}"))
                })?,
                (None, None) => {
                    return Err(AppError::config("Pass --game-version or --from-url"));
                }
            };

            let dir = match output {
                Some(path) => {
                    if let Some(name) = path.file_name() {
                        config.export.file_name = name.to_string_lossy().into_owned();
                    }
                    path.parent()
                        .map(PathBuf::from)
                        .unwrap_or_else(|| PathBuf::from("."))
                }
                None => cli.storage_dir.clone(),
            };

            config.validate()?;

            let sink: Box<dyn ExportSink> = if upload {
                Box::new(KamaitachiSink::new(
                    HttpImportApi::new(&config.client)?,
                    &config.kamaitachi,
                )?)
            } else {
                Box::new(LocalStorage::new(dir))
            };

            let request = ExportRequest::new(game_version, playtype);
            status::header(&format!("Exporting DDR {request} scores"));

            let fetcher = HttpFetcher::new(&config.client)?;
            let reporter = ConsoleReporter;
            let mut exporter =
                Exporter::new(&config, &fetcher, sink.as_ref(), &reporter, RunGuard::new())?;

            let summary = exporter.run(request).await?;

            status::summary(
                "Export Results",
                &[
                    ("Scores", summary.record_count.to_string()),
                    ("Skipped", summary.skipped.to_string()),
                    ("Listing pages", summary.pages_read.to_string()),
                    ("Delivered to", summary.location.clone()),
                ],
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            status::success(&format!(
                "Config OK ({} sites, {} max pages, unrecognized values: {:?}, malformed values: {:?})",
                config.sites.len(),
                config.export.max_pages,
                config.export.on_unrecognized,
                config.export.on_malformed
            ));
        }

        Command::Sites => {
            for site in &config.sites {
                status::info(&format!("{} (pages matching '{}')", site.version, site.path_marker));
                for playtype in [PlayType::Single, PlayType::Double] {
                    let hint = site
                        .expected_pages(playtype)
                        .map_or_else(|| "unknown".to_string(), |n| n.to_string());
                    status::info(&format!(
                        "    {}: {} (about {} pages)",
                        playtype,
                        site.listing_url(playtype),
                        hint
                    ));
                }
            }
        }
    }

    Ok(())
}
