//! Icon Hydrator CLI
//!
//! Reads a page, swaps shader card logos for their Modrinth icons and writes
//! the result. Cards whose icon can't be resolved keep their fallback logo.

use clap::Parser;
use icon_hydrator::config::{DEFAULT_API_BASE, DEFAULT_TIMEOUT};
use icon_hydrator::{
    AssumeLoaded, HttpImageProbe, HydrationReport, Hydrator, HydratorConfig, ImageProbe,
    JsonFileStore, KeyValueStore, MemoryStore, Page,
};
use std::path::PathBuf;
use std::time::Duration;

/// Replace shader card logos with Modrinth project icons
#[derive(Parser, Debug)]
#[command(name = "icon_hydrator")]
#[command(version, about, long_about = None)]
struct Args {
    /// HTML page to hydrate
    input: PathBuf,

    /// Where to write the hydrated page (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to the icon URL cache file
    #[arg(long, default_value_t = default_cache_path())]
    cache_file: String,

    /// Keep the icon cache in memory only
    #[arg(long, default_value_t = false)]
    no_cache: bool,

    /// Modrinth API base URL
    #[arg(long, default_value_t = DEFAULT_API_BASE.to_string())]
    api_base: String,

    /// Time budget for each project lookup, in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,

    /// Trust resolved icon URLs without downloading them
    #[arg(long, default_value_t = false)]
    no_image_check: bool,
}

/// Returns the default cache path: ~/.cache/icon_hydrator/icon_cache.json
fn default_cache_path() -> String {
    JsonFileStore::default_path().to_string_lossy().to_string()
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let html = match std::fs::read_to_string(&args.input) {
        Ok(html) => html,
        Err(e) => {
            log::error!("Failed to read {}: {}", args.input.display(), e);
            std::process::exit(1);
        }
    };

    let config = HydratorConfig::default()
        .with_api_base(args.api_base.as_str())
        .with_timeout(Duration::from_millis(args.timeout_ms));
    let page = Page::parse(&html, config.markup.clone());

    let report = match (args.no_cache, args.no_image_check) {
        (true, true) => hydrate(&config, &page, MemoryStore::new(), AssumeLoaded).await,
        (false, true) => {
            let store = JsonFileStore::open(&args.cache_file);
            hydrate(&config, &page, store, AssumeLoaded).await
        }
        (no_cache, false) => {
            let probe = match HttpImageProbe::new(config.image_timeout) {
                Ok(probe) => probe,
                Err(e) => {
                    log::error!("Failed to create HTTP client: {}", e);
                    std::process::exit(1);
                }
            };
            if no_cache {
                hydrate(&config, &page, MemoryStore::new(), probe).await
            } else {
                let store = JsonFileStore::open(&args.cache_file);
                hydrate(&config, &page, store, probe).await
            }
        }
    };

    let report = match report {
        Ok(report) => report,
        Err(e) => {
            log::error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Hydrated {} cards: {} loaded, {} unavailable, {} failed to load, {} skipped",
        report.cards,
        report.loaded,
        report.unavailable,
        report.load_failed,
        report.skipped
    );

    let hydrated = page.html();
    match &args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, hydrated) {
                log::error!("Failed to write {}: {}", path.display(), e);
                std::process::exit(1);
            }
            log::info!("Wrote {}", path.display());
        }
        None => print!("{}", hydrated),
    }
}

async fn hydrate<S: KeyValueStore, P: ImageProbe>(
    config: &HydratorConfig,
    page: &Page,
    store: S,
    probe: P,
) -> icon_hydrator::Result<HydrationReport> {
    let mut hydrator = Hydrator::new(config, store, probe)?;
    Ok(hydrator.run(page).await)
}
