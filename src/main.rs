use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use futures_util::future::join_all;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cached_image::infrastructure::{
    AppConfig, CliArgs, Command, ConfigLoader, DiskResponseCache, ImageCacheLoader,
    MemoryResponseCache, ReqwestTransport, TieredResponseCache,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let loader = ConfigLoader::new().unwrap_or_else(|_| {
        ConfigLoader::with_dir(std::env::temp_dir().join(cached_image::NAME))
    });
    let mut config = loader
        .load_config(args.config.as_deref())
        .wrap_err("failed to load configuration")?;
    config.merge_with_args(args);
    Ok(config)
}

fn build_loader(config: &AppConfig) -> Result<ImageCacheLoader> {
    let memory = Arc::new(MemoryResponseCache::new(config.cache.memory_entries));
    let disk = Arc::new(
        DiskResponseCache::new(config.cache.effective_disk_dir(), config.cache.disk_max_bytes)
            .wrap_err("failed to open disk cache")?,
    );
    let cache = Arc::new(TieredResponseCache::new(memory, disk));
    let transport = Arc::new(
        ReqwestTransport::new(&config.cache.transport_config())
            .wrap_err("failed to create HTTP client")?,
    );
    Ok(ImageCacheLoader::with_default_decoder(cache, transport))
}

async fn fetch(loader: &ImageCacheLoader, urls: &[reqwest::Url]) -> ExitCode {
    let results = join_all(
        urls.iter()
            .map(|url| async move { (url, loader.load(url).await) }),
    )
    .await;

    let mut failed = 0usize;
    for (url, result) in results {
        match result {
            Ok(image) => println!("ok {}x{} {url}", image.width(), image.height()),
            Err(e) => {
                failed += 1;
                println!("error {url}: {e}");
            }
        }
    }

    debug!(total = urls.len(), failed, "Fetch complete");
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn lookup(loader: &ImageCacheLoader, urls: &[reqwest::Url]) -> ExitCode {
    for url in urls {
        match loader.lookup_cached(url) {
            Some(image) => println!("hit {}x{} {url}", image.width(), image.height()),
            None => println!("miss {url}"),
        }
    }
    ExitCode::SUCCESS
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(version = cached_image::VERSION, "Starting cachedimg");

    let loader = build_loader(&config)?;

    let code = match &args.command {
        Command::Fetch { urls } => fetch(&loader, urls).await,
        Command::Lookup { urls } => lookup(&loader, urls),
    };

    Ok(code)
}
