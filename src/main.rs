mod cli;

use pictura::{config, images::ImageService, images::ImageStorage, server};
use pictura_db::migrations::current_version;
use pictura_db::pool::{get_conn, init_pool, DbPool};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

/// Create the data directory and open (and migrate) the database in it.
fn open_database(config: &config::Config) -> Result<DbPool> {
    let data_dir = &config.storage.data_dir;
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    let db_path = config.storage.database_path();
    let db_path_str = db_path.to_string_lossy();
    tracing::info!("Initializing database at {}", db_path_str);
    Ok(init_pool(&db_path_str)?)
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting Pictura server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let pool = open_database(&config)?;
    server::start_server(config, pool).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "pictura=trace,pictura_db=debug,tower_http=debug".to_string()
        } else {
            "pictura=debug,pictura_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::List { json } => list_images(cli.config.as_deref(), json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("pictura {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn list_images(config_path: Option<&std::path::Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let pool = open_database(&config)?;
    let schema_version = current_version(&*get_conn(&pool)?)?;
    let service = ImageService::new(ImageStorage::new(config.storage.media_root_path()), pool);

    let images = service.list_all()?;
    let total = service.count()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&images)?);
        return Ok(());
    }

    println!(
        "Database: {} (schema v{})",
        config.storage.database_path().display(),
        schema_version
    );
    if images.is_empty() {
        println!("No images stored.");
        return Ok(());
    }

    for image in &images {
        println!(
            "{:>6}  {}  {:>10}  {}  {}",
            image.id.get(),
            image.created_at.format("%Y-%m-%d %H:%M:%S"),
            server::templates::format_size(image.size),
            image.path,
            image.name
        );
    }
    println!("\n{} image(s)", total);

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_config(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            print_config(&config);
        }
    }

    Ok(())
}

fn print_config(config: &config::Config) {
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Data dir: {:?}", config.storage.data_dir);
    println!("  Media root: {:?}", config.storage.media_root_path());
    println!("  Database: {:?}", config.storage.database_path());
    println!(
        "  Remove files on delete: {}",
        config.storage.remove_files_on_delete
    );
    println!("  Max upload: {} bytes", config.upload.max_upload_bytes);
}
