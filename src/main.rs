mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use itemshelf_core::config::Config;
use itemshelf_core::ItemId;
use itemshelf_db::repository;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "itemshelf=trace,itemshelf_server=trace,itemshelf_db=debug,itemshelf_core=debug,tower_http=debug".to_string()
        } else {
            "itemshelf=info,itemshelf_server=info,itemshelf_db=info,itemshelf_core=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            tracing::info!("Starting itemshelf server");
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(itemshelf_server::start(config))?;
            Ok(())
        }
        Commands::Items { id } => list_items(cli.config.as_deref(), id),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("itemshelf {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Defaults apply only when no config file was named.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(p) => Config::load(p)?,
        None => Config::default(),
    };
    config.apply_env();
    Ok(config)
}

fn list_items(config_path: Option<&Path>, id: Option<i64>) -> Result<()> {
    let config = load_config(config_path)?;
    let repo = repository::open(&config.storage)?;

    match id {
        Some(id) => {
            let item = repo
                .get_item(ItemId::new(id))?
                .ok_or_else(|| anyhow::anyhow!("item {id} not found"))?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        None => {
            let items = repo.get_items()?;
            tracing::debug!(backend = repo.name(), count = items.len(), "Loaded items");
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            Config::load(p).with_context(|| format!("Invalid config {}", p.display()))?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Frontend origin: {}", config.server.front_url);
    println!(
        "  Storage: {:?} ({} layout)",
        config.storage.backend,
        config.storage.category_layout.as_str()
    );
    println!("  Images: {}", config.images.dir.display());

    let warnings = config.validate();
    for warning in &warnings {
        println!("  warning: {warning}");
    }

    Ok(())
}
