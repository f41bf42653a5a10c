use anyhow::{Context, Result};
use clap::Parser;

use geoinfo::cli::{Cli, Commands};
use geoinfo::config::{StaticConfig, init_config};
use geoinfo::runtime::modes;
use geoinfo::system::logging::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let mut config = StaticConfig::load(cli.config.as_deref());
    cli.apply_overrides(&mut config);
    let config = init_config(config);

    match cli.command {
        None | Some(Commands::Serve) => {
            let _guard = init_logging(&config.logging)?;
            modes::run_server().await
        }
        Some(Commands::Lookup { ip }) => {
            let info = modes::run_lookup(&config, &ip).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
        Some(Commands::Resolve {
            peer,
            forwarded_for,
            real_ip,
            ip,
        }) => {
            let resolved = modes::run_resolve(
                peer.as_deref(),
                forwarded_for.as_deref(),
                real_ip.as_deref(),
                ip.as_deref(),
            )?;
            println!("{} ({})", resolved.ip, resolved.source);
            Ok(())
        }
        Some(Commands::GenerateConfig { path }) => match path {
            Some(path) => {
                StaticConfig::default()
                    .save_to_file(&path)
                    .map_err(|e| anyhow::anyhow!("{}", e))
                    .with_context(|| format!("Failed to write {}", path))?;
                println!("Configuration written to {}", path);
                Ok(())
            }
            None => {
                println!("{}", StaticConfig::generate_sample_config());
                Ok(())
            }
        },
    }
}
