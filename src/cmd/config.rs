//! Configuration view and validation commands — `jobboard config`.

use anyhow::Result;

use jobboard::config::{BoardConfig, BoardToml};

use super::super::ConfigCommands;

fn print_values(toml: &BoardToml) {
    println!("[storage]");
    println!("  data_file = \"{}\"", toml.storage.data_file.display());
    println!();
    println!("[server]");
    println!("  host = \"{}\"", toml.server.host);
    println!("  port = {}", toml.server.port);
    println!();
    println!("[logging]");
    println!("  level = \"{}\"", toml.logging.level);
    println!("  format = \"{}\"", toml.logging.format);
    if let Some(file) = &toml.logging.file {
        println!("  file = \"{}\"", file.display());
    }
    println!();
    println!("[ids]");
    println!("  strategy = \"{}\"", toml.ids.strategy);
    println!();
}

pub fn cmd_config(config: &BoardConfig, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = config.config_file();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Job Board Configuration");
            println!("=======================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
                println!();
                print_values(&BoardToml::load(&config_path)?);
            } else {
                println!("No jobboard.toml found at {}", config_path.display());
                println!();
                println!("Using default configuration:");
                print_values(&BoardToml::default());
                println!("Run 'jobboard config init' to create a jobboard.toml file.");
                println!();
            }

            println!("Effective values (with env/CLI overrides):");
            println!("  data_file = \"{}\"", config.data_file().display());
            println!("  port = {}", config.toml.server.port);
            println!("  log level = \"{}\"", config.toml.logging.level);
            println!("  id strategy = \"{}\"", config.id_strategy());
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No jobboard.toml found. Using defaults (valid).");
                return Ok(());
            }

            let warnings = BoardToml::load(&config_path)?.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("jobboard.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            std::fs::create_dir_all(&config.board_dir)?;
            BoardToml::default().save(&config_path)?;

            println!("Created jobboard.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [storage] data_file");
            println!("  - [server] host, port");
            println!("  - [logging] level, format, file");
            println!();
        }
    }

    Ok(())
}
