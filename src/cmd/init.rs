//! Project initialization — `jobboard init`.

use anyhow::{Context, Result};
use console::style;

use jobboard::board::seed::demo_jobs;
use jobboard::config::{BoardConfig, BoardToml};
use jobboard::storage::JsonFileStore;
use jobboard::ui::icons::{CHECK, SPARKLE};

pub fn cmd_init(config: &BoardConfig, demo: bool) -> Result<()> {
    std::fs::create_dir_all(&config.board_dir).with_context(|| {
        format!(
            "Failed to create board directory {}",
            config.board_dir.display()
        )
    })?;

    let config_path = config.config_file();
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
    } else {
        BoardToml::default().save(&config_path)?;
        println!("{}Created {}", CHECK, config_path.display());
    }

    let data_file = config.data_file();
    if data_file.exists() {
        println!(
            "Job file already exists at {}, leaving it untouched",
            data_file.display()
        );
        return Ok(());
    }

    let jobs = if demo { demo_jobs() } else { Vec::new() };
    let count = jobs.len();
    let mut store = JsonFileStore::open(&data_file)?;
    store
        .save(jobs)
        .with_context(|| format!("Failed to write {}", data_file.display()))?;
    tracing::info!(path = %data_file.display(), count, "job file initialized");

    if demo {
        println!(
            "{}Created {} with {} sample applications",
            SPARKLE,
            data_file.display(),
            count
        );
    } else {
        println!("{}Created {}", CHECK, data_file.display());
    }
    println!();
    println!("Next: {}", style("jobboard add --interactive").cyan());
    Ok(())
}
