//! Read-only views — `jobboard board`, `stages`, `list`, `summary`.

use anyhow::Result;
use console::style;

use jobboard::board::models::Stage;
use jobboard::board::stages::{list_stages, stage_info};
use jobboard::board::store::partition_by_stage;
use jobboard::board::view::{board_summary, board_view};
use jobboard::config::BoardConfig;
use jobboard::ui::{render_board, terminal_width};

use super::open_store;

pub fn cmd_board(config: &BoardConfig, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let view = board_view(store.jobs());
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_board(&view, terminal_width()));
    }
    Ok(())
}

pub fn cmd_stages() {
    for info in list_stages() {
        println!("{:<10} {}", info.id.as_str(), info.display_title);
    }
}

pub fn cmd_list(config: &BoardConfig, stage: Option<Stage>, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let jobs = match stage {
        Some(stage) => partition_by_stage(store.jobs(), list_stages())
            .remove(&stage)
            .unwrap_or_default(),
        None => store.jobs().to_vec(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }

    if jobs.is_empty() {
        println!("No applications");
        return Ok(());
    }
    for job in &jobs {
        println!(
            "{:<38} {:<11} {} - {}  ({})",
            job.id.as_str(),
            stage_info(job.status).display_title,
            style(&job.company_name).bold(),
            job.position_title,
            job.application_date
        );
    }
    Ok(())
}

pub fn cmd_summary(config: &BoardConfig, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let summary = board_summary(store.jobs());
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{} {}", style("Total Applications:").bold(), summary.total);
    for entry in &summary.by_stage {
        println!("  {:<10} {}", stage_info(entry.stage).display_title, entry.count);
    }
    Ok(())
}
