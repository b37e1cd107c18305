//! Board mutations — `jobboard add`, `edit`, `move`, `delete`.
//!
//! Each command loads the collection, drives a `JobBoard` through one
//! interaction, and writes back whatever collection the board committed.
//! The write is refused if the file changed in the meantime (for example
//! through a running `jobboard serve`), so neither side loses a record.

use anyhow::{Context, Result};
use console::style;

use jobboard::board::form::SubmitError;
use jobboard::board::models::{JobApplication, JobId, Stage};
use jobboard::board::stages::stage_info;
use jobboard::board::store::find_job;
use jobboard::board::{FormCommit, JobBoard};
use jobboard::config::BoardConfig;
use jobboard::errors::BoardError;
use jobboard::ui::icons::{CHECK, CROSS, MOVE, SPARKLE, TRASH};
use jobboard::ui::{confirm, prompt_job_fields};

use super::super::JobArgs;
use super::open_store;

type Board<'a> = JobBoard<&'a mut dyn FnMut(Vec<JobApplication>)>;

/// Run `op` against a board over the stored collection and persist the
/// collection it commits, if any.
fn with_board<R>(config: &BoardConfig, op: impl FnOnce(&mut Board<'_>) -> Result<R>) -> Result<R> {
    let mut store = open_store(config)?;
    let snapshot = store.jobs().to_vec();
    let ids = config.id_strategy().generator(&snapshot);

    let mut committed: Option<Vec<JobApplication>> = None;
    let mut capture = |jobs: Vec<JobApplication>| committed = Some(jobs);
    let result = {
        let on_change: &mut dyn FnMut(Vec<JobApplication>) = &mut capture;
        let mut board = JobBoard::new(snapshot.clone(), on_change).with_id_generator(ids);
        op(&mut board)
    };

    if let Some(jobs) = committed {
        store
            .save_if_unchanged(&snapshot, jobs)
            .with_context(|| format!("Failed to save {}", store.path().display()))?;
    }
    result
}

fn submit(board: &mut Board<'_>) -> Result<FormCommit> {
    match board.submit_form() {
        Ok(commit) => Ok(commit),
        Err(SubmitError::Invalid(errors)) => {
            for e in &errors.errors {
                eprintln!("{}{}: {}", CROSS, e.field, e.message);
            }
            anyhow::bail!("Application not saved: {}", errors)
        }
        Err(err) => Err(err.into()),
    }
}

pub fn cmd_add(config: &BoardConfig, args: &JobArgs, interactive: bool) -> Result<()> {
    with_board(config, |board| {
        board.open_create();

        if interactive {
            let mut seeded = board.form().draft().cloned().unwrap_or_default();
            args.to_patch().apply_to_fields(&mut seeded);
            match prompt_job_fields("New Application", &seeded)? {
                Some(fields) => {
                    if let Some(draft) = board.draft_mut() {
                        *draft = fields;
                    }
                }
                None => {
                    board.cancel_form();
                    println!("Discarded.");
                    return Ok(());
                }
            }
        } else if let Some(draft) = board.draft_mut() {
            args.to_patch().apply_to_fields(draft);
        }

        if let FormCommit::Created(job) = submit(board)? {
            println!(
                "{}Added {} ({}) [{}]",
                SPARKLE,
                style(&job.company_name).bold(),
                job.position_title,
                job.id
            );
        }
        Ok(())
    })
}

pub fn cmd_edit(config: &BoardConfig, id: &str, args: &JobArgs, interactive: bool) -> Result<()> {
    let id = JobId::from(id);
    let patch = args.to_patch();
    if !interactive && patch.is_empty() {
        anyhow::bail!("Nothing to change: pass at least one field flag or --interactive");
    }

    with_board(config, |board| {
        board.open_edit(&id)?;

        let mut seeded = board.form().draft().cloned().unwrap_or_default();
        patch.apply_to_fields(&mut seeded);
        if interactive {
            match prompt_job_fields("Edit Application", &seeded)? {
                Some(fields) => seeded = fields,
                None => {
                    board.cancel_form();
                    println!("Discarded.");
                    return Ok(());
                }
            }
        }
        if let Some(draft) = board.draft_mut() {
            *draft = seeded;
        }

        submit(board)?;
        println!("{}Updated [{}]", CHECK, id);
        Ok(())
    })
}

pub fn cmd_move(config: &BoardConfig, id: &str, stage: Stage) -> Result<()> {
    let id = JobId::from(id);
    with_board(config, |board| {
        let from = find_job(board.jobs(), &id)
            .map(|j| j.status)
            .ok_or_else(|| BoardError::JobNotFound { id: id.clone() })?;

        if board.move_job(&id, stage) {
            println!(
                "{}Moved [{}] {} → {}",
                MOVE,
                id,
                stage_info(from).display_title,
                stage_info(stage).display_title
            );
        } else {
            println!("[{}] already in {}, unchanged", id, stage_info(stage).display_title);
        }
        Ok(())
    })
}

pub fn cmd_delete(config: &BoardConfig, id: &str, yes: bool) -> Result<()> {
    let id = JobId::from(id);
    with_board(config, |board| {
        let Some(job) = find_job(board.jobs(), &id).cloned() else {
            println!("No application with id {}, nothing deleted", id);
            return Ok(());
        };

        if !yes {
            let prompt = format!("Delete {} ({})?", job.company_name, job.position_title);
            if !confirm(&prompt)? {
                println!("Cancelled.");
                return Ok(());
            }
        }

        if board.delete(&id) {
            println!("{}Deleted {} [{}]", TRASH, job.company_name, id);
        }
        Ok(())
    })
}
