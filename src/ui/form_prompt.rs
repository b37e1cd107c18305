//! Interactive add/edit form on top of `dialoguer`.
//!
//! The prompts fill a `JobFields` draft. Nothing is committed here: the
//! caller hands the draft to the board's form controller, and a "no" at the
//! final confirmation discards it.

use anyhow::Result;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

use crate::board::models::JobFields;
use crate::board::stages::list_stages;

fn required(value: &String) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        Err("This field is required")
    } else {
        Ok(())
    }
}

fn text(theme: &ColorfulTheme, prompt: &str, initial: &str, is_required: bool) -> Result<String> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(!is_required)
        .with_initial_text(initial);
    if is_required {
        input = input.validate_with(required);
    }
    Ok(input.interact_text()?)
}

/// Walk the user through every form field, starting from `initial`.
/// Returns `None` if they decline to save.
pub fn prompt_job_fields(title: &str, initial: &JobFields) -> Result<Option<JobFields>> {
    let theme = ColorfulTheme::default();
    println!("{}", console::style(title).bold());

    let company_name = text(&theme, "Company Name", &initial.company_name, true)?;
    let position_title = text(&theme, "Position Title", &initial.position_title, true)?;

    let stages = list_stages();
    let titles: Vec<&str> = stages.iter().map(|s| s.display_title).collect();
    let current = stages
        .iter()
        .position(|s| s.id == initial.status)
        .unwrap_or_default();
    let selection = Select::with_theme(&theme)
        .with_prompt("Status")
        .items(&titles)
        .default(current)
        .interact()?;

    let location = text(&theme, "Location", &initial.location, false)?;
    let salary_range = text(&theme, "Salary Range (e.g. $100k - $120k)", &initial.salary_range, false)?;
    let notes = text(&theme, "Notes", &initial.notes, false)?;

    let save = Confirm::with_theme(&theme)
        .with_prompt("Save this application?")
        .default(true)
        .interact()?;
    if !save {
        return Ok(None);
    }

    Ok(Some(JobFields {
        company_name,
        position_title,
        status: stages[selection].id,
        location,
        salary_range,
        notes,
    }))
}

/// Yes/no confirmation for destructive actions.
pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}
