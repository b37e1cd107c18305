use super::models::{BoardSummary, BoardView, ColumnView, JobApplication, StageCount};
use super::stages::list_stages;
use super::store::{count_by_stage, partition_by_stage};

/// Total and per-stage counts, in column order.
pub fn board_summary(jobs: &[JobApplication]) -> BoardSummary {
    BoardSummary {
        total: jobs.len(),
        by_stage: list_stages()
            .iter()
            .map(|info| StageCount {
                stage: info.id,
                count: count_by_stage(jobs, info.id),
            })
            .collect(),
    }
}

/// Build the column view for `jobs`. Recomputed on every render; nothing is cached.
pub fn board_view(jobs: &[JobApplication]) -> BoardView {
    let stages = list_stages();
    let mut partition = partition_by_stage(jobs, stages);

    let columns = stages
        .iter()
        .map(|info| {
            let jobs = partition.remove(&info.id).unwrap_or_default();
            ColumnView {
                stage: info.id,
                title: info.display_title,
                count: jobs.len(),
                jobs,
            }
        })
        .collect();

    BoardView {
        total: jobs.len(),
        columns,
    }
}
