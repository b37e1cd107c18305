//! The fixed, ordered stage registry. Adding a stage is a code change.

use super::models::{Stage, StageInfo};

static STAGES: [StageInfo; 5] = [
    StageInfo {
        id: Stage::Applied,
        display_title: "Applied",
    },
    StageInfo {
        id: Stage::Screening,
        display_title: "Screening",
    },
    StageInfo {
        id: Stage::Interview,
        display_title: "Interview",
    },
    StageInfo {
        id: Stage::Offer,
        display_title: "Offer",
    },
    StageInfo {
        id: Stage::Rejected,
        display_title: "Rejected",
    },
];

/// All stages in column order. Used for both the board columns and the
/// status selector of the form.
pub fn list_stages() -> &'static [StageInfo] {
    &STAGES
}

/// Registry entry for a stage.
pub fn stage_info(stage: Stage) -> &'static StageInfo {
    let idx = Stage::ALL
        .iter()
        .position(|s| *s == stage)
        .unwrap_or_default();
    &STAGES[idx]
}
