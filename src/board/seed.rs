use chrono::NaiveDate;

use super::models::{JobApplication, JobId, Stage};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Sample collection for `jobboard init --demo`.
pub fn demo_jobs() -> Vec<JobApplication> {
    vec![
        JobApplication {
            id: JobId::from("1"),
            company_name: "TechCorp Inc.".into(),
            position_title: "Senior Frontend Developer".into(),
            status: Stage::Interview,
            application_date: date(2024, 1, 15),
            location: "San Francisco, CA".into(),
            salary_range: "$120k - $150k".into(),
            notes: "Technical interview scheduled for next week".into(),
        },
        JobApplication {
            id: JobId::from("2"),
            company_name: "StartupXYZ".into(),
            position_title: "Full Stack Engineer".into(),
            status: Stage::Applied,
            application_date: date(2024, 1, 10),
            location: "Remote".into(),
            salary_range: "$100k - $130k".into(),
            notes: "Applied through LinkedIn".into(),
        },
        JobApplication {
            id: JobId::from("3"),
            company_name: "BigTech Corp".into(),
            position_title: "Software Engineer".into(),
            status: Stage::Screening,
            application_date: date(2024, 1, 8),
            location: "Seattle, WA".into(),
            salary_range: "$140k - $180k".into(),
            notes: "Phone screening completed".into(),
        },
        JobApplication {
            id: JobId::from("4"),
            company_name: "InnovateLab".into(),
            position_title: "React Developer".into(),
            status: Stage::Offer,
            application_date: date(2024, 1, 5),
            location: "Austin, TX".into(),
            salary_range: "$110k - $140k".into(),
            notes: "Offer received, considering".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_demo_ids_are_unique() {
        let jobs = demo_jobs();
        let ids: HashSet<&JobId> = jobs.iter().map(|j| &j.id).collect();
        assert_eq!(ids.len(), jobs.len());
    }

    #[test]
    fn test_demo_dates_parse() {
        assert!(demo_jobs().iter().all(|j| j.application_date != NaiveDate::default()));
    }
}
