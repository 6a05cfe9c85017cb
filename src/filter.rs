// src/filter.rs
//! Local search and source filtering over the loaded jobs

use crate::types::JobSummary;

/// True when `job` satisfies both the search term and the source filter.
///
/// The search term is trimmed and compared case-insensitively against title,
/// company and location. An empty term or empty source filter matches everything.
pub fn matches(job: &JobSummary, search_term: &str, source_filter: &str) -> bool {
    matches_search(job, &search_term.trim().to_lowercase()) && matches_source(job, source_filter)
}

fn matches_search(job: &JobSummary, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    let contains = |field: Option<&str>| {
        field
            .map(|value| value.to_lowercase().contains(needle))
            .unwrap_or(false)
    };

    contains(Some(job.title.as_str()))
        || contains(job.company_name.as_deref())
        || contains(job.location.as_deref())
}

fn matches_source(job: &JobSummary, source_filter: &str) -> bool {
    source_filter.is_empty() || job.source_name() == Some(source_filter)
}

/// Filter `jobs` preserving their order.
pub fn apply_filter(jobs: &[JobSummary], search_term: &str, source_filter: &str) -> Vec<JobSummary> {
    jobs.iter()
        .filter(|job| matches(job, search_term, source_filter))
        .cloned()
        .collect()
}
