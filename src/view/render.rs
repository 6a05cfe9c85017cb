// src/view/render.rs
//! Card and detail markup. Every backend-supplied string goes through `escape_html`.

use crate::types::{JobDetail, JobSummary};

const UNKNOWN_SOURCE: &str = "Unknown";
const UNKNOWN_COMPANY: &str = "Company";
const NOT_SPECIFIED: &str = "Not specified";

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// CSS class for a source badge, e.g. `source-linkedin`.
pub fn source_class(source: &str) -> String {
    let slug: String = source
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("source-{}", slug)
}

fn source_label(job: &JobSummary) -> &str {
    job.source_name().unwrap_or(UNKNOWN_SOURCE)
}

fn age_days(job: &JobSummary) -> Option<i64> {
    job.job_age_days.filter(|days| *days != 0)
}

fn card_age(job: &JobSummary) -> String {
    match age_days(job) {
        Some(days) => format!("{}d ago", days),
        None => "Recently".to_string(),
    }
}

fn detail_age(job: &JobSummary) -> String {
    match age_days(job) {
        Some(days) => format!("Posted {} days ago", days),
        None => "Recently posted".to_string(),
    }
}

pub fn detail_href(id: i64) -> String {
    format!("/jobs/{}", id)
}

pub fn render_job_card(job: &JobSummary) -> String {
    let source = source_label(job);
    let company = job.company_name.as_deref().unwrap_or(UNKNOWN_COMPANY);
    let location = job.location.as_deref().unwrap_or(NOT_SPECIFIED);
    let salary = job.salary_range.as_deref().unwrap_or(NOT_SPECIFIED);

    format!(
        r#"<div class="job-card" data-job-id="{id}">
    <div class="job-header">
        <span class="job-source {source_class}">{source}</span>
        <span class="job-age">{age}</span>
    </div>
    <h3 class="job-title">{title}</h3>
    <div class="job-company"><span>🏢</span><span>{company}</span></div>
    <div class="job-details">
        <div class="job-detail"><span>📍</span><span>{location}</span></div>
        <div class="job-detail"><span>💰</span><span>{salary}</span></div>
    </div>
    <div class="job-footer">
        <a class="view-details-btn" href="{href}">View Details →</a>
    </div>
</div>"#,
        id = job.id,
        source_class = source_class(source),
        source = escape_html(source),
        age = card_age(job),
        title = escape_html(&job.title),
        company = escape_html(company),
        location = escape_html(location),
        salary = escape_html(salary),
        href = detail_href(job.id),
    )
}

pub fn render_jobs_grid(jobs: &[JobSummary]) -> String {
    jobs.iter()
        .map(render_job_card)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_job_detail(detail: &JobDetail) -> String {
    let job = &detail.summary;
    let source = source_label(job);
    let company = job.company_name.as_deref().unwrap_or(UNKNOWN_COMPANY);
    let location = job.location.as_deref().unwrap_or(NOT_SPECIFIED);
    let salary = job.salary_range.as_deref().unwrap_or(NOT_SPECIFIED);

    let skills = if detail.skills.is_empty() {
        r#"<span class="text-muted">No skills listed</span>"#.to_string()
    } else {
        detail
            .skills
            .iter()
            .map(|skill| format!(r#"<span class="skill-tag">{}</span>"#, escape_html(skill)))
            .collect::<Vec<_>>()
            .join("")
    };

    let description = match detail.description.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => format!(
            r#"
    <section class="job-description">
        <h3>Job Description</h3>
        <div>{}</div>
    </section>"#,
            escape_html(text)
        ),
        _ => String::new(),
    };

    format!(
        r#"<div class="job-detail-header">
    <span class="job-source {source_class}">{source}</span>
    <h2>{title}</h2>
    <div class="job-detail-company"><span>🏢</span><span>{company}</span></div>
    <div class="job-detail-age">{age}</div>
    <div class="job-detail-facts">
        <div class="job-fact"><div class="job-fact-label">Location</div><div>📍 {location}</div></div>
        <div class="job-fact"><div class="job-fact-label">Salary</div><div>💰 {salary}</div></div>
    </div>
    <section class="job-skills">
        <h3>Required Skills</h3>
        <div class="skill-list">{skills}</div>
    </section>{description}
    <div class="job-apply">
        <a href="{url}" target="_blank" rel="noopener noreferrer">Apply on {source} →</a>
    </div>
</div>"#,
        source_class = source_class(source),
        source = escape_html(source),
        title = escape_html(&job.title),
        company = escape_html(company),
        age = detail_age(job),
        location = escape_html(location),
        salary = escape_html(salary),
        skills = skills,
        description = description,
        url = escape_html(&detail.url),
    )
}
