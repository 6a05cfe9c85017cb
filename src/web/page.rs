// src/web/page.rs
//! Full page markup assembled from a `PageModel` snapshot

use crate::view::render::escape_html;
use crate::view::{Element, PageModel};

use super::types::{FormInputs, DAY_RANGE_OPTIONS, SOURCE_OPTIONS};

fn display_attr(page: &PageModel, element: Element) -> &'static str {
    if page.is_visible(element) {
        ""
    } else {
        r#" style="display: none""#
    }
}

/// Element content: stored markup is inserted as-is, plain text is escaped.
fn content(page: &PageModel, element: Element) -> String {
    let state = page.element(element);
    if state.html.is_empty() {
        escape_html(&state.text)
    } else {
        state.html
    }
}

fn source_options(selected: &str) -> String {
    std::iter::once(("", "All Sources"))
        .chain(SOURCE_OPTIONS.iter().map(|s| (*s, *s)))
        .map(|(value, label)| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape_html(value),
                if value == selected { " selected" } else { "" },
                escape_html(label)
            )
        })
        .collect()
}

fn day_options(selected: u32) -> String {
    DAY_RANGE_OPTIONS
        .iter()
        .map(|days| {
            format!(
                r#"<option value="{days}"{sel}>Last {days} days</option>"#,
                days = days,
                sel = if *days == selected { " selected" } else { "" }
            )
        })
        .collect()
}

fn notices(page: &PageModel) -> String {
    page.notices()
        .iter()
        .map(|notice| format!(r#"<div class="notice" role="alert">{}</div>"#, escape_html(notice)))
        .collect()
}

pub fn render_page(page: &PageModel, inputs: &FormInputs) -> String {
    let settling = page.is_settling()
        || page.is_visible(Element::LoadingState)
        || !page.is_enabled(Element::TriggerScrapeButton);
    let refresh = if settling {
        r#"<meta http-equiv="refresh" content="1">"#
    } else {
        ""
    };
    let scrape_disabled = if page.is_enabled(Element::TriggerScrapeButton) {
        ""
    } else {
        " disabled"
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>JobCompass</title>
{refresh}
<link rel="stylesheet" href="/static/styles.css">
</head>
<body>
<header>
    <h1>JobCompass</h1>
    <div class="stats">
        <div class="stat"><span id="totalJobs">{total}</span> jobs</div>
        <div class="stat"><span id="recentJobs">{recent}</span> this week</div>
    </div>
    <form method="post" action="/scrape">
        <button id="triggerScrapeBtn" type="submit"{scrape_disabled}>{scrape_label}</button>
    </form>
</header>
{notices}
<section class="filters">
    <form method="post" action="/search">
        <input id="searchInput" name="q" type="search" placeholder="Search jobs, companies, locations" value="{search}">
    </form>
    <form method="post" action="/source">
        <select id="sourceFilter" name="source">{sources}</select>
        <button type="submit">Apply</button>
    </form>
    <form method="post" action="/days">
        <select id="daysFilter" name="days">{days}</select>
        <button type="submit">Apply</button>
    </form>
    <form method="post" action="/refresh">
        <button id="refreshBtn" type="submit">Refresh</button>
    </form>
</section>
<main>
    <div id="loadingState"{loading_attr}>Loading jobs...</div>
    <div id="errorState"{error_attr}>
        <p id="errorMessage">{error_message}</p>
    </div>
    <div id="emptyState"{empty_attr}>No jobs found</div>
    <div id="jobsGrid" class="jobs-grid"{grid_attr}>{grid}</div>
</main>
<div id="jobModal" class="modal"{modal_attr}>
    <div class="modal-content">
        <form method="post" action="/close"><button class="close-btn" type="submit">&times;</button></form>
        <div id="jobDetailContent">{detail}</div>
    </div>
</div>
</body>
</html>
"#,
        refresh = refresh,
        total = content(page, Element::TotalJobs),
        recent = content(page, Element::RecentJobs),
        scrape_disabled = scrape_disabled,
        scrape_label = content(page, Element::TriggerScrapeButton),
        notices = notices(page),
        search = escape_html(&inputs.search),
        sources = source_options(&inputs.source),
        days = day_options(inputs.days),
        loading_attr = display_attr(page, Element::LoadingState),
        error_attr = display_attr(page, Element::ErrorState),
        error_message = content(page, Element::ErrorMessage),
        empty_attr = display_attr(page, Element::EmptyState),
        grid_attr = display_attr(page, Element::JobsGrid),
        grid = content(page, Element::JobsGrid),
        modal_attr = display_attr(page, Element::JobModal),
        detail = content(page, Element::JobDetailContent),
    )
}
