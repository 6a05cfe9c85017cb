// src/controller.rs
//! The view controller: owns the job list, filter inputs, display state and
//! in-flight requests, and drives a [`ViewBinding`].
//!
//! Network calls run as tasks in a `JoinSet`; their outcomes come back through
//! [`ViewController::complete`]. Every job load and detail load carries a
//! generation number, and an outcome whose generation is no longer current is
//! dropped on arrival.

use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::{self, JoinError, JoinSet};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::{Timings, ViewConfig};
use crate::core::{JobsBackend, ScrapeRequest};
use crate::debounce::Debouncer;
use crate::error::ViewError;
use crate::filter::apply_filter;
use crate::stats::{CounterAnimation, JobStats, ANIMATION_FRAME};
use crate::types::{JobDetail, JobSummary};
use crate::view::render::{render_job_detail, render_jobs_grid};
use crate::view::{show_panel, Element, Panel, ViewBinding};

pub const SCRAPE_IDLE_LABEL: &str = "Trigger Scrape";
pub const SCRAPE_BUSY_LABEL: &str = "Scraping...";
pub const LOAD_ERROR_FALLBACK: &str = "Unable to load jobs";
pub const DETAIL_ERROR_NOTICE: &str = "Failed to load job details. Please try again.";
pub const SCRAPE_STARTED_NOTICE: &str = "Scraping started successfully! Jobs will appear shortly.";
pub const SCRAPE_REJECTED_NOTICE: &str = "Failed to trigger scraping.";
pub const SCRAPE_UNREACHABLE_NOTICE: &str =
    "Error triggering scrape. Ensure the scraper service is running.";

/// User interactions delivered to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SearchInput(String),
    SourceFilterChanged(String),
    DayRangeChanged(u32),
    Refresh,
    ShowDetail(i64),
    CloseDetail,
    TriggerScrape,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub all_jobs: Vec<JobSummary>,
    pub filtered_jobs: Vec<JobSummary>,
    pub search_term: String,
    pub source_filter: String,
    pub day_range: u32,
}

impl ViewState {
    pub fn new(day_range: u32) -> Self {
        Self {
            all_jobs: Vec::new(),
            filtered_jobs: Vec::new(),
            search_term: String::new(),
            source_filter: String::new(),
            day_range,
        }
    }

    fn refilter(&mut self) {
        self.filtered_jobs = apply_filter(&self.all_jobs, &self.search_term, &self.source_filter);
    }
}

/// Outcome of the most recent job load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    Loading,
    Error(String),
    Loaded,
}

/// Result produced by a request task.
#[derive(Debug)]
pub enum Outcome {
    Jobs(Result<Vec<JobSummary>, ViewError>),
    Detail(Result<JobDetail, ViewError>),
    Scrape(Result<(), ViewError>),
}

pub type TaskResult = Result<(task::Id, Outcome), JoinError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Jobs { generation: u64 },
    Detail { generation: u64, id: i64 },
    Scrape,
}

impl Pending {
    /// The outcome to apply when the task died without producing one.
    fn failed(self, err: &JoinError) -> Outcome {
        let cause = ViewError::Network(format!("request task failed: {}", err));
        match self {
            Pending::Jobs { .. } => Outcome::Jobs(Err(cause)),
            Pending::Detail { .. } => Outcome::Detail(Err(cause)),
            Pending::Scrape => Outcome::Scrape(Err(cause)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StatsAnimation {
    started: Instant,
    next_frame: Instant,
    total: CounterAnimation,
    recent: CounterAnimation,
}

pub struct ViewController<V> {
    backend: Arc<dyn JobsBackend>,
    view: V,
    state: ViewState,
    stats: JobStats,
    display: DisplayState,
    pending_search: String,
    search_debounce: Debouncer,
    load_generation: u64,
    detail_generation: u64,
    scheduled_reload: Option<Instant>,
    animation: Option<StatsAnimation>,
    scrape_request: ScrapeRequest,
    timings: Timings,
    tasks: JoinSet<Outcome>,
    pending: HashMap<task::Id, Pending>,
}

impl<V: ViewBinding> ViewController<V> {
    pub fn new(backend: Arc<dyn JobsBackend>, view: V, config: &ViewConfig) -> Self {
        Self {
            backend,
            view,
            state: ViewState::new(config.default_day_range),
            stats: JobStats::default(),
            display: DisplayState::Loading,
            pending_search: String::new(),
            search_debounce: Debouncer::new(config.timings.search_debounce()),
            load_generation: 0,
            detail_generation: 0,
            scheduled_reload: None,
            animation: None,
            scrape_request: ScrapeRequest::from(&config.scrape),
            timings: config.timings.clone(),
            tasks: JoinSet::new(),
            pending: HashMap::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn stats(&self) -> JobStats {
        self.stats
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// The panel the page should currently show.
    pub fn current_panel(&self) -> Panel {
        match self.display {
            DisplayState::Loading => Panel::Loading,
            DisplayState::Error(_) => Panel::Error,
            DisplayState::Loaded if self.state.filtered_jobs.is_empty() => Panel::Empty,
            DisplayState::Loaded => Panel::Jobs,
        }
    }

    pub fn is_scrape_in_flight(&self) -> bool {
        self.pending.values().any(|p| *p == Pending::Scrape)
    }

    /// True while a request, debounce, scheduled reload or stats animation will still change the page.
    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
            || self.search_debounce.is_pending()
            || self.scheduled_reload.is_some()
            || self.animation.is_some()
    }

    fn publish_activity(&mut self) {
        let busy = self.is_busy();
        self.view.set_busy(busy);
    }

    /// Initial page setup: idle scrape control, closed overlay, first load.
    pub fn start(&mut self) {
        self.view.set_visible(Element::JobModal, false);
        self.view.set_enabled(Element::TriggerScrapeButton, true);
        self.view.set_text(Element::TriggerScrapeButton, SCRAPE_IDLE_LABEL);
        self.view.set_text(Element::TotalJobs, "0");
        self.view.set_text(Element::RecentJobs, "0");
        self.load_jobs();
        self.publish_activity();
    }

    pub fn handle_event(&mut self, event: UiEvent, now: Instant) {
        debug!("UI event: {:?}", event);
        match event {
            UiEvent::SearchInput(text) => self.search_input(text, now),
            UiEvent::SourceFilterChanged(source) => self.set_source_filter(source),
            UiEvent::DayRangeChanged(days) => self.set_day_range(days),
            UiEvent::Refresh => self.load_jobs(),
            UiEvent::ShowDetail(id) => self.load_job_detail(id),
            UiEvent::CloseDetail => self.close_detail(),
            UiEvent::TriggerScrape => self.trigger_scrape(),
        }
        self.publish_activity();
        self.view.event_handled();
    }

    // ===== Data loading =====

    /// Fetch jobs for the current day range. Any earlier load still in flight is superseded.
    pub fn load_jobs(&mut self) {
        self.load_generation += 1;
        let generation = self.load_generation;
        let days = self.state.day_range;

        info!("Loading jobs for the last {} days (generation {})", days, generation);
        self.display = DisplayState::Loading;
        show_panel(&mut self.view, Panel::Loading);

        let backend = Arc::clone(&self.backend);
        let handle = self
            .tasks
            .spawn(async move { Outcome::Jobs(backend.recent_jobs(days).await) });
        self.pending.insert(handle.id(), Pending::Jobs { generation });
    }

    pub fn set_day_range(&mut self, days: u32) {
        if days == 0 {
            warn!("Ignoring day range of 0");
            return;
        }
        self.state.day_range = days;
        self.load_jobs();
    }

    pub fn load_job_detail(&mut self, id: i64) {
        self.detail_generation += 1;
        let generation = self.detail_generation;

        info!("Loading detail for job {}", id);
        let backend = Arc::clone(&self.backend);
        let handle = self
            .tasks
            .spawn(async move { Outcome::Detail(backend.job_detail(id).await) });
        self.pending.insert(handle.id(), Pending::Detail { generation, id });
    }

    /// Hide the overlay. A detail load still in flight will not reopen it.
    pub fn close_detail(&mut self) {
        self.detail_generation += 1;
        self.view.set_visible(Element::JobModal, false);
    }

    // ===== Filtering =====

    /// Record a keystroke; filtering happens once input has been quiet for the debounce window.
    pub fn search_input(&mut self, text: String, now: Instant) {
        self.pending_search = text;
        self.search_debounce.trigger(now);
    }

    /// Applies immediately, together with any search text still waiting on the debounce.
    pub fn set_source_filter(&mut self, source: String) {
        self.state.source_filter = source;
        if self.search_debounce.is_pending() {
            self.search_debounce.cancel();
            self.state.search_term = self.pending_search.trim().to_string();
        }
        self.refilter_and_render();
    }

    fn apply_search(&mut self) {
        self.state.search_term = self.pending_search.trim().to_string();
        self.refilter_and_render();
    }

    fn refilter_and_render(&mut self) {
        self.state.refilter();
        debug!(
            "Filtered {} of {} jobs",
            self.state.filtered_jobs.len(),
            self.state.all_jobs.len()
        );
        self.render_jobs();
    }

    /// Re-render the grid. The panel only changes when the last load succeeded.
    fn render_jobs(&mut self) {
        if self.display != DisplayState::Loaded {
            return;
        }

        if self.state.filtered_jobs.is_empty() {
            self.view.set_html(Element::JobsGrid, String::new());
            show_panel(&mut self.view, Panel::Empty);
        } else {
            self.view
                .set_html(Element::JobsGrid, render_jobs_grid(&self.state.filtered_jobs));
            show_panel(&mut self.view, Panel::Jobs);
        }
    }

    // ===== Scraping =====

    pub fn trigger_scrape(&mut self) {
        if self.is_scrape_in_flight() {
            debug!("Scrape already in flight, ignoring trigger");
            return;
        }

        self.view.set_enabled(Element::TriggerScrapeButton, false);
        self.view.set_text(Element::TriggerScrapeButton, SCRAPE_BUSY_LABEL);

        let backend = Arc::clone(&self.backend);
        let request = self.scrape_request.clone();
        let handle = self
            .tasks
            .spawn(async move { Outcome::Scrape(backend.trigger_scrape(&request).await) });
        self.pending.insert(handle.id(), Pending::Scrape);
    }

    fn finish_scrape(&mut self, result: Result<(), ViewError>, now: Instant) {
        self.view.set_enabled(Element::TriggerScrapeButton, true);
        self.view.set_text(Element::TriggerScrapeButton, SCRAPE_IDLE_LABEL);

        match result {
            Ok(()) => {
                info!("Scrape accepted, reloading in {:?}", self.timings.reload_delay());
                self.view.notify(SCRAPE_STARTED_NOTICE);
                self.scheduled_reload = Some(now + self.timings.reload_delay());
            }
            Err(e) if e.is_network_like() => {
                error!("Error triggering scrape: {}", e);
                self.view.notify(SCRAPE_UNREACHABLE_NOTICE);
            }
            Err(e) => {
                error!("Scrape trigger rejected: {}", e);
                self.view.notify(SCRAPE_REJECTED_NOTICE);
            }
        }
    }

    // ===== Completions =====

    pub fn has_pending_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub async fn next_completion(&mut self) -> Option<TaskResult> {
        self.tasks.join_next_with_id().await
    }

    /// Apply every outstanding request outcome, in completion order.
    pub async fn settle(&mut self) {
        while let Some(result) = self.next_completion().await {
            self.complete(result, Instant::now());
        }
    }

    pub fn complete(&mut self, result: TaskResult, now: Instant) {
        self.apply_completion(result, now);
        self.publish_activity();
    }

    fn apply_completion(&mut self, result: TaskResult, now: Instant) {
        let (pending, outcome) = match result {
            Ok((id, outcome)) => match self.pending.remove(&id) {
                Some(pending) => (pending, outcome),
                None => {
                    warn!("Completion for unknown task {}", id);
                    return;
                }
            },
            Err(err) => match self.pending.remove(&err.id()) {
                Some(pending) => {
                    error!("Request task {} failed: {}", err.id(), err);
                    (pending, pending.failed(&err))
                }
                None => {
                    warn!("Unknown task {} failed: {}", err.id(), err);
                    return;
                }
            },
        };

        match (pending, outcome) {
            (Pending::Jobs { generation }, Outcome::Jobs(result)) => {
                self.finish_load(generation, result, now)
            }
            (Pending::Detail { generation, id }, Outcome::Detail(result)) => {
                self.finish_detail(generation, id, result)
            }
            (Pending::Scrape, Outcome::Scrape(result)) => self.finish_scrape(result, now),
            (pending, outcome) => {
                error!("Mismatched completion {:?} for {:?}", outcome, pending);
            }
        }
    }

    fn finish_load(&mut self, generation: u64, result: Result<Vec<JobSummary>, ViewError>, now: Instant) {
        if generation != self.load_generation {
            debug!(
                "Discarding superseded job load {} (current {})",
                generation, self.load_generation
            );
            return;
        }

        match result {
            Ok(jobs) => {
                info!("Loaded {} jobs", jobs.len());
                self.state.all_jobs = jobs;
                self.update_stats(today(), now);
                self.display = DisplayState::Loaded;
                self.refilter_and_render();
            }
            Err(e) => {
                error!("Error loading jobs: {}", e);
                let message = match e.to_string() {
                    m if m.trim().is_empty() => LOAD_ERROR_FALLBACK.to_string(),
                    m => m,
                };
                self.view.set_text(Element::ErrorMessage, &message);
                self.display = DisplayState::Error(message);
                show_panel(&mut self.view, Panel::Error);
            }
        }
    }

    fn finish_detail(&mut self, generation: u64, id: i64, result: Result<JobDetail, ViewError>) {
        if generation != self.detail_generation {
            debug!("Discarding superseded detail for job {}", id);
            return;
        }

        match result {
            Ok(detail) => {
                self.view
                    .set_html(Element::JobDetailContent, render_job_detail(&detail));
                self.view.set_visible(Element::JobModal, true);
            }
            Err(e) => {
                error!("Error loading job details for {}: {}", id, e);
                self.view.notify(DETAIL_ERROR_NOTICE);
            }
        }
    }

    // ===== Stats =====

    fn update_stats(&mut self, today: NaiveDate, now: Instant) {
        self.stats = JobStats::compute(&self.state.all_jobs, today);
        debug!("Stats: {:?}", self.stats);

        let duration = self.timings.stat_animation();
        let animation = StatsAnimation {
            started: now,
            next_frame: now + ANIMATION_FRAME,
            total: CounterAnimation::new(self.stats.total_jobs, duration),
            recent: CounterAnimation::new(self.stats.recent_jobs, duration),
        };
        self.animation = Some(animation);
        self.render_stats(now);
    }

    fn render_stats(&mut self, now: Instant) {
        let Some(mut animation) = self.animation else {
            return;
        };

        let elapsed = now.saturating_duration_since(animation.started);
        self.view.set_text(
            Element::TotalJobs,
            &animation.total.value_at(elapsed).to_string(),
        );
        self.view.set_text(
            Element::RecentJobs,
            &animation.recent.value_at(elapsed).to_string(),
        );

        if animation.total.is_finished(elapsed) && animation.recent.is_finished(elapsed) {
            self.animation = None;
        } else {
            animation.next_frame = now + ANIMATION_FRAME;
            self.animation = Some(animation);
        }
    }

    // ===== Timers =====

    /// Earliest instant at which `on_timer` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.search_debounce.deadline(),
            self.scheduled_reload,
            self.animation.map(|a| a.next_frame),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn on_timer(&mut self, now: Instant) {
        if self.search_debounce.fire_if_due(now) {
            self.apply_search();
        }

        if self.scheduled_reload.is_some_and(|at| now >= at) {
            self.scheduled_reload = None;
            info!("Reloading jobs after scrape trigger");
            self.load_jobs();
        }

        if self.animation.is_some_and(|a| now >= a.next_frame) {
            self.render_stats(now);
        }

        self.publish_activity();
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::Source;
    use crate::view::PageModel;
    use async_trait::async_trait;
    use chrono::Days;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted backend: each call pops the next queued response, optionally after a delay.
    #[derive(Default)]
    pub(crate) struct FakeBackend {
        jobs: Mutex<Vec<(Duration, Result<Vec<JobSummary>, ViewError>)>>,
        details: Mutex<Vec<(Duration, Result<JobDetail, ViewError>)>>,
        scrapes: Mutex<Vec<Result<(), ViewError>>>,
        pub(crate) scrape_calls: Mutex<Vec<ScrapeRequest>>,
        pub(crate) job_calls: Mutex<Vec<u32>>,
    }

    impl FakeBackend {
        pub(crate) fn push_jobs(&self, delay: Duration, result: Result<Vec<JobSummary>, ViewError>) {
            self.jobs.lock().unwrap().push((delay, result));
        }

        pub(crate) fn push_detail(&self, delay: Duration, result: Result<JobDetail, ViewError>) {
            self.details.lock().unwrap().push((delay, result));
        }

        pub(crate) fn push_scrape(&self, result: Result<(), ViewError>) {
            self.scrapes.lock().unwrap().push(result);
        }
    }

    fn pop_front<T>(queue: &Mutex<Vec<T>>) -> Option<T> {
        let mut queue = queue.lock().unwrap();
        (!queue.is_empty()).then(|| queue.remove(0))
    }

    #[async_trait]
    impl JobsBackend for FakeBackend {
        async fn recent_jobs(&self, days: u32) -> Result<Vec<JobSummary>, ViewError> {
            self.job_calls.lock().unwrap().push(days);
            let (delay, result) =
                pop_front(&self.jobs).unwrap_or((Duration::ZERO, Ok(Vec::new())));
            tokio::time::sleep(delay).await;
            result
        }

        async fn job_detail(&self, id: i64) -> Result<JobDetail, ViewError> {
            let (delay, result) = pop_front(&self.details)
                .unwrap_or((Duration::ZERO, Err(ViewError::http(404, format!("job {}", id)))));
            tokio::time::sleep(delay).await;
            result
        }

        async fn trigger_scrape(&self, request: &ScrapeRequest) -> Result<(), ViewError> {
            self.scrape_calls.lock().unwrap().push(request.clone());
            pop_front(&self.scrapes).unwrap_or(Ok(()))
        }
    }

    pub(crate) fn job(id: i64, title: &str, source: &str, age_days: Option<u64>) -> JobSummary {
        JobSummary {
            id,
            title: title.to_string(),
            company_name: Some(format!("Company {}", id)),
            location: Some("Remote".to_string()),
            salary_range: None,
            job_age_days: age_days.map(|d| d as i64),
            posted_date: age_days.and_then(|d| today().checked_sub_days(Days::new(d))),
            source: Some(Source::new(source)),
        }
    }

    fn detail(id: i64, title: &str) -> JobDetail {
        JobDetail {
            summary: job(id, title, "LinkedIn", Some(1)),
            description: Some("Write Rust".to_string()),
            skills: vec!["Rust".to_string()],
            url: format!("https://example.com/{}", id),
            scraped_at: None,
            application_count: None,
        }
    }

    fn controller(backend: &Arc<FakeBackend>) -> ViewController<PageModel> {
        let backend: Arc<dyn JobsBackend> = backend.clone();
        ViewController::new(backend, PageModel::new(), &ViewConfig::default())
    }

    fn ids(jobs: &[JobSummary]) -> Vec<i64> {
        jobs.iter().map(|j| j.id).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_load_populates_grid_and_stats() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_jobs(
            Duration::ZERO,
            Ok(vec![
                job(1, "Senior Engineer", "LinkedIn", Some(3)),
                job(2, "Senior Manager", "Indeed", Some(10)),
            ]),
        );

        let mut ctrl = controller(&backend);
        ctrl.start();
        assert_eq!(ctrl.view().visible_panel(), Some(Panel::Loading));

        ctrl.settle().await;

        assert_eq!(ctrl.display(), &DisplayState::Loaded);
        assert_eq!(ctrl.view().visible_panel(), Some(Panel::Jobs));
        assert_eq!(ctrl.stats().total_jobs, 2);
        assert_eq!(ctrl.stats().recent_jobs, 1);
        assert!(ctrl.view().html(Element::JobsGrid).contains("Senior Manager"));
        assert_eq!(*backend.job_calls.lock().unwrap(), vec![7]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_load_shows_empty_state() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_jobs(Duration::ZERO, Ok(Vec::new()));

        let mut ctrl = controller(&backend);
        ctrl.start();
        ctrl.settle().await;

        assert_eq!(ctrl.current_panel(), Panel::Empty);
        assert_eq!(ctrl.view().visible_panel(), Some(Panel::Empty));
        assert!(!ctrl.view().is_visible(Element::JobsGrid));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_load_keeps_previous_stats() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_jobs(
            Duration::ZERO,
            Ok(vec![job(1, "Engineer", "LinkedIn", Some(1))]),
        );
        backend.push_jobs(Duration::ZERO, Err(ViewError::http(500, "boom")));

        let mut ctrl = controller(&backend);
        ctrl.start();
        ctrl.settle().await;
        let before = ctrl.stats();

        ctrl.handle_event(UiEvent::Refresh, Instant::now());
        ctrl.settle().await;

        assert_eq!(ctrl.stats(), before);
        assert_eq!(ids(&ctrl.state().all_jobs), vec![1]);
        assert_eq!(ctrl.view().visible_panel(), Some(Panel::Error));
        assert_eq!(
            ctrl.view().text(Element::ErrorMessage),
            "HTTP error! status: 500"
        );
        assert!(matches!(ctrl.display(), DisplayState::Error(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_changes_do_not_leave_error_state() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_jobs(Duration::ZERO, Err(ViewError::Network("refused".to_string())));

        let mut ctrl = controller(&backend);
        ctrl.start();
        ctrl.settle().await;
        ctrl.set_source_filter("LinkedIn".to_string());

        assert_eq!(ctrl.view().visible_panel(), Some(Panel::Error));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_load_is_discarded() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_jobs(
            Duration::from_millis(500),
            Ok(vec![job(1, "Stale", "LinkedIn", Some(1))]),
        );
        backend.push_jobs(
            Duration::from_millis(10),
            Ok(vec![job(2, "Fresh", "LinkedIn", Some(1))]),
        );

        let mut ctrl = controller(&backend);
        ctrl.start();
        ctrl.set_day_range(30);
        ctrl.settle().await;

        assert_eq!(ids(&ctrl.state().all_jobs), vec![2]);
        assert_eq!(ctrl.state().day_range, 30);
        assert!(!ctrl.view().html(Element::JobsGrid).contains("Stale"));
        assert_eq!(*backend.job_calls.lock().unwrap(), vec![7, 30]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_day_range_is_ignored() {
        let backend = Arc::new(FakeBackend::default());
        let mut ctrl = controller(&backend);
        ctrl.set_day_range(0);
        ctrl.settle().await;

        assert_eq!(ctrl.state().day_range, 7);
        assert!(backend.job_calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_debounced() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_jobs(
            Duration::ZERO,
            Ok(vec![
                job(1, "Senior Engineer", "LinkedIn", Some(1)),
                job(2, "Senior Manager", "LinkedIn", Some(1)),
            ]),
        );

        let mut ctrl = controller(&backend);
        ctrl.start();
        ctrl.settle().await;

        let start = Instant::now();
        ctrl.handle_event(UiEvent::SearchInput("eng".to_string()), start);
        ctrl.handle_event(
            UiEvent::SearchInput("engineer".to_string()),
            start + Duration::from_millis(100),
        );

        ctrl.on_timer(start + Duration::from_millis(350));
        assert_eq!(ids(&ctrl.state().filtered_jobs), vec![1, 2]);
        assert_eq!(ctrl.state().search_term, "");

        ctrl.on_timer(start + Duration::from_millis(400));
        assert_eq!(ctrl.state().search_term, "engineer");
        assert_eq!(ids(&ctrl.state().filtered_jobs), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_filter_applies_immediately() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_jobs(
            Duration::ZERO,
            Ok(vec![
                job(1, "Engineer", "LinkedIn", Some(1)),
                job(2, "Engineer", "Indeed", Some(1)),
            ]),
        );

        let mut ctrl = controller(&backend);
        ctrl.start();
        ctrl.settle().await;

        ctrl.handle_event(UiEvent::SourceFilterChanged("Indeed".to_string()), Instant::now());
        assert_eq!(ids(&ctrl.state().filtered_jobs), vec![2]);

        ctrl.handle_event(UiEvent::SourceFilterChanged("Glassdoor".to_string()), Instant::now());
        assert_eq!(ctrl.view().visible_panel(), Some(Panel::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_change_takes_pending_search_along() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_jobs(
            Duration::ZERO,
            Ok(vec![
                job(1, "Engineer", "LinkedIn", Some(1)),
                job(2, "Engineer", "Indeed", Some(1)),
                job(3, "Manager", "Indeed", Some(1)),
            ]),
        );

        let mut ctrl = controller(&backend);
        ctrl.start();
        ctrl.settle().await;

        let now = Instant::now();
        ctrl.handle_event(UiEvent::SearchInput(" engineer ".to_string()), now);
        ctrl.handle_event(UiEvent::SourceFilterChanged("Indeed".to_string()), now);

        assert_eq!(ctrl.state().search_term, "engineer");
        assert_eq!(ids(&ctrl.state().filtered_jobs), vec![2]);

        ctrl.on_timer(now + Duration::from_millis(300));
        assert_eq!(ids(&ctrl.state().filtered_jobs), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_is_busy_until_work_settles() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_jobs(
            Duration::ZERO,
            Ok(vec![job(1, "Engineer", "LinkedIn", Some(1))]),
        );
        backend.push_detail(Duration::from_millis(50), Err(ViewError::http(404, "missing")));

        let mut ctrl = controller(&backend);
        ctrl.start();
        assert!(ctrl.view().is_busy());

        ctrl.settle().await;
        assert!(ctrl.is_busy(), "stats animation still running");
        assert!(ctrl.view().is_busy());

        let start = Instant::now();
        ctrl.on_timer(start + Duration::from_secs(2));
        assert_eq!(ctrl.view().text(Element::TotalJobs), "1");
        assert!(!ctrl.view().is_busy());

        let typed_at = start + Duration::from_secs(2);
        ctrl.handle_event(UiEvent::SearchInput("nomatch".to_string()), typed_at);
        assert!(ctrl.view().is_busy());
        ctrl.on_timer(typed_at + Duration::from_millis(300));
        assert_eq!(ctrl.view().visible_panel(), Some(Panel::Empty));
        assert!(!ctrl.view().is_busy());

        ctrl.handle_event(UiEvent::ShowDetail(1), Instant::now());
        assert!(ctrl.view().is_busy());
        ctrl.settle().await;
        assert_eq!(ctrl.view().notices(), [DETAIL_ERROR_NOTICE.to_string()]);
        assert!(!ctrl.view().is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_opens_overlay() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_detail(Duration::ZERO, Ok(detail(5, "<script>x</script>")));

        let mut ctrl = controller(&backend);
        ctrl.handle_event(UiEvent::ShowDetail(5), Instant::now());
        ctrl.settle().await;

        assert!(ctrl.view().is_visible(Element::JobModal));
        let html = ctrl.view().html(Element::JobDetailContent);
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>"));

        ctrl.handle_event(UiEvent::CloseDetail, Instant::now());
        assert!(!ctrl.view().is_visible(Element::JobModal));
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_failure_notifies_and_stays_closed() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_detail(Duration::ZERO, Err(ViewError::http(404, "missing")));

        let mut ctrl = controller(&backend);
        ctrl.load_job_detail(99);
        ctrl.settle().await;

        assert!(!ctrl.view().is_visible(Element::JobModal));
        assert_eq!(ctrl.view().notices(), [DETAIL_ERROR_NOTICE.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closing_overlay_discards_in_flight_detail() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_detail(Duration::from_millis(200), Ok(detail(5, "Late")));

        let mut ctrl = controller(&backend);
        ctrl.load_job_detail(5);
        ctrl.close_detail();
        ctrl.settle().await;

        assert!(!ctrl.view().is_visible(Element::JobModal));
        assert!(ctrl.view().notices().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scrape_http_error_reenables_control() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_jobs(
            Duration::ZERO,
            Ok(vec![job(1, "Engineer", "LinkedIn", Some(1))]),
        );
        backend.push_scrape(Err(ViewError::http(500, "scraper crashed")));

        let mut ctrl = controller(&backend);
        ctrl.start();
        ctrl.settle().await;

        ctrl.handle_event(UiEvent::TriggerScrape, Instant::now());
        assert!(!ctrl.view().is_enabled(Element::TriggerScrapeButton));
        assert_eq!(ctrl.view().text(Element::TriggerScrapeButton), SCRAPE_BUSY_LABEL);
        ctrl.settle().await;

        assert!(ctrl.view().is_enabled(Element::TriggerScrapeButton));
        assert_eq!(ctrl.view().text(Element::TriggerScrapeButton), SCRAPE_IDLE_LABEL);
        assert_eq!(ctrl.view().notices(), [SCRAPE_REJECTED_NOTICE.to_string()]);
        assert_eq!(ids(&ctrl.state().all_jobs), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scrape_network_error_uses_unreachable_notice() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_scrape(Err(ViewError::Network("connection refused".to_string())));

        let mut ctrl = controller(&backend);
        ctrl.trigger_scrape();
        ctrl.settle().await;

        assert!(ctrl.view().is_enabled(Element::TriggerScrapeButton));
        assert_eq!(ctrl.view().notices(), [SCRAPE_UNREACHABLE_NOTICE.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_scrape_schedules_reload() {
        let backend = Arc::new(FakeBackend::default());
        backend.push_scrape(Ok(()));

        let mut ctrl = controller(&backend);
        ctrl.trigger_scrape();
        ctrl.trigger_scrape();
        assert!(ctrl.is_scrape_in_flight());

        let sent_at = Instant::now();
        ctrl.settle().await;

        assert_eq!(backend.scrape_calls.lock().unwrap().len(), 1);
        assert_eq!(
            backend.scrape_calls.lock().unwrap()[0],
            ScrapeRequest {
                source: "linkedin".to_string(),
                max_results: 10,
                max_job_age_days: 1,
            }
        );
        assert_eq!(ctrl.view().notices(), [SCRAPE_STARTED_NOTICE.to_string()]);

        let reload_at = ctrl.next_deadline().unwrap();
        assert!(reload_at >= sent_at + Duration::from_secs(2));

        ctrl.on_timer(reload_at - Duration::from_millis(1));
        assert!(backend.job_calls.lock().unwrap().is_empty());

        ctrl.on_timer(reload_at);
        ctrl.settle().await;
        assert_eq!(*backend.job_calls.lock().unwrap(), vec![7]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stat_animation_ends_on_computed_values() {
        let backend = Arc::new(FakeBackend::default());
        let jobs = (1..=40)
            .map(|id| job(id, "Engineer", "LinkedIn", Some((id % 12) as u64)))
            .collect();
        backend.push_jobs(Duration::ZERO, Ok(jobs));

        let mut ctrl = controller(&backend);
        ctrl.start();
        ctrl.settle().await;

        let stats = ctrl.stats();
        assert_eq!(stats.total_jobs, 40);
        assert_eq!(ctrl.view().text(Element::TotalJobs), "0");

        let start = Instant::now();
        ctrl.on_timer(start + Duration::from_millis(500));
        let midway: u64 = ctrl.view().text(Element::TotalJobs).parse().unwrap();
        assert!(midway > 0 && midway < 40);

        ctrl.on_timer(start + Duration::from_millis(1500));
        assert_eq!(ctrl.view().text(Element::TotalJobs), "40");
        assert_eq!(
            ctrl.view().text(Element::RecentJobs),
            stats.recent_jobs.to_string()
        );
        assert_eq!(ctrl.next_deadline(), None);
    }
}
