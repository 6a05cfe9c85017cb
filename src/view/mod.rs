// src/view/mod.rs
//! View binding: logical page elements and the interface the controller drives

pub mod memory;
pub mod render;

pub use memory::{PageModel, SharedView};

use serde::{Deserialize, Serialize};

/// Logical page elements. `dom_id` gives the identifier used in the page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Element {
    JobsGrid,
    LoadingState,
    ErrorState,
    ErrorMessage,
    EmptyState,
    TotalJobs,
    RecentJobs,
    JobModal,
    JobDetailContent,
    TriggerScrapeButton,
}

impl Element {
    pub const ALL: [Element; 10] = [
        Element::JobsGrid,
        Element::LoadingState,
        Element::ErrorState,
        Element::ErrorMessage,
        Element::EmptyState,
        Element::TotalJobs,
        Element::RecentJobs,
        Element::JobModal,
        Element::JobDetailContent,
        Element::TriggerScrapeButton,
    ];

    pub fn dom_id(self) -> &'static str {
        match self {
            Element::JobsGrid => "jobsGrid",
            Element::LoadingState => "loadingState",
            Element::ErrorState => "errorState",
            Element::ErrorMessage => "errorMessage",
            Element::EmptyState => "emptyState",
            Element::TotalJobs => "totalJobs",
            Element::RecentJobs => "recentJobs",
            Element::JobModal => "jobModal",
            Element::JobDetailContent => "jobDetailContent",
            Element::TriggerScrapeButton => "triggerScrapeBtn",
        }
    }
}

/// The four mutually exclusive content panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Panel {
    Loading,
    Error,
    Empty,
    Jobs,
}

impl Panel {
    pub const ALL: [Panel; 4] = [Panel::Loading, Panel::Error, Panel::Empty, Panel::Jobs];

    pub fn element(self) -> Element {
        match self {
            Panel::Loading => Element::LoadingState,
            Panel::Error => Element::ErrorState,
            Panel::Empty => Element::EmptyState,
            Panel::Jobs => Element::JobsGrid,
        }
    }
}

/// Operations the controller performs on the page.
pub trait ViewBinding {
    fn set_visible(&mut self, element: Element, visible: bool);

    /// Plain text content; implementations must not interpret markup.
    fn set_text(&mut self, element: Element, text: &str);

    /// Pre-escaped markup produced by [`render`].
    fn set_html(&mut self, element: Element, html: String);

    fn set_enabled(&mut self, element: Element, enabled: bool);

    /// Blocking user notification.
    fn notify(&mut self, message: &str);

    /// Whether the controller still has work that will change the page.
    fn set_busy(&mut self, busy: bool);

    /// Called after the controller has applied a UI event.
    fn event_handled(&mut self) {}
}

/// Show exactly one panel and hide the other three.
pub fn show_panel<V: ViewBinding + ?Sized>(view: &mut V, panel: Panel) {
    for candidate in Panel::ALL {
        view.set_visible(candidate.element(), candidate == panel);
    }
}
