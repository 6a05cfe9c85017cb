// src/view/memory.rs
//! In-memory page model, used by the web server and by tests

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{Element, Panel, ViewBinding};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementState {
    pub visible: bool,
    pub enabled: bool,
    pub text: String,
    pub html: String,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            visible: false,
            enabled: true,
            text: String::new(),
            html: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageModel {
    elements: BTreeMap<Element, ElementState>,
    notices: Vec<String>,
    busy: bool,
    queued_events: u32,
}

impl PageModel {
    pub fn new() -> Self {
        let elements = Element::ALL
            .into_iter()
            .map(|element| (element, ElementState::default()))
            .collect();

        Self {
            elements,
            notices: Vec::new(),
            busy: false,
            queued_events: 0,
        }
    }

    pub fn element(&self, element: Element) -> ElementState {
        self.elements.get(&element).cloned().unwrap_or_default()
    }

    pub fn is_visible(&self, element: Element) -> bool {
        self.element(element).visible
    }

    pub fn is_enabled(&self, element: Element) -> bool {
        self.element(element).enabled
    }

    pub fn text(&self, element: Element) -> String {
        self.element(element).text
    }

    pub fn html(&self, element: Element) -> String {
        self.element(element).html
    }

    /// The single visible panel, if any.
    pub fn visible_panel(&self) -> Option<Panel> {
        let mut visible = Panel::ALL
            .into_iter()
            .filter(|panel| self.is_visible(panel.element()));
        match (visible.next(), visible.next()) {
            (Some(panel), None) => Some(panel),
            _ => None,
        }
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// True while the page may still change without further input: events
    /// posted but not yet handled, or controller work still outstanding.
    pub fn is_settling(&self) -> bool {
        self.is_busy() || self.queued_events > 0
    }

    pub fn queue_event(&mut self) {
        self.queued_events += 1;
    }

    fn entry(&mut self, element: Element) -> &mut ElementState {
        self.elements.entry(element).or_default()
    }
}

impl ViewBinding for PageModel {
    fn set_visible(&mut self, element: Element, visible: bool) {
        self.entry(element).visible = visible;
    }

    fn set_text(&mut self, element: Element, text: &str) {
        let state = self.entry(element);
        state.text = text.to_string();
        state.html.clear();
    }

    fn set_html(&mut self, element: Element, html: String) {
        let state = self.entry(element);
        state.html = html;
        state.text.clear();
    }

    fn set_enabled(&mut self, element: Element, enabled: bool) {
        self.entry(element).enabled = enabled;
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn event_handled(&mut self) {
        self.queued_events = self.queued_events.saturating_sub(1);
    }
}

/// A `PageModel` shared between the controller task and request handlers.
#[derive(Debug, Clone, Default)]
pub struct SharedView {
    inner: Arc<Mutex<PageModel>>,
}

impl SharedView {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PageModel::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageModel> {
        // A panic while holding the lock leaves the model usable; recover it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> PageModel {
        self.lock().clone()
    }

    /// Snapshot the page and drain pending notices in one step.
    pub fn snapshot_for_display(&self) -> PageModel {
        let mut guard = self.lock();
        let snapshot = guard.clone();
        guard.take_notices();
        snapshot
    }

    /// Record an event on its way to the controller.
    pub fn queue_event(&self) {
        self.lock().queue_event();
    }

    /// Forget a queued event that never reached the controller.
    pub fn unqueue_event(&self) {
        self.lock().event_handled();
    }
}

impl ViewBinding for SharedView {
    fn set_visible(&mut self, element: Element, visible: bool) {
        self.lock().set_visible(element, visible);
    }

    fn set_text(&mut self, element: Element, text: &str) {
        self.lock().set_text(element, text);
    }

    fn set_html(&mut self, element: Element, html: String) {
        self.lock().set_html(element, html);
    }

    fn set_enabled(&mut self, element: Element, enabled: bool) {
        self.lock().set_enabled(element, enabled);
    }

    fn notify(&mut self, message: &str) {
        self.lock().notify(message);
    }

    fn set_busy(&mut self, busy: bool) {
        self.lock().set_busy(busy);
    }

    fn event_handled(&mut self) {
        self.lock().event_handled();
    }
}
