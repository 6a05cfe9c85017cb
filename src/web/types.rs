// src/web/types.rs
use rocket::form::FromForm;
use rocket::serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::mpsc;

use crate::controller::UiEvent;
use crate::view::SharedView;

pub const SOURCE_OPTIONS: [&str; 3] = ["LinkedIn", "Glassdoor", "Indeed"];
pub const DAY_RANGE_OPTIONS: [u32; 5] = [1, 3, 7, 14, 30];

#[derive(FromForm)]
pub struct SearchForm {
    pub q: String,
}

#[derive(FromForm)]
pub struct SourceForm {
    pub source: String,
}

#[derive(FromForm)]
pub struct DaysForm {
    pub days: u32,
}

/// Last values submitted through the filter forms, echoed back into the page inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInputs {
    pub search: String,
    pub source: String,
    pub days: u32,
}

pub struct WebState {
    pub events: mpsc::Sender<UiEvent>,
    pub view: SharedView,
    inputs: Mutex<FormInputs>,
}

impl WebState {
    pub fn new(events: mpsc::Sender<UiEvent>, view: SharedView, default_days: u32) -> Self {
        Self {
            events,
            view,
            inputs: Mutex::new(FormInputs {
                search: String::new(),
                source: String::new(),
                days: default_days,
            }),
        }
    }

    pub fn inputs(&self) -> MutexGuard<'_, FormInputs> {
        self.inputs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
}

impl ErrorResponse {
    pub fn new(error: &str, error_code: &str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            error_code: error_code.to_string(),
        }
    }
}
