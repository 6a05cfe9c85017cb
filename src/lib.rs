//! JobCompass web view: loads job listings from the Jobs API, filters and
//! renders them, shows job details and triggers manual scrapes.

pub mod config;
pub mod controller;
pub mod core;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod runtime;
pub mod stats;
pub mod types;
pub mod view;
pub mod web;

pub use config::ViewConfig;
pub use controller::{DisplayState, UiEvent, ViewController, ViewState};
pub use error::ViewError;
pub use web::start_web_server;
