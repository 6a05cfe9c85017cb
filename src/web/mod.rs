// src/web/mod.rs
//! Serves the job board page and turns form posts into UI events.

pub mod page;
pub mod types;

pub use types::*;

use anyhow::{Context, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::figment::Figment;
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::ViewConfig;
use crate::controller::UiEvent;
use crate::core::{JobsBackend, ServiceClient};
use crate::runtime::spawn_controller;
use crate::view::{PageModel, SharedView};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "Content-Type"));
    }
}

async fn dispatch(state: &WebState, event: UiEvent) -> Result<Redirect, Status> {
    state.view.queue_event();
    state.events.send(event).await.map_err(|e| {
        error!("View controller is not running: {}", e);
        state.view.unqueue_event();
        Status::ServiceUnavailable
    })?;
    Ok(Redirect::to("/"))
}

#[get("/")]
pub fn index(state: &State<WebState>) -> RawHtml<String> {
    let page = state.view.snapshot_for_display();
    let inputs = state.inputs().clone();
    RawHtml(page::render_page(&page, &inputs))
}

#[get("/state")]
pub fn page_state(state: &State<WebState>) -> Json<PageModel> {
    Json(state.view.snapshot())
}

#[post("/search", data = "<form>")]
pub async fn search(form: Form<SearchForm>, state: &State<WebState>) -> Result<Redirect, Status> {
    let term = form.into_inner().q;
    state.inputs().search = term.clone();
    dispatch(state, UiEvent::SearchInput(term)).await
}

#[post("/source", data = "<form>")]
pub async fn source(form: Form<SourceForm>, state: &State<WebState>) -> Result<Redirect, Status> {
    let source = form.into_inner().source;
    state.inputs().source = source.clone();
    dispatch(state, UiEvent::SourceFilterChanged(source)).await
}

#[post("/days", data = "<form>")]
pub async fn days(form: Form<DaysForm>, state: &State<WebState>) -> Result<Redirect, Status> {
    let days = form.into_inner().days;
    if days == 0 {
        return Err(Status::BadRequest);
    }
    state.inputs().days = days;
    dispatch(state, UiEvent::DayRangeChanged(days)).await
}

#[post("/refresh")]
pub async fn refresh(state: &State<WebState>) -> Result<Redirect, Status> {
    dispatch(state, UiEvent::Refresh).await
}

#[post("/scrape")]
pub async fn scrape(state: &State<WebState>) -> Result<Redirect, Status> {
    dispatch(state, UiEvent::TriggerScrape).await
}

#[get("/jobs/<id>")]
pub async fn show_job(id: i64, state: &State<WebState>) -> Result<Redirect, Status> {
    dispatch(state, UiEvent::ShowDetail(id)).await
}

#[post("/close")]
pub async fn close_detail(state: &State<WebState>) -> Result<Redirect, Status> {
    dispatch(state, UiEvent::CloseDetail).await
}

#[get("/health")]
pub fn health() -> &'static str {
    "ok"
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(404)]
pub fn not_found() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Resource not found", "NOT_FOUND"))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Invalid form data", "BAD_REQUEST"))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Internal server error", "INTERNAL_ERROR"))
}

pub fn build_rocket(state: WebState, figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .register("/", catchers![not_found, unprocessable, internal_error])
        .mount(
            "/",
            routes![
                index,
                page_state,
                search,
                source,
                days,
                refresh,
                scrape,
                show_job,
                close_detail,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: ViewConfig) -> Result<()> {
    let backend: Arc<dyn JobsBackend> =
        Arc::new(ServiceClient::from_config(&config).context("Failed to build service client")?);

    let view = SharedView::new();
    let (events, controller) = spawn_controller(backend, view.clone(), &config);
    let state = WebState::new(events, view, config.default_day_range);

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", config.port));

    info!("Starting JobCompass web view");
    info!("Jobs API: {}", config.api_base_url);
    info!("Scraper service: {}", config.scraper_base_url);
    info!("Server: http://0.0.0.0:{}", config.port);

    let result = build_rocket(state, figment).launch().await;
    controller.abort();

    result
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))
}
