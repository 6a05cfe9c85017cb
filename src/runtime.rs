// src/runtime.rs
//! Single-task event loop that owns the view controller.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::info;

use crate::config::ViewConfig;
use crate::controller::{UiEvent, ViewController};
use crate::core::JobsBackend;
use crate::view::ViewBinding;

const EVENT_BUFFER: usize = 64;
const IDLE_WAIT: Duration = Duration::from_secs(3600);

/// Drive `controller` until the event channel closes.
///
/// UI events, request completions and timer deadlines are all handled on this
/// one task, so the controller never needs a lock.
pub async fn run<V: ViewBinding>(mut controller: ViewController<V>, mut events: mpsc::Receiver<UiEvent>) {
    controller.start();

    loop {
        let deadline = controller.next_deadline();
        let wake_at = deadline.unwrap_or_else(|| Instant::now() + IDLE_WAIT);
        let has_tasks = controller.has_pending_tasks();

        tokio::select! {
            event = events.recv() => match event {
                Some(event) => controller.handle_event(event, Instant::now()),
                None => {
                    info!("UI event channel closed, stopping view controller");
                    break;
                }
            },
            Some(result) = controller.next_completion(), if has_tasks => {
                controller.complete(result, Instant::now());
            }
            _ = sleep_until(wake_at), if deadline.is_some() => {
                controller.on_timer(Instant::now());
            }
        }
    }
}

/// Build a controller over `view` and run it on its own task.
pub fn spawn_controller<V>(
    backend: Arc<dyn JobsBackend>,
    view: V,
    config: &ViewConfig,
) -> (mpsc::Sender<UiEvent>, JoinHandle<()>)
where
    V: ViewBinding + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(EVENT_BUFFER);
    let controller = ViewController::new(backend, view, config);
    let handle = tokio::spawn(run(controller, receiver));
    (sender, handle)
}
