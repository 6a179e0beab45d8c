/*!

This program simulates waiting for a machine-image import task to finish. A fake task advances
through `queued`, `converting`, and `booting` on a timer while the waiter polls it until it
reports `completed`; progress is logged along the way and the final result is printed as JSON.
No credentials or network access are needed: `cargo run --example image_import`.

!*/

use env_logger::Builder;
use log::{info, LevelFilter};
use serde::Serialize;
use status_waiter::{
    wait_for_status, FetchResult, Interval, Options, ProgressMeta, Status, WaitError,
};
use std::convert::Infallible;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// What the fake import API reports about the task.
#[derive(Debug, Clone, Serialize)]
struct ImportDetails {
    image_id: String,
    progress_percent: u8,
}

/// A fake import task that advances through its lifecycle on a wall-clock timer.
struct ImportTask {
    started: Instant,
}

impl ImportTask {
    fn begin() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    fn poll(&self) -> FetchResult<ImportDetails> {
        let elapsed = self.started.elapsed();
        let (status, progress_percent) = if elapsed < Duration::from_millis(750) {
            ("queued", 0)
        } else if elapsed < Duration::from_millis(1500) {
            ("converting", 45)
        } else if elapsed < Duration::from_millis(2250) {
            ("booting", 90)
        } else {
            ("completed", 100)
        };
        FetchResult::with_value(
            status,
            ImportDetails {
                image_id: "import-0123456789abcdef0".to_string(),
                progress_percent,
            },
        )
    }
}

#[tokio::main]
async fn main() {
    init_logger();
    if let Err(e) = run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), WaitError<Infallible>> {
    let task = ImportTask::begin();
    let fetch = move || {
        let result = task.poll();
        async move { Ok::<_, Infallible>(result) }
    };

    let options = Options {
        timeout: Duration::from_secs(30),
        interval: Interval::Fixed(Duration::from_millis(250)),
        progress_interval: Duration::from_millis(500),
        success_states: vec![Status::new("completed")],
        transitional_states: vec![
            Status::new("queued"),
            Status::new("converting"),
            Status::new("booting"),
        ],
        progress_sink: Some(Box::new(
            |result: &FetchResult<ImportDetails>, meta: &ProgressMeta| {
                info!(
                    "Still waiting: status '{}' after {} attempts ({:?} elapsed)",
                    result.status, meta.attempts, meta.elapsed
                );
            },
        )),
    };

    let cancel = CancellationToken::new();
    let outcome = wait_for_status(&cancel, fetch, options).await?;

    info!("Import reached '{}'", outcome.status);
    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Unable to render the result as JSON: {}", e),
    }
    Ok(())
}

/// Extract the value of `RUST_LOG` if it exists, otherwise log this example and the waiter at
/// reasonable levels.
fn init_logger() {
    match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env().init();
        }
        None => {
            // RUST_LOG does not exist; use default log levels for these crates only.
            Builder::new()
                .filter(Some(env!("CARGO_CRATE_NAME")), LevelFilter::Info)
                .filter(Some("status_waiter"), LevelFilter::Debug)
                .init();
        }
    }
}
