/*!

This program waits for a real EC2 instance's status checks to pass, the same view that the
console's "Status check" column shows. Pass an instance id as the first argument; credentials
and region come from the usual AWS environment. Press Ctrl-C to cancel the wait cleanly:
`cargo run --example ec2_instance_status -- i-0123456789abcdef0`.

!*/

use aws_sdk_ec2::error::DescribeInstanceStatusError;
use aws_sdk_ec2::output::DescribeInstanceStatusOutput;
use aws_sdk_ec2::types::SdkError;
use env_logger::Builder;
use log::{info, LevelFilter};
use status_waiter::{
    wait_for_status, FetchResult, Interval, Options, ProgressMeta, Status, WaitError,
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    init_logger();
    let instance_id = match std::env::args().nth(1) {
        Some(id) => id,
        None => {
            eprintln!("Usage: ec2_instance_status <instance-id>");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(instance_id).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run(instance_id: String) -> Result<(), WaitError<SdkError<DescribeInstanceStatusError>>> {
    let config = aws_config::from_env().load().await;
    let ec2_client = aws_sdk_ec2::Client::new(&config);

    // Ctrl-C cancels the wait instead of killing the process mid-poll.
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling the wait");
            interrupt.cancel();
        }
    });

    let fetch = move || {
        let client = ec2_client.clone();
        let instance_id = instance_id.clone();
        async move {
            let output = client
                .describe_instance_status()
                .instance_ids(instance_id)
                .include_all_instances(true)
                .send()
                .await?;
            Ok(status_of(output))
        }
    };

    let options = Options {
        timeout: Duration::from_secs(600),
        interval: Interval::Fixed(Duration::from_secs(15)),
        progress_interval: Duration::from_secs(60),
        success_states: vec![Status::new("ok")],
        transitional_states: vec![
            Status::new("initializing"),
            Status::new("insufficient-data"),
        ],
        progress_sink: Some(Box::new(
            |result: &FetchResult<DescribeInstanceStatusOutput>, meta: &ProgressMeta| {
                info!(
                    "Still waiting: instance status '{}' after {:?}",
                    result.status, meta.elapsed
                );
            },
        )),
    };

    info!("Waiting for the instance's status checks to pass (Ctrl-C cancels)");
    let outcome = wait_for_status(&cancel, fetch, options).await?;
    info!("Instance status is '{}'", outcome.status);
    Ok(())
}

/// Pulls the instance-status summary out of a describe response. An instance that has not
/// started reporting yet describes to an empty list, which counts as still initializing.
fn status_of(output: DescribeInstanceStatusOutput) -> FetchResult<DescribeInstanceStatusOutput> {
    let status = output
        .instance_statuses()
        .and_then(|statuses| statuses.first())
        .and_then(|status| status.instance_status())
        .and_then(|summary| summary.status())
        .map(|status| status.as_str().to_string())
        .unwrap_or_else(|| "initializing".to_string());
    FetchResult::with_value(status, output)
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
