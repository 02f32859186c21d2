//! Run the demo scenario against in-memory storage.
//!
//! Usage:
//!   rate-demo [--users <n>] [--seed <n>] [--html]
//!
//! Each simulated user views every instance and, when it is shown, votes.
//! Set RUST_LOG=likert_rate=debug to watch the draws.

use anyhow::Context;
use likert_rate::random::SeededRandom;
use likert_rate::storage::MemoryStorage;
use likert_rate::telemetry::LoggingTelemetrySink;
use likert_rate::{list_demo_instances, FeedbackWidget};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let users: usize = flag_value(&args, "--users")?.unwrap_or(20);
    let seed: u64 = flag_value(&args, "--seed")?.unwrap_or(7);
    let show_html = args.iter().any(|a| a == "--html");

    let storage = Arc::new(MemoryStorage::new());
    let random = Arc::new(SeededRandom::new(seed));
    let telemetry = Arc::new(LoggingTelemetrySink);

    for scenario in list_demo_instances() {
        println!("=== {} ===", scenario.name);
        for (n, config) in scenario.instances.into_iter().enumerate() {
            let widget = FeedbackWidget::builder(format!("{}/{}", scenario.name, n))
                .config(config)
                .storage(storage.clone())
                .telemetry(telemetry.clone())
                .random(random.clone())
                .build()?;

            let mut shown = 0;
            for u in 0..users {
                let user = format!("user-{}", u);
                let view = widget.view(&user).await?;
                let Some(prompt) = view.prompt() else { continue };
                shown += 1;
                if show_html && u == 0 {
                    println!("{}", view.render_html());
                }
                let vote = (u * 7 + n) % prompt.scale.len();
                widget
                    .vote(&user, vote as i64)
                    .await
                    .with_context(|| format!("vote by {} on {}", user, widget.instance_id()))?;
            }

            println!(
                "{}: shown to {}/{} users, tally {:?}",
                widget.instance_id(),
                shown,
                users,
                widget.tally().await?
            );
        }
    }
    Ok(())
}

fn flag_value<T: std::str::FromStr>(args: &[String], flag: &str) -> anyhow::Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match args.iter().position(|a| a == flag) {
        Some(i) => {
            let raw = args
                .get(i + 1)
                .with_context(|| format!("{} needs a value", flag))?;
            Ok(Some(raw.parse().with_context(|| format!("bad value for {}", flag))?))
        }
        None => Ok(None),
    }
}
