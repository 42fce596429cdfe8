//! Ping command - notify IndexNow engines

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};
use siteseo_core::Config;
use siteseo_indexnow::{Notifier, PingOutcome};

/// Run the ping command.
///
/// Succeeds when at least one engine accepted the URLs.
pub async fn run(config_path: &Path, urls: &[String]) -> Result<()> {
    tracing::info!(?config_path, count = urls.len(), "Pinging IndexNow");

    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    let notifier = Notifier::new(config).wrap_err("Failed to create IndexNow client")?;

    let outcome = notifier.ping(urls).await;
    print_outcome(&outcome);

    if !outcome.success {
        bail!("IndexNow ping failed: {}", outcome.message);
    }

    Ok(())
}

fn print_outcome(outcome: &PingOutcome) {
    println!();
    for url in &outcome.urls {
        println!("  → {url}");
    }
    if !outcome.urls.is_empty() {
        println!();
    }
    for result in &outcome.results {
        match (result.success, result.status, &result.error) {
            (true, Some(status), _) => println!("  ✓ {} ({status})", result.engine),
            (_, _, Some(error)) => println!("  ✗ {}: {error}", result.engine),
            _ => println!("  ✗ {}", result.engine),
        }
    }
    println!();
    println!("  {}", outcome.message);
    println!();
}
