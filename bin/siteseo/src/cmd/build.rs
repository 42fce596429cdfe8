//! Build command - generates every SEO artifact

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use siteseo_core::Config;
use siteseo_generator::Builder;

/// Run the build command.
///
/// Renders sitemaps, feeds and robots.txt from the content directory into
/// the output directory.
pub fn run(config_path: &Path, content: &Path, output: &Path) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?content, ?output, "Starting build");

    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let index_now = config.index_now.enabled;
    let stats = Builder::new(config, content, output)
        .build()
        .wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Posts:      {}", stats.posts);
    println!("  Apps:       {}", stats.apps);
    println!("  Artifacts:  {} (+ .gz)", stats.artifacts);
    if index_now {
        println!("  Changed:    {}", stats.changed);
    }
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}
