//! siteseo CLI Library
//!
//! This library provides the core functionality for the siteseo CLI. It is
//! used by the binary entry point while also exposing public APIs for
//! integration purposes.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, validate, ping, serve)
//! - [`server`] - HTTP surface for IndexNow pings
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use siteseo::cmd;
//!
//! // Generate every SEO artifact
//! cmd::build::run(Path::new("siteseo.json"), Path::new("content"), Path::new("public")).unwrap();
//! ```

pub mod cmd;
pub mod server;

// Re-export core types for convenience
pub use siteseo_core::{Config, ContentStore};
pub use siteseo_generator::{BuildStats, Builder};
pub use siteseo_indexnow::{Notifier, PingOutcome};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
