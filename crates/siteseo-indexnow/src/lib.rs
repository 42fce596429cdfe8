//! siteseo IndexNow Library
//!
//! Notifies search engines about changed URLs through the IndexNow protocol.
//!
//! # Modules
//!
//! - [`payload`] - Payload construction and URL normalization
//! - [`notifier`] - Engine fan-out and result aggregation

pub mod notifier;
pub mod payload;

pub use notifier::{EngineResult, NotifyError, Notifier, PingOutcome, SkipReason};
pub use payload::{IndexNowPayload, absolute_url};
