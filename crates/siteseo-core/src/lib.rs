//! siteseo Core Library
//!
//! Core types, configuration, and error handling for the siteseo SEO
//! artifact generator and IndexNow notifier.

pub mod config;
pub mod content;
pub mod error;
pub mod routes;

pub use config::Config;
pub use content::{App, BlogPost, ContentStore, CtaLink, ServiceCatalog, SiteEntry, newest_first, slugify};
pub use error::{CoreError, Result};
pub use routes::{STATIC_ROUTES, site_pages};
