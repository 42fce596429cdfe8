//! Static routes of the marketing site.
//!
//! The table is hand-maintained: a new page needs an entry here before it
//! shows up in the pages sitemap or in site-page pings.

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

/// A hand-maintained static route.
#[derive(Debug, Clone, Copy)]
pub struct StaticRoute {
    pub path: &'static str,
    pub changefreq: ChangeFreq,
    pub priority: f32,

    /// Whether the route is part of a site-page IndexNow ping.
    pub notify: bool,
}

const fn route(path: &'static str, changefreq: ChangeFreq, priority: f32, notify: bool) -> StaticRoute {
    StaticRoute {
        path,
        changefreq,
        priority,
        notify,
    }
}

/// Every static route, in sitemap order.
pub const STATIC_ROUTES: &[StaticRoute] = &[
    route("/", ChangeFreq::Weekly, 1.0, true),
    route("/about", ChangeFreq::Monthly, 0.8, true),
    route("/products", ChangeFreq::Monthly, 0.9, true),
    route("/apps", ChangeFreq::Monthly, 0.9, true),
    route("/it-services", ChangeFreq::Monthly, 0.9, true),
    route("/case-studies", ChangeFreq::Monthly, 0.8, true),
    route("/contact", ChangeFreq::Yearly, 0.7, true),
    route("/blog", ChangeFreq::Daily, 0.9, true),
    route("/privacy-policy", ChangeFreq::Yearly, 0.3, false),
    route("/terms-of-service", ChangeFreq::Yearly, 0.3, false),
];

/// Paths submitted when the top-level site pages are pinged.
pub fn site_pages() -> Vec<&'static str> {
    STATIC_ROUTES
        .iter()
        .filter(|r| r.notify)
        .map(|r| r.path)
        .collect()
}
