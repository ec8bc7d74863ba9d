//! DTOs used by the dashboard landing pages.

use serde::Serialize;

use crate::domain::resource::Section;

/// Link to a resource listing in the sidebar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub title: &'static str,
    pub path: String,
    pub section: Section,
}

/// Single counter on the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatCard {
    pub label: String,
    pub value: String,
}

/// Data required to render the dashboard index.
#[derive(Debug, Serialize)]
pub struct DashboardPageData {
    pub stats: Vec<StatCard>,
    pub links: Vec<NavLink>,
    /// Set when the counters could not be loaded.
    pub stats_error: Option<String>,
}
