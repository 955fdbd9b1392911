//! The endpoints for the web app.

/// The root of the app, redirects to the dashboard.
pub const ROOT: &str = "/";

/// The dashboard overview page.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// The daily and pharmacist reports page.
pub const REPORTS_VIEW: &str = "/reports";

/// JSON array of the canonical sales records.
pub const SALES_DATA_API: &str = "/api/sales-data";

/// JSON metrics for the supplied filters.
pub const METRICS_API: &str = "/api/metrics";

/// Reloads the sales CSV from disk.
pub const REFRESH_API: &str = "/api/refresh";

/// Liveness check.
pub const HEALTH_API: &str = "/api/health";
