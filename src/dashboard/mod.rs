//! Dashboard module
//!
//! The overview page: metric cards, the revenue trend chart, payment and
//! pharmacist charts, and the ranking tables, all recomputed for the
//! filters supplied in the query string.

mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
