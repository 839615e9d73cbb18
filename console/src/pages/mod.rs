//! Presentation rules shared by the console screens: the pagination footer,
//! money entry and display, and the stale-response and cancellation guards
//! list views wrap their requests in.

pub mod loader;
pub mod money;
pub mod pagination;

pub use loader::{LatestOnly, Ticket, ViewTasks};
pub use money::{format_minor_as_major, parse_major_to_minor};
pub use pagination::{PageWindow, paginate};
