//! Console route table, history, and the admin route guard.
//!
//! DESIGN
//! ======
//! Routes are a closed enum. `Route::parse` maps any path onto it (query
//! strings ignored, unknown paths fall back to the dashboard), so navigation
//! can never land on something the guard does not know about.

pub mod guard;
pub mod history;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub use guard::{GuardDecision, RouteGuard, admin_guard, login_guard};
pub use history::{History, NavigationMode, Navigator};

/// Every screen the console can show.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Users,
    UserDetail(String),
    Mechanics,
    MechanicDetail(String),
    Bookings,
    BookingDetail(String),
    Transactions,
    Payouts,
}

impl Route {
    /// Canonical path for this route. Ids are percent-encoded.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_owned(),
            Self::Dashboard => "/".to_owned(),
            Self::Users => "/users".to_owned(),
            Self::UserDetail(id) => format!("/users/{}", urlencoding::encode(id)),
            Self::Mechanics => "/mechanics".to_owned(),
            Self::MechanicDetail(id) => format!("/mechanics/{}", urlencoding::encode(id)),
            Self::Bookings => "/bookings".to_owned(),
            Self::BookingDetail(id) => format!("/bookings/{}", urlencoding::encode(id)),
            Self::Transactions => "/transactions".to_owned(),
            Self::Payouts => "/payouts".to_owned(),
        }
    }

    /// Match a path against the route table. Anything unmatched is the
    /// dashboard.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["login"] => Self::Login,
            ["users"] => Self::Users,
            ["users", id] => Self::UserDetail(decode_segment(id)),
            ["mechanics"] => Self::Mechanics,
            ["mechanics", id] => Self::MechanicDetail(decode_segment(id)),
            ["bookings"] => Self::Bookings,
            ["bookings", id] => Self::BookingDetail(decode_segment(id)),
            ["transactions"] => Self::Transactions,
            ["payouts"] => Self::Payouts,
            _ => Self::Dashboard,
        }
    }

    /// Whether the admin guard sits in front of this route.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), std::borrow::Cow::into_owned)
}
