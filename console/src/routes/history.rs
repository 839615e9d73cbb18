//! Navigation history.

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

use std::sync::Mutex;

use super::Route;

/// Whether a navigation adds a history entry or overwrites the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationMode {
    Push,
    Replace,
}

/// Something that can move the console between routes.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: Route, mode: NavigationMode);
    fn current(&self) -> Route;
}

/// In-process history stack. Starts on the dashboard.
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<Route>>,
}

impl Default for History {
    fn default() -> Self {
        Self::starting_at(Route::Dashboard)
    }
}

impl History {
    #[must_use]
    pub fn starting_at(route: Route) -> Self {
        Self { entries: Mutex::new(vec![route]) }
    }

    /// Copy of the whole stack, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<Route> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Route>> {
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Navigator for History {
    fn navigate(&self, to: Route, mode: NavigationMode) {
        tracing::debug!(to = %to, ?mode, "navigate");
        let mut entries = self.lock();
        match mode {
            NavigationMode::Push => entries.push(to),
            NavigationMode::Replace => match entries.last_mut() {
                Some(last) => *last = to,
                None => entries.push(to),
            },
        }
    }

    fn current(&self) -> Route {
        self.lock().last().cloned().unwrap_or(Route::Dashboard)
    }
}
